// consent-client/src/logging/mod.rs

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use uuid::Uuid;

pub const DEFAULT_LOG_FILTER: &str = "consent_client=info";

#[macro_export]
macro_rules! log_with_context {
    ($level:expr, $msg:expr $(, $($key:ident => $value:expr),* $(,)?)?) => {
        match $level {
            tracing::Level::ERROR => {
                tracing::error!(
                    $($($key = ?$value,)*)?
                    "{}", $msg
                );
            }
            tracing::Level::WARN => {
                tracing::warn!(
                    $($($key = ?$value,)*)?
                    "{}", $msg
                );
            }
            tracing::Level::INFO => {
                tracing::info!(
                    $($($key = ?$value,)*)?
                    "{}", $msg
                );
            }
            tracing::Level::DEBUG => {
                tracing::debug!(
                    $($($key = ?$value,)*)?
                    "{}", $msg
                );
            }
            _ => {}
        }
    };
}

/// トレーシングの初期化
///
/// `RUST_LOG` があればそれを優先する。既にサブスクライバーが
/// 設定されている場合は何もしない。
pub fn init_tracing() {
    let _ = tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .with(fmt::layer())
        .try_init();
}

// 1回の送信処理に紐づくログコンテキスト
#[derive(Clone, Debug)]
pub struct SubmissionContext {
    pub submission_id: Uuid,
    pub base_url: String,
}

impl SubmissionContext {
    pub fn new(base_url: &str) -> Self {
        Self {
            submission_id: Uuid::new_v4(),
            base_url: base_url.to_string(),
        }
    }
}
