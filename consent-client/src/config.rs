// consent-client/src/config.rs
use dotenvy::dotenv;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::{ClientError, ClientResult};

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";
pub const DEFAULT_OPERATOR_NAME: &str = "Ларину Максиму Ивановичу";
pub const DEFAULT_OPERATOR_EMAIL: &str = "admin@tylarmacclane.site";

pub const CONSENT_PATH: &str = "/survey/consent";
pub const SURVEY_BASE_PATH: &str = "/survey/base";

/// 個人データの管理者（オペレーター）情報
#[derive(Clone, Debug, PartialEq)]
pub struct OperatorConfig {
    pub name: String,
    pub email: String,
}

impl Default for OperatorConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_OPERATOR_NAME.to_string(),
            email: DEFAULT_OPERATOR_EMAIL.to_string(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct ClientConfig {
    pub base_url: String,
    pub operator: OperatorConfig,
    /// 未設定の場合はトランスポートのデフォルトに任せる
    pub request_timeout: Option<Duration>,
    pub session_file: Option<PathBuf>,
}

impl ClientConfig {
    pub fn from_env() -> ClientResult<Self> {
        dotenv().ok(); // .env ファイルを読み込む (存在しなくてもエラーにしない)

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// 任意のキー参照関数から設定を構築
    pub fn from_lookup<F>(lookup: F) -> ClientResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = lookup("CONSENT_API_BASE_URL")
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let request_timeout = match lookup("CONSENT_REQUEST_TIMEOUT_SECS") {
            Some(raw) => {
                let secs: u64 = raw.trim().parse().map_err(|_| {
                    ClientError::Configuration(format!(
                        "Invalid CONSENT_REQUEST_TIMEOUT_SECS value: {}",
                        raw
                    ))
                })?;
                Some(Duration::from_secs(secs))
            }
            None => None,
        };

        Ok(Self {
            base_url: normalize_base_url(&base_url),
            operator: OperatorConfig {
                name: lookup("CONSENT_OPERATOR_NAME")
                    .unwrap_or_else(|| DEFAULT_OPERATOR_NAME.to_string()),
                email: lookup("CONSENT_OPERATOR_EMAIL")
                    .unwrap_or_else(|| DEFAULT_OPERATOR_EMAIL.to_string()),
            },
            request_timeout,
            session_file: lookup("CONSENT_SESSION_FILE")
                .filter(|s| !s.trim().is_empty())
                .map(PathBuf::from),
        })
    }

    /// テスト用の設定を作成
    pub fn for_testing(base_url: &str) -> Self {
        Self {
            base_url: normalize_base_url(base_url),
            operator: OperatorConfig::default(),
            request_timeout: Some(Duration::from_secs(5)),
            session_file: None,
        }
    }

    pub fn consent_url(&self) -> String {
        format!("{}{}", self.base_url, CONSENT_PATH)
    }

    pub fn survey_base_url(&self) -> String {
        format!("{}{}", self.base_url, SURVEY_BASE_PATH)
    }
}

fn normalize_base_url(raw: &str) -> String {
    raw.trim().trim_end_matches('/').to_string()
}
