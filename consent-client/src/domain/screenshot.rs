// consent-client/src/domain/screenshot.rs

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};

use crate::error::{ClientError, ClientResult};

pub const PNG_DATA_URL_PREFIX: &str = "data:image/png;base64,";

/// 同意画面のスクリーンショット
///
/// 中身は解釈せず、そのままサーバーへ転送する。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Screenshot(String);

impl Screenshot {
    pub fn new(payload: impl Into<String>) -> Self {
        Self(payload.into())
    }

    /// PNG バイト列から `data:image/png;base64,` 形式のペイロードを作成
    pub fn from_png_bytes(bytes: &[u8]) -> Self {
        Self(format!("{}{}", PNG_DATA_URL_PREFIX, STANDARD.encode(bytes)))
    }

    /// データURL形式のペイロードを PNG バイト列に戻す
    pub fn decode_png(&self) -> ClientResult<Vec<u8>> {
        let encoded = self.0.strip_prefix(PNG_DATA_URL_PREFIX).ok_or_else(|| {
            ClientError::Screenshot("payload is not a PNG data URL".to_string())
        })?;

        STANDARD
            .decode(encoded)
            .map_err(|e| ClientError::Screenshot(e.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<String> for Screenshot {
    fn from(payload: String) -> Self {
        Self(payload)
    }
}

impl From<&str> for Screenshot {
    fn from(payload: &str) -> Self {
        Self(payload.to_string())
    }
}
