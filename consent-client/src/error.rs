// consent-client/src/error.rs

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Session storage error: {0}")]
    Storage(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Invalid screenshot: {0}")]
    Screenshot(String),

    #[error("Submission task failed: {0}")]
    Join(String),
}

impl ClientError {
    /// ログ出力用のエラー種別
    pub fn error_type(&self) -> &'static str {
        match self {
            ClientError::Http(_) => "http_error",
            ClientError::Serialization(_) => "serialization_error",
            ClientError::Storage(_) => "storage_error",
            ClientError::Configuration(_) => "configuration_error",
            ClientError::Screenshot(_) => "screenshot_error",
            ClientError::Join(_) => "join_error",
        }
    }
}

impl From<std::io::Error> for ClientError {
    fn from(err: std::io::Error) -> Self {
        ClientError::Storage(err.to_string())
    }
}

impl From<tokio::task::JoinError> for ClientError {
    fn from(err: tokio::task::JoinError) -> Self {
        ClientError::Join(err.to_string())
    }
}

pub type ClientResult<T> = Result<T, ClientError>;
