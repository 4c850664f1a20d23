// consent-client/src/domain/status_response.rs

use serde::{Deserialize, Serialize};

/// サーバーの `{"status": "ok"}` 応答
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsentStatusResponse {
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
}

impl ConsentStatusResponse {
    pub fn is_ok(&self) -> bool {
        self.status == "ok"
    }
}
