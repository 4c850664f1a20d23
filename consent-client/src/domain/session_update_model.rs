// consent-client/src/domain/session_update_model.rs

use serde::{Deserialize, Serialize};

use crate::domain::screenshot::Screenshot;

/// アンケートの回答（サーバー側の回答スキーマと同じ形）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurveyAnswer {
    pub question_id: i32,
    pub value: String,
}

/// `/survey/base` に送信するセッション確定データ
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionUpdate {
    pub session_id: String,
    /// ここでは回答を更新しないため常に空
    pub answers: Vec<SurveyAnswer>,
    pub consent: bool,
    pub screenshot: Screenshot,
}

impl SessionUpdate {
    /// 同意済みとしてセッションを確定する更新を作成
    pub fn confirm(session_id: impl Into<String>, screenshot: Screenshot) -> Self {
        Self {
            session_id: session_id.into(),
            answers: Vec::new(),
            consent: true,
            screenshot,
        }
    }
}
