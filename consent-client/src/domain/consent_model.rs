// consent-client/src/domain/consent_model.rs

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::OperatorConfig;
use crate::domain::screenshot::Screenshot;
use crate::types::ConsentTimestamp;

/// 同意フォームから受け取る生の入力
///
/// フォームの値はそのまま受け取り、形式の検証は行わない。
/// 欠けているフィールドは空文字列としてサーバーへ送られる。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConsentInput {
    #[serde(default)]
    pub fio: Option<String>,
    #[serde(default)]
    pub kadastr: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    /// チェックボックスの値。`"on"` または `true` のみ同意とみなす
    #[serde(default)]
    pub consent: Option<Value>,
}

impl ConsentInput {
    pub fn is_consent_given(&self) -> bool {
        consent_given(self.consent.as_ref())
    }
}

/// `"on"` または `true` のときだけ同意ありと判定する
pub fn consent_given(value: Option<&Value>) -> bool {
    match value {
        Some(Value::String(s)) => s == "on",
        Some(Value::Bool(b)) => *b,
        _ => false,
    }
}

/// `/survey/consent` に送信する同意レコード
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsentRecord {
    pub fio: String,
    pub kadastr: String,
    pub phone: String,
    pub email: String,
    pub operator: String,
    pub operator_email: String,
    pub consent: bool,
    pub consent_datetime: ConsentTimestamp,
    pub screenshot: Screenshot,
}

impl ConsentRecord {
    pub fn from_input(
        input: &ConsentInput,
        operator: &OperatorConfig,
        screenshot: Screenshot,
        captured_at: ConsentTimestamp,
    ) -> Self {
        Self {
            fio: input.fio.clone().unwrap_or_default(),
            kadastr: input.kadastr.clone().unwrap_or_default(),
            phone: input.phone.clone().unwrap_or_default(),
            email: input.email.clone().unwrap_or_default(),
            operator: operator.name.clone(),
            operator_email: operator.email.clone(),
            consent: input.is_consent_given(),
            consent_datetime: captured_at,
            screenshot,
        }
    }
}
