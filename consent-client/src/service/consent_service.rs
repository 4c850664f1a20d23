// consent-client/src/service/consent_service.rs

use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Response};
use serde::Serialize;
use std::sync::Arc;
use tokio::task::JoinHandle;

use crate::config::ClientConfig;
use crate::domain::{ConsentInput, ConsentRecord, Screenshot, SessionUpdate};
use crate::error::{ClientError, ClientResult};
use crate::log_with_context;
use crate::logging::SubmissionContext;
use crate::service::session_store::{build_session_store, SessionStore};
use crate::types::ConsentTimestamp;

/// 同意送信の完了通知。同意エンドポイントの生のレスポンスを受け取る
pub type ConsentCallback = Box<dyn FnOnce(Response) + Send + 'static>;

/// 同意フォームの内容とスクリーンショットをアンケートサーバーへ送信する
#[derive(Clone)]
pub struct ConsentSubmitter {
    http: Client,
    config: Arc<ClientConfig>,
    sessions: Arc<dyn SessionStore>,
}

impl ConsentSubmitter {
    pub fn new(config: ClientConfig, sessions: Arc<dyn SessionStore>) -> ClientResult<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self::with_client(builder.build()?, config, sessions))
    }

    /// 既存の HTTP クライアントを使って作成
    pub fn with_client(http: Client, config: ClientConfig, sessions: Arc<dyn SessionStore>) -> Self {
        Self {
            http,
            config: Arc::new(config),
            sessions,
        }
    }

    /// 環境変数から設定とセッションストアを読み込んで作成
    pub fn from_env() -> ClientResult<Self> {
        let config = ClientConfig::from_env()?;
        let sessions = build_session_store(&config);
        Self::new(config, sessions)
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// 同意レコードを作成する。同意日時はこの呼び出し時点で確定する
    pub fn build_record(&self, input: &ConsentInput, screenshot: Screenshot) -> ConsentRecord {
        ConsentRecord::from_input(
            input,
            &self.config.operator,
            screenshot,
            ConsentTimestamp::now(),
        )
    }

    pub fn build_session_update(&self, session_id: &str, screenshot: Screenshot) -> SessionUpdate {
        SessionUpdate::confirm(session_id, screenshot)
    }

    /// 同意を送信し、同意エンドポイントのレスポンスを返す
    ///
    /// レスポンスのステータスは確認しない。セッションIDが保存されていれば
    /// `/survey/base` への確定リクエストを別タスクで送信し、その完了は待たない。
    pub async fn submit(
        &self,
        input: ConsentInput,
        screenshot: Screenshot,
    ) -> ClientResult<Response> {
        let context = SubmissionContext::new(&self.config.base_url);
        let record = self.build_record(&input, screenshot.clone());

        log_with_context!(
            tracing::Level::DEBUG,
            "Submitting consent record",
            submission_id => context.submission_id,
            base_url => &context.base_url,
            consent => record.consent,
            consent_datetime => record.consent_datetime.to_iso_string(),
            screenshot_len => record.screenshot.len(),
        );

        let response = match self.post_json(&self.config.consent_url(), &record).await {
            Ok(response) => response,
            Err(e) => {
                log_with_context!(
                    tracing::Level::ERROR,
                    "Consent request failed",
                    submission_id => context.submission_id,
                    error => e.to_string(),
                    error_type => e.error_type(),
                );
                return Err(e);
            }
        };

        log_with_context!(
            tracing::Level::INFO,
            "Consent request completed",
            submission_id => context.submission_id,
            status => response.status().as_u16(),
        );

        self.dispatch_session_update(&context, screenshot).await;

        Ok(response)
    }

    /// 送信処理をバックグラウンドで開始し、すぐに戻る
    ///
    /// 同意リクエストが成功した場合のみ、コールバックを一度だけ呼び出す。
    /// 通信エラーは返却される `JoinHandle` の結果として観測できる。
    ///
    /// # Panics
    ///
    /// Tokio ランタイムの外から呼び出した場合はパニックする。
    pub fn submit_consent(
        &self,
        input: ConsentInput,
        screenshot: Screenshot,
        callback: Option<ConsentCallback>,
    ) -> JoinHandle<ClientResult<()>> {
        let submitter = self.clone();

        tokio::spawn(async move {
            let response = submitter.submit(input, screenshot).await?;
            if let Some(callback) = callback {
                callback(response);
            }
            Ok(())
        })
    }

    // セッションIDがあれば確定リクエストを投げっぱなしで送信する
    async fn dispatch_session_update(
        &self,
        context: &SubmissionContext,
        screenshot: Screenshot,
    ) {
        let session_id = match self.sessions.session_id().await {
            Ok(Some(session_id)) => session_id,
            Ok(None) => {
                log_with_context!(
                    tracing::Level::DEBUG,
                    "No stored session id, skipping survey finalization",
                    submission_id => context.submission_id,
                );
                return;
            }
            Err(e) => {
                log_with_context!(
                    tracing::Level::WARN,
                    "Failed to read stored session id, skipping survey finalization",
                    submission_id => context.submission_id,
                    error => e.to_string(),
                );
                return;
            }
        };

        let update = self.build_session_update(&session_id, screenshot);
        let submitter = self.clone();
        let url = self.config.survey_base_url();
        let submission_id = context.submission_id;

        tokio::spawn(async move {
            match submitter.post_json(&url, &update).await {
                Ok(response) => {
                    log_with_context!(
                        tracing::Level::DEBUG,
                        "Survey finalization request completed",
                        submission_id => submission_id,
                        session_id => update.session_id,
                        status => response.status().as_u16(),
                    );
                }
                Err(e) => {
                    // 失敗は呼び出し元に伝えない
                    log_with_context!(
                        tracing::Level::WARN,
                        "Survey finalization request failed",
                        submission_id => submission_id,
                        session_id => update.session_id,
                        error => e.to_string(),
                    );
                }
            }
        });
    }

    async fn post_json<T: Serialize>(&self, url: &str, body: &T) -> ClientResult<Response> {
        let payload = serde_json::to_vec(body)?;

        self.http
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .body(payload)
            .send()
            .await
            .map_err(ClientError::from)
    }
}
