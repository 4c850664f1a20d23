// tests/common/mod.rs
#![allow(dead_code)]

use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, StatusCode, Uri},
    response::IntoResponse,
    routing::post,
    Json, Router,
};
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, Once};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

// テスト環境の初期化を一度だけ実行
static INIT: Once = Once::new();

/// テスト環境を初期化
pub fn init_test_env() {
    INIT.call_once(|| {
        // テスト用のログ設定
        let _ = tracing_subscriber::fmt()
            .with_env_filter("consent_client=debug")
            .with_test_writer()
            .try_init();
    });
}

/// 偽のアンケートサーバーが受け取ったリクエスト
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub path: String,
    pub content_type: Option<String>,
    pub body: Value,
}

/// `/survey/base` の応答の仕方
#[derive(Debug, Clone, Copy)]
pub enum BaseBehavior {
    Respond(StatusCode),
    /// 応答を返さずに待ち続ける
    Hang,
}

#[derive(Clone)]
struct BackendState {
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    consent_status: StatusCode,
    base_behavior: BaseBehavior,
}

type Requests = Arc<Mutex<Vec<RecordedRequest>>>;

/// `/survey/consent` と `/survey/base` を受け付けるテスト用サーバー
pub struct FakeSurveyBackend {
    pub base_url: String,
    requests: Requests,
}

impl FakeSurveyBackend {
    pub async fn start() -> Self {
        Self::start_with_status(StatusCode::OK, StatusCode::OK).await
    }

    pub async fn start_with_status(consent_status: StatusCode, base_status: StatusCode) -> Self {
        Self::start_with(consent_status, BaseBehavior::Respond(base_status)).await
    }

    pub async fn start_with_hanging_base() -> Self {
        Self::start_with(StatusCode::OK, BaseBehavior::Hang).await
    }

    /// `/survey/base` の接続を応答せずに切断するサーバー
    pub async fn start_with_dropping_base() -> Self {
        let requests: Requests = Arc::new(Mutex::new(Vec::new()));
        let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0)))
            .await
            .unwrap();
        let actual_addr = listener.local_addr().unwrap();

        let recorded = requests.clone();
        tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                tokio::spawn(serve_raw_connection(stream, recorded.clone()));
            }
        });

        Self {
            base_url: format!("http://{}", actual_addr),
            requests,
        }
    }

    async fn start_with(consent_status: StatusCode, base_behavior: BaseBehavior) -> Self {
        let requests: Requests = Arc::new(Mutex::new(Vec::new()));
        let state = BackendState {
            requests: requests.clone(),
            consent_status,
            base_behavior,
        };

        let app = Router::new()
            .route("/survey/consent", post(record_request))
            .route("/survey/base", post(record_request))
            .with_state(state);

        let addr = SocketAddr::from(([127, 0, 0, 1], 0));
        let listener = TcpListener::bind(addr).await.unwrap();
        let actual_addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            axum::serve(listener, app.into_make_service())
                .await
                .unwrap();
        });

        Self {
            base_url: format!("http://{}", actual_addr),
            requests,
        }
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn requests_to(&self, path: &str) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.path == path)
            .collect()
    }

    /// 指定数のリクエストが届くまで待つ（最大5秒）
    pub async fn wait_for_requests(&self, count: usize) -> Vec<RecordedRequest> {
        for _ in 0..100 {
            let requests = self.requests();
            if requests.len() >= count {
                return requests;
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        panic!(
            "expected {} requests, got {:?}",
            count,
            self.requests()
        );
    }
}

async fn record_request(
    State(state): State<BackendState>,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> impl IntoResponse {
    let path = uri.path().to_string();
    let body: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    state.requests.lock().unwrap().push(RecordedRequest {
        path: path.clone(),
        content_type,
        body: body.clone(),
    });

    if path != "/survey/base" {
        return (state.consent_status, Json(json!({ "status": "ok" })));
    }

    let status = match state.base_behavior {
        BaseBehavior::Respond(status) => status,
        BaseBehavior::Hang => {
            tokio::time::sleep(Duration::from_secs(30)).await;
            StatusCode::OK
        }
    };
    (
        status,
        Json(json!({ "status": "ok", "session_id": body["session_id"] })),
    )
}

// HTTP/1.1 を最小限だけ解釈し、`/survey/base` では応答せずに切断する
async fn serve_raw_connection(mut stream: TcpStream, requests: Requests) {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    let header_end = loop {
        match stream.read(&mut chunk).await {
            Ok(0) | Err(_) => return,
            Ok(n) => buf.extend_from_slice(&chunk[..n]),
        }
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).into_owned();
    let path = head.split_whitespace().nth(1).unwrap_or_default().to_string();
    let content_length = header_value(&head, "content-length")
        .and_then(|v| v.parse::<usize>().ok())
        .unwrap_or(0);

    while buf.len() < header_end + content_length {
        match stream.read(&mut chunk).await {
            Ok(0) | Err(_) => return,
            Ok(n) => buf.extend_from_slice(&chunk[..n]),
        }
    }

    let body = serde_json::from_slice(&buf[header_end..header_end + content_length])
        .unwrap_or(Value::Null);
    requests.lock().unwrap().push(RecordedRequest {
        path: path.clone(),
        content_type: header_value(&head, "content-type"),
        body,
    });

    if path == "/survey/base" {
        return;
    }

    let payload = r#"{"status":"ok"}"#;
    let response = format!(
        "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        payload.len(),
        payload
    );
    let _ = stream.write_all(response.as_bytes()).await;
    let _ = stream.shutdown().await;
}

fn header_value(head: &str, name: &str) -> Option<String> {
    head.lines().find_map(|line| {
        let (key, value) = line.split_once(':')?;
        if key.trim().eq_ignore_ascii_case(name) {
            Some(value.trim().to_string())
        } else {
            None
        }
    })
}

/// 接続できないアドレスを取得
pub async fn unreachable_base_url() -> String {
    let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0)))
        .await
        .unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

/// テスト用のフォーム入力
pub fn sample_form(consent: Value) -> Value {
    json!({
        "fio": "Ivanov I.I.",
        "kadastr": "77:01:0001",
        "phone": "+7900",
        "email": "a@b.c",
        "consent": consent
    })
}
