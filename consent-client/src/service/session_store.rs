// consent-client/src/service/session_store.rs

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};

/// アンケートのセッションIDを保存するキー
pub const SESSION_ID_KEY: &str = "session_id";

/// クライアント側の永続ストレージ（ブラウザの localStorage 相当）
///
/// 値の書き込みはアンケート開始側のフローが行い、同意送信は読み取りのみ行う。
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// キーに対応する値を取得
    async fn get(&self, key: &str) -> ClientResult<Option<String>>;

    /// 値を保存
    async fn set(&self, key: &str, value: &str) -> ClientResult<()>;

    /// 値を削除
    async fn remove(&self, key: &str) -> ClientResult<()>;

    /// 保存済みのセッションIDを取得（空文字列は未設定扱い）
    async fn session_id(&self) -> ClientResult<Option<String>> {
        Ok(self
            .get(SESSION_ID_KEY)
            .await?
            .filter(|id| !id.is_empty()))
    }
}

/// プロセス内で共有されるメモリ上のストア
#[derive(Clone, Default)]
pub struct InMemorySessionStore {
    entries: Arc<RwLock<HashMap<String, String>>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_session_id(session_id: &str) -> Self {
        let mut entries = HashMap::new();
        entries.insert(SESSION_ID_KEY.to_string(), session_id.to_string());
        Self {
            entries: Arc::new(RwLock::new(entries)),
        }
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn get(&self, key: &str) -> ClientResult<Option<String>> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> ClientResult<()> {
        self.entries
            .write()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> ClientResult<()> {
        self.entries.write().await.remove(key);
        Ok(())
    }
}

/// JSONファイルに永続化するストア
pub struct FileSessionStore {
    path: PathBuf,
    // 読み込み→書き込みの間に他の書き込みが割り込まないようにする
    write_lock: Mutex<()>,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> ClientResult<HashMap<String, String>> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(HashMap::new()),
            Err(e) => Err(ClientError::Storage(format!(
                "Failed to read {}: {}",
                self.path.display(),
                e
            ))),
        }
    }

    async fn save(&self, entries: &HashMap<String, String>) -> ClientResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        let body = serde_json::to_vec_pretty(entries)?;

        // 同じディレクトリの一時ファイルに書いてから置き換える。
        // 読み込み側が書きかけのファイルを見ることはない
        let tmp_path = self.temp_path();
        if let Err(e) = tokio::fs::write(&tmp_path, body).await {
            let _ = tokio::fs::remove_file(&tmp_path).await;
            return Err(e.into());
        }
        if let Err(e) = tokio::fs::rename(&tmp_path, &self.path).await {
            let _ = tokio::fs::remove_file(&tmp_path).await;
            return Err(e.into());
        }
        Ok(())
    }

    fn temp_path(&self) -> PathBuf {
        let file_name = self
            .path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "session-store".to_string());
        self.path
            .with_file_name(format!(".{}.{}.tmp", file_name, Uuid::new_v4()))
    }
}

#[async_trait]
impl SessionStore for FileSessionStore {
    async fn get(&self, key: &str) -> ClientResult<Option<String>> {
        Ok(self.load().await?.remove(key))
    }

    async fn set(&self, key: &str, value: &str) -> ClientResult<()> {
        let _guard = self.write_lock.lock().await;
        let mut entries = self.load().await?;
        entries.insert(key.to_string(), value.to_string());
        self.save(&entries).await
    }

    async fn remove(&self, key: &str) -> ClientResult<()> {
        let _guard = self.write_lock.lock().await;
        let mut entries = self.load().await?;
        if entries.remove(key).is_some() {
            self.save(&entries).await?;
        }
        Ok(())
    }
}

/// 常に空のストア
#[derive(Clone, Copy, Debug, Default)]
pub struct NoSessionStore;

#[async_trait]
impl SessionStore for NoSessionStore {
    async fn get(&self, _key: &str) -> ClientResult<Option<String>> {
        Ok(None)
    }

    async fn set(&self, _key: &str, _value: &str) -> ClientResult<()> {
        Ok(())
    }

    async fn remove(&self, _key: &str) -> ClientResult<()> {
        Ok(())
    }
}

/// 設定に応じたストアを作成
pub fn build_session_store(config: &ClientConfig) -> Arc<dyn SessionStore> {
    match &config.session_file {
        Some(path) => Arc::new(FileSessionStore::new(path.clone())),
        None => Arc::new(InMemorySessionStore::new()),
    }
}
