// src/lib.rs
pub mod config;
pub mod domain;
pub mod error;
pub mod logging;
pub mod service;
pub mod types;

// Re-export commonly used types
pub use config::ClientConfig;
pub use domain::{ConsentInput, ConsentRecord, Screenshot, SessionUpdate};
pub use error::{ClientError, ClientResult};
pub use service::consent_service::{ConsentCallback, ConsentSubmitter};
pub use service::session_store::{
    FileSessionStore, InMemorySessionStore, NoSessionStore, SessionStore, SESSION_ID_KEY,
};
