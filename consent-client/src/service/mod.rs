// consent-client/src/service/mod.rs
pub mod consent_service;
pub mod session_store;
