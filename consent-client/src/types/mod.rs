// consent-client/src/types/mod.rs
pub mod datetime;

pub use datetime::ConsentTimestamp;
