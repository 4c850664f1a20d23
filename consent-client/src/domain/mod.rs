// consent-client/src/domain/mod.rs
pub mod consent_model;
pub mod screenshot;
pub mod session_update_model;
pub mod status_response;

pub use consent_model::{consent_given, ConsentInput, ConsentRecord};
pub use screenshot::Screenshot;
pub use session_update_model::{SessionUpdate, SurveyAnswer};
pub use status_response::ConsentStatusResponse;
