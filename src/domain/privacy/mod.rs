//! Privacy domain: consent preferences, data export and deletion requests.

mod deletion;
mod export;
mod preferences;
mod request;

pub use deletion::{DeletionRequest, DeletionRequestForm, DELETE_CONFIRMATION};
pub use export::DataExport;
pub use preferences::{PrivacyPreferences, PrivacyPreferencesForm};
pub use request::{PrivacyRequest, PrivacyRequestStatus, PrivacyRequestType};
