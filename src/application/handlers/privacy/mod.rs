//! Privacy handlers.
//!
//! ## Commands
//! - Updating consent preferences
//! - Exporting the caller's data
//! - Requesting account deletion
//!
//! ## Queries
//! - Privacy dashboard (preferences and request history)

mod export_data;
mod get_privacy_dashboard;
mod request_deletion;
mod update_preferences;

// Commands
pub use export_data::{ExportDataCommand, ExportDataHandler};
pub use request_deletion::{RequestDeletionCommand, RequestDeletionHandler};
pub use update_preferences::{UpdatePrivacyPreferencesCommand, UpdatePrivacyPreferencesHandler};

// Queries
pub use get_privacy_dashboard::{
    GetPrivacyDashboardHandler, GetPrivacyDashboardQuery, PrivacyDashboard,
};
