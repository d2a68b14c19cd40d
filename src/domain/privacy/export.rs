use serde::Serialize;

use crate::domain::foundation::{Timestamp, UserId};
use crate::domain::profile::UserProfile;
use crate::domain::waitlist::WaitlistRequest;

use super::PrivacyRequest;

/// Everything held about a user, returned by the data export action.
#[derive(Debug, Clone, Serialize)]
pub struct DataExport {
    pub user_id: UserId,
    pub exported_at: Timestamp,
    pub profile: Option<UserProfile>,
    /// Account record from the auth provider, as it returned it.
    pub account: Option<serde_json::Value>,
    pub privacy_requests: Vec<PrivacyRequest>,
    pub waitlist_requests: Vec<WaitlistRequest>,
}

impl DataExport {
    /// Suggested download file name.
    pub fn file_name(&self) -> String {
        format!(
            "data-export-{}-{}.json",
            self.user_id,
            self.exported_at.as_datetime().format("%Y%m%d")
        )
    }

    /// Details recorded in the export log entry.
    pub fn as_details(&self) -> serde_json::Value {
        serde_json::json!({
            "privacy_requests": self.privacy_requests.len(),
            "waitlist_requests": self.waitlist_requests.len(),
            "includes_account": self.account.is_some(),
        })
    }
}
