use serde::{Deserialize, Serialize};

use crate::domain::foundation::Timestamp;

/// Consent flags stored on the profile.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrivacyPreferences {
    pub marketing_emails: bool,
    pub analytics_tracking: bool,
    pub third_party_sharing: bool,
    pub updated_at: Option<Timestamp>,
}

/// Checkbox form for the preferences action.
///
/// HTML checkboxes are only submitted when ticked, so absent means `false`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PrivacyPreferencesForm {
    #[serde(default)]
    pub marketing_emails: Option<String>,
    #[serde(default)]
    pub analytics_tracking: Option<String>,
    #[serde(default)]
    pub third_party_sharing: Option<String>,
}

impl PrivacyPreferencesForm {
    pub fn into_preferences(self, now: Timestamp) -> PrivacyPreferences {
        PrivacyPreferences {
            marketing_emails: is_checked(self.marketing_emails.as_deref()),
            analytics_tracking: is_checked(self.analytics_tracking.as_deref()),
            third_party_sharing: is_checked(self.third_party_sharing.as_deref()),
            updated_at: Some(now),
        }
    }
}

fn is_checked(value: Option<&str>) -> bool {
    matches!(
        value.map(|v| v.trim().to_ascii_lowercase()).as_deref(),
        Some("on" | "true" | "1" | "yes")
    )
}

impl PrivacyPreferences {
    /// Details recorded in the consent-update log entry.
    pub fn as_details(&self) -> serde_json::Value {
        serde_json::json!({
            "marketing_emails": self.marketing_emails,
            "analytics_tracking": self.analytics_tracking,
            "third_party_sharing": self.third_party_sharing,
        })
    }
}
