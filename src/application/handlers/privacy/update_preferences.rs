//! UpdatePrivacyPreferencesHandler - overwrites consent flags and logs the change.

use std::sync::Arc;

use crate::domain::foundation::{DomainError, ErrorCode, Timestamp, UserId};
use crate::domain::privacy::{
    PrivacyPreferences, PrivacyPreferencesForm, PrivacyRequest, PrivacyRequestType,
};
use crate::ports::{PrivacyRequestRepository, ProfileRepository};

#[derive(Debug, Clone)]
pub struct UpdatePrivacyPreferencesCommand {
    pub user_id: UserId,
    pub form: PrivacyPreferencesForm,
}

pub struct UpdatePrivacyPreferencesHandler {
    profiles: Arc<dyn ProfileRepository>,
    requests: Arc<dyn PrivacyRequestRepository>,
}

impl UpdatePrivacyPreferencesHandler {
    pub fn new(
        profiles: Arc<dyn ProfileRepository>,
        requests: Arc<dyn PrivacyRequestRepository>,
    ) -> Self {
        Self { profiles, requests }
    }

    pub async fn handle(
        &self,
        cmd: UpdatePrivacyPreferencesCommand,
    ) -> Result<PrivacyPreferences, DomainError> {
        let now = Timestamp::now();
        let preferences = cmd.form.into_preferences(now);

        // 1. Overwrite the consent columns
        if !self
            .profiles
            .update_privacy_preferences(&cmd.user_id, &preferences)
            .await?
        {
            return Err(DomainError::new(
                ErrorCode::ProfileNotFound,
                "Profile not found",
            ));
        }

        // 2. Record the change in the request log
        self.requests
            .append(&PrivacyRequest::completed(
                cmd.user_id,
                PrivacyRequestType::ConsentUpdate,
                preferences.as_details(),
                now,
            ))
            .await?;

        tracing::info!(user_id = %cmd.user_id, "Privacy preferences updated");
        Ok(preferences)
    }
}
