//! ExportDataHandler - assembles everything held about the caller.

use std::sync::Arc;

use crate::domain::foundation::{DomainError, Timestamp, UserId};
use crate::domain::privacy::{DataExport, PrivacyRequest, PrivacyRequestType};
use crate::ports::{
    IdentityProvider, PrivacyRequestRepository, ProfileRepository, WaitlistRepository,
};

#[derive(Debug, Clone)]
pub struct ExportDataCommand {
    pub user_id: UserId,
}

/// Builds the export synchronously and logs a completed `data_export` request.
pub struct ExportDataHandler {
    profiles: Arc<dyn ProfileRepository>,
    identity: Arc<dyn IdentityProvider>,
    requests: Arc<dyn PrivacyRequestRepository>,
    waitlist: Arc<dyn WaitlistRepository>,
}

impl ExportDataHandler {
    pub fn new(
        profiles: Arc<dyn ProfileRepository>,
        identity: Arc<dyn IdentityProvider>,
        requests: Arc<dyn PrivacyRequestRepository>,
        waitlist: Arc<dyn WaitlistRepository>,
    ) -> Self {
        Self {
            profiles,
            identity,
            requests,
            waitlist,
        }
    }

    pub async fn handle(&self, cmd: ExportDataCommand) -> Result<DataExport, DomainError> {
        let now = Timestamp::now();

        let profile = self.profiles.find_by_id(&cmd.user_id).await?;

        // The auth record is best-effort; the rest of the export still stands.
        let account = match self.identity.get_user(&cmd.user_id).await {
            Ok(account) => account,
            Err(e) => {
                tracing::warn!(user_id = %cmd.user_id, error = %e, "Auth record unavailable for export");
                None
            }
        };

        let privacy_requests = self.requests.list_for_user(&cmd.user_id).await?;
        let waitlist_requests = self.waitlist.list_for_user(&cmd.user_id).await?;

        let export = DataExport {
            user_id: cmd.user_id,
            exported_at: now,
            profile,
            account,
            privacy_requests,
            waitlist_requests,
        };

        self.requests
            .append(&PrivacyRequest::completed(
                cmd.user_id,
                PrivacyRequestType::DataExport,
                export.as_details(),
                now,
            ))
            .await?;

        tracing::info!(user_id = %cmd.user_id, "Data export generated");
        Ok(export)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::auth::MockIdentityProvider;
    use crate::adapters::memory::{
        InMemoryPrivacyRequestRepository, InMemoryProfileRepository, InMemoryWaitlistRepository,
    };
    use crate::domain::privacy::PrivacyRequestStatus;
    use crate::domain::profile::UserProfile;
    use crate::domain::waitlist::{WaitlistRequest, WaitlistSubmission};
    use crate::ports::IdentityError;

    struct Fixture {
        profiles: InMemoryProfileRepository,
        requests: InMemoryPrivacyRequestRepository,
        waitlist: InMemoryWaitlistRepository,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                profiles: InMemoryProfileRepository::new(),
                requests: InMemoryPrivacyRequestRepository::new(),
                waitlist: InMemoryWaitlistRepository::new(),
            }
        }

        fn handler(&self, identity: MockIdentityProvider) -> ExportDataHandler {
            ExportDataHandler::new(
                Arc::new(self.profiles.clone()),
                Arc::new(identity),
                Arc::new(self.requests.clone()),
                Arc::new(self.waitlist.clone()),
            )
        }
    }

    #[tokio::test]
    async fn export_bundles_profile_account_and_history() {
        let f = Fixture::new();
        let user_id = UserId::new();
        f.profiles
            .insert(UserProfile::new(user_id, "pm@fund.example", Timestamp::now()))
            .await;
        f.waitlist
            .append(&WaitlistRequest::new(
                user_id,
                "pm@fund.example",
                WaitlistSubmission {
                    feature: "screener".to_string(),
                    message: None,
                    referral_source: None,
                },
                Timestamp::now(),
            ))
            .await
            .unwrap();
        let identity = MockIdentityProvider::new().with_account("pm@fund.example", "pw-123456", user_id);

        let export = f
            .handler(identity)
            .handle(ExportDataCommand { user_id })
            .await
            .unwrap();

        assert_eq!(export.profile.as_ref().map(|p| p.id), Some(user_id));
        assert_eq!(export.account.as_ref().unwrap()["email"], "pm@fund.example");
        assert_eq!(export.waitlist_requests.len(), 1);
        assert!(export.privacy_requests.is_empty());

        let log = f.requests.all().await;
        assert_eq!(log.len(), 1);
        assert_eq!(log[0].request_type, PrivacyRequestType::DataExport);
        assert_eq!(log[0].status, PrivacyRequestStatus::Completed);
    }

    #[tokio::test]
    async fn auth_outage_still_exports() {
        let f = Fixture::new();
        let user_id = UserId::new();
        let identity = MockIdentityProvider::new().with_error(IdentityError::unavailable("down"));

        let export = f
            .handler(identity)
            .handle(ExportDataCommand { user_id })
            .await
            .unwrap();

        assert!(export.account.is_none());
        assert!(export.profile.is_none());
        let json = serde_json::to_value(&export).unwrap();
        assert_eq!(json["user_id"], user_id.to_string());
    }
}
