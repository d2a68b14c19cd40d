//! CheckEntitlementHandler - query handler for access decisions.

use std::sync::Arc;

use crate::domain::entitlement::{resolve_entitlement, DenialReason, EntitlementResult};
use crate::domain::foundation::{Timestamp, UserId};
use crate::ports::ProfileRepository;

/// Query for one named entitlement.
#[derive(Debug, Clone)]
pub struct CheckEntitlementQuery {
    /// `None` when the request carried no valid session.
    pub user_id: Option<UserId>,
    pub entitlement: String,
}

/// Resolves entitlements against the caller's stored profile.
///
/// Never fails: store errors come back as [`EntitlementResult::Failed`].
pub struct CheckEntitlementHandler {
    profiles: Arc<dyn ProfileRepository>,
}

impl CheckEntitlementHandler {
    pub fn new(profiles: Arc<dyn ProfileRepository>) -> Self {
        Self { profiles }
    }

    pub async fn handle(&self, query: CheckEntitlementQuery) -> EntitlementResult {
        let Some(user_id) = query.user_id else {
            return EntitlementResult::denied(DenialReason::NotAuthenticated);
        };

        match self.profiles.find_by_id(&user_id).await {
            Ok(Some(profile)) => resolve_entitlement(&profile, &query.entitlement, Timestamp::now()),
            Ok(None) => EntitlementResult::denied(DenialReason::NoProfile),
            Err(e) => {
                tracing::error!(user_id = %user_id, error = %e, "Entitlement lookup failed");
                EntitlementResult::Failed {
                    message: "Unable to verify access right now. Please try again.".to_string(),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryProfileRepository;
    use crate::domain::billing::{BillingColumns, ProfileSelector, SubscriptionStatus};
    use crate::domain::foundation::DomainError;
    use crate::domain::privacy::PrivacyPreferences;
    use crate::domain::profile::{Entitlements, ProfileDetails, UserProfile};
    use async_trait::async_trait;
    use proptest::prelude::*;

    struct FailingProfiles;

    #[async_trait]
    impl ProfileRepository for FailingProfiles {
        async fn find_by_id(&self, _id: &UserId) -> Result<Option<UserProfile>, DomainError> {
            Err(DomainError::database("connection refused"))
        }

        async fn upsert_details(
            &self,
            _id: &UserId,
            _email: &str,
            _details: &ProfileDetails,
        ) -> Result<(), DomainError> {
            unimplemented!()
        }

        async fn apply_billing(
            &self,
            _selector: &ProfileSelector,
            _columns: &BillingColumns,
        ) -> Result<u64, DomainError> {
            unimplemented!()
        }

        async fn update_privacy_preferences(
            &self,
            _id: &UserId,
            _preferences: &PrivacyPreferences,
        ) -> Result<bool, DomainError> {
            unimplemented!()
        }

        async fn mark_waitlist_pending(
            &self,
            _id: &UserId,
            _now: Timestamp,
        ) -> Result<bool, DomainError> {
            unimplemented!()
        }
    }

    async fn handler_with(profile: UserProfile) -> CheckEntitlementHandler {
        let profiles = InMemoryProfileRepository::new();
        profiles.insert(profile).await;
        CheckEntitlementHandler::new(Arc::new(profiles))
    }

    fn query(user_id: UserId, name: &str) -> CheckEntitlementQuery {
        CheckEntitlementQuery {
            user_id: Some(user_id),
            entitlement: name.to_string(),
        }
    }

    #[tokio::test]
    async fn anonymous_caller_is_denied() {
        let handler = CheckEntitlementHandler::new(Arc::new(InMemoryProfileRepository::new()));
        let result = handler
            .handle(CheckEntitlementQuery {
                user_id: None,
                entitlement: "premium".to_string(),
            })
            .await;
        assert_eq!(result, EntitlementResult::denied(DenialReason::NotAuthenticated));
    }

    #[tokio::test]
    async fn missing_profile_is_denied() {
        let handler = CheckEntitlementHandler::new(Arc::new(InMemoryProfileRepository::new()));
        let result = handler.handle(query(UserId::new(), "premium")).await;
        assert_eq!(result, EntitlementResult::denied(DenialReason::NoProfile));
    }

    #[tokio::test]
    async fn store_failure_becomes_failed_value() {
        let handler = CheckEntitlementHandler::new(Arc::new(FailingProfiles));
        let result = handler.handle(query(UserId::new(), "premium")).await;
        assert!(matches!(result, EntitlementResult::Failed { .. }));
        assert!(!result.has_access());
        assert!(!result.reason_message().unwrap().contains("connection refused"));
    }

    #[tokio::test]
    async fn active_period_grants_premium() {
        let mut profile = UserProfile::new(UserId::new(), "pm@fund.example", Timestamp::now());
        profile.subscription_status = Some(SubscriptionStatus::Active);
        profile.subscription_current_period_end = Some(Timestamp::now().add_days(30));
        let id = profile.id;

        let result = handler_with(profile).await.handle(query(id, "premium")).await;
        assert!(result.has_access());
    }

    #[tokio::test]
    async fn other_names_use_entitlement_map() {
        let mut profile = UserProfile::new(UserId::new(), "pm@fund.example", Timestamp::now());
        profile.entitlements = Entitlements::none().with("api_access", true);
        let id = profile.id;
        let handler = handler_with(profile).await;

        assert!(handler.handle(query(id, "api_access")).await.has_access());
        assert_eq!(
            handler.handle(query(id, "bulk_export")).await,
            EntitlementResult::denied(DenialReason::NotEntitled)
        );
    }

    fn status_strategy() -> impl Strategy<Value = SubscriptionStatus> {
        prop::sample::select(vec![
            SubscriptionStatus::Incomplete,
            SubscriptionStatus::IncompleteExpired,
            SubscriptionStatus::Trialing,
            SubscriptionStatus::Active,
            SubscriptionStatus::PastDue,
            SubscriptionStatus::Canceled,
            SubscriptionStatus::Unpaid,
            SubscriptionStatus::Paused,
            SubscriptionStatus::Unknown,
        ])
    }

    proptest! {
        /// Reconciled profiles grant premium exactly for active and trialing subscriptions.
        #[test]
        fn reconciled_status_decides_premium(status in status_strategy(), days_left in 1i64..365) {
            use crate::domain::billing::{BillingMutation, SubscriptionSnapshot};

            let now = Timestamp::now();
            let mut profile = UserProfile::new(UserId::new(), "pm@fund.example", now);
            let snapshot = SubscriptionSnapshot {
                subscription_id: "sub_1".to_string(),
                customer_id: "cus_1".to_string(),
                status,
                plan_id: None,
                current_period_start: Some(now),
                current_period_end: Some(now.add_days(days_left)),
                cancel_at_period_end: false,
            };
            profile.apply_billing(&BillingMutation::SyncSubscription(snapshot).columns(), now);

            let result = resolve_entitlement(&profile, "premium", now);
            prop_assert_eq!(result.has_access(), status.grants_access());
        }
    }
}
