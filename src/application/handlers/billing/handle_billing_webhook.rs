//! HandleBillingWebhookHandler - reconciles payment processor events into
//! profile billing columns.

use std::sync::Arc;

use crate::domain::billing::{
    BillingColumns, BillingEvent, BillingMutation, ProfileSelector, StripeWebhookVerifier,
    WebhookError,
};
use crate::ports::{PaymentProvider, ProfileRepository};

/// Command to handle a signed webhook delivery.
#[derive(Debug, Clone)]
pub struct HandleBillingWebhookCommand {
    /// Raw request body, exactly as received.
    pub payload: Vec<u8>,
    /// `Stripe-Signature` header value.
    pub signature: String,
}

/// Result of webhook processing. Both variants are acknowledged with 200.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandleBillingWebhookResult {
    /// Billing columns were overwritten on `rows` profiles (possibly none).
    Reconciled {
        event_id: String,
        mutations: Vec<&'static str>,
        rows: u64,
    },
    /// Event acknowledged but no action taken.
    Ignored { event_id: String, reason: String },
}

/// Where a verified event lands and what it writes.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Reconciliation {
    selector: ProfileSelector,
    mutations: Vec<BillingMutation>,
}

impl Reconciliation {
    fn single(selector: ProfileSelector, mutation: BillingMutation) -> Self {
        Self {
            selector,
            mutations: vec![mutation],
        }
    }

    fn columns(&self) -> BillingColumns {
        self.mutations
            .iter()
            .fold(BillingColumns::default(), |acc, m| acc.and(m.columns()))
    }
}

/// Handler for billing webhooks.
///
/// Every branch is a full overwrite, so redelivered events converge on the
/// same profile state.
pub struct HandleBillingWebhookHandler {
    profiles: Arc<dyn ProfileRepository>,
    payments: Arc<dyn PaymentProvider>,
    verifier: StripeWebhookVerifier,
    require_livemode: bool,
}

impl HandleBillingWebhookHandler {
    pub fn new(
        profiles: Arc<dyn ProfileRepository>,
        payments: Arc<dyn PaymentProvider>,
        verifier: StripeWebhookVerifier,
    ) -> Self {
        Self {
            profiles,
            payments,
            verifier,
            require_livemode: false,
        }
    }

    /// Rejects events sent in test mode.
    pub fn require_livemode(mut self, required: bool) -> Self {
        self.require_livemode = required;
        self
    }

    pub async fn handle(
        &self,
        cmd: HandleBillingWebhookCommand,
    ) -> Result<HandleBillingWebhookResult, WebhookError> {
        // 1. Verify signature and parse the envelope
        let event = self
            .verifier
            .verify_and_parse(&cmd.payload, &cmd.signature)
            .map_err(|e| {
                tracing::warn!(error = %e, "Rejected billing webhook");
                e
            })?;

        tracing::info!(event_id = %event.id, event_type = %event.event_type, "Billing webhook received");

        // 2. Mode check
        if self.require_livemode && !event.livemode {
            tracing::warn!(event_id = %event.id, "Test-mode event rejected");
            return Err(WebhookError::LivemodeMismatch(event.livemode));
        }

        // 3. Narrow to a typed event and plan the mutation
        let billing_event = BillingEvent::from_stripe(&event)?;
        let reconciliation = match self.plan(billing_event).await? {
            Ok(reconciliation) => reconciliation,
            Err(reason) => {
                tracing::info!(event_id = %event.id, reason = %reason, "Billing webhook ignored");
                return Ok(HandleBillingWebhookResult::Ignored {
                    event_id: event.id,
                    reason,
                });
            }
        };

        // 4. Apply
        let rows = self
            .profiles
            .apply_billing(&reconciliation.selector, &reconciliation.columns())
            .await
            .map_err(|e| {
                tracing::error!(event_id = %event.id, error = %e, "Billing reconciliation failed");
                WebhookError::Database(e.to_string())
            })?;

        let mutations: Vec<&'static str> =
            reconciliation.mutations.iter().map(|m| m.name()).collect();

        if rows == 0 {
            tracing::warn!(
                event_id = %event.id,
                selector = %reconciliation.selector,
                "No profile matched billing event"
            );
        } else {
            tracing::info!(event_id = %event.id, ?mutations, rows, "Billing reconciled");
        }

        Ok(HandleBillingWebhookResult::Reconciled {
            event_id: event.id,
            mutations,
            rows,
        })
    }

    /// Maps an event to its reconciliation, or to the reason it is ignored.
    async fn plan(
        &self,
        event: BillingEvent,
    ) -> Result<Result<Reconciliation, String>, WebhookError> {
        let plan = match event {
            BillingEvent::CustomerCreated { customer_id, email } => match email {
                Some(email) => Ok(Reconciliation::single(
                    ProfileSelector::Email(email),
                    BillingMutation::AttachCustomer { customer_id },
                )),
                None => Err("customer has no email".to_string()),
            },

            BillingEvent::CheckoutCompleted {
                subscription_mode: false,
                ..
            } => Err("checkout session is not in subscription mode".to_string()),

            BillingEvent::CheckoutCompleted {
                customer_id,
                subscription_id,
                user_id,
                email,
                ..
            } => {
                let subscription_id =
                    subscription_id.ok_or(WebhookError::MissingField("subscription"))?;
                let snapshot = self
                    .payments
                    .get_subscription(&subscription_id)
                    .await
                    .map_err(|e| {
                        tracing::error!(subscription_id = %subscription_id, error = %e, "Subscription lookup failed");
                        WebhookError::PaymentProvider(e.to_string())
                    })?;

                let customer_id = customer_id.unwrap_or_else(|| snapshot.customer_id.clone());
                let selector = match (user_id, email) {
                    (Some(user_id), _) => ProfileSelector::UserId(user_id),
                    (None, Some(email)) => ProfileSelector::Email(email),
                    (None, None) => ProfileSelector::CustomerId(customer_id.clone()),
                };

                Ok(Reconciliation {
                    selector,
                    mutations: vec![
                        BillingMutation::AttachCustomer { customer_id },
                        BillingMutation::SyncSubscription(snapshot),
                    ],
                })
            }

            BillingEvent::SubscriptionChanged(snapshot) => Ok(Reconciliation::single(
                ProfileSelector::CustomerId(snapshot.customer_id.clone()),
                BillingMutation::SyncSubscription(snapshot),
            )),

            BillingEvent::SubscriptionDeleted { customer_id, .. } => Ok(Reconciliation::single(
                ProfileSelector::CustomerId(customer_id),
                BillingMutation::ClearSubscription,
            )),

            BillingEvent::InvoicePaymentSucceeded { customer_id, .. } => {
                Ok(Reconciliation::single(
                    ProfileSelector::CustomerId(customer_id),
                    BillingMutation::MarkPaid,
                ))
            }

            BillingEvent::InvoicePaymentFailed { customer_id, .. } => Ok(Reconciliation::single(
                ProfileSelector::CustomerId(customer_id),
                BillingMutation::MarkUnpaid,
            )),

            BillingEvent::Unhandled { event_type } => {
                Err(format!("unhandled event type {}", event_type))
            }
        };

        Ok(plan)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryProfileRepository;
    use crate::adapters::stripe::MockPaymentProvider;
    use crate::domain::billing::{sign_payload, SubscriptionSnapshot, SubscriptionStatus};
    use crate::domain::foundation::{Timestamp, UserId};
    use crate::domain::profile::{Entitlements, UserProfile};
    use crate::ports::PaymentError;
    use proptest::prelude::*;
    use secrecy::SecretString;
    use serde_json::json;

    const SECRET: &str = "whsec_test_secret";

    struct Fixture {
        handler: HandleBillingWebhookHandler,
        profiles: InMemoryProfileRepository,
        payments: MockPaymentProvider,
    }

    fn fixture() -> Fixture {
        let profiles = InMemoryProfileRepository::new();
        let payments = MockPaymentProvider::new();
        let handler = HandleBillingWebhookHandler::new(
            Arc::new(profiles.clone()),
            Arc::new(payments.clone()),
            StripeWebhookVerifier::new(SecretString::new(SECRET.to_string())),
        );
        Fixture {
            handler,
            profiles,
            payments,
        }
    }

    fn event(event_type: &str, object: serde_json::Value) -> Vec<u8> {
        serde_json::to_vec(&json!({
            "id": "evt_1",
            "type": event_type,
            "created": 1_704_067_200,
            "livemode": false,
            "data": { "object": object }
        }))
        .unwrap()
    }

    fn signed(payload: Vec<u8>) -> HandleBillingWebhookCommand {
        let signature = sign_payload(SECRET, chrono::Utc::now().timestamp(), &payload);
        HandleBillingWebhookCommand { payload, signature }
    }

    async fn seed_customer(profiles: &InMemoryProfileRepository, customer_id: &str) -> UserId {
        let mut profile = UserProfile::new(UserId::new(), "pm@fund.example", Timestamp::now());
        profile.stripe_customer_id = Some(customer_id.to_string());
        let id = profile.id;
        profiles.insert(profile).await;
        id
    }

    fn subscription_object(status: &str) -> serde_json::Value {
        json!({
            "id": "sub_1",
            "customer": "cus_1",
            "status": status,
            "cancel_at_period_end": false,
            "current_period_start": 1_704_067_200,
            "current_period_end": 4_102_444_800_i64,
            "items": { "data": [ { "id": "si_1", "price": { "id": "price_monthly" } } ] }
        })
    }

    // ══════════════════════════════════════════════════════════════
    // Authenticity
    // ══════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn invalid_signature_mutates_nothing() {
        let f = fixture();
        let id = seed_customer(&f.profiles, "cus_1").await;
        let before = f.profiles.get(&id).await.unwrap();

        let payload = event("invoice.payment_succeeded", json!({ "id": "in_1", "customer": "cus_1" }));
        let signature = sign_payload("whsec_other", chrono::Utc::now().timestamp(), &payload);
        let err = f
            .handler
            .handle(HandleBillingWebhookCommand { payload, signature })
            .await
            .unwrap_err();

        assert!(err.is_signature_failure());
        assert_eq!(err.status_code(), http::StatusCode::BAD_REQUEST);
        assert_eq!(f.profiles.get(&id).await.unwrap(), before);
    }

    #[tokio::test]
    async fn test_mode_event_rejected_when_live_required() {
        let f = fixture();
        let handler = f.handler.require_livemode(true);

        let err = handler
            .handle(signed(event("invoice.payment_succeeded", json!({ "id": "in_1", "customer": "cus_1" }))))
            .await
            .unwrap_err();
        assert!(matches!(err, WebhookError::LivemodeMismatch(false)));
    }

    // ══════════════════════════════════════════════════════════════
    // Event kinds
    // ══════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn payment_succeeded_marks_customer_paid() {
        let f = fixture();
        let id = seed_customer(&f.profiles, "cus_1").await;

        let result = f
            .handler
            .handle(signed(event(
                "invoice.payment_succeeded",
                json!({ "id": "in_1", "customer": "cus_1" }),
            )))
            .await
            .unwrap();

        assert!(matches!(result, HandleBillingWebhookResult::Reconciled { rows: 1, .. }));
        let profile = f.profiles.get(&id).await.unwrap();
        assert!(profile.has_paid);
        assert_eq!(profile.entitlements, Entitlements::premium());
    }

    #[tokio::test]
    async fn payment_failed_revokes_access() {
        let f = fixture();
        let id = seed_customer(&f.profiles, "cus_1").await;
        f.handler
            .handle(signed(event("invoice.payment_succeeded", json!({ "id": "in_1", "customer": "cus_1" }))))
            .await
            .unwrap();

        f.handler
            .handle(signed(event("invoice.payment_failed", json!({ "id": "in_2", "customer": "cus_1" }))))
            .await
            .unwrap();

        let profile = f.profiles.get(&id).await.unwrap();
        assert!(!profile.has_paid);
        assert!(profile.entitlements.is_empty());
    }

    #[tokio::test]
    async fn customer_created_attaches_by_email() {
        let f = fixture();
        let profile = UserProfile::new(UserId::new(), "pm@fund.example", Timestamp::now());
        let id = profile.id;
        f.profiles.insert(profile).await;

        f.handler
            .handle(signed(event(
                "customer.created",
                json!({ "id": "cus_9", "email": "PM@fund.example" }),
            )))
            .await
            .unwrap();

        assert_eq!(
            f.profiles.get(&id).await.unwrap().stripe_customer_id.as_deref(),
            Some("cus_9")
        );
    }

    #[tokio::test]
    async fn customer_without_email_is_ignored() {
        let f = fixture();
        let result = f
            .handler
            .handle(signed(event("customer.created", json!({ "id": "cus_9" }))))
            .await
            .unwrap();
        assert!(matches!(result, HandleBillingWebhookResult::Ignored { .. }));
    }

    #[tokio::test]
    async fn subscription_updated_syncs_columns() {
        let f = fixture();
        let id = seed_customer(&f.profiles, "cus_1").await;

        f.handler
            .handle(signed(event("customer.subscription.updated", subscription_object("trialing"))))
            .await
            .unwrap();

        let profile = f.profiles.get(&id).await.unwrap();
        assert_eq!(profile.subscription_id.as_deref(), Some("sub_1"));
        assert_eq!(profile.subscription_status, Some(SubscriptionStatus::Trialing));
        assert_eq!(profile.subscription_plan_id.as_deref(), Some("price_monthly"));
        assert!(profile.has_paid);
        assert_eq!(profile.entitlements, Entitlements::premium());
    }

    #[tokio::test]
    async fn subscription_past_due_clears_paid_flag() {
        let f = fixture();
        let id = seed_customer(&f.profiles, "cus_1").await;

        f.handler
            .handle(signed(event("customer.subscription.updated", subscription_object("past_due"))))
            .await
            .unwrap();

        let profile = f.profiles.get(&id).await.unwrap();
        assert_eq!(profile.subscription_status, Some(SubscriptionStatus::PastDue));
        assert!(!profile.has_paid);
        assert!(profile.entitlements.is_empty());
    }

    #[tokio::test]
    async fn subscription_deleted_clears_everything() {
        let f = fixture();
        let id = seed_customer(&f.profiles, "cus_1").await;
        f.handler
            .handle(signed(event("customer.subscription.created", subscription_object("active"))))
            .await
            .unwrap();

        f.handler
            .handle(signed(event("customer.subscription.deleted", subscription_object("canceled"))))
            .await
            .unwrap();

        let profile = f.profiles.get(&id).await.unwrap();
        assert_eq!(profile.subscription_id, None);
        assert_eq!(profile.subscription_status, None);
        assert!(!profile.has_paid);
        assert!(profile.entitlements.is_empty());
        assert_eq!(profile.stripe_customer_id.as_deref(), Some("cus_1"));
    }

    #[tokio::test]
    async fn checkout_completed_fetches_subscription_and_links_user() {
        let f = fixture();
        let profile = UserProfile::new(UserId::new(), "pm@fund.example", Timestamp::now());
        let id = profile.id;
        f.profiles.insert(profile).await;
        f.payments.add_subscription(SubscriptionSnapshot {
            subscription_id: "sub_1".to_string(),
            customer_id: "cus_1".to_string(),
            status: SubscriptionStatus::Active,
            plan_id: Some("price_monthly".to_string()),
            current_period_start: None,
            current_period_end: Timestamp::from_unix_secs(4_102_444_800),
            cancel_at_period_end: false,
        });

        let result = f
            .handler
            .handle(signed(event(
                "checkout.session.completed",
                json!({
                    "id": "cs_1",
                    "mode": "subscription",
                    "customer": "cus_1",
                    "subscription": "sub_1",
                    "client_reference_id": id.to_string()
                }),
            )))
            .await
            .unwrap();

        assert_eq!(
            result,
            HandleBillingWebhookResult::Reconciled {
                event_id: "evt_1".to_string(),
                mutations: vec!["attach_customer", "sync_subscription"],
                rows: 1,
            }
        );
        let profile = f.profiles.get(&id).await.unwrap();
        assert_eq!(profile.stripe_customer_id.as_deref(), Some("cus_1"));
        assert_eq!(profile.subscription_status, Some(SubscriptionStatus::Active));
        assert!(profile.has_paid);
    }

    #[tokio::test]
    async fn one_off_checkout_is_ignored() {
        let f = fixture();
        let result = f
            .handler
            .handle(signed(event(
                "checkout.session.completed",
                json!({ "id": "cs_1", "mode": "payment", "customer": "cus_1" }),
            )))
            .await
            .unwrap();

        assert!(matches!(result, HandleBillingWebhookResult::Ignored { .. }));
        assert!(!f.payments.was_called("get_subscription"));
    }

    #[tokio::test]
    async fn processor_outage_is_retryable() {
        let f = fixture();
        f.payments
            .set_method_error("get_subscription", PaymentError::network("connection reset"));

        let err = f
            .handler
            .handle(signed(event(
                "checkout.session.completed",
                json!({ "id": "cs_1", "mode": "subscription", "customer": "cus_1", "subscription": "sub_1" }),
            )))
            .await
            .unwrap_err();

        assert!(err.is_retryable());
        assert_eq!(err.status_code(), http::StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn unmatched_customer_is_acknowledged() {
        let f = fixture();
        let result = f
            .handler
            .handle(signed(event(
                "invoice.payment_succeeded",
                json!({ "id": "in_1", "customer": "cus_unknown" }),
            )))
            .await
            .unwrap();
        assert!(matches!(result, HandleBillingWebhookResult::Reconciled { rows: 0, .. }));
    }

    #[tokio::test]
    async fn unknown_event_type_is_ignored() {
        let f = fixture();
        let result = f
            .handler
            .handle(signed(event("charge.refunded", json!({ "id": "ch_1" }))))
            .await
            .unwrap();
        assert!(matches!(result, HandleBillingWebhookResult::Ignored { .. }));
    }

    // ══════════════════════════════════════════════════════════════
    // Idempotence
    // ══════════════════════════════════════════════════════════════

    fn status_strategy() -> impl Strategy<Value = &'static str> {
        prop::sample::select(vec![
            "active",
            "trialing",
            "past_due",
            "canceled",
            "unpaid",
            "incomplete",
            "incomplete_expired",
            "paused",
        ])
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn replayed_subscription_update_converges(status in status_strategy(), cancel in any::<bool>()) {
            let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap();
            runtime.block_on(async {
                let f = fixture();
                let id = seed_customer(&f.profiles, "cus_1").await;
                let mut object = subscription_object(status);
                object["cancel_at_period_end"] = json!(cancel);
                let payload = event("customer.subscription.updated", object);

                f.handler.handle(signed(payload.clone())).await.unwrap();
                let once = f.profiles.get(&id).await.unwrap();
                f.handler.handle(signed(payload)).await.unwrap();
                let twice = f.profiles.get(&id).await.unwrap();

                let mut once_cmp = once.clone();
                once_cmp.updated_at = twice.updated_at;
                prop_assert_eq!(once_cmp, twice.clone());
                prop_assert_eq!(twice.has_paid, status == "active" || status == "trialing");
                Ok::<(), TestCaseError>(())
            })?;
        }
    }
}
