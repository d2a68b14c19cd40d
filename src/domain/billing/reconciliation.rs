//! Profile mutations derived from billing events.
//!
//! Every mutation is a full overwrite of the columns it touches, so
//! applying the same mutation twice leaves the profile unchanged.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{Timestamp, UserId};
use crate::domain::profile::Entitlements;

use super::SubscriptionStatus;

/// Processor-neutral view of a subscription at one moment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionSnapshot {
    pub subscription_id: String,
    pub customer_id: String,
    pub status: SubscriptionStatus,
    pub plan_id: Option<String>,
    pub current_period_start: Option<Timestamp>,
    pub current_period_end: Option<Timestamp>,
    pub cancel_at_period_end: bool,
}

/// How a billing mutation finds the profile row it applies to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileSelector {
    UserId(UserId),
    Email(String),
    CustomerId(String),
}

impl std::fmt::Display for ProfileSelector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProfileSelector::UserId(id) => write!(f, "user_id={}", id),
            ProfileSelector::Email(_) => write!(f, "email=<redacted>"),
            ProfileSelector::CustomerId(id) => write!(f, "stripe_customer_id={}", id),
        }
    }
}

/// Subscription columns of a profile, written together.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubscriptionColumns {
    pub subscription_id: Option<String>,
    pub status: Option<SubscriptionStatus>,
    pub plan_id: Option<String>,
    pub current_period_start: Option<Timestamp>,
    pub current_period_end: Option<Timestamp>,
    pub cancel_at_period_end: bool,
}

impl SubscriptionColumns {
    /// All subscription columns reset, as after a deletion.
    pub fn cleared() -> Self {
        Self::default()
    }
}

/// The set of billing columns a reconciliation overwrites. `None` leaves a column untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BillingColumns {
    pub stripe_customer_id: Option<String>,
    pub subscription: Option<SubscriptionColumns>,
    pub has_paid: Option<bool>,
    pub entitlements: Option<Entitlements>,
}

impl BillingColumns {
    /// Combines two column sets; columns set in `other` win.
    pub fn and(self, other: BillingColumns) -> Self {
        Self {
            stripe_customer_id: other.stripe_customer_id.or(self.stripe_customer_id),
            subscription: other.subscription.or(self.subscription),
            has_paid: other.has_paid.or(self.has_paid),
            entitlements: other.entitlements.or(self.entitlements),
        }
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

/// A single reconciliation step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BillingMutation {
    AttachCustomer { customer_id: String },
    SyncSubscription(SubscriptionSnapshot),
    ClearSubscription,
    MarkPaid,
    MarkUnpaid,
}

impl BillingMutation {
    pub fn columns(&self) -> BillingColumns {
        match self {
            BillingMutation::AttachCustomer { customer_id } => BillingColumns {
                stripe_customer_id: Some(customer_id.clone()),
                ..Default::default()
            },
            BillingMutation::SyncSubscription(snapshot) => {
                let paid = snapshot.status.grants_access();
                BillingColumns {
                    subscription: Some(SubscriptionColumns {
                        subscription_id: Some(snapshot.subscription_id.clone()),
                        status: Some(snapshot.status),
                        plan_id: snapshot.plan_id.clone(),
                        current_period_start: snapshot.current_period_start,
                        current_period_end: snapshot.current_period_end,
                        cancel_at_period_end: snapshot.cancel_at_period_end,
                    }),
                    has_paid: Some(paid),
                    entitlements: Some(if paid {
                        Entitlements::premium()
                    } else {
                        Entitlements::none()
                    }),
                    ..Default::default()
                }
            }
            BillingMutation::ClearSubscription => BillingColumns {
                subscription: Some(SubscriptionColumns::cleared()),
                has_paid: Some(false),
                entitlements: Some(Entitlements::none()),
                ..Default::default()
            },
            BillingMutation::MarkPaid => BillingColumns {
                has_paid: Some(true),
                entitlements: Some(Entitlements::premium()),
                ..Default::default()
            },
            BillingMutation::MarkUnpaid => BillingColumns {
                has_paid: Some(false),
                entitlements: Some(Entitlements::none()),
                ..Default::default()
            },
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            BillingMutation::AttachCustomer { .. } => "attach_customer",
            BillingMutation::SyncSubscription(_) => "sync_subscription",
            BillingMutation::ClearSubscription => "clear_subscription",
            BillingMutation::MarkPaid => "mark_paid",
            BillingMutation::MarkUnpaid => "mark_unpaid",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(status: SubscriptionStatus) -> SubscriptionSnapshot {
        SubscriptionSnapshot {
            subscription_id: "sub_1".to_string(),
            customer_id: "cus_1".to_string(),
            status,
            plan_id: Some("price_pro".to_string()),
            current_period_start: Some(Timestamp::now()),
            current_period_end: Some(Timestamp::now().add_days(30)),
            cancel_at_period_end: false,
        }
    }

    #[test]
    fn sync_active_grants_premium() {
        let cols = BillingMutation::SyncSubscription(snapshot(SubscriptionStatus::Active)).columns();

        assert_eq!(cols.has_paid, Some(true));
        assert_eq!(cols.entitlements, Some(Entitlements::premium()));
        let sub = cols.subscription.unwrap();
        assert_eq!(sub.status, Some(SubscriptionStatus::Active));
        assert_eq!(sub.plan_id.as_deref(), Some("price_pro"));
    }

    #[test]
    fn sync_trialing_grants_premium() {
        let cols = BillingMutation::SyncSubscription(snapshot(SubscriptionStatus::Trialing)).columns();
        assert_eq!(cols.has_paid, Some(true));
    }

    #[test]
    fn sync_past_due_revokes_premium() {
        let cols = BillingMutation::SyncSubscription(snapshot(SubscriptionStatus::PastDue)).columns();

        assert_eq!(cols.has_paid, Some(false));
        assert_eq!(cols.entitlements, Some(Entitlements::none()));
    }

    #[test]
    fn clear_subscription_resets_everything() {
        let cols = BillingMutation::ClearSubscription.columns();

        assert_eq!(cols.subscription, Some(SubscriptionColumns::cleared()));
        assert_eq!(cols.has_paid, Some(false));
        assert_eq!(cols.entitlements, Some(Entitlements::none()));
        assert!(cols.stripe_customer_id.is_none());
    }

    #[test]
    fn attach_customer_touches_only_customer_id() {
        let cols = BillingMutation::AttachCustomer {
            customer_id: "cus_9".to_string(),
        }
        .columns();

        assert_eq!(cols.stripe_customer_id.as_deref(), Some("cus_9"));
        assert!(cols.subscription.is_none());
        assert!(cols.has_paid.is_none());
        assert!(cols.entitlements.is_none());
    }

    #[test]
    fn and_keeps_columns_from_both_sides() {
        let cols = BillingMutation::AttachCustomer {
            customer_id: "cus_9".to_string(),
        }
        .columns()
        .and(BillingMutation::MarkPaid.columns());

        assert_eq!(cols.stripe_customer_id.as_deref(), Some("cus_9"));
        assert_eq!(cols.has_paid, Some(true));
    }

    #[test]
    fn selector_display_redacts_email() {
        let s = ProfileSelector::Email("pm@fund.example".to_string()).to_string();
        assert!(!s.contains("fund.example"));
    }
}
