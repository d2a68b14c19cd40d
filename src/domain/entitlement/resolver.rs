use serde::Serialize;

use crate::domain::billing::SubscriptionStatus;
use crate::domain::foundation::Timestamp;
use crate::domain::profile::{UserProfile, PREMIUM};

/// Why access was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DenialReason {
    NotAuthenticated,
    NoProfile,
    NoActiveSubscription,
    NotEntitled,
}

impl DenialReason {
    /// Short message suitable for display to the user.
    pub fn user_message(&self) -> &'static str {
        match self {
            DenialReason::NotAuthenticated => "Please sign in to continue.",
            DenialReason::NoProfile => "We could not find your account profile.",
            DenialReason::NoActiveSubscription => {
                "An active subscription is required to view this content."
            }
            DenialReason::NotEntitled => "Your plan does not include this feature.",
        }
    }
}

/// Outcome of an entitlement check. Never an error: failures are a variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum EntitlementResult {
    Granted,
    Denied { reason: DenialReason },
    Failed { message: String },
}

impl EntitlementResult {
    pub fn denied(reason: DenialReason) -> Self {
        EntitlementResult::Denied { reason }
    }

    pub fn has_access(&self) -> bool {
        matches!(self, EntitlementResult::Granted)
    }

    /// Message explaining a refusal, `None` when granted.
    pub fn reason_message(&self) -> Option<String> {
        match self {
            EntitlementResult::Granted => None,
            EntitlementResult::Denied { reason } => Some(reason.user_message().to_string()),
            EntitlementResult::Failed { message } => Some(message.clone()),
        }
    }
}

/// Decides whether `profile` holds the entitlement `name` at `now`.
///
/// `premium` is granted by an active subscription whose period has not
/// ended, or by the paid flag. Every other name is an exact map lookup.
pub fn resolve_entitlement(profile: &UserProfile, name: &str, now: Timestamp) -> EntitlementResult {
    if name == PREMIUM {
        let active_period = profile.subscription_status == Some(SubscriptionStatus::Active)
            && profile
                .subscription_current_period_end
                .is_some_and(|end| end.is_after(&now));

        return if active_period || profile.has_paid {
            EntitlementResult::Granted
        } else {
            EntitlementResult::denied(DenialReason::NoActiveSubscription)
        };
    }

    if profile.entitlements.is_granted(name) {
        EntitlementResult::Granted
    } else {
        EntitlementResult::denied(DenialReason::NotEntitled)
    }
}
