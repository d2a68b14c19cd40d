//! ManageSubscriptionHandler - cancel or reactivate at period end.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::domain::billing::{BillingMutation, ProfileSelector, SubscriptionSnapshot};
use crate::domain::foundation::{UserId, ValidationError};
use crate::ports::{PaymentProvider, ProfileRepository};

use super::BillingError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionAction {
    /// Stop renewing; access continues until the period ends.
    Cancel,
    /// Undo a pending cancellation.
    Reactivate,
}

impl SubscriptionAction {
    fn cancel_at_period_end(&self) -> bool {
        matches!(self, SubscriptionAction::Cancel)
    }
}

impl fmt::Display for SubscriptionAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubscriptionAction::Cancel => f.write_str("cancel"),
            SubscriptionAction::Reactivate => f.write_str("reactivate"),
        }
    }
}

impl FromStr for SubscriptionAction {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cancel" => Ok(SubscriptionAction::Cancel),
            "reactivate" => Ok(SubscriptionAction::Reactivate),
            other => Err(ValidationError::invalid_format(
                "action",
                format!("expected cancel or reactivate, got '{}'", other),
            )),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ManageSubscriptionCommand {
    pub user_id: UserId,
    pub subscription_id: String,
    pub action: SubscriptionAction,
}

pub struct ManageSubscriptionHandler {
    profiles: Arc<dyn ProfileRepository>,
    payments: Arc<dyn PaymentProvider>,
}

impl ManageSubscriptionHandler {
    pub fn new(profiles: Arc<dyn ProfileRepository>, payments: Arc<dyn PaymentProvider>) -> Self {
        Self { profiles, payments }
    }

    pub async fn handle(
        &self,
        cmd: ManageSubscriptionCommand,
    ) -> Result<SubscriptionSnapshot, BillingError> {
        let subscription_id = cmd.subscription_id.trim();
        if subscription_id.is_empty() {
            return Err(ValidationError::empty_field("subscriptionId").into());
        }

        // 1. The subscription must belong to the caller
        let profile = self
            .profiles
            .find_by_id(&cmd.user_id)
            .await?
            .ok_or(BillingError::ProfileNotFound)?;

        let current = self.payments.get_subscription(subscription_id).await?;
        let owned = profile.subscription_id.as_deref() == Some(subscription_id)
            || profile.stripe_customer_id.as_deref() == Some(current.customer_id.as_str());
        if !owned {
            tracing::warn!(user_id = %cmd.user_id, subscription_id, "Subscription belongs to another customer");
            return Err(BillingError::Forbidden);
        }

        // 2. Toggle at the processor
        let updated = self
            .payments
            .set_cancel_at_period_end(subscription_id, cmd.action.cancel_at_period_end())
            .await?;

        // 3. Reconcile the profile with what the processor returned
        let columns = BillingMutation::SyncSubscription(updated.clone()).columns();
        self.profiles
            .apply_billing(&ProfileSelector::UserId(cmd.user_id), &columns)
            .await?;

        tracing::info!(user_id = %cmd.user_id, subscription_id, action = %cmd.action, "Subscription updated");
        Ok(updated)
    }
}
