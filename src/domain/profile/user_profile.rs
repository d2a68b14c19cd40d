//! The `user_profiles` row.

use serde::{Deserialize, Serialize};

use crate::domain::billing::{BillingColumns, SubscriptionStatus};
use crate::domain::foundation::{Timestamp, UserId};
use crate::domain::privacy::PrivacyPreferences;
use crate::domain::waitlist::WaitlistStatus;

use super::{Entitlements, OrganizationType};

/// Contact and firm details collected at sign-up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileDetails {
    pub first_name: String,
    pub last_name: String,
    pub organization_name: String,
    pub organization_type: OrganizationType,
    pub job_title: Option<String>,
    pub phone: Option<String>,
}

/// One row per authenticated identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: UserId,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub organization_name: Option<String>,
    pub organization_type: Option<OrganizationType>,
    pub job_title: Option<String>,
    pub phone: Option<String>,

    pub stripe_customer_id: Option<String>,
    pub subscription_id: Option<String>,
    pub subscription_status: Option<SubscriptionStatus>,
    pub subscription_plan_id: Option<String>,
    pub subscription_current_period_start: Option<Timestamp>,
    pub subscription_current_period_end: Option<Timestamp>,
    pub subscription_cancel_at_period_end: bool,
    pub has_paid: bool,
    pub entitlements: Entitlements,

    pub privacy: PrivacyPreferences,

    pub waitlist_status: Option<WaitlistStatus>,
    pub waitlist_joined_at: Option<Timestamp>,

    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl UserProfile {
    /// A fresh profile with no billing, consent or waitlist state.
    pub fn new(id: UserId, email: impl Into<String>, now: Timestamp) -> Self {
        Self {
            id,
            email: email.into(),
            first_name: None,
            last_name: None,
            organization_name: None,
            organization_type: None,
            job_title: None,
            phone: None,
            stripe_customer_id: None,
            subscription_id: None,
            subscription_status: None,
            subscription_plan_id: None,
            subscription_current_period_start: None,
            subscription_current_period_end: None,
            subscription_cancel_at_period_end: false,
            has_paid: false,
            entitlements: Entitlements::none(),
            privacy: PrivacyPreferences::default(),
            waitlist_status: None,
            waitlist_joined_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Overwrites contact and firm details, as sign-up does.
    pub fn apply_details(&mut self, details: &ProfileDetails, now: Timestamp) {
        self.first_name = Some(details.first_name.clone());
        self.last_name = Some(details.last_name.clone());
        self.organization_name = Some(details.organization_name.clone());
        self.organization_type = Some(details.organization_type);
        self.job_title = details.job_title.clone();
        self.phone = details.phone.clone();
        self.updated_at = now;
    }

    /// Overwrites the billing columns that are set in `columns`.
    pub fn apply_billing(&mut self, columns: &BillingColumns, now: Timestamp) {
        if let Some(customer_id) = &columns.stripe_customer_id {
            self.stripe_customer_id = Some(customer_id.clone());
        }
        if let Some(sub) = &columns.subscription {
            self.subscription_id = sub.subscription_id.clone();
            self.subscription_status = sub.status;
            self.subscription_plan_id = sub.plan_id.clone();
            self.subscription_current_period_start = sub.current_period_start;
            self.subscription_current_period_end = sub.current_period_end;
            self.subscription_cancel_at_period_end = sub.cancel_at_period_end;
        }
        if let Some(has_paid) = columns.has_paid {
            self.has_paid = has_paid;
        }
        if let Some(entitlements) = &columns.entitlements {
            self.entitlements = entitlements.clone();
        }
        self.updated_at = now;
    }

    pub fn apply_privacy(&mut self, preferences: &PrivacyPreferences, now: Timestamp) {
        self.privacy = preferences.clone();
        self.updated_at = now;
    }

    /// Marks the profile as waiting; the first join time is kept.
    pub fn join_waitlist(&mut self, now: Timestamp) {
        self.waitlist_status = Some(WaitlistStatus::Pending);
        if self.waitlist_joined_at.is_none() {
            self.waitlist_joined_at = Some(now);
        }
        self.updated_at = now;
    }

    pub fn display_name(&self) -> String {
        match (&self.first_name, &self.last_name) {
            (Some(first), Some(last)) => format!("{} {}", first, last),
            (Some(first), None) => first.clone(),
            _ => self.email.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::billing::{BillingMutation, SubscriptionSnapshot};

    fn profile() -> UserProfile {
        UserProfile::new(UserId::new(), "pm@fund.example", Timestamp::now())
    }

    #[test]
    fn new_profile_has_no_access_state() {
        let p = profile();
        assert!(!p.has_paid);
        assert!(p.entitlements.is_empty());
        assert!(p.subscription_status.is_none());
    }

    #[test]
    fn apply_billing_leaves_unset_columns_alone() {
        let mut p = profile();
        p.stripe_customer_id = Some("cus_1".to_string());
        p.apply_billing(&BillingMutation::MarkPaid.columns(), Timestamp::now());

        assert_eq!(p.stripe_customer_id.as_deref(), Some("cus_1"));
        assert!(p.has_paid);
        assert_eq!(p.entitlements, Entitlements::premium());
    }

    #[test]
    fn clear_subscription_wipes_subscription_fields() {
        let mut p = profile();
        let snapshot = SubscriptionSnapshot {
            subscription_id: "sub_1".to_string(),
            customer_id: "cus_1".to_string(),
            status: SubscriptionStatus::Active,
            plan_id: Some("price_pro".to_string()),
            current_period_start: Some(Timestamp::now()),
            current_period_end: Some(Timestamp::now().add_days(30)),
            cancel_at_period_end: true,
        };
        p.apply_billing(
            &BillingMutation::SyncSubscription(snapshot).columns(),
            Timestamp::now(),
        );
        p.apply_billing(&BillingMutation::ClearSubscription.columns(), Timestamp::now());

        assert!(p.subscription_id.is_none());
        assert!(p.subscription_status.is_none());
        assert!(p.subscription_current_period_end.is_none());
        assert!(!p.subscription_cancel_at_period_end);
        assert!(!p.has_paid);
        assert!(p.entitlements.is_empty());
    }

    #[test]
    fn join_waitlist_keeps_first_join_time() {
        let mut p = profile();
        let first = Timestamp::now();
        p.join_waitlist(first);
        p.join_waitlist(first.add_days(3));

        assert_eq!(p.waitlist_status, Some(WaitlistStatus::Pending));
        assert_eq!(p.waitlist_joined_at, Some(first));
    }

    #[test]
    fn display_name_falls_back_to_email() {
        let mut p = profile();
        assert_eq!(p.display_name(), "pm@fund.example");
        p.first_name = Some("Ada".to_string());
        p.last_name = Some("Byron".to_string());
        assert_eq!(p.display_name(), "Ada Byron");
    }
}
