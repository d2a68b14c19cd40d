//! In-memory profile store.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::billing::{BillingColumns, ProfileSelector};
use crate::domain::foundation::{DomainError, Timestamp, UserId};
use crate::domain::privacy::PrivacyPreferences;
use crate::domain::profile::{ProfileDetails, UserProfile};
use crate::ports::ProfileRepository;

#[derive(Debug, Clone, Default)]
pub struct InMemoryProfileRepository {
    profiles: Arc<RwLock<HashMap<UserId, UserProfile>>>,
}

impl InMemoryProfileRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds or replaces a profile.
    pub async fn insert(&self, profile: UserProfile) {
        self.profiles.write().await.insert(profile.id, profile);
    }

    pub async fn get(&self, id: &UserId) -> Option<UserProfile> {
        self.profiles.read().await.get(id).cloned()
    }

    pub async fn count(&self) -> usize {
        self.profiles.read().await.len()
    }
}

fn matches(profile: &UserProfile, selector: &ProfileSelector) -> bool {
    match selector {
        ProfileSelector::UserId(id) => profile.id == *id,
        ProfileSelector::Email(email) => profile.email.eq_ignore_ascii_case(email),
        ProfileSelector::CustomerId(customer_id) => {
            profile.stripe_customer_id.as_deref() == Some(customer_id.as_str())
        }
    }
}

#[async_trait]
impl ProfileRepository for InMemoryProfileRepository {
    async fn find_by_id(&self, id: &UserId) -> Result<Option<UserProfile>, DomainError> {
        Ok(self.profiles.read().await.get(id).cloned())
    }

    async fn upsert_details(
        &self,
        id: &UserId,
        email: &str,
        details: &ProfileDetails,
    ) -> Result<(), DomainError> {
        let now = Timestamp::now();
        let mut profiles = self.profiles.write().await;
        let profile = profiles
            .entry(*id)
            .or_insert_with(|| UserProfile::new(*id, email, now));
        profile.email = email.to_string();
        profile.apply_details(details, now);
        Ok(())
    }

    async fn apply_billing(
        &self,
        selector: &ProfileSelector,
        columns: &BillingColumns,
    ) -> Result<u64, DomainError> {
        let now = Timestamp::now();
        let mut matched = 0;
        for profile in self.profiles.write().await.values_mut() {
            if matches(profile, selector) {
                profile.apply_billing(columns, now);
                matched += 1;
            }
        }
        Ok(matched)
    }

    async fn update_privacy_preferences(
        &self,
        id: &UserId,
        preferences: &PrivacyPreferences,
    ) -> Result<bool, DomainError> {
        match self.profiles.write().await.get_mut(id) {
            Some(profile) => {
                profile.apply_privacy(preferences, Timestamp::now());
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn mark_waitlist_pending(&self, id: &UserId, now: Timestamp) -> Result<bool, DomainError> {
        match self.profiles.write().await.get_mut(id) {
            Some(profile) => {
                profile.join_waitlist(now);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
