//! Profile repository port.
//!
//! All writes are single-row, last-write-wins overwrites.

use async_trait::async_trait;

use crate::domain::billing::{BillingColumns, ProfileSelector};
use crate::domain::foundation::{DomainError, Timestamp, UserId};
use crate::domain::privacy::PrivacyPreferences;
use crate::domain::profile::{ProfileDetails, UserProfile};

#[async_trait]
pub trait ProfileRepository: Send + Sync {
    async fn find_by_id(&self, id: &UserId) -> Result<Option<UserProfile>, DomainError>;

    /// Creates the row for a new account, or overwrites its contact details.
    async fn upsert_details(
        &self,
        id: &UserId,
        email: &str,
        details: &ProfileDetails,
    ) -> Result<(), DomainError>;

    /// Overwrites billing columns on every row matching `selector`.
    ///
    /// Returns the number of rows updated; zero is not an error.
    async fn apply_billing(
        &self,
        selector: &ProfileSelector,
        columns: &BillingColumns,
    ) -> Result<u64, DomainError>;

    /// Returns false when no row exists for `id`.
    async fn update_privacy_preferences(
        &self,
        id: &UserId,
        preferences: &PrivacyPreferences,
    ) -> Result<bool, DomainError>;

    /// Sets the waitlist status to pending, keeping the first join time.
    async fn mark_waitlist_pending(&self, id: &UserId, now: Timestamp) -> Result<bool, DomainError>;
}
