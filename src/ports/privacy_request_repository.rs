//! Append-only store for privacy requests.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, UserId};
use crate::domain::privacy::PrivacyRequest;

#[async_trait]
pub trait PrivacyRequestRepository: Send + Sync {
    async fn append(&self, request: &PrivacyRequest) -> Result<(), DomainError>;

    /// The user's requests, newest first.
    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<PrivacyRequest>, DomainError>;
}
