//! Store for waitlist requests.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, UserId};
use crate::domain::waitlist::WaitlistRequest;

#[async_trait]
pub trait WaitlistRepository: Send + Sync {
    async fn append(&self, request: &WaitlistRequest) -> Result<(), DomainError>;

    /// The user's requests, newest first.
    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<WaitlistRequest>, DomainError>;
}
