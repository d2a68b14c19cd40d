//! In-memory waitlist request log.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, UserId};
use crate::domain::waitlist::WaitlistRequest;
use crate::ports::WaitlistRepository;

#[derive(Debug, Clone, Default)]
pub struct InMemoryWaitlistRepository {
    requests: Arc<RwLock<Vec<WaitlistRequest>>>,
}

impl InMemoryWaitlistRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn all(&self) -> Vec<WaitlistRequest> {
        self.requests.read().await.clone()
    }
}

#[async_trait]
impl WaitlistRepository for InMemoryWaitlistRepository {
    async fn append(&self, request: &WaitlistRequest) -> Result<(), DomainError> {
        self.requests.write().await.push(request.clone());
        Ok(())
    }

    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<WaitlistRequest>, DomainError> {
        let mut rows: Vec<WaitlistRequest> = self
            .requests
            .read()
            .await
            .iter()
            .filter(|r| r.user_id == *user_id)
            .cloned()
            .collect();
        rows.reverse();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }
}
