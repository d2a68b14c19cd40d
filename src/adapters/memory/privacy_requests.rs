//! In-memory privacy request log.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, UserId};
use crate::domain::privacy::PrivacyRequest;
use crate::ports::PrivacyRequestRepository;

#[derive(Debug, Clone, Default)]
pub struct InMemoryPrivacyRequestRepository {
    requests: Arc<RwLock<Vec<PrivacyRequest>>>,
}

impl InMemoryPrivacyRequestRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn all(&self) -> Vec<PrivacyRequest> {
        self.requests.read().await.clone()
    }
}

#[async_trait]
impl PrivacyRequestRepository for InMemoryPrivacyRequestRepository {
    async fn append(&self, request: &PrivacyRequest) -> Result<(), DomainError> {
        self.requests.write().await.push(request.clone());
        Ok(())
    }

    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<PrivacyRequest>, DomainError> {
        let mut rows: Vec<PrivacyRequest> = self
            .requests
            .read()
            .await
            .iter()
            .filter(|r| r.user_id == *user_id)
            .cloned()
            .collect();
        // later appends first on equal timestamps
        rows.reverse();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }
}
