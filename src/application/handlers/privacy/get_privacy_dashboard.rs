//! GetPrivacyDashboardHandler - current consent flags and request history.

use std::sync::Arc;

use serde::Serialize;

use crate::domain::foundation::{DomainError, UserId};
use crate::domain::privacy::{PrivacyPreferences, PrivacyRequest};
use crate::ports::{PrivacyRequestRepository, ProfileRepository};

#[derive(Debug, Clone)]
pub struct GetPrivacyDashboardQuery {
    pub user_id: UserId,
}

#[derive(Debug, Clone, Serialize)]
pub struct PrivacyDashboard {
    pub preferences: PrivacyPreferences,
    /// Newest first.
    pub requests: Vec<PrivacyRequest>,
}

pub struct GetPrivacyDashboardHandler {
    profiles: Arc<dyn ProfileRepository>,
    requests: Arc<dyn PrivacyRequestRepository>,
}

impl GetPrivacyDashboardHandler {
    pub fn new(
        profiles: Arc<dyn ProfileRepository>,
        requests: Arc<dyn PrivacyRequestRepository>,
    ) -> Self {
        Self { profiles, requests }
    }

    pub async fn handle(&self, query: GetPrivacyDashboardQuery) -> Result<PrivacyDashboard, DomainError> {
        let preferences = self
            .profiles
            .find_by_id(&query.user_id)
            .await?
            .map(|p| p.privacy)
            .unwrap_or_default();
        let requests = self.requests.list_for_user(&query.user_id).await?;

        Ok(PrivacyDashboard {
            preferences,
            requests,
        })
    }
}
