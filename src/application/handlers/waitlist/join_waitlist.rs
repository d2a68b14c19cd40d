//! JoinWaitlistHandler, ListWaitlistRequestsHandler - early-access waitlist.

use std::sync::Arc;

use crate::domain::foundation::{AuthenticatedUser, DomainError, Timestamp, UserId};
use crate::domain::waitlist::{WaitlistForm, WaitlistRequest};
use crate::ports::{ProfileRepository, WaitlistRepository};

#[derive(Debug, Clone)]
pub struct JoinWaitlistCommand {
    pub user: AuthenticatedUser,
    pub form: WaitlistForm,
}

pub struct JoinWaitlistHandler {
    profiles: Arc<dyn ProfileRepository>,
    waitlist: Arc<dyn WaitlistRepository>,
}

impl JoinWaitlistHandler {
    pub fn new(profiles: Arc<dyn ProfileRepository>, waitlist: Arc<dyn WaitlistRepository>) -> Self {
        Self { profiles, waitlist }
    }

    pub async fn handle(&self, cmd: JoinWaitlistCommand) -> Result<WaitlistRequest, DomainError> {
        let submission = cmd.form.validate()?;
        let now = Timestamp::now();

        // 1. Append the request row
        let request = WaitlistRequest::new(cmd.user.id, cmd.user.email.clone(), submission, now);
        self.waitlist.append(&request).await?;

        // 2. Flag the profile
        if !self.profiles.mark_waitlist_pending(&cmd.user.id, now).await? {
            tracing::warn!(user_id = %cmd.user.id, "Waitlist request stored without a profile");
        }

        tracing::info!(user_id = %cmd.user.id, feature = %request.feature, "Joined waitlist");
        Ok(request)
    }
}

#[derive(Debug, Clone)]
pub struct ListWaitlistRequestsQuery {
    pub user_id: UserId,
}

pub struct ListWaitlistRequestsHandler {
    waitlist: Arc<dyn WaitlistRepository>,
}

impl ListWaitlistRequestsHandler {
    pub fn new(waitlist: Arc<dyn WaitlistRepository>) -> Self {
        Self { waitlist }
    }

    pub async fn handle(
        &self,
        query: ListWaitlistRequestsQuery,
    ) -> Result<Vec<WaitlistRequest>, DomainError> {
        self.waitlist.list_for_user(&query.user_id).await
    }
}
