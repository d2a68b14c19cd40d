//! RequestDeletionHandler - files a pending account deletion request.

use std::sync::Arc;

use crate::domain::foundation::{DomainError, Timestamp, UserId};
use crate::domain::privacy::{DeletionRequestForm, PrivacyRequest, PrivacyRequestType};
use crate::ports::PrivacyRequestRepository;

#[derive(Debug, Clone)]
pub struct RequestDeletionCommand {
    pub user_id: UserId,
    pub form: DeletionRequestForm,
}

/// Appends a pending `data_deletion` row. The profile is left untouched;
/// operators process the request outside this service.
pub struct RequestDeletionHandler {
    requests: Arc<dyn PrivacyRequestRepository>,
}

impl RequestDeletionHandler {
    pub fn new(requests: Arc<dyn PrivacyRequestRepository>) -> Self {
        Self { requests }
    }

    pub async fn handle(&self, cmd: RequestDeletionCommand) -> Result<PrivacyRequest, DomainError> {
        let deletion = cmd.form.validate()?;

        let request = PrivacyRequest::pending(
            cmd.user_id,
            PrivacyRequestType::DataDeletion,
            deletion.as_details(),
            Timestamp::now(),
        );
        self.requests.append(&request).await?;

        tracing::info!(user_id = %cmd.user_id, request_id = %request.id, "Deletion requested");
        Ok(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryPrivacyRequestRepository;
    use crate::domain::foundation::ErrorCode;
    use crate::domain::privacy::PrivacyRequestStatus;

    fn form(confirmation: &str) -> DeletionRequestForm {
        DeletionRequestForm {
            confirmation: Some(confirmation.to_string()),
            reason: Some("Switching providers".to_string()),
        }
    }

    #[tokio::test]
    async fn confirmed_request_is_pending() {
        let requests = InMemoryPrivacyRequestRepository::new();
        let handler = RequestDeletionHandler::new(Arc::new(requests.clone()));
        let user_id = UserId::new();

        let request = handler
            .handle(RequestDeletionCommand {
                user_id,
                form: form("DELETE"),
            })
            .await
            .unwrap();

        assert_eq!(request.status, PrivacyRequestStatus::Pending);
        assert_eq!(request.completed_at, None);
        assert_eq!(request.details["reason"], "Switching providers");
        assert_eq!(requests.list_for_user(&user_id).await.unwrap(), vec![request]);
    }

    #[tokio::test]
    async fn wrong_confirmation_is_rejected() {
        let requests = InMemoryPrivacyRequestRepository::new();
        let handler = RequestDeletionHandler::new(Arc::new(requests.clone()));

        let err = handler
            .handle(RequestDeletionCommand {
                user_id: UserId::new(),
                form: form("delete"),
            })
            .await
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::InvalidFormat);
        assert!(requests.all().await.is_empty());
    }
}
