//! Append-only log of user-initiated data-rights requests.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::{
    PrivacyRequestId, StateMachine, Timestamp, UserId, ValidationError,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrivacyRequestType {
    DataExport,
    DataDeletion,
    ConsentUpdate,
}

impl PrivacyRequestType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PrivacyRequestType::DataExport => "data_export",
            PrivacyRequestType::DataDeletion => "data_deletion",
            PrivacyRequestType::ConsentUpdate => "consent_update",
        }
    }
}

impl fmt::Display for PrivacyRequestType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PrivacyRequestType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "data_export" => Ok(PrivacyRequestType::DataExport),
            "data_deletion" => Ok(PrivacyRequestType::DataDeletion),
            "consent_update" => Ok(PrivacyRequestType::ConsentUpdate),
            other => Err(ValidationError::invalid_format(
                "request_type",
                format!("unknown privacy request type '{}'", other),
            )),
        }
    }
}

/// Processing status. Transitions happen outside this service, by operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrivacyRequestStatus {
    Pending,
    Processing,
    Completed,
    Rejected,
}

impl PrivacyRequestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PrivacyRequestStatus::Pending => "pending",
            PrivacyRequestStatus::Processing => "processing",
            PrivacyRequestStatus::Completed => "completed",
            PrivacyRequestStatus::Rejected => "rejected",
        }
    }
}

impl FromStr for PrivacyRequestStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(PrivacyRequestStatus::Pending),
            "processing" => Ok(PrivacyRequestStatus::Processing),
            "completed" => Ok(PrivacyRequestStatus::Completed),
            "rejected" => Ok(PrivacyRequestStatus::Rejected),
            other => Err(ValidationError::invalid_format(
                "status",
                format!("unknown privacy request status '{}'", other),
            )),
        }
    }
}

impl StateMachine for PrivacyRequestStatus {
    fn valid_transitions(&self) -> Vec<Self> {
        use PrivacyRequestStatus::*;
        match self {
            Pending => vec![Processing],
            Processing => vec![Completed, Rejected],
            Completed | Rejected => vec![],
        }
    }
}

/// One row of `privacy_requests`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrivacyRequest {
    pub id: PrivacyRequestId,
    pub user_id: UserId,
    pub request_type: PrivacyRequestType,
    pub status: PrivacyRequestStatus,
    pub details: serde_json::Value,
    pub created_at: Timestamp,
    pub completed_at: Option<Timestamp>,
}

impl PrivacyRequest {
    /// A request awaiting operator action.
    pub fn pending(
        user_id: UserId,
        request_type: PrivacyRequestType,
        details: serde_json::Value,
        now: Timestamp,
    ) -> Self {
        Self {
            id: PrivacyRequestId::new(),
            user_id,
            request_type,
            status: PrivacyRequestStatus::Pending,
            details,
            created_at: now,
            completed_at: None,
        }
    }

    /// A request fulfilled synchronously by the action that created it.
    pub fn completed(
        user_id: UserId,
        request_type: PrivacyRequestType,
        details: serde_json::Value,
        now: Timestamp,
    ) -> Self {
        Self {
            status: PrivacyRequestStatus::Completed,
            completed_at: Some(now),
            ..Self::pending(user_id, request_type, details, now)
        }
    }

    /// Moves the request along its lifecycle, stamping completion on terminal states.
    pub fn advance(
        &mut self,
        target: PrivacyRequestStatus,
        now: Timestamp,
    ) -> Result<(), ValidationError> {
        self.status = self.status.transition_to(target)?;
        if self.status.is_terminal() {
            self.completed_at = Some(now);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pending_request_has_no_completion_time() {
        let req = PrivacyRequest::pending(
            UserId::new(),
            PrivacyRequestType::DataDeletion,
            serde_json::json!({}),
            Timestamp::now(),
        );
        assert_eq!(req.status, PrivacyRequestStatus::Pending);
        assert!(req.completed_at.is_none());
    }

    #[test]
    fn completed_request_is_stamped() {
        let now = Timestamp::now();
        let req = PrivacyRequest::completed(
            UserId::new(),
            PrivacyRequestType::DataExport,
            serde_json::json!({}),
            now,
        );
        assert_eq!(req.status, PrivacyRequestStatus::Completed);
        assert_eq!(req.completed_at, Some(now));
    }

    #[test]
    fn advance_follows_lifecycle() {
        let now = Timestamp::now();
        let mut req = PrivacyRequest::pending(
            UserId::new(),
            PrivacyRequestType::DataDeletion,
            serde_json::json!({}),
            now,
        );

        req.advance(PrivacyRequestStatus::Processing, now).unwrap();
        assert!(req.completed_at.is_none());
        req.advance(PrivacyRequestStatus::Rejected, now).unwrap();
        assert_eq!(req.completed_at, Some(now));
    }

    #[test]
    fn pending_cannot_jump_to_completed() {
        let mut req = PrivacyRequest::pending(
            UserId::new(),
            PrivacyRequestType::DataDeletion,
            serde_json::json!({}),
            Timestamp::now(),
        );
        assert!(req
            .advance(PrivacyRequestStatus::Completed, Timestamp::now())
            .is_err());
        assert_eq!(req.status, PrivacyRequestStatus::Pending);
    }

    #[test]
    fn terminal_statuses() {
        assert!(PrivacyRequestStatus::Completed.is_terminal());
        assert!(PrivacyRequestStatus::Rejected.is_terminal());
        assert!(!PrivacyRequestStatus::Pending.is_terminal());
    }

    #[test]
    fn request_type_roundtrips_through_str() {
        for t in [
            PrivacyRequestType::DataExport,
            PrivacyRequestType::DataDeletion,
            PrivacyRequestType::ConsentUpdate,
        ] {
            assert_eq!(t.as_str().parse::<PrivacyRequestType>(), Ok(t));
        }
    }
}
