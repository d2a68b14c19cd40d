use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::{
    StateMachine, Timestamp, UserId, ValidationError, WaitlistRequestId,
};

const MAX_MESSAGE_LEN: usize = 2000;

/// Waitlist status, advanced by operators after a user joins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WaitlistStatus {
    Pending,
    Reviewed,
    Approved,
    Notified,
    Converted,
}

impl WaitlistStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            WaitlistStatus::Pending => "pending",
            WaitlistStatus::Reviewed => "reviewed",
            WaitlistStatus::Approved => "approved",
            WaitlistStatus::Notified => "notified",
            WaitlistStatus::Converted => "converted",
        }
    }
}

impl fmt::Display for WaitlistStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WaitlistStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(WaitlistStatus::Pending),
            "reviewed" => Ok(WaitlistStatus::Reviewed),
            "approved" => Ok(WaitlistStatus::Approved),
            "notified" => Ok(WaitlistStatus::Notified),
            "converted" => Ok(WaitlistStatus::Converted),
            other => Err(ValidationError::invalid_format(
                "waitlist_status",
                format!("unknown waitlist status '{}'", other),
            )),
        }
    }
}

impl StateMachine for WaitlistStatus {
    fn valid_transitions(&self) -> Vec<Self> {
        use WaitlistStatus::*;
        match self {
            Pending => vec![Reviewed, Approved],
            Reviewed => vec![Approved],
            Approved => vec![Notified],
            Notified => vec![Converted],
            Converted => vec![],
        }
    }
}

/// Raw waitlist form.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WaitlistForm {
    #[serde(default)]
    pub feature: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub referral_source: Option<String>,
}

/// Validated waitlist submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WaitlistSubmission {
    pub feature: String,
    pub message: Option<String>,
    pub referral_source: Option<String>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

impl WaitlistForm {
    pub fn validate(self) -> Result<WaitlistSubmission, ValidationError> {
        let feature = non_blank(self.feature).ok_or_else(|| ValidationError::empty_field("feature"))?;
        let message = non_blank(self.message);
        if message.as_ref().is_some_and(|m| m.chars().count() > MAX_MESSAGE_LEN) {
            return Err(ValidationError::invalid_format(
                "message",
                format!("must be at most {} characters", MAX_MESSAGE_LEN),
            ));
        }

        Ok(WaitlistSubmission {
            feature,
            message,
            referral_source: non_blank(self.referral_source),
        })
    }
}

/// One row of `waitlist_requests`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaitlistRequest {
    pub id: WaitlistRequestId,
    pub user_id: UserId,
    pub email: String,
    pub feature: String,
    pub message: Option<String>,
    pub referral_source: Option<String>,
    pub status: WaitlistStatus,
    pub created_at: Timestamp,
}

impl WaitlistRequest {
    pub fn new(
        user_id: UserId,
        email: impl Into<String>,
        submission: WaitlistSubmission,
        now: Timestamp,
    ) -> Self {
        Self {
            id: WaitlistRequestId::new(),
            user_id,
            email: email.into(),
            feature: submission.feature,
            message: submission.message,
            referral_source: submission.referral_source,
            status: WaitlistStatus::Pending,
            created_at: now,
        }
    }
}
