use serde::Deserialize;

use crate::domain::foundation::ValidationError;

/// Text the user must type to confirm a deletion request.
pub const DELETE_CONFIRMATION: &str = "DELETE";

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DeletionRequestForm {
    #[serde(default)]
    pub confirmation: Option<String>,
    #[serde(default)]
    pub reason: Option<String>,
}

/// A confirmed deletion request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletionRequest {
    pub reason: Option<String>,
}

impl DeletionRequestForm {
    pub fn validate(self) -> Result<DeletionRequest, ValidationError> {
        match self.confirmation.as_deref().map(str::trim) {
            None | Some("") => Err(ValidationError::empty_field("confirmation")),
            Some(DELETE_CONFIRMATION) => Ok(DeletionRequest {
                reason: self
                    .reason
                    .map(|r| r.trim().to_string())
                    .filter(|r| !r.is_empty()),
            }),
            Some(_) => Err(ValidationError::invalid_format(
                "confirmation",
                format!("type {} to confirm", DELETE_CONFIRMATION),
            )),
        }
    }
}

impl DeletionRequest {
    pub fn as_details(&self) -> serde_json::Value {
        serde_json::json!({ "reason": self.reason })
    }
}
