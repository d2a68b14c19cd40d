//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers, and error types
//! used across the profile, billing, privacy, waitlist and reports domains.

mod auth;
mod errors;
mod ids;
mod state_machine;
mod timestamp;

pub use auth::{AuthError, AuthenticatedUser};
pub use errors::{DomainError, ErrorCode, ValidationError};
pub use ids::{PrivacyRequestId, ReportId, UserId, WaitlistRequestId};
pub use state_machine::StateMachine;
pub use timestamp::Timestamp;
