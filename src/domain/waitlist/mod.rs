//! Early-access waitlist domain.

mod request;

pub use request::{WaitlistForm, WaitlistRequest, WaitlistStatus, WaitlistSubmission};
