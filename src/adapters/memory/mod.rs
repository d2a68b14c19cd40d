//! In-memory adapters for the relational store ports.
//!
//! Used by unit and HTTP integration tests, and handy for local development
//! without a database.

mod catalog;
mod privacy_requests;
mod profiles;
mod reports;
mod waitlist;

pub use catalog::InMemoryCatalogReader;
pub use privacy_requests::InMemoryPrivacyRequestRepository;
pub use profiles::InMemoryProfileRepository;
pub use reports::InMemoryReportReader;
pub use waitlist::InMemoryWaitlistRepository;
