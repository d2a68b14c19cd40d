//! Ports - interfaces between the application core and the outside world.
//!
//! Each port is an `async_trait` with `Send + Sync` bounds so adapters can be
//! shared behind `Arc<dyn Port>` in the HTTP state.
//!
//! - `SessionValidator` / `IdentityProvider` - hosted auth service
//! - `ProfileRepository`, `PrivacyRequestRepository`, `WaitlistRepository` - relational store writes
//! - `ReportReader`, `CatalogReader` - relational store reads
//! - `PaymentProvider` - hosted payment processor

mod catalog_reader;
mod identity_provider;
mod payment_provider;
mod privacy_request_repository;
mod profile_repository;
mod report_reader;
mod session_validator;
mod waitlist_repository;

pub use catalog_reader::CatalogReader;
pub use identity_provider::{
    AuthSession, IdentityError, IdentityProvider, SignUpOutcome, SignUpRequest,
};
pub use payment_provider::{
    CheckoutSession, CreateCheckoutRequest, PaymentError, PaymentErrorCode, PaymentProvider,
};
pub use privacy_request_repository::PrivacyRequestRepository;
pub use profile_repository::ProfileRepository;
pub use report_reader::{Page, ReportReader, ReportRows};
pub use session_validator::SessionValidator;
pub use waitlist_repository::WaitlistRepository;
