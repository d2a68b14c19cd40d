//! Subscription handlers.
//!
//! ## Commands
//! - Opening a hosted checkout for an active price
//! - Cancelling or reactivating a subscription at period end

mod create_checkout_session;
mod error;
mod manage_subscription;

pub use error::BillingError;

// Commands
pub use create_checkout_session::{
    resolve_return_url, CreateCheckoutSessionCommand, CreateCheckoutSessionHandler,
    DEFAULT_RETURN_PATH,
};
pub use manage_subscription::{
    ManageSubscriptionCommand, ManageSubscriptionHandler, SubscriptionAction,
};
