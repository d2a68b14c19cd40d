//! Billing handlers.
//!
//! ## Commands
//! - Reconciling payment processor webhooks into profile billing columns

mod handle_billing_webhook;

// Commands
pub use handle_billing_webhook::{
    HandleBillingWebhookCommand, HandleBillingWebhookHandler, HandleBillingWebhookResult,
};
