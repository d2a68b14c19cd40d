//! Billing domain: webhook verification and subscription reconciliation.
//!
//! Billing events arrive from the payment processor, are verified and
//! narrowed into [`BillingEvent`]s, then turned into [`BillingMutation`]s
//! that overwrite the billing columns of one profile row.

mod billing_event;
mod reconciliation;
pub mod stripe_event;
mod subscription_status;
mod webhook_errors;
mod webhook_verifier;

pub use billing_event::BillingEvent;
pub use reconciliation::{
    BillingColumns, BillingMutation, ProfileSelector, SubscriptionColumns, SubscriptionSnapshot,
};
pub use stripe_event::StripeEvent;
pub use subscription_status::SubscriptionStatus;
pub use webhook_errors::WebhookError;
pub use webhook_verifier::{
    sign_payload, SignatureHeader, StripeWebhookVerifier, DEFAULT_TOLERANCE_SECS,
};
