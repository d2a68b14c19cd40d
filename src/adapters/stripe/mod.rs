//! Stripe payment provider adapter.
//!
//! Implements the `PaymentProvider` port for Stripe:
//! - Live subscription reads
//! - Hosted checkout sessions
//! - Cancel-at-period-end toggling
//!
//! Webhook signature verification lives with the billing domain
//! (`domain::billing::StripeWebhookVerifier`) since it needs no network access.

mod mock_payment_provider;
mod stripe_adapter;

pub use mock_payment_provider::MockPaymentProvider;
pub use stripe_adapter::{StripeConfig, StripePaymentAdapter};
