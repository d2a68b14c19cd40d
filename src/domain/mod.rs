//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (IDs, timestamps, errors, state machines)
//! - `account` - Credential forms for sign-in and password recovery
//! - `profile` - The per-user profile row and sign-up validation
//! - `billing` - Webhook verification and subscription reconciliation
//! - `entitlement` - Access decisions derived from profile fields
//! - `catalog` - Subscription products and prices
//! - `privacy` - Consent preferences, data export and deletion requests
//! - `waitlist` - Early-access waitlist requests
//! - `reports` - Research reports and their REIT/MLP/equity labels

pub mod account;
pub mod billing;
pub mod catalog;
pub mod entitlement;
pub mod foundation;
pub mod privacy;
pub mod profile;
pub mod reports;
pub mod waitlist;
