//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations over the
//! ports. Each handler owns `Arc<dyn Port>` collaborators and exposes a
//! single `handle` method.

pub mod account;
pub mod billing;
pub mod catalog;
pub mod entitlement;
pub mod privacy;
pub mod reports;
pub mod subscription;
pub mod waitlist;
