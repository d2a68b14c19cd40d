//! Entitlement resolution.
//!
//! Access is derived from profile fields at read time. Stored flags written
//! by billing reconciliation and the live subscription period both count.

mod resolver;

pub use resolver::{resolve_entitlement, DenialReason, EntitlementResult};
