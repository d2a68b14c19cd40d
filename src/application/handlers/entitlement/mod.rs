//! Entitlement handlers.

mod check_entitlement;

// Queries
pub use check_entitlement::{CheckEntitlementHandler, CheckEntitlementQuery};
