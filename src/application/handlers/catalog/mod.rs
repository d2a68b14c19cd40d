//! Catalog handlers.

mod get_pricing;

// Queries
pub use get_pricing::{GetPricingHandler, GetPricingQuery};
