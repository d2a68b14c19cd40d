//! Read-only access to subscription products and prices.

use async_trait::async_trait;

use crate::domain::catalog::{Price, Product};
use crate::domain::foundation::DomainError;

#[async_trait]
pub trait CatalogReader: Send + Sync {
    /// Active products, each with its active prices.
    async fn active_products(&self) -> Result<Vec<Product>, DomainError>;

    async fn find_active_price(&self, price_id: &str) -> Result<Option<Price>, DomainError>;
}
