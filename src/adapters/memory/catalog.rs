//! In-memory product catalog.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::catalog::{Price, Product};
use crate::domain::foundation::DomainError;
use crate::ports::CatalogReader;

#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalogReader {
    products: Arc<RwLock<Vec<Product>>>,
}

impl InMemoryCatalogReader {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn add_product(&self, product: Product) {
        self.products.write().await.push(product);
    }
}

#[async_trait]
impl CatalogReader for InMemoryCatalogReader {
    async fn active_products(&self) -> Result<Vec<Product>, DomainError> {
        Ok(self
            .products
            .read()
            .await
            .iter()
            .filter(|p| p.active)
            .cloned()
            .map(|mut p| {
                p.prices.retain(|price| price.active);
                p
            })
            .collect())
    }

    async fn find_active_price(&self, price_id: &str) -> Result<Option<Price>, DomainError> {
        Ok(self
            .products
            .read()
            .await
            .iter()
            .filter(|p| p.active)
            .flat_map(|p| p.prices.iter())
            .find(|price| price.active && price.id == price_id)
            .cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn price(id: &str, active: bool) -> Price {
        Price {
            id: id.to_string(),
            product_id: "prod_research".to_string(),
            unit_amount: Some(4_900),
            currency: "usd".to_string(),
            interval: Some("month".to_string()),
            interval_count: Some(1),
            active,
        }
    }

    #[tokio::test]
    async fn inactive_prices_are_hidden() {
        let catalog = InMemoryCatalogReader::new();
        catalog
            .add_product(Product {
                id: "prod_research".to_string(),
                name: "Research".to_string(),
                description: None,
                active: true,
                prices: vec![price("price_live", true), price("price_old", false)],
            })
            .await;

        let products = catalog.active_products().await.unwrap();
        assert_eq!(products[0].prices.len(), 1);
        assert!(catalog.find_active_price("price_live").await.unwrap().is_some());
        assert!(catalog.find_active_price("price_old").await.unwrap().is_none());
    }
}
