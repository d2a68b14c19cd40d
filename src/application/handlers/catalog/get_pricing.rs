//! GetPricingHandler - active products with their active prices.

use std::sync::Arc;

use crate::domain::catalog::Product;
use crate::domain::foundation::DomainError;
use crate::ports::CatalogReader;

#[derive(Debug, Clone, Default)]
pub struct GetPricingQuery;

pub struct GetPricingHandler {
    catalog: Arc<dyn CatalogReader>,
}

impl GetPricingHandler {
    pub fn new(catalog: Arc<dyn CatalogReader>) -> Self {
        Self { catalog }
    }

    /// Products without a purchasable price are left out.
    pub async fn handle(&self, _query: GetPricingQuery) -> Result<Vec<Product>, DomainError> {
        let mut products = self.catalog.active_products().await?;
        products.retain(|p| !p.prices.is_empty());
        products.sort_by_key(|p| p.lowest_price().and_then(|price| price.unit_amount));
        Ok(products)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryCatalogReader;
    use crate::domain::catalog::Price;

    fn product(id: &str, amount: i64, active: bool) -> Product {
        Product {
            id: id.to_string(),
            name: id.to_string(),
            description: None,
            active: true,
            prices: vec![Price {
                id: format!("price_{}", id),
                product_id: id.to_string(),
                unit_amount: Some(amount),
                currency: "usd".to_string(),
                interval: Some("month".to_string()),
                interval_count: Some(1),
                active,
            }],
        }
    }

    #[tokio::test]
    async fn lists_purchasable_products_cheapest_first() {
        let catalog = InMemoryCatalogReader::new();
        catalog.add_product(product("institutional", 49_900, true)).await;
        catalog.add_product(product("professional", 9_900, true)).await;
        catalog.add_product(product("legacy", 1_900, false)).await;

        let products = GetPricingHandler::new(Arc::new(catalog))
            .handle(GetPricingQuery)
            .await
            .unwrap();

        let ids: Vec<&str> = products.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["professional", "institutional"]);
    }
}
