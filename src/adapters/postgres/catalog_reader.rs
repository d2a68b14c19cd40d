//! PostgreSQL implementation of CatalogReader.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::catalog::{Price, Product};
use crate::domain::foundation::DomainError;
use crate::ports::CatalogReader;

pub struct PostgresCatalogReader {
    pool: PgPool,
}

impl PostgresCatalogReader {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: String,
    name: String,
    description: Option<String>,
    active: bool,
}

#[derive(Debug, sqlx::FromRow)]
struct PriceRow {
    id: String,
    product_id: String,
    unit_amount: Option<i64>,
    currency: String,
    interval: Option<String>,
    interval_count: Option<i32>,
    active: bool,
}

impl From<PriceRow> for Price {
    fn from(row: PriceRow) -> Self {
        Price {
            id: row.id,
            product_id: row.product_id,
            unit_amount: row.unit_amount,
            currency: row.currency,
            interval: row.interval,
            interval_count: row.interval_count,
            active: row.active,
        }
    }
}

/// Attaches prices to their products, preserving product order.
fn assemble(products: Vec<ProductRow>, prices: Vec<PriceRow>) -> Vec<Product> {
    let mut assembled: Vec<Product> = products
        .into_iter()
        .map(|p| Product {
            id: p.id,
            name: p.name,
            description: p.description,
            active: p.active,
            prices: Vec::new(),
        })
        .collect();

    for price in prices {
        if let Some(product) = assembled.iter_mut().find(|p| p.id == price.product_id) {
            product.prices.push(price.into());
        }
    }

    assembled
}

fn db_error(context: &str, e: sqlx::Error) -> DomainError {
    DomainError::database(format!("{}: {}", context, e))
}

#[async_trait]
impl CatalogReader for PostgresCatalogReader {
    async fn active_products(&self) -> Result<Vec<Product>, DomainError> {
        let products: Vec<ProductRow> = sqlx::query_as(
            "SELECT id, name, description, active FROM subscription_products \
             WHERE active ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("Failed to load products", e))?;

        let prices: Vec<PriceRow> = sqlx::query_as(
            r#"
            SELECT pr.id, pr.product_id, pr.unit_amount, pr.currency, pr.interval,
                   pr.interval_count, pr.active
            FROM subscription_prices pr
            JOIN subscription_products p ON p.id = pr.product_id
            WHERE pr.active AND p.active
            ORDER BY pr.unit_amount NULLS LAST
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("Failed to load prices", e))?;

        Ok(assemble(products, prices))
    }

    async fn find_active_price(&self, price_id: &str) -> Result<Option<Price>, DomainError> {
        let row: Option<PriceRow> = sqlx::query_as(
            r#"
            SELECT pr.id, pr.product_id, pr.unit_amount, pr.currency, pr.interval,
                   pr.interval_count, pr.active
            FROM subscription_prices pr
            JOIN subscription_products p ON p.id = pr.product_id
            WHERE pr.id = $1 AND pr.active AND p.active
            "#,
        )
        .bind(price_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("Failed to look up price", e))?;

        Ok(row.map(Price::from))
    }
}
