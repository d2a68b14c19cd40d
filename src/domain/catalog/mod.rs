//! Subscription products and prices offered on the pricing page.

use serde::{Deserialize, Serialize};

/// A row of `subscription_prices`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Price {
    pub id: String,
    pub product_id: String,
    /// Amount in the currency's minor unit.
    pub unit_amount: Option<i64>,
    pub currency: String,
    /// `month`, `year`, or `None` for one-off prices.
    pub interval: Option<String>,
    pub interval_count: Option<i32>,
    pub active: bool,
}

/// A row of `subscription_products` with its active prices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub active: bool,
    pub prices: Vec<Price>,
}

impl Product {
    pub fn is_recurring(&self) -> bool {
        self.prices.iter().any(|p| p.interval.is_some())
    }

    /// Cheapest active price, for "from $X" labels.
    pub fn lowest_price(&self) -> Option<&Price> {
        self.prices
            .iter()
            .filter(|p| p.active)
            .filter_map(|p| p.unit_amount.map(|amount| (amount, p)))
            .min_by_key(|(amount, _)| *amount)
            .map(|(_, p)| p)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn price(id: &str, amount: Option<i64>, active: bool) -> Price {
        Price {
            id: id.to_string(),
            product_id: "prod_1".to_string(),
            unit_amount: amount,
            currency: "usd".to_string(),
            interval: Some("month".to_string()),
            interval_count: Some(1),
            active,
        }
    }

    #[test]
    fn lowest_price_skips_inactive_and_unpriced() {
        let product = Product {
            id: "prod_1".to_string(),
            name: "Research".to_string(),
            description: None,
            active: true,
            prices: vec![
                price("price_a", Some(9900), true),
                price("price_b", Some(100), false),
                price("price_c", None, true),
                price("price_d", Some(4900), true),
            ],
        };

        assert_eq!(product.lowest_price().map(|p| p.id.as_str()), Some("price_d"));
        assert!(product.is_recurring());
    }
}
