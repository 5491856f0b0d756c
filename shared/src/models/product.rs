//! Product catalog record
//!
//! The slice of the catalog this subsystem consumes: pricing and the
//! stock counter. Catalog browsing/search lives elsewhere.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Catalog product record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: u64,
    pub name: String,
    pub description: Option<String>,
    /// Base price
    pub price: Decimal,
    /// Active discount price; only honored when set and > 0
    pub discount_price: Option<Decimal>,
    /// Available stock. Never negative.
    pub stock_quantity: i64,
    pub image_url: Option<String>,
    /// Bumped on every stock mutation (optimistic-concurrency handle)
    pub version: u64,
}

impl Product {
    /// Price captured onto an order item at purchase time
    ///
    /// The discount price wins only when present and strictly positive;
    /// a zero/negative discount record falls back to the base price.
    pub fn effective_unit_price(&self) -> Decimal {
        match self.discount_price {
            Some(discount) if discount > Decimal::ZERO => discount,
            _ => self.price,
        }
    }
}

/// Seed payload for the catalog ledger (id and version are allocated on
/// insert)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewProduct {
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub discount_price: Option<Decimal>,
    pub stock_quantity: i64,
    pub image_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(price: &str, discount: Option<&str>) -> Product {
        Product {
            id: 1,
            name: "Widget".to_string(),
            description: None,
            price: price.parse().unwrap(),
            discount_price: discount.map(|d| d.parse().unwrap()),
            stock_quantity: 10,
            image_url: None,
            version: 0,
        }
    }

    #[test]
    fn test_effective_price_without_discount() {
        assert_eq!(
            product("100.00", None).effective_unit_price(),
            "100.00".parse::<Decimal>().unwrap()
        );
    }

    #[test]
    fn test_effective_price_with_discount() {
        assert_eq!(
            product("100.00", Some("79.90")).effective_unit_price(),
            "79.90".parse::<Decimal>().unwrap()
        );
    }

    #[test]
    fn test_zero_discount_falls_back_to_base_price() {
        assert_eq!(
            product("100.00", Some("0")).effective_unit_price(),
            "100.00".parse::<Decimal>().unwrap()
        );
    }
}
