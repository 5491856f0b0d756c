//! Request payloads for the order service surface
//!
//! Loosely-typed inbound fields (status strings, date strings) are kept
//! as `String` here and parsed exactly once at the service boundary.

use serde::{Deserialize, Serialize};

/// Create order payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateOrderRequest {
    pub user_id: u64,
    pub shipping_address: String,
    pub payment_method: String,
    pub items: Vec<CreateOrderItem>,
}

/// One requested line: the product and how many units
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateOrderItem {
    pub product_id: u64,
    pub quantity: u32,
}

/// Update order status payload (loose string, validated at the boundary)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateOrderStatusRequest {
    pub status: String,
}

/// Update payment status payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdatePaymentStatusRequest {
    pub payment_status: String,
}

fn default_page() -> u32 {
    1
}

fn default_per_page() -> u32 {
    10
}

/// List/search query: all filters optional, combined with AND
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrderQuery {
    pub user_id: Option<u64>,
    /// Order status filter (loose string)
    pub status: Option<String>,
    /// Inclusive lower bound, `YYYY-MM-DD HH:MM:SS`
    pub start_date: Option<String>,
    /// Inclusive upper bound, `YYYY-MM-DD HH:MM:SS`
    pub end_date: Option<String>,
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_per_page")]
    pub per_page: u32,
}

impl OrderQuery {
    /// Query with default pagination and no filters
    pub fn all() -> Self {
        Self {
            page: default_page(),
            per_page: default_per_page(),
            ..Default::default()
        }
    }
}
