//! Transfer shapes for the service surface
//!
//! Each entity has one explicit, exhaustive mapping function. Every field
//! is named on both sides so that adding a field to an entity without
//! mapping it is a compile-time/review-time event, not a silent drop.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{Order, OrderItem, OrderStatus, PaymentStatus};

/// Order line item as exposed to callers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItemDto {
    pub id: u64,
    pub product_id: u64,
    pub product_name: String,
    pub product_image: Option<String>,
    pub quantity: u32,
    pub unit_price: Decimal,
    pub line_total: Decimal,
}

impl OrderItemDto {
    /// Explicit entity → DTO mapping
    pub fn from_entity(item: &OrderItem) -> Self {
        Self {
            id: item.id,
            product_id: item.product_id,
            product_name: item.product_name.clone(),
            product_image: item.product_image.clone(),
            quantity: item.quantity,
            unit_price: item.unit_price,
            line_total: item.line_total(),
        }
    }
}

/// Order as exposed to callers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderDto {
    pub id: u64,
    pub total_amount: Decimal,
    pub status: OrderStatus,
    pub payment_status: PaymentStatus,
    pub shipping_address: String,
    pub payment_method: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub user_id: u64,
    pub user_name: String,
    pub items: Vec<OrderItemDto>,
}

impl OrderDto {
    /// Explicit entity → DTO mapping
    pub fn from_entity(order: &Order) -> Self {
        Self {
            id: order.id,
            total_amount: order.total_amount,
            status: order.status,
            payment_status: order.payment_status,
            shipping_address: order.shipping_address.clone(),
            payment_method: order.payment_method.clone(),
            created_at: order.created_at,
            updated_at: order.updated_at,
            user_id: order.user_id,
            user_name: order.user_name.clone(),
            items: order.items.iter().map(OrderItemDto::from_entity).collect(),
        }
    }
}

/// One product in the top-sellers ranking
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TopProductDto {
    pub product_id: u64,
    pub product_name: String,
    /// Units sold across all orders
    pub total_quantity: u64,
}

/// Revenue bucket for one calendar month
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MonthlyRevenueDto {
    /// `YYYY-MM` in the business timezone
    pub month: String,
    pub revenue: Decimal,
}

/// Aggregate business statistics over the order store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderStatisticsDto {
    pub total_orders: u64,
    pub pending_orders: u64,
    pub processing_orders: u64,
    pub shipped_orders: u64,
    pub delivered_orders: u64,
    pub cancelled_orders: u64,
    pub today_orders: u64,
    /// Σ total_amount over non-cancelled orders
    pub total_revenue: Decimal,
    /// Same, restricted to today's calendar day (business timezone)
    pub today_revenue: Decimal,
    pub top_selling_products: Vec<TopProductDto>,
    /// Trailing 12 months, ascending
    pub monthly_revenue: Vec<MonthlyRevenueDto>,
}
