//! Order and OrderItem models
//!
//! The order aggregate: status/payment lifecycles and the owned line
//! items. Items are created together with the order and never change
//! afterwards; only `status`, `payment_status` and `updated_at` mutate.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Order fulfilment status
///
/// Forward-only lifecycle, with cancellation as the single side exit:
///
/// ```text
/// pending → processing → shipped → delivered
///    └─────────┴────────────┘
///              ↓ (cancel_order only)
///          cancelled
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 5] = [
        OrderStatus::Pending,
        OrderStatus::Processing,
        OrderStatus::Shipped,
        OrderStatus::Delivered,
        OrderStatus::Cancelled,
    ];

    /// Whether `update_status` may move this order to `next`
    ///
    /// Only the forward edges are reachable here; `cancelled` is set
    /// exclusively by `cancel_order`.
    pub fn can_transition_to(self, next: OrderStatus) -> bool {
        matches!(
            (self, next),
            (OrderStatus::Pending, OrderStatus::Processing)
                | (OrderStatus::Processing, OrderStatus::Shipped)
                | (OrderStatus::Shipped, OrderStatus::Delivered)
        )
    }

    /// Terminal states accept no further transition of any kind
    pub fn is_terminal(self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Processing => "processing",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pending" => Ok(OrderStatus::Pending),
            "processing" => Ok(OrderStatus::Processing),
            "shipped" => Ok(OrderStatus::Shipped),
            "delivered" => Ok(OrderStatus::Delivered),
            "cancelled" => Ok(OrderStatus::Cancelled),
            other => Err(format!("Invalid order status: {}", other)),
        }
    }
}

/// Payment status lifecycle: `unpaid → paid → refunded`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Unpaid,
    Paid,
    Refunded,
}

impl PaymentStatus {
    pub fn can_transition_to(self, next: PaymentStatus) -> bool {
        matches!(
            (self, next),
            (PaymentStatus::Unpaid, PaymentStatus::Paid)
                | (PaymentStatus::Paid, PaymentStatus::Refunded)
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PaymentStatus::Unpaid => "unpaid",
            PaymentStatus::Paid => "paid",
            PaymentStatus::Refunded => "refunded",
        }
    }
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "unpaid" => Ok(PaymentStatus::Unpaid),
            "paid" => Ok(PaymentStatus::Paid),
            "refunded" => Ok(PaymentStatus::Refunded),
            other => Err(format!("Invalid payment status: {}", other)),
        }
    }
}

/// Order line item
///
/// `unit_price` is the price captured at purchase time (discount price if
/// one was active, base price otherwise) and is never re-read from the
/// catalog afterwards. The product reference is a plain id plus
/// denormalized display fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItem {
    /// Ordinal within the owning order (1-based)
    pub id: u64,
    pub product_id: u64,
    pub product_name: String,
    pub product_image: Option<String>,
    pub quantity: u32,
    pub unit_price: Decimal,
}

impl OrderItem {
    /// Line total = quantity × captured unit price
    pub fn line_total(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }
}

/// Order aggregate
///
/// Items are stored inline with the order record, keyed by the owning
/// order id. There are no back-pointers: the user and products are
/// referenced by id only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
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
    pub items: Vec<OrderItem>,
}

impl Order {
    /// Recompute the total from the line items
    ///
    /// Invariant check helper: must always equal `total_amount`.
    pub fn computed_total(&self) -> Decimal {
        self.items.iter().map(OrderItem::line_total).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forward_transitions_allowed() {
        assert!(OrderStatus::Pending.can_transition_to(OrderStatus::Processing));
        assert!(OrderStatus::Processing.can_transition_to(OrderStatus::Shipped));
        assert!(OrderStatus::Shipped.can_transition_to(OrderStatus::Delivered));
    }

    #[test]
    fn test_skipping_and_reversing_rejected() {
        assert!(!OrderStatus::Pending.can_transition_to(OrderStatus::Shipped));
        assert!(!OrderStatus::Pending.can_transition_to(OrderStatus::Delivered));
        assert!(!OrderStatus::Processing.can_transition_to(OrderStatus::Pending));
        assert!(!OrderStatus::Shipped.can_transition_to(OrderStatus::Processing));
        assert!(!OrderStatus::Delivered.can_transition_to(OrderStatus::Shipped));
    }

    #[test]
    fn test_cancelled_unreachable_via_update_status() {
        for from in OrderStatus::ALL {
            assert!(!from.can_transition_to(OrderStatus::Cancelled));
        }
        for to in OrderStatus::ALL {
            assert!(!OrderStatus::Cancelled.can_transition_to(to));
        }
    }

    #[test]
    fn test_terminal_states() {
        assert!(OrderStatus::Delivered.is_terminal());
        assert!(OrderStatus::Cancelled.is_terminal());
        assert!(!OrderStatus::Pending.is_terminal());
        assert!(!OrderStatus::Processing.is_terminal());
        assert!(!OrderStatus::Shipped.is_terminal());
    }

    #[test]
    fn test_payment_transitions() {
        assert!(PaymentStatus::Unpaid.can_transition_to(PaymentStatus::Paid));
        assert!(PaymentStatus::Paid.can_transition_to(PaymentStatus::Refunded));
        assert!(!PaymentStatus::Unpaid.can_transition_to(PaymentStatus::Refunded));
        assert!(!PaymentStatus::Paid.can_transition_to(PaymentStatus::Unpaid));
        assert!(!PaymentStatus::Refunded.can_transition_to(PaymentStatus::Paid));
        assert!(!PaymentStatus::Refunded.can_transition_to(PaymentStatus::Unpaid));
    }

    #[test]
    fn test_status_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&OrderStatus::Pending).unwrap(), "\"pending\"");
        assert_eq!(serde_json::to_string(&PaymentStatus::Refunded).unwrap(), "\"refunded\"");
        let parsed: OrderStatus = serde_json::from_str("\"cancelled\"").unwrap();
        assert_eq!(parsed, OrderStatus::Cancelled);
    }

    #[test]
    fn test_status_parse_round_trip() {
        for status in OrderStatus::ALL {
            let parsed: OrderStatus = status.as_str().parse().unwrap();
            assert_eq!(parsed, status);
        }
        // Case-insensitive at the boundary
        assert_eq!("SHIPPED".parse::<OrderStatus>().unwrap(), OrderStatus::Shipped);
        assert!("unknown".parse::<OrderStatus>().is_err());
        assert!("PAID".parse::<PaymentStatus>().is_ok());
        assert!("settled".parse::<PaymentStatus>().is_err());
    }

    #[test]
    fn test_line_total_and_computed_total() {
        let item = |id: u64, qty: u32, price: &str| OrderItem {
            id,
            product_id: id,
            product_name: format!("P{}", id),
            product_image: None,
            quantity: qty,
            unit_price: price.parse().unwrap(),
        };

        let order = Order {
            id: 1,
            total_amount: "259.97".parse().unwrap(),
            status: OrderStatus::Pending,
            payment_status: PaymentStatus::Unpaid,
            shipping_address: "1 Main St".to_string(),
            payment_method: "card".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
            user_id: 1,
            user_name: "alice".to_string(),
            items: vec![item(1, 2, "99.99"), item(2, 1, "59.99")],
        };

        assert_eq!(order.items[0].line_total(), "199.98".parse::<Decimal>().unwrap());
        assert_eq!(order.computed_total(), order.total_amount);
    }
}
