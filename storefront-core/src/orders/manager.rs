//! OrderManager - order lifecycle state machine
//!
//! Owns every mutation of the order store and the stock ledger:
//!
//! - `create_order`: all-or-nothing stock reservation + order insert
//! - `update_status` / `update_payment_status`: guarded transitions
//! - `cancel_order`: exactly-once stock release + terminal state
//! - `get_order` / `list_orders`: snapshot reads
//!
//! # Concurrency
//!
//! Stock is the shared mutable resource. Mutating calls serialize on the
//! write gate (bounded wait, surfaced as Conflict on timeout) and then on
//! the single-writer redb transaction; multi-product debits/credits are
//! applied in ascending product id order. Sufficiency is checked inside
//! the same transaction that applies the debit, so stock can never go
//! negative and no partial application is observable.

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use shared::models::{Order, OrderItem, OrderStatus, PaymentStatus, Product};
use shared::request::{CreateOrderItem, CreateOrderRequest};
use shared::{ApiError, ApiResult};

use crate::catalog::{ProductCatalog, StockError};
use crate::config::Config;
use crate::storage::{StorageError, StoreDb};
use crate::users::UserDirectory;

/// Filter for order listing; all criteria combine with AND
#[derive(Debug, Clone, Default)]
pub struct OrderFilter {
    pub user_id: Option<u64>,
    pub status: Option<OrderStatus>,
    /// Inclusive lower bound on `created_at`
    pub start: Option<DateTime<Utc>>,
    /// Inclusive upper bound on `created_at`
    pub end: Option<DateTime<Utc>>,
    pub page: u32,
    pub per_page: u32,
}

/// Order lifecycle manager
pub struct OrderManager {
    db: StoreDb,
    catalog: ProductCatalog,
    users: Arc<dyn UserDirectory>,
    /// Serializes mutating calls ahead of the redb writer lock so waits
    /// can be bounded and surfaced as Conflict instead of blocking
    write_gate: Mutex<()>,
    gate_timeout: Duration,
    retry_limit: u32,
}

impl OrderManager {
    pub fn new(db: StoreDb, users: Arc<dyn UserDirectory>, config: &Config) -> Self {
        Self {
            catalog: ProductCatalog::new(db.clone()),
            db,
            users,
            write_gate: Mutex::new(()),
            gate_timeout: Duration::from_millis(config.write_gate_timeout_ms),
            retry_limit: config.write_retry_limit,
        }
    }

    /// The stock ledger this manager writes through
    pub fn catalog(&self) -> &ProductCatalog {
        &self.catalog
    }

    // ========== Lifecycle Operations ==========

    /// Create an order: reserve stock for every line and persist the
    /// aggregate as one atomic unit
    pub async fn create_order(&self, request: &CreateOrderRequest) -> ApiResult<Order> {
        if request.items.is_empty() {
            return Err(ApiError::validation("Order must contain at least one item"));
        }
        for line in &request.items {
            if line.quantity < 1 {
                return Err(ApiError::validation(format!(
                    "Quantity must be at least 1 for product: {}",
                    line.product_id
                )));
            }
        }

        let user = self.users.get(request.user_id).await.ok_or_else(|| {
            ApiError::not_found(format!("User not found with id: {}", request.user_id))
        })?;

        let _gate = self.acquire_gate()?;
        let txn = self.db.begin_write().map_err(classify_storage)?;

        // Debit in canonical ascending product id order. A failed line
        // aborts the whole transaction: no product is left debited.
        let mut sorted: Vec<&CreateOrderItem> = request.items.iter().collect();
        sorted.sort_by_key(|line| line.product_id);

        let mut reserved: HashMap<u64, Product> = HashMap::new();
        for line in sorted {
            let product = self
                .catalog
                .try_debit(&txn, line.product_id, line.quantity)
                .map_err(classify_stock)?;
            reserved.insert(product.id, product);
        }

        // Build line items in request order, snapshotting the price that
        // was read under the same transaction as the debit.
        let now = Utc::now();
        let mut items = Vec::with_capacity(request.items.len());
        let mut total = Decimal::ZERO;
        for (index, line) in request.items.iter().enumerate() {
            let product = reserved.get(&line.product_id).ok_or_else(|| {
                ApiError::internal(format!("reserved product missing: {}", line.product_id))
            })?;
            let item = OrderItem {
                id: (index + 1) as u64,
                product_id: product.id,
                product_name: product.name.clone(),
                product_image: product.image_url.clone(),
                quantity: line.quantity,
                unit_price: product.effective_unit_price(),
            };
            total += item.line_total();
            items.push(item);
        }

        let order = Order {
            id: self.db.next_order_id(&txn).map_err(classify_storage)?,
            total_amount: total,
            status: OrderStatus::Pending,
            payment_status: PaymentStatus::Unpaid,
            shipping_address: request.shipping_address.clone(),
            payment_method: request.payment_method.clone(),
            created_at: now,
            updated_at: now,
            user_id: user.id,
            user_name: user.display_name,
            items,
        };
        self.db.store_order(&txn, &order).map_err(classify_storage)?;
        txn.commit().map_err(|e| classify_storage(e.into()))?;

        tracing::info!(
            order_id = order.id,
            user_id = order.user_id,
            total = %order.total_amount,
            lines = order.items.len(),
            "order created"
        );
        Ok(order)
    }

    /// Apply a fulfilment transition (forward edges only)
    pub fn update_status(&self, order_id: u64, next: OrderStatus) -> ApiResult<Order> {
        let _gate = self.acquire_gate()?;
        let txn = self.db.begin_write().map_err(classify_storage)?;
        let mut order = self.load_order(&txn, order_id)?;

        if !order.status.can_transition_to(next) {
            return Err(ApiError::validation(format!(
                "Invalid status transition: {} -> {}",
                order.status, next
            )));
        }

        order.status = next;
        order.updated_at = Utc::now();
        self.db.store_order(&txn, &order).map_err(classify_storage)?;
        txn.commit().map_err(|e| classify_storage(e.into()))?;

        tracing::info!(order_id, status = %next, "order status updated");
        Ok(order)
    }

    /// Apply a payment transition (`unpaid → paid → refunded`)
    pub fn update_payment_status(&self, order_id: u64, next: PaymentStatus) -> ApiResult<Order> {
        let _gate = self.acquire_gate()?;
        let txn = self.db.begin_write().map_err(classify_storage)?;
        let mut order = self.load_order(&txn, order_id)?;

        if !order.payment_status.can_transition_to(next) {
            return Err(ApiError::validation(format!(
                "Invalid payment status transition: {} -> {}",
                order.payment_status, next
            )));
        }

        order.payment_status = next;
        order.updated_at = Utc::now();
        self.db.store_order(&txn, &order).map_err(classify_storage)?;
        txn.commit().map_err(|e| classify_storage(e.into()))?;

        tracing::info!(order_id, payment_status = %next, "payment status updated");
        Ok(order)
    }

    /// Cancel an order and release its stock, exactly once
    ///
    /// A second cancel attempt is rejected, never silently absorbed, so
    /// double-credit is structurally impossible and the caller learns
    /// about the repeated request.
    pub fn cancel_order(&self, order_id: u64) -> ApiResult<Order> {
        let _gate = self.acquire_gate()?;
        let txn = self.db.begin_write().map_err(classify_storage)?;
        let mut order = self.load_order(&txn, order_id)?;

        match order.status {
            OrderStatus::Delivered => {
                return Err(ApiError::validation(
                    "Cannot cancel an order that has been delivered",
                ));
            }
            OrderStatus::Cancelled => {
                return Err(ApiError::validation("Order is already cancelled"));
            }
            OrderStatus::Pending | OrderStatus::Processing | OrderStatus::Shipped => {}
        }

        // Credit back in the same canonical order used for debits
        let mut items: Vec<&OrderItem> = order.items.iter().collect();
        items.sort_by_key(|item| item.product_id);
        for item in items {
            self.catalog
                .credit(&txn, item.product_id, item.quantity)
                .map_err(classify_stock)?;
        }

        order.status = OrderStatus::Cancelled;
        order.updated_at = Utc::now();
        self.db.store_order(&txn, &order).map_err(classify_storage)?;
        txn.commit().map_err(|e| classify_storage(e.into()))?;

        tracing::info!(order_id, "order cancelled, stock released");
        Ok(order)
    }

    // ========== Read Operations ==========

    /// Fetch one order from a read snapshot
    pub fn get_order(&self, order_id: u64) -> ApiResult<Order> {
        self.db
            .read_order(order_id)
            .map_err(classify_storage)?
            .ok_or_else(|| ApiError::not_found(format!("Order not found with id: {}", order_id)))
    }

    /// List orders matching the filter, newest first
    ///
    /// Returns the requested page plus the total match count. The scan
    /// runs over one read snapshot; pagination happens in memory over the
    /// bounded dataset.
    pub fn list_orders(&self, filter: &OrderFilter) -> ApiResult<(Vec<Order>, u64)> {
        let mut orders = match filter.user_id {
            Some(user_id) => self.db.read_orders_by_user(user_id).map_err(classify_storage)?,
            None => self.db.read_orders().map_err(classify_storage)?,
        };

        orders.retain(|order| {
            filter.status.is_none_or(|status| order.status == status)
                && filter.start.is_none_or(|start| order.created_at >= start)
                && filter.end.is_none_or(|end| order.created_at <= end)
        });
        orders.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });

        let total = orders.len() as u64;
        let per_page = filter.per_page.max(1) as usize;
        let page = filter.page.max(1) as usize;
        let page_items = orders
            .into_iter()
            .skip((page - 1) * per_page)
            .take(per_page)
            .collect();
        Ok((page_items, total))
    }

    // ========== Internals ==========

    fn load_order(&self, txn: &redb::WriteTransaction, order_id: u64) -> ApiResult<Order> {
        self.db
            .get_order(txn, order_id)
            .map_err(classify_storage)?
            .ok_or_else(|| ApiError::not_found(format!("Order not found with id: {}", order_id)))
    }

    /// Acquire the write gate with a bounded wait
    fn acquire_gate(&self) -> ApiResult<parking_lot::MutexGuard<'_, ()>> {
        for attempt in 0..=self.retry_limit {
            if let Some(guard) = self.write_gate.try_lock_for(self.gate_timeout) {
                return Ok(guard);
            }
            tracing::warn!(attempt, "order write gate busy, retrying");
        }
        Err(ApiError::conflict("Order store is busy"))
    }
}

/// Classify ledger errors at the manager boundary
fn classify_stock(err: StockError) -> ApiError {
    match err {
        StockError::ProductNotFound(id) => {
            ApiError::not_found(format!("Product not found with id: {}", id))
        }
        StockError::Insufficient { name, product_id, available, requested } => {
            tracing::debug!(product_id, available, requested, "stock reservation rejected");
            ApiError::validation(format!("Not enough stock for product: {}", name))
        }
        StockError::Invalid(message) => ApiError::validation(message),
        StockError::Storage(e) => classify_storage(e),
    }
}

/// Classify storage errors at the manager boundary
fn classify_storage(err: StorageError) -> ApiError {
    tracing::error!(error = %err, "storage error");
    match err {
        StorageError::OrderNotFound(id) => {
            ApiError::not_found(format!("Order not found with id: {}", id))
        }
        StorageError::ProductNotFound(id) => {
            ApiError::not_found(format!("Product not found with id: {}", id))
        }
        other => ApiError::database(other.to_string()),
    }
}
