//! Transport-agnostic service surface
//!
//! The boundary where loosely-typed input (status strings, date strings)
//! is parsed exactly once and rejected before it reaches the state
//! machine, and where every outcome is folded into the uniform
//! `ApiResponse` envelope with its numeric status code.

use std::sync::Arc;

use shared::dto::{OrderDto, OrderStatisticsDto};
use shared::models::{OrderStatus, PaymentStatus};
use shared::request::{
    CreateOrderRequest, OrderQuery, UpdateOrderStatusRequest, UpdatePaymentStatusRequest,
};
use shared::{ApiError, ApiResponse, ApiResult, Paginated};

use crate::config::Config;
use crate::orders::{OrderFilter, OrderManager};
use crate::statistics::OrderStatistics;
use crate::storage::StoreDb;
use crate::users::UserDirectory;

/// Order service facade
///
/// A transport layer (HTTP, message bus, ...) mounts these calls 1:1.
pub struct OrderService {
    manager: Arc<OrderManager>,
    statistics: OrderStatistics,
    timezone: chrono_tz::Tz,
}

impl OrderService {
    pub fn new(db: StoreDb, users: Arc<dyn UserDirectory>, config: &Config) -> Self {
        Self {
            manager: Arc::new(OrderManager::new(db.clone(), users, config)),
            statistics: OrderStatistics::new(db, config),
            timezone: config.timezone,
        }
    }

    /// Direct access to the lifecycle manager (embedding hosts, fixtures)
    pub fn manager(&self) -> &Arc<OrderManager> {
        &self.manager
    }

    // ========== Service Calls ==========

    pub async fn create_order(&self, request: CreateOrderRequest) -> ApiResponse<OrderDto> {
        match self.manager.create_order(&request).await {
            Ok(order) => ApiResponse::ok_with_message(
                OrderDto::from_entity(&order),
                "Order created successfully",
            ),
            Err(err) => err.into(),
        }
    }

    pub async fn get_order(&self, order_id: u64) -> ApiResponse<OrderDto> {
        match self.manager.get_order(order_id) {
            Ok(order) => ApiResponse::ok(OrderDto::from_entity(&order)),
            Err(err) => err.into(),
        }
    }

    /// List/search orders with optional user, status and date-range
    /// filters
    pub async fn list_orders(&self, query: OrderQuery) -> ApiResponse<Paginated<OrderDto>> {
        let filter = match self.parse_query(&query) {
            Ok(filter) => filter,
            Err(err) => return err.into(),
        };
        match self.manager.list_orders(&filter) {
            Ok((orders, total)) => {
                let items = orders.iter().map(OrderDto::from_entity).collect();
                ApiResponse::ok(Paginated::new(
                    items,
                    filter.page.max(1),
                    filter.per_page.max(1),
                    total,
                ))
            }
            Err(err) => err.into(),
        }
    }

    pub async fn update_order_status(
        &self,
        order_id: u64,
        request: UpdateOrderStatusRequest,
    ) -> ApiResponse<OrderDto> {
        let next: OrderStatus = match request.status.parse() {
            Ok(status) => status,
            Err(message) => return ApiError::validation(message).into(),
        };
        match self.manager.update_status(order_id, next) {
            Ok(order) => ApiResponse::ok_with_message(
                OrderDto::from_entity(&order),
                "Order status updated successfully",
            ),
            Err(err) => err.into(),
        }
    }

    pub async fn update_payment_status(
        &self,
        order_id: u64,
        request: UpdatePaymentStatusRequest,
    ) -> ApiResponse<OrderDto> {
        let next: PaymentStatus = match request.payment_status.parse() {
            Ok(status) => status,
            Err(message) => return ApiError::validation(message).into(),
        };
        match self.manager.update_payment_status(order_id, next) {
            Ok(order) => ApiResponse::ok_with_message(
                OrderDto::from_entity(&order),
                "Payment status updated successfully",
            ),
            Err(err) => err.into(),
        }
    }

    pub async fn cancel_order(&self, order_id: u64) -> ApiResponse<OrderDto> {
        match self.manager.cancel_order(order_id) {
            Ok(order) => ApiResponse::ok_with_message(
                OrderDto::from_entity(&order),
                "Order cancelled successfully",
            ),
            Err(err) => err.into(),
        }
    }

    pub async fn get_statistics(&self) -> ApiResponse<OrderStatisticsDto> {
        match self.statistics.statistics() {
            Ok(stats) => ApiResponse::ok(stats),
            Err(err) => err.into(),
        }
    }

    // ========== Boundary Parsing ==========

    fn parse_query(&self, query: &OrderQuery) -> ApiResult<OrderFilter> {
        let status = match &query.status {
            Some(raw) => Some(
                raw.parse::<OrderStatus>()
                    .map_err(|message| ApiError::validation(message))?,
            ),
            None => None,
        };
        let start = query
            .start_date
            .as_deref()
            .map(|raw| crate::utils::time::parse_datetime(raw, self.timezone))
            .transpose()?;
        let end = query
            .end_date
            .as_deref()
            .map(|raw| crate::utils::time::parse_datetime(raw, self.timezone))
            .transpose()?;

        Ok(OrderFilter {
            user_id: query.user_id,
            status,
            start,
            end,
            page: query.page,
            per_page: query.per_page,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::new_product;
    use crate::users::InMemoryUserDirectory;
    use rust_decimal::Decimal;
    use shared::models::UserRef;
    use shared::request::CreateOrderItem;

    fn test_config() -> Config {
        Config {
            work_dir: "/tmp/storefront-test".to_string(),
            timezone: chrono_tz::UTC,
            environment: "development".to_string(),
            stats_top_products: 5,
            write_gate_timeout_ms: 1000,
            write_retry_limit: 2,
        }
    }

    fn setup() -> OrderService {
        let db = StoreDb::open_in_memory().unwrap();
        let users = InMemoryUserDirectory::new();
        users.insert(UserRef { id: 1, display_name: "alice".to_string() });
        OrderService::new(db, Arc::new(users), &test_config())
    }

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    async fn place_order(service: &OrderService, product_id: u64, quantity: u32) -> OrderDto {
        let resp = service
            .create_order(CreateOrderRequest {
                user_id: 1,
                shipping_address: "1 Main St".to_string(),
                payment_method: "card".to_string(),
                items: vec![CreateOrderItem { product_id, quantity }],
            })
            .await;
        assert!(resp.success, "unexpected failure: {}", resp.message);
        resp.data.unwrap()
    }

    #[tokio::test]
    async fn test_create_and_fetch_round_trip() {
        let service = setup();
        let p = service
            .manager()
            .catalog()
            .create(new_product("Camera", dec("100.00"), 5))
            .unwrap();

        let created = place_order(&service, p.id, 2).await;
        assert_eq!(created.total_amount, dec("200.00"));

        let fetched = service.get_order(created.id).await;
        assert!(fetched.success);
        assert_eq!(fetched.status, 200);
        assert_eq!(fetched.data.unwrap().id, created.id);
    }

    #[tokio::test]
    async fn test_not_found_maps_to_404() {
        let service = setup();
        let resp = service.get_order(41).await;
        assert!(!resp.success);
        assert_eq!(resp.status, 404);
        assert_eq!(resp.message, "Order not found with id: 41");
    }

    #[tokio::test]
    async fn test_validation_maps_to_400() {
        let service = setup();
        let p = service
            .manager()
            .catalog()
            .create(new_product("Camera", dec("100.00"), 1))
            .unwrap();

        let resp = service
            .create_order(CreateOrderRequest {
                user_id: 1,
                shipping_address: "1 Main St".to_string(),
                payment_method: "card".to_string(),
                items: vec![CreateOrderItem { product_id: p.id, quantity: 2 }],
            })
            .await;
        assert!(!resp.success);
        assert_eq!(resp.status, 400);
        assert_eq!(resp.message, "Not enough stock for product: Camera");
    }

    #[tokio::test]
    async fn test_loose_status_string_rejected_at_boundary() {
        let service = setup();
        let p = service
            .manager()
            .catalog()
            .create(new_product("Camera", dec("100.00"), 5))
            .unwrap();
        let order = place_order(&service, p.id, 1).await;

        let resp = service
            .update_order_status(order.id, UpdateOrderStatusRequest {
                status: "teleported".to_string(),
            })
            .await;
        assert!(!resp.success);
        assert_eq!(resp.status, 400);
        assert_eq!(resp.message, "Invalid order status: teleported");

        // The order is untouched
        let fetched = service.get_order(order.id).await.data.unwrap();
        assert_eq!(fetched.status, shared::models::OrderStatus::Pending);

        // Well-formed but illegal transitions also come back as 400
        let resp = service
            .update_order_status(order.id, UpdateOrderStatusRequest {
                status: "delivered".to_string(),
            })
            .await;
        assert_eq!(resp.status, 400);
        assert_eq!(resp.message, "Invalid status transition: pending -> delivered");
    }

    #[tokio::test]
    async fn test_payment_status_flow() {
        let service = setup();
        let p = service
            .manager()
            .catalog()
            .create(new_product("Camera", dec("100.00"), 5))
            .unwrap();
        let order = place_order(&service, p.id, 1).await;

        let resp = service
            .update_payment_status(order.id, UpdatePaymentStatusRequest {
                payment_status: "paid".to_string(),
            })
            .await;
        assert!(resp.success);
        assert_eq!(resp.message, "Payment status updated successfully");
        assert_eq!(
            resp.data.unwrap().payment_status,
            shared::models::PaymentStatus::Paid
        );

        let resp = service
            .update_payment_status(order.id, UpdatePaymentStatusRequest {
                payment_status: "gold".to_string(),
            })
            .await;
        assert_eq!(resp.status, 400);
        assert_eq!(resp.message, "Invalid payment status: gold");
    }

    #[tokio::test]
    async fn test_cancel_envelope_and_idempotence_rejection() {
        let service = setup();
        let p = service
            .manager()
            .catalog()
            .create(new_product("Camera", dec("100.00"), 5))
            .unwrap();
        let order = place_order(&service, p.id, 5).await;

        let resp = service.cancel_order(order.id).await;
        assert!(resp.success);
        assert_eq!(resp.message, "Order cancelled successfully");

        let resp = service.cancel_order(order.id).await;
        assert!(!resp.success);
        assert_eq!(resp.status, 400);
        assert_eq!(resp.message, "Order is already cancelled");
    }

    #[tokio::test]
    async fn test_list_orders_with_loose_filters() {
        let service = setup();
        let p = service
            .manager()
            .catalog()
            .create(new_product("Camera", dec("100.00"), 50))
            .unwrap();
        for _ in 0..3 {
            place_order(&service, p.id, 1).await;
        }

        let resp = service
            .list_orders(OrderQuery {
                status: Some("pending".to_string()),
                ..OrderQuery::all()
            })
            .await;
        assert!(resp.success);
        let page = resp.data.unwrap();
        assert_eq!(page.pagination.total, 3);
        assert_eq!(page.items.len(), 3);

        let resp = service
            .list_orders(OrderQuery {
                status: Some("unknown".to_string()),
                ..OrderQuery::all()
            })
            .await;
        assert_eq!(resp.status, 400);

        let resp = service
            .list_orders(OrderQuery {
                start_date: Some("not a date".to_string()),
                ..OrderQuery::all()
            })
            .await;
        assert_eq!(resp.status, 400);
        assert_eq!(resp.message, "Invalid date format: not a date");

        let resp = service
            .list_orders(OrderQuery {
                start_date: Some("2000-01-01 00:00:00".to_string()),
                end_date: Some("2000-01-02 00:00:00".to_string()),
                ..OrderQuery::all()
            })
            .await;
        assert_eq!(resp.data.unwrap().pagination.total, 0);
    }

    #[tokio::test]
    async fn test_statistics_envelope() {
        let service = setup();
        let p = service
            .manager()
            .catalog()
            .create(new_product("Camera", dec("100.00"), 50))
            .unwrap();
        place_order(&service, p.id, 2).await;
        let doomed = place_order(&service, p.id, 1).await;
        service.cancel_order(doomed.id).await;

        let resp = service.get_statistics().await;
        assert!(resp.success);
        let stats = resp.data.unwrap();
        assert_eq!(stats.total_orders, 2);
        assert_eq!(stats.cancelled_orders, 1);
        assert_eq!(stats.today_orders, 2);
        assert_eq!(stats.total_revenue, dec("200.00"));
        assert_eq!(stats.top_selling_products[0].total_quantity, 3);
    }
}
