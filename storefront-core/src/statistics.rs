//! Statistics aggregator
//!
//! Read-only component over the order store. Every report is computed
//! from ONE read snapshot, so concurrent writes are either fully visible
//! or fully invisible, never a half-written order or an item without its
//! parent. No exclusive locks are taken; aggregation runs fully
//! concurrently with the lifecycle manager.

use chrono::{Months, Utc};
use chrono_tz::Tz;
use rust_decimal::Decimal;
use std::collections::{BTreeMap, HashMap};

use shared::dto::{MonthlyRevenueDto, OrderStatisticsDto, TopProductDto};
use shared::models::OrderStatus;
use shared::{ApiError, ApiResult};

use crate::config::Config;
use crate::storage::StoreDb;
use crate::utils::time;

/// Order statistics aggregator
#[derive(Clone)]
pub struct OrderStatistics {
    db: StoreDb,
    timezone: Tz,
    top_products: usize,
}

impl OrderStatistics {
    pub fn new(db: StoreDb, config: &Config) -> Self {
        Self {
            db,
            timezone: config.timezone,
            top_products: config.stats_top_products,
        }
    }

    /// Compute the aggregate report over a single consistent snapshot
    ///
    /// Revenue figures exclude cancelled orders; order counts do not.
    /// A storage failure is surfaced as Internal, never a zero-filled
    /// report.
    pub fn statistics(&self) -> ApiResult<OrderStatisticsDto> {
        let orders = self.db.read_orders().map_err(|e| {
            tracing::error!(error = %e, "statistics snapshot failed");
            ApiError::internal(e.to_string())
        })?;

        let today = time::today(Utc::now(), self.timezone);
        // Trailing 12 months: everything on or after this date belongs to
        // a monthly bucket (mirrors `created_at >= today - 12 months`)
        let window_start = today
            .checked_sub_months(Months::new(12))
            .unwrap_or(today);

        let mut by_status: HashMap<OrderStatus, u64> = HashMap::new();
        let mut today_orders = 0u64;
        let mut total_revenue = Decimal::ZERO;
        let mut today_revenue = Decimal::ZERO;
        let mut monthly: BTreeMap<String, Decimal> = BTreeMap::new();
        let mut sold: HashMap<u64, (String, u64)> = HashMap::new();

        for order in &orders {
            *by_status.entry(order.status).or_insert(0) += 1;

            let order_date = time::local_date(order.created_at, self.timezone);
            if order_date == today {
                today_orders += 1;
            }

            // Best sellers count units across every order, whatever its
            // status (a cancelled order was still demand)
            for item in &order.items {
                let entry = sold
                    .entry(item.product_id)
                    .or_insert_with(|| (item.product_name.clone(), 0));
                entry.1 += u64::from(item.quantity);
            }

            if order.status == OrderStatus::Cancelled {
                continue;
            }
            total_revenue += order.total_amount;
            if order_date == today {
                today_revenue += order.total_amount;
            }
            if order_date >= window_start {
                let key = time::month_key(order.created_at, self.timezone);
                *monthly.entry(key).or_insert(Decimal::ZERO) += order.total_amount;
            }
        }

        let mut ranking: Vec<TopProductDto> = sold
            .into_iter()
            .map(|(product_id, (product_name, total_quantity))| TopProductDto {
                product_id,
                product_name,
                total_quantity,
            })
            .collect();
        // Descending by units; ascending product id keeps ties deterministic
        ranking.sort_by(|a, b| {
            b.total_quantity
                .cmp(&a.total_quantity)
                .then_with(|| a.product_id.cmp(&b.product_id))
        });
        ranking.truncate(self.top_products);

        let count = |status: OrderStatus| by_status.get(&status).copied().unwrap_or(0);
        Ok(OrderStatisticsDto {
            total_orders: orders.len() as u64,
            pending_orders: count(OrderStatus::Pending),
            processing_orders: count(OrderStatus::Processing),
            shipped_orders: count(OrderStatus::Shipped),
            delivered_orders: count(OrderStatus::Delivered),
            cancelled_orders: count(OrderStatus::Cancelled),
            today_orders,
            total_revenue,
            today_revenue,
            top_selling_products: ranking,
            monthly_revenue: monthly
                .into_iter()
                .map(|(month, revenue)| MonthlyRevenueDto { month, revenue })
                .collect(),
        })
    }
}
