//! Storefront Core - commerce order subsystem
//!
//! # Overview
//!
//! This crate implements the order side of the storefront backend:
//! creating orders against the product catalog, walking their
//! status/payment lifecycles, cancelling them, and aggregating business
//! statistics. Catalog browsing, user management and transport concerns
//! live in other services and are consumed through narrow seams.
//!
//! # Module structure
//!
//! ```text
//! storefront-core/src/
//! ├── config.rs      # env-driven configuration
//! ├── storage.rs     # redb database: products, orders, indices
//! ├── catalog.rs     # stock ledger (conditional debit / credit)
//! ├── users.rs       # external user store seam
//! ├── orders/        # lifecycle manager (create/transition/cancel)
//! ├── statistics.rs  # snapshot aggregation
//! ├── service.rs     # transport-agnostic API surface
//! └── utils/         # logging, business-timezone helpers
//! ```
//!
//! # Consistency contract
//!
//! Stock debits/credits and order writes commit in one transaction;
//! stock never goes negative and an order's total always equals the sum
//! of its price-snapshotted line items. Aggregation reads a single MVCC
//! snapshot and never observes partial writes.

pub mod catalog;
pub mod config;
pub mod orders;
pub mod service;
pub mod statistics;
pub mod storage;
pub mod users;
pub mod utils;

// Re-export public types
pub use catalog::{ProductCatalog, StockError};
pub use config::Config;
pub use orders::{OrderFilter, OrderManager};
pub use service::OrderService;
pub use statistics::OrderStatistics;
pub use storage::{StorageError, StoreDb};
pub use users::{InMemoryUserDirectory, UserDirectory};
pub use utils::{init_logger, init_logger_with_file};
