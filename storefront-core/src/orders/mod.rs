//! Order lifecycle module
//!
//! - **manager**: the state machine: creation (stock reservation),
//!   status/payment transitions, cancellation (stock release), reads
//!
//! # Write path
//!
//! ```text
//! request → validate → write gate (bounded wait)
//!         → one redb write transaction:
//!              stock debit/credit (ascending product id)
//!              order insert/update
//!         → commit (atomic) → response
//! ```

pub mod manager;

pub use manager::{OrderFilter, OrderManager};
