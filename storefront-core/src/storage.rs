//! redb-based storage layer for the order subsystem
//!
//! # Tables
//!
//! | Table | Key | Value | Purpose |
//! |-------|-----|-------|---------|
//! | `products` | `u64` | JSON `Product` | catalog price/stock ledger |
//! | `orders` | `u64` | JSON `Order` | order aggregate, items inline |
//! | `orders_by_user` | `(u64, u64)` | `()` | user → order index |
//! | `sequences` | `&str` | `u64` | id counters |
//!
//! # Consistency
//!
//! Every mutating lifecycle operation runs inside ONE write transaction
//! covering both the stock mutation(s) and the order write; redb commits
//! are atomic and durable, so a dropped transaction leaves no trace.
//! Readers use MVCC read transactions: a `begin_read` snapshot never
//! observes a half-committed order.

use redb::{
    Database, ReadTransaction, ReadableDatabase, ReadableTable, TableDefinition, WriteTransaction,
};
use shared::models::{Order, Product};
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

/// Catalog records: key = product id, value = JSON-serialized Product
const PRODUCTS_TABLE: TableDefinition<u64, &[u8]> = TableDefinition::new("products");

/// Order aggregates: key = order id, value = JSON-serialized Order
const ORDERS_TABLE: TableDefinition<u64, &[u8]> = TableDefinition::new("orders");

/// User index: key = (user id, order id), value = empty (existence check)
const ORDERS_BY_USER_TABLE: TableDefinition<(u64, u64), ()> =
    TableDefinition::new("orders_by_user");

/// Id counters: key = "order_id" / "product_id", value = last issued id
const SEQUENCES_TABLE: TableDefinition<&str, u64> = TableDefinition::new("sequences");

const ORDER_SEQ_KEY: &str = "order_id";
const PRODUCT_SEQ_KEY: &str = "product_id";

/// Storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] redb::DatabaseError),

    #[error("Transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),

    #[error("Table error: {0}")]
    Table(#[from] redb::TableError),

    #[error("Storage error: {0}")]
    Storage(#[from] redb::StorageError),

    #[error("Commit error: {0}")]
    Commit(#[from] redb::CommitError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Order not found: {0}")]
    OrderNotFound(u64),

    #[error("Product not found: {0}")]
    ProductNotFound(u64),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Order/catalog storage backed by redb
#[derive(Clone)]
pub struct StoreDb {
    db: Arc<Database>,
}

impl StoreDb {
    /// Open or create the database at the given path
    ///
    /// redb commits with `Durability::Immediate`: the database file is
    /// always in a consistent state, even across power loss.
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        let db = Database::create(path)?;
        let store = Self { db: Arc::new(db) };
        store.init_tables()?;
        Ok(store)
    }

    /// Open an in-memory database (for testing)
    #[cfg(test)]
    pub fn open_in_memory() -> StorageResult<Self> {
        let db = Database::builder().create_with_backend(redb::backends::InMemoryBackend::new())?;
        let store = Self { db: Arc::new(db) };
        store.init_tables()?;
        Ok(store)
    }

    fn init_tables(&self) -> StorageResult<()> {
        let write_txn = self.db.begin_write()?;
        {
            let _ = write_txn.open_table(PRODUCTS_TABLE)?;
            let _ = write_txn.open_table(ORDERS_TABLE)?;
            let _ = write_txn.open_table(ORDERS_BY_USER_TABLE)?;

            let mut seq_table = write_txn.open_table(SEQUENCES_TABLE)?;
            if seq_table.get(ORDER_SEQ_KEY)?.is_none() {
                seq_table.insert(ORDER_SEQ_KEY, 0u64)?;
            }
            if seq_table.get(PRODUCT_SEQ_KEY)?.is_none() {
                seq_table.insert(PRODUCT_SEQ_KEY, 0u64)?;
            }
        }
        write_txn.commit()?;
        Ok(())
    }

    /// Begin a write transaction
    pub fn begin_write(&self) -> StorageResult<WriteTransaction> {
        Ok(self.db.begin_write()?)
    }

    /// Begin a read transaction (MVCC snapshot)
    pub fn begin_read(&self) -> StorageResult<ReadTransaction> {
        Ok(self.db.begin_read()?)
    }

    // ========== Sequence Operations ==========

    fn next_id(&self, txn: &WriteTransaction, key: &str) -> StorageResult<u64> {
        let mut table = txn.open_table(SEQUENCES_TABLE)?;
        let current = table.get(key)?.map(|guard| guard.value()).unwrap_or(0);
        let next = current + 1;
        table.insert(key, next)?;
        Ok(next)
    }

    /// Allocate the next order id (within the transaction)
    pub fn next_order_id(&self, txn: &WriteTransaction) -> StorageResult<u64> {
        self.next_id(txn, ORDER_SEQ_KEY)
    }

    /// Allocate the next product id (within the transaction)
    pub fn next_product_id(&self, txn: &WriteTransaction) -> StorageResult<u64> {
        self.next_id(txn, PRODUCT_SEQ_KEY)
    }

    // ========== Product Operations ==========

    /// Insert or replace a product record (within the transaction)
    pub fn store_product(&self, txn: &WriteTransaction, product: &Product) -> StorageResult<()> {
        let mut table = txn.open_table(PRODUCTS_TABLE)?;
        let json = serde_json::to_vec(product)?;
        table.insert(product.id, json.as_slice())?;
        Ok(())
    }

    /// Load a product within a write transaction
    pub fn get_product(&self, txn: &WriteTransaction, id: u64) -> StorageResult<Option<Product>> {
        let table = txn.open_table(PRODUCTS_TABLE)?;
        match table.get(id)? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    /// Load a product from a fresh read snapshot
    pub fn read_product(&self, id: u64) -> StorageResult<Option<Product>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(PRODUCTS_TABLE)?;
        match table.get(id)? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    // ========== Order Operations ==========

    /// Insert or replace an order aggregate (within the transaction)
    ///
    /// Also maintains the user index. Index inserts are idempotent, so
    /// updates of an existing order are safe.
    pub fn store_order(&self, txn: &WriteTransaction, order: &Order) -> StorageResult<()> {
        {
            let mut table = txn.open_table(ORDERS_TABLE)?;
            let json = serde_json::to_vec(order)?;
            table.insert(order.id, json.as_slice())?;
        }
        let mut index = txn.open_table(ORDERS_BY_USER_TABLE)?;
        index.insert((order.user_id, order.id), ())?;
        Ok(())
    }

    /// Load an order within a write transaction
    pub fn get_order(&self, txn: &WriteTransaction, id: u64) -> StorageResult<Option<Order>> {
        let table = txn.open_table(ORDERS_TABLE)?;
        match table.get(id)? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    /// Load an order from a fresh read snapshot
    pub fn read_order(&self, id: u64) -> StorageResult<Option<Order>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(ORDERS_TABLE)?;
        match table.get(id)? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    /// Load every order from one read snapshot
    ///
    /// The dataset is bounded (single-store deployment), so filtering and
    /// pagination happen over this snapshot in memory.
    pub fn read_orders(&self) -> StorageResult<Vec<Order>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(ORDERS_TABLE)?;
        let mut orders = Vec::new();
        for result in table.iter()? {
            let (_key, value) = result?;
            let order: Order = serde_json::from_slice(value.value())?;
            orders.push(order);
        }
        Ok(orders)
    }

    /// Load all orders belonging to one user, via the user index
    pub fn read_orders_by_user(&self, user_id: u64) -> StorageResult<Vec<Order>> {
        let read_txn = self.db.begin_read()?;
        let index = read_txn.open_table(ORDERS_BY_USER_TABLE)?;
        let mut order_ids = Vec::new();
        for result in index.range((user_id, 0)..=(user_id, u64::MAX))? {
            let (key, _value) = result?;
            order_ids.push(key.value().1);
        }

        let table = read_txn.open_table(ORDERS_TABLE)?;
        let mut orders = Vec::new();
        for id in order_ids {
            match table.get(id)? {
                Some(value) => orders.push(serde_json::from_slice(value.value())?),
                None => return Err(StorageError::OrderNotFound(id)),
            }
        }
        Ok(orders)
    }
}
