//! Product catalog ledger
//!
//! The narrow catalog interface the order lifecycle consumes: read a
//! product, conditionally debit stock, credit stock back. The ledger
//! shares the order store's database so that stock mutations commit in
//! the same transaction as the order write.
//!
//! Stock invariant: `stock_quantity` never goes negative. `try_debit`
//! checks sufficiency inside the serialized write transaction that
//! applies the debit, so no interleaving can overdraw a product.

use redb::WriteTransaction;
use rust_decimal::Decimal;
use shared::models::{NewProduct, Product};
use thiserror::Error;

use crate::storage::{StorageError, StoreDb};

/// Ledger errors
#[derive(Debug, Error)]
pub enum StockError {
    #[error("Product not found with id: {0}")]
    ProductNotFound(u64),

    #[error("Not enough stock for product: {name}")]
    Insufficient {
        product_id: u64,
        name: String,
        available: i64,
        requested: u32,
    },

    #[error("Invalid product: {0}")]
    Invalid(String),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

pub type StockResult<T> = Result<T, StockError>;

/// Catalog price/stock ledger over the shared store
#[derive(Clone)]
pub struct ProductCatalog {
    db: StoreDb,
}

impl ProductCatalog {
    pub fn new(db: StoreDb) -> Self {
        Self { db }
    }

    /// Insert a new product record (seed/admin path)
    ///
    /// Catalog management proper lives outside this subsystem; this is
    /// the minimal write needed to provision the ledger.
    pub fn create(&self, new: NewProduct) -> StockResult<Product> {
        if new.price < Decimal::ZERO {
            return Err(StockError::Invalid("price must be non-negative".to_string()));
        }
        if matches!(new.discount_price, Some(discount) if discount < Decimal::ZERO) {
            return Err(StockError::Invalid("discount price must be non-negative".to_string()));
        }
        if new.stock_quantity < 0 {
            return Err(StockError::Invalid("stock quantity must be non-negative".to_string()));
        }

        let txn = self.db.begin_write()?;
        let product = {
            let id = self.db.next_product_id(&txn)?;
            let product = Product {
                id,
                name: new.name,
                description: new.description,
                price: new.price,
                discount_price: new.discount_price,
                stock_quantity: new.stock_quantity,
                image_url: new.image_url,
                version: 0,
            };
            self.db.store_product(&txn, &product)?;
            product
        };
        txn.commit().map_err(StorageError::from)?;
        tracing::debug!(product_id = product.id, name = %product.name, "product created");
        Ok(product)
    }

    /// Read a product from a fresh snapshot
    pub fn get(&self, id: u64) -> StockResult<Product> {
        self.db
            .read_product(id)?
            .ok_or(StockError::ProductNotFound(id))
    }

    /// Read a product within the caller's write transaction
    pub fn fetch(&self, txn: &WriteTransaction, id: u64) -> StockResult<Product> {
        self.db
            .get_product(txn, id)?
            .ok_or(StockError::ProductNotFound(id))
    }

    /// Conditionally debit stock: all-or-nothing per call
    ///
    /// Fails without writing when the product is unknown or stock is
    /// insufficient. On success the record is rewritten with the
    /// decremented stock and a bumped version, and returned so the caller
    /// can snapshot price fields from the same read.
    pub fn try_debit(&self, txn: &WriteTransaction, id: u64, quantity: u32) -> StockResult<Product> {
        let mut product = self.fetch(txn, id)?;
        if product.stock_quantity < i64::from(quantity) {
            return Err(StockError::Insufficient {
                product_id: product.id,
                name: product.name,
                available: product.stock_quantity,
                requested: quantity,
            });
        }
        product.stock_quantity -= i64::from(quantity);
        product.version += 1;
        self.db.store_product(txn, &product)?;
        Ok(product)
    }

    /// Credit stock back (cancellation path)
    pub fn credit(&self, txn: &WriteTransaction, id: u64, quantity: u32) -> StockResult<Product> {
        let mut product = self.fetch(txn, id)?;
        product.stock_quantity += i64::from(quantity);
        product.version += 1;
        self.db.store_product(txn, &product)?;
        Ok(product)
    }
}

/// Convenience for tests and fixtures
pub fn new_product(name: &str, price: Decimal, stock: i64) -> NewProduct {
    NewProduct {
        name: name.to_string(),
        description: None,
        price,
        discount_price: None,
        stock_quantity: stock,
        image_url: None,
    }
}
