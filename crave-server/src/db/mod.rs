//! redb-based document store
//!
//! Every entity is stored as a JSON document keyed by its id. Unique
//! names and order numbers are enforced through index tables that are
//! written in the same transaction as the document.
//!
//! # Tables
//!
//! | Table | Key | Value | Purpose |
//! |-------|-----|-------|---------|
//! | `orders` | `order_id` | `Order` | Order documents |
//! | `order_numbers` | `order_number` | `order_id` | Unique order number index |
//! | `categories` | `category_id` | `Category` | Category documents |
//! | `category_names` | `name` | `category_id` | Unique name index |
//! | `products` | `product_id` | `Product` | Product documents |
//! | `product_names` | `name` | `product_id` | Unique name index |
//! | `sequence_counter` | `"order_count"` | `u64` | Order number counter |
//!
//! # Atomicity
//!
//! redb admits one write transaction at a time. Counter increments and the
//! writes that depend on them share a single transaction, so concurrent
//! order creation cannot observe the same count.

pub mod repository;

use redb::{
    Database, ReadableDatabase, ReadableTable, ReadableTableMetadata,
    TableDefinition, WriteTransaction,
};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

/// Document table: key = record id, value = JSON document
pub type DocTable = TableDefinition<'static, &'static str, &'static [u8]>;

/// Index table: key = unique value, value = record id
pub type IndexTable = TableDefinition<'static, &'static str, &'static str>;

pub const ORDERS_TABLE: DocTable = TableDefinition::new("orders");
pub const ORDER_NUMBERS_TABLE: IndexTable = TableDefinition::new("order_numbers");
pub const CATEGORIES_TABLE: DocTable = TableDefinition::new("categories");
pub const CATEGORY_NAMES_TABLE: IndexTable = TableDefinition::new("category_names");
pub const PRODUCTS_TABLE: DocTable = TableDefinition::new("products");
pub const PRODUCT_NAMES_TABLE: IndexTable = TableDefinition::new("product_names");

/// Table for counters: key = counter name, value = u64
const SEQUENCE_TABLE: TableDefinition<&str, u64> = TableDefinition::new("sequence_counter");

const ORDER_COUNT_KEY: &str = "order_count";

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

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Database service owning the redb handle
#[derive(Clone)]
pub struct DbService {
    db: Arc<Database>,
}

impl std::fmt::Debug for DbService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DbService").finish_non_exhaustive()
    }
}

impl DbService {
    /// Open or create the database at the given path
    ///
    /// redb uses `Durability::Immediate` by default: a commit is persistent
    /// as soon as `commit()` returns.
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent)?;
        }
        let db = Database::create(path)?;
        Self::init(db)
    }

    /// Open an in-memory database (tests and throwaway instances)
    pub fn open_in_memory() -> StorageResult<Self> {
        let db = Database::builder().create_with_backend(redb::backends::InMemoryBackend::new())?;
        Self::init(db)
    }

    fn init(db: Database) -> StorageResult<Self> {
        // Create all tables if they don't exist
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(ORDERS_TABLE)?;
            let _ = write_txn.open_table(ORDER_NUMBERS_TABLE)?;
            let _ = write_txn.open_table(CATEGORIES_TABLE)?;
            let _ = write_txn.open_table(CATEGORY_NAMES_TABLE)?;
            let _ = write_txn.open_table(PRODUCTS_TABLE)?;
            let _ = write_txn.open_table(PRODUCT_NAMES_TABLE)?;
            let _ = write_txn.open_table(SEQUENCE_TABLE)?;
        }
        write_txn.commit()?;

        Ok(Self { db: Arc::new(db) })
    }

    /// Begin a write transaction
    pub fn begin_write(&self) -> StorageResult<WriteTransaction> {
        Ok(self.db.begin_write()?)
    }

    // ========== Order Counter ==========

    /// Increment and return the pre-increment order count (within transaction)
    ///
    /// The counter is seeded from the number of stored orders the first
    /// time it is used.
    pub fn next_order_count(&self, txn: &WriteTransaction) -> StorageResult<u64> {
        let mut table = txn.open_table(SEQUENCE_TABLE)?;
        let current = match table.get(ORDER_COUNT_KEY)?.map(|g| g.value()) {
            Some(count) => count,
            None => txn.open_table(ORDERS_TABLE)?.len()?,
        };
        table.insert(ORDER_COUNT_KEY, current + 1)?;
        Ok(current)
    }

    /// Get current order count (without incrementing)
    pub fn get_order_count(&self) -> StorageResult<u64> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(SEQUENCE_TABLE)?;
        match table.get(ORDER_COUNT_KEY)?.map(|g| g.value()) {
            Some(count) => Ok(count),
            None => Ok(read_txn.open_table(ORDERS_TABLE)?.len()?),
        }
    }

    // ========== Document Operations ==========

    /// Get a document by id
    pub fn get_doc<T: DeserializeOwned>(&self, table: DocTable, id: &str) -> StorageResult<Option<T>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(table)?;
        match table.get(id)? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    /// Get a document by id (within transaction)
    pub fn get_doc_txn<T: DeserializeOwned>(
        &self,
        txn: &WriteTransaction,
        table: DocTable,
        id: &str,
    ) -> StorageResult<Option<T>> {
        let table = txn.open_table(table)?;
        match table.get(id)? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    /// Get all documents of a table (key order)
    pub fn list_docs<T: DeserializeOwned>(&self, table: DocTable) -> StorageResult<Vec<T>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(table)?;

        let mut docs = Vec::new();
        for result in table.iter()? {
            let (_key, value) = result?;
            docs.push(serde_json::from_slice(value.value())?);
        }
        Ok(docs)
    }

    /// Store a document (within transaction)
    pub fn put_doc<T: Serialize>(
        &self,
        txn: &WriteTransaction,
        table: DocTable,
        id: &str,
        doc: &T,
    ) -> StorageResult<()> {
        let mut table = txn.open_table(table)?;
        let value = serde_json::to_vec(doc)?;
        table.insert(id, value.as_slice())?;
        Ok(())
    }

    /// Remove a document (within transaction); returns whether it existed
    pub fn remove_doc(&self, txn: &WriteTransaction, table: DocTable, id: &str) -> StorageResult<bool> {
        let mut table = txn.open_table(table)?;
        let existed = table.remove(id)?.is_some();
        Ok(existed)
    }

    // ========== Index Operations ==========

    /// Look up the record id owning a unique key
    pub fn lookup_index(&self, table: IndexTable, key: &str) -> StorageResult<Option<String>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(table)?;
        Ok(table.get(key)?.map(|g| g.value().to_string()))
    }

    /// Look up the record id owning a unique key (within transaction)
    pub fn lookup_index_txn(
        &self,
        txn: &WriteTransaction,
        table: IndexTable,
        key: &str,
    ) -> StorageResult<Option<String>> {
        let table = txn.open_table(table)?;
        let owner = table.get(key)?.map(|g| g.value().to_string());
        Ok(owner)
    }

    /// Point a unique key at a record (within transaction)
    pub fn set_index(
        &self,
        txn: &WriteTransaction,
        table: IndexTable,
        key: &str,
        id: &str,
    ) -> StorageResult<()> {
        let mut table = txn.open_table(table)?;
        table.insert(key, id)?;
        Ok(())
    }

    /// Drop a unique key (within transaction)
    pub fn remove_index(&self, txn: &WriteTransaction, table: IndexTable, key: &str) -> StorageResult<()> {
        let mut table = txn.open_table(table)?;
        table.remove(key)?;
        Ok(())
    }

    /// Number of documents in a table
    pub fn count(&self, table: DocTable) -> StorageResult<u64> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(table)?;
        Ok(table.len()?)
    }
}
