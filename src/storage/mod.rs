//! Storage implementations for the order document store

use crate::core::order::Order;
use async_trait::async_trait;

pub mod in_memory;
#[cfg(feature = "mongodb_backend")]
pub mod mongodb;

pub use in_memory::InMemoryOrderStore;
#[cfg(feature = "mongodb_backend")]
pub use mongodb::MongoOrderStore;

/// Errors raised by order store backends
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// The order id is already taken (uniqueness constraint)
    #[error("order id '{order_id}' already exists")]
    Duplicate { order_id: String },

    /// An update targeted an order that is not in the store
    #[error("order '{order_id}' not found in store")]
    NotFound { order_id: String },

    /// Backend-specific failure
    #[error("storage backend error: {0}")]
    Backend(String),
}

/// Service trait for persisting orders
///
/// Implementations provide a generic key-document store keyed by order id.
/// The unit of atomicity is a single record write; concurrent writers to
/// different orders never conflict.
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Persist a new order
    ///
    /// Fails with [`StorageError::Duplicate`] if the order id is taken;
    /// callers decide whether to regenerate and retry.
    async fn insert(&self, order: Order) -> Result<Order, StorageError>;

    /// Look up an order by its exact id
    async fn find(&self, order_id: &str) -> Result<Option<Order>, StorageError>;

    /// List all orders, in no particular sequence
    async fn list(&self) -> Result<Vec<Order>, StorageError>;

    /// Replace an existing order record
    async fn update(&self, order: Order) -> Result<Order, StorageError>;
}
