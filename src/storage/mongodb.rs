//! MongoDB storage backend using the official MongoDB async driver.
//!
//! Provides a [`MongoOrderStore`] backed by an `orders` collection via
//! `mongodb::Database`.
//!
//! # Feature flag
//!
//! This module is gated behind the `mongodb_backend` feature flag:
//! ```toml
//! [dependencies]
//! fairytale-orders = { version = "0.1", features = ["mongodb_backend"] }
//! ```
//!
//! # Storage model
//!
//! Orders are serialized via `serde_json::Value` as an intermediate format,
//! then converted to BSON documents, so DateTime values travel as ISO 8601
//! strings and enums as their wire identifiers. The `orderId` field is
//! mapped to MongoDB's `_id`, which makes the server's primary-key index
//! enforce the order-id uniqueness constraint: a colliding insert comes back
//! as a duplicate-key write error and surfaces as
//! [`StorageError::Duplicate`].

use crate::core::order::Order;
use crate::storage::{OrderStore, StorageError};
use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::Database;
use mongodb::bson::{Bson, Document, doc};
use mongodb::error::{ErrorKind, WriteFailure};

/// Collection holding all order documents
const ORDERS_COLLECTION: &str = "orders";

// ---------------------------------------------------------------------------
// Conversion helpers
// ---------------------------------------------------------------------------

/// Convert an order into a BSON Document, renaming `orderId` → `_id` for
/// MongoDB convention.
fn order_to_document(order: &Order) -> Result<Document, StorageError> {
    let json = serde_json::to_value(order)
        .map_err(|e| StorageError::Backend(format!("failed to serialize order: {}", e)))?;

    let bson_val = mongodb::bson::to_bson(&json)
        .map_err(|e| StorageError::Backend(format!("failed to convert JSON to BSON: {}", e)))?;

    let mut doc = match bson_val {
        Bson::Document(d) => d,
        _ => {
            return Err(StorageError::Backend(
                "expected BSON document, got non-object".to_string(),
            ));
        }
    };

    if let Some(id) = doc.remove("orderId") {
        doc.insert("_id", id);
    }

    Ok(doc)
}

/// Convert a BSON Document back into an order, renaming `_id` → `orderId`.
fn document_to_order(mut doc: Document) -> Result<Order, StorageError> {
    if let Some(id) = doc.remove("_id") {
        doc.insert("orderId", id);
    }

    let json = Bson::Document(doc).into_relaxed_extjson();
    serde_json::from_value(json)
        .map_err(|e| StorageError::Backend(format!("failed to deserialize order document: {}", e)))
}

/// Whether a driver error is the server's duplicate-key rejection.
fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    match &*err.kind {
        ErrorKind::Write(WriteFailure::WriteError(we)) => we.code == 11000,
        _ => false,
    }
}

// ---------------------------------------------------------------------------
// MongoOrderStore
// ---------------------------------------------------------------------------

/// Order store backed by MongoDB.
///
/// # Example
///
/// ```rust,ignore
/// use mongodb::Client;
/// use fairytale_orders::storage::MongoOrderStore;
///
/// let client = Client::with_uri_str("mongodb://localhost:27017").await?;
/// let store = MongoOrderStore::new(client.database("fairytale"));
/// ```
#[derive(Clone, Debug)]
pub struct MongoOrderStore {
    database: Database,
}

impl MongoOrderStore {
    /// Create a new `MongoOrderStore` with the given database handle.
    pub fn new(database: Database) -> Self {
        Self { database }
    }

    fn collection(&self) -> mongodb::Collection<Document> {
        self.database.collection(ORDERS_COLLECTION)
    }
}

#[async_trait]
impl OrderStore for MongoOrderStore {
    /// Insert a new order.
    ///
    /// A duplicate-key write error maps to [`StorageError::Duplicate`] so
    /// the caller can regenerate the id and retry.
    async fn insert(&self, order: Order) -> Result<Order, StorageError> {
        let doc = order_to_document(&order)?;

        self.collection().insert_one(doc).await.map_err(|e| {
            if is_duplicate_key(&e) {
                StorageError::Duplicate {
                    order_id: order.order_id.clone(),
                }
            } else {
                StorageError::Backend(format!("failed to insert order: {}", e))
            }
        })?;

        Ok(order)
    }

    async fn find(&self, order_id: &str) -> Result<Option<Order>, StorageError> {
        let doc = self
            .collection()
            .find_one(doc! { "_id": order_id })
            .await
            .map_err(|e| StorageError::Backend(format!("failed to find order: {}", e)))?;

        match doc {
            Some(d) => Ok(Some(document_to_order(d)?)),
            None => Ok(None),
        }
    }

    async fn list(&self) -> Result<Vec<Order>, StorageError> {
        let cursor = self
            .collection()
            .find(doc! {})
            .await
            .map_err(|e| StorageError::Backend(format!("failed to list orders: {}", e)))?;

        let docs: Vec<Document> = cursor
            .try_collect()
            .await
            .map_err(|e| StorageError::Backend(format!("failed to collect orders: {}", e)))?;

        docs.into_iter().map(document_to_order).collect()
    }

    /// Replace an existing order record.
    ///
    /// Returns [`StorageError::NotFound`] if no document matched.
    async fn update(&self, order: Order) -> Result<Order, StorageError> {
        let doc = order_to_document(&order)?;

        let result = self
            .collection()
            .replace_one(doc! { "_id": order.order_id.as_str() }, doc)
            .await
            .map_err(|e| StorageError::Backend(format!("failed to update order: {}", e)))?;

        if result.matched_count == 0 {
            return Err(StorageError::NotFound {
                order_id: order.order_id.clone(),
            });
        }

        Ok(order)
    }
}
