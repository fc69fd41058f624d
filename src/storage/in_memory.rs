//! In-memory implementation of OrderStore for testing and development

use crate::core::order::Order;
use crate::storage::{OrderStore, StorageError};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// In-memory order store implementation
///
/// Useful for testing and development. Uses RwLock for thread-safe access;
/// the lock is only held for map access, never across I/O.
#[derive(Clone, Default)]
pub struct InMemoryOrderStore {
    orders: Arc<RwLock<HashMap<String, Order>>>,
}

impl InMemoryOrderStore {
    /// Create a new in-memory order store
    pub fn new() -> Self {
        Self {
            orders: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

#[async_trait]
impl OrderStore for InMemoryOrderStore {
    async fn insert(&self, order: Order) -> Result<Order, StorageError> {
        let mut orders = self
            .orders
            .write()
            .map_err(|e| StorageError::Backend(format!("failed to acquire write lock: {}", e)))?;

        if orders.contains_key(&order.order_id) {
            return Err(StorageError::Duplicate {
                order_id: order.order_id.clone(),
            });
        }

        orders.insert(order.order_id.clone(), order.clone());

        Ok(order)
    }

    async fn find(&self, order_id: &str) -> Result<Option<Order>, StorageError> {
        let orders = self
            .orders
            .read()
            .map_err(|e| StorageError::Backend(format!("failed to acquire read lock: {}", e)))?;

        Ok(orders.get(order_id).cloned())
    }

    async fn list(&self) -> Result<Vec<Order>, StorageError> {
        let orders = self
            .orders
            .read()
            .map_err(|e| StorageError::Backend(format!("failed to acquire read lock: {}", e)))?;

        Ok(orders.values().cloned().collect())
    }

    async fn update(&self, order: Order) -> Result<Order, StorageError> {
        let mut orders = self
            .orders
            .write()
            .map_err(|e| StorageError::Backend(format!("failed to acquire write lock: {}", e)))?;

        if !orders.contains_key(&order.order_id) {
            return Err(StorageError::NotFound {
                order_id: order.order_id.clone(),
            });
        }

        orders.insert(order.order_id.clone(), order.clone());

        Ok(order)
    }
}
