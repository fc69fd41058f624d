//! Order service: creation, lookup, listing, and PDF attachment
//!
//! The service enforces the lifecycle invariants and sequences side effects:
//! validate, store the blob, persist the record, then notify best-effort.
//! All collaborators are injected, so the service is testable without a real
//! notification channel or filesystem.

use crate::blob::{BlobKind, BlobStore};
use crate::core::error::{ApiError, ApiResult};
use crate::core::order::{Order, OrderInput, OrderStatus, OrderSummary};
use crate::notify::Notifier;
use crate::storage::{OrderStore, StorageError};
use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

/// Photo upload size cap
pub const MAX_PHOTO_BYTES: usize = 5 * 1024 * 1024;

/// PDF upload size cap
pub const MAX_PDF_BYTES: usize = 20 * 1024 * 1024;

/// Accepted photo content types
const ALLOWED_PHOTO_TYPES: [&str; 3] = ["image/jpeg", "image/jpg", "image/png"];

/// Bounded regenerate-on-collision attempts for order ids
const ID_GENERATION_ATTEMPTS: u32 = 3;

/// An uploaded photo, as extracted from the multipart request
#[derive(Debug, Clone)]
pub struct PhotoUpload {
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Aggregate order counts for the admin dashboard
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderStats {
    pub total_orders: usize,
    pub pending_orders: usize,
    pub completed_orders: usize,
    pub new_orders_today: usize,
}

/// Orchestrates the order lifecycle over injected collaborators
pub struct OrderService {
    store: Arc<dyn OrderStore>,
    blobs: Arc<dyn BlobStore>,
    notifier: Arc<dyn Notifier>,
    notify_timeout: Duration,
}

impl OrderService {
    /// Create a service over the given store, blob store, and notifier
    ///
    /// `notify_timeout` bounds each notification attempt so a slow or broken
    /// channel cannot stall order creation; a timeout counts as notification
    /// failure (non-fatal).
    pub fn new(
        store: Arc<dyn OrderStore>,
        blobs: Arc<dyn BlobStore>,
        notifier: Arc<dyn Notifier>,
        notify_timeout: Duration,
    ) -> Self {
        Self {
            store,
            blobs,
            notifier,
            notify_timeout,
        }
    }

    /// Create a new order from a validated submission and a photo upload
    ///
    /// Sequencing: photo presence and content checks, field validation,
    /// blob store, persist (with bounded id regeneration on collision),
    /// then best-effort notification. If persistence fails after the photo
    /// was stored, the stored photo is deleted.
    pub async fn create_order(
        &self,
        input: OrderInput,
        photo: Option<PhotoUpload>,
    ) -> ApiResult<OrderSummary> {
        let photo = match photo {
            Some(p) if !p.bytes.is_empty() => p,
            _ => return Err(ApiError::MissingPhoto),
        };

        let valid = input.validate().map_err(ApiError::Validation)?;

        let extension = photo_extension(&photo.content_type).ok_or_else(|| {
            ApiError::invalid_field("photo", "only JPG, JPEG, and PNG files are allowed")
        })?;
        if photo.bytes.len() > MAX_PHOTO_BYTES {
            return Err(ApiError::invalid_field("photo", "file exceeds the 5 MiB limit"));
        }

        let stored = self
            .blobs
            .store(BlobKind::Photo, &photo.bytes, extension)
            .await?;

        let mut order = Order::new(valid, stored.clone());
        let mut attempts = 0;
        let mut saved = loop {
            attempts += 1;
            match self.store.insert(order.clone()).await {
                Ok(saved) => break saved,
                Err(StorageError::Duplicate { order_id }) if attempts < ID_GENERATION_ATTEMPTS => {
                    tracing::warn!(%order_id, attempts, "order id collision, regenerating");
                    order.regenerate_id();
                }
                Err(e) => {
                    self.cleanup_blob(&stored.internal_path).await;
                    return Err(e.into());
                }
            }
        };

        tracing::info!(
            order_id = %saved.order_id,
            story_template = %saved.story_template,
            "order created"
        );

        match tokio::time::timeout(
            self.notify_timeout,
            self.notifier.notify_new_order(&saved, &photo.bytes),
        )
        .await
        {
            Ok(Ok(())) => {
                saved.mark_notified();
                if let Err(e) = self.store.update(saved.clone()).await {
                    tracing::warn!(
                        order_id = %saved.order_id,
                        error = %e,
                        "failed to persist notification flag"
                    );
                }
            }
            Ok(Err(e)) => {
                tracing::warn!(order_id = %saved.order_id, error = %e, "order notification failed");
            }
            Err(_) => {
                tracing::warn!(
                    order_id = %saved.order_id,
                    timeout_secs = self.notify_timeout.as_secs(),
                    "order notification timed out"
                );
            }
        }

        Ok(saved.summary())
    }

    /// Look up an order by its exact id
    pub async fn get_order(&self, order_id: &str) -> ApiResult<OrderSummary> {
        let order = self
            .store
            .find(order_id)
            .await?
            .ok_or_else(|| ApiError::NotFound {
                order_id: order_id.to_string(),
            })?;

        Ok(order.summary())
    }

    /// List all orders, newest first
    ///
    /// Ties on identical timestamps break on order id, so the sequence is
    /// stable across repeated calls within one snapshot. No pagination.
    pub async fn list_orders(&self) -> ApiResult<Vec<OrderSummary>> {
        let mut orders = self.store.list().await?;
        orders.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.order_id.cmp(&a.order_id))
        });

        Ok(orders.iter().map(Order::summary).collect())
    }

    /// Attach a finished PDF to an order, completing it
    ///
    /// Fails if the order is unknown (no storage side effect) or already
    /// `ready` (existing pdf untouched). The PDF must be a non-empty
    /// `%PDF-` document within the size cap.
    pub async fn attach_pdf(&self, order_id: &str, pdf: &[u8]) -> ApiResult<OrderSummary> {
        let mut order = self
            .store
            .find(order_id)
            .await?
            .ok_or_else(|| ApiError::NotFound {
                order_id: order_id.to_string(),
            })?;

        if order.status == OrderStatus::Ready {
            return Err(ApiError::AlreadyComplete {
                order_id: order.order_id,
            });
        }

        if pdf.is_empty() {
            return Err(ApiError::invalid_field("pdf", "PDF file is required"));
        }
        if !pdf.starts_with(b"%PDF-") {
            return Err(ApiError::invalid_field("pdf", "file is not a valid PDF document"));
        }
        if pdf.len() > MAX_PDF_BYTES {
            return Err(ApiError::invalid_field("pdf", "file exceeds the 20 MiB limit"));
        }

        let stored = self.blobs.store(BlobKind::Pdf, pdf, ".pdf").await?;

        order.attach_pdf(stored.clone());
        let saved = match self.store.update(order).await {
            Ok(saved) => saved,
            Err(e) => {
                self.cleanup_blob(&stored.internal_path).await;
                return Err(e.into());
            }
        };

        tracing::info!(order_id = %saved.order_id, "order completed");

        match tokio::time::timeout(self.notify_timeout, self.notifier.notify_completed(&saved))
            .await
        {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                tracing::warn!(order_id = %saved.order_id, error = %e, "completion notification failed");
            }
            Err(_) => {
                tracing::warn!(order_id = %saved.order_id, "completion notification timed out");
            }
        }

        Ok(saved.summary())
    }

    /// Aggregate counts for the admin dashboard
    pub async fn stats(&self) -> ApiResult<OrderStats> {
        let orders = self.store.list().await?;
        let today = Utc::now().date_naive();

        Ok(OrderStats {
            total_orders: orders.len(),
            pending_orders: orders
                .iter()
                .filter(|o| o.status == OrderStatus::Pending)
                .count(),
            completed_orders: orders
                .iter()
                .filter(|o| o.status == OrderStatus::Ready)
                .count(),
            new_orders_today: orders
                .iter()
                .filter(|o| o.created_at.date_naive() == today)
                .count(),
        })
    }

    /// Best-effort blob cleanup after a failed persistence; may leak an
    /// orphan blob if the delete fails too.
    async fn cleanup_blob(&self, internal_path: &str) {
        if let Err(e) = self.blobs.delete(internal_path).await {
            tracing::warn!(path = internal_path, error = %e, "failed to delete uploaded blob");
        }
    }
}

/// File extension for an accepted photo content type
fn photo_extension(content_type: &str) -> Option<&'static str> {
    if !ALLOWED_PHOTO_TYPES.iter().any(|t| *t == content_type) {
        return None;
    }
    match content_type {
        "image/png" => Some(".png"),
        _ => Some(".jpg"),
    }
}
