//! Outbound order notifications
//!
//! Notifications are best-effort: the order service bounds each attempt with
//! a timeout, logs failures, and never lets them fail the enclosing
//! operation. Implementations must not retry internally.

use crate::core::order::Order;
use async_trait::async_trait;

pub mod log;
pub mod telegram;

pub use log::LogNotifier;
pub use telegram::TelegramNotifier;

/// Errors raised by notification channels
///
/// These are observed and logged by the caller; they never propagate to
/// clients.
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("notification transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("notification channel error: {0}")]
    Channel(String),
}

/// Service trait for outbound order notifications
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Announce a freshly created order, forwarding the uploaded photo
    async fn notify_new_order(&self, order: &Order, photo: &[u8]) -> Result<(), NotifyError>;

    /// Announce that an order's PDF is ready
    async fn notify_completed(&self, order: &Order) -> Result<(), NotifyError>;
}
