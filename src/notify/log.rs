//! Local-log notification fallback
//!
//! Used whenever no notification channel is configured, so order events
//! still leave a trace in the service logs.

use crate::core::order::Order;
use crate::notify::{Notifier, NotifyError};
use async_trait::async_trait;

/// Notifier that records order events in the local log
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify_new_order(&self, order: &Order, photo: &[u8]) -> Result<(), NotifyError> {
        tracing::info!(
            order_id = %order.order_id,
            child_name = %order.child_name,
            email = %order.email,
            story_title = %order.story_title,
            photo_bytes = photo.len(),
            "new order received"
        );
        Ok(())
    }

    async fn notify_completed(&self, order: &Order) -> Result<(), NotifyError> {
        tracing::info!(
            order_id = %order.order_id,
            child_name = %order.child_name,
            "order completed"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blob::StoredBlob;
    use crate::core::order::OrderInput;

    #[tokio::test]
    async fn test_log_notifier_never_fails() {
        let order = crate::core::order::Order::new(
            OrderInput {
                child_name: "Mia".to_string(),
                email: "mia@x.com".to_string(),
                story_template: "magic-garden".to_string(),
                notes: String::new(),
            }
            .validate()
            .unwrap(),
            StoredBlob {
                public_url: "/uploads/photos/p.png".to_string(),
                internal_path: "uploads/photos/p.png".to_string(),
            },
        );

        let notifier = LogNotifier;
        assert!(notifier.notify_new_order(&order, b"png").await.is_ok());
        assert!(notifier.notify_completed(&order).await.is_ok());
    }
}
