//! Telegram notification channel
//!
//! Posts an HTML order summary to a configured chat via the Bot API, then
//! forwards the customer's photo as a separate message. Photo forwarding is
//! best-effort on top of best-effort: if it fails, a warning message is
//! posted instead so the admin knows to pull the photo from the dashboard.

use crate::core::order::Order;
use crate::notify::{Notifier, NotifyError};
use async_trait::async_trait;
use reqwest::multipart;

/// Notifier posting to a Telegram chat
#[derive(Debug, Clone)]
pub struct TelegramNotifier {
    http: reqwest::Client,
    bot_token: String,
    chat_id: String,
}

impl TelegramNotifier {
    /// Create a notifier for the given bot credentials and destination chat
    pub fn new(bot_token: impl Into<String>, chat_id: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            bot_token: bot_token.into(),
            chat_id: chat_id.into(),
        }
    }

    fn api_url(&self, method: &str) -> String {
        format!("https://api.telegram.org/bot{}/{}", self.bot_token, method)
    }

    async fn send_message(&self, text: String) -> Result<(), NotifyError> {
        let response = self
            .http
            .post(self.api_url("sendMessage"))
            .json(&serde_json::json!({
                "chat_id": self.chat_id,
                "text": text,
                "parse_mode": "HTML",
                "disable_web_page_preview": true,
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(NotifyError::Channel(format!(
                "sendMessage returned status {}",
                response.status()
            )));
        }
        Ok(())
    }

    async fn send_photo(&self, caption: String, photo: &[u8]) -> Result<(), NotifyError> {
        let part = multipart::Part::bytes(photo.to_vec()).file_name("photo");
        let form = multipart::Form::new()
            .text("chat_id", self.chat_id.clone())
            .text("caption", caption)
            .part("photo", part);

        let response = self
            .http
            .post(self.api_url("sendPhoto"))
            .multipart(form)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(NotifyError::Channel(format!(
                "sendPhoto returned status {}",
                response.status()
            )));
        }
        Ok(())
    }

    fn format_order_message(order: &Order) -> String {
        format!(
            "🎉 <b>NEW STORYBOOK ORDER!</b>\n\n\
             📋 <b>Order Details:</b>\n\
             • Order ID: <code>#{}</code>\n\
             • Child Name: {}\n\
             • Email: {}\n\
             • Story Template: {}\n\n\
             ⏰ <b>Timeline:</b>\n\
             • Order Date: {}\n\
             • Expected Delivery: 3-5 business days\n\n\
             📸 <b>Next Steps:</b>\n\
             1. Download the child's photo from the admin panel\n\
             2. Create the personalized storybook\n\
             3. Upload the completed PDF",
            order.order_id,
            order.child_name,
            order.email,
            order.story_title,
            order.created_at.format("%Y-%m-%d"),
        )
    }

    fn format_completion_message(order: &Order) -> String {
        format!(
            "✅ <b>ORDER COMPLETED!</b>\n\n\
             📋 <b>Order Details:</b>\n\
             • Order ID: <code>#{}</code>\n\
             • Child Name: {}\n\
             • Email: {}\n\
             • Story Template: {}\n\n\
             The customer can now download their storybook.",
            order.order_id, order.child_name, order.email, order.story_title,
        )
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn notify_new_order(&self, order: &Order, photo: &[u8]) -> Result<(), NotifyError> {
        self.send_message(Self::format_order_message(order)).await?;

        // The text message is the notification; the photo is a convenience.
        let caption = format!("📸 Photo for Order #{}", order.order_id);
        if let Err(e) = self.send_photo(caption, photo).await {
            tracing::warn!(order_id = %order.order_id, error = %e, "failed to forward order photo");
            self.send_message(format!(
                "⚠️ Could not send photo for Order #{}. Please check the file manually.",
                order.order_id
            ))
            .await
            .ok();
        }

        Ok(())
    }

    async fn notify_completed(&self, order: &Order) -> Result<(), NotifyError> {
        self.send_message(Self::format_completion_message(order))
            .await
    }
}
