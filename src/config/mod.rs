//! Environment-driven configuration
//!
//! All settings come from the process environment, loaded once at startup.
//! Secrets (admin password, token signing key) are required and fail fast;
//! everything else has a sensible default. Absence of the Telegram
//! credential pair silently degrades notifications to local logging.

use anyhow::{Context, Result, bail};
use std::env;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, warn};

/// Telegram channel credentials
#[derive(Debug, Clone)]
pub struct TelegramConfig {
    pub bot_token: String,
    pub chat_id: String,
}

/// Complete application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Listen address, e.g. `127.0.0.1:3000`
    pub bind_addr: String,
    /// Blob store root directory
    pub upload_dir: PathBuf,
    /// Public URL prefix under which stored blobs are served
    pub public_upload_base: String,
    /// Shared admin secret
    pub admin_password: String,
    /// HS256 signing key for admin bearer tokens
    pub token_secret: String,
    /// Notification channel credentials; `None` degrades to local logging
    pub telegram: Option<TelegramConfig>,
    /// Bound on a single notification attempt
    pub notify_timeout: Duration,
    /// MongoDB connection string; only used with the `mongodb_backend` feature
    pub mongodb_uri: Option<String>,
    /// MongoDB database name
    pub mongodb_db: String,
}

impl AppConfig {
    /// Load configuration from the process environment
    pub fn load() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup (testable)
    fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let bind_addr = var_or(&var, "BIND_ADDR", "127.0.0.1:3000");
        let upload_dir = PathBuf::from(var_or(&var, "UPLOAD_DIR", "uploads"));
        let public_upload_base = var_or(&var, "PUBLIC_UPLOAD_BASE", "/uploads");

        let admin_password = var("ADMIN_PASSWORD").context("ADMIN_PASSWORD must be set")?;
        let token_secret = var("TOKEN_SECRET").context("TOKEN_SECRET must be set")?;
        if admin_password.is_empty() {
            bail!("ADMIN_PASSWORD must not be empty");
        }
        if token_secret.is_empty() {
            bail!("TOKEN_SECRET must not be empty");
        }

        let telegram = match (var("TELEGRAM_BOT_TOKEN"), var("TELEGRAM_CHAT_ID")) {
            (Some(bot_token), Some(chat_id)) => Some(TelegramConfig { bot_token, chat_id }),
            (None, None) => {
                info!("Telegram not configured; notifications will be logged locally");
                None
            }
            _ => {
                warn!(
                    "Telegram configuration incomplete (need both TELEGRAM_BOT_TOKEN and \
                     TELEGRAM_CHAT_ID); notifications will be logged locally"
                );
                None
            }
        };

        let notify_timeout_secs: u64 = var_or(&var, "NOTIFY_TIMEOUT_SECS", "5")
            .parse()
            .unwrap_or_else(|e| {
                warn!("Invalid NOTIFY_TIMEOUT_SECS value: {e}; using default of 5");
                5
            });

        Ok(Self {
            bind_addr,
            upload_dir,
            public_upload_base,
            admin_password,
            token_secret,
            telegram,
            notify_timeout: Duration::from_secs(notify_timeout_secs),
            mongodb_uri: var("MONGODB_URI"),
            mongodb_db: var_or(&var, "MONGODB_DB", "fairytale"),
        })
    }
}

fn var_or(var: impl Fn(&str) -> Option<String>, key: &str, default: &str) -> String {
    var(key).unwrap_or_else(|| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    })
}
