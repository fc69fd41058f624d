//! Server binary: configuration, dependency wiring, and serving

use anyhow::Result;
use fairytale_orders::auth::AdminSessions;
use fairytale_orders::blob::LocalBlobStore;
use fairytale_orders::config::AppConfig;
use fairytale_orders::core::service::OrderService;
use fairytale_orders::notify::{LogNotifier, Notifier, TelegramNotifier};
use fairytale_orders::server::{AppState, build_router, serve};
use fairytale_orders::storage::{InMemoryOrderStore, OrderStore};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = AppConfig::load()?;

    let store = build_store(&config).await?;
    let blobs = Arc::new(LocalBlobStore::new(
        config.upload_dir.clone(),
        config.public_upload_base.clone(),
    ));
    let notifier: Arc<dyn Notifier> = match &config.telegram {
        Some(telegram) => {
            tracing::info!("Telegram notifications enabled");
            Arc::new(TelegramNotifier::new(
                telegram.bot_token.clone(),
                telegram.chat_id.clone(),
            ))
        }
        None => Arc::new(LogNotifier),
    };

    let state = AppState {
        orders: Arc::new(OrderService::new(
            store,
            blobs,
            notifier,
            config.notify_timeout,
        )),
        sessions: Arc::new(AdminSessions::new(
            config.admin_password.clone(),
            &config.token_secret,
        )),
    };

    let app = build_router(state, &config.upload_dir, &config.public_upload_base);
    serve(&config.bind_addr, app).await
}

/// Select the order store backend from configuration
async fn build_store(config: &AppConfig) -> Result<Arc<dyn OrderStore>> {
    #[cfg(feature = "mongodb_backend")]
    if let Some(uri) = &config.mongodb_uri {
        let client = mongodb::Client::with_uri_str(uri).await?;
        tracing::info!(db = %config.mongodb_db, "using MongoDB order store");
        return Ok(Arc::new(fairytale_orders::storage::MongoOrderStore::new(
            client.database(&config.mongodb_db),
        )));
    }

    #[cfg(not(feature = "mongodb_backend"))]
    if config.mongodb_uri.is_some() {
        tracing::warn!(
            "MONGODB_URI is set but the mongodb_backend feature is disabled; \
             using the in-memory store"
        );
    }

    tracing::info!("using in-memory order store");
    Ok(Arc::new(InMemoryOrderStore::new()))
}
