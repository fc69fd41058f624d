//! HTTP exposure: router assembly and serving
//!
//! The router consumes a shared [`AppState`] and produces an Axum `Router`
//! with the order intake surface, the admin surface, a health check, and
//! static serving of stored blobs. Admin-only routes verify the bearer
//! token in the extractor, before any handler runs.

pub mod handlers;

use crate::auth::AdminSessions;
use crate::core::service::OrderService;
use anyhow::Result;
use axum::Router;
use axum::extract::{DefaultBodyLimit, FromRef};
use axum::routing::{get, post};
use std::path::Path;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

/// Request body ceiling: covers the PDF cap plus multipart overhead
const MAX_UPLOAD_BODY_BYTES: usize = 25 * 1024 * 1024;

/// Application state shared across all HTTP handlers
#[derive(Clone, FromRef)]
pub struct AppState {
    pub orders: Arc<OrderService>,
    pub sessions: Arc<AdminSessions>,
}

/// Build the full application router
///
/// `upload_dir` is served statically under `public_base`, so the locators
/// handed out by the blob store resolve.
pub fn build_router(state: AppState, upload_dir: &Path, public_base: &str) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route(
            "/orders",
            post(handlers::orders::create_order).get(handlers::orders::list_orders),
        )
        .route("/orders/{order_id}", get(handlers::orders::get_order))
        .route(
            "/orders/{order_id}/upload-pdf",
            post(handlers::orders::upload_pdf),
        )
        .route("/admin/login", post(handlers::admin::login))
        .route("/admin/logout", post(handlers::admin::logout))
        .route("/admin/stats", get(handlers::admin::stats))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BODY_BYTES))
        .with_state(state)
        .nest_service(public_base, ServeDir::new(upload_dir))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
}

/// Serve the application with graceful shutdown
///
/// Binds to the provided address and handles SIGTERM and Ctrl+C.
pub async fn serve(addr: &str, app: Router) -> Result<()> {
    let listener = TcpListener::bind(addr).await?;

    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Wait for shutdown signal (SIGTERM or Ctrl+C)
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal, initiating graceful shutdown...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM signal, initiating graceful shutdown...");
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blob::LocalBlobStore;
    use crate::notify::LogNotifier;
    use crate::storage::InMemoryOrderStore;
    use std::time::Duration;

    #[test]
    fn test_build_router_produces_router() {
        let state = AppState {
            orders: Arc::new(OrderService::new(
                Arc::new(InMemoryOrderStore::new()),
                Arc::new(LocalBlobStore::new("/tmp/fairytale-test", "/uploads")),
                Arc::new(LogNotifier),
                Duration::from_secs(5),
            )),
            sessions: Arc::new(AdminSessions::new("secret", "signing")),
        };

        // We cannot inspect the Router deeply, but assembly should not panic
        let _ = build_router(state, Path::new("/tmp/fairytale-test"), "/uploads");
    }
}
