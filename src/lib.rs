//! # Fairytale Orders
//!
//! Order intake service for personalized storybooks: customers submit a
//! child's name, email, story template and a photo; an administrator later
//! attaches the finished PDF, completing the order.
//!
//! ## Features
//!
//! - **Order Lifecycle**: validated creation, lookup, listing, and
//!   PDF-driven completion with forward-only status transitions
//! - **Pluggable Storage**: in-memory document store by default, MongoDB
//!   behind the `mongodb_backend` feature
//! - **Blob Store**: filesystem-backed photo and PDF storage with unique
//!   locators, served statically
//! - **Best-Effort Notifications**: Telegram channel when configured,
//!   local logging otherwise; failures never fail an order operation
//! - **Admin Sessions**: shared-secret login issuing time-limited signed
//!   bearer tokens, verified at the routing boundary
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use fairytale_orders::prelude::*;
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! let service = Arc::new(OrderService::new(
//!     Arc::new(InMemoryOrderStore::new()),
//!     Arc::new(LocalBlobStore::new("uploads", "/uploads")),
//!     Arc::new(LogNotifier),
//!     Duration::from_secs(5),
//! ));
//!
//! let state = AppState {
//!     orders: service,
//!     sessions: Arc::new(AdminSessions::new("secret", "signing-key")),
//! };
//! let app = build_router(state, "uploads".as_ref(), "/uploads");
//! serve("127.0.0.1:3000", app).await?;
//! ```

pub mod auth;
pub mod blob;
pub mod config;
pub mod core;
pub mod notify;
pub mod server;
pub mod storage;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core ===
    pub use crate::core::{
        error::{ApiError, ApiResult, FieldError},
        order::{Order, OrderInput, OrderStatus, OrderSummary, StoryTemplate},
        service::{OrderService, OrderStats, PhotoUpload},
    };

    // === Collaborators ===
    pub use crate::auth::{AdminBearer, AdminClaims, AdminSessions, IssuedToken};
    pub use crate::blob::{BlobError, BlobKind, BlobStore, LocalBlobStore, StoredBlob};
    pub use crate::notify::{LogNotifier, Notifier, NotifyError, TelegramNotifier};
    pub use crate::storage::{InMemoryOrderStore, OrderStore, StorageError};
    #[cfg(feature = "mongodb_backend")]
    pub use crate::storage::MongoOrderStore;

    // === Config & server ===
    pub use crate::config::AppConfig;
    pub use crate::server::{AppState, build_router, serve};

    // === External dependencies ===
    pub use anyhow::Result;
    pub use async_trait::async_trait;
    pub use chrono::{DateTime, Utc};
}
