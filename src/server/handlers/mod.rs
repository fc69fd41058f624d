//! HTTP handlers for the order intake and admin surfaces

pub mod admin;
pub mod orders;

use axum::Json;
use serde_json::{Value, json};

/// Health check endpoint handler
pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "fairytale-orders"
    }))
}
