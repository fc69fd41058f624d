//! Admin session and dashboard handlers

use crate::auth::{AdminBearer, AdminSessions};
use crate::core::error::ApiResult;
use crate::core::service::OrderService;
use axum::Json;
use axum::extract::State;
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub password: String,
}

/// `POST /admin/login`: verify the shared secret and issue a bearer token
pub async fn login(
    State(sessions): State<Arc<AdminSessions>>,
    Json(request): Json<LoginRequest>,
) -> ApiResult<Json<Value>> {
    let issued = sessions.login(&request.password)?;

    Ok(Json(json!({
        "success": true,
        "message": "Login successful",
        "token": issued.token,
        "admin": {
            "role": "admin",
            "loggedInAt": issued.logged_in_at.to_rfc3339(),
        },
    })))
}

/// `POST /admin/logout`: stateless acknowledgement; the client drops the token
pub async fn logout() -> Json<Value> {
    Json(json!({
        "success": true,
        "message": "Logout successful",
    }))
}

/// `GET /admin/stats`: aggregate order counts (admin only)
pub async fn stats(
    _admin: AdminBearer,
    State(orders): State<Arc<OrderService>>,
) -> ApiResult<Json<Value>> {
    let stats = orders.stats().await?;

    Ok(Json(json!({
        "success": true,
        "stats": stats,
    })))
}
