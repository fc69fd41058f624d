//! Order intake and fulfillment handlers
//!
//! `create_order` and `get_order` are public; listing and PDF upload
//! require an admin bearer token, enforced by the [`AdminBearer`]
//! extractor before the handler body runs.

use crate::auth::AdminBearer;
use crate::core::error::{ApiError, ApiResult, FieldError};
use crate::core::order::OrderInput;
use crate::core::service::{OrderService, PhotoUpload};
use axum::Json;
use axum::extract::multipart::MultipartError;
use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use serde_json::{Value, json};
use std::sync::Arc;

fn bad_multipart(err: MultipartError) -> ApiError {
    ApiError::Validation(vec![FieldError::new(
        "body",
        format!("malformed multipart payload: {}", err),
    )])
}

/// `POST /orders`: create a new order from a multipart submission
///
/// Expected parts: `childName`, `email`, `storyTemplate`, optional `notes`,
/// and a `photo` file.
pub async fn create_order(
    State(orders): State<Arc<OrderService>>,
    mut multipart: Multipart,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let mut input = OrderInput::default();
    let mut photo: Option<PhotoUpload> = None;

    while let Some(field) = multipart.next_field().await.map_err(bad_multipart)? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "childName" => input.child_name = field.text().await.map_err(bad_multipart)?,
            "email" => input.email = field.text().await.map_err(bad_multipart)?,
            "storyTemplate" => input.story_template = field.text().await.map_err(bad_multipart)?,
            "notes" => input.notes = field.text().await.map_err(bad_multipart)?,
            "photo" => {
                let content_type = field.content_type().unwrap_or_default().to_string();
                let bytes = field.bytes().await.map_err(bad_multipart)?;
                photo = Some(PhotoUpload {
                    content_type,
                    bytes: bytes.to_vec(),
                });
            }
            // Unknown parts are ignored, matching permissive form handling
            _ => {}
        }
    }

    let summary = orders.create_order(input, photo).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "Order created successfully",
            "orderId": summary.order_id,
            "order": summary,
        })),
    ))
}

/// `GET /orders/{order_id}`: fetch one order's public summary
pub async fn get_order(
    State(orders): State<Arc<OrderService>>,
    Path(order_id): Path<String>,
) -> ApiResult<Json<Value>> {
    let summary = orders.get_order(&order_id).await?;

    Ok(Json(json!({
        "success": true,
        "order": summary,
    })))
}

/// `GET /orders`: list all orders, newest first (admin only)
pub async fn list_orders(
    _admin: AdminBearer,
    State(orders): State<Arc<OrderService>>,
) -> ApiResult<Json<Value>> {
    let summaries = orders.list_orders().await?;

    Ok(Json(json!({
        "success": true,
        "total": summaries.len(),
        "orders": summaries,
    })))
}

/// `POST /orders/{order_id}/upload-pdf`: attach the finished PDF (admin only)
///
/// Takes the file from the `pdf` part; any other file part is accepted as a
/// fallback so dashboard uploads with a different part name still work.
pub async fn upload_pdf(
    _admin: AdminBearer,
    State(orders): State<Arc<OrderService>>,
    Path(order_id): Path<String>,
    mut multipart: Multipart,
) -> ApiResult<Json<Value>> {
    let mut pdf: Option<Vec<u8>> = None;

    while let Some(field) = multipart.next_field().await.map_err(bad_multipart)? {
        let name = field.name().unwrap_or_default().to_string();
        let is_file = field.file_name().is_some();
        if name == "pdf" || (pdf.is_none() && is_file) {
            let bytes = field.bytes().await.map_err(bad_multipart)?;
            pdf = Some(bytes.to_vec());
        }
    }

    let pdf = pdf.ok_or_else(|| ApiError::invalid_field("pdf", "PDF file is required"))?;
    let summary = orders.attach_pdf(&order_id, &pdf).await?;

    Ok(Json(json!({
        "success": true,
        "message": "PDF uploaded successfully",
        "order": summary,
    })))
}
