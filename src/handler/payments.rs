use std::sync::Arc;

use axum::{
    body::Bytes,
    http::HeaderMap,
    response::IntoResponse,
    routing::post,
    Extension, Json, Router,
};
use serde_json::json;

use crate::{
    dtos::{invoicedtos::InitiatePaymentDto, ApiResponse},
    error::HttpError,
    middleware::JWTAuthMiddeware,
    service::{error::ServiceError, webhook_service::WebhookEvent},
    AppState,
};

pub fn payments_handler() -> Router {
    Router::new().route("/create-intent", post(create_payment_intent))
}

pub async fn create_payment_intent(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Json(body): Json<InitiatePaymentDto>,
) -> Result<impl IntoResponse, HttpError> {
    let payment = app_state
        .payment_service
        .initiate_payment(body.invoice_id, &auth.user)
        .await?;

    Ok(Json(ApiResponse::success(
        "Payment intent created",
        payment,
    )))
}

/// Processor webhook endpoint. Public route; the signature over the raw
/// body is verified before anything else is parsed or touched.
pub async fn stripe_webhook(
    Extension(app_state): Extension<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<impl IntoResponse, HttpError> {
    let signature = headers
        .get("stripe-signature")
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| HttpError::from(ServiceError::InvalidSignature))?;

    app_state
        .webhook_service
        .verify_signature(signature, &body)
        .map_err(|e| {
            tracing::warn!("Invalid webhook signature received");
            HttpError::from(e)
        })?;

    let event: WebhookEvent = serde_json::from_slice(&body)
        .map_err(|e| HttpError::bad_request(format!("Malformed webhook payload: {e}")))?;

    match app_state.webhook_service.handle_event(event).await {
        Ok(_) => Ok(Json(json!({"received": true}))),
        // Data-layer failure: withhold the ack so the processor redelivers
        Err(ServiceError::Database(e)) => {
            tracing::error!("Webhook handler database error: {}", e);
            Err(HttpError::server_error("Webhook handler failed"))
        }
        Err(e) => {
            tracing::warn!("Webhook handler error (acknowledged): {}", e);
            Ok(Json(json!({"received": true})))
        }
    }
}
