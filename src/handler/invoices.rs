use std::sync::Arc;

use axum::{
    extract::{Path, Query},
    response::IntoResponse,
    routing::{get, post},
    Extension, Json, Router,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dtos::{
        invoicedtos::{CreateInvoiceDto, InvoiceFilterQuery},
        ApiResponse,
    },
    error::HttpError,
    middleware::JWTAuthMiddeware,
    utils::fees::to_money,
    AppState,
};

pub fn invoices_handler() -> Router {
    Router::new()
        .route("/", post(create_invoice).get(list_invoices))
        .route("/:invoice_id", get(get_invoice))
}

pub async fn create_invoice(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Json(body): Json<CreateInvoiceDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let amount = body
        .amount
        .map(|value| to_money(value).map_err(HttpError::bad_request))
        .transpose()?;

    let invoice = app_state
        .invoice_service
        .create_invoice(body.job_id, amount, &auth.user)
        .await?;

    Ok(Json(ApiResponse::success(
        "Invoice created successfully",
        invoice,
    )))
}

pub async fn list_invoices(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Query(query): Query<InvoiceFilterQuery>,
) -> Result<impl IntoResponse, HttpError> {
    let invoices = app_state
        .invoice_service
        .list_invoices(&auth.user, query.status)
        .await?;

    Ok(Json(ApiResponse::success(
        "Invoices retrieved successfully",
        invoices,
    )))
}

pub async fn get_invoice(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Path(invoice_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let invoice = app_state
        .invoice_service
        .get_invoice(invoice_id, &auth.user)
        .await?;

    Ok(Json(ApiResponse::success(
        "Invoice retrieved successfully",
        invoice,
    )))
}
