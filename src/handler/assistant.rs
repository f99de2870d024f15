use std::sync::Arc;

use axum::{response::IntoResponse, routing::post, Extension, Json, Router};
use validator::Validate;

use crate::{
    dtos::{
        aidtos::{GenerateDescriptionDto, GeneratedTextDto, UpsellSuggestionsDto},
        ApiResponse,
    },
    error::HttpError,
    service::assistant_service::DescriptionRequest,
    AppState,
};

pub fn assistant_handler() -> Router {
    Router::new()
        .route("/job-description", post(generate_job_description))
        .route("/upsell-suggestions", post(upsell_suggestions))
}

pub async fn generate_job_description(
    Extension(app_state): Extension<Arc<AppState>>,
    Json(body): Json<GenerateDescriptionDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let text = app_state
        .assistant_service
        .generate_job_description(DescriptionRequest {
            title: body.title,
            category: body.category,
            location: body.location,
            budget: body.budget,
            estimated_duration: body.estimated_duration,
        })
        .await?;

    Ok(Json(ApiResponse::success(
        "Description generated",
        GeneratedTextDto { text },
    )))
}

pub async fn upsell_suggestions(
    Extension(app_state): Extension<Arc<AppState>>,
    Json(body): Json<UpsellSuggestionsDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let text = app_state
        .assistant_service
        .upsell_suggestions(&body.title, &body.category, &body.description)
        .await?;

    Ok(Json(ApiResponse::success(
        "Suggestions generated",
        GeneratedTextDto { text },
    )))
}
