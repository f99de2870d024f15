use std::sync::Arc;

use axum::{
    extract::Path,
    response::IntoResponse,
    routing::{get, post},
    Extension, Json, Router,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    db::photodb::PhotoExt,
    dtos::{photodtos::AddPhotoDto, ApiResponse},
    error::HttpError,
    middleware::JWTAuthMiddeware,
    models::jobmodel::JobStatus,
    service::error::ServiceError,
    AppState,
};

pub fn photos_handler() -> Router {
    Router::new().route("/:job_id/photos", post(add_photo).get(list_photos))
}

/// Register proof-of-work photo metadata. The image bytes live in the
/// external blob store; we only persist the reference.
pub async fn add_photo(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Path(job_id): Path<Uuid>,
    Json(body): Json<AddPhotoDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let job = app_state.job_service.get_job(job_id, &auth.user).await?;

    if !job.is_party(auth.user.id) {
        return Err(ServiceError::Forbidden {
            user: auth.user.id,
            entity: job_id,
        }
        .into());
    }

    // progress/after shots only make sense once work has started
    if body.photo_type.requires_work_started()
        && matches!(job.status, JobStatus::Open | JobStatus::Accepted)
    {
        return Err(HttpError::bad_request(
            "Proof-of-work photos require the job to be in progress",
        ));
    }

    let photo = app_state
        .db_client
        .create_photo(
            job_id,
            auth.user.id,
            body.photo_type,
            body.url,
            body.description,
            body.latitude,
            body.longitude,
            body.captured_at,
        )
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(Json(ApiResponse::success("Photo added successfully", photo)))
}

pub async fn list_photos(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Path(job_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    // visibility follows the job itself
    app_state.job_service.get_job(job_id, &auth.user).await?;

    let photos = app_state
        .db_client
        .list_photos_for_job(job_id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(Json(ApiResponse::success(
        "Photos retrieved successfully",
        photos,
    )))
}
