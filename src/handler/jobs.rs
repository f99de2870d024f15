use std::sync::Arc;

use axum::{
    extract::{Path, Query},
    response::IntoResponse,
    routing::{get, post, put},
    Extension, Json, Router,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dtos::{
        jobdtos::{CreateJobDto, JobFilterQuery},
        ApiResponse,
    },
    error::HttpError,
    middleware::JWTAuthMiddeware,
    models::jobmodel::JobAction,
    utils::fees::to_money,
    AppState,
};

pub fn jobs_handler() -> Router {
    Router::new()
        .route("/", post(create_job).get(list_jobs))
        .route("/:job_id", get(get_job))
        .route("/:job_id/accept", put(accept_job))
        .route("/:job_id/start", put(start_job))
        .route("/:job_id/complete", put(complete_job))
        .route("/:job_id/cancel", put(cancel_job))
}

pub async fn create_job(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Json(body): Json<CreateJobDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let budget = to_money(body.budget).map_err(HttpError::bad_request)?;

    let job = app_state
        .job_service
        .create_job(
            &auth.user,
            body.title,
            body.description,
            body.category,
            body.location,
            budget,
        )
        .await?;

    Ok(Json(ApiResponse::success("Job created successfully", job)))
}

pub async fn list_jobs(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Query(query): Query<JobFilterQuery>,
) -> Result<impl IntoResponse, HttpError> {
    let jobs = app_state
        .job_service
        .list_jobs(&auth.user, query.status, query.category)
        .await?;

    Ok(Json(ApiResponse::success("Jobs retrieved successfully", jobs)))
}

pub async fn get_job(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Path(job_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let job = app_state.job_service.get_job(job_id, &auth.user).await?;

    Ok(Json(ApiResponse::success("Job retrieved successfully", job)))
}

pub async fn accept_job(
    app_state: Extension<Arc<AppState>>,
    auth: Extension<JWTAuthMiddeware>,
    path: Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    transition_job(app_state, auth, path, JobAction::Accept).await
}

pub async fn start_job(
    app_state: Extension<Arc<AppState>>,
    auth: Extension<JWTAuthMiddeware>,
    path: Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    transition_job(app_state, auth, path, JobAction::Start).await
}

pub async fn complete_job(
    app_state: Extension<Arc<AppState>>,
    auth: Extension<JWTAuthMiddeware>,
    path: Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    transition_job(app_state, auth, path, JobAction::Complete).await
}

pub async fn cancel_job(
    app_state: Extension<Arc<AppState>>,
    auth: Extension<JWTAuthMiddeware>,
    path: Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    transition_job(app_state, auth, path, JobAction::Cancel).await
}

async fn transition_job(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Path(job_id): Path<Uuid>,
    action: JobAction,
) -> Result<impl IntoResponse, HttpError> {
    let job = app_state
        .job_service
        .transition(job_id, action, &auth.user)
        .await?;

    Ok(Json(ApiResponse::success("Job updated successfully", job)))
}
