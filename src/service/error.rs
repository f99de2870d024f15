use axum::http::StatusCode;
use thiserror::Error;
use uuid::Uuid;

use crate::{
    error::HttpError,
    models::{jobmodel::JobStatus, usermodel::UserRole},
};

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Job {0} not found")]
    JobNotFound(Uuid),

    #[error("Invoice {0} not found")]
    InvoiceNotFound(Uuid),

    #[error("User {user} is not authorized to perform this action on {entity}")]
    Forbidden { user: Uuid, entity: Uuid },

    #[error("Invalid transition from {from:?} to {to:?} as {role:?}")]
    InvalidTransition {
        from: JobStatus,
        to: JobStatus,
        role: UserRole,
    },

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Webhook signature verification failed")]
    InvalidSignature,

    #[error("Payment processor unavailable: {0}")]
    ProcessorUnavailable(String),

    #[error("Text generation service error: {0}")]
    Upstream(String),

    #[error("Concurrent update lost the race, retry the operation")]
    Conflict,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl ServiceError {
    /// Stable machine-readable kind callers can branch on.
    pub fn kind(&self) -> &'static str {
        match self {
            ServiceError::JobNotFound(_) | ServiceError::InvoiceNotFound(_) => "not_found",
            ServiceError::Forbidden { .. } => "forbidden",
            ServiceError::InvalidTransition { .. } => "invalid_transition",
            ServiceError::InvalidState(_) => "invalid_state",
            ServiceError::Validation(_) => "validation_error",
            ServiceError::InvalidSignature => "invalid_signature",
            ServiceError::ProcessorUnavailable(_) => "processor_unavailable",
            ServiceError::Upstream(_) => "upstream_error",
            ServiceError::Conflict => "conflict",
            ServiceError::Database(_) => "server_error",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::JobNotFound(_) | ServiceError::InvoiceNotFound(_) => {
                StatusCode::NOT_FOUND
            }
            ServiceError::Forbidden { .. } => StatusCode::FORBIDDEN,
            ServiceError::InvalidTransition { .. }
            | ServiceError::InvalidState(_)
            | ServiceError::Validation(_)
            | ServiceError::InvalidSignature => StatusCode::BAD_REQUEST,
            ServiceError::Conflict => StatusCode::CONFLICT,
            ServiceError::ProcessorUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ServiceError::Upstream(_) => StatusCode::BAD_GATEWAY,
            ServiceError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<String> for ServiceError {
    fn from(err: String) -> Self {
        ServiceError::Validation(err)
    }
}

impl From<ServiceError> for HttpError {
    fn from(error: ServiceError) -> Self {
        let kind = error.kind();
        let status = error.status_code();
        HttpError::new(error.to_string(), status, kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        let id = Uuid::new_v4();
        assert_eq!(
            ServiceError::JobNotFound(id).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ServiceError::Forbidden { user: id, entity: id }.status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            ServiceError::InvalidSignature.status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ServiceError::ProcessorUnavailable("timeout".into()).status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(ServiceError::Conflict.status_code(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_kinds_are_stable() {
        assert_eq!(ServiceError::InvalidSignature.kind(), "invalid_signature");
        assert_eq!(
            ServiceError::Validation("bad".into()).kind(),
            "validation_error"
        );
        assert_eq!(
            ServiceError::InvalidTransition {
                from: JobStatus::Paid,
                to: JobStatus::Cancelled,
                role: UserRole::Client,
            }
            .kind(),
            "invalid_transition"
        );
    }
}
