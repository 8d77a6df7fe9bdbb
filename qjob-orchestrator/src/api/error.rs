//! API Error Handling
//!
//! Maps service errors onto the HTTP contract. Response bodies differ by
//! class: validation and not-ready use `{"error", ...}` shapes, submission
//! infrastructure failures use `{"status":"failed", "error", "message"}`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use qjob_core::dto::job::{ErrorResponse, NotReadyResponse, SubmitFailure};

use crate::service::job_service::JobError;

/// API error type
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    NotFound(String),
    Conflict(String),
    NotReady { state: String },
    SubmitFailed { error: String, message: String },
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::BadRequest(msg) => (
                StatusCode::BAD_REQUEST,
                Json(serde_json::json!({ "error": msg })),
            )
                .into_response(),
            ApiError::NotFound(id) => (
                StatusCode::NOT_FOUND,
                Json(ErrorResponse {
                    error: format!("job {id} not found"),
                    details: String::new(),
                }),
            )
                .into_response(),
            ApiError::Conflict(msg) => (
                StatusCode::CONFLICT,
                Json(serde_json::json!({ "error": msg })),
            )
                .into_response(),
            ApiError::NotReady { state } => (
                StatusCode::BAD_REQUEST,
                Json(NotReadyResponse {
                    error: "Job not completed".to_string(),
                    status: state,
                }),
            )
                .into_response(),
            ApiError::SubmitFailed { error, message } => {
                tracing::error!("Submission failed: {error}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(SubmitFailure {
                        status: "failed".to_string(),
                        error,
                        message,
                    }),
                )
                    .into_response()
            }
            ApiError::Internal(details) => {
                tracing::error!("Internal error: {details}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorResponse {
                        error: "Internal Server Error".to_string(),
                        details,
                    }),
                )
                    .into_response()
            }
        }
    }
}

impl From<JobError> for ApiError {
    fn from(err: JobError) -> Self {
        match err {
            JobError::Validation(msg) => ApiError::BadRequest(msg),
            JobError::InvalidId(e) => ApiError::BadRequest(e.to_string()),
            JobError::AlreadyExists(id) => ApiError::Conflict(format!("job {id} already exists")),
            JobError::NotFound(id) => ApiError::NotFound(id),
            JobError::NotReady { state } => ApiError::NotReady {
                state: state.label().to_string(),
            },
            JobError::Transpile(e) => ApiError::SubmitFailed {
                error: e.to_string(),
                message: "payload preparation failed".to_string(),
            },
            JobError::Store(e) => ApiError::Internal(e.to_string()),
            JobError::Cluster(e) => ApiError::Internal(e.to_string()),
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
