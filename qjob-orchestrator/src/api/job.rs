//! Job API Handlers
//!
//! HTTP endpoints for job submission, polling and result retrieval.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use qjob_core::domain::resource::QuantumJobStatus;
use qjob_core::dto::job::{JobListResponse, ResultResponse, SubmitRequest, SubmitResponse};

use crate::api::AppState;
use crate::api::error::{ApiError, ApiResult};
use crate::service::job_service;

/// POST /submit
/// Accept a work item, persist its payload and dispatch a job resource
pub async fn submit_job(
    State(state): State<AppState>,
    Json(req): Json<SubmitRequest>,
) -> ApiResult<(StatusCode, Json<SubmitResponse>)> {
    tracing::info!(
        "Submission for target {} ({} shots)",
        req.target_name,
        req.shots
    );

    let receipt = job_service::submit(
        state.store.as_ref(),
        state.resources.as_ref(),
        state.transpiler.as_ref(),
        &state.config,
        req,
    )
    .await
    .map_err(|e| match e {
        // Infra failures during submission get the submit-specific 500 body
        job_service::JobError::Store(err) => ApiError::SubmitFailed {
            error: err.to_string(),
            message: "failed to persist payload".to_string(),
        },
        job_service::JobError::Cluster(err) => ApiError::SubmitFailed {
            error: err.to_string(),
            message: "failed to create job resource".to_string(),
        },
        other => other.into(),
    })?;

    Ok((
        StatusCode::ACCEPTED,
        Json(SubmitResponse::accepted(receipt.job_id)),
    ))
}

/// GET /job/{job_id}/status
/// Observed status of a job, as written by the external operator
pub async fn get_job_status(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> ApiResult<Json<QuantumJobStatus>> {
    tracing::debug!("Status lookup for job {job_id}");

    let status = job_service::status(state.resources.as_ref(), &job_id).await?;

    Ok(Json(status))
}

/// GET /job/{job_id}/result
/// Result payload of a completed job, verbatim base64
pub async fn get_job_result(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> ApiResult<Json<ResultResponse>> {
    tracing::debug!("Result lookup for job {job_id}");

    let result =
        job_service::result(state.resources.as_ref(), state.store.as_ref(), &job_id).await?;

    Ok(Json(ResultResponse {
        status: "success".to_string(),
        result,
    }))
}

/// DELETE /job/{job_id}
/// Remove a job's resource and payload record
pub async fn delete_job(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> ApiResult<StatusCode> {
    tracing::info!("Deleting job {job_id}");

    job_service::remove(state.resources.as_ref(), state.store.as_ref(), &job_id).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// GET /jobs
/// List IDs of jobs with a live payload record
pub async fn list_jobs(State(state): State<AppState>) -> ApiResult<Json<JobListResponse>> {
    let jobs = job_service::list(state.store.as_ref()).await?;

    Ok(Json(JobListResponse { jobs }))
}
