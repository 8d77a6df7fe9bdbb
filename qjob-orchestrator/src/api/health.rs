//! Health Check API Handler

use axum::Json;
use qjob_core::dto::job::HealthResponse;

/// GET /health
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse::healthy("qjob-orchestrator"))
}
