//! API Module
//!
//! HTTP API layer for the orchestrator. State is a bundle of explicitly
//! constructed clients (payload store, cluster API, transpiler) injected at
//! startup; handlers hold no ambient globals.

pub mod error;
pub mod health;
pub mod job;

use std::sync::Arc;

use axum::{
    Router,
    routing::{delete, get, post},
};
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::resource::JobResourceClient;
use crate::store::PayloadStore;
use crate::transpile::Transpiler;

/// Shared per-request state.
///
/// All clients are safe for concurrent use; each request runs to completion
/// with no cross-request mutable state.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn PayloadStore>,
    pub resources: Arc<dyn JobResourceClient>,
    pub transpiler: Arc<dyn Transpiler>,
    pub config: Arc<Config>,
}

/// Create the main API router with all endpoints
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health::health_check))
        // Submission
        .route("/submit", post(job::submit_job))
        // Polling and results
        .route("/jobs", get(job::list_jobs))
        .route("/job/{job_id}/status", get(job::get_job_status))
        .route("/job/{job_id}/result", get(job::get_job_result))
        .route("/job/{job_id}", delete(job::delete_job))
        // Add state and middleware
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}
