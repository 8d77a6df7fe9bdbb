//! Job Service
//!
//! The submission coordinator and the read-only status/result views. Three
//! independently-failing systems meet here (HTTP front end, cluster API,
//! payload store) with no shared transaction; the lifecycle is at-least-once
//! submission with idempotent status observation.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;

use qjob_core::domain::job::{InvalidJobId, JobId, JobState, WorkItem};
use qjob_core::domain::resource::{QuantumJobSpec, QuantumJobStatus, quantum_job_for};
use qjob_core::dto::job::SubmitRequest;

use crate::config::Config;
use crate::resource::{JobResourceClient, ResourceError};
use crate::store::{PayloadRecord, PayloadStore, StoreError};
use crate::transpile::{TranspileError, Transpiler};

/// Service error type
#[derive(Debug, thiserror::Error)]
pub enum JobError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    InvalidId(#[from] InvalidJobId),

    #[error("job {0} already exists")]
    AlreadyExists(JobId),

    #[error("job {0} not found")]
    NotFound(String),

    /// Result requested before the job reached completed
    #[error("job not completed (state: {})", state.label())]
    NotReady { state: JobState },

    #[error(transparent)]
    Transpile(#[from] TranspileError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Cluster(ResourceError),
}

/// Acceptance receipt returned by a successful submission
#[derive(Debug, Clone)]
pub struct SubmitReceipt {
    pub job_id: JobId,
    pub resource_name: String,
}

/// Accept a prepared work item and dispatch it as a cluster job.
///
/// Ordering matters: the payload record is persisted before the job resource
/// is created, so a worker that sees the resource always finds its input. If
/// resource creation fails afterwards the record is deliberately left behind;
/// it self-expires via TTL, which is cheaper than a second failure-prone
/// delete path.
pub async fn submit(
    store: &dyn PayloadStore,
    resources: &dyn JobResourceClient,
    transpiler: &dyn Transpiler,
    config: &Config,
    req: SubmitRequest,
) -> Result<SubmitReceipt, JobError> {
    if req.payload.is_empty() {
        return Err(JobError::Validation("No circuits provided".to_string()));
    }

    let payload = BASE64
        .decode(&req.payload)
        .map_err(|e| JobError::Validation(format!("payload is not valid base64: {e}")))?;

    if payload.is_empty() {
        return Err(JobError::Validation("No circuits provided".to_string()));
    }

    if req.shots == 0 {
        return Err(JobError::Validation("shots must be positive".to_string()));
    }

    let job_id = match req.job_id {
        Some(raw) => JobId::new(raw)?,
        None => JobId::generate(),
    };

    let item = WorkItem {
        payload,
        shots: req.shots,
        target_name: req.target_name,
        resource_hints: req.resources,
    };

    let record = PayloadRecord::with_input(req.payload);
    store.put(&job_id, &record, config.payload_ttl).await?;

    tracing::info!("Stored input payload for job {job_id}");

    let prepared = transpiler.transpile(&item.payload, &item.target_name)?;

    // The worker reads its circuit from the store, so the dispatch-ready
    // payload must land there before the resource exists
    let record = record.replace_circuit(BASE64.encode(&prepared));
    store.update(&job_id, &record, config.payload_ttl).await?;

    let spec = QuantumJobSpec {
        job_id: job_id.to_string(),
        target_name: item.target_name,
        shots: item.shots,
        simulator_image: config.simulator_image.clone(),
        max_retries: config.max_retries,
        timeout_seconds: config.job_timeout_seconds,
        ttl_seconds_after_finished: config.ttl_seconds_after_finished,
        resources: item.resource_hints,
    };

    let resource = quantum_job_for(&job_id, spec);

    match resources.create(&resource).await {
        Ok(resource_name) => {
            tracing::info!("Job {job_id} submitted as {resource_name}");
            Ok(SubmitReceipt {
                job_id,
                resource_name,
            })
        }
        Err(ResourceError::AlreadyExists(_)) => Err(JobError::AlreadyExists(job_id)),
        Err(e) => Err(JobError::Cluster(e)),
    }
}

/// Observe the current status of a job.
///
/// "Not found" can mean never-existed or already garbage-collected; callers
/// cannot tell the two apart and must not assume failure.
pub async fn status(
    resources: &dyn JobResourceClient,
    raw_id: &str,
) -> Result<QuantumJobStatus, JobError> {
    let job_id = parse_lookup_id(raw_id)?;

    resources
        .status(&job_id)
        .await
        .map_err(JobError::Cluster)?
        .ok_or_else(|| JobError::NotFound(raw_id.to_string()))
}

/// Fetch the result payload of a completed job, verbatim as the worker wrote
/// it.
///
/// Completion is re-observed here rather than trusted from a prior poll, so
/// repeated reads stay idempotent and a not-yet-finished job yields a
/// distinguishable "not ready" instead of stale data.
pub async fn result(
    resources: &dyn JobResourceClient,
    store: &dyn PayloadStore,
    raw_id: &str,
) -> Result<String, JobError> {
    let job_id = parse_lookup_id(raw_id)?;

    let status = resources
        .status(&job_id)
        .await
        .map_err(JobError::Cluster)?
        .ok_or_else(|| JobError::NotFound(raw_id.to_string()))?;

    let state = status.observed_state();
    if state != JobState::Completed {
        return Err(JobError::NotReady { state });
    }

    let record = store
        .get(&job_id)
        .await?
        .ok_or_else(|| JobError::NotFound(raw_id.to_string()))?;

    // Completed resource but expired record: the result outlived its TTL
    record
        .results
        .ok_or_else(|| JobError::NotFound(raw_id.to_string()))
}

/// Delete a job's resource and payload record
pub async fn remove(
    resources: &dyn JobResourceClient,
    store: &dyn PayloadStore,
    raw_id: &str,
) -> Result<(), JobError> {
    let job_id = parse_lookup_id(raw_id)?;

    resources.delete(&job_id).await.map_err(JobError::Cluster)?;
    store.delete(&job_id).await?;

    tracing::info!("Removed job {job_id}");

    Ok(())
}

/// List the IDs of all jobs with a live payload record
pub async fn list(store: &dyn PayloadStore) -> Result<Vec<String>, JobError> {
    let mut ids = store.list_ids().await?;
    ids.sort();
    Ok(ids)
}

// An ID that fails validation cannot name any job, so lookups report it the
// same way as a missing one
fn parse_lookup_id(raw_id: &str) -> Result<JobId, JobError> {
    JobId::new(raw_id).map_err(|_| JobError::NotFound(raw_id.to_string()))
}
