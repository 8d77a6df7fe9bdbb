//! Job submission and retrieval DTOs
//!
//! Field names follow the wire contract of the HTTP API: camelCase with the
//! historical `jobID` spelling kept for compatibility with existing clients.

use serde::{Deserialize, Serialize};

use crate::domain::job::JobId;
use crate::domain::resource::ResourceRequirements;

fn default_shots() -> u32 {
    1024
}

fn default_target() -> String {
    "aer-simulator".to_string()
}

/// Request body for POST /submit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitRequest {
    /// Base64-encoded opaque input payload (serialized circuits).
    ///
    /// Defaults to empty when absent so a missing field surfaces as the same
    /// validation error as an empty one, not a deserialization failure.
    #[serde(default)]
    pub payload: String,

    /// Repetition count
    #[serde(default = "default_shots")]
    pub shots: u32,

    /// Execution backend name
    #[serde(rename = "targetName", default = "default_target")]
    pub target_name: String,

    /// Caller-supplied job ID; generated when absent
    #[serde(rename = "jobID", skip_serializing_if = "Option::is_none")]
    pub job_id: Option<String>,

    /// Pod resource hints, forwarded verbatim to the job resource
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resources: Option<ResourceRequirements>,
}

/// 202 acceptance receipt for POST /submit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitResponse {
    pub status: String,
    #[serde(rename = "jobID")]
    pub job_id: JobId,
    pub message: String,
}

impl SubmitResponse {
    pub fn accepted(job_id: JobId) -> Self {
        let message = format!("Job submitted. Poll /job/{job_id}/status for updates");
        Self {
            status: "accepted".to_string(),
            job_id,
            message,
        }
    }
}

/// 500 submission failure body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitFailure {
    pub status: String,
    pub error: String,
    pub message: String,
}

/// 200 body for GET /job/{id}/result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultResponse {
    pub status: String,
    /// Base64-encoded result payload, returned verbatim as the worker wrote it
    pub result: String,
}

/// 400 body for GET /job/{id}/result when the job has not completed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotReadyResponse {
    pub error: String,
    /// Last observed state at the time of the request
    pub status: String,
}

/// 404 body for job lookups
///
/// "Not found" is deliberately ambiguous between "never existed" and
/// "expired and garbage-collected"; callers must not read failure into it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub details: String,
}

/// 200 body for GET /jobs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobListResponse {
    pub jobs: Vec<String>,
}

/// GET /health body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
}

impl HealthResponse {
    pub fn healthy(service: impl Into<String>) -> Self {
        Self {
            status: "healthy".to_string(),
            service: service.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_submit_request_defaults() {
        let req: SubmitRequest = serde_json::from_str(r#"{"payload": "AQ=="}"#).unwrap();

        assert_eq!(req.payload, "AQ==");
        assert_eq!(req.shots, 1024);
        assert_eq!(req.target_name, "aer-simulator");
        assert!(req.job_id.is_none());
        assert!(req.resources.is_none());
    }

    #[test]
    fn test_submit_request_wire_names() {
        let req: SubmitRequest = serde_json::from_value(serde_json::json!({
            "payload": "AQ==",
            "shots": 100,
            "targetName": "t1",
            "jobID": "j1"
        }))
        .unwrap();

        assert_eq!(req.shots, 100);
        assert_eq!(req.target_name, "t1");
        assert_eq!(req.job_id.as_deref(), Some("j1"));
    }

    #[test]
    fn test_accepted_response_shape() {
        let resp = SubmitResponse::accepted(JobId::new("j1").unwrap());
        let value = serde_json::to_value(&resp).unwrap();

        assert_eq!(value["status"], "accepted");
        assert_eq!(value["jobID"], "j1");
        assert!(
            value["message"]
                .as_str()
                .unwrap()
                .contains("/job/j1/status")
        );
    }
}
