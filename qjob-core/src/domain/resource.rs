//! QuantumJob custom resource definition
//!
//! The declarative unit of work tracked by the cluster control plane. The
//! orchestrator owns the spec at creation time; the status subresource is
//! owned and mutated exclusively by the external operator and simulator pod.
//! This layer never writes status, it only reads it.

use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::domain::job::{JobId, JobState};

/// Label identifying resources managed by the orchestrator
pub const MANAGED_BY_LABEL: &str = "managed-by";
/// Label carrying the job ID for selector-based lookups
pub const JOB_ID_LABEL: &str = "job-id";
/// Value written into the managed-by label
pub const MANAGER_NAME: &str = "qjob-orchestrator";

/// QuantumJob spec - desired state of a simulation job
#[derive(CustomResource, Clone, Debug, Deserialize, Serialize, JsonSchema)]
#[kube(
    group = "aerjob.dev",
    version = "v1",
    kind = "QuantumJob",
    namespaced,
    status = "QuantumJobStatus",
    shortname = "qj",
    printcolumn = r#"{"name":"State","type":"string","jsonPath":".status.state"}"#,
    printcolumn = r#"{"name":"Target","type":"string","jsonPath":".spec.targetName"}"#,
    printcolumn = r#"{"name":"Retries","type":"integer","jsonPath":".status.retries"}"#
)]
#[serde(rename_all = "camelCase")]
pub struct QuantumJobSpec {
    /// Unique identifier linking this resource to its payload store record
    #[serde(rename = "jobID")]
    pub job_id: String,

    /// Execution backend / capability profile
    pub target_name: String,

    /// Number of times to run the circuit
    pub shots: u32,

    /// Container image the operator runs the job with
    pub simulator_image: String,

    /// Pod retries allowed before the operator marks the job failed
    pub max_retries: u32,

    /// Execution timeout in seconds, enforced by the operator
    pub timeout_seconds: u64,

    /// Lifetime of the finished resource before the operator garbage-collects
    /// it
    pub ttl_seconds_after_finished: u64,

    /// Compute resources for the simulator pod
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resources: Option<ResourceRequirements>,
}

/// Resource requests and limits for the simulator pod
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize, JsonSchema)]
pub struct ResourceRequirements {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requests: Option<ResourceList>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limits: Option<ResourceList>,
}

/// A set of (resource name, quantity) pairs, e.g. cpu "500m", memory "512Mi"
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize, JsonSchema)]
pub struct ResourceList {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cpu: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memory: Option<String>,
}

/// Observed status of a QuantumJob, written by the external operator.
///
/// Absence of the whole status object means the operator has not reconciled
/// the resource yet, which observers treat as pending.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuantumJobStatus {
    /// Current lifecycle phase
    #[serde(default)]
    pub state: ResourcePhase,

    /// Error details, present iff state = failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,

    /// Retry attempts consumed so far
    #[serde(default)]
    pub retries: u32,

    /// Name of the simulator pod currently bound to this job
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pod_name: Option<String>,

    /// When execution started
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<chrono::DateTime<chrono::Utc>>,

    /// When the job reached a terminal state
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completion_time: Option<chrono::DateTime<chrono::Utc>>,
}

impl QuantumJobStatus {
    /// Collapse the raw status object into the closed lifecycle variant.
    ///
    /// A failed status without an operator-supplied message still yields a
    /// `Failed` with a placeholder, never a panic or a bogus success.
    pub fn observed_state(&self) -> JobState {
        match self.state {
            ResourcePhase::Pending => JobState::Pending,
            ResourcePhase::Running => JobState::Running,
            ResourcePhase::Completed => JobState::Completed,
            ResourcePhase::Failed => JobState::Failed {
                message: self
                    .error_message
                    .clone()
                    .unwrap_or_else(|| "unknown error".to_string()),
            },
        }
    }
}

/// Lifecycle phase as written on the wire by the operator
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ResourcePhase {
    #[default]
    Pending,
    Running,
    Completed,
    Failed,
}

/// Build a QuantumJob resource for submission, named and labeled after its
/// job ID
pub fn quantum_job_for(id: &JobId, spec: QuantumJobSpec) -> QuantumJob {
    let mut job = QuantumJob::new(&id.resource_name(), spec);

    let labels = job.metadata.labels.get_or_insert_with(Default::default);
    labels.insert(MANAGED_BY_LABEL.to_string(), MANAGER_NAME.to_string());
    labels.insert(JOB_ID_LABEL.to_string(), id.to_string());

    job
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(job_id: &str) -> QuantumJobSpec {
        QuantumJobSpec {
            job_id: job_id.to_string(),
            target_name: "aer-simulator".to_string(),
            shots: 1024,
            simulator_image: "aer-simulator:v3".to_string(),
            max_retries: 3,
            timeout_seconds: 600,
            ttl_seconds_after_finished: 300,
            resources: None,
        }
    }

    #[test]
    fn test_resource_is_named_and_labeled_after_job_id() {
        let id = JobId::new("abc123").unwrap();
        let job = quantum_job_for(&id, spec("abc123"));

        assert_eq!(job.metadata.name.as_deref(), Some("qjob-abc123"));

        let labels = job.metadata.labels.as_ref().unwrap();
        assert_eq!(labels.get(JOB_ID_LABEL).map(String::as_str), Some("abc123"));
        assert_eq!(
            labels.get(MANAGED_BY_LABEL).map(String::as_str),
            Some(MANAGER_NAME)
        );
    }

    #[test]
    fn test_spec_serializes_with_wire_field_names() {
        let value = serde_json::to_value(spec("j1")).unwrap();

        assert_eq!(value["jobID"], "j1");
        assert_eq!(value["targetName"], "aer-simulator");
        assert_eq!(value["shots"], 1024);
        assert_eq!(value["ttlSecondsAfterFinished"], 300);
        // Unset resources are omitted entirely
        assert!(value.get("resources").is_none());
    }

    #[test]
    fn test_status_deserializes_from_operator_shape() {
        let status: QuantumJobStatus = serde_json::from_value(serde_json::json!({
            "state": "failed",
            "errorMessage": "simulator crashed",
            "retries": 2,
            "podName": "qjob-j1-sim"
        }))
        .unwrap();

        assert_eq!(status.state, ResourcePhase::Failed);
        assert_eq!(status.retries, 2);
        assert_eq!(
            status.observed_state(),
            JobState::Failed {
                message: "simulator crashed".to_string()
            }
        );
    }

    #[test]
    fn test_empty_status_observes_as_pending() {
        let status = QuantumJobStatus::default();
        assert_eq!(status.observed_state(), JobState::Pending);
    }

    #[test]
    fn test_failed_without_message_gets_placeholder() {
        let status = QuantumJobStatus {
            state: ResourcePhase::Failed,
            ..Default::default()
        };

        match status.observed_state() {
            JobState::Failed { message } => assert_eq!(message, "unknown error"),
            other => panic!("expected failed, got {other:?}"),
        }
    }
}
