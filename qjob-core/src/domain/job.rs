//! Job domain types

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Prefix used to derive a cluster resource name from a job ID.
///
/// Shared by submission and lookup so identity is derivable from the ID alone.
pub const RESOURCE_NAME_PREFIX: &str = "qjob-";

/// Maximum accepted length for a caller-supplied job ID.
///
/// Kubernetes object names are capped at 253 characters; staying well below
/// that leaves room for the resource prefix and pod name suffixes.
pub const MAX_JOB_ID_LEN: usize = 40;

/// Number of hex characters taken from a fresh UUID when generating an ID.
const GENERATED_ID_LEN: usize = 16;

/// Opaque job identifier.
///
/// Globally unique for the lifetime of a job plus its TTL window. Restricted
/// to lowercase alphanumerics so it can be embedded both in a cluster
/// resource name and a payload store key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct JobId(String);

impl JobId {
    /// Validate and wrap a caller-supplied identifier
    pub fn new(id: impl Into<String>) -> Result<Self, InvalidJobId> {
        let id = id.into();

        if id.is_empty() {
            return Err(InvalidJobId::Empty);
        }
        if id.len() > MAX_JOB_ID_LEN {
            return Err(InvalidJobId::TooLong(id.len()));
        }
        if !id
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        {
            return Err(InvalidJobId::InvalidCharacters(id));
        }

        Ok(Self(id))
    }

    /// Generate a fresh random identifier
    ///
    /// 16 hex characters (64 bits), enough entropy to avoid collisions across
    /// the payload TTL window.
    pub fn generate() -> Self {
        let hex = Uuid::new_v4().simple().to_string();
        Self(hex[..GENERATED_ID_LEN].to_string())
    }

    /// The cluster resource name for this job (`qjob-<id>`)
    pub fn resource_name(&self) -> String {
        format!("{}{}", RESOURCE_NAME_PREFIX, self.0)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for JobId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for JobId {
    type Error = InvalidJobId;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<JobId> for String {
    fn from(id: JobId) -> Self {
        id.0
    }
}

/// Rejected job identifier
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidJobId {
    #[error("job ID must not be empty")]
    Empty,
    #[error("job ID exceeds {MAX_JOB_ID_LEN} characters (got {0})")]
    TooLong(usize),
    #[error("job ID '{0}' contains characters outside [a-z0-9]")]
    InvalidCharacters(String),
}

/// A prepared unit of work, immutable once submitted.
#[derive(Debug, Clone)]
pub struct WorkItem {
    /// Opaque binary input payload (a serialized circuit in the reference
    /// deployment)
    pub payload: Vec<u8>,
    /// Repetition count, must be positive
    pub shots: u32,
    /// Execution backend / capability profile to run against
    pub target_name: String,
    /// Structured resource hints, forwarded verbatim to the job resource
    pub resource_hints: Option<crate::domain::resource::ResourceRequirements>,
}

/// Observed job lifecycle state.
///
/// A closed variant rather than a free-form status map: a completed job
/// without a retrievable result or a failed job without a message are
/// unrepresentable. Transitions are driven entirely by the external
/// operator/worker; this layer only observes them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobState {
    Pending,
    Running,
    Completed,
    Failed { message: String },
}

impl JobState {
    /// Whether this state is terminal (no further transitions expected)
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobState::Completed | JobState::Failed { .. })
    }

    /// Wire label for the state, matching the `state` field the operator
    /// writes into the resource status
    pub fn label(&self) -> &'static str {
        match self {
            JobState::Pending => "pending",
            JobState::Running => "running",
            JobState::Completed => "completed",
            JobState::Failed { .. } => "failed",
        }
    }
}

impl std::fmt::Display for JobState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_ids_are_valid_and_distinct() {
        let a = JobId::generate();
        let b = JobId::generate();

        assert_ne!(a, b);
        assert_eq!(a.as_str().len(), 16);
        assert!(JobId::new(a.as_str()).is_ok());
    }

    #[test]
    fn test_job_id_rejects_bad_input() {
        assert_eq!(JobId::new(""), Err(InvalidJobId::Empty));
        assert!(matches!(
            JobId::new("a".repeat(41)),
            Err(InvalidJobId::TooLong(41))
        ));
        assert!(JobId::new("UPPER").is_err());
        assert!(JobId::new("has-dash").is_err());
        assert!(JobId::new("has space").is_err());
        assert!(JobId::new("abc123").is_ok());
    }

    #[test]
    fn test_resource_name_is_derived_from_id() {
        let id = JobId::new("j1").unwrap();
        assert_eq!(id.resource_name(), "qjob-j1");
    }

    #[test]
    fn test_terminal_states() {
        assert!(!JobState::Pending.is_terminal());
        assert!(!JobState::Running.is_terminal());
        assert!(JobState::Completed.is_terminal());
        assert!(
            JobState::Failed {
                message: "simulator crashed".to_string()
            }
            .is_terminal()
        );
    }

    #[test]
    fn test_job_id_serde_round_trip() {
        let id = JobId::new("abc123").unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"abc123\"");

        let back: JobId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);

        // Deserialization enforces the same validation as construction
        assert!(serde_json::from_str::<JobId>("\"NOT VALID\"").is_err());
    }
}
