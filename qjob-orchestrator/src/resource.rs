//! Job resource client
//!
//! Thin typed client over the cluster control plane for the QuantumJob
//! custom resource: create, read status, delete. The external operator owns
//! everything after creation; this client never writes status.

use async_trait::async_trait;
use kube::api::{Api, DeleteParams, PostParams};

use qjob_core::domain::job::JobId;
use qjob_core::domain::resource::{QuantumJob, QuantumJobStatus};

/// Cluster API failure
#[derive(Debug, thiserror::Error)]
pub enum ResourceError {
    /// A resource with the same name already exists. Surfaced distinctly so
    /// a duplicate caller-supplied job ID can be rejected rather than
    /// reported as a generic failure.
    #[error("job resource '{0}' already exists")]
    AlreadyExists(String),

    #[error("cluster API error: {0}")]
    Api(String),
}

/// Contract for managing QuantumJob resources.
///
/// `status` distinguishes "resource does not exist" (Ok(None), e.g. after
/// TTL-triggered cleanup by the operator) from a transport failure (Err).
#[async_trait]
pub trait JobResourceClient: Send + Sync {
    /// Submit a new job resource, returning its name
    async fn create(&self, job: &QuantumJob) -> Result<String, ResourceError>;

    /// Read the observed status of the resource named after this job ID.
    ///
    /// A resource the operator has not reconciled yet reads as a default
    /// (pending) status, not as missing.
    async fn status(&self, id: &JobId) -> Result<Option<QuantumJobStatus>, ResourceError>;

    /// Delete the resource named after this job ID; idempotent
    async fn delete(&self, id: &JobId) -> Result<(), ResourceError>;
}

/// Kubernetes-backed implementation over the namespaced QuantumJob API
#[derive(Clone)]
pub struct KubeJobClient {
    api: Api<QuantumJob>,
}

impl KubeJobClient {
    /// Build a client from the ambient cluster configuration (in-cluster
    /// service account or local kubeconfig)
    pub async fn new(namespace: &str) -> Result<Self, ResourceError> {
        let client = kube::Client::try_default()
            .await
            .map_err(|e| ResourceError::Api(format!("failed to load cluster config: {e}")))?;

        Ok(Self {
            api: Api::namespaced(client, namespace),
        })
    }

    fn map_error(name: &str, err: kube::Error) -> ResourceError {
        match err {
            kube::Error::Api(ref resp) if resp.code == 409 => {
                ResourceError::AlreadyExists(name.to_string())
            }
            other => ResourceError::Api(other.to_string()),
        }
    }
}

#[async_trait]
impl JobResourceClient for KubeJobClient {
    async fn create(&self, job: &QuantumJob) -> Result<String, ResourceError> {
        let name = job.metadata.name.clone().unwrap_or_default();

        let created = self
            .api
            .create(&PostParams::default(), job)
            .await
            .map_err(|e| Self::map_error(&name, e))?;

        tracing::info!("Created job resource {name}");

        Ok(created.metadata.name.unwrap_or(name))
    }

    async fn status(&self, id: &JobId) -> Result<Option<QuantumJobStatus>, ResourceError> {
        let name = id.resource_name();

        let job = self
            .api
            .get_opt(&name)
            .await
            .map_err(|e| Self::map_error(&name, e))?;

        Ok(job.map(|j| j.status.unwrap_or_default()))
    }

    async fn delete(&self, id: &JobId) -> Result<(), ResourceError> {
        let name = id.resource_name();

        match self.api.delete(&name, &DeleteParams::default()).await {
            Ok(_) => {
                tracing::info!("Deleted job resource {name}");
                Ok(())
            }
            // Already gone is fine, deletion races operator TTL cleanup
            Err(kube::Error::Api(resp)) if resp.code == 404 => Ok(()),
            Err(e) => Err(Self::map_error(&name, e)),
        }
    }
}
