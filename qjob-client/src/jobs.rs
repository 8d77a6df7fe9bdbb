//! Job-related API endpoints

use crate::OrchestratorClient;
use crate::error::Result;
use qjob_core::domain::resource::QuantumJobStatus;
use qjob_core::dto::job::{
    HealthResponse, JobListResponse, ResultResponse, SubmitRequest, SubmitResponse,
};

impl OrchestratorClient {
    /// Submit a work item for execution
    ///
    /// Returns the 202 acceptance receipt carrying the job ID to poll.
    pub async fn submit(&self, req: &SubmitRequest) -> Result<SubmitResponse> {
        let url = format!("{}/submit", self.base_url);
        let response = self.client.post(&url).json(req).send().await?;

        self.handle_response(response).await
    }

    /// Get the observed status of a job
    pub async fn job_status(&self, job_id: &str) -> Result<QuantumJobStatus> {
        let url = format!("{}/job/{}/status", self.base_url, job_id);
        let response = self.client.get(&url).send().await?;

        self.handle_response(response).await
    }

    /// Get the result of a completed job, still base64-encoded
    pub async fn job_result(&self, job_id: &str) -> Result<ResultResponse> {
        let url = format!("{}/job/{}/result", self.base_url, job_id);
        let response = self.client.get(&url).send().await?;

        self.handle_response(response).await
    }

    /// Delete a job's resource and payload record
    pub async fn delete_job(&self, job_id: &str) -> Result<()> {
        let url = format!("{}/job/{}", self.base_url, job_id);
        let response = self.client.delete(&url).send().await?;

        self.handle_empty_response(response).await
    }

    /// List IDs of jobs the orchestrator still holds a payload record for
    pub async fn list_jobs(&self) -> Result<Vec<String>> {
        let url = format!("{}/jobs", self.base_url);
        let response = self.client.get(&url).send().await?;

        let body: JobListResponse = self.handle_response(response).await?;
        Ok(body.jobs)
    }

    /// Orchestrator health check
    pub async fn health(&self) -> Result<HealthResponse> {
        let url = format!("{}/health", self.base_url);
        let response = self.client.get(&url).send().await?;

        self.handle_response(response).await
    }
}
