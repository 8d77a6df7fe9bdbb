//! Wait-for-completion polling protocol
//!
//! Repeatedly observes job status until a terminal state or a fixed deadline.
//! Transient errors during a poll (network hiccups, a 404 while the resource
//! is being reconciled or after garbage collection) are retried silently; the
//! deadline is never reset by them. Timeout, job failure and not-found stay
//! distinguishable conditions so callers can re-poll, abandon or escalate.

use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use std::time::Duration;
use tokio::time::Instant;

use qjob_core::domain::job::JobState;
use qjob_core::domain::resource::QuantumJobStatus;

use crate::OrchestratorClient;
use crate::error::ClientError;

/// Default time between status polls
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);
/// Default overall deadline for a job to complete
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(600);

/// The status/result surface the poller needs.
///
/// A trait rather than the concrete HTTP client so the wait loop can be
/// driven deterministically in tests with a scripted sequence of
/// observations.
#[async_trait]
pub trait JobStatusApi: Send + Sync {
    async fn job_status(&self, job_id: &str) -> Result<QuantumJobStatus, ClientError>;

    /// Result payload of a completed job, base64-encoded
    async fn job_result(&self, job_id: &str) -> Result<String, ClientError>;
}

#[async_trait]
impl JobStatusApi for OrchestratorClient {
    async fn job_status(&self, job_id: &str) -> Result<QuantumJobStatus, ClientError> {
        OrchestratorClient::job_status(self, job_id).await
    }

    async fn job_result(&self, job_id: &str) -> Result<String, ClientError> {
        let response = OrchestratorClient::job_result(self, job_id).await?;
        Ok(response.result)
    }
}

/// Terminal outcomes of waiting for a job
#[derive(Debug, thiserror::Error)]
pub enum AwaitError {
    /// The job reached the failed state; carries the operator's message
    #[error("job failed: {message}")]
    Failed { message: String },

    /// The deadline passed without a terminal state being observed
    #[error("job {job_id} did not complete within {timeout:?}")]
    TimedOut { job_id: String, timeout: Duration },

    /// The job completed but fetching its result failed
    #[error("failed to retrieve result: {0}")]
    Result(#[source] ClientError),

    /// The fetched result payload was not valid base64
    #[error("result payload is not valid base64: {0}")]
    Decode(#[from] base64::DecodeError),
}

/// Wait for a job to complete and return its decoded result payload.
///
/// Blocks the caller's task: the sleeps between polls are the only waiting
/// this client does. On `completed` the result is fetched exactly once; a
/// fetch failure at that point surfaces instead of being retried, since the
/// store record may be racing its TTL.
pub async fn await_result<A>(
    api: &A,
    job_id: &str,
    poll_interval: Duration,
    timeout: Duration,
) -> Result<Vec<u8>, AwaitError>
where
    A: JobStatusApi + ?Sized,
{
    let deadline = Instant::now() + timeout;

    loop {
        match api.job_status(job_id).await {
            Ok(status) => match status.observed_state() {
                JobState::Completed => {
                    let result_b64 = api.job_result(job_id).await.map_err(AwaitError::Result)?;
                    let bytes = BASE64.decode(result_b64.as_bytes())?;

                    tracing::debug!("Job {job_id} completed, {} result bytes", bytes.len());
                    return Ok(bytes);
                }
                JobState::Failed { message } => {
                    return Err(AwaitError::Failed { message });
                }
                state => {
                    tracing::debug!("Job {job_id} status: {state}");
                }
            },
            Err(e) => {
                // Includes not-found: the resource may not be visible yet or
                // may already be garbage-collected. Keep polling until the
                // deadline decides.
                tracing::warn!("Polling error for job {job_id}: {e}, retrying");
            }
        }

        let now = Instant::now();
        if now >= deadline {
            return Err(AwaitError::TimedOut {
                job_id: job_id.to_string(),
                timeout,
            });
        }

        tokio::time::sleep(poll_interval.min(deadline - now)).await;
    }
}

/// Handle to a submitted job, bundling the client and its ID
#[derive(Debug, Clone)]
pub struct JobHandle {
    client: OrchestratorClient,
    job_id: String,
}

impl JobHandle {
    pub fn new(client: OrchestratorClient, job_id: impl Into<String>) -> Self {
        Self {
            client,
            job_id: job_id.into(),
        }
    }

    pub fn job_id(&self) -> &str {
        &self.job_id
    }

    /// One-shot status observation
    pub async fn status(&self) -> Result<QuantumJobStatus, ClientError> {
        self.client.job_status(&self.job_id).await
    }

    /// Wait for completion with the default interval and deadline
    pub async fn wait(&self) -> Result<Vec<u8>, AwaitError> {
        await_result(
            &self.client,
            &self.job_id,
            DEFAULT_POLL_INTERVAL,
            DEFAULT_TIMEOUT,
        )
        .await
    }

    /// Wait for completion with explicit interval and deadline
    pub async fn wait_with(
        &self,
        poll_interval: Duration,
        timeout: Duration,
    ) -> Result<Vec<u8>, AwaitError> {
        await_result(&self.client, &self.job_id, poll_interval, timeout).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qjob_core::domain::resource::ResourcePhase;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Replays a scripted sequence of status observations; the last entry
    /// repeats once the script runs out.
    struct ScriptedApi {
        script: Mutex<VecDeque<Result<QuantumJobStatus, ClientError>>>,
        result: Result<String, ClientError>,
        result_fetches: std::sync::atomic::AtomicUsize,
    }

    impl ScriptedApi {
        fn new(
            script: Vec<Result<QuantumJobStatus, ClientError>>,
            result: Result<String, ClientError>,
        ) -> Self {
            Self {
                script: Mutex::new(script.into()),
                result,
                result_fetches: Default::default(),
            }
        }

        fn fetches(&self) -> usize {
            self.result_fetches
                .load(std::sync::atomic::Ordering::SeqCst)
        }
    }

    fn phase(p: ResourcePhase) -> Result<QuantumJobStatus, ClientError> {
        Ok(QuantumJobStatus {
            state: p,
            ..Default::default()
        })
    }

    fn failed(message: &str) -> Result<QuantumJobStatus, ClientError> {
        Ok(QuantumJobStatus {
            state: ResourcePhase::Failed,
            error_message: Some(message.to_string()),
            ..Default::default()
        })
    }

    fn clone_observation(
        obs: &Result<QuantumJobStatus, ClientError>,
    ) -> Result<QuantumJobStatus, ClientError> {
        match obs {
            Ok(s) => Ok(s.clone()),
            Err(ClientError::NotFound(m)) => Err(ClientError::NotFound(m.clone())),
            Err(e) => Err(ClientError::ParseError(e.to_string())),
        }
    }

    #[async_trait]
    impl JobStatusApi for ScriptedApi {
        async fn job_status(&self, _job_id: &str) -> Result<QuantumJobStatus, ClientError> {
            let mut script = self.script.lock().unwrap();
            if script.len() > 1 {
                script.pop_front().unwrap()
            } else {
                clone_observation(script.front().expect("script must not be empty"))
            }
        }

        async fn job_result(&self, _job_id: &str) -> Result<String, ClientError> {
            self.result_fetches
                .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            match &self.result {
                Ok(s) => Ok(s.clone()),
                Err(e) => Err(ClientError::ParseError(e.to_string())),
            }
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_returns_decoded_result_after_completion() {
        let api = ScriptedApi::new(
            vec![
                phase(ResourcePhase::Pending),
                phase(ResourcePhase::Running),
                phase(ResourcePhase::Completed),
            ],
            Ok("Zg==".to_string()),
        );

        let bytes = await_result(&api, "j1", Duration::from_secs(5), Duration::from_secs(600))
            .await
            .unwrap();

        assert_eq!(bytes, b"f");
        // The result is fetched exactly once
        assert_eq!(api.fetches(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_job_surfaces_operator_message() {
        let api = ScriptedApi::new(
            vec![phase(ResourcePhase::Running), failed("simulator crashed")],
            Ok("unused".to_string()),
        );

        let err = await_result(&api, "j1", Duration::from_secs(5), Duration::from_secs(600))
            .await
            .unwrap_err();

        match err {
            AwaitError::Failed { message } => assert_eq!(message, "simulator crashed"),
            other => panic!("expected failure, got {other}"),
        }
        assert_eq!(api.fetches(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_times_out_when_no_terminal_state_is_reached() {
        let api = ScriptedApi::new(vec![phase(ResourcePhase::Running)], Ok("unused".to_string()));

        let start = Instant::now();
        let err = await_result(&api, "j1", Duration::from_secs(5), Duration::from_secs(60))
            .await
            .unwrap_err();

        assert!(matches!(err, AwaitError::TimedOut { .. }));
        // The deadline is honored, not overshot by a full extra interval
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_secs(60));
        assert!(elapsed < Duration::from_secs(66));
        assert_eq!(api.fetches(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_transient_errors_are_retried_without_resetting_deadline() {
        let api = ScriptedApi::new(
            vec![
                Err(ClientError::NotFound("job j1 not found".to_string())),
                Err(ClientError::ParseError("connection reset".to_string())),
                phase(ResourcePhase::Completed),
            ],
            Ok("AQ==".to_string()),
        );

        let bytes = await_result(&api, "j1", Duration::from_secs(5), Duration::from_secs(600))
            .await
            .unwrap();

        assert_eq!(bytes, vec![0x01]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_persistent_not_found_ends_in_timeout_not_failure() {
        let api = ScriptedApi::new(
            vec![Err(ClientError::NotFound("job j1 not found".to_string()))],
            Ok("unused".to_string()),
        );

        let err = await_result(&api, "j1", Duration::from_secs(5), Duration::from_secs(30))
            .await
            .unwrap_err();

        // Not-found is never conflated with a job failure
        assert!(matches!(err, AwaitError::TimedOut { .. }));
    }

    #[tokio::test(start_paused = true)]
    async fn test_result_fetch_failure_surfaces_immediately() {
        let api = ScriptedApi::new(
            vec![phase(ResourcePhase::Completed)],
            Err(ClientError::ParseError("record expired".to_string())),
        );

        let err = await_result(&api, "j1", Duration::from_secs(5), Duration::from_secs(600))
            .await
            .unwrap_err();

        assert!(matches!(err, AwaitError::Result(_)));
        assert_eq!(api.fetches(), 1);
    }
}
