//! Orchestrator configuration
//!
//! All knobs come from the environment so the service can be tuned per
//! deployment without rebuilds (namespace, TTLs, retry budget, image).

use std::time::Duration;

/// Orchestrator configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Address the HTTP server binds to
    pub bind_addr: String,

    /// Payload store connection URL (e.g. "redis://localhost:6379")
    pub redis_url: String,

    /// Kubernetes namespace job resources are created in
    pub namespace: String,

    /// Container image the operator runs simulation jobs with
    pub simulator_image: String,

    /// Execution timeout embedded in each job resource, seconds
    pub job_timeout_seconds: u64,

    /// Pod retries allowed before the operator marks a job failed
    pub max_retries: u32,

    /// Lifetime of a finished job resource before operator garbage collection
    pub ttl_seconds_after_finished: u64,

    /// Lifetime of a payload store record, refreshed on every write.
    ///
    /// Must comfortably exceed typical job duration plus polling overhead: a
    /// result that is not fetched before this window closes is gone.
    pub payload_ttl: Duration,
}

impl Config {
    /// Creates configuration from environment variables
    ///
    /// Expected environment variables:
    /// - QJOB_BIND_ADDR (optional, default: 0.0.0.0:5002)
    /// - REDIS_URL (optional, default: redis://localhost:6379)
    /// - K8S_NAMESPACE (optional, default: default)
    /// - SIMULATOR_IMAGE (optional, default: aer-simulator:v3)
    /// - JOB_TIMEOUT (optional, seconds, default: 600)
    /// - MAX_RETRIES (optional, default: 3)
    /// - DEFAULT_TTL_SECONDS (optional, default: 300)
    /// - PAYLOAD_TTL_SECONDS (optional, default: 1200)
    pub fn from_env() -> Self {
        let bind_addr =
            std::env::var("QJOB_BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:5002".to_string());

        let redis_url =
            std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://localhost:6379".to_string());

        let namespace = std::env::var("K8S_NAMESPACE").unwrap_or_else(|_| "default".to_string());

        let simulator_image =
            std::env::var("SIMULATOR_IMAGE").unwrap_or_else(|_| "aer-simulator:v3".to_string());

        let job_timeout_seconds = std::env::var("JOB_TIMEOUT")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(600);

        let max_retries = std::env::var("MAX_RETRIES")
            .ok()
            .and_then(|s| s.parse::<u32>().ok())
            .unwrap_or(3);

        let ttl_seconds_after_finished = std::env::var("DEFAULT_TTL_SECONDS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(300);

        let payload_ttl = std::env::var("PAYLOAD_TTL_SECONDS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(1200));

        Self {
            bind_addr,
            redis_url,
            namespace,
            simulator_image,
            job_timeout_seconds,
            max_retries,
            ttl_seconds_after_finished,
            payload_ttl,
        }
    }

    /// Validates the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.bind_addr.is_empty() {
            return Err("bind address cannot be empty".to_string());
        }

        if !self.redis_url.starts_with("redis://") && !self.redis_url.starts_with("rediss://") {
            return Err("REDIS_URL must start with redis:// or rediss://".to_string());
        }

        if self.namespace.is_empty() {
            return Err("namespace cannot be empty".to_string());
        }

        if self.simulator_image.is_empty() {
            return Err("simulator image cannot be empty".to_string());
        }

        if self.job_timeout_seconds == 0 {
            return Err("job timeout must be greater than 0".to_string());
        }

        if self.payload_ttl.as_secs() == 0 {
            return Err("payload TTL must be greater than 0".to_string());
        }

        if self.payload_ttl.as_secs() < self.job_timeout_seconds {
            return Err(
                "payload TTL must not be shorter than the job timeout, results would expire \
                 before slow jobs finish"
                    .to_string(),
            );
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:5002".to_string(),
            redis_url: "redis://localhost:6379".to_string(),
            namespace: "default".to_string(),
            simulator_image: "aer-simulator:v3".to_string(),
            job_timeout_seconds: 600,
            max_retries: 3,
            ttl_seconds_after_finished: 300,
            payload_ttl: Duration::from_secs(1200),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.payload_ttl, Duration::from_secs(1200));
        assert_eq!(config.max_retries, 3);
    }

    #[test]
    fn test_config_validation() {
        let mut config = Config::default();
        assert!(config.validate().is_ok());

        config.redis_url = "not-a-url".to_string();
        assert!(config.validate().is_err());
        config.redis_url = "redis://payload-store:6379".to_string();
        assert!(config.validate().is_ok());

        // A payload TTL shorter than the job timeout would lose results
        config.payload_ttl = Duration::from_secs(10);
        assert!(config.validate().is_err());
    }
}
