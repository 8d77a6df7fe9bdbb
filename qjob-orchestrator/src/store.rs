//! Payload store
//!
//! TTL-bounded key-value storage for large job payloads (input circuit and
//! result), keyed by job ID. Every write re-arms the expiry window with the
//! writing call's TTL; records vanish on their own once the window closes,
//! regardless of job state. Single-key, last-writer-wins: the coordinator
//! writes the input once, the worker writes the result once.

use async_trait::async_trait;
use redis::AsyncCommands;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use qjob_core::domain::job::JobId;

/// Key prefix for payload records (`job:{jobID}`)
pub const KEY_PREFIX: &str = "job:";

fn record_key(id: &JobId) -> String {
    format!("{KEY_PREFIX}{id}")
}

/// A payload record as stored under `job:{jobID}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayloadRecord {
    /// Base64-encoded input payload, written by the coordinator before the
    /// job resource is submitted
    pub circuit: Option<String>,

    /// Base64-encoded result payload, written by the worker on completion
    pub results: Option<String>,

    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl PayloadRecord {
    /// A fresh input-only record, result unset
    pub fn with_input(circuit_b64: String) -> Self {
        let now = chrono::Utc::now();
        Self {
            circuit: Some(circuit_b64),
            results: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Replace the stored input payload and refresh the update timestamp
    pub fn replace_circuit(mut self, circuit_b64: String) -> Self {
        self.circuit = Some(circuit_b64);
        self.updated_at = chrono::Utc::now();
        self
    }
}

/// Payload store failure
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("payload store unavailable: {0}")]
    Connection(String),
    #[error("payload store operation failed: {0}")]
    Backend(String),
    #[error("failed to decode payload record: {0}")]
    Decode(#[from] serde_json::Error),
}

impl From<redis::RedisError> for StoreError {
    fn from(err: redis::RedisError) -> Self {
        StoreError::Backend(err.to_string())
    }
}

/// Storage contract for payload records.
///
/// Transient operation failures propagate to the caller uncaught; there is no
/// internal retry.
#[async_trait]
pub trait PayloadStore: Send + Sync {
    /// Store a record under the job ID, arming the given TTL
    async fn put(&self, id: &JobId, record: &PayloadRecord, ttl: Duration)
    -> Result<(), StoreError>;

    /// Fetch a record; None if absent or expired
    async fn get(&self, id: &JobId) -> Result<Option<PayloadRecord>, StoreError>;

    /// Replace a record, last-writer-wins, re-arming the TTL from now
    async fn update(
        &self,
        id: &JobId,
        record: &PayloadRecord,
        ttl: Duration,
    ) -> Result<(), StoreError>;

    /// Remove a record; false if it did not exist
    async fn delete(&self, id: &JobId) -> Result<bool, StoreError>;

    /// All job IDs with a live record
    async fn list_ids(&self) -> Result<Vec<String>, StoreError>;
}

/// Redis-backed payload store
#[derive(Clone)]
pub struct RedisStore {
    conn: redis::aio::MultiplexedConnection,
}

impl RedisStore {
    /// Connect and verify the server responds.
    ///
    /// An unreachable store is a startup failure, not something to limp along
    /// without.
    pub async fn connect(url: &str) -> Result<Self, StoreError> {
        let client =
            redis::Client::open(url).map_err(|e| StoreError::Connection(e.to_string()))?;

        let mut conn = client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?;

        redis::cmd("PING")
            .query_async::<()>(&mut conn)
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?;

        tracing::info!("Connected to payload store at {url}");

        Ok(Self { conn })
    }

    async fn write(
        &self,
        id: &JobId,
        record: &PayloadRecord,
        ttl: Duration,
    ) -> Result<(), StoreError> {
        let json = serde_json::to_string(record)?;
        let mut conn = self.conn.clone();

        let _: () = conn.set_ex(record_key(id), json, ttl.as_secs()).await?;
        Ok(())
    }
}

#[async_trait]
impl PayloadStore for RedisStore {
    async fn put(
        &self,
        id: &JobId,
        record: &PayloadRecord,
        ttl: Duration,
    ) -> Result<(), StoreError> {
        self.write(id, record, ttl).await
    }

    async fn get(&self, id: &JobId) -> Result<Option<PayloadRecord>, StoreError> {
        let mut conn = self.conn.clone();
        let data: Option<String> = conn.get(record_key(id)).await?;

        match data {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    async fn update(
        &self,
        id: &JobId,
        record: &PayloadRecord,
        ttl: Duration,
    ) -> Result<(), StoreError> {
        self.write(id, record, ttl).await
    }

    async fn delete(&self, id: &JobId) -> Result<bool, StoreError> {
        let mut conn = self.conn.clone();
        let removed: i64 = conn.del(record_key(id)).await?;
        Ok(removed > 0)
    }

    async fn list_ids(&self) -> Result<Vec<String>, StoreError> {
        let mut conn = self.conn.clone();
        let keys: Vec<String> = conn.keys(format!("{KEY_PREFIX}*")).await?;

        Ok(keys
            .into_iter()
            .filter_map(|k| k.strip_prefix(KEY_PREFIX).map(str::to_string))
            .collect())
    }
}
