//! Data transfer objects for the orchestrator HTTP API

pub mod job;
