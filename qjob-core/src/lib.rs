//! QJob Core
//!
//! Core types and abstractions for the QJob quantum job platform.
//!
//! This crate contains:
//! - Domain types: Core business entities (JobId, JobState, the QuantumJob
//!   custom resource)
//! - DTOs: Data transfer objects for the orchestrator HTTP API

pub mod domain;
pub mod dto;
