//! Core domain types
//!
//! This module contains the core domain structures used across QJob services.
//! These types are shared between the orchestrator (which submits cluster
//! resources and persists payloads) and the client (which polls them).

pub mod job;
pub mod resource;
