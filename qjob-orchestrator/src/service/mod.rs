//! Service Module
//!
//! Business logic layer for the orchestrator: the submission coordinator and
//! the status/result read paths, written against the store and resource
//! client traits so tests can drive them with in-process fakes.

pub mod job;

pub use job as job_service;
