//! Command definitions and dispatch

pub mod job;

use anyhow::Result;
use clap::Subcommand;

/// Top-level commands
#[derive(Subcommand)]
pub enum Commands {
    /// Submit a payload file as a new job
    Submit {
        /// Path to the serialized circuit payload
        file: std::path::PathBuf,

        /// Repetition count
        #[arg(long, default_value_t = 1024)]
        shots: u32,

        /// Execution backend name
        #[arg(long, default_value = "aer-simulator")]
        target: String,

        /// Explicit job ID (generated when omitted)
        #[arg(long)]
        job_id: Option<String>,

        /// Block until the job completes and print the result path
        #[arg(long)]
        wait: bool,
    },
    /// Show the observed status of a job
    Status {
        /// Job ID
        id: String,
    },
    /// Fetch the result of a completed job
    Result {
        /// Job ID
        id: String,

        /// Write decoded result bytes to this file instead of stdout
        #[arg(short, long)]
        output: Option<std::path::PathBuf>,
    },
    /// Wait for a job to reach a terminal state
    Wait {
        /// Job ID
        id: String,

        /// Seconds between polls
        #[arg(long, default_value_t = 5)]
        interval: u64,

        /// Overall deadline in seconds
        #[arg(long, default_value_t = 600)]
        timeout: u64,
    },
    /// Delete a job's resource and payload record
    Delete {
        /// Job ID
        id: String,
    },
    /// List jobs with a live payload record
    List,
    /// Check orchestrator health
    Health,
}

/// Route a command to its handler
pub async fn handle_command(command: Commands, orchestrator_url: &str) -> Result<()> {
    job::handle(command, orchestrator_url).await
}
