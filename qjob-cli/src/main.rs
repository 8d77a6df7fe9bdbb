//! QJob CLI
//!
//! Command-line interface for submitting and tracking quantum jobs through
//! the orchestrator.

mod commands;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, handle_command};

#[derive(Parser)]
#[command(name = "qjob")]
#[command(about = "QJob quantum job platform CLI", long_about = None)]
struct Cli {
    /// Orchestrator URL
    #[arg(
        long,
        env = "QJOB_ORCHESTRATOR_URL",
        default_value = "http://localhost:5002"
    )]
    orchestrator_url: String,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    handle_command(cli.command, &cli.orchestrator_url).await
}
