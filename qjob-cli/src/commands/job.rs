//! Job command handlers

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use colored::*;

use qjob_client::{OrchestratorClient, poller};
use qjob_core::domain::job::JobState;
use qjob_core::dto::job::SubmitRequest;

use crate::commands::Commands;

pub async fn handle(command: Commands, orchestrator_url: &str) -> Result<()> {
    let client = OrchestratorClient::new(orchestrator_url);

    match command {
        Commands::Submit {
            file,
            shots,
            target,
            job_id,
            wait,
        } => submit(&client, &file, shots, target, job_id, wait).await,
        Commands::Status { id } => status(&client, &id).await,
        Commands::Result { id, output } => result(&client, &id, output).await,
        Commands::Wait {
            id,
            interval,
            timeout,
        } => wait(&client, &id, interval, timeout).await,
        Commands::Delete { id } => delete(&client, &id).await,
        Commands::List => list(&client).await,
        Commands::Health => health(&client).await,
    }
}

async fn submit(
    client: &OrchestratorClient,
    file: &Path,
    shots: u32,
    target: String,
    job_id: Option<String>,
    wait_for_result: bool,
) -> Result<()> {
    let payload = std::fs::read(file)
        .with_context(|| format!("failed to read payload file {}", file.display()))?;

    let accepted = client
        .submit(&SubmitRequest {
            payload: BASE64.encode(&payload),
            shots,
            target_name: target,
            job_id,
            resources: None,
        })
        .await?;

    println!("{} {}", "Accepted job".green().bold(), accepted.job_id);
    println!("{}", accepted.message.dimmed());

    if wait_for_result {
        let bytes = poller::await_result(
            client,
            accepted.job_id.as_str(),
            poller::DEFAULT_POLL_INTERVAL,
            poller::DEFAULT_TIMEOUT,
        )
        .await?;

        println!(
            "{} ({} bytes)",
            "Job completed".green().bold(),
            bytes.len()
        );
    }

    Ok(())
}

async fn status(client: &OrchestratorClient, id: &str) -> Result<()> {
    let status = client.job_status(id).await?;

    let state = status.observed_state();
    println!("{} {}", "State:".bold(), paint_state(&state));

    if let JobState::Failed { message } = &state {
        println!("{} {}", "Error:".bold(), message.red());
    }
    if status.retries > 0 {
        println!("{} {}", "Retries:".bold(), status.retries);
    }
    if let Some(pod) = &status.pod_name {
        println!("{} {}", "Pod:".bold(), pod);
    }
    if let Some(started) = &status.start_time {
        println!("{} {}", "Started:".bold(), started);
    }
    if let Some(finished) = &status.completion_time {
        println!("{} {}", "Finished:".bold(), finished);
    }

    Ok(())
}

async fn result(client: &OrchestratorClient, id: &str, output: Option<PathBuf>) -> Result<()> {
    let response = client.job_result(id).await?;

    match output {
        Some(path) => {
            let bytes = BASE64
                .decode(response.result.as_bytes())
                .context("result payload is not valid base64")?;
            std::fs::write(&path, &bytes)
                .with_context(|| format!("failed to write {}", path.display()))?;
            println!(
                "{} {} ({} bytes)",
                "Result written to".green().bold(),
                path.display(),
                bytes.len()
            );
        }
        None => println!("{}", response.result),
    }

    Ok(())
}

async fn wait(client: &OrchestratorClient, id: &str, interval: u64, timeout: u64) -> Result<()> {
    println!(
        "{}",
        format!("Waiting for job {id} (polling every {interval}s, timeout {timeout}s)...").dimmed()
    );

    let bytes = poller::await_result(
        client,
        id,
        Duration::from_secs(interval),
        Duration::from_secs(timeout),
    )
    .await?;

    println!(
        "{} ({} bytes available via `qjob result {id}`)",
        "Job completed".green().bold(),
        bytes.len()
    );

    Ok(())
}

async fn delete(client: &OrchestratorClient, id: &str) -> Result<()> {
    client.delete_job(id).await?;
    println!("{} {}", "Deleted job".yellow().bold(), id);
    Ok(())
}

async fn list(client: &OrchestratorClient) -> Result<()> {
    let jobs = client.list_jobs().await?;

    if jobs.is_empty() {
        println!("{}", "No jobs found.".yellow());
    } else {
        println!("{}", format!("Found {} job(s):", jobs.len()).bold());
        for id in jobs {
            println!("  {id}");
        }
    }

    Ok(())
}

async fn health(client: &OrchestratorClient) -> Result<()> {
    let health = client.health().await?;
    println!(
        "{} {} ({})",
        "Status:".bold(),
        health.status.green(),
        health.service
    );
    Ok(())
}

fn paint_state(state: &JobState) -> ColoredString {
    match state {
        JobState::Pending => state.label().yellow(),
        JobState::Running => state.label().blue(),
        JobState::Completed => state.label().green(),
        JobState::Failed { .. } => state.label().red(),
    }
}
