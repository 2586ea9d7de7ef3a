//! Watch command handler

use std::sync::Arc;

use anyhow::Result;
use colored::*;

use super::bridge_client;
use crate::api::{BridgeApi, JobId, SyncJobStatus};
use crate::cli::WatchArgs;
use crate::sync::{aggregate, PollEvent, RowOutcome, StatusPoller};

/// Follow an already-running sync job by id
pub async fn handle_watch_command(args: WatchArgs) -> Result<()> {
    let api = bridge_client();
    watch_job(api, JobId::new(args.job_id)).await
}

/// Poll a job and render its progress until it reaches a terminal state
pub(crate) async fn watch_job(api: Arc<dyn BridgeApi>, job: JobId) -> Result<()> {
    println!("Watching job {} (Ctrl-C to stop)", job.to_string().cyan());

    let mut poller = StatusPoller::new(api);
    let mut events = poller.watch(job).await;

    loop {
        events
            .changed()
            .await
            .map_err(|_| anyhow::anyhow!("Polling stopped unexpectedly"))?;
        let event = events.borrow_and_update().clone();

        match event {
            PollEvent::Waiting => {}
            PollEvent::Status(status) => print_progress(&status),
            PollEvent::Finished(status) => {
                print_progress(&status);
                println!("{}", "Sync finished".green().bold());
                return Ok(());
            }
            PollEvent::UnknownJob(job) => {
                println!(
                    "{}",
                    format!(
                        "Job {} is unknown to the processor (is the processor running?)",
                        job
                    )
                    .yellow()
                );
                return Ok(());
            }
            PollEvent::Failed(message) => anyhow::bail!("Polling failed: {}", message),
        }
    }
}

/// Print one status snapshot: total count, then a line per entity type
fn print_progress(status: &SyncJobStatus) {
    let report = aggregate(status.summary.as_ref());
    let name = status.project_name.as_deref().unwrap_or("?");
    let status_label = status
        .status
        .map(|status| status.label())
        .unwrap_or("unknown");

    println!(
        "{} {} ({} entities)",
        name.bold(),
        status_label,
        report.total_entities
    );
    for row in &report.rows {
        match &row.outcome {
            RowOutcome::Percent(_) => {
                println!("  {:<16} {}", row.entity_type, row.outcome.label())
            }
            RowOutcome::Failed(_) => {
                println!("  {:<16} {}", row.entity_type, row.outcome.label().red())
            }
        }
    }
}
