//! Sync command handler

use anyhow::Result;
use colored::*;

use super::watch::watch_job;
use super::{bridge_client, find_by_target_name, refresh_hook};
use crate::cli::SyncArgs;
use crate::sync::PairingCoordinator;

/// Trigger a sync job for a paired project, then follow it unless told not to
pub async fn handle_sync_command(args: SyncArgs) -> Result<()> {
    let api = bridge_client();
    let pairing = find_by_target_name(&api, &args.target_name).await?;
    let mut coordinator = PairingCoordinator::new(api.clone(), pairing, refresh_hook(api.clone()));

    let result = coordinator.sync().await;
    let label = coordinator.trigger_state().label();
    let job = match result {
        Ok(job) => {
            println!("{} job {}", label.green().bold(), job.to_string().cyan());
            job
        }
        Err(err) => {
            println!("{}", label.red().bold());
            return Err(anyhow::Error::new(err)
                .context(format!("Failed to trigger a sync for '{}'", args.target_name)));
        }
    };

    if args.no_watch {
        println!("Follow it later with: pairsync-cli watch {}", job);
        return Ok(());
    }

    watch_job(api, job).await
}
