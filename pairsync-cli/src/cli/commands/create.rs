//! Create command handler

use anyhow::{Context, Result};
use colored::*;

use super::{bridge_client, find_by_source_key, refresh_hook};
use crate::cli::CreateArgs;
use crate::sync::{PairingCoordinator, PairingError};

/// Create the target project for a source project and pair them
pub async fn handle_create_command(args: CreateArgs) -> Result<()> {
    let api = bridge_client();
    let pairing = find_by_source_key(&api, &args.source_key).await?;
    let mut coordinator = PairingCoordinator::new(api.clone(), pairing, refresh_hook(api.clone()));

    if let Some(name) = args.name {
        coordinator.set_target_name(name);
    }
    if let Some(code) = args.code {
        coordinator.set_target_code(code)?;
    }

    let draft = coordinator.draft().clone();
    println!(
        "Creating target project {} ({})",
        draft.name.cyan(),
        draft.code.dimmed()
    );

    match coordinator.create().await {
        Ok(()) => {
            println!(
                "{} {} is now paired with {}",
                "Created:".green().bold(),
                draft.name,
                args.source_key
            );
            Ok(())
        }
        Err(PairingError::Api(err)) if err.is_conflict() && args.pair_on_conflict => {
            println!(
                "{}",
                "Target project already exists, pairing onto it".yellow()
            );
            coordinator
                .pair()
                .await
                .context("Failed to pair onto the existing project")?;
            println!(
                "{} {} is now paired with {}",
                "Paired:".green().bold(),
                draft.name,
                args.source_key
            );
            Ok(())
        }
        Err(PairingError::Api(err)) if err.is_conflict() => {
            anyhow::bail!(
                "A target project named '{}' already exists. Re-run with --pair-on-conflict to pair onto it.",
                draft.name
            )
        }
        Err(err) => Err(err).context("Failed to create the target project"),
    }
}
