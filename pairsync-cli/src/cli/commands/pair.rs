//! Pair command handler

use anyhow::{Context, Result};
use colored::*;

use super::{bridge_client, find_by_source_key, refresh_hook};
use crate::cli::PairArgs;
use crate::sync::PairingCoordinator;

/// Pair a source project onto a target project that already exists
pub async fn handle_pair_command(args: PairArgs) -> Result<()> {
    let api = bridge_client();
    let pairing = find_by_source_key(&api, &args.source_key).await?;
    let mut coordinator = PairingCoordinator::new(api.clone(), pairing, refresh_hook(api.clone()));

    if let Some(name) = args.name {
        coordinator.set_target_name(name);
    }
    // The operator asserts the target exists; the existing project's code wins
    coordinator.allow_pair_onto_existing();

    let target = coordinator.draft().name.clone();
    coordinator
        .pair()
        .await
        .with_context(|| format!("Failed to pair onto '{}'", target))?;

    println!(
        "{} {} is now paired with {}",
        "Paired:".green().bold(),
        target,
        args.source_key
    );
    Ok(())
}
