//! Unpair command handler

use anyhow::{Context, Result};
use colored::*;

use super::{bridge_client, find_by_target_name, refresh_hook};
use crate::cli::UnpairArgs;
use crate::sync::PairingCoordinator;

/// Remove the pairing for a target project
pub async fn handle_unpair_command(args: UnpairArgs) -> Result<()> {
    let api = bridge_client();
    let pairing = find_by_target_name(&api, &args.target_name).await?;
    let mut coordinator = PairingCoordinator::new(api.clone(), pairing, refresh_hook(api.clone()));

    coordinator
        .unpair()
        .await
        .with_context(|| format!("Failed to unpair '{}'", args.target_name))?;

    println!("{} {}", "Unpaired:".green().bold(), args.target_name);
    Ok(())
}
