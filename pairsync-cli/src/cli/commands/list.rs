//! List command handler

use anyhow::{Context, Result};
use colored::*;

use super::bridge_client;
use crate::api::PairState;

/// Print every known pairing with its derived state
pub async fn handle_list_command() -> Result<()> {
    let api = bridge_client();
    let pairings = api
        .list_pairings()
        .await
        .context("Failed to fetch the pairing list")?;

    if pairings.is_empty() {
        println!("No pairings found");
        return Ok(());
    }

    println!(
        "{:<14} {:<28} {:<28} {:<16}",
        "SOURCE KEY", "SOURCE NAME", "TARGET NAME", "STATE"
    );
    println!("{}", "-".repeat(88));

    for pairing in &pairings {
        let state = pairing.state();
        let label = match state {
            PairState::Paired => state.label().green(),
            PairState::PartiallyPaired => state.label().yellow(),
            PairState::Unpaired => state.label().dimmed(),
        };
        println!(
            "{:<14} {:<28} {:<28} {}",
            pairing.source_project_key.as_deref().unwrap_or("-"),
            pairing.source_project_name,
            pairing.target_project_name.as_deref().unwrap_or("-"),
            label
        );
    }

    Ok(())
}
