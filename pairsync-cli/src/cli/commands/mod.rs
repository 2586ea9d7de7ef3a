//! Command handlers and shared plumbing

use std::sync::Arc;

use anyhow::{Context, Result};
use log::{debug, warn};

use crate::api::{BridgeApi, BridgeClient, Pairing};
use crate::cli::Commands;
use crate::sync::RefreshHook;

pub mod create;
pub mod list;
pub mod pair;
pub mod sync;
pub mod unpair;
pub mod watch;

/// Route a parsed command to its handler
pub async fn dispatch(command: Commands) -> Result<()> {
    match command {
        Commands::List => list::handle_list_command().await,
        Commands::Create(args) => create::handle_create_command(args).await,
        Commands::Pair(args) => pair::handle_pair_command(args).await,
        Commands::Unpair(args) => unpair::handle_unpair_command(args).await,
        Commands::Sync(args) => sync::handle_sync_command(args).await,
        Commands::Watch(args) => watch::handle_watch_command(args).await,
    }
}

/// Build the API client from the installed configuration
pub(crate) fn bridge_client() -> Arc<dyn BridgeApi> {
    Arc::new(BridgeClient::new(crate::config::global()))
}

/// Refresh callback handed to coordinators, re-fetches the authoritative list
pub(crate) fn refresh_hook(api: Arc<dyn BridgeApi>) -> RefreshHook {
    Box::new(move || {
        let api = api.clone();
        Box::pin(async move {
            match api.list_pairings().await {
                Ok(pairings) => debug!("Refreshed pairing list, {} records", pairings.len()),
                Err(err) => warn!("Failed to refresh pairing list: {}", err),
            }
        })
    })
}

/// Find the pairing record for a source project key
pub(crate) async fn find_by_source_key(api: &Arc<dyn BridgeApi>, key: &str) -> Result<Pairing> {
    let pairings = api
        .list_pairings()
        .await
        .context("Failed to fetch the pairing list")?;
    pairings
        .into_iter()
        .find(|pairing| pairing.source_project_key.as_deref() == Some(key))
        .ok_or_else(|| {
            anyhow::anyhow!(
                "No source project with key '{}'. Use 'pairsync-cli list' to see known projects.",
                key
            )
        })
}

/// Find the pairing record for a target project name
pub(crate) async fn find_by_target_name(api: &Arc<dyn BridgeApi>, name: &str) -> Result<Pairing> {
    let pairings = api
        .list_pairings()
        .await
        .context("Failed to fetch the pairing list")?;
    pairings
        .into_iter()
        .find(|pairing| pairing.target_project_name.as_deref() == Some(name))
        .ok_or_else(|| {
            anyhow::anyhow!(
                "No paired project named '{}'. Use 'pairsync-cli list' to see known projects.",
                name
            )
        })
}
