//! Command-line interface definitions

use clap::{Args, Parser, Subcommand};

pub mod commands;

#[derive(Parser)]
#[command(name = "pairsync-cli")]
#[command(author, version, long_about = None)]
#[command(about = "Pair projects between two production-tracking systems and drive their synchronization")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List pairings and their state
    List,
    /// Create the target project for a source project and pair them
    Create(CreateArgs),
    /// Pair a source project onto an already-existing target project
    Pair(PairArgs),
    /// Remove a pairing
    Unpair(UnpairArgs),
    /// Trigger a sync job for a paired project
    Sync(SyncArgs),
    /// Follow a sync job's progress until it finishes
    Watch(WatchArgs),
}

#[derive(Args)]
pub struct CreateArgs {
    /// Key of the source project to pair
    pub source_key: String,

    /// Override the derived target project name
    #[arg(long)]
    pub name: Option<String>,

    /// Override the derived target project code
    #[arg(long)]
    pub code: Option<String>,

    /// Pair onto the existing target project if creation conflicts
    #[arg(long)]
    pub pair_on_conflict: bool,
}

#[derive(Args)]
pub struct PairArgs {
    /// Key of the source project to pair
    pub source_key: String,

    /// Name of the existing target project (defaults to the derived name)
    #[arg(long)]
    pub name: Option<String>,
}

#[derive(Args)]
pub struct UnpairArgs {
    /// Name of the paired target project
    pub target_name: String,
}

#[derive(Args)]
pub struct SyncArgs {
    /// Name of the paired target project
    pub target_name: String,

    /// Trigger the job without following its progress
    #[arg(long)]
    pub no_watch: bool,
}

#[derive(Args)]
pub struct WatchArgs {
    /// Id of the sync job to follow
    pub job_id: String,
}
