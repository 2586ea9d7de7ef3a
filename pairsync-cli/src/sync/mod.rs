//! Pairing and synchronization workflow
//!
//! Derives target identifiers, drives the pairing state machine, launches
//! sync jobs and follows their progress.

pub mod coordinator;
pub mod launcher;
pub mod naming;
pub mod poller;
pub mod progress;

pub use coordinator::{PairingAction, PairingCoordinator, PairingError, RefreshHook, TargetDraft};
pub use launcher::{LaunchError, SyncTrigger, TriggerState, TRIGGER_COOLDOWN};
pub use naming::{derive, DerivedIdentifiers, CODE_MAX_LEN};
pub use poller::{PollEvent, StatusPoller, POLL_PERIOD};
pub use progress::{aggregate, ProgressReport, ProgressRow, RowOutcome};
