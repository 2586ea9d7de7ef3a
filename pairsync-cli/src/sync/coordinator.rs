//! Pairing workflow state and actions for one source project
//!
//! Owns the draft target identity, the conflict latch, and the sync trigger.
//! Mutating operations take `&mut self`, so no two requests for the same
//! pairing are ever in flight at once. After every completed mutation the
//! injected refresh hook is fired so callers re-derive state from the remote
//! side instead of trusting the local snapshot.

use std::sync::Arc;

use futures::future::BoxFuture;
use log::{info, warn};
use thiserror::Error;

use crate::api::{ApiError, BridgeApi, JobId, PairRequest, PairState, Pairing};
use crate::sync::launcher::{LaunchError, SyncTrigger, TriggerState};
use crate::sync::naming;

/// Callback fired after a completed mutation to re-fetch the pairing list
pub type RefreshHook = Box<dyn Fn() -> BoxFuture<'static, ()> + Send + Sync>;

/// Operations an operator can invoke on a pairing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairingAction {
    Create,
    PairOntoExisting,
    Sync,
    Unpair,
}

impl PairingAction {
    /// Get display label for UI
    pub fn label(&self) -> &'static str {
        match self {
            PairingAction::Create => "create",
            PairingAction::PairOntoExisting => "pair",
            PairingAction::Sync => "sync",
            PairingAction::Unpair => "unpair",
        }
    }
}

/// Editable target identity, seeded from derivation or the existing target
#[derive(Debug, Clone, PartialEq)]
pub struct TargetDraft {
    pub name: String,
    pub code: String,
}

#[derive(Debug, Error)]
pub enum PairingError {
    #[error("{} is not available while the project is {}", .action.label(), .state.label())]
    Unavailable {
        action: PairingAction,
        state: PairState,
    },
    #[error("the project code is locked, the existing target project's code is authoritative")]
    CodeLocked,
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Launch(#[from] LaunchError),
}

/// Drives one pairing record through create, pair, sync and unpair
pub struct PairingCoordinator {
    api: Arc<dyn BridgeApi>,
    pairing: Pairing,
    draft: TargetDraft,
    pair_onto_existing: bool,
    trigger: SyncTrigger,
    refresh: RefreshHook,
}

impl PairingCoordinator {
    pub fn new(api: Arc<dyn BridgeApi>, pairing: Pairing, refresh: RefreshHook) -> Self {
        let derived = naming::derive(
            &pairing.source_project_name,
            pairing.source_project_code.as_deref(),
        );
        let draft = TargetDraft {
            name: pairing
                .target_project_name
                .clone()
                .unwrap_or(derived.name),
            code: pairing
                .target_project_code
                .clone()
                .unwrap_or(derived.code),
        };

        PairingCoordinator {
            trigger: SyncTrigger::new(api.clone()),
            api,
            pairing,
            draft,
            pair_onto_existing: false,
            refresh,
        }
    }

    pub fn pairing(&self) -> &Pairing {
        &self.pairing
    }

    pub fn draft(&self) -> &TargetDraft {
        &self.draft
    }

    pub fn state(&self) -> PairState {
        self.pairing.state()
    }

    pub fn trigger_state(&self) -> TriggerState {
        self.trigger.state()
    }

    /// Whether the draft code is immutable because the target already exists
    pub fn code_locked(&self) -> bool {
        self.pair_onto_existing
    }

    /// Operations valid for the current pairing state
    pub fn available_actions(&self) -> Vec<PairingAction> {
        match self.pairing.state() {
            PairState::Unpaired if self.pairing.source_project_key.is_some() => {
                let mut actions = vec![PairingAction::Create];
                if self.pair_onto_existing {
                    actions.push(PairingAction::PairOntoExisting);
                }
                actions
            }
            PairState::Paired => vec![PairingAction::Sync, PairingAction::Unpair],
            _ => Vec::new(),
        }
    }

    pub fn set_target_name(&mut self, name: impl Into<String>) {
        // The conflict latch survives name edits; pairing onto the existing
        // target stays offered even after the operator renames the draft
        self.draft.name = name.into();
    }

    pub fn set_target_code(&mut self, code: impl Into<String>) -> Result<(), PairingError> {
        if self.pair_onto_existing {
            return Err(PairingError::CodeLocked);
        }
        self.draft.code = code.into();
        Ok(())
    }

    /// Permit pairing onto an existing target project
    ///
    /// One-way per coordinator; also locks the draft code.
    pub fn allow_pair_onto_existing(&mut self) {
        self.pair_onto_existing = true;
    }

    /// Create the target project and pair it to the source
    ///
    /// A name conflict flips the coordinator into pair-onto-existing mode;
    /// any other failure leaves it untouched so the operator can retry.
    pub async fn create(&mut self) -> Result<(), PairingError> {
        self.require_available(PairingAction::Create)?;
        let request = self.draft_request(PairingAction::Create)?;

        info!(
            "Creating target project {} for {}",
            request.target_project_name, self.pairing.source_project_name
        );
        match self.api.create_project(&request).await {
            Ok(()) => {
                (self.refresh)().await;
                Ok(())
            }
            Err(err) if err.is_conflict() => {
                self.pair_onto_existing = true;
                warn!(
                    "Target project {} already exists, pairing onto it is now allowed",
                    request.target_project_name
                );
                Err(err.into())
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Pair the source onto an already-existing target project
    pub async fn pair(&mut self) -> Result<(), PairingError> {
        self.require_available(PairingAction::PairOntoExisting)?;
        let request = self.draft_request(PairingAction::PairOntoExisting)?;

        info!(
            "Pairing {} onto existing target project {}",
            self.pairing.source_project_name, request.target_project_name
        );
        self.api.pair_project(&request).await?;
        (self.refresh)().await;
        Ok(())
    }

    /// Launch a sync job for the paired target project
    pub async fn sync(&mut self) -> Result<JobId, PairingError> {
        self.require_available(PairingAction::Sync)?;
        let target = self.target_name(PairingAction::Sync)?;

        let job = self.trigger.launch(&target).await?;
        (self.refresh)().await;
        Ok(job)
    }

    /// Remove the pairing relationship
    ///
    /// The refresh hook fires whether or not the delete succeeded.
    pub async fn unpair(&mut self) -> Result<(), PairingError> {
        self.require_available(PairingAction::Unpair)?;
        let target = self.target_name(PairingAction::Unpair)?;

        info!("Unpairing target project {}", target);
        let result = self.api.unpair_project(&target).await;
        (self.refresh)().await;
        result.map_err(PairingError::from)
    }

    fn require_available(&self, action: PairingAction) -> Result<(), PairingError> {
        if self.available_actions().contains(&action) {
            Ok(())
        } else {
            Err(PairingError::Unavailable {
                action,
                state: self.pairing.state(),
            })
        }
    }

    fn draft_request(&self, action: PairingAction) -> Result<PairRequest, PairingError> {
        let key = self
            .pairing
            .source_project_key
            .as_deref()
            .ok_or(PairingError::Unavailable {
                action,
                state: self.pairing.state(),
            })?;
        Ok(PairRequest::new(
            key,
            self.draft.name.as_str(),
            self.draft.code.as_str(),
        ))
    }

    fn target_name(&self, action: PairingAction) -> Result<String, PairingError> {
        self.pairing
            .target_project_name
            .clone()
            .ok_or(PairingError::Unavailable {
                action,
                state: self.pairing.state(),
            })
    }
}
