//! Sync job launching with a rearming trigger
//!
//! The trigger mirrors what the operator sees: idle, launching, triggered or
//! failed, and back to idle after a fixed cool-down. Launching performs no
//! retries of its own; exactly-once is not guaranteed here, the operator
//! retries once the trigger rearms.

use std::sync::Arc;

use log::{debug, warn};
use thiserror::Error;
use tokio::time::{Duration, Instant};

use crate::api::{ApiError, BridgeApi, JobId};

/// How long a triggered or failed outcome stays visible before the trigger
/// rearms
pub const TRIGGER_COOLDOWN: Duration = Duration::from_secs(5);

/// Errors from launching a sync job
#[derive(Debug, Error)]
pub enum LaunchError {
    /// A previous launch is still in flight or cooling down
    #[error("a sync was already triggered, wait for the trigger to rearm")]
    NotReady,
    /// The launch request itself failed
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Lifecycle of the sync trigger for one paired project
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TriggerState {
    /// Ready to launch
    Idle,
    /// Launch request in flight
    Launching,
    /// Job accepted; progress tracking belongs to the poller now
    Triggered { job: JobId },
    /// Launch rejected or transport failed
    Failed { message: String },
}

impl TriggerState {
    /// Get display label for operator output
    pub fn label(&self) -> &'static str {
        match self {
            TriggerState::Idle => "Sync",
            TriggerState::Launching => "Syncing...",
            TriggerState::Triggered { .. } => "Sync triggered",
            TriggerState::Failed { .. } => "Sync error",
        }
    }
}

/// Launches sync jobs and rearms itself after [`TRIGGER_COOLDOWN`]
///
/// Both outcomes decay back to idle, so repeated failures stay visible
/// without letting the operator spam the endpoint.
pub struct SyncTrigger {
    api: Arc<dyn BridgeApi>,
    state: TriggerState,
    rearm_at: Option<Instant>,
}

impl SyncTrigger {
    pub fn new(api: Arc<dyn BridgeApi>) -> Self {
        SyncTrigger {
            api,
            state: TriggerState::Idle,
            rearm_at: None,
        }
    }

    /// Current state, with an elapsed cool-down already resolved to idle
    pub fn state(&self) -> TriggerState {
        match self.rearm_at {
            Some(rearm_at) if Instant::now() >= rearm_at => TriggerState::Idle,
            _ => self.state.clone(),
        }
    }

    /// Whether a launch may be issued right now
    pub fn can_launch(&self) -> bool {
        self.state() == TriggerState::Idle
    }

    /// Launch a sync job for the target project
    ///
    /// Rejected until the trigger has rearmed from the previous outcome.
    pub async fn launch(&mut self, target_name: &str) -> Result<JobId, LaunchError> {
        if !self.can_launch() {
            return Err(LaunchError::NotReady);
        }

        self.state = TriggerState::Launching;
        self.rearm_at = None;
        debug!("Launching sync for project {}", target_name);

        match self.api.launch_sync(target_name).await {
            Ok(job) => {
                debug!("Sync for project {} accepted as job {}", target_name, job);
                self.state = TriggerState::Triggered { job: job.clone() };
                self.rearm_at = Some(Instant::now() + TRIGGER_COOLDOWN);
                Ok(job)
            }
            Err(err) => {
                warn!("Sync launch for project {} failed: {}", target_name, err);
                self.state = TriggerState::Failed {
                    message: err.to_string(),
                };
                self.rearm_at = Some(Instant::now() + TRIGGER_COOLDOWN);
                Err(LaunchError::Api(err))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use super::*;
    use crate::api::{PairRequest, Pairing, SyncJobStatus};

    struct FakeApi {
        launches: AtomicUsize,
        fail: bool,
    }

    impl FakeApi {
        fn new(fail: bool) -> Arc<Self> {
            Arc::new(FakeApi {
                launches: AtomicUsize::new(0),
                fail,
            })
        }
    }

    #[async_trait]
    impl BridgeApi for FakeApi {
        async fn list_pairings(&self) -> Result<Vec<Pairing>, ApiError> {
            Ok(Vec::new())
        }

        async fn create_project(&self, _request: &PairRequest) -> Result<(), ApiError> {
            Ok(())
        }

        async fn pair_project(&self, _request: &PairRequest) -> Result<(), ApiError> {
            Ok(())
        }

        async fn unpair_project(&self, _target_name: &str) -> Result<(), ApiError> {
            Ok(())
        }

        async fn launch_sync(&self, _target_name: &str) -> Result<JobId, ApiError> {
            let n = self.launches.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                Err(ApiError::Remote("boom".to_string()))
            } else {
                Ok(JobId::new(format!("ev-{}", n + 1)))
            }
        }

        async fn fetch_job(&self, _id: &JobId) -> Result<SyncJobStatus, ApiError> {
            Ok(SyncJobStatus::default())
        }
    }

    #[test]
    fn test_labels() {
        assert_eq!(TriggerState::Idle.label(), "Sync");
        assert_eq!(TriggerState::Launching.label(), "Syncing...");
        assert_eq!(
            TriggerState::Triggered {
                job: JobId::new("ev-1")
            }
            .label(),
            "Sync triggered"
        );
        assert_eq!(
            TriggerState::Failed {
                message: "x".to_string()
            }
            .label(),
            "Sync error"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_successful_launch_then_rearm() {
        let api = FakeApi::new(false);
        let mut trigger = SyncTrigger::new(api.clone());
        assert!(trigger.can_launch());

        let job = trigger.launch("My_Show").await.unwrap();
        assert_eq!(job, JobId::new("ev-1"));
        assert_eq!(
            trigger.state(),
            TriggerState::Triggered {
                job: JobId::new("ev-1")
            }
        );
        assert!(!trigger.can_launch());

        // Not yet rearmed just before the cool-down elapses
        tokio::time::advance(TRIGGER_COOLDOWN - Duration::from_millis(1)).await;
        assert!(!trigger.can_launch());

        tokio::time::advance(Duration::from_millis(1)).await;
        assert_eq!(trigger.state(), TriggerState::Idle);
        assert!(trigger.can_launch());
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_launch_also_rearms() {
        let api = FakeApi::new(true);
        let mut trigger = SyncTrigger::new(api.clone());

        let err = trigger.launch("My_Show").await.unwrap_err();
        assert!(matches!(err, LaunchError::Api(_)));
        assert_eq!(
            trigger.state(),
            TriggerState::Failed {
                message: "boom".to_string()
            }
        );

        tokio::time::advance(TRIGGER_COOLDOWN).await;
        assert!(trigger.can_launch());
    }

    #[tokio::test(start_paused = true)]
    async fn test_second_launch_rejected_during_cooldown() {
        let api = FakeApi::new(false);
        let mut trigger = SyncTrigger::new(api.clone());

        trigger.launch("My_Show").await.unwrap();
        let err = trigger.launch("My_Show").await.unwrap_err();
        assert!(matches!(err, LaunchError::NotReady));

        // The rejected attempt never reached the API
        assert_eq!(api.launches.load(Ordering::SeqCst), 1);

        tokio::time::advance(TRIGGER_COOLDOWN).await;
        trigger.launch("My_Show").await.unwrap();
        assert_eq!(api.launches.load(Ordering::SeqCst), 2);
    }
}
