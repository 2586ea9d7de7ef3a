//! Fixed-period job status polling with cancellation
//!
//! One spawned loop per watched job. Single-flight is structural: the loop
//! awaits each fetch before taking the next tick, so two requests for the
//! same job can never be outstanding at once. Watching a new job cancels the
//! previous loop and waits for it to fully stop first, so loops never leak or
//! overlap. Cancellation drops an in-flight fetch on the floor; its result is
//! never published.

use std::sync::Arc;

use log::{debug, info, warn};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{self, Duration, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::api::{ApiError, BridgeApi, JobId, SyncJobStatus};

/// Fixed delay between consecutive status fetches
pub const POLL_PERIOD: Duration = Duration::from_secs(1);

/// One observation published by the polling loop
#[derive(Debug, Clone, PartialEq)]
pub enum PollEvent {
    /// No fetch has resolved yet
    Waiting,
    /// A non-terminal status arrived; polling continues
    Status(SyncJobStatus),
    /// Job reported finished; polling stopped
    Finished(SyncJobStatus),
    /// The processor does not recognize the job id; polling stopped
    UnknownJob(JobId),
    /// A fetch failed; polling stopped
    Failed(String),
}

impl PollEvent {
    /// Whether the loop has stopped after publishing this event
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            PollEvent::Finished(_) | PollEvent::UnknownJob(_) | PollEvent::Failed(_)
        )
    }
}

/// Watches one sync job at a time at a fixed period
pub struct StatusPoller {
    api: Arc<dyn BridgeApi>,
    active: Option<ActivePoll>,
}

struct ActivePoll {
    job: JobId,
    cancel: CancellationToken,
    task: JoinHandle<()>,
    events: watch::Receiver<PollEvent>,
}

impl StatusPoller {
    pub fn new(api: Arc<dyn BridgeApi>) -> Self {
        StatusPoller { api, active: None }
    }

    /// Job currently being watched, if any
    pub fn watched_job(&self) -> Option<&JobId> {
        self.active.as_ref().map(|active| &active.job)
    }

    /// Subscribe to the current loop's events
    pub fn events(&self) -> Option<watch::Receiver<PollEvent>> {
        self.active.as_ref().map(|active| active.events.clone())
    }

    /// Start watching a job, replacing any previous watch
    ///
    /// The previous loop is cancelled and awaited before the new one spawns.
    pub async fn watch(&mut self, job: JobId) -> watch::Receiver<PollEvent> {
        self.cancel().await;

        debug!("Watching job {}", job);
        let (tx, rx) = watch::channel(PollEvent::Waiting);
        let cancel = CancellationToken::new();
        let task = tokio::spawn(poll_loop(self.api.clone(), job.clone(), cancel.clone(), tx));

        self.active = Some(ActivePoll {
            job,
            cancel,
            task,
            events: rx.clone(),
        });
        rx
    }

    /// Stop the current watch, if any
    ///
    /// Idempotent. Waits until the loop has fully stopped, so once this
    /// returns no further event can be published.
    pub async fn cancel(&mut self) {
        if let Some(active) = self.active.take() {
            active.cancel.cancel();
            let _ = active.task.await;
            debug!("Stopped watching job {}", active.job);
        }
    }
}

impl Drop for StatusPoller {
    fn drop(&mut self) {
        // Signal the loop; it stops at its next suspension point
        if let Some(active) = &self.active {
            active.cancel.cancel();
        }
    }
}

async fn poll_loop(
    api: Arc<dyn BridgeApi>,
    job: JobId,
    cancel: CancellationToken,
    events: watch::Sender<PollEvent>,
) {
    let mut ticker = time::interval(POLL_PERIOD);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                debug!("Polling of job {} cancelled", job);
                return;
            }
            _ = ticker.tick() => {}
        }

        let event = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                debug!("Polling of job {} cancelled mid-fetch, result discarded", job);
                return;
            }
            result = api.fetch_job(&job) => match result {
                Ok(status) => match status.status {
                    None => PollEvent::UnknownJob(job.clone()),
                    Some(job_status) if job_status.is_terminal() => PollEvent::Finished(status),
                    Some(_) => PollEvent::Status(status),
                },
                Err(ApiError::UnknownJob(id)) => PollEvent::UnknownJob(id),
                Err(err) => PollEvent::Failed(err.to_string()),
            },
        };

        let terminal = event.is_terminal();
        match &event {
            PollEvent::Finished(_) => info!("Job {} finished", job),
            PollEvent::UnknownJob(_) => {
                warn!("Job {} is unknown to the processor, giving up", job)
            }
            PollEvent::Failed(message) => warn!("Polling of job {} failed: {}", job, message),
            _ => {}
        }

        let _ = events.send(event);
        if terminal {
            return;
        }
    }
}
