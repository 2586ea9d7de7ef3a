//! Client surface for the remote pairing and sync endpoints
//!
//! Everything the orchestration layer knows about the remote system lives
//! here: the wire models, the error taxonomy with its message extraction
//! rules, and the [`BridgeApi`] trait with its reqwest implementation.

pub mod client;
pub mod error;
pub mod models;

pub use client::{BridgeApi, BridgeClient};
pub use error::{ApiError, GENERIC_REMOTE_ERROR};
pub use models::{
    EntityProgress, JobId, JobStatus, PairRequest, PairState, Pairing, SyncJobStatus,
};
