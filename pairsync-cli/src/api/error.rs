//! API error taxonomy and remote error message extraction
//!
//! Remote error bodies carry either a `traceback` or a `detail` field; the
//! extraction order is part of the operator contract and must not change.

use reqwest::StatusCode;
use thiserror::Error;

use super::models::JobId;

/// Fallback when the response body carries no structured error
pub const GENERIC_REMOTE_ERROR: &str = "Error on server, please check server's logs";

/// Errors surfaced by the bridge API
#[derive(Debug, Error)]
pub enum ApiError {
    /// A target project with the requested identity already exists
    #[error("{0}")]
    Conflict(String),
    /// Remote rejected the request (non-conflict 4xx/5xx)
    #[error("{0}")]
    Remote(String),
    /// Request never produced a usable response
    #[error(transparent)]
    Transport(#[from] reqwest::Error),
    /// Polled job id is not recognized by the sync processor
    #[error("sync job {0} is unknown to the processor (is the processor running?)")]
    UnknownJob(JobId),
}

impl ApiError {
    /// Whether this error is the conflict path that offers pair-onto-existing
    pub fn is_conflict(&self) -> bool {
        matches!(self, ApiError::Conflict(_))
    }

    /// Whether this error is the distinct unknown-job warning
    pub fn is_unknown_job(&self) -> bool {
        matches!(self, ApiError::UnknownJob(_))
    }
}

/// Extract the operator-facing message from an error response body
///
/// Priority: `traceback`, then `detail`, then the generic fallback. Empty
/// strings count as absent so a blank field never swallows the real message.
pub fn remote_message(body: &str) -> String {
    let parsed: serde_json::Value = match serde_json::from_str(body) {
        Ok(value) => value,
        Err(_) => return GENERIC_REMOTE_ERROR.to_string(),
    };

    for field in ["traceback", "detail"] {
        if let Some(message) = parsed.get(field).and_then(|v| v.as_str()) {
            if !message.is_empty() {
                return message.to_string();
            }
        }
    }

    GENERIC_REMOTE_ERROR.to_string()
}

/// Map an error status and body to the taxonomy
///
/// 409 becomes [`ApiError::Conflict`]; everything else is [`ApiError::Remote`]
/// with the extracted message.
pub fn error_from_response(status: StatusCode, body: &str) -> ApiError {
    let message = remote_message(body);
    if status == StatusCode::CONFLICT {
        ApiError::Conflict(message)
    } else {
        ApiError::Remote(message)
    }
}
