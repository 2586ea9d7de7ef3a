//! Wire types for the pairing endpoints and the sync processor

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A source project and its (possible) counterpart on the target system
///
/// Returned by the pairing list endpoint. Which sides are present determines
/// the derived [`PairState`]; the state itself is never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pairing {
    /// Source project key (absent while the source side does not exist)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_project_key: Option<String>,
    /// Source project display name
    pub source_project_name: String,
    /// Source project short code (absent means derive one from the name)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_project_code: Option<String>,
    /// Target project name (absent means unpaired toward the target)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_project_name: Option<String>,
    /// Target project short code
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_project_code: Option<String>,
}

impl Pairing {
    /// Create an unpaired record for a source project
    pub fn unpaired(key: impl Into<String>, name: impl Into<String>) -> Self {
        Pairing {
            source_project_key: Some(key.into()),
            source_project_name: name.into(),
            source_project_code: None,
            target_project_name: None,
            target_project_code: None,
        }
    }

    /// Derive the pairing state from which sides are present
    pub fn state(&self) -> PairState {
        match (
            self.source_project_key.is_some(),
            self.target_project_name.is_some(),
        ) {
            (true, true) => PairState::Paired,
            (_, false) => PairState::Unpaired,
            (false, true) => PairState::PartiallyPaired,
        }
    }
}

/// Derived relationship state of a [`Pairing`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairState {
    /// Source project exists, no target counterpart yet
    Unpaired,
    /// Target project exists but the source side is missing
    PartiallyPaired,
    /// Both sides present
    Paired,
}

impl PairState {
    /// Get display label for operator output
    pub fn label(&self) -> &'static str {
        match self {
            PairState::Unpaired => "unpaired",
            PairState::PartiallyPaired => "partially paired",
            PairState::Paired => "paired",
        }
    }
}

/// Request body shared by project creation and pair-onto-existing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PairRequest {
    pub source_project_key: String,
    pub target_project_name: String,
    pub target_project_code: String,
}

impl PairRequest {
    pub fn new(
        source_project_key: impl Into<String>,
        target_project_name: impl Into<String>,
        target_project_code: impl Into<String>,
    ) -> Self {
        PairRequest {
            source_project_key: source_project_key.into(),
            target_project_name: target_project_name.into(),
            target_project_code: target_project_code.into(),
        }
    }
}

/// Opaque identifier of a sync job, as handed out by the launch endpoint
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(String);

impl JobId {
    pub fn new(id: impl Into<String>) -> Self {
        JobId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Remote lifecycle of a sync job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Pending,
    Running,
    Finished,
}

impl JobStatus {
    /// Get display label for operator output
    pub fn label(&self) -> &'static str {
        match self {
            JobStatus::Pending => "pending",
            JobStatus::Running => "running",
            JobStatus::Finished => "finished",
        }
    }

    /// Whether no further progress updates are expected
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Finished)
    }
}

/// One status response for a sync job
///
/// `status` is `None` when the job id is unknown to the processor, which the
/// poller treats as terminal rather than as missing data.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SyncJobStatus {
    #[serde(default)]
    pub status: Option<JobStatus>,
    #[serde(default)]
    pub project_name: Option<String>,
    #[serde(default)]
    pub summary: Option<BTreeMap<String, EntityProgress>>,
}

/// Progress of one entity type inside a job summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityProgress {
    /// Number of entities of this type covered by the job
    pub count: u64,
    /// Completed fraction in [0, 1]
    pub progression: f64,
    /// Per-type failure message, independent of the job's overall status
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl EntityProgress {
    pub fn new(count: u64, progression: f64) -> Self {
        EntityProgress {
            count,
            progression,
            error: None,
        }
    }

    pub fn failed(count: u64, progression: f64, error: impl Into<String>) -> Self {
        EntityProgress {
            count,
            progression,
            error: Some(error.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pair_state_derivation() {
        let mut pairing = Pairing::unpaired("prj_123", "My Show");
        assert_eq!(pairing.state(), PairState::Unpaired);

        pairing.target_project_name = Some("My_Show".to_string());
        assert_eq!(pairing.state(), PairState::Paired);

        pairing.source_project_key = None;
        assert_eq!(pairing.state(), PairState::PartiallyPaired);

        // A record with neither side resolves as unpaired
        pairing.target_project_name = None;
        assert_eq!(pairing.state(), PairState::Unpaired);
    }

    #[test]
    fn test_pairing_wire_format() {
        let json = r#"{
            "sourceProjectKey": "prj_123",
            "sourceProjectName": "My Show",
            "sourceProjectCode": "myshow",
            "targetProjectName": "My_Show"
        }"#;

        let pairing: Pairing = serde_json::from_str(json).unwrap();
        assert_eq!(pairing.source_project_key.as_deref(), Some("prj_123"));
        assert_eq!(pairing.source_project_name, "My Show");
        assert_eq!(pairing.target_project_name.as_deref(), Some("My_Show"));
        assert_eq!(pairing.target_project_code, None);
        assert_eq!(pairing.state(), PairState::Paired);
    }

    #[test]
    fn test_pair_request_wire_format() {
        let request = PairRequest::new("prj_123", "My_Show", "myshow");
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["sourceProjectKey"], "prj_123");
        assert_eq!(json["targetProjectName"], "My_Show");
        assert_eq!(json["targetProjectCode"], "myshow");
    }

    #[test]
    fn test_job_status_parse() {
        let status: JobStatus = serde_json::from_str("\"finished\"").unwrap();
        assert_eq!(status, JobStatus::Finished);
        assert!(status.is_terminal());
        assert!(!JobStatus::Running.is_terminal());

        // Unknown status strings are rejected, not silently mapped
        assert!(serde_json::from_str::<JobStatus>("\"aborted\"").is_err());
    }

    #[test]
    fn test_job_status_null_is_distinct() {
        let json = r#"{"status": null, "project_name": "My_Show"}"#;
        let parsed: SyncJobStatus = serde_json::from_str(json).unwrap();

        assert_eq!(parsed.status, None);
        assert_eq!(parsed.project_name.as_deref(), Some("My_Show"));
        assert!(parsed.summary.is_none());
    }

    #[test]
    fn test_summary_wire_format() {
        let json = r#"{
            "status": "running",
            "project_name": "My_Show",
            "summary": {
                "shots": {"count": 10, "progression": 0.5},
                "assets": {"count": 5, "progression": 1.0, "error": "x"}
            }
        }"#;

        let parsed: SyncJobStatus = serde_json::from_str(json).unwrap();
        let summary = parsed.summary.unwrap();
        assert_eq!(summary["shots"], EntityProgress::new(10, 0.5));
        assert_eq!(summary["assets"], EntityProgress::failed(5, 1.0, "x"));
    }
}
