//! Aggregation of per-entity sync progress into an operator-facing report

use std::collections::BTreeMap;

use crate::api::EntityProgress;

/// Aggregated view of a job summary
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProgressReport {
    /// Sum of entity counts over all types (0 while no summary exists)
    pub total_entities: u64,
    /// One row per entity type, in stable lexicographic type order
    pub rows: Vec<ProgressRow>,
}

/// One entity type's line in the report
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressRow {
    pub entity_type: String,
    pub outcome: RowOutcome,
}

/// What a row displays: a completion percentage or the type's failure message
///
/// The two are mutually exclusive per type; a non-empty error always wins
/// over the percentage.
#[derive(Debug, Clone, PartialEq)]
pub enum RowOutcome {
    Percent(u8),
    Failed(String),
}

impl RowOutcome {
    /// Get display label for operator output
    pub fn label(&self) -> String {
        match self {
            RowOutcome::Percent(percent) => format!("{}%", percent),
            RowOutcome::Failed(message) => message.clone(),
        }
    }
}

/// Reduce a job summary into a total count and per-type rows
///
/// Recomputed in full on every update; nothing incremental is kept between
/// polls.
pub fn aggregate(summary: Option<&BTreeMap<String, EntityProgress>>) -> ProgressReport {
    let Some(summary) = summary else {
        return ProgressReport::default();
    };

    let total_entities = summary.values().map(|entity| entity.count).sum();
    let rows = summary
        .iter()
        .map(|(entity_type, entity)| ProgressRow {
            entity_type: entity_type.clone(),
            outcome: match entity.error.as_deref() {
                Some(error) if !error.is_empty() => RowOutcome::Failed(error.to_string()),
                _ => RowOutcome::Percent((entity.progression * 100.0).round() as u8),
            },
        })
        .collect();

    ProgressReport {
        total_entities,
        rows,
    }
}
