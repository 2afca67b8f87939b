use std::collections::BTreeMap;

use sea_orm::prelude::{DateTimeWithTimeZone, Json};
use serde::Serialize;

/// Samples of one type in load order, split into parallel sequences.
#[derive(Debug, Clone, Default, Serialize)]
pub struct LoadedSamples {
    pub labels: Vec<String>,
    pub features: Vec<Json>,
    /// `created_at` of the oldest row; the client uses it as a freshness marker.
    pub first_created_at: Option<DateTimeWithTimeZone>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct LabelCounts {
    pub counts: BTreeMap<String, u64>,
    pub total: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TypeProgress {
    pub trained: usize,
    pub total: usize,
    pub percentage: u32,
}

impl TypeProgress {
    pub fn new(trained: usize, total: usize) -> Self {
        let percentage = if total == 0 {
            0
        } else {
            ((trained as f64 / total as f64) * 100.0).round() as u32
        };
        Self { trained, total, percentage }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ProgressReport {
    pub alphabet: TypeProgress,
    pub numbers: TypeProgress,
}

/// Identity-column shape of one table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct IdStats {
    pub min_id: Option<i64>,
    pub max_id: Option<i64>,
    pub count: i64,
}

impl IdStats {
    /// `max - min + 1 == count`; an empty table counts as sequential.
    pub fn is_sequential(&self) -> bool {
        match (self.min_id, self.max_id) {
            (Some(min), Some(max)) => max - min + 1 == self.count,
            _ => self.count == 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CompactionReport {
    pub before: IdStats,
    pub after: IdStats,
    pub ids_are_sequential: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TableDiagnostics {
    #[serde(flatten)]
    pub ids: IdStats,
    pub next_id: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostics {
    pub training_data: TableDiagnostics,
    pub trained_models: TableDiagnostics,
    pub samples_by_type: BTreeMap<String, u64>,
    pub has_gaps: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ResetSummary {
    pub samples_deleted: u64,
    pub models_deleted: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct IdResetReport {
    pub training_data_next_id: i64,
    pub trained_models_next_id: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoredModel {
    pub model: Json,
    pub updated_at: DateTimeWithTimeZone,
}
