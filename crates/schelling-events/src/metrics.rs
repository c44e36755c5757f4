//! Metric Series
//!
//! Per-step scalar metrics, suitable for plotting or export. Records
//! serialize with flat field names so they map directly onto CSV rows.

use serde::{Deserialize, Serialize};

/// Metrics observed after a step completed. Step 0 is the initial placement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricsRecord {
    pub step: u64,
    /// Satisfied agents divided by total agent count, in [0, 1].
    pub happiness_fraction: f64,
    /// Block-wise dissimilarity index, in [0, 1].
    pub dissimilarity_index: f64,
    /// Relocations performed during this step.
    #[serde(default)]
    pub moves: u32,
}

/// Ordered time series of [`MetricsRecord`]s.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricsSeries {
    records: Vec<MetricsRecord>,
}

impl MetricsSeries {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: MetricsRecord) {
        self.records.push(record);
    }

    pub fn records(&self) -> &[MetricsRecord] {
        &self.records
    }

    pub fn latest(&self) -> Option<&MetricsRecord> {
        self.records.last()
    }

    /// The record before the latest one, if any.
    pub fn previous(&self) -> Option<&MetricsRecord> {
        self.records.len().checked_sub(2).map(|i| &self.records[i])
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn total_moves(&self) -> u64 {
        self.records.iter().map(|r| r.moves as u64).sum()
    }

}
