//! Snapshot Generation
//!
//! Copies the grid into renderer-friendly snapshots at a fixed interval,
//! and writes run products to disk.

use schelling_events::{generate_snapshot_id, CellState, GridSnapshot, MetricsSeries};
use serde::Serialize;
use std::fs;
use std::path::Path;

use crate::components::Grid;

/// Tracks snapshot numbering and cadence.
#[derive(Debug)]
pub struct SnapshotGenerator {
    next_snapshot_id: u64,
    snapshot_interval: u64,
}

impl SnapshotGenerator {
    /// An interval of 0 disables periodic snapshots; step 0 is still taken.
    pub fn new(snapshot_interval: u64) -> Self {
        Self {
            next_snapshot_id: 1,
            snapshot_interval,
        }
    }

    pub fn should_snapshot(&self, step: u64) -> bool {
        step == 0 || (self.snapshot_interval > 0 && step % self.snapshot_interval == 0)
    }

    pub fn next_id(&mut self) -> String {
        let id = generate_snapshot_id(self.next_snapshot_id);
        self.next_snapshot_id += 1;
        id
    }

    pub fn snapshot_count(&self) -> u64 {
        self.next_snapshot_id - 1
    }

    /// Snapshot of `grid` at `step` with the next sequence id.
    pub fn generate(&mut self, grid: &Grid, step: u64) -> GridSnapshot {
        let id = self.next_id();
        grid_snapshot(grid, id, step)
    }
}

/// Copies every cell of `grid` into a [`GridSnapshot`].
pub fn grid_snapshot(grid: &Grid, snapshot_id: impl Into<String>, step: u64) -> GridSnapshot {
    let mut snapshot = GridSnapshot::empty(snapshot_id, step, grid.width(), grid.height());
    for pos in grid.positions() {
        let (a, b) = grid.type_counts(pos);
        snapshot.set(pos, CellState::from_counts(a, b));
    }
    snapshot
}

/// Write any serializable run product as pretty JSON
pub fn write_json<T: Serialize>(value: &T, path: impl AsRef<Path>) -> std::io::Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json)?;
    Ok(())
}

/// Write the metric series as CSV, one row per record. The header row comes
/// from the record's field names and is only written once a record exists.
pub fn write_metrics_csv(series: &MetricsSeries, path: impl AsRef<Path>) -> csv::Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    for record in series.records() {
        writer.serialize(record)?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{AgentId, EdgePolicy, OccupancyPolicy};
    use schelling_events::{AgentType, MetricsRecord, Position};

    #[test]
    fn test_should_snapshot() {
        let generator = SnapshotGenerator::new(10);
        assert!(generator.should_snapshot(0));
        assert!(!generator.should_snapshot(5));
        assert!(generator.should_snapshot(20));

        let disabled = SnapshotGenerator::new(0);
        assert!(disabled.should_snapshot(0));
        assert!(!disabled.should_snapshot(10));
    }

    #[test]
    fn test_generate_numbers_snapshots() {
        let grid = Grid::new(2, 2, EdgePolicy::Bounded, OccupancyPolicy::Single);
        let mut generator = SnapshotGenerator::new(1);

        assert_eq!(generator.generate(&grid, 0).snapshot_id, "snap_000001");
        assert_eq!(generator.generate(&grid, 1).snapshot_id, "snap_000002");
        assert_eq!(generator.snapshot_count(), 2);
    }

    #[test]
    fn test_grid_snapshot_matches_grid() {
        let mut grid = Grid::new(3, 2, EdgePolicy::Bounded, OccupancyPolicy::Multi);
        grid.place(AgentId(0), AgentType::GroupA, Position::new(0, 0)).unwrap();
        grid.place(AgentId(1), AgentType::GroupB, Position::new(2, 1)).unwrap();
        grid.place(AgentId(2), AgentType::GroupB, Position::new(2, 1)).unwrap();

        let snapshot = grid_snapshot(&grid, "snap_000001", 0);

        assert_eq!(snapshot.get(Position::new(0, 0)), Some(CellState::GroupA));
        assert_eq!(
            snapshot.get(Position::new(2, 1)),
            Some(CellState::Crowded { group_a: 0, group_b: 2 })
        );
        assert_eq!(snapshot.to_string(), "A..\n..2\n");
    }

    #[test]
    fn test_write_json() {
        let dir = tempfile::tempdir().unwrap();
        let grid = Grid::new(2, 1, EdgePolicy::Bounded, OccupancyPolicy::Single);
        let snapshot = grid_snapshot(&grid, "snap_000001", 0);

        let json_path = dir.path().join("snapshot.json");
        write_json(&snapshot, &json_path).unwrap();
        let parsed: GridSnapshot =
            serde_json::from_str(&fs::read_to_string(&json_path).unwrap()).unwrap();
        assert_eq!(parsed, snapshot);
    }

    #[test]
    fn test_write_metrics_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("metrics.csv");

        let mut series = MetricsSeries::new();
        series.push(MetricsRecord {
            step: 0,
            happiness_fraction: 0.25,
            dissimilarity_index: 0.5,
            moves: 0,
        });
        series.push(MetricsRecord {
            step: 1,
            happiness_fraction: 0.75,
            dissimilarity_index: 0.625,
            moves: 3,
        });
        write_metrics_csv(&series, &path).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert_eq!(
            text.lines().next(),
            Some("step,happiness_fraction,dissimilarity_index,moves")
        );

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let rows: Vec<MetricsRecord> = reader.deserialize().map(|r| r.unwrap()).collect();
        assert_eq!(rows, series.records());
    }
}
