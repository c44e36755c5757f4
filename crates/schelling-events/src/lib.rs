//! Shared data types for the segregation simulation.
//!
//! This crate contains pure data structures with no simulation logic: the
//! grid snapshots, metric series and move events the engine hands to
//! whatever renders, plots or exports them.

pub mod cell;
pub mod event;
pub mod metrics;
pub mod run;
pub mod snapshot;

// Re-export cell types
pub use cell::{AgentType, CellState, Position};

// Re-export event types
pub use event::MoveEvent;

// Re-export metric types
pub use metrics::{MetricsRecord, MetricsSeries};

// Re-export run types
pub use run::{RunSummary, StopReason};

// Re-export snapshot types
pub use snapshot::{generate_snapshot_id, GridSnapshot};
