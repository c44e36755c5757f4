//! Output Generation
//!
//! Grid snapshots and JSON/CSV writers for run products.

pub mod snapshot;

pub use snapshot::*;
