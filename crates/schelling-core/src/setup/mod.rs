//! World Setup
//!
//! Grid creation and initial agent placement.

pub mod agents;

pub use agents::*;
