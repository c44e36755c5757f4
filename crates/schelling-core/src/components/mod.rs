//! ECS Components
//!
//! The grid, the agents it owns, and the free-cell set.

pub mod agent;
pub mod free_set;
pub mod grid;

pub use agent::*;
pub use free_set::*;
pub use grid::*;
