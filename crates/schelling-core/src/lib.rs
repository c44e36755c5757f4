//! Schelling Segregation Engine Library
//!
//! Public API for the segregation model: grid and agents, the happiness rule,
//! relocation, the step loop and the segregation metrics.

use bevy_ecs::prelude::*;
use rand::rngs::SmallRng;

pub mod components;
pub mod config;
pub mod error;
pub mod events;
pub mod output;
pub mod setup;
pub mod simulation;
pub mod systems;

pub use components::*;
pub use config::SimConfig;
pub use error::{ConfigurationError, OccupancyError, SimError, StepFault};
pub use simulation::Simulation;

pub use schelling_events::{
    AgentType, CellState, GridSnapshot, MetricsRecord, MetricsSeries, MoveEvent, Position,
    RunSummary, StopReason,
};

/// Seeded random number generator resource
#[derive(Resource)]
pub struct SimRng(pub SmallRng);
