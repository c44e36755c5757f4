//! Error Types
//!
//! Configuration problems are reported before any state is built. Occupancy
//! errors mean the grid and the free set disagree, which is always a defect.

use schelling_events::Position;
use thiserror::Error;

use crate::components::AgentId;

/// A configuration that cannot be simulated.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigurationError {
    #[error("grid dimensions must be positive, got {width}x{height}")]
    EmptyGrid { width: usize, height: usize },

    #[error("grid of {width}x{height} cells is too large to index")]
    GridTooLarge { width: usize, height: usize },

    #[error("threshold must lie in [0, 1], got {0}")]
    ThresholdOutOfRange(f64),

    #[error("population of {population} exceeds grid capacity of {capacity} cells")]
    PopulationExceedsCapacity { population: usize, capacity: usize },

    #[error("population is empty")]
    EmptyPopulation,

    #[error("population fractions {fraction_a} + {fraction_b} must lie in [0, 1] and sum to <= 1")]
    InvalidFractions { fraction_a: f64, fraction_b: f64 },

    #[error("block size must be positive, got {block_width}x{block_height}")]
    EmptyBlock {
        block_width: usize,
        block_height: usize,
    },

    #[error("block size {block_width}x{block_height} does not evenly divide grid {width}x{height}")]
    BlockSizeMismatch {
        width: usize,
        height: usize,
        block_width: usize,
        block_height: usize,
    },

    #[error("step budget must be positive")]
    ZeroSteps,
}

/// The grid and free set disagree about a cell.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OccupancyError {
    #[error("cell {0} is already occupied")]
    Occupied(Position),

    #[error("position {pos} lies outside the {width}x{height} grid")]
    OutOfBounds {
        pos: Position,
        width: usize,
        height: usize,
    },

    #[error("no empty cell left to place agent {0}")]
    GridFull(AgentId),

    #[error("cell {0} is not in the free set")]
    NotFree(Position),

    #[error("agent {0} is already on the grid")]
    DuplicateAgent(AgentId),

    #[error("agent {0} is not on the grid")]
    UnknownAgent(AgentId),

    #[error("agent {agent} is at {actual}, not {expected}")]
    NotAtOrigin {
        agent: AgentId,
        expected: Position,
        actual: Position,
    },

    #[error("free set holds {free} cells but {empty} grid cells are empty")]
    FreeSetDesync { free: usize, empty: usize },
}

/// A fatal error raised inside the step schedule.
///
/// It stays on the simulation state once raised, so every later step
/// reports it again instead of running on a half-updated grid.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StepFault {
    #[error(transparent)]
    Occupancy(#[from] OccupancyError),

    #[error(transparent)]
    Metrics(#[from] ConfigurationError),
}

/// Top-level error for building or running a simulation.
#[derive(Debug, Error)]
pub enum SimError {
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error("occupancy invariant violated: {0}")]
    Occupancy(#[from] OccupancyError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("could not parse config file: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("could not serialize config: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("could not write metrics CSV: {0}")]
    Csv(#[from] csv::Error),
}

impl From<StepFault> for SimError {
    fn from(fault: StepFault) -> Self {
        match fault {
            StepFault::Occupancy(e) => SimError::Occupancy(e),
            StepFault::Metrics(e) => SimError::Configuration(e),
        }
    }
}
