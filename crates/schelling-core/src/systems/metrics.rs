//! Metrics
//!
//! Happiness fraction and block-wise dissimilarity index, computed from the
//! grid after each step.

use bevy_ecs::prelude::*;
use schelling_events::{AgentType, MetricsRecord, MetricsSeries};
use tracing::error;

use super::rules::Rules;
use super::step::{SimulationState, StepLog};
use crate::components::Grid;
use crate::error::ConfigurationError;

/// Point-in-time metrics; derived, never stored on the grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricsSnapshot {
    pub happiness_fraction: f64,
    pub dissimilarity_index: f64,
}

/// Resource: block size used for the dissimilarity index.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetricsSettings {
    pub block_width: usize,
    pub block_height: usize,
}

/// Resource: the metric time series, one record per completed step plus
/// the initial placement at step 0.
#[derive(Resource, Debug, Default)]
pub struct MetricsHistory(pub MetricsSeries);

/// Happy agents divided by the number of agents.
///
/// The denominator is the agent count, not the grid area, so a fully
/// satisfied population scores 1 regardless of vacancy. A grid with no
/// agents scores 1.
pub fn happiness_fraction(grid: &Grid, rules: &Rules) -> f64 {
    let total = grid.agent_count();
    if total == 0 {
        return 1.0;
    }
    let happy = grid
        .agents()
        .filter(|agent| rules.is_happy(grid, agent))
        .count();
    happy as f64 / total as f64
}

/// Classic dissimilarity index over `block_width x block_height` blocks:
/// `0.5 * sum(|a_i / A - b_i / B|)`.
///
/// Blocks must tile the grid exactly; a remainder would silently drop
/// cells, so it is rejected. If either group is absent the populations
/// cannot be compared and the index is 0.
pub fn dissimilarity_index(
    grid: &Grid,
    block_width: usize,
    block_height: usize,
) -> Result<f64, ConfigurationError> {
    if block_width == 0 || block_height == 0 {
        return Err(ConfigurationError::EmptyBlock {
            block_width,
            block_height,
        });
    }
    if grid.width() % block_width != 0 || grid.height() % block_height != 0 {
        return Err(ConfigurationError::BlockSizeMismatch {
            width: grid.width(),
            height: grid.height(),
            block_width,
            block_height,
        });
    }

    let total_a = grid.count_of(AgentType::GroupA) as f64;
    let total_b = grid.count_of(AgentType::GroupB) as f64;
    if total_a == 0.0 || total_b == 0.0 {
        return Ok(0.0);
    }

    let blocks_x = grid.width() / block_width;
    let blocks_y = grid.height() / block_height;
    let mut block_counts = vec![(0u32, 0u32); blocks_x * blocks_y];

    for pos in grid.positions() {
        let (a, b) = grid.type_counts(pos);
        let block = (pos.y / block_height) * blocks_x + pos.x / block_width;
        block_counts[block].0 += a;
        block_counts[block].1 += b;
    }

    let sum: f64 = block_counts
        .iter()
        .map(|&(a, b)| (a as f64 / total_a - b as f64 / total_b).abs())
        .sum();
    Ok(0.5 * sum)
}

/// Both metrics at once.
pub fn measure(
    grid: &Grid,
    rules: &Rules,
    settings: &MetricsSettings,
) -> Result<MetricsSnapshot, ConfigurationError> {
    let dissimilarity = dissimilarity_index(grid, settings.block_width, settings.block_height)?;
    Ok(MetricsSnapshot {
        happiness_fraction: happiness_fraction(grid, rules),
        dissimilarity_index: dissimilarity,
    })
}

/// Builds the series record for `step`.
pub fn metrics_record(
    grid: &Grid,
    rules: &Rules,
    settings: &MetricsSettings,
    step: u64,
    moves: u32,
) -> Result<MetricsRecord, ConfigurationError> {
    let snapshot = measure(grid, rules, settings)?;
    Ok(MetricsRecord {
        step,
        happiness_fraction: snapshot.happiness_fraction,
        dissimilarity_index: snapshot.dissimilarity_index,
        moves,
    })
}

/// System: append metrics for the step that just ran.
pub fn record_metrics_system(
    mut state: ResMut<SimulationState>,
    grid: Res<Grid>,
    rules: Res<Rules>,
    settings: Res<MetricsSettings>,
    log: Res<StepLog>,
    mut history: ResMut<MetricsHistory>,
) {
    if state.fault.is_some() {
        return;
    }
    let step = state.current_step;
    if history.0.latest().is_some_and(|r| r.step >= step) {
        return;
    }

    let moves = log
        .latest()
        .filter(|r| r.step == step)
        .map(|r| r.move_count())
        .unwrap_or(0);

    match metrics_record(&grid, &rules, &settings, step, moves) {
        Ok(record) => history.0.push(record),
        Err(e) => {
            error!(step, "could not compute metrics: {}", e);
            state.fault = Some(e.into());
        }
    }
}
