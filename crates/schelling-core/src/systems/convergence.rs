//! Convergence
//!
//! Decides after each step whether the loop should stop.

use bevy_ecs::prelude::*;
use schelling_events::{MetricsSeries, StopReason};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::metrics::MetricsHistory;
use super::step::SimulationState;

/// Early-stopping criterion. The step budget always applies as well.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Convergence {
    /// Run the full step budget.
    #[default]
    None,
    /// Stop as soon as the happiness fraction fails to increase over the
    /// previous step. Plateaus and oscillations both stop the run.
    NoImprovement,
    /// Stop once every agent is happy.
    AllHappy,
}

/// Resource: the configured convergence criterion.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConvergenceSettings {
    pub criterion: Convergence,
}

/// Evaluates the stop conditions against the series. Early stopping wins
/// over the budget when both hold on the same step.
pub fn evaluate(
    criterion: Convergence,
    series: &MetricsSeries,
    current_step: u64,
    max_steps: u64,
) -> Option<StopReason> {
    if let Some(latest) = series.latest().filter(|_| current_step > 0) {
        match criterion {
            Convergence::None => {}
            Convergence::NoImprovement => {
                if let Some(previous) = series.previous() {
                    if latest.happiness_fraction <= previous.happiness_fraction {
                        return Some(StopReason::NoImprovement);
                    }
                }
            }
            Convergence::AllHappy => {
                if latest.happiness_fraction >= 1.0 {
                    return Some(StopReason::AllHappy);
                }
            }
        }
    }

    if current_step >= max_steps {
        return Some(StopReason::StepBudget);
    }
    None
}

/// System: set the stop reason once a stop condition holds.
pub fn check_convergence_system(
    mut state: ResMut<SimulationState>,
    settings: Res<ConvergenceSettings>,
    history: Res<MetricsHistory>,
) {
    if state.is_finished() {
        return;
    }

    let reason = evaluate(
        settings.criterion,
        &history.0,
        state.current_step,
        state.max_steps,
    );
    if let Some(reason) = reason {
        info!(step = state.current_step, "stopping: {}", reason);
        state.stop_reason = Some(reason);
    }
}
