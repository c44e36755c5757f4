//! Run Summary
//!
//! How and why a run ended, plus its final metrics.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::MetricsRecord;

/// Why the step loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// The configured number of steps ran to completion.
    StepBudget,
    /// Happiness fraction did not increase over the previous step.
    NoImprovement,
    /// Every agent was happy after a step.
    AllHappy,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StopReason::StepBudget => write!(f, "step budget exhausted"),
            StopReason::NoImprovement => write!(f, "happiness stopped improving"),
            StopReason::AllHappy => write!(f, "all agents happy"),
        }
    }
}

/// Outcome of a complete run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub seed: u64,
    pub width: usize,
    pub height: usize,
    pub agent_count: usize,
    pub steps_run: u64,
    pub stop_reason: StopReason,
    pub total_moves: u64,
    pub initial: MetricsRecord,
    #[serde(rename = "final")]
    pub final_metrics: MetricsRecord,
}
