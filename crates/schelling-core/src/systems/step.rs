//! Step Loop
//!
//! One step visits every agent in a fresh random order. Each visited agent
//! checks its happiness at its current position and, if unhappy, searches
//! for a better cell. Later agents see the moves earlier agents made in the
//! same step.

use bevy_ecs::prelude::*;
use rand::seq::SliceRandom;
use rand::Rng;
use schelling_events::{MoveEvent, StopReason};
use tracing::{debug, error, trace};

use super::relocation::{find_target, relocate};
use super::rules::Rules;
use crate::components::{FreeSet, Grid};
use crate::error::{OccupancyError, StepFault};
use crate::SimRng;

/// Whether a step is in progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SchedulerPhase {
    #[default]
    Idle,
    Stepping,
}

/// Resource: global simulation state
#[derive(Resource, Debug, Default)]
pub struct SimulationState {
    /// Number of completed steps.
    pub current_step: u64,
    pub max_steps: u64,
    pub phase: SchedulerPhase,
    /// Set once the loop should not run again.
    pub stop_reason: Option<StopReason>,
    /// A fatal error raised inside a system. Never cleared.
    pub fault: Option<StepFault>,
}

impl SimulationState {
    pub fn new(max_steps: u64) -> Self {
        Self {
            max_steps,
            ..Self::default()
        }
    }

    pub fn is_finished(&self) -> bool {
        self.stop_reason.is_some() || self.fault.is_some()
    }
}

/// What happened during one step.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StepReport {
    pub step: u64,
    pub visited: u32,
    /// Agents found unhappy when visited.
    pub unhappy: u32,
    /// Unhappy agents for which no candidate cell existed.
    pub stranded: u32,
    pub moves: Vec<MoveEvent>,
}

impl StepReport {
    pub fn move_count(&self) -> u32 {
        self.moves.len() as u32
    }
}

/// Resource: reports of completed steps, newest last.
#[derive(Resource, Debug, Default)]
pub struct StepLog {
    reports: Vec<StepReport>,
}

impl StepLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, report: StepReport) {
        self.reports.push(report);
    }

    pub fn latest(&self) -> Option<&StepReport> {
        self.reports.last()
    }

    pub fn reports(&self) -> &[StepReport] {
        &self.reports
    }

    /// Move events from every recorded step, in order.
    pub fn events(&self) -> impl Iterator<Item = &MoveEvent> {
        self.reports.iter().flat_map(|r| r.moves.iter())
    }
}

/// Runs one full step over every agent.
pub fn run_step<R: Rng + ?Sized>(
    grid: &mut Grid,
    free: &mut FreeSet,
    rules: &Rules,
    rng: &mut R,
    step: u64,
) -> Result<StepReport, OccupancyError> {
    let mut report = StepReport {
        step,
        ..StepReport::default()
    };

    let mut order = grid.agent_ids();
    order.shuffle(rng);

    for id in order {
        let agent = *grid.agent(id).ok_or(OccupancyError::UnknownAgent(id))?;
        report.visited += 1;

        if rules.is_happy(grid, &agent) {
            continue;
        }
        report.unhappy += 1;

        let Some(target) = find_target(grid, free, rules, &agent, rng) else {
            report.stranded += 1;
            continue;
        };

        relocate(grid, free, &agent, target)?;
        trace!(agent = %agent.id, from = %agent.position, to = %target, "relocated");
        report.moves.push(MoveEvent::new(
            step,
            agent.id.0,
            agent.agent_type,
            agent.position,
            target,
        ));
    }

    Ok(report)
}

/// System: advance the simulation by one step.
pub fn run_step_system(
    mut state: ResMut<SimulationState>,
    mut grid: ResMut<Grid>,
    mut free: ResMut<FreeSet>,
    rules: Res<Rules>,
    mut rng: ResMut<SimRng>,
    mut log: ResMut<StepLog>,
) {
    if state.is_finished() {
        return;
    }

    let step = state.current_step + 1;
    state.phase = SchedulerPhase::Stepping;

    match run_step(&mut *grid, &mut *free, &*rules, &mut rng.0, step) {
        Ok(report) => {
            debug!(
                step,
                unhappy = report.unhappy,
                moves = report.move_count(),
                stranded = report.stranded,
                "step complete"
            );
            log.record(report);
        }
        Err(e) => {
            error!(step, "occupancy invariant violated: {}", e);
            state.fault = Some(e.into());
        }
    }

    state.current_step = step;
    state.phase = SchedulerPhase::Idle;
}
