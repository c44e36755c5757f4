//! Simulation Driver
//!
//! Owns the ECS world and the step schedule. Every resource the systems
//! touch lives in the world; callers only get shared references between
//! steps.

use bevy_ecs::prelude::*;
use bevy_ecs::schedule::ExecutorKind;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use schelling_events::{GridSnapshot, MetricsRecord, MetricsSeries, RunSummary, StopReason};
use tracing::info;

use crate::components::{FreeSet, Grid};
use crate::config::SimConfig;
use crate::error::SimError;
use crate::output::grid_snapshot;
use crate::setup::build_grid;
use crate::systems::{
    check_convergence_system, metrics_record, record_metrics_system, run_step_system,
    ConvergenceSettings, MetricsHistory, MetricsSettings, Rules, SimulationState, StepLog,
    StepReport,
};
use crate::SimRng;

/// A seeded, single-threaded Schelling run.
pub struct Simulation {
    world: World,
    schedule: Schedule,
    seed: u64,
}

impl Simulation {
    /// Validates `config`, places the population and records step-0 metrics.
    pub fn new(config: &SimConfig) -> Result<Self, SimError> {
        config.validate()?;

        let seed = config.run.seed;
        let mut rng = SmallRng::seed_from_u64(seed);
        let (grid, free) = build_grid(config, &mut rng)?;

        let rules = config.rules.to_rules();
        let metrics_settings = MetricsSettings {
            block_width: config.metrics.block_width,
            block_height: config.metrics.block_height,
        };
        let initial = metrics_record(&grid, &rules, &metrics_settings, 0, 0)?;
        let mut history = MetricsHistory::default();
        history.0.push(initial);

        let mut world = World::new();
        world.insert_resource(SimulationState::new(config.run.steps));
        world.insert_resource(SimRng(rng));
        world.insert_resource(grid);
        world.insert_resource(free);
        world.insert_resource(rules);
        world.insert_resource(metrics_settings);
        world.insert_resource(ConvergenceSettings {
            criterion: config.run.convergence,
        });
        world.insert_resource(history);
        world.insert_resource(StepLog::new());

        // Step, then measure, then decide whether to stop
        let mut schedule = Schedule::default();
        schedule.set_executor_kind(ExecutorKind::SingleThreaded);
        schedule.add_systems(
            (
                run_step_system,
                record_metrics_system,
                check_convergence_system,
            )
                .chain(),
        );

        info!(
            seed,
            steps = config.run.steps,
            threshold = config.rules.threshold,
            happiness = initial.happiness_fraction,
            dissimilarity = initial.dissimilarity_index,
            "simulation initialized"
        );

        Ok(Self {
            world,
            schedule,
            seed,
        })
    }

    /// Runs one step. Returns the stop reason once the run is over; further
    /// calls are no-ops that return the same reason.
    ///
    /// A fault is terminal: the failing step and every later call return
    /// the same error without touching the grid again.
    pub fn step(&mut self) -> Result<Option<StopReason>, SimError> {
        self.check_fault()?;
        if let Some(reason) = self.state().stop_reason {
            return Ok(Some(reason));
        }

        self.schedule.run(&mut self.world);

        self.check_fault()?;
        Ok(self.state().stop_reason)
    }

    fn check_fault(&self) -> Result<(), SimError> {
        match &self.state().fault {
            Some(fault) => Err(fault.clone().into()),
            None => Ok(()),
        }
    }

    /// Steps until a stop condition holds.
    pub fn run(&mut self) -> Result<RunSummary, SimError> {
        loop {
            if let Some(reason) = self.step()? {
                let summary = self.build_summary(reason);
                info!(
                    steps = summary.steps_run,
                    moves = summary.total_moves,
                    happiness = summary.final_metrics.happiness_fraction,
                    dissimilarity = summary.final_metrics.dissimilarity_index,
                    "simulation complete: {}",
                    reason
                );
                return Ok(summary);
            }
        }
    }

    /// Summary of the run so far, once it has stopped.
    pub fn summary(&self) -> Option<RunSummary> {
        self.state().stop_reason.map(|reason| self.build_summary(reason))
    }

    fn build_summary(&self, stop_reason: StopReason) -> RunSummary {
        let grid = self.grid();
        let series = self.metrics();
        let initial = series.records()[0];
        let final_metrics = series.latest().copied().unwrap_or(initial);

        RunSummary {
            seed: self.seed,
            width: grid.width(),
            height: grid.height(),
            agent_count: grid.agent_count(),
            steps_run: self.state().current_step,
            stop_reason,
            total_moves: series.total_moves(),
            initial,
            final_metrics,
        }
    }

    /// Snapshot of the grid as it stands after the last completed step.
    pub fn snapshot(&self) -> GridSnapshot {
        let step = self.state().current_step;
        grid_snapshot(self.grid(), format!("snap_step_{:06}", step), step)
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn grid(&self) -> &Grid {
        self.world.resource::<Grid>()
    }

    pub fn free_set(&self) -> &FreeSet {
        self.world.resource::<FreeSet>()
    }

    pub fn rules(&self) -> &Rules {
        self.world.resource::<Rules>()
    }

    pub fn state(&self) -> &SimulationState {
        self.world.resource::<SimulationState>()
    }

    pub fn metrics(&self) -> &MetricsSeries {
        &self.world.resource::<MetricsHistory>().0
    }

    pub fn latest_metrics(&self) -> Option<&MetricsRecord> {
        self.metrics().latest()
    }

    pub fn step_log(&self) -> &StepLog {
        self.world.resource::<StepLog>()
    }

    pub fn last_report(&self) -> Option<&StepReport> {
        self.step_log().latest()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PopulationConfig;
    use crate::error::{OccupancyError, StepFault};
    use crate::systems::Convergence;
    use schelling_events::Position;

    fn small_config() -> SimConfig {
        let mut config = SimConfig::default();
        config.run.steps = 5;
        config
    }

    #[test]
    fn test_new_records_initial_metrics() {
        let sim = Simulation::new(&small_config()).unwrap();

        assert_eq!(sim.metrics().len(), 1);
        assert_eq!(sim.metrics().records()[0].step, 0);
        assert_eq!(sim.state().current_step, 0);
        assert!(sim.summary().is_none());
    }

    #[test]
    fn test_run_exhausts_budget() {
        let mut sim = Simulation::new(&small_config()).unwrap();
        let summary = sim.run().unwrap();

        assert_eq!(summary.stop_reason, StopReason::StepBudget);
        assert_eq!(summary.steps_run, 5);
        assert_eq!(sim.metrics().len(), 6);
        assert_eq!(sim.step_log().reports().len(), 5);
        assert_eq!(sim.summary(), Some(summary));
    }

    #[test]
    fn test_step_after_stop_is_noop() {
        let mut sim = Simulation::new(&small_config()).unwrap();
        sim.run().unwrap();

        assert_eq!(sim.step().unwrap(), Some(StopReason::StepBudget));
        assert_eq!(sim.state().current_step, 5);
        assert_eq!(sim.metrics().len(), 6);
    }

    #[test]
    fn test_all_happy_stops_immediately_at_threshold_zero() {
        let mut config = small_config();
        config.rules.threshold = 0.0;
        config.run.convergence = Convergence::AllHappy;

        let mut sim = Simulation::new(&config).unwrap();
        let summary = sim.run().unwrap();

        assert_eq!(summary.stop_reason, StopReason::AllHappy);
        assert_eq!(summary.steps_run, 1);
        assert_eq!(summary.total_moves, 0);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let mut config = small_config();
        config.population = PopulationConfig::counts(90, 20);

        assert!(matches!(
            Simulation::new(&config),
            Err(SimError::Configuration(_))
        ));
    }

    #[test]
    fn test_snapshot_counts_match_population() {
        let sim = Simulation::new(&small_config()).unwrap();
        let snapshot = sim.snapshot();

        assert_eq!(snapshot.count(schelling_events::AgentType::GroupA), 75);
        assert_eq!(snapshot.count(schelling_events::AgentType::GroupB), 10);
        assert_eq!(snapshot.empty_cells(), 15);
    }

    #[test]
    fn test_fault_is_sticky() {
        let mut sim = Simulation::new(&small_config()).unwrap();
        let fault = OccupancyError::Occupied(Position::new(3, 4));
        sim.world.resource_mut::<SimulationState>().fault = Some(fault.clone().into());

        for _ in 0..3 {
            match sim.step() {
                Err(SimError::Occupancy(e)) => assert_eq!(e, fault),
                other => panic!("expected occupancy fault, got {:?}", other),
            }
        }
        assert!(matches!(sim.run(), Err(SimError::Occupancy(_))));
        assert_eq!(sim.state().current_step, 0);
        assert_eq!(sim.metrics().len(), 1);
        assert!(sim.step_log().reports().is_empty());
    }

    #[test]
    fn test_fault_raised_mid_step_halts_the_run() {
        let mut config = small_config();
        config.population = PopulationConfig::counts(25, 25);
        config.rules.threshold = 1.0;
        let mut sim = Simulation::new(&config).unwrap();

        // Drop one free cell so the free set no longer matches the grid.
        let stray = sim.free_set().iter().copied().next().unwrap();
        sim.world.resource_mut::<FreeSet>().remove(stray);

        let first = sim.step();
        assert!(matches!(
            first,
            Err(SimError::Occupancy(OccupancyError::FreeSetDesync { .. }))
        ));
        let faulted = sim.state().fault.clone();
        assert!(matches!(faulted, Some(StepFault::Occupancy(_))));
        let grid_after_fault = sim.snapshot();

        assert!(sim.step().is_err());
        assert!(sim.step().is_err());
        assert_eq!(sim.state().current_step, 1);
        assert_eq!(sim.state().fault, faulted);
        assert_eq!(sim.snapshot(), grid_after_fault);
        assert_eq!(sim.metrics().len(), 1);
    }
}
