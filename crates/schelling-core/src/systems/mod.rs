//! ECS Systems
//!
//! Census, happiness, relocation, the step loop, metrics and convergence.

pub mod census;
pub mod convergence;
pub mod happiness;
pub mod metrics;
pub mod relocation;
pub mod rules;
pub mod step;

// Re-export commonly used systems
pub use census::{census, Census};
pub use convergence::{check_convergence_system, evaluate, Convergence, ConvergenceSettings};
pub use happiness::{is_happy, Comparison, HappinessRule};
pub use metrics::{
    dissimilarity_index, happiness_fraction, measure, metrics_record, record_metrics_system,
    MetricsHistory, MetricsSettings, MetricsSnapshot,
};
pub use relocation::{candidates, find_target, relocate};
pub use rules::Rules;
pub use step::{
    run_step, run_step_system, SchedulerPhase, SimulationState, StepLog, StepReport,
};
