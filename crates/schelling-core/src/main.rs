//! Schelling Segregation Simulation
//!
//! Runs the segregation model from a TOML config, with command-line
//! overrides, and writes the run products.

use clap::Parser;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use schelling_core::config::{SimConfig, DEFAULT_CONFIG_PATH};
use schelling_core::events::EventLogger;
use schelling_core::output::{write_json, write_metrics_csv, SnapshotGenerator};
use schelling_core::setup::spawn_summary;
use schelling_core::{EdgePolicy, SimError, Simulation};

/// Command line arguments for the simulation
#[derive(Parser, Debug)]
#[command(name = "schelling")]
#[command(about = "Schelling segregation model on a grid")]
struct Args {
    /// TOML config file; defaults apply when omitted
    #[arg(long)]
    config: Option<PathBuf>,

    /// Random seed for reproducibility
    #[arg(long)]
    seed: Option<u64>,

    /// Maximum number of steps
    #[arg(long)]
    steps: Option<u64>,

    /// Fraction of same-type neighbors an agent requires
    #[arg(long)]
    threshold: Option<f64>,

    #[arg(long)]
    width: Option<usize>,

    #[arg(long)]
    height: Option<usize>,

    /// Wrap the grid edges
    #[arg(long)]
    torus: bool,

    /// Interval between grid snapshots (in steps, 0 for first and last only)
    #[arg(long, default_value_t = 0)]
    snapshot_interval: u64,

    /// Directory for JSON grid snapshots
    #[arg(long)]
    snapshot_dir: Option<PathBuf>,

    /// Print the grid as text at every snapshot
    #[arg(long)]
    print_grid: bool,

    /// Write the run summary as JSON
    #[arg(long)]
    summary_json: Option<PathBuf>,

    /// Write the metric series as CSV
    #[arg(long)]
    metrics_csv: Option<PathBuf>,

    /// Write every move as JSONL
    #[arg(long)]
    events: Option<PathBuf>,

    /// Write the effective config to this path and exit
    #[arg(long)]
    write_default_config: Option<PathBuf>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn load_config(args: &Args) -> Result<SimConfig, SimError> {
    let mut config = match &args.config {
        Some(path) => SimConfig::load(path)?,
        None if Path::new(DEFAULT_CONFIG_PATH).exists() => {
            info!("using {}", DEFAULT_CONFIG_PATH);
            SimConfig::load(DEFAULT_CONFIG_PATH)?
        }
        None => SimConfig::default(),
    };

    if let Some(seed) = args.seed {
        config.run.seed = seed;
    }
    if let Some(steps) = args.steps {
        config.run.steps = steps;
    }
    if let Some(threshold) = args.threshold {
        config.rules.threshold = threshold;
    }
    if let Some(width) = args.width {
        config.grid.width = width;
    }
    if let Some(height) = args.height {
        config.grid.height = height;
    }
    if args.torus {
        config.grid.edge = EdgePolicy::Torus;
    }
    Ok(config)
}

fn run(args: &Args) -> Result<(), SimError> {
    let config = load_config(args)?;

    if let Some(path) = &args.write_default_config {
        fs::write(path, config.to_toml()?)?;
        info!("wrote config to {}", path.display());
        return Ok(());
    }

    println!("Schelling Segregation Simulation");
    println!("================================");
    println!("Seed: {}", config.run.seed);
    println!("Grid: {}x{}", config.grid.width, config.grid.height);
    println!("Threshold: {}", config.rules.threshold);
    println!("Steps: {}", config.run.steps);
    println!();

    let mut sim = Simulation::new(&config)?;
    print!("{}", spawn_summary(sim.grid(), sim.free_set()));
    println!();

    if let Some(dir) = &args.snapshot_dir {
        fs::create_dir_all(dir)?;
    }
    let mut snapshots = SnapshotGenerator::new(args.snapshot_interval);
    let mut logger = match &args.events {
        Some(path) => EventLogger::new(path)?,
        None => EventLogger::null(),
    };

    emit_snapshot(&sim, &mut snapshots, args);

    let summary = loop {
        let stop = sim.step()?;
        if let Some(report) = sim.last_report() {
            logger.log_step(report)?;
        }

        // Progress every 10 steps
        let step = sim.state().current_step;
        if let Some(record) = sim.latest_metrics().filter(|_| step % 10 == 0) {
            info!(
                step,
                moves = record.moves,
                happiness = format!("{:.4}", record.happiness_fraction),
                dissimilarity = format!("{:.4}", record.dissimilarity_index),
                "step"
            );
        }

        if stop.is_some() || snapshots.should_snapshot(step) {
            emit_snapshot(&sim, &mut snapshots, args);
        }
        if stop.is_some() {
            if let Some(summary) = sim.summary() {
                break summary;
            }
        }
    };
    logger.flush()?;

    if let Some(path) = &args.summary_json {
        write_json(&summary, path)?;
        info!("wrote summary to {}", path.display());
    }
    if let Some(path) = &args.metrics_csv {
        write_metrics_csv(sim.metrics(), path)?;
        info!("wrote metrics to {}", path.display());
    }

    println!();
    println!(
        "Simulation complete. Ran {} steps ({}).",
        summary.steps_run, summary.stop_reason
    );
    println!("Total moves: {}", summary.total_moves);
    println!(
        "Happiness: {:.4} -> {:.4}",
        summary.initial.happiness_fraction, summary.final_metrics.happiness_fraction
    );
    println!(
        "Dissimilarity: {:.4} -> {:.4}",
        summary.initial.dissimilarity_index, summary.final_metrics.dissimilarity_index
    );
    if args.events.is_some() {
        println!("Logged {} move events.", logger.event_count());
    }
    if args.snapshot_dir.is_some() {
        println!("Generated {} snapshots.", snapshots.snapshot_count());
    }
    Ok(())
}

fn emit_snapshot(sim: &Simulation, snapshots: &mut SnapshotGenerator, args: &Args) {
    if args.snapshot_dir.is_none() && !args.print_grid {
        return;
    }

    let step = sim.state().current_step;
    let snapshot = snapshots.generate(sim.grid(), step);

    if args.print_grid {
        println!("[Step {:>4}]", step);
        print!("{}", snapshot);
        println!();
    }
    if let Some(dir) = &args.snapshot_dir {
        let path = dir.join(format!("{}.json", snapshot.snapshot_id));
        if let Err(e) = write_json(&snapshot, &path) {
            warn!("could not write snapshot at step {}: {}", step, e);
        }
    }
}
