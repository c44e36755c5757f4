//! Agent Spawning
//!
//! Creates the two populations and places them on random empty cells.

use rand::rngs::SmallRng;
use rand::Rng;
use schelling_events::{AgentType, Position};
use tracing::info;

use crate::components::{AgentId, FreeSet, Grid, OccupancyPolicy};
use crate::config::SimConfig;
use crate::error::{OccupancyError, SimError};

/// Uniformly random cell.
fn random_position(grid: &Grid, rng: &mut SmallRng) -> Position {
    Position::new(rng.gen_range(0..grid.width()), rng.gen_range(0..grid.height()))
}

/// Rejection-samples an empty cell: draw uniformly until one is empty.
///
/// The caller guarantees at least one empty cell exists.
fn random_empty_position(grid: &Grid, rng: &mut SmallRng) -> Position {
    loop {
        let pos = random_position(grid, rng);
        if grid.is_empty(pos) {
            return pos;
        }
    }
}

/// Spawns `count_a` GroupA agents, then `count_b` GroupB agents, with ids
/// assigned in that order starting at 0.
///
/// Single-occupancy grids place each agent on an empty cell; multi-occupancy
/// grids place it on any cell.
pub fn spawn_agents(
    grid: &mut Grid,
    count_a: usize,
    count_b: usize,
    rng: &mut SmallRng,
) -> Result<(), OccupancyError> {
    let population = std::iter::repeat(AgentType::GroupA)
        .take(count_a)
        .chain(std::iter::repeat(AgentType::GroupB).take(count_b));

    for (i, agent_type) in population.enumerate() {
        let pos = match grid.occupancy() {
            OccupancyPolicy::Single => {
                if grid.occupied_cells() >= grid.area() {
                    return Err(OccupancyError::GridFull(AgentId(i as u32)));
                }
                random_empty_position(grid, rng)
            }
            OccupancyPolicy::Multi => random_position(grid, rng),
        };
        grid.place(AgentId(i as u32), agent_type, pos)?;
    }

    Ok(())
}

/// Builds the grid and free set for a validated configuration.
pub fn build_grid(config: &SimConfig, rng: &mut SmallRng) -> Result<(Grid, FreeSet), SimError> {
    config.validate()?;
    let (count_a, count_b) = config.population_counts()?;

    let mut grid = Grid::new(
        config.grid.width,
        config.grid.height,
        config.grid.edge,
        config.grid.occupancy,
    );
    spawn_agents(&mut grid, count_a, count_b, rng)?;

    let free = match grid.occupancy() {
        OccupancyPolicy::Single => FreeSet::from_grid(&grid),
        OccupancyPolicy::Multi => FreeSet::new(),
    };
    if grid.occupancy() == OccupancyPolicy::Single {
        free.verify(&grid)?;
    }

    let summary = spawn_summary(&grid, &free);
    info!(
        group_a = summary.group_a,
        group_b = summary.group_b,
        free_cells = summary.free_cells,
        "placed agents on {}x{} grid",
        grid.width(),
        grid.height()
    );

    Ok((grid, free))
}

/// Summary of spawned agents
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpawnSummary {
    pub total_agents: usize,
    pub group_a: usize,
    pub group_b: usize,
    pub free_cells: usize,
}

/// Get summary stats for spawned agents
pub fn spawn_summary(grid: &Grid, free: &FreeSet) -> SpawnSummary {
    SpawnSummary {
        total_agents: grid.agent_count(),
        group_a: grid.count_of(AgentType::GroupA),
        group_b: grid.count_of(AgentType::GroupB),
        free_cells: free.len(),
    }
}

impl std::fmt::Display for SpawnSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Total agents: {}", self.total_agents)?;
        writeln!(f, "  {}: {}", AgentType::GroupA, self.group_a)?;
        writeln!(f, "  {}: {}", AgentType::GroupB, self.group_b)?;
        writeln!(f, "Free cells: {}", self.free_cells)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::EdgePolicy;
    use crate::config::PopulationConfig;
    use rand::SeedableRng;

    #[test]
    fn test_spawn_single_occupancy() {
        let mut grid = Grid::new(5, 5, EdgePolicy::Bounded, OccupancyPolicy::Single);
        let mut rng = SmallRng::seed_from_u64(12345);

        spawn_agents(&mut grid, 10, 5, &mut rng).unwrap();

        assert_eq!(grid.agent_count(), 15);
        assert_eq!(grid.occupied_cells(), 15);
        assert_eq!(grid.count_of(AgentType::GroupA), 10);
        assert_eq!(grid.agent(AgentId(10)).unwrap().agent_type, AgentType::GroupB);
    }

    #[test]
    fn test_spawn_fills_grid_completely() {
        let mut grid = Grid::new(3, 3, EdgePolicy::Bounded, OccupancyPolicy::Single);
        let mut rng = SmallRng::seed_from_u64(1);

        spawn_agents(&mut grid, 5, 4, &mut rng).unwrap();

        assert!(grid.empty_positions().is_empty());
        assert_eq!(
            spawn_agents(&mut grid, 1, 0, &mut rng),
            Err(OccupancyError::GridFull(AgentId(0)))
        );
    }

    #[test]
    fn test_spawn_is_deterministic() {
        let place = |seed| {
            let mut grid = Grid::new(8, 8, EdgePolicy::Torus, OccupancyPolicy::Single);
            spawn_agents(&mut grid, 20, 20, &mut SmallRng::seed_from_u64(seed)).unwrap();
            grid.agents().map(|a| a.position).collect::<Vec<_>>()
        };

        assert_eq!(place(99), place(99));
        assert_ne!(place(99), place(100));
    }

    #[test]
    fn test_build_grid_from_config() {
        let config = SimConfig::default();
        let mut rng = SmallRng::seed_from_u64(config.run.seed);

        let (grid, free) = build_grid(&config, &mut rng).unwrap();
        let summary = spawn_summary(&grid, &free);

        assert_eq!(summary.group_a, 75);
        assert_eq!(summary.group_b, 10);
        assert_eq!(summary.free_cells, 15);
        assert!(summary.to_string().contains("group_a: 75"));
    }

    #[test]
    fn test_build_grid_multi_occupancy_has_no_free_set() {
        let mut config = SimConfig::default();
        config.grid.occupancy = OccupancyPolicy::Multi;
        config.population = PopulationConfig::counts(150, 50);
        let mut rng = SmallRng::seed_from_u64(3);

        let (grid, free) = build_grid(&config, &mut rng).unwrap();

        assert_eq!(grid.agent_count(), 200);
        assert!(free.is_empty());
    }

    #[test]
    fn test_build_grid_rejects_invalid_config() {
        let mut config = SimConfig::default();
        config.population = PopulationConfig::counts(100, 1);
        let mut rng = SmallRng::seed_from_u64(3);

        assert!(matches!(
            build_grid(&config, &mut rng),
            Err(SimError::Configuration(_))
        ));
    }
}
