//! Relocation Search
//!
//! Finds a cell where an unhappy agent would be happy, and moves it there
//! while keeping the free set in step with the grid.

use rand::seq::SliceRandom;
use rand::Rng;
use schelling_events::Position;

use super::rules::Rules;
use crate::components::{Agent, FreeSet, Grid, OccupancyPolicy};
use crate::error::OccupancyError;

/// Candidate destinations for `agent`, shuffled once for this search.
///
/// Single-occupancy grids draw from the free set. Multi-occupancy grids
/// have no free set, so every cell other than the agent's own is a
/// candidate.
pub fn candidates<R: Rng + ?Sized>(
    grid: &Grid,
    free: &FreeSet,
    agent: &Agent,
    rng: &mut R,
) -> Vec<Position> {
    match grid.occupancy() {
        OccupancyPolicy::Single => free.shuffled(rng),
        OccupancyPolicy::Multi => {
            let mut cells: Vec<Position> = grid
                .positions()
                .filter(|&pos| pos != agent.position)
                .collect();
            cells.shuffle(rng);
            cells
        }
    }
}

/// First shuffled candidate where `agent` would be happy, or `None`.
///
/// `None` is an ordinary outcome: the agent stays where it is.
pub fn find_target<R: Rng + ?Sized>(
    grid: &Grid,
    free: &FreeSet,
    rules: &Rules,
    agent: &Agent,
    rng: &mut R,
) -> Option<Position> {
    candidates(grid, free, agent, rng)
        .into_iter()
        .find(|&pos| rules.is_happy_at(grid, agent, pos))
}

/// Moves `agent` to `target`, swapping the destination out of the free set
/// and the vacated origin into it.
///
/// Validation happens before any mutation. On a single-occupancy grid the
/// free-set size plus occupied cells must still equal the grid area
/// afterwards; if not, the grid and free set have diverged.
pub fn relocate(
    grid: &mut Grid,
    free: &mut FreeSet,
    agent: &Agent,
    target: Position,
) -> Result<(), OccupancyError> {
    let origin = agent.position;

    if grid.occupancy() == OccupancyPolicy::Multi {
        return grid.move_agent(agent.id, origin, target);
    }

    if !free.contains(target) {
        return Err(OccupancyError::NotFree(target));
    }
    grid.move_agent(agent.id, origin, target)?;
    free.remove(target);
    free.insert(origin);

    if free.len() + grid.occupied_cells() != grid.area() {
        return Err(OccupancyError::FreeSetDesync {
            free: free.len(),
            empty: grid.area() - grid.occupied_cells(),
        });
    }
    Ok(())
}
