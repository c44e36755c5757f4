//! Neighbor Census
//!
//! Counts same-group and other-group occupants around a position.

use schelling_events::Position;

use crate::components::{Agent, Grid, Neighborhood};

/// Neighbor counts seen by one agent at one position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Census {
    pub same: u32,
    pub different: u32,
}

impl Census {
    pub fn total(&self) -> u32 {
        self.same + self.different
    }
}

/// Counts the neighbors `agent` would have if it stood at `pos`.
///
/// Every occupant of every neighboring cell is counted, so crowded
/// multi-occupancy cells contribute more than one. The agent never counts
/// itself, which matters when `pos` is next to its current cell.
pub fn census(grid: &Grid, agent: &Agent, pos: Position, neighborhood: Neighborhood) -> Census {
    let mut counts = Census::default();

    for neighbor in grid.neighbors(pos, neighborhood) {
        for id in grid.contents(neighbor) {
            if *id == agent.id {
                continue;
            }
            let Some(other) = grid.agent(*id) else {
                continue;
            };
            if agent.is_same_type(other.agent_type) {
                counts.same += 1;
            } else {
                counts.different += 1;
            }
        }
    }

    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{AgentId, EdgePolicy, OccupancyPolicy};
    use schelling_events::AgentType;

    fn grid_with(occupants: &[(u32, AgentType, (usize, usize))], edge: EdgePolicy) -> Grid {
        let mut grid = Grid::new(3, 3, edge, OccupancyPolicy::Single);
        for &(id, agent_type, (x, y)) in occupants {
            grid.place(AgentId(id), agent_type, Position::new(x, y)).unwrap();
        }
        grid
    }

    #[test]
    fn test_census_moore_center() {
        let grid = grid_with(
            &[
                (0, AgentType::GroupA, (1, 1)),
                (1, AgentType::GroupA, (0, 0)),
                (2, AgentType::GroupB, (2, 0)),
                (3, AgentType::GroupB, (2, 2)),
            ],
            EdgePolicy::Bounded,
        );
        let agent = *grid.agent(AgentId(0)).unwrap();

        let moore = census(&grid, &agent, agent.position, Neighborhood::Moore);
        assert_eq!(moore, Census { same: 1, different: 2 });

        let von_neumann = census(&grid, &agent, agent.position, Neighborhood::VonNeumann);
        assert_eq!(von_neumann, Census::default());
    }

    #[test]
    fn test_census_excludes_self_at_candidate() {
        let grid = grid_with(
            &[
                (0, AgentType::GroupA, (0, 0)),
                (1, AgentType::GroupB, (2, 1)),
            ],
            EdgePolicy::Bounded,
        );
        let agent = *grid.agent(AgentId(0)).unwrap();

        // (1, 1) touches the agent's own cell; only the GroupB agent counts.
        let counts = census(&grid, &agent, Position::new(1, 1), Neighborhood::Moore);
        assert_eq!(counts, Census { same: 0, different: 1 });
    }

    #[test]
    fn test_census_torus_sees_across_edges() {
        let grid = grid_with(
            &[
                (0, AgentType::GroupA, (0, 0)),
                (1, AgentType::GroupA, (2, 2)),
            ],
            EdgePolicy::Torus,
        );
        let agent = *grid.agent(AgentId(0)).unwrap();

        let counts = census(&grid, &agent, agent.position, Neighborhood::Moore);
        assert_eq!(counts, Census { same: 1, different: 0 });
    }

    #[test]
    fn test_census_counts_every_agent_in_crowded_cell() {
        let mut grid = Grid::new(3, 3, EdgePolicy::Bounded, OccupancyPolicy::Multi);
        grid.place(AgentId(0), AgentType::GroupB, Position::new(0, 0)).unwrap();
        for id in 1..4 {
            grid.place(AgentId(id), AgentType::GroupA, Position::new(1, 0)).unwrap();
        }
        grid.place(AgentId(4), AgentType::GroupB, Position::new(1, 0)).unwrap();
        let agent = *grid.agent(AgentId(0)).unwrap();

        let counts = census(&grid, &agent, agent.position, Neighborhood::VonNeumann);
        assert_eq!(counts, Census { same: 1, different: 3 });
    }

    #[test]
    fn test_census_is_idempotent() {
        let grid = grid_with(
            &[
                (0, AgentType::GroupB, (1, 1)),
                (1, AgentType::GroupA, (1, 0)),
                (2, AgentType::GroupB, (0, 1)),
            ],
            EdgePolicy::Bounded,
        );
        let agent = *grid.agent(AgentId(0)).unwrap();

        let first = census(&grid, &agent, agent.position, Neighborhood::Moore);
        let second = census(&grid, &agent, agent.position, Neighborhood::Moore);
        assert_eq!(first, second);
    }
}
