//! Grid Component
//!
//! The fixed-size 2-D grid that owns every agent and answers adjacency
//! queries under the configured edge policy.

use bevy_ecs::prelude::*;
use schelling_events::{AgentType, Position};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::agent::{Agent, AgentId};
use crate::error::OccupancyError;

/// How the grid treats coordinates beyond its edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum EdgePolicy {
    /// Out-of-range neighbors are dropped.
    #[default]
    Bounded,
    /// Coordinates wrap modulo width and height.
    Torus,
}

/// How many agents a cell may hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OccupancyPolicy {
    /// Zero or one agent per cell.
    #[default]
    Single,
    /// Any number of agents per cell.
    Multi,
}

/// Which adjacent cells count as neighbors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Neighborhood {
    /// The 4 orthogonally adjacent cells.
    VonNeumann,
    /// The 8 surrounding cells.
    #[default]
    Moore,
}

impl Neighborhood {
    const VON_NEUMANN: [(isize, isize); 4] = [(0, -1), (-1, 0), (1, 0), (0, 1)];
    const MOORE: [(isize, isize); 8] = [
        (-1, -1),
        (0, -1),
        (1, -1),
        (-1, 0),
        (1, 0),
        (-1, 1),
        (0, 1),
        (1, 1),
    ];

    /// Relative offsets `(dx, dy)` in row-major order.
    pub fn offsets(self) -> &'static [(isize, isize)] {
        match self {
            Neighborhood::VonNeumann => &Self::VON_NEUMANN,
            Neighborhood::Moore => &Self::MOORE,
        }
    }
}

/// Resource: the grid and every agent on it.
///
/// Cells are stored row-major. In single-occupancy mode no cell ever holds
/// more than one id; `place` and `move_agent` reject anything else.
#[derive(Resource, Debug, Clone)]
pub struct Grid {
    width: usize,
    height: usize,
    edge: EdgePolicy,
    occupancy: OccupancyPolicy,
    cells: Vec<Vec<AgentId>>,
    agents: BTreeMap<AgentId, Agent>,
    occupied_cells: usize,
}

impl Grid {
    pub fn new(width: usize, height: usize, edge: EdgePolicy, occupancy: OccupancyPolicy) -> Self {
        Self {
            width,
            height,
            edge,
            occupancy,
            cells: vec![Vec::new(); width * height],
            agents: BTreeMap::new(),
            occupied_cells: 0,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn area(&self) -> usize {
        self.width * self.height
    }

    pub fn edge_policy(&self) -> EdgePolicy {
        self.edge
    }

    pub fn occupancy(&self) -> OccupancyPolicy {
        self.occupancy
    }

    pub fn in_bounds(&self, pos: Position) -> bool {
        pos.x < self.width && pos.y < self.height
    }

    fn index(&self, pos: Position) -> usize {
        pos.y * self.width + pos.x
    }

    fn check_bounds(&self, pos: Position) -> Result<(), OccupancyError> {
        if self.in_bounds(pos) {
            Ok(())
        } else {
            Err(OccupancyError::OutOfBounds {
                pos,
                width: self.width,
                height: self.height,
            })
        }
    }

    /// Puts a new agent on the grid.
    pub fn place(
        &mut self,
        id: AgentId,
        agent_type: AgentType,
        pos: Position,
    ) -> Result<(), OccupancyError> {
        self.check_bounds(pos)?;
        if self.agents.contains_key(&id) {
            return Err(OccupancyError::DuplicateAgent(id));
        }
        let idx = self.index(pos);
        if self.occupancy == OccupancyPolicy::Single && !self.cells[idx].is_empty() {
            return Err(OccupancyError::Occupied(pos));
        }

        if self.cells[idx].is_empty() {
            self.occupied_cells += 1;
        }
        self.cells[idx].push(id);
        self.agents.insert(id, Agent::new(id, agent_type, pos));
        Ok(())
    }

    /// Moves an agent between cells. Nothing changes unless every check passes.
    pub fn move_agent(
        &mut self,
        id: AgentId,
        from: Position,
        to: Position,
    ) -> Result<(), OccupancyError> {
        self.check_bounds(from)?;
        self.check_bounds(to)?;
        let actual = self
            .agents
            .get(&id)
            .map(|a| a.position)
            .ok_or(OccupancyError::UnknownAgent(id))?;
        if actual != from {
            return Err(OccupancyError::NotAtOrigin {
                agent: id,
                expected: from,
                actual,
            });
        }
        let to_idx = self.index(to);
        if self.occupancy == OccupancyPolicy::Single && !self.cells[to_idx].is_empty() {
            return Err(OccupancyError::Occupied(to));
        }

        let from_idx = self.index(from);
        self.cells[from_idx].retain(|occupant| *occupant != id);
        if self.cells[from_idx].is_empty() {
            self.occupied_cells -= 1;
        }
        if self.cells[to_idx].is_empty() {
            self.occupied_cells += 1;
        }
        self.cells[to_idx].push(id);
        if let Some(agent) = self.agents.get_mut(&id) {
            agent.position = to;
        }
        Ok(())
    }

    /// Distinct neighbor positions of `pos`, excluding `pos` itself.
    ///
    /// Bounded grids clip to `[0, width) x [0, height)`. Torus grids wrap;
    /// on grids narrower than three cells the wrapped offsets can land on
    /// the same cell, which is reported once.
    pub fn neighbors(&self, pos: Position, neighborhood: Neighborhood) -> Vec<Position> {
        let mut out: Vec<Position> = Vec::with_capacity(neighborhood.offsets().len());
        let (w, h) = (self.width as isize, self.height as isize);

        for &(dx, dy) in neighborhood.offsets() {
            let nx = pos.x as isize + dx;
            let ny = pos.y as isize + dy;
            let candidate = match self.edge {
                EdgePolicy::Bounded => {
                    if nx < 0 || ny < 0 || nx >= w || ny >= h {
                        continue;
                    }
                    Position::new(nx as usize, ny as usize)
                }
                EdgePolicy::Torus => {
                    Position::new(nx.rem_euclid(w) as usize, ny.rem_euclid(h) as usize)
                }
            };
            if candidate != pos && !out.contains(&candidate) {
                out.push(candidate);
            }
        }

        out
    }

    /// True if the cell is in range and holds no agent.
    pub fn is_empty(&self, pos: Position) -> bool {
        self.in_bounds(pos) && self.cells[self.index(pos)].is_empty()
    }

    /// Agent ids in a cell, in arrival order. Empty for out-of-range positions.
    pub fn contents(&self, pos: Position) -> &[AgentId] {
        if !self.in_bounds(pos) {
            return &[];
        }
        &self.cells[self.index(pos)]
    }

    /// Per-group occupant counts `(group_a, group_b)` of a cell.
    pub fn type_counts(&self, pos: Position) -> (u32, u32) {
        self.contents(pos)
            .iter()
            .filter_map(|id| self.agents.get(id))
            .fold((0, 0), |(a, b), agent| match agent.agent_type {
                AgentType::GroupA => (a + 1, b),
                AgentType::GroupB => (a, b + 1),
            })
    }

    pub fn agent(&self, id: AgentId) -> Option<&Agent> {
        self.agents.get(&id)
    }

    /// All agents in id order.
    pub fn agents(&self) -> impl Iterator<Item = &Agent> {
        self.agents.values()
    }

    /// All agent ids in ascending order.
    pub fn agent_ids(&self) -> Vec<AgentId> {
        self.agents.keys().copied().collect()
    }

    pub fn agent_count(&self) -> usize {
        self.agents.len()
    }

    pub fn count_of(&self, agent_type: AgentType) -> usize {
        self.agents
            .values()
            .filter(|a| a.agent_type == agent_type)
            .count()
    }

    /// Number of cells holding at least one agent.
    pub fn occupied_cells(&self) -> usize {
        self.occupied_cells
    }

    /// Every position in row-major order.
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        (0..self.height).flat_map(move |y| (0..self.width).map(move |x| Position::new(x, y)))
    }

    /// Empty positions in row-major order.
    pub fn empty_positions(&self) -> Vec<Position> {
        self.positions().filter(|&p| self.is_empty(p)).collect()
    }
}
