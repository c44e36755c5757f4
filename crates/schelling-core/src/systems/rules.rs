//! Run Rules
//!
//! The fixed-for-the-run settings that decide whether an agent is happy.

use bevy_ecs::prelude::*;
use schelling_events::Position;

use super::census::{census, Census};
use super::happiness::HappinessRule;
use crate::components::{Agent, Grid, Neighborhood};

/// Resource: neighborhood shape plus happiness rule.
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct Rules {
    pub neighborhood: Neighborhood,
    pub happiness: HappinessRule,
}

impl Rules {
    pub fn new(neighborhood: Neighborhood, happiness: HappinessRule) -> Self {
        Self {
            neighborhood,
            happiness,
        }
    }

    pub fn census(&self, grid: &Grid, agent: &Agent, pos: Position) -> Census {
        census(grid, agent, pos, self.neighborhood)
    }

    /// Would `agent` be happy standing at `pos`?
    pub fn is_happy_at(&self, grid: &Grid, agent: &Agent, pos: Position) -> bool {
        self.happiness.is_happy(self.census(grid, agent, pos))
    }

    /// Is `agent` happy where it stands now?
    pub fn is_happy(&self, grid: &Grid, agent: &Agent) -> bool {
        self.is_happy_at(grid, agent, agent.position)
    }
}
