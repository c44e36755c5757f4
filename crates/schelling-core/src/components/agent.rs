//! Agent Components
//!
//! An agent is an id, a fixed group tag and a position. Behavior is keyed
//! on the tag; there are no per-group agent types.

use schelling_events::{AgentType, Position};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique agent identifier, assigned sequentially at setup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AgentId(pub u32);

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "agent_{:04}", self.0)
    }
}

/// A placed agent. Only the grid creates or moves these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Agent {
    pub id: AgentId,
    pub agent_type: AgentType,
    pub position: Position,
}

impl Agent {
    pub fn new(id: AgentId, agent_type: AgentType, position: Position) -> Self {
        Self {
            id,
            agent_type,
            position,
        }
    }

    /// True if `other` belongs to the same group.
    pub fn is_same_type(&self, other: AgentType) -> bool {
        self.agent_type == other
    }
}
