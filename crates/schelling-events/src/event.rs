//! Move Events
//!
//! One record per successful relocation, in the order the moves happened.

use serde::{Deserialize, Serialize};

use crate::{AgentType, Position};

/// An agent relocated from `from` to `to` during `step`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveEvent {
    pub step: u64,
    pub agent_id: u32,
    pub agent_type: AgentType,
    pub from: Position,
    pub to: Position,
}

impl MoveEvent {
    pub fn new(
        step: u64,
        agent_id: u32,
        agent_type: AgentType,
        from: Position,
        to: Position,
    ) -> Self {
        Self {
            step,
            agent_id,
            agent_type,
            from,
            to,
        }
    }
}
