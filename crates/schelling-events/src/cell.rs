//! Cell Types
//!
//! Grid coordinates, the two agent groups, and the per-cell state that a
//! renderer needs.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Integer grid coordinate. `x` indexes columns, `y` indexes rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub x: usize,
    pub y: usize,
}

impl Position {
    pub fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// The two populations of the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentType {
    GroupA,
    GroupB,
}

impl AgentType {
    /// Returns the other group.
    pub fn other(self) -> Self {
        match self {
            AgentType::GroupA => AgentType::GroupB,
            AgentType::GroupB => AgentType::GroupA,
        }
    }

    /// Single-character label used in ASCII output.
    pub fn symbol(self) -> char {
        match self {
            AgentType::GroupA => 'A',
            AgentType::GroupB => 'B',
        }
    }

    /// Returns both variants, GroupA first.
    pub fn all() -> &'static [AgentType] {
        &[AgentType::GroupA, AgentType::GroupB]
    }
}

impl fmt::Display for AgentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AgentType::GroupA => write!(f, "group_a"),
            AgentType::GroupB => write!(f, "group_b"),
        }
    }
}

/// What a single cell shows to a renderer.
///
/// Multi-occupancy cells holding more than one agent report `Crowded`
/// with the per-group counts; a cell whose occupants all share a group
/// still reports `Crowded` so the count is not lost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum CellState {
    #[default]
    Empty,
    GroupA,
    GroupB,
    Crowded { group_a: u32, group_b: u32 },
}

impl CellState {
    /// Builds the state from per-group occupant counts.
    pub fn from_counts(group_a: u32, group_b: u32) -> Self {
        match (group_a, group_b) {
            (0, 0) => CellState::Empty,
            (1, 0) => CellState::GroupA,
            (0, 1) => CellState::GroupB,
            _ => CellState::Crowded { group_a, group_b },
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, CellState::Empty)
    }

    /// Number of agents of `agent_type` in this cell.
    pub fn count(&self, agent_type: AgentType) -> u32 {
        match (self, agent_type) {
            (CellState::Empty, _) => 0,
            (CellState::GroupA, AgentType::GroupA) => 1,
            (CellState::GroupB, AgentType::GroupB) => 1,
            (CellState::GroupA, AgentType::GroupB) | (CellState::GroupB, AgentType::GroupA) => 0,
            (CellState::Crowded { group_a, .. }, AgentType::GroupA) => *group_a,
            (CellState::Crowded { group_b, .. }, AgentType::GroupB) => *group_b,
        }
    }

    /// ASCII symbol: `.` empty, `A`/`B` single occupant, a digit (or `+`
    /// above nine) for crowded cells.
    pub fn symbol(&self) -> char {
        match self {
            CellState::Empty => '.',
            CellState::GroupA => AgentType::GroupA.symbol(),
            CellState::GroupB => AgentType::GroupB.symbol(),
            CellState::Crowded { group_a, group_b } => {
                let total = group_a + group_b;
                char::from_digit(total, 10).unwrap_or('+')
            }
        }
    }
}

impl From<AgentType> for CellState {
    fn from(agent_type: AgentType) -> Self {
        match agent_type {
            AgentType::GroupA => CellState::GroupA,
            AgentType::GroupB => CellState::GroupB,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_agent_type_other() {
        assert_eq!(AgentType::GroupA.other(), AgentType::GroupB);
        assert_eq!(AgentType::GroupB.other(), AgentType::GroupA);
    }

    #[test]
    fn test_cell_state_from_counts() {
        assert_eq!(CellState::from_counts(0, 0), CellState::Empty);
        assert_eq!(CellState::from_counts(1, 0), CellState::GroupA);
        assert_eq!(CellState::from_counts(0, 1), CellState::GroupB);
        assert_eq!(
            CellState::from_counts(2, 1),
            CellState::Crowded { group_a: 2, group_b: 1 }
        );
    }

    #[test]
    fn test_cell_state_symbols() {
        assert_eq!(CellState::Empty.symbol(), '.');
        assert_eq!(CellState::GroupA.symbol(), 'A');
        assert_eq!(CellState::from_counts(2, 1).symbol(), '3');
        assert_eq!(CellState::from_counts(7, 5).symbol(), '+');
    }

    #[test]
    fn test_cell_state_serialization() {
        let json = serde_json::to_string(&CellState::GroupB).unwrap();
        assert_eq!(json, r#"{"kind":"group_b"}"#);

        let crowded: CellState =
            serde_json::from_str(r#"{"kind":"crowded","group_a":3,"group_b":0}"#).unwrap();
        assert_eq!(crowded.count(AgentType::GroupA), 3);
    }
}
