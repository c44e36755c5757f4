//! Snapshot Types
//!
//! Row-major grid snapshots for renderers.
//!
//! A snapshot captures every cell of the grid after a step. It is a copy,
//! so holding one never borrows the engine's grid.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{AgentType, CellState, Position};

/// Generates a snapshot ID with the given sequence number.
pub fn generate_snapshot_id(sequence: u64) -> String {
    format!("snap_{:06}", sequence)
}

/// The cell contents of the whole grid at one step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridSnapshot {
    pub snapshot_id: String,
    pub step: u64,
    pub width: usize,
    pub height: usize,
    /// `cells[y][x]`
    pub cells: Vec<Vec<CellState>>,
}

impl GridSnapshot {
    /// Creates an all-empty snapshot.
    pub fn empty(snapshot_id: impl Into<String>, step: u64, width: usize, height: usize) -> Self {
        Self {
            snapshot_id: snapshot_id.into(),
            step,
            width,
            height,
            cells: vec![vec![CellState::Empty; width]; height],
        }
    }

    pub fn get(&self, pos: Position) -> Option<CellState> {
        self.cells.get(pos.y).and_then(|row| row.get(pos.x)).copied()
    }

    pub fn set(&mut self, pos: Position, state: CellState) {
        if let Some(cell) = self.cells.get_mut(pos.y).and_then(|row| row.get_mut(pos.x)) {
            *cell = state;
        }
    }

    /// Total agents of `agent_type` across the grid.
    pub fn count(&self, agent_type: AgentType) -> u32 {
        self.cells
            .iter()
            .flatten()
            .map(|cell| cell.count(agent_type))
            .sum()
    }

    pub fn empty_cells(&self) -> usize {
        self.cells.iter().flatten().filter(|c| c.is_empty()).count()
    }
}

impl fmt::Display for GridSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.cells {
            let line: String = row.iter().map(|c| c.symbol()).collect();
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}
