//! Free Cell Set
//!
//! Tracks every unoccupied position of a single-occupancy grid. Kept in
//! lockstep with the grid: each relocation removes the destination and
//! inserts the vacated origin, so the size never changes after setup.

use bevy_ecs::prelude::*;
use rand::seq::SliceRandom;
use rand::Rng;
use schelling_events::Position;
use std::collections::HashMap;

use super::grid::Grid;
use crate::error::OccupancyError;

/// Resource: the set of empty cells.
///
/// Positions live in a `Vec` so iteration order is reproducible; the map
/// only provides O(1) removal.
#[derive(Resource, Debug, Clone, Default)]
pub struct FreeSet {
    cells: Vec<Position>,
    index: HashMap<Position, usize>,
}

impl FreeSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the set from the grid's current empty cells, row-major.
    pub fn from_grid(grid: &Grid) -> Self {
        let mut set = Self::new();
        for pos in grid.empty_positions() {
            set.insert(pos);
        }
        set
    }

    /// Adds a position. Returns false if it was already present.
    pub fn insert(&mut self, pos: Position) -> bool {
        if self.index.contains_key(&pos) {
            return false;
        }
        self.index.insert(pos, self.cells.len());
        self.cells.push(pos);
        true
    }

    /// Removes a position. Returns false if it was not present.
    pub fn remove(&mut self, pos: Position) -> bool {
        let Some(idx) = self.index.remove(&pos) else {
            return false;
        };
        self.cells.swap_remove(idx);
        if let Some(&moved) = self.cells.get(idx) {
            self.index.insert(moved, idx);
        }
        true
    }

    pub fn contains(&self, pos: Position) -> bool {
        self.index.contains_key(&pos)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Position> {
        self.cells.iter()
    }

    /// A freshly shuffled copy of the free cells. The set itself keeps its order.
    pub fn shuffled<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<Position> {
        let mut order = self.cells.clone();
        order.shuffle(rng);
        order
    }

    /// Checks that this set is exactly the complement of the grid's
    /// occupied cells.
    pub fn verify(&self, grid: &Grid) -> Result<(), OccupancyError> {
        let empty = grid.area() - grid.occupied_cells();
        if self.len() != empty {
            return Err(OccupancyError::FreeSetDesync {
                free: self.len(),
                empty,
            });
        }
        match self.cells.iter().find(|&&pos| !grid.is_empty(pos)) {
            Some(&pos) => Err(OccupancyError::Occupied(pos)),
            None => Ok(()),
        }
    }
}
