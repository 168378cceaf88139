//! Board engine for a single-player Minesweeper variant on a square grid.
//!
//! Opening a tile floods through every orthogonally connected hidden tile that is not a mine,
//! regardless of how many mines surround the tiles on the way.

#![no_std]

extern crate alloc;

use alloc::vec::Vec;
use core::ops::Index;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

pub use board::*;
pub use error::*;
pub use generator::*;
pub use session::*;
pub use settings::*;
pub use types::*;

mod board;
mod error;
mod generator;
mod session;
mod settings;
mod types;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardConfig {
    pub size: Coord,
    pub mines: CellCount,
}

impl BoardConfig {
    /// Smallest board the settings allow.
    pub const MIN_SIZE: Coord = 3;

    pub const fn new_unchecked(size: Coord, mines: CellCount) -> Self {
        Self { size, mines }
    }

    pub fn new(size: Coord, mines: CellCount) -> Result<Self> {
        Self::new_unchecked(size, mines).validate()
    }

    /// Applies the limits of the settings inputs: at least a 3x3 board, and always one safe tile.
    pub fn clamped(size: Coord, mines: CellCount) -> Self {
        let size = size.max(Self::MIN_SIZE);
        let mines = mines.min(mult(size, size) - 1);
        Self::new_unchecked(size, mines)
    }

    pub fn validate(self) -> Result<Self> {
        if self.size == 0 || self.mines >= self.total_tiles() {
            return Err(BoardError::InvalidConfiguration);
        }
        Ok(self)
    }

    pub const fn total_tiles(&self) -> CellCount {
        mult(self.size, self.size)
    }

    pub const fn safe_tiles(&self) -> CellCount {
        self.total_tiles().saturating_sub(self.mines)
    }
}

/// Where the mines are, before any tile state exists.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MineLayout {
    mine_mask: Array2<bool>,
    mine_count: CellCount,
}

impl MineLayout {
    pub(crate) fn from_mine_mask(mine_mask: Array2<bool>) -> Self {
        let mine_count = mine_mask
            .iter()
            .filter(|&&is_mine| is_mine)
            .count()
            .try_into()
            .unwrap_or(CellCount::MAX);
        Self {
            mine_mask,
            mine_count,
        }
    }

    /// Builds a layout with mines at exactly the given positions, duplicates counted once.
    pub fn from_mine_coords(size: Coord, mine_coords: &[Coord2]) -> Result<Self> {
        let side = usize::from(size);
        let mut mine_mask: Array2<bool> = Array2::default((side, side));

        for &coords in mine_coords {
            if !in_bounds(coords, (size, size)) {
                return Err(BoardError::OutOfRange);
            }
            mine_mask[coords.to_nd_index()] = true;
        }

        let layout = Self::from_mine_mask(mine_mask);
        layout.config().validate()?;
        Ok(layout)
    }

    pub fn config(&self) -> BoardConfig {
        BoardConfig::new_unchecked(self.size(), self.mine_count)
    }

    pub fn size(&self) -> Coord {
        self.mine_mask.bounds().0
    }

    pub fn mine_count(&self) -> CellCount {
        self.mine_count
    }

    pub fn contains_mine(&self, coords: Coord2) -> bool {
        self[coords]
    }

    pub fn adjacent_mine_count(&self, coords: Coord2) -> u8 {
        let count = self
            .mine_mask
            .iter_neighbors(coords)
            .filter(|&pos| self[pos])
            .count();
        // at most 8 neighbors
        count as u8
    }

    pub fn mine_coords(&self) -> Vec<Coord2> {
        self.mine_mask
            .indexed_iter()
            .filter(|&(_, &is_mine)| is_mine)
            .map(|((y, x), _)| (x as Coord, y as Coord))
            .collect()
    }
}

impl Index<Coord2> for MineLayout {
    type Output = bool;

    fn index(&self, coords: Coord2) -> &Self::Output {
        &self.mine_mask[coords.to_nd_index()]
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MarkOutcome {
    NoChange,
    Changed,
}

impl MarkOutcome {
    pub const fn has_update(self) -> bool {
        match self {
            Self::NoChange => false,
            Self::Changed => true,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RevealOutcome {
    NoChange,
    Revealed,
    HitMine,
    Won,
}

impl RevealOutcome {
    pub const fn has_update(self) -> bool {
        use RevealOutcome::*;
        match self {
            NoChange => false,
            Revealed => true,
            HitMine => true,
            Won => true,
        }
    }
}
