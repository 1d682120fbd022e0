#![no_std]

extern crate alloc;

use alloc::vec::Vec;
use core::ops::Index;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

pub use engine::*;
pub use error::*;
pub use generator::*;
pub use player::*;
pub use tile::*;
pub use types::*;

mod engine;
mod error;
mod generator;
mod player;
mod tile;
mod types;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    /// `(rows, cols)`
    pub size: Position,
    pub mines: CellCount,
}

impl GameConfig {
    pub const fn new_unchecked(size: Position, mines: CellCount) -> Self {
        Self { size, mines }
    }

    /// Checks that the board has at least one cell per axis and room for every mine.
    pub fn new(size: Position, mines: CellCount) -> Result<Self> {
        let config = Self::new_unchecked(size, mines);
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let (rows, cols) = self.size;
        if rows == 0 || cols == 0 || self.mines > self.total_cells() {
            log::warn!(
                "Rejected configuration: {}x{} board with {} mines",
                rows,
                cols,
                self.mines
            );
            return Err(GameError::InvalidConfiguration {
                size: self.size,
                mines: self.mines,
            });
        }
        Ok(())
    }

    pub const fn total_cells(&self) -> CellCount {
        mult(self.size.0, self.size.1)
    }

    pub const fn safe_cells(&self) -> CellCount {
        self.total_cells().saturating_sub(self.mines)
    }
}

/// Hidden ground truth of a game: mine locations and adjacency counts.
///
/// Never mutated after construction.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReferenceGrid {
    cells: Array2<Cell>,
    mine_count: CellCount,
}

impl ReferenceGrid {
    /// Builds the grid from a mask where `true` marks a mine, computing every count.
    pub fn from_mine_mask(mine_mask: &Array2<bool>) -> Result<Self> {
        let (rows, cols) = mine_mask.dim();
        if rows == 0 || cols == 0 || rows > usize::from(Coord::MAX) || cols > usize::from(Coord::MAX) {
            return Err(GameError::InvalidBoardShape);
        }

        let cells = Array2::from_shape_fn((rows, cols), |(row, col)| {
            if mine_mask[[row, col]] {
                Cell::Mine
            } else {
                let count = mine_mask
                    .iter_neighbors((row as Coord, col as Coord))
                    .filter(|&pos| mine_mask[pos.to_nd_index()])
                    .count();
                Cell::Count(count as u8)
            }
        });
        let mine_count = cells.iter().filter(|cell| cell.is_mine()).count() as CellCount;

        Ok(Self { cells, mine_count })
    }

    pub fn from_mine_positions(size: Position, mine_positions: &[Position]) -> Result<Self> {
        if size.0 == 0 || size.1 == 0 {
            return Err(GameError::InvalidConfiguration { size, mines: 0 });
        }

        let mut mine_mask: Array2<bool> = Array2::default(size.to_nd_index());
        for &pos in mine_positions {
            if !in_bounds(pos, size) {
                return Err(GameError::OutOfBounds(pos));
            }
            mine_mask[pos.to_nd_index()] = true;
        }

        Self::from_mine_mask(&mine_mask)
    }

    pub fn game_config(&self) -> GameConfig {
        GameConfig::new_unchecked(self.size(), self.mine_count)
    }

    pub fn validate_pos(&self, pos: Position) -> Result<Position> {
        if in_bounds(pos, self.size()) {
            Ok(pos)
        } else {
            Err(GameError::OutOfBounds(pos))
        }
    }

    /// `(rows, cols)`
    pub fn size(&self) -> Position {
        grid_size(&self.cells)
    }

    pub fn mine_count(&self) -> CellCount {
        self.mine_count
    }

    pub fn total_cells(&self) -> CellCount {
        self.cells.len() as CellCount
    }

    pub fn safe_cell_count(&self) -> CellCount {
        self.total_cells() - self.mine_count
    }

    pub fn cell(&self, pos: Position) -> Result<Cell> {
        let pos = self.validate_pos(pos)?;
        Ok(self[pos])
    }

    pub fn is_mine(&self, pos: Position) -> bool {
        in_bounds(pos, self.size()) && self[pos].is_mine()
    }

    /// Mine positions in row-major order.
    pub fn mine_positions(&self) -> Vec<Position> {
        self.cells
            .indexed_iter()
            .filter(|(_, cell)| cell.is_mine())
            .map(|((row, col), _)| (row as Coord, col as Coord))
            .collect()
    }

    pub fn iter_neighbors(&self, pos: Position) -> NeighborIter {
        self.cells.iter_neighbors(pos)
    }
}

impl Index<Position> for ReferenceGrid {
    type Output = Cell;

    fn index(&self, pos: Position) -> &Self::Output {
        &self.cells[pos.to_nd_index()]
    }
}
