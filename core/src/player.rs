use alloc::vec::Vec;
use core::fmt;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// Player-visible board, index-aligned with the [`ReferenceGrid`] it was made for.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlayerGrid {
    cells: Array2<CellView>,
}

impl PlayerGrid {
    /// All-hidden grid with `size` rows and columns.
    pub fn new(size: Position) -> Self {
        Self {
            cells: Array2::default(size.to_nd_index()),
        }
    }

    pub fn for_reference(reference: &ReferenceGrid) -> Self {
        Self::new(reference.size())
    }

    pub fn size(&self) -> Position {
        grid_size(&self.cells)
    }

    pub fn get(&self, pos: Position) -> Result<CellView> {
        if in_bounds(pos, self.size()) {
            Ok(self.cells[pos.to_nd_index()])
        } else {
            Err(GameError::OutOfBounds(pos))
        }
    }

    /// Cells with their positions in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (Position, CellView)> + '_ {
        self.cells
            .indexed_iter()
            .map(|((row, col), &cell)| ((row as Coord, col as Coord), cell))
    }

    pub fn flagged_positions(&self) -> Vec<Position> {
        self.iter()
            .filter(|&(_, cell)| cell == CellView::Flagged)
            .map(|(pos, _)| pos)
            .collect()
    }

    pub fn revealed_count(&self) -> CellCount {
        self.cells
            .iter()
            .filter(|cell| matches!(cell, CellView::Revealed(_)))
            .count() as CellCount
    }

    pub(crate) fn set(&mut self, pos: Position, cell: CellView) {
        self.cells[pos.to_nd_index()] = cell;
    }
}

impl core::ops::Index<Position> for PlayerGrid {
    type Output = CellView;

    fn index(&self, pos: Position) -> &Self::Output {
        &self.cells[pos.to_nd_index()]
    }
}

/// Text table with column indices on top and row indices on the left.
impl fmt::Display for PlayerGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (rows, cols) = self.size();
        let row_width = digits(rows.saturating_sub(1));
        let col_width = digits(cols.saturating_sub(1));

        write!(f, "{:row_width$}", "")?;
        for col in 0..cols {
            write!(f, " {col:>col_width$}")?;
        }
        writeln!(f)?;

        for (row, cells) in self.cells.rows().into_iter().enumerate() {
            write!(f, "{row:>row_width$}")?;
            for cell in cells {
                write!(f, " {:>col_width$}", cell.glyph())?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

fn digits(mut value: Coord) -> usize {
    let mut count = 1;
    while value >= 10 {
        value /= 10;
        count += 1;
    }
    count
}
