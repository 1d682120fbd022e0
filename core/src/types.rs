use ndarray::Array2;

/// Single coordinate axis used for board height, width, and positions.
pub type Coord = u16;

/// Count type used for mine counts and total-cell counts.
pub type CellCount = u32;

/// Two-dimensional position `(row, col)`, 0-indexed.
pub type Position = (Coord, Coord);

pub trait ToNdIndex {
    type Output;
    fn to_nd_index(self) -> Self::Output;
}

impl ToNdIndex for Position {
    type Output = [usize; 2];

    fn to_nd_index(self) -> Self::Output {
        [self.0.into(), self.1.into()]
    }
}

pub const fn mult(a: Coord, b: Coord) -> CellCount {
    let a = a as CellCount;
    let b = b as CellCount;
    a.saturating_mul(b)
}

/// Whether `pos` lies inside a board of `size` rows and columns.
pub const fn in_bounds(pos: Position, size: Position) -> bool {
    pos.0 < size.0 && pos.1 < size.1
}

pub fn grid_size<T>(array: &Array2<T>) -> Position {
    let (rows, cols) = array.dim();
    // grids are only ever allocated from `Coord` sized dimensions
    (rows as Coord, cols as Coord)
}

pub trait NeighborIterExt {
    fn iter_neighbors(&self, pos: Position) -> NeighborIter;
}

impl<T> NeighborIterExt for Array2<T> {
    fn iter_neighbors(&self, pos: Position) -> NeighborIter {
        NeighborIter::new(pos, grid_size(self))
    }
}

const DISPLACEMENTS: [(i16, i16); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// Applies `delta` to `pos`, returning a value only when it remains in bounds.
fn apply_delta(pos: Position, delta: (i16, i16), bounds: Position) -> Option<Position> {
    let (row, col) = pos;
    let (d_row, d_col) = delta;

    let next = (row.checked_add_signed(d_row)?, col.checked_add_signed(d_col)?);
    in_bounds(next, bounds).then_some(next)
}

/// Iterates over the in-bounds Moore neighbourhood of a cell, no wraparound.
#[derive(Debug)]
pub struct NeighborIter {
    center: Position,
    bounds: Position,
    index: u8,
}

impl NeighborIter {
    pub fn new(center: Position, bounds: Position) -> Self {
        Self {
            center,
            bounds,
            index: 0,
        }
    }
}

impl Iterator for NeighborIter {
    type Item = Position;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if usize::from(self.index) >= DISPLACEMENTS.len() {
                return None;
            }

            let next_item =
                apply_delta(self.center, DISPLACEMENTS[self.index as usize], self.bounds);
            self.index += 1;

            if next_item.is_some() {
                return next_item;
            }
        }
    }
}
