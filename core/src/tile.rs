use serde::{Deserialize, Serialize};

/// Ground truth for a single cell of the reference grid.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cell {
    Mine,
    /// Number of mines among the in-bounds Moore neighbours, always in `0..=8`.
    Count(u8),
}

impl Cell {
    pub const fn is_mine(self) -> bool {
        matches!(self, Self::Mine)
    }
}

/// Player-visible state of a single cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellView {
    Hidden,
    Flagged,
    Revealed(u8),
    Exploded,
}

impl CellView {
    /// Glyph used by the text rendering of the player grid.
    pub const fn glyph(self) -> char {
        match self {
            Self::Hidden => '-',
            Self::Flagged => 'F',
            Self::Exploded => '*',
            Self::Revealed(count) => (b'0' + count) as char,
        }
    }
}

impl Default for CellView {
    fn default() -> Self {
        Self::Hidden
    }
}

/// What a renderer should draw for a cell, including the end-of-game reveal of
/// mines and wrongly placed flags.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DisplayCell {
    Hidden,
    Flagged,
    Revealed(u8),
    Exploded,
    Mine,
    IncorrectFlag,
}

impl From<CellView> for DisplayCell {
    fn from(other: CellView) -> Self {
        match other {
            CellView::Hidden => DisplayCell::Hidden,
            CellView::Flagged => DisplayCell::Flagged,
            CellView::Revealed(count) => DisplayCell::Revealed(count),
            CellView::Exploded => DisplayCell::Exploded,
        }
    }
}
