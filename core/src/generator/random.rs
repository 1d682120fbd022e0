use alloc::vec::Vec;
use core::iter;
use ndarray::Array2;
use rand::{Rng, SeedableRng, rngs::SmallRng, seq::SliceRandom};

use super::*;

/// Places `mine_count` mines uniformly at random on a `rows x cols` board and
/// computes every adjacency count.
///
/// Layouts are reproducible only when `rng` was seeded explicitly by the caller.
pub fn generate<R: Rng + ?Sized>(
    rows: Coord,
    cols: Coord,
    mine_count: CellCount,
    rng: &mut R,
) -> Result<ReferenceGrid> {
    let config = GameConfig::new((rows, cols), mine_count)?;
    let total_cells = config.total_cells() as usize;
    let mines = config.mines as usize;

    // shuffling a flat marker array gives every placement the same probability
    let mut markers: Vec<bool> = iter::repeat_n(true, mines)
        .chain(iter::repeat_n(false, total_cells - mines))
        .collect();
    markers.shuffle(rng);

    let mine_mask = Array2::from_shape_vec((usize::from(rows), usize::from(cols)), markers)
        .map_err(|_| GameError::InvalidBoardShape)?;
    let grid = ReferenceGrid::from_mine_mask(&mine_mask)?;

    log::debug!(
        "Generated {}x{} board with {} mines",
        rows,
        cols,
        grid.mine_count()
    );
    Ok(grid)
}

/// Purely random generation strategy, fully determined by its seed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RandomBoardGenerator {
    seed: u64,
}

impl RandomBoardGenerator {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Picks a fresh seed so every call yields an independent layout.
    #[cfg(feature = "thread_rng")]
    pub fn from_entropy() -> Self {
        Self::new(rand::random())
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl BoardGenerator for RandomBoardGenerator {
    fn generate(self, config: GameConfig) -> Result<ReferenceGrid> {
        log::debug!("Generating with seed {}", self.seed);
        let mut rng = SmallRng::seed_from_u64(self.seed);
        generate(config.size.0, config.size.1, config.mines, &mut rng)
    }
}
