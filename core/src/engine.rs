use alloc::collections::{BTreeSet, VecDeque};
use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    InProgress,
    Won,
    Lost,
}

impl Status {
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

impl Default for Status {
    fn default() -> Self {
        Self::InProgress
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Move {
    Reveal(Position),
    ToggleFlag(Position),
}

impl Move {
    pub const fn position(self) -> Position {
        match self {
            Self::Reveal(pos) | Self::ToggleFlag(pos) => pos,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MoveOutcome {
    Flagged,
    Unflagged,
    /// Safe reveal, `cells` counts every cell the move opened including the cascade.
    Revealed { cells: CellCount },
    HitMine,
    Won,
}

impl MoveOutcome {
    pub const fn is_final(self) -> bool {
        matches!(self, Self::HitMine | Self::Won)
    }
}

/// Counters and status of a game, updated after every move.
///
/// Valid transitions:
/// - InProgress -> Won
/// - InProgress -> Lost
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    mine_count: CellCount,
    flag_count: CellCount,
    correctly_flagged_count: CellCount,
    status: Status,
    triggered_mine: Option<Position>,
}

impl GameState {
    pub fn new(reference: &ReferenceGrid) -> Self {
        Self {
            mine_count: reference.mine_count(),
            flag_count: 0,
            correctly_flagged_count: 0,
            status: Status::InProgress,
            triggered_mine: None,
        }
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn is_finished(&self) -> bool {
        self.status.is_finished()
    }

    pub fn mine_count(&self) -> CellCount {
        self.mine_count
    }

    pub fn flag_count(&self) -> CellCount {
        self.flag_count
    }

    pub fn correctly_flagged_count(&self) -> CellCount {
        self.correctly_flagged_count
    }

    /// Mines minus flags, negative once more flags than mines are placed.
    pub fn mines_left(&self) -> i64 {
        i64::from(self.mine_count) - i64::from(self.flag_count)
    }

    pub fn triggered_mine(&self) -> Option<Position> {
        self.triggered_mine
    }

    /// Flagged set equals mine set: no stray flag and no unflagged mine.
    ///
    /// Every flag on a mine is counted in `correctly_flagged_count`, so equal
    /// counters on both sides imply equal sets.
    pub fn flags_match_mines(&self) -> bool {
        self.flag_count == self.mine_count && self.correctly_flagged_count == self.mine_count
    }

    fn check_in_progress(&self) -> Result<()> {
        if self.status.is_finished() {
            Err(GameError::GameAlreadyOver)
        } else {
            Ok(())
        }
    }

    fn end_game(&mut self, status: Status) {
        if self.status.is_finished() {
            return;
        }
        log::debug!("Game ended: {:?}", status);
        self.status = status;
    }
}

/// Applies one move, including any cascade, before returning.
///
/// Flagging or revealing an already revealed cell, and revealing a flagged
/// cell, are rejected with [`GameError::InvalidMoveOnCell`]. The win condition
/// is checked after every reveal and every placed flag; removing a flag never
/// ends the game.
pub fn apply_move(
    mv: Move,
    reference: &ReferenceGrid,
    player: &mut PlayerGrid,
    state: &mut GameState,
) -> Result<MoveOutcome> {
    if player.size() != reference.size() || state.mine_count() != reference.mine_count() {
        return Err(GameError::InvalidBoardShape);
    }
    let pos = reference.validate_pos(mv.position())?;
    state.check_in_progress()?;

    let outcome = match mv {
        Move::ToggleFlag(_) => toggle_flag(pos, reference, player, state)?,
        Move::Reveal(_) => reveal(pos, reference, player, state)?,
    };
    if outcome.is_final() || outcome == MoveOutcome::Unflagged {
        return Ok(outcome);
    }

    if state.flags_match_mines() {
        state.end_game(Status::Won);
        Ok(MoveOutcome::Won)
    } else {
        Ok(outcome)
    }
}

fn toggle_flag(
    pos: Position,
    reference: &ReferenceGrid,
    player: &mut PlayerGrid,
    state: &mut GameState,
) -> Result<MoveOutcome> {
    let on_mine = CellCount::from(reference[pos].is_mine());

    match player[pos] {
        CellView::Hidden => {
            player.set(pos, CellView::Flagged);
            state.flag_count += 1;
            state.correctly_flagged_count += on_mine;
            Ok(MoveOutcome::Flagged)
        }
        CellView::Flagged => {
            player.set(pos, CellView::Hidden);
            state.flag_count -= 1;
            state.correctly_flagged_count -= on_mine;
            Ok(MoveOutcome::Unflagged)
        }
        CellView::Revealed(_) | CellView::Exploded => Err(GameError::InvalidMoveOnCell(pos)),
    }
}

fn reveal(
    pos: Position,
    reference: &ReferenceGrid,
    player: &mut PlayerGrid,
    state: &mut GameState,
) -> Result<MoveOutcome> {
    if player[pos] != CellView::Hidden {
        return Err(GameError::InvalidMoveOnCell(pos));
    }

    match reference[pos] {
        Cell::Mine => {
            player.set(pos, CellView::Exploded);
            state.triggered_mine = Some(pos);
            state.end_game(Status::Lost);
            Ok(MoveOutcome::HitMine)
        }
        Cell::Count(count) => {
            player.set(pos, CellView::Revealed(count));
            let mut cells = 1;
            if count == 0 {
                cells += flood_reveal(pos, reference, player);
            }
            Ok(MoveOutcome::Revealed { cells })
        }
    }
}

/// Opens every zero cell connected to `origin` and the numbered ring bordering
/// them, returning how many cells were newly revealed.
///
/// Expansion only continues from zero cells. Flagged and already revealed cells
/// are left untouched and not expanded through.
fn flood_reveal(origin: Position, reference: &ReferenceGrid, player: &mut PlayerGrid) -> CellCount {
    let mut visited = BTreeSet::from([origin]);
    let mut to_visit = VecDeque::from([origin]);
    let mut revealed = 0;

    while let Some(zero_pos) = to_visit.pop_front() {
        for neighbor in reference.iter_neighbors(zero_pos) {
            if !visited.insert(neighbor) {
                continue;
            }
            if player[neighbor] != CellView::Hidden {
                continue;
            }
            // neighbours of a zero cell are never mines
            let Cell::Count(count) = reference[neighbor] else {
                continue;
            };

            player.set(neighbor, CellView::Revealed(count));
            revealed += 1;
            if count == 0 {
                to_visit.push_back(neighbor);
            }
        }
    }

    log::trace!("Cascade from {:?} revealed {} cells", origin, revealed);
    revealed
}

/// One game session: the reference grid, the player grid, and the game state.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Game {
    reference: ReferenceGrid,
    player: PlayerGrid,
    state: GameState,
}

impl Game {
    pub fn new(reference: ReferenceGrid) -> Self {
        Self {
            player: PlayerGrid::for_reference(&reference),
            state: GameState::new(&reference),
            reference,
        }
    }

    pub fn generate(config: GameConfig, generator: impl BoardGenerator) -> Result<Self> {
        config.validate()?;
        Ok(Self::new(generator.generate(config)?))
    }

    /// Reassembles a session, checking both grids share one shape.
    pub fn from_parts(reference: ReferenceGrid, player: PlayerGrid, state: GameState) -> Result<Self> {
        if reference.size() != player.size() || reference.mine_count() != state.mine_count() {
            return Err(GameError::InvalidBoardShape);
        }
        Ok(Self {
            reference,
            player,
            state,
        })
    }

    pub fn into_parts(self) -> (ReferenceGrid, PlayerGrid, GameState) {
        (self.reference, self.player, self.state)
    }

    pub fn apply(&mut self, mv: Move) -> Result<MoveOutcome> {
        apply_move(mv, &self.reference, &mut self.player, &mut self.state)
    }

    pub fn reveal(&mut self, pos: Position) -> Result<MoveOutcome> {
        self.apply(Move::Reveal(pos))
    }

    pub fn toggle_flag(&mut self, pos: Position) -> Result<MoveOutcome> {
        self.apply(Move::ToggleFlag(pos))
    }

    pub fn reference(&self) -> &ReferenceGrid {
        &self.reference
    }

    pub fn player(&self) -> &PlayerGrid {
        &self.player
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn status(&self) -> Status {
        self.state.status()
    }

    pub fn size(&self) -> Position {
        self.reference.size()
    }

    pub fn cell_at(&self, pos: Position) -> Result<CellView> {
        self.player.get(pos)
    }

    /// Player view, plus mines and wrong flags once the game is lost.
    pub fn display_cell(&self, pos: Position) -> Result<DisplayCell> {
        let cell = self.player.get(pos)?;
        if self.status() != Status::Lost {
            return Ok(cell.into());
        }

        Ok(match (cell, self.reference[pos]) {
            (CellView::Hidden, Cell::Mine) => DisplayCell::Mine,
            (CellView::Flagged, Cell::Count(_)) => DisplayCell::IncorrectFlag,
            (cell, _) => cell.into(),
        })
    }
}
