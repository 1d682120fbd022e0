use thiserror::Error;

use crate::{CellCount, Position};

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid configuration: a {}x{} board cannot hold {mines} mines", .size.0, .size.1)]
    InvalidConfiguration { size: Position, mines: CellCount },
    #[error("Position {0:?} is outside the board")]
    OutOfBounds(Position),
    #[error("Move not allowed on the cell at {0:?} in its current state")]
    InvalidMoveOnCell(Position),
    #[error("Game already ended, no new moves are accepted")]
    GameAlreadyOver,
    #[error("Board shape does not match declared size")]
    InvalidBoardShape,
}

pub type Result<T> = core::result::Result<T, GameError>;
