use super::Position;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WorldError {
    #[error("The grid has no cells.")]
    Empty,
    #[error("Row {row} has {actual} cells but the grid is {expected} cells wide.")]
    Ragged {
        row: usize,
        expected: usize,
        actual: usize,
    },
    #[error("Cell {position} has the invalid code {code}.")]
    InvalidCell { position: Position, code: u8 },
    #[error("The start {0} lies outside of the grid.")]
    StartOutOfBounds(Position),
    #[error("The goal {0} lies outside of the grid.")]
    GoalOutOfBounds(Position),
}
