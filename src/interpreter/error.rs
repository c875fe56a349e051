use crate::block::BlockId;
use crate::world::{Direction, Position};
use thiserror::Error;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    #[error("Walked off the grid from {from} facing {direction}")]
    OutOfBounds { from: Position, direction: Direction },
    #[error("Walked into the wall at {at}")]
    Blocked { at: Position },
    #[error("Program ended at {position} instead of the goal {goal}")]
    GoalNotReached { position: Position, goal: Position },
}

/// Why a run ended without reaching the goal.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("{kind}")]
pub struct Failure {
    pub kind: FailureKind,
    /// The block that was executing, if the failure was caused by one.
    pub block: Option<BlockId>,
}

impl Failure {
    pub fn code(&self) -> &'static str {
        match self.kind {
            FailureKind::OutOfBounds { .. } => "RN001",
            FailureKind::Blocked { .. } => "RN002",
            FailureKind::GoalNotReached { .. } => "RN003",
        }
    }
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum InterpreterError {
    #[error("A run is already in progress.")]
    AlreadyRunning,
    #[error("No run is in progress.")]
    NotRunning,
}
