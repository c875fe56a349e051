pub mod context;
pub mod error;
pub mod formatter;
mod frame;
mod machine;
mod runner;

use crate::block::{BlockId, BlockKind};
use crate::world::{Direction, Position};
use error::{Failure, InterpreterError};
pub use machine::{BlockInterpreter, Character};
pub use runner::{RunConfig, StopHandle};
use std::fmt::Display;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgramState {
    Run,
    Finished(RunOutcome),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    Success { position: Position },
    Failure(Failure),
    Cancelled(CancelReason),
}

impl RunOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, RunOutcome::Success { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelReason {
    Stopped,
    StepLimit(u64),
}

impl Display for CancelReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CancelReason::Stopped => write!(f, "stopped"),
            CancelReason::StepLimit(limit) => write!(f, "step limit of {limit} reached"),
        }
    }
}

/// Everything a host can observe about a run, in the order it happens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    Started,
    Executing { block: BlockId, kind: BlockKind },
    Moved { from: Position, to: Position },
    Turned { from: Direction, to: Direction },
    Succeeded { position: Position },
    Failed(Failure),
    Cancelled(CancelReason),
    Reset,
}

impl Display for GameEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GameEvent::Started => write!(f, "start"),
            GameEvent::Executing { block, kind } => write!(f, "exec {block} {kind}"),
            GameEvent::Moved { from, to } => write!(f, "move {from} -> {to}"),
            GameEvent::Turned { from, to } => write!(f, "turn {from} -> {to}"),
            GameEvent::Succeeded { position } => write!(f, "success {position}"),
            GameEvent::Failed(failure) => write!(f, "failure {failure}"),
            GameEvent::Cancelled(reason) => write!(f, "cancelled {reason}"),
            GameEvent::Reset => write!(f, "reset"),
        }
    }
}

/// The host side of a run.
pub trait GameContext {
    fn notify(&mut self, event: GameEvent);
    /// Called between steps to pace the run.
    fn pause(&mut self, delay: Duration);
}

pub trait Interpreter<C> {
    fn step(&mut self, context: &mut C) -> Result<ProgramState, InterpreterError>;
}
