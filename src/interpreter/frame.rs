use super::error::Failure;
use crate::block::{Block, BlockId, Branch};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Iterations {
    /// Iterations still to run after the current one.
    Remaining(u32),
    Forever,
}

impl Iterations {
    pub fn of_repeat(block: &Block) -> Self {
        Iterations::Remaining(block.repeat_count() - 1)
    }

    pub fn next(self) -> Option<Self> {
        match self {
            Iterations::Remaining(0) => None,
            Iterations::Remaining(n) => Some(Iterations::Remaining(n - 1)),
            Iterations::Forever => Some(Iterations::Forever),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    Program,
    Branch,
    Loop(Iterations),
}

/// A body being walked: the block owning it, which of its branches, and how far along we are.
#[derive(Debug, Clone)]
pub struct Frame {
    pub owner: BlockId,
    pub branch: Branch,
    pub cursor: usize,
    pub scope: Scope,
}

impl Frame {
    pub fn program(root: BlockId) -> Self {
        Self {
            owner: root,
            branch: Branch::Then,
            cursor: 0,
            scope: Scope::Program,
        }
    }

    pub fn branch(owner: BlockId, branch: Branch) -> Self {
        Self {
            owner,
            branch,
            cursor: 0,
            scope: Scope::Branch,
        }
    }

    pub fn looping(owner: BlockId, iterations: Iterations) -> Self {
        Self {
            owner,
            branch: Branch::Then,
            cursor: 0,
            scope: Scope::Loop(iterations),
        }
    }

    pub fn is_loop(&self) -> bool {
        matches!(self.scope, Scope::Loop(_))
    }
}

/// What executing a single block asks of the frame stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    Continue,
    BreakLoop,
    ContinueLoop,
    Abort(Failure),
}

/// What the frame stack hands out next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Next {
    Block(BlockId),
    /// A loop with an empty body finished an iteration.
    IterationBoundary,
    Done,
}
