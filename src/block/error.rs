use super::{BlockId, BlockKind, Branch};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TreeError {
    #[error("Block {0} does not exist in this tree.")]
    UnknownBlock(BlockId),
    #[error("Block {0} already has a parent.")]
    AlreadyAttached(BlockId),
    #[error("Block {0} has no parent.")]
    Detached(BlockId),
    #[error("A {0} block can only be the root of a program.")]
    NestedStart(BlockKind),
    #[error("A {kind} block has no {branch} branch.")]
    NoSuchBranch { kind: BlockKind, branch: Branch },
    #[error("Block {0} can not be placed inside of itself.")]
    Cycle(BlockId),
    #[error("Index {index} is past the end of a branch with {length} blocks.")]
    IndexOutOfRange { index: usize, length: usize },
}
