use super::{BlockId, BlockTree, Branch};
use std::collections::HashMap;

/// Where a block sits inside of its parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slot {
    pub parent: BlockId,
    pub branch: Branch,
    pub position: usize,
}

/// Reverse lookup from a block to its parent.
///
/// Built from a snapshot of the tree and not kept up to date with later edits.
#[derive(Debug, Clone, Default)]
pub struct ParentIndex {
    slots: HashMap<BlockId, Slot>,
}

impl ParentIndex {
    pub fn build(tree: &BlockTree) -> Self {
        let mut slots = HashMap::new();
        let mut pending = vec![tree.root()];
        while let Some(parent) = pending.pop() {
            for branch in [Branch::Then, Branch::Else] {
                for (position, &child) in tree.body(parent, branch).iter().enumerate() {
                    slots.insert(
                        child,
                        Slot {
                            parent,
                            branch,
                            position,
                        },
                    );
                    pending.push(child);
                }
            }
        }
        Self { slots }
    }

    pub fn slot(&self, block: BlockId) -> Option<Slot> {
        self.slots.get(&block).copied()
    }

    pub fn parent(&self, block: BlockId) -> Option<BlockId> {
        self.slot(block).map(|slot| slot.parent)
    }

    /// The chain of parents from `block` up to and including the root.
    pub fn ancestors(&self, block: BlockId) -> Vec<BlockId> {
        let mut chain = Vec::new();
        let mut current = block;
        while let Some(parent) = self.parent(current) {
            chain.push(parent);
            current = parent;
        }
        chain
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}
