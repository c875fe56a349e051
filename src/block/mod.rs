pub mod error;
pub mod formatter;
mod index;

use compact_str::CompactString;
use error::TreeError;
pub use index::{ParentIndex, Slot};
use std::fmt::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockKind {
    Start,
    MoveForward,
    TurnLeft,
    TurnRight,
    Attack,
    RepeatCount,
    RepeatForever,
    If,
    IfElse,
    BreakLoop,
    ContinueLoop,
}

impl BlockKind {
    pub const ALL: [BlockKind; 11] = [
        BlockKind::Start,
        BlockKind::MoveForward,
        BlockKind::TurnLeft,
        BlockKind::TurnRight,
        BlockKind::Attack,
        BlockKind::RepeatCount,
        BlockKind::RepeatForever,
        BlockKind::If,
        BlockKind::IfElse,
        BlockKind::BreakLoop,
        BlockKind::ContinueLoop,
    ];

    /// Containers own at least one nested body.
    pub const fn is_container(self) -> bool {
        matches!(
            self,
            BlockKind::RepeatCount | BlockKind::RepeatForever | BlockKind::If | BlockKind::IfElse
        )
    }

    pub const fn is_loop(self) -> bool {
        matches!(self, BlockKind::RepeatCount | BlockKind::RepeatForever)
    }

    pub const fn has_branch(self, branch: Branch) -> bool {
        match branch {
            Branch::Then => self.is_container() || matches!(self, BlockKind::Start),
            Branch::Else => matches!(self, BlockKind::IfElse),
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            BlockKind::Start => "start",
            BlockKind::MoveForward => "moveForward",
            BlockKind::TurnLeft => "turnLeft",
            BlockKind::TurnRight => "turnRight",
            BlockKind::Attack => "attack",
            BlockKind::RepeatCount => "repeatCount",
            BlockKind::RepeatForever => "repeatForever",
            BlockKind::If => "if",
            BlockKind::IfElse => "ifElse",
            BlockKind::BreakLoop => "breakLoop",
            BlockKind::ContinueLoop => "continueLoop",
        }
    }
}

impl Display for BlockKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Condition {
    FrontIsClear,
    FrontIsBlocked,
    AtFlag,
    #[default]
    Always,
}

impl Condition {
    pub const ALL: [Condition; 4] = [
        Condition::FrontIsClear,
        Condition::FrontIsBlocked,
        Condition::AtFlag,
        Condition::Always,
    ];

    /// The spelling used by level files.
    pub const fn keyword(self) -> &'static str {
        match self {
            Condition::FrontIsClear => "front_clear",
            Condition::FrontIsBlocked => "front_blocked",
            Condition::AtFlag => "at_flag",
            Condition::Always => "always",
        }
    }

    pub fn from_keyword(keyword: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.keyword() == keyword)
    }
}

impl Display for Condition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Condition::FrontIsClear => "frontIsClear",
            Condition::FrontIsBlocked => "frontIsBlocked",
            Condition::AtFlag => "atFlag",
            Condition::Always => "always",
        };
        write!(f, "{name}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlockId(u32);

impl BlockId {
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl Display for BlockId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Branch {
    Then,
    Else,
}

impl Display for Branch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Branch::Then => write!(f, "then"),
            Branch::Else => write!(f, "else"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    kind: BlockKind,
    value: Option<CompactString>,
    condition: Condition,
    children: Vec<BlockId>,
    else_children: Vec<BlockId>,
}

impl Block {
    pub fn new(kind: BlockKind) -> Self {
        Self {
            kind,
            value: None,
            condition: Condition::default(),
            children: Vec::new(),
            else_children: Vec::new(),
        }
    }

    pub fn with_value(mut self, value: impl Into<CompactString>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn with_condition(mut self, condition: Condition) -> Self {
        self.condition = condition;
        self
    }

    pub fn with_children(mut self, children: Vec<BlockId>) -> Self {
        self.children = children;
        self
    }

    pub fn with_else_children(mut self, else_children: Vec<BlockId>) -> Self {
        self.else_children = else_children;
        self
    }

    pub fn kind(&self) -> BlockKind {
        self.kind
    }

    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    pub fn condition(&self) -> Condition {
        self.condition
    }

    pub fn children(&self) -> &[BlockId] {
        &self.children
    }

    pub fn else_children(&self) -> &[BlockId] {
        &self.else_children
    }

    pub fn body(&self, branch: Branch) -> &[BlockId] {
        match branch {
            Branch::Then => &self.children,
            Branch::Else => &self.else_children,
        }
    }

    /// The number of iterations a `repeatCount` block runs for.
    ///
    /// Anything that is not a positive integer counts as a single iteration.
    pub fn repeat_count(&self) -> u32 {
        self.value
            .as_deref()
            .and_then(|value| value.trim().parse::<u32>().ok())
            .filter(|&count| count >= 1)
            .unwrap_or(1)
    }

    fn body_mut(&mut self, branch: Branch) -> &mut Vec<BlockId> {
        match branch {
            Branch::Then => &mut self.children,
            Branch::Else => &mut self.else_children,
        }
    }
}

/// An arena of blocks rooted at a single `start` block.
///
/// Blocks refer to their children by id. Detached blocks stay in the arena and
/// can be attached again later.
#[derive(Debug, Clone)]
pub struct BlockTree {
    blocks: Vec<Block>,
    attached: Vec<bool>,
}

impl BlockTree {
    const ROOT: BlockId = BlockId(0);

    pub fn new() -> Self {
        Self {
            blocks: vec![Block::new(BlockKind::Start)],
            attached: vec![true],
        }
    }

    pub fn root(&self) -> BlockId {
        Self::ROOT
    }

    /// Every block in the arena, including detached ones.
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.len() == 1
    }

    pub fn get(&self, id: BlockId) -> Option<&Block> {
        self.blocks.get(id.index())
    }

    pub fn contains(&self, id: BlockId) -> bool {
        id.index() < self.blocks.len()
    }

    pub fn is_attached(&self, id: BlockId) -> bool {
        self.attached.get(id.index()).copied().unwrap_or(false)
    }

    /// The ordered blocks of one branch of `owner`. Unknown blocks have empty bodies.
    pub fn body(&self, owner: BlockId, branch: Branch) -> &[BlockId] {
        match self.get(owner) {
            Some(block) => block.body(branch),
            None => &[],
        }
    }

    /// Adds a block to the arena, taking ownership of the children it names.
    pub fn add(&mut self, block: Block) -> Result<BlockId, TreeError> {
        if block.kind == BlockKind::Start {
            return Err(TreeError::NestedStart(block.kind));
        }
        for branch in [Branch::Then, Branch::Else] {
            if !block.body(branch).is_empty() && !block.kind.has_branch(branch) {
                return Err(TreeError::NoSuchBranch {
                    kind: block.kind,
                    branch,
                });
            }
        }

        let mut claimed: Vec<BlockId> = block
            .children
            .iter()
            .chain(block.else_children.iter())
            .copied()
            .collect();
        for &child in claimed.iter() {
            if !self.contains(child) {
                return Err(TreeError::UnknownBlock(child));
            }
            if self.is_attached(child) {
                return Err(TreeError::AlreadyAttached(child));
            }
        }
        claimed.sort_unstable();
        if let Some(pair) = claimed.windows(2).find(|pair| pair[0] == pair[1]) {
            return Err(TreeError::AlreadyAttached(pair[0]));
        }

        for &child in claimed.iter() {
            self.attached[child.index()] = true;
        }
        let id = BlockId(self.blocks.len() as u32);
        self.blocks.push(block);
        self.attached.push(false);
        Ok(id)
    }

    pub fn push(&mut self, parent: BlockId, branch: Branch, child: BlockId) -> Result<(), TreeError> {
        let length = self.body(parent, branch).len();
        self.insert(parent, branch, length, child)
    }

    pub fn insert(
        &mut self,
        parent: BlockId,
        branch: Branch,
        index: usize,
        child: BlockId,
    ) -> Result<(), TreeError> {
        let kind = self
            .get(parent)
            .ok_or(TreeError::UnknownBlock(parent))?
            .kind;
        if !self.contains(child) {
            return Err(TreeError::UnknownBlock(child));
        }
        if !kind.has_branch(branch) {
            return Err(TreeError::NoSuchBranch { kind, branch });
        }
        if self.is_attached(child) {
            return Err(TreeError::AlreadyAttached(child));
        }
        if self.subtree_contains(child, parent) {
            return Err(TreeError::Cycle(child));
        }
        let length = self.body(parent, branch).len();
        if index > length {
            return Err(TreeError::IndexOutOfRange { index, length });
        }

        self.blocks[parent.index()]
            .body_mut(branch)
            .insert(index, child);
        self.attached[child.index()] = true;
        Ok(())
    }

    /// Removes `child` and its subtree from its parent.
    pub fn detach(&mut self, child: BlockId) -> Result<Slot, TreeError> {
        if !self.contains(child) {
            return Err(TreeError::UnknownBlock(child));
        }
        let slot = self.find_slot(child).ok_or(TreeError::Detached(child))?;
        self.blocks[slot.parent.index()]
            .body_mut(slot.branch)
            .remove(slot.position);
        self.attached[child.index()] = false;
        Ok(slot)
    }

    pub fn parent_index(&self) -> ParentIndex {
        ParentIndex::build(self)
    }

    fn find_slot(&self, child: BlockId) -> Option<Slot> {
        self.blocks.iter().enumerate().find_map(|(index, block)| {
            [Branch::Then, Branch::Else].into_iter().find_map(|branch| {
                block
                    .body(branch)
                    .iter()
                    .position(|&id| id == child)
                    .map(|position| Slot {
                        parent: BlockId(index as u32),
                        branch,
                        position,
                    })
            })
        })
    }

    fn subtree_contains(&self, subtree: BlockId, needle: BlockId) -> bool {
        let mut pending = vec![subtree];
        while let Some(current) = pending.pop() {
            if current == needle {
                return true;
            }
            if let Some(block) = self.get(current) {
                pending.extend(block.children.iter().chain(block.else_children.iter()));
            }
        }
        false
    }
}

impl Default for BlockTree {
    fn default() -> Self {
        Self::new()
    }
}
