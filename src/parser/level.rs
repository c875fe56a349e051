use crate::block::{BlockId, BlockTree};
use crate::lexer::Span;
use crate::world::GridWorld;

/// Source locations of parsed blocks.
#[derive(Debug, Clone, Default)]
pub struct SourceMap {
    spans: Vec<Option<Span>>,
}

impl SourceMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, block: BlockId, span: Span) {
        let index = block.index();
        if self.spans.len() <= index {
            self.spans.resize(index + 1, None);
        }
        self.spans[index] = Some(span);
    }

    pub fn span(&self, block: BlockId) -> Option<Span> {
        self.spans.get(block.index()).copied().flatten()
    }
}

/// A maze together with the program written for it.
#[derive(Debug, Clone)]
pub struct Level {
    pub world: GridWorld,
    pub program: BlockTree,
    pub source_map: SourceMap,
}
