use std::ops::{Add, Sub};

/// Byte offset into a level source. Sources larger than `u32::MAX` bytes are not supported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SpanIndex(u32);

/// Byte length of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SpanLength(u32);

impl From<usize> for SpanIndex {
    fn from(offset: usize) -> Self {
        Self(offset as u32)
    }
}

impl From<SpanIndex> for usize {
    fn from(offset: SpanIndex) -> Self {
        offset.0 as usize
    }
}

impl Add<usize> for SpanIndex {
    type Output = Self;

    fn add(self, bytes: usize) -> Self {
        Self(self.0 + bytes as u32)
    }
}

impl Add<SpanLength> for SpanIndex {
    type Output = Self;

    fn add(self, length: SpanLength) -> Self {
        Self(self.0 + length.0)
    }
}

/// The distance between two offsets, or zero when `rhs` lies after `self`.
impl Sub for SpanIndex {
    type Output = SpanLength;

    fn sub(self, rhs: SpanIndex) -> SpanLength {
        SpanLength(self.0.saturating_sub(rhs.0))
    }
}
