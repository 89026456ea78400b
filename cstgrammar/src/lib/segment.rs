#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A `Segment` records which tokens of the user's input something (e.g. an atom or a composite
/// node) covers. It never holds a reference / copy of the input itself: `offset` and `count` are
/// measured in tokens (i.e. `char`s), not bytes.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Segment {
    offset: usize,
    count: usize,
}

impl Segment {
    /// Create a new segment starting at token `offset` and covering `count` tokens.
    pub fn new(offset: usize, count: usize) -> Self {
        Segment { offset, count }
    }

    /// Create a segment covering the tokens `start..end`.
    ///
    /// # Panics
    ///
    /// If `end` is less than `start`.
    pub fn from_bounds(start: usize, end: usize) -> Self {
        if end < start {
            panic!("Segment starts ({}) after it ends ({})!", start, end);
        }
        Segment {
            offset: start,
            count: end - start,
        }
    }

    /// An empty segment positioned at `offset`.
    pub fn empty(offset: usize) -> Self {
        Segment { offset, count: 0 }
    }

    /// Token offset of the start of the segment.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Number of tokens covered by the segment.
    pub fn count(&self) -> usize {
        self.count
    }

    /// Token offset one past the end of the segment.
    pub fn end(&self) -> usize {
        self.offset + self.count
    }

    /// Returns `true` if this `Segment` covers 0 tokens, or `false` otherwise.
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// The smallest segment covering both `self` and `other`.
    pub fn join(&self, other: Segment) -> Segment {
        Segment::from_bounds(self.offset.min(other.offset), self.end().max(other.end()))
    }
}
