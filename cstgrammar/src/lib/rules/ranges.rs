use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::{Recognizer, RuleError};
use crate::{
    grammar::LanguageContext,
    input::Cursor,
    node::Node,
    path::SymbolPath,
    result::{RecognitionError, RecognitionResult},
};

/// An inclusive `[low, high]` character range.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CharRange {
    low: char,
    high: char,
}

impl CharRange {
    pub fn new(low: char, high: char) -> Result<Self, RuleError> {
        if high < low {
            return Err(RuleError::InvalidRange { low, high });
        }
        Ok(CharRange { low, high })
    }

    /// The range containing `c` alone.
    pub fn single(c: char) -> Self {
        CharRange { low: c, high: c }
    }

    pub fn low(&self) -> char {
        self.low
    }

    pub fn high(&self) -> char {
        self.high
    }

    pub fn contains(&self, c: char) -> bool {
        self.low <= c && c <= self.high
    }

    /// Sort `ranges`, merging those which overlap or are adjacent.
    pub fn normalize(mut ranges: Vec<CharRange>) -> Vec<CharRange> {
        ranges.sort();
        let mut merged: Vec<CharRange> = Vec::with_capacity(ranges.len());
        for r in ranges {
            match merged.last_mut() {
                Some(last) if u32::from(r.low) <= u32::from(last.high) + 1 => {
                    last.high = last.high.max(r.high);
                }
                _ => merged.push(r),
            }
        }
        merged
    }
}

impl fmt::Display for CharRange {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.low == self.high {
            write!(f, "{}", self.low)
        } else {
            write!(f, "{}-{}", self.low, self.high)
        }
    }
}

/// Is `c` in any of the normalized `ranges`?
pub(crate) fn in_ranges(ranges: &[CharRange], c: char) -> bool {
    let i = ranges.partition_point(|r| r.high < c);
    ranges.get(i).is_some_and(|r| r.low <= c)
}

/// Consumes exactly one token, which must lie within an include range (or, if there are no
/// include ranges, anywhere) and outside every exclude range.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CharRanges {
    includes: Vec<CharRange>,
    excludes: Vec<CharRange>,
}

impl CharRanges {
    pub fn new(includes: Vec<CharRange>, excludes: Vec<CharRange>) -> Self {
        CharRanges {
            includes: CharRange::normalize(includes),
            excludes: CharRange::normalize(excludes),
        }
    }

    pub fn includes(&self) -> &[CharRange] {
        &self.includes
    }

    pub fn excludes(&self) -> &[CharRange] {
        &self.excludes
    }

    pub fn matches(&self, c: char) -> bool {
        (self.includes.is_empty() || in_ranges(&self.includes, c)) && !in_ranges(&self.excludes, c)
    }
}

impl Recognizer for CharRanges {
    fn try_recognize(
        &self,
        cursor: &mut Cursor<'_>,
        path: &SymbolPath,
        _: &LanguageContext<'_>,
    ) -> RecognitionResult {
        let start = cursor.position();
        match cursor.peek() {
            Some(c) if self.matches(c) => {
                cursor.consume();
                Ok(Node::atom(path.symbol(), cursor.segment_from(start)))
            }
            _ => Err(RecognitionError::failed(path, start)),
        }
    }
}
