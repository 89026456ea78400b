use std::{error::Error, fmt};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    grammar::LanguageContext,
    input::Cursor,
    node::NodeSequence,
    path::SymbolPath,
    result::GroupResult,
};

/// How many times a group element may occur: at least `min` times and, if `max` is `Some`, at
/// most `max` times. `{0, 0}` is not a cardinality.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Cardinality {
    min: usize,
    max: Option<usize>,
}

#[derive(Debug, Eq, PartialEq)]
pub enum CardinalityError {
    /// `{0, 0}` would never recognize anything.
    ZeroMaximum,
    /// The maximum is smaller than the minimum.
    MaxBelowMin { min: usize, max: usize },
}

impl Error for CardinalityError {}

impl fmt::Display for CardinalityError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            CardinalityError::ZeroMaximum => write!(f, "Cardinality maximum must be at least 1"),
            CardinalityError::MaxBelowMin { min, max } => {
                write!(f, "Cardinality maximum {} is below its minimum {}", max, min)
            }
        }
    }
}

/// Anything which can be recognized once per iteration of [Cardinality::try_repeat].
pub trait Repeatable {
    /// Recognize a single occurrence at the cursor's current position. On failure the cursor
    /// must be left where it was.
    fn try_recognize_once(
        &self,
        cursor: &mut Cursor<'_>,
        path: &SymbolPath,
        ctx: &LanguageContext<'_>,
    ) -> GroupResult;
}

impl Cardinality {
    pub fn new(min: usize, max: Option<usize>) -> Result<Self, CardinalityError> {
        match max {
            Some(0) => Err(CardinalityError::ZeroMaximum),
            Some(m) if m < min => Err(CardinalityError::MaxBelowMin { min, max: m }),
            _ => Ok(Cardinality { min, max }),
        }
    }

    /// `{1, 1}`
    pub fn once() -> Self {
        Cardinality {
            min: 1,
            max: Some(1),
        }
    }

    /// `{0, 1}`
    pub fn optional() -> Self {
        Cardinality {
            min: 0,
            max: Some(1),
        }
    }

    /// `{0, ∞}`
    pub fn zero_or_more() -> Self {
        Cardinality { min: 0, max: None }
    }

    /// `{1, ∞}`
    pub fn one_or_more() -> Self {
        Cardinality { min: 1, max: None }
    }

    /// `{n, ∞}`
    pub fn at_least(n: usize) -> Self {
        Cardinality { min: n, max: None }
    }

    /// `{n, n}`
    pub fn exactly(n: usize) -> Result<Self, CardinalityError> {
        Cardinality::new(n, Some(n))
    }

    pub fn min(&self) -> usize {
        self.min
    }

    pub fn max(&self) -> Option<usize> {
        self.max
    }

    /// Is `n` occurrences within bounds?
    pub fn accepts(&self, n: usize) -> bool {
        n >= self.min && self.max.is_none_or(|m| n <= m)
    }

    /// Repeatedly recognize `element` from the cursor's current position until an occurrence
    /// fails or `max` occurrences have been recognized.
    ///
    /// On success the cursor is left after the last occurrence and the recognized nodes are
    /// returned in order; if `min` is zero and nothing matched, the result is an optional empty
    /// sequence. On failure the cursor is reset to its entry position and the error of the
    /// failing occurrence is returned, its element count increased by the number of occurrences
    /// recognized before it. Failed and partial causes are never reinterpreted here.
    ///
    /// An occurrence which succeeds without consuming any tokens ends the repetition and counts
    /// as satisfying the minimum: repeating it could only ever produce the same empty match.
    pub fn try_repeat<R: Repeatable + ?Sized>(
        &self,
        cursor: &mut Cursor<'_>,
        path: &SymbolPath,
        ctx: &LanguageContext<'_>,
        element: &R,
    ) -> GroupResult {
        let mut txn = cursor.transaction();
        let mut seq = NodeSequence::default();
        let mut n = 0;
        let mut exhausted = false;
        let mut stop = None;
        while self.max.is_none_or(|m| n < m) {
            let before = txn.position();
            match element.try_recognize_once(&mut txn, path, ctx) {
                Ok(s) => {
                    seq.append(s);
                    n += 1;
                    if txn.position() == before {
                        exhausted = true;
                        break;
                    }
                }
                Err(e) => {
                    stop = Some(e);
                    break;
                }
            }
        }

        match stop {
            Some(e) if e.cause().is_partial() || (n < self.min && !exhausted) => {
                let count = n + e.element_count();
                Err(e.with_element_count(count))
            }
            _ => {
                debug_assert!(exhausted || self.accepts(n));
                txn.commit();
                if n == 0 {
                    Ok(NodeSequence::optional_empty())
                } else {
                    Ok(seq)
                }
            }
        }
    }
}

impl fmt::Display for Cardinality {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.max {
            Some(m) => write!(f, "{{{},{}}}", self.min, m),
            None => write!(f, "{{{},}}", self.min),
        }
    }
}
