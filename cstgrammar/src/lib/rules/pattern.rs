use regex::Regex;

use super::{Recognizer, RuleError};
use crate::{
    Segment,
    grammar::LanguageContext,
    input::Cursor,
    node::Node,
    path::SymbolPath,
    result::{RecognitionError, RecognitionResult},
};

/// How a [Pattern] decides how many tokens to try its expression against.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MatchMode {
    /// Try windows of `max` tokens (or whatever remains of the input) down to `min` tokens,
    /// accepting the first (i.e. longest) one the expression matches in full.
    Closed { min: usize, max: usize },
    /// Grow the window one token at a time, remembering the longest full match. Up to
    /// `max_mismatch` consecutive non-matching windows are tolerated before giving up. If
    /// nothing matched, an empty atom is produced when `allow_empty` is set.
    Open {
        max_mismatch: usize,
        allow_empty: bool,
    },
}

/// Matches a window of tokens against a regular expression.
#[derive(Clone, Debug)]
pub struct Pattern {
    regex: Regex,
    source: String,
    mode: MatchMode,
}

impl Pattern {
    pub fn new(pattern: &str, mode: MatchMode) -> Result<Self, RuleError> {
        if let MatchMode::Closed { min, max } = mode {
            if max == 0 || min > max {
                return Err(RuleError::InvalidMatchWindow { min, max });
            }
        }
        // The expression must cover the whole window, not merely occur within it.
        let regex = Regex::new(&format!("^(?:{})$", pattern))
            .map_err(|e| RuleError::InvalidPattern(e.to_string()))?;
        Ok(Pattern {
            regex,
            source: pattern.to_owned(),
            mode,
        })
    }

    /// The expression as given by the user.
    pub fn pattern(&self) -> &str {
        &self.source
    }

    pub fn mode(&self) -> MatchMode {
        self.mode
    }

    pub(crate) fn is_nullable(&self) -> bool {
        match self.mode {
            MatchMode::Closed { min, .. } => min == 0 && self.regex.is_match(""),
            MatchMode::Open { allow_empty, .. } => allow_empty,
        }
    }

    /// How many tokens from `start` does the expression match?
    fn match_len(&self, cursor: &Cursor<'_>, start: usize) -> Option<usize> {
        let src = cursor.source();
        let available = src.len() - start;
        let window = |len| src.segment_str(Segment::new(start, len));
        match self.mode {
            MatchMode::Closed { min, max } => (min..=max.min(available))
                .rev()
                .find(|&len| self.regex.is_match(window(len))),
            MatchMode::Open {
                max_mismatch,
                allow_empty,
            } => {
                let mut longest = None;
                let mut mismatches = 0;
                for len in 1..=available {
                    if self.regex.is_match(window(len)) {
                        longest = Some(len);
                        mismatches = 0;
                    } else {
                        mismatches += 1;
                        if mismatches > max_mismatch {
                            break;
                        }
                    }
                }
                longest.or(if allow_empty { Some(0) } else { None })
            }
        }
    }
}

impl Recognizer for Pattern {
    fn try_recognize(
        &self,
        cursor: &mut Cursor<'_>,
        path: &SymbolPath,
        _: &LanguageContext<'_>,
    ) -> RecognitionResult {
        let start = cursor.position();
        match self.match_len(cursor, start) {
            Some(len) => {
                cursor.consume_n(len);
                Ok(Node::atom(path.symbol(), Segment::new(start, len)))
            }
            None => Err(RecognitionError::failed(path, start)),
        }
    }
}
