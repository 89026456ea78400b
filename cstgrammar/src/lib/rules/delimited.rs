//! Delimited content: a start delimiter, followed by content, optionally followed by an end
//! delimiter (e.g. string literals, comments, or tag bodies).
//!
//! Content is consumed in one of two modes, fixed when the rule is built:
//!
//!   * Without legal sequences, content is read a token at a time. Reading stops (without
//!     consuming the stopping token(s)) at the first token outside the legal ranges, inside an
//!     illegal range, or which completes an illegal sequence. The end delimiter is always an
//!     illegal sequence, unless the occurrence in question is part of the end delimiter escape.
//!   * With legal sequences, content is read a sequence at a time, always taking the longest
//!     legal sequence that appears next. Reading stops when no legal sequence appears next, or
//!     when the one that does fails the range or illegal sequence checks.

use super::{
    Recognizer, RuleError,
    ranges::{CharRange, in_ranges},
};
use crate::{
    grammar::LanguageContext,
    input::Cursor,
    node::Node,
    path::SymbolPath,
    result::{RecognitionError, RecognitionResult},
};

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DelimitedContent {
    start: Vec<char>,
    end: Option<Vec<char>>,
    /// Sorted longest first, so that the first match is the longest.
    legal_sequences: Vec<Vec<char>>,
    /// Includes the end delimiter, if there is one.
    illegal_sequences: Vec<Vec<char>>,
    legal_ranges: Vec<CharRange>,
    illegal_ranges: Vec<CharRange>,
    end_escape: Option<Vec<char>>,
    accepts_empty: bool,
}

/// A builder for [DelimitedContent] rules. Only the start delimiter is mandatory.
#[derive(Clone, Debug)]
pub struct DelimitedContentBuilder {
    start: String,
    end: Option<String>,
    legal_sequences: Vec<String>,
    illegal_sequences: Vec<String>,
    legal_ranges: Vec<CharRange>,
    illegal_ranges: Vec<CharRange>,
    end_escape: Option<String>,
    accepts_empty: bool,
}

impl DelimitedContentBuilder {
    /// Set the end delimiter.
    pub fn end(mut self, end: &str) -> Self {
        self.end = Some(end.to_owned());
        self
    }

    /// Add a sequence content may be built from. Once at least one legal sequence is given, only
    /// legal sequences are accepted as content.
    pub fn legal_sequence(mut self, seq: &str) -> Self {
        self.legal_sequences.push(seq.to_owned());
        self
    }

    /// Add a sequence which content may not contain.
    pub fn illegal_sequence(mut self, seq: &str) -> Self {
        self.illegal_sequences.push(seq.to_owned());
        self
    }

    /// Add a range of characters content may contain. If no legal ranges are given, any
    /// character not in an illegal range is accepted.
    pub fn legal_range(mut self, r: CharRange) -> Self {
        self.legal_ranges.push(r);
        self
    }

    /// Add a range of characters content may not contain.
    pub fn illegal_range(mut self, r: CharRange) -> Self {
        self.illegal_ranges.push(r);
        self
    }

    /// Set a sequence which, when it surrounds an occurrence of the end delimiter (or of another
    /// illegal sequence), stops that occurrence from ending the content (e.g. `\"`).
    pub fn end_escape(mut self, esc: &str) -> Self {
        self.end_escape = Some(esc.to_owned());
        self
    }

    /// Whether content may be empty (defaults to `false`).
    pub fn accepts_empty(mut self, yes: bool) -> Self {
        self.accepts_empty = yes;
        self
    }

    pub fn build(self) -> Result<DelimitedContent, RuleError> {
        fn tokens(s: &str) -> Result<Vec<char>, RuleError> {
            if s.is_empty() {
                Err(RuleError::EmptySequence)
            } else {
                Ok(s.chars().collect())
            }
        }

        if self.start.is_empty() || self.end.as_deref() == Some("") {
            return Err(RuleError::EmptyDelimiter);
        }
        if self.end.is_none() {
            if self.end_escape.is_some() {
                return Err(RuleError::EscapeWithoutEnd);
            }
            if self.illegal_sequences.is_empty() && self.illegal_ranges.is_empty() {
                return Err(RuleError::UnterminatedContent);
            }
        }

        let mut legal_sequences = self
            .legal_sequences
            .iter()
            .map(|s| tokens(s))
            .collect::<Result<Vec<_>, _>>()?;
        legal_sequences.sort_by(|a, b| b.len().cmp(&a.len()));
        legal_sequences.dedup();
        let mut illegal_sequences = self
            .illegal_sequences
            .iter()
            .map(|s| tokens(s))
            .collect::<Result<Vec<_>, _>>()?;
        let end = self.end.as_deref().map(tokens).transpose()?;
        if let Some(ref e) = end {
            if !illegal_sequences.contains(e) {
                illegal_sequences.push(e.clone());
            }
        }

        Ok(DelimitedContent {
            start: tokens(&self.start)?,
            end,
            legal_sequences,
            illegal_sequences,
            legal_ranges: CharRange::normalize(self.legal_ranges),
            illegal_ranges: CharRange::normalize(self.illegal_ranges),
            end_escape: self.end_escape.as_deref().map(tokens).transpose()?,
            accepts_empty: self.accepts_empty,
        })
    }
}

impl DelimitedContent {
    pub fn builder(start: &str) -> DelimitedContentBuilder {
        DelimitedContentBuilder {
            start: start.to_owned(),
            end: None,
            legal_sequences: Vec::new(),
            illegal_sequences: Vec::new(),
            legal_ranges: Vec::new(),
            illegal_ranges: Vec::new(),
            end_escape: None,
            accepts_empty: false,
        }
    }

    pub fn start_delimiter(&self) -> String {
        self.start.iter().collect()
    }

    pub fn end_delimiter(&self) -> Option<String> {
        self.end.as_ref().map(|e| e.iter().collect())
    }

    pub fn accepts_empty(&self) -> bool {
        self.accepts_empty
    }

    fn legal_token(&self, c: char) -> bool {
        (self.legal_ranges.is_empty() || in_ranges(&self.legal_ranges, c))
            && !in_ranges(&self.illegal_ranges, c)
    }

    /// If the content `tokens[content_start..end]` ends with an illegal sequence, return that
    /// sequence's length. An occurrence lying wholly within an occurrence of the end escape
    /// (which may extend beyond `end`, but not before `content_start`) doesn't count.
    fn illegal_suffix(&self, tokens: &[char], content_start: usize, end: usize) -> Option<usize> {
        let content = &tokens[content_start..end];
        self.illegal_sequences
            .iter()
            .find(|seq| {
                content.ends_with(seq.as_slice())
                    && !self.escaped(tokens, content_start, end, seq.len())
            })
            .map(|seq| seq.len())
    }

    fn escaped(&self, tokens: &[char], content_start: usize, end: usize, len: usize) -> bool {
        let Some(esc) = &self.end_escape else {
            return false;
        };
        if esc.len() < len {
            return false;
        }
        // Every alignment of the escape which covers tokens[end - len..end].
        let lowest = (end - len).saturating_sub(esc.len() - len).max(content_start);
        (lowest..=end - len)
            .any(|s| s + esc.len() >= end && tokens.get(s..s + esc.len()) == Some(&esc[..]))
    }

    fn consume_tokens(&self, cursor: &mut Cursor<'_>, content_start: usize) {
        while let Some(c) = cursor.peek() {
            if !self.legal_token(c) {
                break;
            }
            cursor.consume();
            let pos = cursor.position();
            if let Some(len) =
                self.illegal_suffix(cursor.source().as_tokens(), content_start, pos)
            {
                cursor.reset(pos - len);
                break;
            }
        }
    }

    fn consume_sequences(&self, cursor: &mut Cursor<'_>, content_start: usize) {
        loop {
            let pos = cursor.position();
            let Some(seq) = self
                .legal_sequences
                .iter()
                .find(|seq| cursor.remaining().starts_with(seq.as_slice()))
            else {
                break;
            };
            if !seq.iter().all(|&c| self.legal_token(c)) {
                break;
            }
            let tokens = cursor.source().as_tokens();
            if (1..=seq.len())
                .any(|k| self.illegal_suffix(tokens, content_start, pos + k).is_some())
            {
                break;
            }
            cursor.consume_n(seq.len());
        }
    }
}

/// Match `expected` exactly, consuming it. On mismatch the cursor may have moved.
fn match_tokens(cursor: &mut Cursor<'_>, expected: &[char]) -> bool {
    cursor.consume_n(expected.len()) == Some(expected)
}

impl Recognizer for DelimitedContent {
    fn try_recognize(
        &self,
        cursor: &mut Cursor<'_>,
        path: &SymbolPath,
        _: &LanguageContext<'_>,
    ) -> RecognitionResult {
        let mut txn = cursor.transaction();
        let entry = txn.entry();
        if !match_tokens(&mut txn, &self.start) {
            return Err(RecognitionError::failed(path, entry));
        }

        let content_start = txn.position();
        if self.legal_sequences.is_empty() {
            self.consume_tokens(&mut txn, content_start);
        } else {
            self.consume_sequences(&mut txn, content_start);
        }
        let content = txn.segment_from(content_start);
        if content.is_empty() && !self.accepts_empty {
            return Err(RecognitionError::partial(path, entry, content_start - entry));
        }

        if let Some(end) = &self.end {
            let before_end = txn.position();
            if !match_tokens(&mut txn, end) {
                return Err(RecognitionError::partial(path, entry, before_end - entry));
            }
        }
        txn.commit();
        Ok(Node::atom(path.symbol(), content))
    }
}
