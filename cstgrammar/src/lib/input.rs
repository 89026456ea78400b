//! Random access input. A [Source] is the immutable token buffer a recognition walks over; a
//! [Cursor] is the only mutable state of a recognition: a position into that buffer which rules
//! advance as they consume tokens and reset when they fail.

use std::ops::{Deref, DerefMut};

use crate::Segment;

/// The user's input viewed as a sequence of `char` tokens.
#[derive(Debug)]
pub struct Source<'input> {
    text: &'input str,
    chars: Vec<char>,
    /// The byte offset of every token in `text`, followed by `text.len()`.
    offsets: Vec<usize>,
}

impl<'input> Source<'input> {
    pub fn new(text: &'input str) -> Self {
        let mut chars = Vec::with_capacity(text.len());
        let mut offsets = Vec::with_capacity(text.len() + 1);
        for (i, c) in text.char_indices() {
            offsets.push(i);
            chars.push(c);
        }
        offsets.push(text.len());
        Source {
            text,
            chars,
            offsets,
        }
    }

    /// The complete input.
    pub fn text(&self) -> &'input str {
        self.text
    }

    /// How many tokens does the input contain?
    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    /// Every token of the input.
    pub fn as_tokens(&self) -> &[char] {
        &self.chars
    }

    /// The token at `idx`, if there is one.
    pub fn token(&self, idx: usize) -> Option<char> {
        self.chars.get(idx).copied()
    }

    /// The tokens covered by `seg`, clamped to the end of the input.
    pub fn tokens(&self, seg: Segment) -> &[char] {
        let start = seg.offset().min(self.chars.len());
        let end = seg.end().min(self.chars.len());
        &self.chars[start..end]
    }

    /// Return the user input associated with `seg`, clamped to the end of the input.
    pub fn segment_str(&self, seg: Segment) -> &'input str {
        let start = self.offsets[seg.offset().min(self.chars.len())];
        let end = self.offsets[seg.end().min(self.chars.len())];
        &self.text[start..end]
    }

    /// Return `(line, column)` (both starting at 1, columns counted in tokens) of the token at
    /// `idx`.
    pub fn line_col(&self, idx: usize) -> (usize, usize) {
        let mut line = 1;
        let mut col = 1;
        for &c in &self.chars[..idx.min(self.chars.len())] {
            if c == '\n' {
                line += 1;
                col = 1;
            } else {
                col += 1;
            }
        }
        (line, col)
    }
}

/// A repositionable reader over a [Source]. A `Cursor` is created per top-level recognition and
/// must not be shared between recognitions.
#[derive(Debug)]
pub struct Cursor<'input> {
    source: Source<'input>,
    position: usize,
}

impl<'input> Cursor<'input> {
    pub fn new(text: &'input str) -> Self {
        Cursor {
            source: Source::new(text),
            position: 0,
        }
    }

    pub fn source(&self) -> &Source<'input> {
        &self.source
    }

    /// The offset of the next token to be consumed.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Returns `true` if no further token can be read.
    pub fn is_at_end(&self) -> bool {
        self.position >= self.source.len()
    }

    /// The tokens not yet consumed.
    pub fn remaining(&self) -> &[char] {
        &self.source.chars[self.position.min(self.source.len())..]
    }

    /// The next token, without consuming it.
    pub fn peek(&self) -> Option<char> {
        self.source.token(self.position)
    }

    /// The next `n` tokens, without consuming them, or `None` if fewer than `n` remain.
    pub fn peek_n(&self, n: usize) -> Option<&[char]> {
        self.remaining().get(..n)
    }

    /// Consume one token.
    pub fn consume(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.position += 1;
        Some(c)
    }

    /// Consume `n` tokens. If fewer than `n` tokens remain, nothing is consumed and `None` is
    /// returned.
    pub fn consume_n(&mut self, n: usize) -> Option<&[char]> {
        let start = self.position;
        if self.remaining().len() < n {
            return None;
        }
        self.position += n;
        Some(&self.source.chars[start..start + n])
    }

    /// Move the cursor back (or forward) to `position`.
    ///
    /// # Panics
    ///
    /// If `position` lies beyond the end of the input.
    pub fn reset(&mut self, position: usize) {
        assert!(position <= self.source.len());
        self.position = position;
    }

    /// The segment from `start` up to the current position.
    pub fn segment_from(&self, start: usize) -> Segment {
        Segment::from_bounds(start, self.position)
    }

    /// Capture the current position: unless the returned [Transaction] is committed, the cursor
    /// is reset to this position when the transaction is dropped.
    pub fn transaction(&mut self) -> Transaction<'_, 'input> {
        let entry = self.position;
        Transaction {
            cursor: self,
            entry,
            committed: false,
        }
    }
}

/// A scoped checkpoint of a [Cursor]. It dereferences to the cursor it guards, so it can be
/// handed to anything expecting a `&mut Cursor`.
pub struct Transaction<'c, 'input> {
    cursor: &'c mut Cursor<'input>,
    entry: usize,
    committed: bool,
}

impl Transaction<'_, '_> {
    /// The cursor position at the time the transaction was created.
    pub fn entry(&self) -> usize {
        self.entry
    }

    /// Keep everything consumed since the transaction was created.
    pub fn commit(mut self) {
        self.committed = true;
    }
}

impl<'input> Deref for Transaction<'_, 'input> {
    type Target = Cursor<'input>;

    fn deref(&self) -> &Self::Target {
        self.cursor
    }
}

impl DerefMut for Transaction<'_, '_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.cursor
    }
}

impl Drop for Transaction<'_, '_> {
    fn drop(&mut self) {
        if !self.committed {
            self.cursor.reset(self.entry);
        }
    }
}
