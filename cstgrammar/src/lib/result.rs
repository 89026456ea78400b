//! The result algebra threaded through every layer of a recognition.
//!
//! A rule either recognizes a [Node] or fails with a [RecognitionError]. The two kinds of
//! failure are not interchangeable:
//!
//!   * [RecognitionError::Failed] means that *no* tokens were committed to the symbol at the
//!     failing position: a caller may safely try an alternative.
//!   * [RecognitionError::Partial] means that tokens were committed before the failure: the input
//!     is malformed with respect to the symbol and the error must propagate rather than be
//!     retried.
//!
//! Group aggregations additionally report how many of their elements were recognized before they
//! failed ([GroupError]). That count is what a composite rule's threshold is compared against.

use std::{error::Error, fmt};

use crate::{
    node::{Node, NodeSequence},
    path::SymbolPath,
};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RecognitionError {
    /// Nothing was recognized for `path` at token `position`.
    Failed { path: SymbolPath, position: usize },
    /// `length` tokens starting at `position` were recognized for `path` before recognition
    /// broke down. `reason` is set when a production validator rejected an otherwise
    /// syntactically valid node. `cause` is set when a failure deeper down was promoted to this
    /// partial recognition by a recognition threshold.
    Partial {
        path: SymbolPath,
        position: usize,
        length: usize,
        reason: Option<String>,
        cause: Option<Box<RecognitionError>>,
    },
}

impl RecognitionError {
    pub fn failed(path: &SymbolPath, position: usize) -> Self {
        RecognitionError::Failed {
            path: path.clone(),
            position,
        }
    }

    pub fn partial(path: &SymbolPath, position: usize, length: usize) -> Self {
        RecognitionError::Partial {
            path: path.clone(),
            position,
            length,
            reason: None,
            cause: None,
        }
    }

    /// A partial recognition caused by a semantic rejection of `length` tokens at `position`.
    pub fn rejected(path: &SymbolPath, position: usize, length: usize, reason: String) -> Self {
        RecognitionError::Partial {
            path: path.clone(),
            position,
            length,
            reason: Some(reason),
            cause: None,
        }
    }

    /// A partial recognition of `length` tokens at `position` which `cause`, a failure further
    /// down, was promoted to.
    pub fn promoted(
        path: &SymbolPath,
        position: usize,
        length: usize,
        cause: RecognitionError,
    ) -> Self {
        RecognitionError::Partial {
            path: path.clone(),
            position,
            length,
            reason: None,
            cause: Some(Box::new(cause)),
        }
    }

    /// The symbol path at which recognition broke down.
    pub fn path(&self) -> &SymbolPath {
        match self {
            RecognitionError::Failed { path, .. } | RecognitionError::Partial { path, .. } => path,
        }
    }

    /// The token offset at which the failing symbol started.
    pub fn position(&self) -> usize {
        match self {
            RecognitionError::Failed { position, .. }
            | RecognitionError::Partial { position, .. } => *position,
        }
    }

    /// How many tokens were recognized before the failure (always 0 for
    /// [RecognitionError::Failed]).
    pub fn length(&self) -> usize {
        match self {
            RecognitionError::Failed { .. } => 0,
            RecognitionError::Partial { length, .. } => *length,
        }
    }

    /// The token offset at which recognition stopped making progress.
    pub fn stop_position(&self) -> usize {
        self.position() + self.length()
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, RecognitionError::Failed { .. })
    }

    pub fn is_partial(&self) -> bool {
        matches!(self, RecognitionError::Partial { .. })
    }

    /// The failure which was promoted to this partial recognition, if any.
    pub fn cause(&self) -> Option<&RecognitionError> {
        match self {
            RecognitionError::Partial { cause: Some(c), .. } => Some(&**c),
            _ => None,
        }
    }

    /// The innermost failure in the chain of promoted causes: the most specific symbol and
    /// position at which recognition broke down.
    pub fn deepest(&self) -> &RecognitionError {
        let mut e = self;
        while let Some(c) = e.cause() {
            e = c;
        }
        e
    }
}

impl Error for RecognitionError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.cause().map(|c| c as &(dyn Error + 'static))
    }
}

impl fmt::Display for RecognitionError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RecognitionError::Failed { path, position } => {
                write!(f, "Failed to recognize '{}' at token {}", path, position)
            }
            RecognitionError::Partial {
                path,
                position,
                length,
                reason,
                ..
            } => {
                write!(
                    f,
                    "Partially recognized '{}' at token {} ({} tokens recognized)",
                    path, position, length
                )?;
                if let Some(r) = reason {
                    write!(f, ": {}", r)?;
                }
                Ok(())
            }
        }
    }
}

/// The result of recognizing a single symbol.
pub type RecognitionResult = Result<Node, RecognitionError>;

/// The failure of a group element or group aggregation: the error that stopped it, plus how
/// many group elements had been recognized before it did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GroupError {
    element_count: usize,
    cause: RecognitionError,
}

impl GroupError {
    pub fn new(element_count: usize, cause: RecognitionError) -> Self {
        GroupError {
            element_count,
            cause,
        }
    }

    pub fn element_count(&self) -> usize {
        self.element_count
    }

    pub fn cause(&self) -> &RecognitionError {
        &self.cause
    }

    pub fn into_cause(self) -> RecognitionError {
        self.cause
    }

    /// The same failure, re-tagged with `element_count`.
    pub fn with_element_count(self, element_count: usize) -> Self {
        GroupError {
            element_count,
            cause: self.cause,
        }
    }
}

impl From<RecognitionError> for GroupError {
    fn from(cause: RecognitionError) -> Self {
        GroupError::new(0, cause)
    }
}

impl Error for GroupError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.cause)
    }
}

impl fmt::Display for GroupError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{} (after {} group elements)",
            self.cause, self.element_count
        )
    }
}

/// The result of recognizing a group element or group aggregation.
pub type GroupResult = Result<NodeSequence, GroupError>;
