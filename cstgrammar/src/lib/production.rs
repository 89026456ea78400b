use std::{error::Error, fmt, sync::Arc};

use tracing::trace;

use crate::{
    grammar::LanguageContext,
    input::{Cursor, Source},
    node::Node,
    path::SymbolPath,
    result::{RecognitionError, RecognitionResult},
    rules::{Recognizer, Rule},
};

/// A semantic rejection of a syntactically valid node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidationError {
    msg: String,
}

impl ValidationError {
    pub fn new<S: Into<String>>(msg: S) -> Self {
        ValidationError { msg: msg.into() }
    }

    pub fn message(&self) -> &str {
        &self.msg
    }
}

impl Error for ValidationError {}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.msg)
    }
}

/// A check run on a production's node after it has been recognized. Validators are only ever
/// called on syntactic success, so they cannot influence backtracking.
///
/// Any `Fn(&Node, &Source) -> Result<(), ValidationError>` closure is a validator.
pub trait ProductionValidator: Send + Sync {
    fn validate(&self, node: &Node, src: &Source<'_>) -> Result<(), ValidationError>;
}

impl<F> ProductionValidator for F
where
    F: Fn(&Node, &Source<'_>) -> Result<(), ValidationError> + Send + Sync,
{
    fn validate(&self, node: &Node, src: &Source<'_>) -> Result<(), ValidationError> {
        self(node, src)
    }
}

/// A named rule.
#[derive(Clone)]
pub struct Production {
    symbol: String,
    rule: Rule,
    validator: Option<Arc<dyn ProductionValidator>>,
}

impl Production {
    pub fn new(symbol: &str, rule: Rule) -> Self {
        Production {
            symbol: symbol.to_owned(),
            rule,
            validator: None,
        }
    }

    /// Return this production with `validator` run on every node it recognizes. A validator
    /// registered here takes precedence over one registered for the same symbol in a
    /// [LanguageContext].
    pub fn with_validator<V: ProductionValidator + 'static>(mut self, validator: V) -> Self {
        self.validator = Some(Arc::new(validator));
        self
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn rule(&self) -> &Rule {
        &self.rule
    }

    pub fn has_validator(&self) -> bool {
        self.validator.is_some()
    }

    /// Recognize this production with `path` already naming it.
    pub(crate) fn recognize_as(
        &self,
        cursor: &mut Cursor<'_>,
        path: &SymbolPath,
        ctx: &LanguageContext<'_>,
    ) -> RecognitionResult {
        let start = cursor.position();
        trace!("Trying '{}' at token {}", path, start);
        let node = self.rule.try_recognize(cursor, path, ctx)?;
        let validator = self
            .validator
            .as_deref()
            .or_else(|| ctx.validator(&self.symbol));
        if let Some(validator) = validator {
            if let Err(e) = validator.validate(&node, cursor.source()) {
                let length = cursor.position() - start;
                cursor.reset(start);
                trace!("'{}' rejected at token {}: {}", path, start, e);
                if length == 0 {
                    return Err(RecognitionError::failed(path, start));
                }
                return Err(RecognitionError::rejected(path, start, length, e.to_string()));
            }
        }
        trace!("Recognized '{}' at token {}", path, start);
        Ok(node)
    }
}

impl Recognizer for Production {
    /// Recognize this production, extending `path` with its symbol.
    fn try_recognize(
        &self,
        cursor: &mut Cursor<'_>,
        path: &SymbolPath,
        ctx: &LanguageContext<'_>,
    ) -> RecognitionResult {
        self.recognize_as(cursor, &path.child(&self.symbol), ctx)
    }
}

impl fmt::Debug for Production {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Production")
            .field("symbol", &self.symbol)
            .field("rule", &self.rule)
            .field("validator", &self.validator.is_some())
            .finish()
    }
}
