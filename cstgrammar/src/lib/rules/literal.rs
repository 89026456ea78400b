use super::{Recognizer, RuleError};
use crate::{
    grammar::LanguageContext,
    input::Cursor,
    node::Node,
    path::SymbolPath,
    result::{RecognitionError, RecognitionResult},
};

/// Matches a fixed string token-for-token.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Literal {
    tokens: Vec<char>,
    case_sensitive: bool,
}

impl Literal {
    /// A case sensitive literal.
    pub fn new(value: &str) -> Result<Self, RuleError> {
        if value.is_empty() {
            return Err(RuleError::EmptyLiteral);
        }
        Ok(Literal {
            tokens: value.chars().collect(),
            case_sensitive: true,
        })
    }

    /// A literal which ignores case when matching.
    pub fn case_insensitive(value: &str) -> Result<Self, RuleError> {
        Ok(Literal {
            case_sensitive: false,
            ..Literal::new(value)?
        })
    }

    pub fn value(&self) -> String {
        self.tokens.iter().collect()
    }

    pub fn is_case_sensitive(&self) -> bool {
        self.case_sensitive
    }

    fn token_eq(&self, expected: char, actual: char) -> bool {
        expected == actual
            || (!self.case_sensitive && expected.to_lowercase().eq(actual.to_lowercase()))
    }
}

impl Recognizer for Literal {
    fn try_recognize(
        &self,
        cursor: &mut Cursor<'_>,
        path: &SymbolPath,
        _: &LanguageContext<'_>,
    ) -> RecognitionResult {
        let start = cursor.position();
        for &e in &self.tokens {
            match cursor.peek() {
                Some(c) if self.token_eq(e, c) => {
                    cursor.consume();
                }
                _ => {
                    cursor.reset(start);
                    return Err(RecognitionError::failed(path, start));
                }
            }
        }
        Ok(Node::atom(path.symbol(), cursor.segment_from(start)))
    }
}
