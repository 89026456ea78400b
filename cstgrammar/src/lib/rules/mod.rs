//! Rules: the things a [Production](crate::production::Production) recognizes.
//!
//! An *atomic* rule is a leaf matcher with no sub-rules; a *composite* rule combines group
//! elements (which may in turn reference other productions). Every rule, atomic or not, is
//! recognized through the same [Recognizer] entry point.

use std::{error::Error, fmt};

use crate::{
    composite::CompositeRule,
    grammar::LanguageContext,
    input::Cursor,
    path::SymbolPath,
    result::RecognitionResult,
};

pub mod delimited;
pub mod eof;
pub mod literal;
pub mod pattern;
pub mod ranges;

use self::{
    delimited::DelimitedContent, eof::EndOfInput, literal::Literal, pattern::Pattern,
    ranges::CharRanges,
};

/// The uniform recognition entry point, used identically whether called from the top level or
/// from inside another rule.
///
/// Implementations must leave `cursor` at its entry position whenever they return an error, and
/// after the last consumed token when they succeed.
pub trait Recognizer {
    fn try_recognize(
        &self,
        cursor: &mut Cursor<'_>,
        path: &SymbolPath,
        ctx: &LanguageContext<'_>,
    ) -> RecognitionResult;
}

/// The various different possible rule construction errors.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum RuleError {
    EmptyLiteral,
    EmptyDelimiter,
    /// A legal or illegal sequence, or an escape sequence, was empty.
    EmptySequence,
    /// Delimited content with neither an end delimiter nor any illegal sequence or range: there
    /// would be no way of telling where the content ends.
    UnterminatedContent,
    /// An end delimiter escape was given without an end delimiter.
    EscapeWithoutEnd,
    InvalidRange { low: char, high: char },
    InvalidPattern(String),
    InvalidMatchWindow { min: usize, max: usize },
    EmptyGroup,
    SetMinimumOutOfRange { min: usize, elements: usize },
    ZeroThreshold,
}

impl Error for RuleError {}

impl fmt::Display for RuleError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RuleError::EmptyLiteral => write!(f, "Literal must not be empty"),
            RuleError::EmptyDelimiter => write!(f, "Delimiters must not be empty"),
            RuleError::EmptySequence => write!(f, "Sequences must not be empty"),
            RuleError::UnterminatedContent => write!(
                f,
                "Delimited content needs an end delimiter, an illegal sequence, or an illegal range"
            ),
            RuleError::EscapeWithoutEnd => {
                write!(f, "End delimiter escape given without an end delimiter")
            }
            RuleError::InvalidRange { low, high } => {
                write!(f, "Invalid character range '{}-{}'", low, high)
            }
            RuleError::InvalidPattern(e) => write!(f, "Invalid pattern: {}", e),
            RuleError::InvalidMatchWindow { min, max } => {
                write!(f, "Invalid pattern match window {{{},{}}}", min, max)
            }
            RuleError::EmptyGroup => write!(f, "Groups must contain at least one element"),
            RuleError::SetMinimumOutOfRange { min, elements } => write!(
                f,
                "Set minimum recognition count {} is not in 1..={}",
                min, elements
            ),
            RuleError::ZeroThreshold => write!(f, "Recognition threshold must be at least 1"),
        }
    }
}

/// A leaf matcher.
#[derive(Clone, Debug)]
pub enum AtomicRule {
    Literal(Literal),
    CharRanges(CharRanges),
    DelimitedContent(DelimitedContent),
    EndOfInput(EndOfInput),
    Pattern(Pattern),
}

impl AtomicRule {
    /// The name this kind of rule goes by, used to name atoms recognized by inline atomic group
    /// elements (as `@<kind>`).
    pub fn kind_name(&self) -> &'static str {
        match self {
            AtomicRule::Literal(_) => "Literal",
            AtomicRule::CharRanges(_) => "Ranges",
            AtomicRule::DelimitedContent(_) => "Delimited",
            AtomicRule::EndOfInput(_) => "EOF",
            AtomicRule::Pattern(_) => "Pattern",
        }
    }

    /// Can this rule succeed without consuming any tokens?
    pub fn is_nullable(&self) -> bool {
        match self {
            AtomicRule::Literal(_)
            | AtomicRule::CharRanges(_)
            | AtomicRule::DelimitedContent(_) => false,
            AtomicRule::EndOfInput(_) => true,
            AtomicRule::Pattern(p) => p.is_nullable(),
        }
    }
}

impl Recognizer for AtomicRule {
    fn try_recognize(
        &self,
        cursor: &mut Cursor<'_>,
        path: &SymbolPath,
        ctx: &LanguageContext<'_>,
    ) -> RecognitionResult {
        match self {
            AtomicRule::Literal(r) => r.try_recognize(cursor, path, ctx),
            AtomicRule::CharRanges(r) => r.try_recognize(cursor, path, ctx),
            AtomicRule::DelimitedContent(r) => r.try_recognize(cursor, path, ctx),
            AtomicRule::EndOfInput(r) => r.try_recognize(cursor, path, ctx),
            AtomicRule::Pattern(r) => r.try_recognize(cursor, path, ctx),
        }
    }
}

/// What a production recognizes.
#[derive(Clone, Debug)]
pub enum Rule {
    Atomic(AtomicRule),
    Composite(CompositeRule),
}

impl Rule {
    pub fn is_atomic(&self) -> bool {
        matches!(self, Rule::Atomic(_))
    }
}

impl Recognizer for Rule {
    fn try_recognize(
        &self,
        cursor: &mut Cursor<'_>,
        path: &SymbolPath,
        ctx: &LanguageContext<'_>,
    ) -> RecognitionResult {
        match self {
            Rule::Atomic(r) => r.try_recognize(cursor, path, ctx),
            Rule::Composite(r) => r.try_recognize(cursor, path, ctx),
        }
    }
}

macro_rules! atomic_conversions {
    ($($variant: ident),*) => {
        $(
            impl From<$variant> for AtomicRule {
                fn from(r: $variant) -> Self {
                    AtomicRule::$variant(r)
                }
            }

            impl From<$variant> for Rule {
                fn from(r: $variant) -> Self {
                    Rule::Atomic(AtomicRule::$variant(r))
                }
            }
        )*
    }
}

atomic_conversions!(Literal, CharRanges, DelimitedContent, EndOfInput, Pattern);

impl From<AtomicRule> for Rule {
    fn from(r: AtomicRule) -> Self {
        Rule::Atomic(r)
    }
}

impl From<CompositeRule> for Rule {
    fn from(r: CompositeRule) -> Self {
        Rule::Composite(r)
    }
}
