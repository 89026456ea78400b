#![allow(clippy::new_without_default)]
#![allow(clippy::upper_case_acronyms)]

//! A grammar-driven recognition engine which turns a sequence of tokens (here: the `char`s of a
//! string) into a concrete syntax tree (CST).
//!
//! We use the following terminology throughout:
//!
//!   * A *grammar* is a set of named *productions* with a distinguished *root*.
//!   * A *production* gives a name (its *symbol*) to a *rule*.
//!   * A *rule* is either *atomic* (a leaf matcher such as a literal or a character range) or
//!     *composite* (a *group* of elements, combined as a sequence, a choice or an unordered set).
//!   * A *group element* wraps a reference to a production, an atomic rule, or a nested group in a
//!     *cardinality*, which says how many times it must and may occur.
//!
//! For example, with the productions:
//!
//!   num: "#" digit{1,};
//!   digit: [0-9];
//!
//! recognizing `#42` as `num` produces a composite node `num` whose children are an atom for `#`
//! and two `digit` atoms.
//!
//! Recognition is backtracking: every rule either succeeds, leaving the cursor after what it
//! recognized, or fails, leaving the cursor where it found it. Failures come in two kinds (see
//! [RecognitionError]): a *failed* recognition consumed nothing and lets callers try something
//! else; a *partial* one had already committed to the symbol and is reported to the top.
//!
//! The main entry points are [Grammar::new], which validates a grammar, and
//! [Grammar::recognize] / [LanguageContext::recognize].

pub mod cardinality;
pub mod composite;
pub mod grammar;
pub mod group;
pub mod input;
pub mod node;
pub mod path;
pub mod production;
pub mod result;
pub mod rules;
pub mod segment;
#[cfg(test)]
mod test_utils;

pub use crate::{
    cardinality::Cardinality,
    composite::CompositeRule,
    grammar::{Grammar, GrammarValidationError, GrammarViolation, LanguageContext},
    group::{Choice, Element, ElementKind, Group, Sequence, Set},
    input::{Cursor, Source},
    node::{Node, NodeSequence},
    path::SymbolPath,
    production::{Production, ProductionValidator, ValidationError},
    result::{GroupError, GroupResult, RecognitionError, RecognitionResult},
    rules::{AtomicRule, Recognizer, Rule, RuleError},
    segment::Segment,
};
