//! Group elements and the aggregations which combine them.
//!
//! A group [Element] is the unit of repetition: a [Cardinality] wrapped around a reference to a
//! production, an inline atomic rule, or a nested [Group]. A [Group] combines elements into a
//! single recognition step, in one of three ways: an ordered [Sequence], an ordered [Choice],
//! or an unordered [Set].

use crate::{
    cardinality::{Cardinality, Repeatable},
    grammar::LanguageContext,
    input::Cursor,
    node::NodeSequence,
    path::SymbolPath,
    result::{GroupError, GroupResult, RecognitionError},
    rules::{AtomicRule, Recognizer},
};

mod choice;
mod sequence;
mod set;

pub use self::{choice::Choice, sequence::Sequence, set::Set};

/// What a group element recognizes on each repetition.
#[derive(Clone, Debug)]
pub enum ElementKind {
    /// A reference, by symbol name, to a production. References are resolved through the
    /// [LanguageContext] at recognition time, so they may refer forwards.
    Ref(String),
    /// An atomic rule used directly. Its atoms are named `@<kind>` (e.g. `@Literal`).
    Atomic(AtomicRule),
    Group(Group),
}

#[derive(Clone, Debug)]
pub struct Element {
    kind: ElementKind,
    cardinality: Cardinality,
}

impl Element {
    pub fn new(kind: ElementKind, cardinality: Cardinality) -> Self {
        Element { kind, cardinality }
    }

    /// A reference to the production `symbol`, occurring exactly once.
    pub fn reference(symbol: &str) -> Self {
        Element::new(ElementKind::Ref(symbol.to_owned()), Cardinality::once())
    }

    /// An inline atomic rule, occurring exactly once.
    pub fn atomic<R: Into<AtomicRule>>(rule: R) -> Self {
        Element::new(ElementKind::Atomic(rule.into()), Cardinality::once())
    }

    /// A nested group, occurring exactly once.
    pub fn group<G: Into<Group>>(group: G) -> Self {
        Element::new(ElementKind::Group(group.into()), Cardinality::once())
    }

    /// This element with its cardinality replaced by `cardinality`.
    pub fn repeated(self, cardinality: Cardinality) -> Self {
        Element {
            kind: self.kind,
            cardinality,
        }
    }

    pub fn kind(&self) -> &ElementKind {
        &self.kind
    }

    pub fn cardinality(&self) -> Cardinality {
        self.cardinality
    }

    /// Recognize this element as many times as its cardinality allows.
    pub fn try_recognize(
        &self,
        cursor: &mut Cursor<'_>,
        path: &SymbolPath,
        ctx: &LanguageContext<'_>,
    ) -> GroupResult {
        self.cardinality.try_repeat(cursor, path, ctx, self)
    }
}

impl Repeatable for Element {
    fn try_recognize_once(
        &self,
        cursor: &mut Cursor<'_>,
        path: &SymbolPath,
        ctx: &LanguageContext<'_>,
    ) -> GroupResult {
        match &self.kind {
            ElementKind::Ref(symbol) => match ctx.grammar().production(symbol) {
                Some(prod) => prod
                    .try_recognize(cursor, path, ctx)
                    .map(NodeSequence::from)
                    .map_err(GroupError::from),
                None => {
                    Err(RecognitionError::failed(&path.child(symbol), cursor.position()).into())
                }
            },
            ElementKind::Atomic(rule) => rule
                .try_recognize(cursor, &path.child(&format!("@{}", rule.kind_name())), ctx)
                .map(NodeSequence::from)
                .map_err(GroupError::from),
            ElementKind::Group(group) => group.try_recognize(cursor, path, ctx),
        }
    }
}

/// A group aggregation.
#[derive(Clone, Debug)]
pub enum Group {
    Sequence(Sequence),
    Choice(Choice),
    Set(Set),
}

impl Group {
    pub fn elements(&self) -> &[Element] {
        match self {
            Group::Sequence(g) => g.elements(),
            Group::Choice(g) => g.elements(),
            Group::Set(g) => g.elements(),
        }
    }

    /// Recognize this group once. On failure the cursor is left at its entry position.
    pub fn try_recognize(
        &self,
        cursor: &mut Cursor<'_>,
        path: &SymbolPath,
        ctx: &LanguageContext<'_>,
    ) -> GroupResult {
        match self {
            Group::Sequence(g) => g.try_recognize(cursor, path, ctx),
            Group::Choice(g) => g.try_recognize(cursor, path, ctx),
            Group::Set(g) => g.try_recognize(cursor, path, ctx),
        }
    }
}

impl From<Sequence> for Group {
    fn from(g: Sequence) -> Self {
        Group::Sequence(g)
    }
}

impl From<Choice> for Group {
    fn from(g: Choice) -> Self {
        Group::Choice(g)
    }
}

impl From<Set> for Group {
    fn from(g: Set) -> Self {
        Group::Set(g)
    }
}
