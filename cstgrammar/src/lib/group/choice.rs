use super::Element;
use crate::{
    grammar::LanguageContext,
    input::Cursor,
    path::SymbolPath,
    result::{GroupError, GroupResult, RecognitionError},
    rules::RuleError,
};

/// Alternatives, tried in declaration order: the first that matches wins.
#[derive(Clone, Debug)]
pub struct Choice {
    elements: Vec<Element>,
}

impl Choice {
    pub fn new(elements: Vec<Element>) -> Result<Self, RuleError> {
        if elements.is_empty() {
            return Err(RuleError::EmptyGroup);
        }
        Ok(Choice { elements })
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    /// Try each alternative in turn. A failed alternative is the only kind of failure that is
    /// ever swallowed: a partial alternative is returned at once, without trying the rest. If
    /// every alternative fails, the failure of the alternative which got furthest (the earliest
    /// one on ties) is reported, with an element count of 0.
    pub(crate) fn try_recognize(
        &self,
        cursor: &mut Cursor<'_>,
        path: &SymbolPath,
        ctx: &LanguageContext<'_>,
    ) -> GroupResult {
        let mut furthest: Option<GroupError> = None;
        for e in &self.elements {
            match e.try_recognize(cursor, path, ctx) {
                Ok(seq) => return Ok(seq),
                Err(err) if err.cause().is_partial() => return Err(err),
                Err(err) => {
                    if furthest
                        .as_ref()
                        .is_none_or(|f| err.element_count() > f.element_count())
                    {
                        furthest = Some(err);
                    }
                }
            }
        }
        let err = furthest
            .unwrap_or_else(|| RecognitionError::failed(path, cursor.position()).into());
        Err(err.with_element_count(0))
    }
}
