use vob::Vob;

use super::Element;
use crate::{
    grammar::LanguageContext,
    input::Cursor,
    node::NodeSequence,
    path::SymbolPath,
    result::{GroupError, GroupResult, RecognitionError},
    rules::RuleError,
};

/// Elements recognized in any order, each according to its own cardinality.
///
/// By default every element must be recognized; a set built with [Set::with_minimum] instead
/// succeeds once at least that many elements have been.
#[derive(Clone, Debug)]
pub struct Set {
    elements: Vec<Element>,
    min_recognized: Option<usize>,
}

impl Set {
    /// A set which requires every element to be recognized.
    pub fn new(elements: Vec<Element>) -> Result<Self, RuleError> {
        if elements.is_empty() {
            return Err(RuleError::EmptyGroup);
        }
        Ok(Set {
            elements,
            min_recognized: None,
        })
    }

    /// A set which requires at least `min` of its elements to be recognized.
    pub fn with_minimum(elements: Vec<Element>, min: usize) -> Result<Self, RuleError> {
        if elements.is_empty() {
            return Err(RuleError::EmptyGroup);
        }
        if min == 0 || min > elements.len() {
            return Err(RuleError::SetMinimumOutOfRange {
                min,
                elements: elements.len(),
            });
        }
        Ok(Set {
            elements,
            min_recognized: Some(min),
        })
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    /// The explicitly configured minimum, if there is one.
    pub fn min_recognized(&self) -> Option<usize> {
        self.min_recognized
    }

    /// How many elements must be recognized for the set to succeed.
    pub fn required(&self) -> usize {
        self.min_recognized.unwrap_or(self.elements.len())
    }

    /// Find the best order in which to take the elements, exploring every order in which they
    /// can be recognized, so that whether the input is accepted doesn't depend on the order the
    /// elements were declared in. An element is only taken if it consumes input; one which
    /// matches without consuming anything still counts as recognized if its cardinality allows it
    /// to occur zero times. Of the orders found, one which satisfies the set is preferred, then
    /// one recognizing more elements, then one consuming more tokens; ties go to the order found
    /// first, i.e. the one closest to declaration order.
    ///
    /// If fewer elements than required were recognized, the set fails: with a failed cause if
    /// nothing was recognized, or with a partial cause (and the recognized count) otherwise. A
    /// partial cause from any element is propagated at once.
    pub(crate) fn try_recognize(
        &self,
        cursor: &mut Cursor<'_>,
        path: &SymbolPath,
        ctx: &LanguageContext<'_>,
    ) -> GroupResult {
        let mut txn = cursor.transaction();
        let entry = txn.entry();
        let mut taken = Vob::from_elem(false, self.elements.len());
        let best = self.search(&mut txn, path, ctx, &mut taken, 0)?;
        if best.satisfied {
            txn.reset(best.end);
            txn.commit();
            if best.matched == 0 {
                return Ok(NodeSequence::optional_empty());
            }
            return Ok(best.nodes);
        }
        if best.matched == 0 {
            Err(GroupError::new(0, RecognitionError::failed(path, entry)))
        } else {
            Err(GroupError::new(
                best.matched,
                RecognitionError::partial(path, entry, best.end - entry),
            ))
        }
    }

    /// The best way of recognizing the elements not yet `taken`, `matched` elements having been
    /// recognized already. The cursor is left where it was found.
    fn search(
        &self,
        cursor: &mut Cursor<'_>,
        path: &SymbolPath,
        ctx: &LanguageContext<'_>,
        taken: &mut Vob,
        matched: usize,
    ) -> Result<Candidate, GroupError> {
        let start = cursor.position();
        let optional = self
            .elements
            .iter()
            .enumerate()
            .filter(|(i, e)| !taken[*i] && e.cardinality().min() == 0)
            .count();
        let mut best = Candidate {
            satisfied: matched + optional >= self.required(),
            matched,
            end: start,
            nodes: NodeSequence::default(),
        };
        for (i, e) in self.elements.iter().enumerate() {
            if taken[i] {
                continue;
            }
            match e.try_recognize(cursor, path, ctx) {
                Ok(mut seq) if cursor.position() > start => {
                    taken.set(i, true);
                    let rest = self.search(cursor, path, ctx, taken, matched + 1);
                    taken.set(i, false);
                    cursor.reset(start);
                    let rest = rest?;
                    if rest.beats(&best) {
                        seq.append(rest.nodes);
                        best = Candidate { nodes: seq, ..rest };
                        if best.matched == self.elements.len() {
                            break;
                        }
                    }
                }
                Ok(_) => (),
                Err(err) if err.cause().is_partial() => {
                    let count = matched + err.element_count();
                    return Err(err.with_element_count(count));
                }
                Err(_) => (),
            }
        }
        Ok(best)
    }
}

/// One way of recognizing some of a set's elements.
struct Candidate {
    satisfied: bool,
    matched: usize,
    end: usize,
    nodes: NodeSequence,
}

impl Candidate {
    fn beats(&self, other: &Candidate) -> bool {
        (self.satisfied, self.matched, self.end) > (other.satisfied, other.matched, other.end)
    }
}
