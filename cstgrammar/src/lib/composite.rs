use tracing::trace;

use crate::{
    grammar::LanguageContext,
    group::{Choice, Group, Sequence, Set},
    input::Cursor,
    node::Node,
    path::SymbolPath,
    result::{RecognitionError, RecognitionResult},
    rules::{Recognizer, Rule, RuleError},
};

/// A rule built from a single top-level group aggregation.
///
/// The optional recognition threshold expresses "once this much has been seen, the input *must*
/// be this symbol": when the group fails with a failed (rather than partial) cause after
/// recognizing at least `threshold` elements, the failure is promoted to a partial recognition,
/// so that callers don't go on to try alternatives. Promotion only happens if the group consumed
/// at least one token before failing: elements which matched nothing (e.g. optional ones) count
/// towards the threshold, but a partial recognition always commits to some input. This is the
/// only place in which a failed recognition is ever turned into a partial one.
#[derive(Clone, Debug)]
pub struct CompositeRule {
    group: Group,
    threshold: Option<usize>,
}

impl CompositeRule {
    pub fn new<G: Into<Group>>(group: G) -> Self {
        CompositeRule {
            group: group.into(),
            threshold: None,
        }
    }

    pub fn with_threshold<G: Into<Group>>(group: G, threshold: usize) -> Result<Self, RuleError> {
        if threshold == 0 {
            return Err(RuleError::ZeroThreshold);
        }
        Ok(CompositeRule {
            group: group.into(),
            threshold: Some(threshold),
        })
    }

    pub fn group(&self) -> &Group {
        &self.group
    }

    pub fn threshold(&self) -> Option<usize> {
        self.threshold
    }
}

impl Recognizer for CompositeRule {
    fn try_recognize(
        &self,
        cursor: &mut Cursor<'_>,
        path: &SymbolPath,
        ctx: &LanguageContext<'_>,
    ) -> RecognitionResult {
        let start = cursor.position();
        match self.group.try_recognize(cursor, path, ctx) {
            Ok(seq) => Ok(Node::composite(
                path.symbol(),
                cursor.segment_from(start),
                seq.into_nodes(),
            )),
            Err(err) => {
                debug_assert_eq!(cursor.position(), start);
                let length = err.cause().stop_position().saturating_sub(start);
                match self.threshold {
                    Some(t)
                        if err.cause().is_failed() && err.element_count() >= t && length > 0 =>
                    {
                        trace!(
                            "Promoting failure of '{}' to partial ({} elements, threshold {})",
                            path,
                            err.element_count(),
                            t
                        );
                        Err(RecognitionError::promoted(path, start, length, err.into_cause()))
                    }
                    _ => Err(err.into_cause()),
                }
            }
        }
    }
}

macro_rules! group_conversions {
    ($($group: ident),*) => {
        $(
            impl From<$group> for CompositeRule {
                fn from(g: $group) -> Self {
                    CompositeRule::new(g)
                }
            }

            impl From<$group> for Rule {
                fn from(g: $group) -> Self {
                    Rule::Composite(CompositeRule::new(g))
                }
            }
        )*
    }
}

group_conversions!(Sequence, Choice, Set);

#[cfg(test)]
mod test {
    use super::CompositeRule;
    use crate::{
        cardinality::Cardinality,
        group::Sequence,
        input::Cursor,
        path::SymbolPath,
        result::RecognitionError,
        rules::{Recognizer, RuleError},
        test_utils::{empty_context, lit},
    };

    fn abc() -> Sequence {
        Sequence::new(vec![lit("a"), lit("b"), lit("c")]).unwrap()
    }

    #[test]
    fn test_success() {
        let ctx = empty_context();
        let r = CompositeRule::new(abc());
        let mut c = Cursor::new("abc!");
        let n = r.try_recognize(&mut c, &SymbolPath::root("r"), &ctx).unwrap();
        assert_eq!(n.symbol(), "r");
        assert_eq!(n.nodes().len(), 3);
        assert_eq!(n.segment().count(), 3);
    }

    #[test]
    fn test_threshold_promotion() {
        let ctx = empty_context();
        let path = SymbolPath::root("r");

        let r = CompositeRule::with_threshold(abc(), 1).unwrap();
        let mut c = Cursor::new("ax");
        let e = r.try_recognize(&mut c, &path, &ctx).unwrap_err();
        assert!(e.is_partial());
        assert_eq!((e.position(), e.length()), (0, 1));
        assert_eq!(e.path(), &path);
        assert_eq!(
            e.cause(),
            Some(&RecognitionError::failed(&path.child("@Literal"), 1))
        );
        assert_eq!(c.position(), 0);

        let r = CompositeRule::with_threshold(abc(), 3).unwrap();
        let e = r.try_recognize(&mut Cursor::new("ax"), &path, &ctx).unwrap_err();
        assert!(e.is_failed());
        assert_eq!(e.path().to_string(), "r/@Literal");
    }

    #[test]
    fn test_no_promotion_without_progress() {
        // The optional 'x' counts towards the threshold, but nothing has been consumed when 'a'
        // fails, so the input never started this symbol.
        let ctx = empty_context();
        let path = SymbolPath::root("r");
        let seq = Sequence::new(vec![
            lit("x").repeated(Cardinality::optional()),
            lit("a"),
            lit("b"),
        ])
        .unwrap();
        let r = CompositeRule::with_threshold(seq, 1).unwrap();
        let mut c = Cursor::new("z");
        let e = r.try_recognize(&mut c, &path, &ctx).unwrap_err();
        assert_eq!(e, RecognitionError::failed(&path.child("@Literal"), 0));
        assert_eq!(c.position(), 0);

        let e = r.try_recognize(&mut Cursor::new("ac"), &path, &ctx).unwrap_err();
        assert!(e.is_partial());
        assert_eq!(e.length(), 1);
        assert_eq!(e.deepest().path().to_string(), "r/@Literal");
        assert_eq!(e.deepest().position(), 1);
    }

    #[test]
    fn test_no_threshold_passes_through() {
        let ctx = empty_context();
        let r = CompositeRule::new(abc());
        let e = r
            .try_recognize(&mut Cursor::new("abx"), &SymbolPath::root("r"), &ctx)
            .unwrap_err();
        assert!(e.is_failed());
    }

    #[test]
    fn test_zero_threshold() {
        assert!(matches!(
            CompositeRule::with_threshold(abc(), 0),
            Err(RuleError::ZeroThreshold)
        ));
    }
}
