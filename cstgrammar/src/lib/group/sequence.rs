use super::Element;
use crate::{
    grammar::LanguageContext,
    input::Cursor,
    node::NodeSequence,
    path::SymbolPath,
    result::GroupResult,
    rules::RuleError,
};

/// Elements recognized one after the other, in declaration order.
#[derive(Clone, Debug)]
pub struct Sequence {
    elements: Vec<Element>,
}

impl Sequence {
    pub fn new(elements: Vec<Element>) -> Result<Self, RuleError> {
        if elements.is_empty() {
            return Err(RuleError::EmptyGroup);
        }
        Ok(Sequence { elements })
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    /// Recognize every element in order. If the first element fails, nothing has been
    /// recognized and the failure is reported with an element count of 0. If a later element
    /// fails, its element count is increased by the number of elements recognized before it, so
    /// that an enclosing threshold sees how far recognition got.
    pub(crate) fn try_recognize(
        &self,
        cursor: &mut Cursor<'_>,
        path: &SymbolPath,
        ctx: &LanguageContext<'_>,
    ) -> GroupResult {
        let mut txn = cursor.transaction();
        let mut seq = NodeSequence::default();
        for (i, e) in self.elements.iter().enumerate() {
            match e.try_recognize(&mut txn, path, ctx) {
                Ok(s) => seq.append(s),
                Err(err) if i == 0 => return Err(err.with_element_count(0)),
                Err(err) => {
                    let count = i + err.element_count();
                    return Err(err.with_element_count(count));
                }
            }
        }
        txn.commit();
        Ok(seq)
    }
}

#[cfg(test)]
mod test {
    use super::Sequence;
    use crate::{
        cardinality::Cardinality,
        group::Element,
        input::Cursor,
        path::SymbolPath,
        rules::{RuleError, literal::Literal},
        test_utils::{empty_context, lit},
    };

    fn abc() -> Sequence {
        Sequence::new(vec![lit("a"), lit("b"), lit("c")]).unwrap()
    }

    #[test]
    fn test_success() {
        let ctx = empty_context();
        let mut c = Cursor::new("abcd");
        let seq = abc()
            .try_recognize(&mut c, &SymbolPath::root("s"), &ctx)
            .unwrap();
        assert_eq!(seq.len(), 3);
        assert_eq!(c.position(), 3);
    }

    #[test]
    fn test_first_failure() {
        let ctx = empty_context();
        let mut c = Cursor::new("xbc");
        let e = abc()
            .try_recognize(&mut c, &SymbolPath::root("s"), &ctx)
            .unwrap_err();
        assert_eq!(e.element_count(), 0);
        assert!(e.cause().is_failed());
        assert_eq!(c.position(), 0);
    }

    #[test]
    fn test_later_failure() {
        let ctx = empty_context();
        let mut c = Cursor::new("axc");
        let e = abc()
            .try_recognize(&mut c, &SymbolPath::root("s"), &ctx)
            .unwrap_err();
        assert_eq!(e.element_count(), 1);
        assert!(e.cause().is_failed());
        assert_eq!(e.cause().position(), 1);
        assert_eq!(c.position(), 0);

        let mut c = Cursor::new("abx");
        let e = abc()
            .try_recognize(&mut c, &SymbolPath::root("s"), &ctx)
            .unwrap_err();
        assert_eq!(e.element_count(), 2);
    }

    #[test]
    fn test_nested_counts_accumulate() {
        // [a, [b, c, d]] failing at 'd' has recognized a, b, and c.
        let ctx = empty_context();
        let inner = Sequence::new(vec![lit("b"), lit("c"), lit("d")]).unwrap();
        let outer = Sequence::new(vec![lit("a"), Element::group(inner)]).unwrap();
        let e = outer
            .try_recognize(&mut Cursor::new("abcx"), &SymbolPath::root("s"), &ctx)
            .unwrap_err();
        assert_eq!(e.element_count(), 3);
    }

    #[test]
    fn test_optional_elements() {
        let ctx = empty_context();
        let s = Sequence::new(vec![
            lit("a"),
            Element::atomic(Literal::new("b").unwrap()).repeated(Cardinality::optional()),
            lit("c"),
        ])
        .unwrap();
        for input in ["abc", "ac"] {
            let mut c = Cursor::new(input);
            assert!(s.try_recognize(&mut c, &SymbolPath::root("s"), &ctx).is_ok());
            assert_eq!(c.position(), input.len());
        }
    }

    #[test]
    fn test_empty() {
        assert!(matches!(Sequence::new(vec![]), Err(RuleError::EmptyGroup)));
    }
}
