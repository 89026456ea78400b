use std::{error::Error, fmt};

use super::{Grammar, analysis};

/// One kind of problem with a grammar, listing every production (or reference) affected.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GrammarViolation {
    /// The root symbol names no production.
    MissingRoot(String),
    /// More than one production has the same symbol.
    DuplicateProductions(Vec<String>),
    /// `(production, reference)` pairs where `reference` names no production.
    UnknownReferences(Vec<(String, String)>),
    /// Productions which cannot be reached from the root.
    UnreachableProductions(Vec<String>),
    /// Productions which can never recognize anything, because every way of recognizing them
    /// recurses without reaching an atomic rule.
    NonTerminating(Vec<String>),
    /// Productions which can call themselves without consuming any input.
    UnboundedRecursion(Vec<String>),
}

impl fmt::Display for GrammarViolation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            GrammarViolation::MissingRoot(r) => write!(f, "Root symbol '{}' has no production", r),
            GrammarViolation::DuplicateProductions(syms) => {
                write!(f, "Duplicate productions: {}", syms.join(", "))
            }
            GrammarViolation::UnknownReferences(refs) => {
                let s = refs
                    .iter()
                    .map(|(p, r)| format!("'{}' in '{}'", r, p))
                    .collect::<Vec<_>>();
                write!(f, "Unknown symbol references: {}", s.join(", "))
            }
            GrammarViolation::UnreachableProductions(syms) => {
                write!(f, "Productions unreachable from the root: {}", syms.join(", "))
            }
            GrammarViolation::NonTerminating(syms) => {
                write!(f, "Productions which never terminate: {}", syms.join(", "))
            }
            GrammarViolation::UnboundedRecursion(syms) => write!(
                f,
                "Productions which recurse without consuming input: {}",
                syms.join(", ")
            ),
        }
    }
}

/// The reasons a grammar could not be constructed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GrammarValidationError {
    violations: Vec<GrammarViolation>,
}

impl GrammarValidationError {
    pub(super) fn new(violations: Vec<GrammarViolation>) -> Self {
        GrammarValidationError { violations }
    }

    pub fn violations(&self) -> &[GrammarViolation] {
        &self.violations
    }
}

impl Error for GrammarValidationError {}

impl fmt::Display for GrammarValidationError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Invalid grammar:")?;
        for v in &self.violations {
            write!(f, "\n  {}", v)?;
        }
        Ok(())
    }
}

/// Check `grm`, returning at most one violation of each kind.
pub(super) fn violations(grm: &Grammar) -> Vec<GrammarViolation> {
    let mut violations = Vec::new();

    if !grm.contains_production(grm.root()) {
        violations.push(GrammarViolation::MissingRoot(grm.root().to_owned()));
    }

    let mut unknown = Vec::new();
    for prod in grm.productions() {
        analysis::references(prod.rule(), &mut |r| {
            if !grm.contains_production(r)
                && !unknown
                    .iter()
                    .any(|(p, u): &(String, String)| p == prod.symbol() && u == r)
            {
                unknown.push((prod.symbol().to_owned(), r.to_owned()));
            }
        });
    }
    if !unknown.is_empty() {
        violations.push(GrammarViolation::UnknownReferences(unknown));
    }

    // With a missing root, every production would be reported as unreachable, which says
    // nothing new.
    if grm.contains_production(grm.root()) {
        let reachable = analysis::reachable(grm);
        let unreachable = symbols_where(grm, |i| !reachable[i]);
        if !unreachable.is_empty() {
            violations.push(GrammarViolation::UnreachableProductions(unreachable));
        }
    }

    // A production that depends on an unknown reference has already been reported.
    let productive = analysis::productive(grm);
    let nonterminating = symbols_where(grm, |i| !productive[i]);
    let nonterminating = nonterminating
        .into_iter()
        .filter(|s| !depends_only_on_unknowns(grm, s))
        .collect::<Vec<_>>();
    if !nonterminating.is_empty() {
        violations.push(GrammarViolation::NonTerminating(nonterminating));
    }

    let nullable = analysis::nullable(grm);
    let recursive = analysis::left_recursive(grm, &nullable);
    let recursive = symbols_where(grm, |i| recursive[i]);
    if !recursive.is_empty() {
        violations.push(GrammarViolation::UnboundedRecursion(recursive));
    }

    violations
}

fn symbols_where<F: Fn(usize) -> bool>(grm: &Grammar, f: F) -> Vec<String> {
    grm.productions()
        .enumerate()
        .filter(|(i, _)| f(*i))
        .map(|(_, p)| p.symbol().to_owned())
        .collect()
}

/// Is `symbol`'s only problem that it refers to productions which do not exist?
fn depends_only_on_unknowns(grm: &Grammar, symbol: &str) -> bool {
    let Some(prod) = grm.production(symbol) else {
        return false;
    };
    let mut any_unknown = false;
    let mut any_known = false;
    analysis::references(prod.rule(), &mut |r| {
        if grm.contains_production(r) {
            any_known = true;
        } else {
            any_unknown = true;
        }
    });
    any_unknown && !any_known
}

#[cfg(test)]
mod test {
    use super::GrammarViolation;
    use crate::{
        cardinality::Cardinality,
        grammar::Grammar,
        group::{Choice, Element, Sequence},
        production::Production,
        rules::{Rule, literal::Literal},
    };

    fn lit(s: &str) -> Element {
        Element::atomic(Literal::new(s).unwrap())
    }

    fn seq(elements: Vec<Element>) -> Rule {
        Sequence::new(elements).unwrap().into()
    }

    fn violations(root: &str, prods: Vec<Production>) -> Vec<GrammarViolation> {
        Grammar::new(root, prods).unwrap_err().violations().to_vec()
    }

    #[test]
    fn test_unknown_reference() {
        let v = violations(
            "s",
            vec![Production::new("s", seq(vec![lit("a"), Element::reference("t")]))],
        );
        assert_eq!(
            v,
            vec![GrammarViolation::UnknownReferences(vec![(
                "s".to_owned(),
                "t".to_owned()
            )])]
        );
    }

    #[test]
    fn test_missing_root() {
        let v = violations("s", vec![Production::new("t", seq(vec![lit("a")]))]);
        assert_eq!(v, vec![GrammarViolation::MissingRoot("s".to_owned())]);
    }

    #[test]
    fn test_self_reference_without_leaf() {
        let v = violations(
            "s",
            vec![Production::new(
                "s",
                seq(vec![Element::reference("s").repeated(Cardinality::one_or_more())]),
            )],
        );
        assert!(v.contains(&GrammarViolation::NonTerminating(vec!["s".to_owned()])));
    }

    #[test]
    fn test_mutual_reference_without_leaf() {
        let v = violations(
            "a",
            vec![
                Production::new("a", seq(vec![lit("x"), Element::reference("b")])),
                Production::new("b", seq(vec![lit("y"), Element::reference("a")])),
            ],
        );
        assert_eq!(
            v,
            vec![GrammarViolation::NonTerminating(vec![
                "a".to_owned(),
                "b".to_owned()
            ])]
        );
    }

    #[test]
    fn test_parenthesized_recursion_is_valid() {
        let expr = Choice::new(vec![
            Element::group(
                Sequence::new(vec![lit("("), Element::reference("expr"), lit(")")]).unwrap(),
            ),
            lit("x"),
        ])
        .unwrap();
        let g = Grammar::new("expr", vec![Production::new("expr", expr.into())]).unwrap();
        assert!(g.recognize_all("expr", "((x))").is_ok());
    }

    #[test]
    fn test_left_recursion() {
        let sum = Choice::new(vec![
            Element::group(
                Sequence::new(vec![Element::reference("sum"), lit("+"), lit("x")]).unwrap(),
            ),
            lit("x"),
        ])
        .unwrap();
        let v = violations("sum", vec![Production::new("sum", sum.into())]);
        assert_eq!(
            v,
            vec![GrammarViolation::UnboundedRecursion(vec!["sum".to_owned()])]
        );
    }

    #[test]
    fn test_violations_are_collected() {
        let v = violations(
            "s",
            vec![
                Production::new("s", seq(vec![lit("a"), Element::reference("missing")])),
                Production::new("orphan", seq(vec![lit("o")])),
                Production::new("loop", seq(vec![Element::reference("loop")])),
            ],
        );
        assert_eq!(
            v,
            vec![
                GrammarViolation::UnknownReferences(vec![(
                    "s".to_owned(),
                    "missing".to_owned()
                )]),
                GrammarViolation::UnreachableProductions(vec![
                    "orphan".to_owned(),
                    "loop".to_owned()
                ]),
                GrammarViolation::NonTerminating(vec!["loop".to_owned()]),
                GrammarViolation::UnboundedRecursion(vec!["loop".to_owned()]),
            ]
        );
    }
}
