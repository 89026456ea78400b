//! Static properties of a grammar's productions, each computed as a fixed point over the
//! production indices of a [Grammar].

use vob::Vob;

use super::Grammar;
use crate::{
    group::{Element, ElementKind, Group},
    rules::Rule,
};

/// Call `f` on the name of every production referenced anywhere in `rule`.
pub(super) fn references<'a>(rule: &'a Rule, f: &mut dyn FnMut(&'a str)) {
    if let Rule::Composite(c) = rule {
        group_references(c.group(), f);
    }
}

fn group_references<'a>(group: &'a Group, f: &mut dyn FnMut(&'a str)) {
    for e in group.elements() {
        match e.kind() {
            ElementKind::Ref(s) => f(s),
            ElementKind::Atomic(_) => (),
            ElementKind::Group(g) => group_references(g, f),
        }
    }
}

/// Which productions can be reached from the root.
pub(super) fn reachable(grm: &Grammar) -> Vob {
    let mut seen = Vob::from_elem(false, grm.productions_len());
    let mut todo = Vec::new();
    if let Some(i) = grm.production_index(grm.root()) {
        seen.set(i, true);
        todo.push(grm.root());
    }
    while let Some(sym) = todo.pop() {
        let Some(prod) = grm.production(sym) else {
            continue;
        };
        references(prod.rule(), &mut |r| {
            if let Some(i) = grm.production_index(r) {
                if !seen[i] {
                    seen.set(i, true);
                    todo.push(r);
                }
            }
        });
    }
    seen
}

/// Iterate `step` over every production until no further production gains the property it
/// computes. Unknown references never have the property.
fn fixed_point(grm: &Grammar, step: fn(&Rule, &dyn Fn(&str) -> bool) -> bool) -> Vob {
    let mut props = Vob::from_elem(false, grm.productions_len());
    loop {
        let mut changed = false;
        for (i, prod) in grm.productions().enumerate() {
            if props[i] {
                continue;
            }
            let has = |s: &str| grm.production_index(s).is_some_and(|j| props[j]);
            if step(prod.rule(), &has) {
                props.set(i, true);
                changed = true;
            }
        }
        if !changed {
            return props;
        }
    }
}

/// Which productions can succeed without consuming any input.
pub(super) fn nullable(grm: &Grammar) -> Vob {
    fixed_point(grm, |rule, nullable| match rule {
        Rule::Atomic(r) => r.is_nullable(),
        Rule::Composite(c) => group_nullable(c.group(), nullable),
    })
}

pub(super) fn element_nullable(e: &Element, nullable: &dyn Fn(&str) -> bool) -> bool {
    if e.cardinality().min() == 0 {
        return true;
    }
    match e.kind() {
        ElementKind::Ref(s) => nullable(s),
        ElementKind::Atomic(r) => r.is_nullable(),
        ElementKind::Group(g) => group_nullable(g, nullable),
    }
}

fn group_nullable(group: &Group, nullable: &dyn Fn(&str) -> bool) -> bool {
    match group {
        Group::Sequence(s) => s.elements().iter().all(|e| element_nullable(e, nullable)),
        Group::Choice(c) => c.elements().iter().any(|e| element_nullable(e, nullable)),
        // A set only takes elements which consume input, so it matches nothing only when enough
        // of its elements are optional.
        Group::Set(s) => {
            s.elements()
                .iter()
                .filter(|e| e.cardinality().min() == 0)
                .count()
                >= s.required()
        }
    }
}

/// Which productions can succeed on some input, i.e. have at least one way of recognizing that
/// eventually bottoms out in atomic rules.
pub(super) fn productive(grm: &Grammar) -> Vob {
    fixed_point(grm, |rule, productive| match rule {
        Rule::Atomic(_) => true,
        Rule::Composite(c) => group_productive(c.group(), productive),
    })
}

fn element_productive(e: &Element, productive: &dyn Fn(&str) -> bool) -> bool {
    if e.cardinality().min() == 0 {
        return true;
    }
    match e.kind() {
        ElementKind::Ref(s) => productive(s),
        ElementKind::Atomic(_) => true,
        ElementKind::Group(g) => group_productive(g, productive),
    }
}

fn group_productive(group: &Group, productive: &dyn Fn(&str) -> bool) -> bool {
    match group {
        Group::Sequence(s) => s.elements().iter().all(|e| element_productive(e, productive)),
        Group::Choice(c) => c.elements().iter().any(|e| element_productive(e, productive)),
        Group::Set(s) => {
            s.elements()
                .iter()
                .filter(|e| element_productive(e, productive))
                .count()
                >= s.required()
        }
    }
}

/// Call `f` on every production `group` may invoke before it has consumed any input.
fn left_calls<'a>(group: &'a Group, nullable: &dyn Fn(&str) -> bool, f: &mut dyn FnMut(&'a str)) {
    let elements = group.elements();
    let ordered = matches!(group, Group::Sequence(_));
    for e in elements {
        match e.kind() {
            ElementKind::Ref(s) => f(s),
            ElementKind::Atomic(_) => (),
            ElementKind::Group(g) => left_calls(g, nullable, f),
        }
        if ordered && !element_nullable(e, nullable) {
            break;
        }
    }
}

/// Which productions can call themselves again without any input having been consumed in
/// between. Recognizing any of them would recurse forever.
pub(super) fn left_recursive(grm: &Grammar, nullable: &Vob) -> Vob {
    let len = grm.productions_len();
    let is_nullable = |s: &str| grm.production_index(s).is_some_and(|i| nullable[i]);
    let mut edges = Vec::with_capacity(len);
    for prod in grm.productions() {
        let mut out = Vob::from_elem(false, len);
        if let Rule::Composite(c) = prod.rule() {
            left_calls(c.group(), &is_nullable, &mut |s| {
                if let Some(i) = grm.production_index(s) {
                    out.set(i, true);
                }
            });
        }
        edges.push(out);
    }

    let mut recursive = Vob::from_elem(false, len);
    for from in 0..len {
        let mut seen = Vob::from_elem(false, len);
        let mut todo = vec![from];
        while let Some(i) = todo.pop() {
            for j in edges[i].iter_set_bits(..) {
                if j == from {
                    recursive.set(from, true);
                    todo.clear();
                    break;
                }
                if !seen[j] {
                    seen.set(j, true);
                    todo.push(j);
                }
            }
        }
    }
    recursive
}

#[cfg(test)]
mod test {
    use super::{left_recursive, nullable, productive, reachable};
    use crate::{
        cardinality::Cardinality,
        grammar::Grammar,
        group::{Choice, Element, Sequence},
        production::Production,
        rules::{Rule, eof::EndOfInput, literal::Literal},
    };

    fn lit(s: &str) -> Rule {
        Literal::new(s).unwrap().into()
    }

    fn seq(elements: Vec<Element>) -> Rule {
        Sequence::new(elements).unwrap().into()
    }

    /// Build a grammar without validating it.
    fn grammar(prods: Vec<Production>) -> Grammar {
        Grammar {
            root: prods[0].symbol().to_owned(),
            productions: prods
                .into_iter()
                .map(|p| (p.symbol().to_owned(), p))
                .collect(),
        }
    }

    fn bits(v: &vob::Vob) -> Vec<bool> {
        v.iter().collect()
    }

    #[test]
    fn test_reachable() {
        let g = grammar(vec![
            Production::new("s", seq(vec![Element::reference("a"), Element::reference("x")])),
            Production::new("a", lit("a")),
            Production::new("b", seq(vec![Element::reference("a")])),
        ]);
        assert_eq!(bits(&reachable(&g)), vec![true, true, false]);
    }

    #[test]
    fn test_nullable() {
        let g = grammar(vec![
            Production::new(
                "s",
                seq(vec![
                    Element::reference("a").repeated(Cardinality::zero_or_more()),
                    Element::reference("e"),
                ]),
            ),
            Production::new("a", lit("a")),
            Production::new("e", EndOfInput.into()),
            Production::new("t", seq(vec![Element::reference("e"), Element::reference("a")])),
        ]);
        assert_eq!(bits(&nullable(&g)), vec![true, false, true, false]);
    }

    #[test]
    fn test_productive() {
        let g = grammar(vec![
            Production::new("s", seq(vec![Element::reference("s")])),
            Production::new(
                "t",
                Choice::new(vec![
                    Element::reference("t"),
                    Element::atomic(Literal::new("x").unwrap()),
                ])
                .unwrap()
                .into(),
            ),
            Production::new("u", seq(vec![Element::reference("v")])),
            Production::new("v", seq(vec![Element::reference("u")])),
            Production::new("w", seq(vec![Element::reference("missing")])),
        ]);
        assert_eq!(bits(&productive(&g)), vec![false, true, false, false, false]);
    }

    #[test]
    fn test_left_recursive() {
        let g = grammar(vec![
            // e: "(" e ")" | "x"
            Production::new(
                "e",
                Choice::new(vec![
                    Element::group(
                        Sequence::new(vec![
                            Element::atomic(Literal::new("(").unwrap()),
                            Element::reference("e"),
                            Element::atomic(Literal::new(")").unwrap()),
                        ])
                        .unwrap(),
                    ),
                    Element::atomic(Literal::new("x").unwrap()),
                ])
                .unwrap()
                .into(),
            ),
            // l: l "+" "x" | "x"
            Production::new(
                "l",
                Choice::new(vec![
                    Element::group(
                        Sequence::new(vec![
                            Element::reference("l"),
                            Element::atomic(Literal::new("+").unwrap()),
                        ])
                        .unwrap(),
                    ),
                    Element::atomic(Literal::new("x").unwrap()),
                ])
                .unwrap()
                .into(),
            ),
            // h: o? h "y", where o is optional so h is called first.
            Production::new(
                "h",
                seq(vec![
                    Element::reference("o").repeated(Cardinality::optional()),
                    Element::reference("h"),
                    Element::atomic(Literal::new("y").unwrap()),
                ]),
            ),
            Production::new("o", lit("o")),
        ]);
        let n = nullable(&g);
        assert_eq!(bits(&left_recursive(&g, &n)), vec![false, true, true, false]);
    }
}
