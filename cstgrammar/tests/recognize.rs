use cstgrammar::{
    Cardinality, Choice, CompositeRule, Cursor, Element, Grammar, LanguageContext, Node,
    Production, Recognizer, Rule, Sequence, Set, Source, SymbolPath, ValidationError,
    rules::{
        delimited::DelimitedContent,
        eof::EndOfInput,
        literal::Literal,
        pattern::{MatchMode, Pattern},
        ranges::{CharRange, CharRanges},
    },
};
use rstest::rstest;

fn lit(s: &str) -> Element {
    Element::atomic(Literal::new(s).unwrap())
}

fn letters() -> Rule {
    Sequence::new(vec![
        Element::atomic(CharRanges::new(vec![CharRange::new('a', 'z').unwrap()], vec![]))
            .repeated(Cardinality::one_or_more()),
    ])
    .unwrap()
    .into()
}

/// root: "(" (expr | "-") ")", committing to `root` once "(" has been seen.
fn parens() -> Grammar {
    let body = Choice::new(vec![Element::reference("expr"), lit("-")]).unwrap();
    let root = Sequence::new(vec![lit("("), Element::group(body), lit(")")]).unwrap();
    Grammar::new(
        "root",
        vec![
            Production::new("root", CompositeRule::with_threshold(root, 1).unwrap().into()),
            Production::new("expr", letters()),
        ],
    )
    .unwrap()
}

#[test]
fn parenthesized_expression() {
    let g = parens();
    let src = Source::new("(abc)");
    let n = g.recognize_root(src.text()).unwrap();
    assert_eq!(n.symbol(), "root");
    assert_eq!(n.nodes().len(), 3);
    assert_eq!(n.child("expr").unwrap().text(&src), "abc");
    assert_eq!(
        n.pp(&src),
        "root\n @Literal \"(\"\n expr\n  @Ranges \"a\"\n  @Ranges \"b\"\n  @Ranges \"c\"\n @Literal \")\"\n"
    );

    let e = g.recognize_root("(abc").unwrap_err();
    assert!(e.is_partial());
    assert_eq!(e.path().to_string(), "root");
    assert_eq!(e.position(), 0);
    assert_eq!(e.length(), 4);

    // Nothing was committed to, so this is an ordinary failure.
    assert!(g.recognize_root("abc)").unwrap_err().is_failed());
}

#[test]
fn partial_recognition_is_not_retried() {
    // stmt: root | "(" letters; the partial `root` must not be masked by the second alternative.
    let g = parens();
    let stmt = Choice::new(vec![
        Element::reference("root"),
        Element::group(Sequence::new(vec![lit("("), Element::reference("expr")]).unwrap()),
    ])
    .unwrap();
    let mut prods = g.productions().cloned().collect::<Vec<_>>();
    prods.insert(0, Production::new("stmt", stmt.into()));
    let g = Grammar::new("stmt", prods).unwrap();
    let e = g.recognize_root("(abc").unwrap_err();
    assert!(e.is_partial());
    assert_eq!(e.path().to_string(), "stmt/root");
}

#[test]
fn threshold_needs_consumed_input() {
    // top: opt | "z", where opt commits after one element but starts with an optional one.
    let opt = Sequence::new(vec![
        lit("x").repeated(Cardinality::optional()),
        lit("a"),
        lit("b"),
    ])
    .unwrap();
    let top = Choice::new(vec![Element::reference("opt"), lit("z")]).unwrap();
    let g = Grammar::new(
        "top",
        vec![
            Production::new("top", top.into()),
            Production::new("opt", CompositeRule::with_threshold(opt, 1).unwrap().into()),
        ],
    )
    .unwrap();
    let n = g.recognize_root("z").unwrap();
    assert_eq!(n.nodes()[0].symbol(), "@Literal");
    assert_eq!(n.segment().count(), 1);

    let e = g.recognize_root("xaz").unwrap_err();
    assert!(e.is_partial());
    assert_eq!(e.path().to_string(), "top/opt");
    assert_eq!(e.length(), 2);
    assert_eq!(e.deepest().path().to_string(), "top/opt/@Literal");
    assert_eq!(e.deepest().position(), 2);
}

/// A grammar exercising every kind of rule, for the backtracking checks below.
fn kitchen_sink() -> Grammar {
    let string = DelimitedContent::builder("\"")
        .end("\"")
        .end_escape("\\\"")
        .build()
        .unwrap();
    let number = Pattern::new(
        "[0-9]+",
        MatchMode::Open {
            max_mismatch: 0,
            allow_empty: false,
        },
    )
    .unwrap();
    let attrs = Set::with_minimum(
        vec![
            lit("pub "),
            lit("const "),
            Element::atomic(Literal::case_insensitive("static ").unwrap()),
        ],
        1,
    )
    .unwrap();
    let value = Choice::new(vec![
        Element::reference("string"),
        Element::reference("number"),
    ])
    .unwrap();
    let decl = Sequence::new(vec![
        Element::group(attrs).repeated(Cardinality::optional()),
        Element::reference("name"),
        lit("="),
        Element::reference("value"),
        lit(";"),
    ])
    .unwrap();
    let file = Sequence::new(vec![
        Element::reference("decl").repeated(Cardinality::zero_or_more()),
        Element::atomic(EndOfInput),
    ])
    .unwrap();
    Grammar::new(
        "file",
        vec![
            Production::new("file", file.into()),
            Production::new("decl", CompositeRule::with_threshold(decl, 2).unwrap().into()),
            Production::new("name", letters()),
            Production::new("value", value.into()),
            Production::new("string", string.into()),
            Production::new("number", number.into()),
        ],
    )
    .unwrap()
}

#[rstest]
#[case("file", "")]
#[case("file", "a=1;")]
#[case("file", "pub STATIC x=\"y\\\"z\";b=22;")]
#[case("decl", "x=\"unterminated;")]
#[case("decl", "x=;")]
#[case("decl", "x")]
#[case("value", "?")]
#[case("string", "\"abc")]
#[case("number", "x1")]
#[case("file", "a=1;b=")]
fn backtrack_invariant(#[case] symbol: &str, #[case] input: &str) {
    let g = kitchen_sink();
    let ctx = LanguageContext::new(&g);
    let prod = g.production(symbol).unwrap();
    for start in 0..=input.chars().count() {
        let mut c = Cursor::new(input);
        c.reset(start);
        match prod.try_recognize(&mut c, &SymbolPath::root("top"), &ctx) {
            Ok(n) => {
                assert_eq!(n.segment().offset(), start);
                assert!(c.position() >= start);
            }
            Err(_) => assert_eq!(c.position(), start),
        }
    }
}

#[test]
fn kitchen_sink_results() {
    let g = kitchen_sink();
    let input = "pub STATIC x=\"y\\\"z\";b=22;";
    let src = Source::new(input);
    let n = g.recognize_all("file", input).unwrap();
    let names = n
        .find_all("name")
        .iter()
        .map(|n| n.text(&src))
        .collect::<Vec<_>>();
    assert_eq!(names, vec!["x", "b"]);
    assert_eq!(n.find_all("string")[0].text(&src), "y\\\"z");
    assert_eq!(n.find_all("number")[0].text(&src), "22");

    // "x=" commits `decl` to its threshold, so the bad value is reported rather than the
    // repetition of `decl` just stopping.
    let e = g.recognize_all("file", "a=1;x=?;").unwrap_err();
    assert!(e.is_partial());
    assert_eq!(e.path().to_string(), "file/decl");
    assert_eq!(e.position(), 4);
}

#[test]
fn validators() {
    let g = kitchen_sink();
    let reserved = |n: &Node, src: &Source<'_>| {
        if n.text(src) == "let" {
            Err(ValidationError::new("'let' is reserved"))
        } else {
            Ok(())
        }
    };
    let ctx = LanguageContext::new(&g).with_validator("name", reserved);
    assert!(ctx.recognize_all("file", "a=1;").is_ok());
    let e = ctx.recognize_all("file", "a=1;let=2;").unwrap_err();
    assert!(e.is_partial());
    assert_eq!(e.path().to_string(), "file/decl/name");
    assert_eq!(e.position(), 4);
    assert_eq!(e.length(), 3);
    assert!(e.to_string().ends_with(": 'let' is reserved"));
    // The grammar on its own has no such validator.
    assert!(g.recognize_all("file", "let=2;").is_ok());
}
