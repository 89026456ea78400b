use std::sync::OnceLock;

use crate::{
    grammar::{Grammar, LanguageContext},
    group::Element,
    production::Production,
    rules::{eof::EndOfInput, literal::Literal},
};

/// A context whose grammar has nothing in it that tests refer to.
pub(crate) fn empty_context() -> LanguageContext<'static> {
    static GRAMMAR: OnceLock<Grammar> = OnceLock::new();
    LanguageContext::new(GRAMMAR.get_or_init(|| {
        Grammar::new("eof", vec![Production::new("eof", EndOfInput.into())]).unwrap()
    }))
}

/// An inline literal occurring exactly once.
pub(crate) fn lit(s: &str) -> Element {
    Element::atomic(Literal::new(s).unwrap())
}
