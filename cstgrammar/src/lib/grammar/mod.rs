//! Grammars, and the context a recognition runs in.

use std::{collections::HashMap, fmt, sync::Arc};

use indexmap::IndexMap;
use tracing::debug;

use crate::{
    input::Cursor,
    path::SymbolPath,
    production::{Production, ProductionValidator},
    result::{RecognitionError, RecognitionResult},
};

mod analysis;
mod validation;

pub use self::validation::{GrammarValidationError, GrammarViolation};

/// A validated set of productions with a distinguished root. A `Grammar` is immutable once
/// constructed and may be shared freely between threads; each recognition uses its own
/// [Cursor].
#[derive(Clone)]
pub struct Grammar {
    root: String,
    productions: IndexMap<String, Production>,
}

impl Grammar {
    /// Build and validate a grammar. Every violation found is reported, rather than just the
    /// first.
    pub fn new<I>(root: &str, productions: I) -> Result<Self, GrammarValidationError>
    where
        I: IntoIterator<Item = Production>,
    {
        let mut prods = IndexMap::new();
        let mut duplicates = Vec::new();
        for prod in productions {
            if prods.contains_key(prod.symbol()) {
                if !duplicates.iter().any(|d: &String| d == prod.symbol()) {
                    duplicates.push(prod.symbol().to_owned());
                }
            } else {
                prods.insert(prod.symbol().to_owned(), prod);
            }
        }
        let grm = Grammar {
            root: root.to_owned(),
            productions: prods,
        };

        let mut violations = Vec::new();
        if !duplicates.is_empty() {
            violations.push(GrammarViolation::DuplicateProductions(duplicates));
        }
        violations.extend(validation::violations(&grm));
        if violations.is_empty() {
            debug!(
                "Validated grammar rooted at '{}' ({} productions)",
                grm.root,
                grm.productions.len()
            );
            Ok(grm)
        } else {
            debug!(
                "Grammar rooted at '{}' has {} kinds of violation",
                grm.root,
                violations.len()
            );
            Err(GrammarValidationError::new(violations))
        }
    }

    pub fn root(&self) -> &str {
        &self.root
    }

    /// Return the production named `symbol`, if there is one.
    pub fn production(&self, symbol: &str) -> Option<&Production> {
        self.productions.get(symbol)
    }

    pub fn contains_production(&self, symbol: &str) -> bool {
        self.productions.contains_key(symbol)
    }

    /// Return an iterator over the productions, in the order they were given.
    pub fn productions(&self) -> impl Iterator<Item = &Production> {
        self.productions.values()
    }

    pub fn productions_len(&self) -> usize {
        self.productions.len()
    }

    pub(crate) fn production_index(&self, symbol: &str) -> Option<usize> {
        self.productions.get_index_of(symbol)
    }

    /// Recognize a prefix of `input` as `symbol`, using only the validators attached to the
    /// productions themselves. See [LanguageContext::recognize].
    pub fn recognize(&self, symbol: &str, input: &str) -> RecognitionResult {
        LanguageContext::new(self).recognize(symbol, input)
    }

    /// Recognize a prefix of `input` as the root symbol.
    pub fn recognize_root(&self, input: &str) -> RecognitionResult {
        self.recognize(&self.root, input)
    }

    /// Recognize the whole of `input` as `symbol`. See [LanguageContext::recognize_all].
    pub fn recognize_all(&self, symbol: &str, input: &str) -> RecognitionResult {
        LanguageContext::new(self).recognize_all(symbol, input)
    }
}

impl fmt::Debug for Grammar {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Grammar")
            .field("root", &self.root)
            .field("productions", &self.productions.values().collect::<Vec<_>>())
            .finish()
    }
}

/// Everything a rule may need to look up while it is being recognized: the grammar (for
/// resolving references to productions by name) and validators registered per symbol.
pub struct LanguageContext<'g> {
    grammar: &'g Grammar,
    validators: HashMap<String, Arc<dyn ProductionValidator>>,
}

impl<'g> LanguageContext<'g> {
    pub fn new(grammar: &'g Grammar) -> Self {
        LanguageContext {
            grammar,
            validators: HashMap::new(),
        }
    }

    /// Register `validator` for every production named `symbol` that has no validator of its
    /// own.
    pub fn with_validator<V: ProductionValidator + 'static>(
        mut self,
        symbol: &str,
        validator: V,
    ) -> Self {
        self.validators.insert(symbol.to_owned(), Arc::new(validator));
        self
    }

    pub fn grammar(&self) -> &'g Grammar {
        self.grammar
    }

    pub fn validator(&self, symbol: &str) -> Option<&dyn ProductionValidator> {
        self.validators.get(symbol).map(|v| &**v)
    }

    /// Recognize `symbol` starting at the cursor's current position, which on success is left
    /// after the last recognized token. An unknown symbol fails without consuming anything.
    pub fn recognize_at(&self, symbol: &str, cursor: &mut Cursor<'_>) -> RecognitionResult {
        let path = SymbolPath::root(symbol);
        match self.grammar.production(symbol) {
            Some(prod) => prod.recognize_as(cursor, &path, self),
            None => Err(RecognitionError::failed(&path, cursor.position())),
        }
    }

    /// Recognize a prefix of `input` as `symbol`.
    pub fn recognize(&self, symbol: &str, input: &str) -> RecognitionResult {
        debug!("Recognizing '{}' ({} bytes of input)", symbol, input.len());
        let mut cursor = Cursor::new(input);
        let res = self.recognize_at(symbol, &mut cursor);
        match &res {
            Ok(n) => debug!("Recognized '{}' over {} tokens", symbol, n.segment().count()),
            Err(e) => debug!("{}", e),
        }
        res
    }

    /// Recognize the whole of `input` as `symbol`. If only a prefix is recognized, the result
    /// is a partial recognition of `symbol` stopping at the first unconsumed token.
    pub fn recognize_all(&self, symbol: &str, input: &str) -> RecognitionResult {
        debug!("Recognizing all of the input as '{}'", symbol);
        let mut cursor = Cursor::new(input);
        let node = self.recognize_at(symbol, &mut cursor)?;
        if cursor.is_at_end() {
            Ok(node)
        } else {
            debug!(
                "'{}' stopped at token {} of {}",
                symbol,
                cursor.position(),
                cursor.source().len()
            );
            Err(RecognitionError::partial(
                &SymbolPath::root(symbol),
                0,
                cursor.position(),
            ))
        }
    }
}
