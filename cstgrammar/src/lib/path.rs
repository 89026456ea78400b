use std::{fmt, sync::Arc};

/// An immutable chain of symbol names, from the symbol a recognition started at down to the
/// symbol currently being recognized. Extending a path never copies its ancestors, so paths are
/// cheap to hand to every failure that is created. Paths exist purely for diagnostics: no
/// recognition decision is ever made on the basis of a path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SymbolPath {
    head: Arc<PathLink>,
}

#[derive(Debug, PartialEq, Eq)]
struct PathLink {
    symbol: String,
    parent: Option<Arc<PathLink>>,
    depth: usize,
}

impl SymbolPath {
    /// A path consisting of `symbol` alone.
    pub fn root(symbol: &str) -> Self {
        SymbolPath {
            head: Arc::new(PathLink {
                symbol: symbol.to_owned(),
                parent: None,
                depth: 1,
            }),
        }
    }

    /// A new path which extends `self` with `symbol`.
    pub fn child(&self, symbol: &str) -> Self {
        SymbolPath {
            head: Arc::new(PathLink {
                symbol: symbol.to_owned(),
                parent: Some(Arc::clone(&self.head)),
                depth: self.head.depth + 1,
            }),
        }
    }

    /// The innermost symbol of this path.
    pub fn symbol(&self) -> &str {
        &self.head.symbol
    }

    /// The path without its innermost symbol, if any.
    pub fn parent(&self) -> Option<SymbolPath> {
        self.head.parent.as_ref().map(|p| SymbolPath {
            head: Arc::clone(p),
        })
    }

    /// How many symbols does this path contain?
    pub fn depth(&self) -> usize {
        self.head.depth
    }

    /// The symbols of this path, outermost first.
    pub fn symbols(&self) -> Vec<&str> {
        let mut syms = Vec::with_capacity(self.depth());
        let mut cur = Some(&self.head);
        while let Some(l) = cur {
            syms.push(l.symbol.as_str());
            cur = l.parent.as_ref();
        }
        syms.reverse();
        syms
    }
}

impl fmt::Display for SymbolPath {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.symbols().join("/"))
    }
}

#[cfg(test)]
mod test {
    use super::SymbolPath;

    #[test]
    fn test_chain() {
        let root = SymbolPath::root("expr");
        let p = root.child("term").child("@Literal");
        assert_eq!(p.symbol(), "@Literal");
        assert_eq!(p.depth(), 3);
        assert_eq!(p.symbols(), vec!["expr", "term", "@Literal"]);
        assert_eq!(p.to_string(), "expr/term/@Literal");
        assert_eq!(p.parent().unwrap().to_string(), "expr/term");
        assert_eq!(root.parent(), None);
        // Extending a path leaves the original untouched.
        assert_eq!(root.to_string(), "expr");
    }
}
