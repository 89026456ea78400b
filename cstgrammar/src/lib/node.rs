#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{Segment, input::Source};

/// A node of a concrete syntax tree. Nodes are only ever created by a successful recognition
/// and are immutable thereafter.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Node {
    /// A leaf recognized by an atomic rule.
    Atom { symbol: String, segment: Segment },
    /// A node recognized by a composite rule. `segment` covers every token consumed while
    /// recognizing it, and hence spans the segments of all of `nodes`.
    Composite {
        symbol: String,
        segment: Segment,
        nodes: Vec<Node>,
    },
}

impl Node {
    pub fn atom(symbol: &str, segment: Segment) -> Self {
        Node::Atom {
            symbol: symbol.to_owned(),
            segment,
        }
    }

    pub fn composite(symbol: &str, segment: Segment, nodes: Vec<Node>) -> Self {
        debug_assert!(
            nodes
                .iter()
                .all(|n| n.segment().offset() >= segment.offset()
                    && n.segment().end() <= segment.end())
        );
        Node::Composite {
            symbol: symbol.to_owned(),
            segment,
            nodes,
        }
    }

    /// The name of the symbol this node was recognized as.
    pub fn symbol(&self) -> &str {
        match self {
            Node::Atom { symbol, .. } | Node::Composite { symbol, .. } => symbol,
        }
    }

    pub fn segment(&self) -> Segment {
        match self {
            Node::Atom { segment, .. } | Node::Composite { segment, .. } => *segment,
        }
    }

    /// This node's children (always empty for an atom).
    pub fn nodes(&self) -> &[Node] {
        match self {
            Node::Atom { .. } => &[],
            Node::Composite { nodes, .. } => nodes,
        }
    }

    pub fn is_atom(&self) -> bool {
        matches!(self, Node::Atom { .. })
    }

    /// The user input this node covers.
    pub fn text<'input>(&self, src: &Source<'input>) -> &'input str {
        src.segment_str(self.segment())
    }

    /// The first direct child named `symbol`.
    pub fn child(&self, symbol: &str) -> Option<&Node> {
        self.nodes().iter().find(|n| n.symbol() == symbol)
    }

    /// Every node (including `self`) named `symbol`, in depth-first pre-order.
    pub fn find_all(&self, symbol: &str) -> Vec<&Node> {
        let mut found = Vec::new();
        let mut st = vec![self];
        while let Some(n) = st.pop() {
            if n.symbol() == symbol {
                found.push(n);
            }
            for c in n.nodes().iter().rev() {
                st.push(c);
            }
        }
        found
    }

    /// Return a pretty-printed version of this node.
    pub fn pp(&self, src: &Source) -> String {
        let mut st = vec![(0, self)]; // Stack of (indent level, node) pairs
        let mut s = String::new();
        while let Some((indent, e)) = st.pop() {
            for _ in 0..indent {
                s.push(' ');
            }
            match e {
                Node::Atom { symbol, segment } => {
                    s.push_str(&format!("{} {:?}\n", symbol, src.segment_str(*segment)));
                }
                Node::Composite { symbol, nodes, .. } => {
                    s.push_str(&format!("{}\n", symbol));
                    for x in nodes.iter().rev() {
                        st.push((indent + 1, x));
                    }
                }
            }
        }
        s
    }
}

/// The nodes produced by one recognition step of a group element or group aggregation.
///
/// An *optional* sequence is the result of an element with a minimum occurrence of zero that
/// matched nothing: it is empty, but, unlike a step which was never attempted, it counts as a
/// success.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NodeSequence {
    nodes: Vec<Node>,
    optional: bool,
}

impl NodeSequence {
    pub fn new(nodes: Vec<Node>) -> Self {
        NodeSequence {
            nodes,
            optional: false,
        }
    }

    /// The empty result of an optional element which matched nothing.
    pub fn optional_empty() -> Self {
        NodeSequence {
            nodes: Vec::new(),
            optional: true,
        }
    }

    pub fn is_optional(&self) -> bool {
        self.optional
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn into_nodes(self) -> Vec<Node> {
        self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Append the nodes of `other` to `self`.
    pub fn append(&mut self, other: NodeSequence) {
        self.nodes.extend(other.nodes);
    }
}

impl From<Node> for NodeSequence {
    fn from(n: Node) -> Self {
        NodeSequence::new(vec![n])
    }
}
