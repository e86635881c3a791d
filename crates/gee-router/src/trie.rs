use std::fmt;

use crate::pattern::{is_wild, Segment};

/// A single node in the segment trie.
///
/// Each edge consumes exactly one path segment. Parameter and wildcard
/// edges are labelled with their placeholder (`:lang`, `*filepath`), not
/// with a concrete value.
#[derive(Debug, Default)]
pub struct Node {
    /// Full route pattern; only set on nodes that terminate a route.
    pattern: String,
    /// This node's own segment text.
    part: String,
    /// Children in insertion order.
    children: Vec<Node>,
    /// Whether `part` is a `:param` or `*wildcard` placeholder.
    is_wild: bool,
}

impl Node {
    fn with_part(part: &str) -> Self {
        Self {
            pattern: String::new(),
            part: part.to_string(),
            children: Vec::new(),
            is_wild: is_wild(part),
        }
    }

    /// The route pattern terminating here, or `""` on interior nodes.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// The segment text labelling the edge into this node.
    pub fn part(&self) -> &str {
        &self.part
    }

    pub fn is_wild(&self) -> bool {
        self.is_wild
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    /// Insert `parts[height..]` below this node, marking the last node with
    /// `pattern`. Identical segment sequences reuse existing nodes.
    pub(crate) fn insert(&mut self, pattern: &str, parts: &[&str], height: usize) {
        if parts.len() == height {
            self.pattern = pattern.to_string();
            return;
        }

        let part = parts[height];
        let index = match self.match_child(part) {
            Some(index) => index,
            None => {
                self.children.push(Node::with_part(part));
                self.children.len() - 1
            }
        };
        self.children[index].insert(pattern, parts, height + 1);
    }

    /// First child an inserted `part` can share: same literal text, or a
    /// placeholder of the same kind (`:` with `:`, `*` with `*`).
    fn match_child(&self, part: &str) -> Option<usize> {
        self.children.iter().position(|child| {
            child.part == part
                || (child.is_wild && is_wild(part) && child.part[..1] == part[..1])
        })
    }

    /// Every child that could accept `part` during a search, in insertion
    /// order.
    pub fn match_children(&self, part: &str) -> Vec<&Node> {
        self.children
            .iter()
            .filter(|child| child.part == part || child.is_wild)
            .collect()
    }

    /// Depth-first search for the node terminating a route that accepts
    /// `parts[height..]`.
    ///
    /// At each depth literal children are tried before parameters, and
    /// parameters before wildcards. A wildcard node accepts whatever input
    /// remains.
    pub fn search(&self, parts: &[&str], height: usize) -> Option<&Node> {
        if parts.len() == height || self.part.starts_with('*') {
            return (!self.pattern.is_empty()).then_some(self);
        }

        let mut candidates = self.match_children(parts[height]);
        candidates.sort_by_key(|child| Segment::classify(&child.part).priority());
        candidates
            .into_iter()
            .find_map(|child| child.search(parts, height + 1))
    }

    /// Collect every node that terminates a route, depth first.
    pub fn travel<'a>(&'a self, list: &mut Vec<&'a Node>) {
        if !self.pattern.is_empty() {
            list.push(self);
        }
        for child in &self.children {
            child.travel(list);
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "node{{pattern={}, part={}, is_wild={}}}",
            self.pattern, self.part, self.is_wild
        )
    }
}
