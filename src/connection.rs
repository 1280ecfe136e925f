//! Decides whether a proposed edge may be added to a rule canvas.
//!
//! The canvas is a set of stars: every edge must touch a rule, and a rule may
//! hold at most one trigger, one conditions and one actions node.

use crate::graph::{Edge, Node, NodeKind};

/// A proposed edge. Either endpoint may be absent while the user is still dragging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Connection<'a> {
    pub source: Option<&'a str>,
    pub target: Option<&'a str>,
}

impl<'a> Connection<'a> {
    pub fn new(source: &'a str, target: &'a str) -> Self {
        Self {
            source: Some(source),
            target: Some(target),
        }
    }

    /// The same connection with its endpoints swapped.
    pub fn reversed(&self) -> Self {
        Self {
            source: self.target,
            target: self.source,
        }
    }
}

impl<'a> From<&'a Edge> for Connection<'a> {
    fn from(edge: &'a Edge) -> Self {
        Connection::new(&edge.source, &edge.target)
    }
}

/// Returns `true` when `candidate` may be added given the current nodes and edges.
///
/// Rule to rule edges are always accepted. A rule to child edge is rejected when
/// the pair is already connected, or when the rule already owns another child of
/// the same kind. The result never depends on which endpoint is the source.
pub fn is_valid_connection(candidate: &Connection<'_>, nodes: &[Node], edges: &[Edge]) -> bool {
    let (Some(source_id), Some(target_id)) = (candidate.source, candidate.target) else {
        return false;
    };
    let find = |id: &str| nodes.iter().find(|n| n.id == id);
    let (Some(source), Some(target)) = (find(source_id), find(target_id)) else {
        return false;
    };

    let (rule, child) = match (source.kind(), target.kind()) {
        (NodeKind::Rule, NodeKind::Rule) => return true,
        (NodeKind::Rule, _) => (source, target),
        (_, NodeKind::Rule) => (target, source),
        _ => return false,
    };

    if edges.iter().any(|e| e.same_pair(&rule.id, &child.id)) {
        return false;
    }

    let child_kind = child.kind();
    let already_has_kind = edges
        .iter()
        .filter_map(|e| e.other_end(&rule.id))
        .filter(|other| *other != child.id)
        .filter_map(|other| find(other))
        .any(|n| n.kind() == child_kind);

    !already_has_kind
}
