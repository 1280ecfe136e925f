use super::{Edge, Node, NodeKind};

/// Read-only view of a rule graph handed to editors and validators.
///
/// Editors never reach into a shared store to discover their neighbours; they
/// ask this interface instead, which keeps lookups testable against any graph
/// representation.
pub trait GraphQuery {
    fn node(&self, id: &str) -> Option<&Node>;

    fn incident_edges<'a>(&'a self, id: &'a str) -> Box<dyn Iterator<Item = &'a Edge> + 'a>;

    /// Nodes of `kind` directly connected to `id`, in edge order.
    fn neighbors(&self, id: &str, kind: NodeKind) -> Vec<&Node> {
        self.incident_edges(id)
            .filter_map(|edge| edge.other_end(id))
            .filter_map(|other| self.node(other))
            .filter(|node| node.kind() == kind)
            .collect()
    }
}
