use serde::{Deserialize, Serialize};

/// A connection between two canvas nodes. Traversal treats it as undirected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    pub id: String,
    pub source: String,
    pub target: String,
}

impl Edge {
    pub fn new(id: impl Into<String>, source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            target: target.into(),
        }
    }

    /// Builds an edge with the id the canvas assigns to fresh connections.
    pub fn between(source: &str, target: &str) -> Self {
        Self::new(make_edge_id(source, target), source, target)
    }

    pub fn touches(&self, node_id: &str) -> bool {
        self.source == node_id || self.target == node_id
    }

    /// The endpoint opposite to `node_id`, if the edge touches it.
    pub fn other_end(&self, node_id: &str) -> Option<&str> {
        if self.source == node_id {
            Some(&self.target)
        } else if self.target == node_id {
            Some(&self.source)
        } else {
            None
        }
    }

    /// True when both edges join the same unordered pair of nodes.
    pub fn same_pair(&self, a: &str, b: &str) -> bool {
        (self.source == a && self.target == b) || (self.source == b && self.target == a)
    }
}

/// Generate an edge ID from source and target node IDs.
pub fn make_edge_id(source: &str, target: &str) -> String {
    format!("edge-{}-{}", source, target)
}
