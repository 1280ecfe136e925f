//! The in-memory rule canvas: nodes, edges and the mutations the canvas performs on them.

mod edge;
mod node;
mod query;

pub use edge::*;
pub use node::*;
pub use query::*;

use crate::connection::{Connection, is_valid_connection};
use crate::error::GraphError;
use serde::{Deserialize, Serialize};

/// A rule canvas. Nodes and edges are kept in insertion order, which is the
/// order every traversal observes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RuleGraph {
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub edges: Vec<Edge>,
}

impl RuleGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_parts(nodes: Vec<Node>, edges: Vec<Edge>) -> Self {
        Self { nodes, edges }
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn node_mut(&mut self, id: &str) -> Option<&mut Node> {
        self.nodes.iter_mut().find(|n| n.id == id)
    }

    pub fn rules(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter().filter(|n| n.kind() == NodeKind::Rule)
    }

    /// Generate the next node ID for `kind` by scanning existing nodes.
    /// Follows the canvas pattern: "{kind}-{N}" with N incrementing.
    pub fn next_node_id(&self, kind: NodeKind) -> String {
        let prefix = format!("{}-", kind);
        let max = self
            .nodes
            .iter()
            .filter_map(|n| n.id.strip_prefix(&prefix).and_then(|s| s.parse::<u64>().ok()))
            .max()
            .unwrap_or(0);
        format!("{}{}", prefix, max + 1)
    }

    /// Drops a palette item onto the canvas: a fresh id with an empty payload.
    pub fn add_node(&mut self, kind: NodeKind, position: Position) -> String {
        let id = self.next_node_id(kind);
        self.nodes
            .push(Node::new(id.clone(), position, NodeData::empty(kind)));
        id
    }

    /// Inserts a fully built node, replacing any node with the same id.
    pub fn insert_node(&mut self, node: Node) {
        match self.node_mut(&node.id) {
            Some(existing) => *existing = node,
            None => self.nodes.push(node),
        }
    }

    /// Deletes a node together with every edge incident to it.
    pub fn remove_node(&mut self, id: &str) -> Option<Node> {
        let index = self.nodes.iter().position(|n| n.id == id)?;
        self.edges.retain(|e| !e.touches(id));
        Some(self.nodes.remove(index))
    }

    /// Connects two nodes if the connection rules allow it.
    ///
    /// A pair that is already joined is refused, including rule to rule pairs
    /// that the validator alone accepts.
    pub fn connect(&mut self, source: &str, target: &str) -> Result<&Edge, GraphError> {
        let candidate = Connection::new(source, target);
        if !is_valid_connection(&candidate, &self.nodes, &self.edges)
            || self.edges.iter().any(|e| e.same_pair(source, target))
        {
            return Err(GraphError::InvalidConnection {
                source_id: source.to_string(),
                target_id: target.to_string(),
            });
        }
        self.edges.push(Edge::between(source, target));
        log::debug!("Connected '{}' -> '{}'", source, target);
        Ok(&self.edges[self.edges.len() - 1])
    }

    pub fn remove_edge(&mut self, id: &str) -> Option<Edge> {
        let index = self.edges.iter().position(|e| e.id == id)?;
        Some(self.edges.remove(index))
    }

    /// Flags every rule directly connected to `node_id` as unsaved.
    /// Returns the ids of the rules that were touched.
    pub fn mark_rules_unsaved(&mut self, node_id: &str) -> Vec<String> {
        let rule_ids: Vec<String> = self
            .neighbors(node_id, NodeKind::Rule)
            .into_iter()
            .map(|n| n.id.clone())
            .collect();

        for rule_id in &rule_ids {
            if let Some(rule) = self.node_mut(rule_id).and_then(Node::as_rule_mut) {
                rule.saved = false;
            }
        }
        rule_ids
    }
}

impl GraphQuery for RuleGraph {
    fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    fn incident_edges<'a>(&'a self, id: &'a str) -> Box<dyn Iterator<Item = &'a Edge> + 'a> {
        Box::new(self.edges.iter().filter(move |e| e.touches(id)))
    }
}
