use super::validate_rule;
use crate::error::{GraphError, SaveBlocked, SaveError, SyncError};
use crate::graph::{BackendId, GraphQuery, Node, NodeKind, RuleGraph, RuleNodeData};
use crate::metadata::MetadataProvider;
use crate::sync::{RuleStore, RuleSync};
use itertools::Itertools;
use std::cell::Cell;

/// Persistence state of a rule as shown on its node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveState {
    Unsaved,
    Saving,
    Saved,
}

/// The rule node's own editor and its save gate.
///
/// A rule moves `Unsaved -> Saving -> Saved` only when it is connected to
/// exactly one trigger, one conditions and one actions node, has a non-blank
/// name, and all schema parameters validate. A failed write returns it to
/// `Unsaved`. `save` takes `&self`, so `Saving` can be read from the editor
/// while the store write is still pending.
pub struct RuleEditor<'m, M: MetadataProvider + ?Sized> {
    rule_id: String,
    metadata: &'m M,
    saving: Cell<bool>,
}

/// Clears the in-flight flag when the save future finishes or is dropped.
struct InFlight<'a>(&'a Cell<bool>);

impl<'a> InFlight<'a> {
    fn start(flag: &'a Cell<bool>) -> Self {
        flag.set(true);
        Self(flag)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

impl<'m, M: MetadataProvider + ?Sized> RuleEditor<'m, M> {
    pub fn new(rule_id: impl Into<String>, metadata: &'m M) -> Self {
        Self {
            rule_id: rule_id.into(),
            metadata,
            saving: Cell::new(false),
        }
    }

    pub fn rule_id(&self) -> &str {
        &self.rule_id
    }

    /// True while a store write started by `save` is pending.
    pub fn is_saving(&self) -> bool {
        self.saving.get()
    }

    pub fn data<'g, G: GraphQuery + ?Sized>(&self, graph: &'g G) -> Result<&'g RuleNodeData, GraphError> {
        graph
            .node(&self.rule_id)
            .and_then(Node::as_rule)
            .ok_or_else(|| GraphError::RuleNotFound(self.rule_id.clone()))
    }

    pub fn state<G: GraphQuery + ?Sized>(&self, graph: &G) -> Result<SaveState, GraphError> {
        let data = self.data(graph)?;
        Ok(if self.is_saving() {
            SaveState::Saving
        } else if data.saved {
            SaveState::Saved
        } else {
            SaveState::Unsaved
        })
    }

    /// Renames the rule. The label follows the name.
    pub fn rename(&self, graph: &mut RuleGraph, name: &str) -> Result<bool, GraphError> {
        let rule = graph
            .node_mut(&self.rule_id)
            .and_then(Node::as_rule_mut)
            .ok_or_else(|| GraphError::RuleNotFound(self.rule_id.clone()))?;
        if rule.name.as_deref() == Some(name) {
            return Ok(false);
        }
        rule.name = Some(name.to_string());
        rule.label = Some(name.to_string());
        rule.saved = false;
        Ok(true)
    }

    /// Kinds missing from, and kinds connected more than once to, this rule.
    fn topology<G: GraphQuery + ?Sized>(&self, graph: &G) -> (Vec<NodeKind>, Vec<NodeKind>) {
        let counts = graph
            .incident_edges(&self.rule_id)
            .filter_map(|e| e.other_end(&self.rule_id))
            .unique()
            .filter_map(|id| graph.node(id))
            .map(Node::kind)
            .counts();

        let count = |kind: &NodeKind| counts.get(kind).copied().unwrap_or(0);
        let missing = NodeKind::CHILDREN.iter().filter(|k| count(*k) == 0).copied().collect();
        let extra = NodeKind::CHILDREN.iter().filter(|k| count(*k) > 1).copied().collect();
        (missing, extra)
    }

    /// Whether the save action is enabled: exactly one child of each kind.
    pub fn can_save<G: GraphQuery + ?Sized>(&self, graph: &G) -> bool {
        let (missing, extra) = self.topology(graph);
        missing.is_empty() && extra.is_empty()
    }

    /// Runs the full save gate without touching the backend.
    pub fn check<G: GraphQuery + ?Sized>(&self, graph: &G) -> Result<(), SaveBlocked> {
        let (missing, extra) = self.topology(graph);
        if !missing.is_empty() || !extra.is_empty() {
            return Err(SaveBlocked::IncompleteTopology { missing, extra });
        }

        let name_is_blank = self
            .data(graph)
            .ok()
            .and_then(|d| d.name.as_deref())
            .is_none_or(|name| name.trim().is_empty());
        if name_is_blank {
            return Err(SaveBlocked::BlankName);
        }

        validate_rule(graph, &self.rule_id, self.metadata)
            .into_result()
            .map_err(SaveBlocked::InvalidParameters)
    }

    /// Validates and persists the rule through `sync`, reusing the backend id
    /// cached on the node.
    pub async fn save<S: RuleStore>(
        &self,
        graph: &mut RuleGraph,
        sync: &RuleSync<S>,
    ) -> Result<BackendId, SaveError> {
        let cached = self.data(&*graph).map_err(SyncError::from)?.backend_id.clone();
        self.check(&*graph)?;

        let in_flight = InFlight::start(&self.saving);
        let result = sync.save_rule(graph, &self.rule_id, cached.as_ref()).await;
        drop(in_flight);

        match result {
            Ok(id) => Ok(id),
            Err(e) => {
                log::warn!("Saving rule '{}' failed: {}", self.rule_id, e);
                if let Some(rule) = graph.node_mut(&self.rule_id).and_then(Node::as_rule_mut) {
                    rule.saved = false;
                }
                Err(e.into())
            }
        }
    }

    /// Deletes the rule's backend record, if it has one, then removes the rule
    /// node and its edges from the canvas. Children stay on the canvas.
    pub async fn delete<S: RuleStore>(
        &self,
        graph: &mut RuleGraph,
        sync: &RuleSync<S>,
    ) -> Result<bool, SaveError> {
        let backend_id = self.data(&*graph).map_err(SyncError::from)?.backend_id.clone();
        let deleted = sync
            .delete_rule(backend_id.as_ref())
            .await
            .map_err(SyncError::from)?;
        graph.remove_node(&self.rule_id);
        Ok(deleted)
    }
}
