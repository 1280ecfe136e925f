//! Rebuilds a canvas graph from persisted rule records.
//!
//! Node ids are first-writer-wins across records: when two records lay out the
//! same node id, the earliest record in the input owns it and later definitions
//! are ignored. Edges are deduplicated by id and by unordered endpoint pair.

use crate::error::StoreError;
use crate::graph::{
    ActionRow, ActionsNodeData, ConditionRow, ConditionsNodeData, Edge, Node, NodeData, NodeKind,
    RuleGraph, RuleNodeData, TriggerNodeData,
};
use crate::spec::{PersistedRuleRecord, RuleSpec, UiNode, kv_list_from_object};
use crate::sync::RuleStore;
use ahash::AHashSet;

pub const TRIGGER_LABEL: &str = "Trigger";
pub const CONDITIONS_LABEL: &str = "Conditions";
pub const ACTIONS_LABEL: &str = "Actions";

fn rebuild_data(ui: &UiNode, record: &PersistedRuleRecord) -> NodeData {
    let spec: &RuleSpec = &record.spec;
    match ui.kind {
        NodeKind::Rule => NodeData::Rule(RuleNodeData {
            name: Some(record.name.clone()),
            label: Some(record.name.clone()),
            saved: true,
            backend_id: Some(record.id.clone()),
        }),
        NodeKind::Trigger => NodeData::Trigger(TriggerNodeData {
            label: Some(TRIGGER_LABEL.to_string()),
            trigger_type: spec.trigger.trigger_type.clone(),
            parameters: kv_list_from_object(&spec.trigger.parameters),
        }),
        NodeKind::Conditions => NodeData::Conditions(ConditionsNodeData {
            label: Some(CONDITIONS_LABEL.to_string()),
            conditions: spec
                .conditions
                .iter()
                .map(|c| ConditionRow {
                    fact: c.fact.clone(),
                    operator: c.operator.clone(),
                    value: c.value.clone(),
                })
                .collect(),
        }),
        NodeKind::Actions => NodeData::Actions(ActionsNodeData {
            label: Some(ACTIONS_LABEL.to_string()),
            actions: spec
                .actions
                .iter()
                .map(|a| ActionRow {
                    action_type: a.action_type.clone(),
                    parameters: kv_list_from_object(&a.parameters),
                })
                .collect(),
        }),
    }
}

/// Reconstructs nodes and edges from the `_ui` layers of `records`.
///
/// Records without a `_ui` layer are skipped. Edges whose endpoints were not
/// materialized are dropped.
pub fn materialize(records: &[PersistedRuleRecord]) -> RuleGraph {
    let mut graph = RuleGraph::new();
    let mut seen_nodes: AHashSet<&str> = AHashSet::new();

    for record in records {
        let Some(ui) = record.spec.ui.as_ref() else {
            log::debug!("Skipping record '{}': no layout data", record.id);
            continue;
        };
        for (node_id, ui_node) in &ui.nodes {
            if !seen_nodes.insert(node_id.as_str()) {
                continue;
            }
            graph.nodes.push(Node::new(
                node_id.clone(),
                ui_node.position,
                rebuild_data(ui_node, record),
            ));
        }
    }

    for ui_edge in records.iter().filter_map(|r| r.spec.ui.as_ref()).flat_map(|ui| &ui.edges) {
        if !seen_nodes.contains(ui_edge.source.as_str()) || !seen_nodes.contains(ui_edge.target.as_str()) {
            log::debug!(
                "Dropping edge '{}': endpoint '{}' or '{}' is unknown",
                ui_edge.id,
                ui_edge.source,
                ui_edge.target
            );
            continue;
        }
        let duplicate = graph
            .edges
            .iter()
            .any(|e| e.id == ui_edge.id || e.same_pair(&ui_edge.source, &ui_edge.target));
        if !duplicate {
            graph.edges.push(Edge::new(
                ui_edge.id.as_str(),
                ui_edge.source.as_str(),
                ui_edge.target.as_str(),
            ));
        }
    }

    log::debug!(
        "Materialized {} nodes and {} edges from {} records",
        graph.nodes.len(),
        graph.edges.len(),
        records.len()
    );
    graph
}

/// Fetches every persisted rule from `store` and materializes it.
pub async fn materialize_from_store<S>(store: &S) -> Result<RuleGraph, StoreError>
where
    S: RuleStore + ?Sized,
{
    let records = store.list().await?;
    Ok(materialize(&records))
}
