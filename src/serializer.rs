//! Converts the star around a rule node into a portable [`RuleSpec`].

use crate::error::GraphError;
use crate::graph::{
    ActionsNodeData, ConditionsNodeData, Edge, Node, NodeKind, RuleNodeData, TriggerNodeData,
};
use crate::spec::{
    ActionSpec, ConditionSpec, ExportedRule, RuleSpec, TriggerSpec, UiEdge, UiGraph, UiNode,
    is_boolean_operator, object_from_kv_list,
};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

/// Name used when a rule carries neither a name nor a label.
pub const UNTITLED_RULE: &str = "Untitled Rule";

/// The rule node and the children picked for it, at most one per kind.
struct RuleStar<'a> {
    rule: &'a Node,
    rule_data: &'a RuleNodeData,
    trigger: Option<&'a Node>,
    conditions: Option<&'a Node>,
    actions: Option<&'a Node>,
}

impl<'a> RuleStar<'a> {
    fn collect(nodes: &'a [Node], edges: &[Edge], rule_id: &str) -> Result<Self, GraphError> {
        let find = |id: &str| nodes.iter().find(|n| n.id == id);
        let rule = find(rule_id).ok_or_else(|| GraphError::RuleNotFound(rule_id.to_string()))?;
        let rule_data = rule
            .as_rule()
            .ok_or_else(|| GraphError::RuleNotFound(rule_id.to_string()))?;

        let children: Vec<&Node> = edges
            .iter()
            .filter_map(|e| e.other_end(rule_id))
            .filter_map(|id| find(id))
            .collect();
        let first_of = |kind: NodeKind| children.iter().copied().find(|n| n.kind() == kind);

        Ok(Self {
            rule,
            rule_data,
            trigger: first_of(NodeKind::Trigger),
            conditions: first_of(NodeKind::Conditions),
            actions: first_of(NodeKind::Actions),
        })
    }

    fn members(&self) -> impl Iterator<Item = &'a Node> {
        std::iter::once(self.rule)
            .chain(self.trigger)
            .chain(self.conditions)
            .chain(self.actions)
    }

    fn contains(&self, id: &str) -> bool {
        self.members().any(|n| n.id == id)
    }
}

fn rule_name(data: &RuleNodeData) -> String {
    data.name
        .as_deref()
        .or(data.label.as_deref())
        .unwrap_or(UNTITLED_RULE)
        .to_string()
}

fn build_trigger(data: Option<&TriggerNodeData>) -> TriggerSpec {
    data.map(|t| TriggerSpec {
        trigger_type: t.trigger_type.clone(),
        parameters: object_from_kv_list(&t.parameters),
    })
    .unwrap_or_default()
}

fn build_conditions(data: Option<&ConditionsNodeData>) -> Vec<ConditionSpec> {
    data.map(|c| {
        c.conditions
            .iter()
            .map(|row| ConditionSpec {
                fact: row.fact.clone(),
                operator: row.operator.clone(),
                value: if is_boolean_operator(&row.operator) {
                    None
                } else {
                    row.value.clone()
                },
            })
            .collect()
    })
    .unwrap_or_default()
}

fn build_actions(data: Option<&ActionsNodeData>) -> Vec<ActionSpec> {
    data.map(|a| {
        a.actions
            .iter()
            .map(|row| ActionSpec {
                action_type: row.action_type.clone(),
                parameters: object_from_kv_list(&row.parameters),
            })
            .collect()
    })
    .unwrap_or_default()
}

fn build_ui(star: &RuleStar<'_>, edges: &[Edge]) -> UiGraph {
    let nodes: BTreeMap<String, UiNode> = star
        .members()
        .map(|n| {
            (
                n.id.clone(),
                UiNode {
                    kind: n.kind(),
                    position: n.position,
                },
            )
        })
        .collect();

    let edges = edges
        .iter()
        .filter(|e| star.contains(&e.source) && star.contains(&e.target))
        .map(|e| UiEdge {
            id: e.id.clone(),
            source: e.source.clone(),
            target: e.target.clone(),
        })
        .collect();

    UiGraph { nodes, edges }
}

/// Serializes the rule `rule_id` and its directly connected children.
///
/// Pure and deterministic. Fails with [`GraphError::RuleNotFound`] when the id
/// does not resolve to a rule node. Missing children produce an empty trigger
/// and empty condition/action lists rather than an error.
pub fn export_rule(nodes: &[Node], edges: &[Edge], rule_id: &str) -> Result<RuleSpec, GraphError> {
    let star = RuleStar::collect(nodes, edges, rule_id)?;

    let spec = RuleSpec {
        name: rule_name(star.rule_data),
        trigger: build_trigger(star.trigger.and_then(Node::as_trigger)),
        conditions: build_conditions(star.conditions.and_then(Node::as_conditions)),
        actions: build_actions(star.actions.and_then(Node::as_actions)),
        ui: Some(build_ui(&star, edges)),
    };

    log::debug!(
        "Exported rule '{}' ({} conditions, {} actions, {} layout nodes)",
        rule_id,
        spec.conditions.len(),
        spec.actions.len(),
        star.members().count()
    );
    Ok(spec)
}

/// Serializes every rule on the canvas, stamping each record with `now`.
pub fn export_all_rules_at(
    nodes: &[Node],
    edges: &[Edge],
    now: DateTime<Utc>,
) -> Result<Vec<ExportedRule>, GraphError> {
    nodes
        .iter()
        .filter(|n| n.kind() == NodeKind::Rule)
        .map(|rule| {
            Ok(ExportedRule {
                id: rule.id.clone(),
                spec: export_rule(nodes, edges, &rule.id)?,
                created_at: now,
                updated_at: now,
            })
        })
        .collect()
}

/// Bulk export for backups, timestamped with the current time.
pub fn export_all_rules(nodes: &[Node], edges: &[Edge]) -> Result<Vec<ExportedRule>, GraphError> {
    export_all_rules_at(nodes, edges, Utc::now())
}
