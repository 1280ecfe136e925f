use super::params::ParameterMap;
use crate::graph::{BackendId, NodeKind, Position};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Operators that test a fact for truthiness and therefore carry no value.
pub const BOOLEAN_OPERATORS: [&str; 2] = ["isTrue", "isFalse"];

pub fn is_boolean_operator(operator: &str) -> bool {
    BOOLEAN_OPERATORS.contains(&operator)
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TriggerSpec {
    #[serde(rename = "type", default)]
    pub trigger_type: String,
    #[serde(default)]
    pub parameters: ParameterMap,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConditionSpec {
    pub fact: String,
    pub operator: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActionSpec {
    #[serde(rename = "type")]
    pub action_type: String,
    #[serde(default)]
    pub parameters: ParameterMap,
}

/// Layout-only record of a node: everything semantic lives in the `RuleSpec` fields.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UiNode {
    #[serde(rename = "type")]
    pub kind: NodeKind,
    #[serde(default)]
    pub position: Position,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UiEdge {
    pub id: String,
    pub source: String,
    pub target: String,
}

/// The `_ui` sub-graph persisted alongside a rule so the canvas can be rebuilt.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UiGraph {
    #[serde(default)]
    pub nodes: BTreeMap<String, UiNode>,
    #[serde(default)]
    pub edges: Vec<UiEdge>,
}

impl UiGraph {
    pub fn contains_node(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }
}

/// The portable rule definition (RuleV2) with its optional `_ui` layout.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RuleSpec {
    pub name: String,
    #[serde(default)]
    pub trigger: TriggerSpec,
    #[serde(default)]
    pub conditions: Vec<ConditionSpec>,
    #[serde(default)]
    pub actions: Vec<ActionSpec>,
    #[serde(rename = "_ui", default, skip_serializing_if = "Option::is_none")]
    pub ui: Option<UiGraph>,
}

impl RuleSpec {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// A rule as the remote store hands it back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistedRuleRecord {
    pub id: BackendId,
    pub name: String,
    pub spec: RuleSpec,
}

/// One entry of a bulk export: the `RuleSpec` plus the rule node id and export timestamps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportedRule {
    pub id: String,
    #[serde(flatten)]
    pub spec: RuleSpec,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
