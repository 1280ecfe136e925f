use serde::{Deserialize, Serialize};
use std::fmt;

/// The four kinds of vertices a rule canvas knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Rule,
    Trigger,
    Conditions,
    Actions,
}

impl NodeKind {
    /// The node kinds a rule must be connected to exactly once.
    pub const CHILDREN: [NodeKind; 3] = [NodeKind::Trigger, NodeKind::Conditions, NodeKind::Actions];

    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::Rule => "rule",
            NodeKind::Trigger => "trigger",
            NodeKind::Conditions => "conditions",
            NodeKind::Actions => "actions",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Canvas coordinates. Presentation only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Identifier assigned by the remote rule store. Stores hand out either
/// numeric or textual ids, so both are accepted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BackendId {
    Number(i64),
    Text(String),
}

impl BackendId {
    /// An id is usable when it is defined and not blank. `0` is a real id.
    pub fn is_valid(&self) -> bool {
        match self {
            BackendId::Number(_) => true,
            BackendId::Text(text) => !text.trim().is_empty(),
        }
    }

    /// The string form used when addressing the store.
    pub fn as_key(&self) -> String {
        match self {
            BackendId::Number(n) => n.to_string(),
            BackendId::Text(text) => text.trim().to_string(),
        }
    }
}

impl fmt::Display for BackendId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendId::Number(n) => write!(f, "{}", n),
            BackendId::Text(text) => f.write_str(text),
        }
    }
}

impl From<i64> for BackendId {
    fn from(value: i64) -> Self {
        BackendId::Number(value)
    }
}

impl From<&str> for BackendId {
    fn from(value: &str) -> Self {
        BackendId::Text(value.to_string())
    }
}

impl From<String> for BackendId {
    fn from(value: String) -> Self {
        BackendId::Text(value)
    }
}

/// One entry of an ordered parameter list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParamKv {
    pub key: String,
    pub value: String,
}

impl ParamKv {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// A row with an empty or whitespace-only key carries no parameter.
    pub fn is_blank(&self) -> bool {
        self.key.trim().is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleNodeData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default)]
    pub saved: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backend_id: Option<BackendId>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TriggerNodeData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default)]
    pub trigger_type: String,
    #[serde(default)]
    pub parameters: Vec<ParamKv>,
}

/// A single `fact operator value` comparison.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConditionRow {
    pub fact: String,
    pub operator: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl ConditionRow {
    pub fn new(fact: impl Into<String>, operator: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            fact: fact.into(),
            operator: operator.into(),
            value: Some(value.into()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConditionsNodeData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default)]
    pub conditions: Vec<ConditionRow>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionRow {
    #[serde(rename = "type")]
    pub action_type: String,
    #[serde(default)]
    pub parameters: Vec<ParamKv>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActionsNodeData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default)]
    pub actions: Vec<ActionRow>,
}

/// Kind-specific node payload. Serialized as the `type`/`data` pair of a canvas node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "lowercase")]
pub enum NodeData {
    Rule(RuleNodeData),
    Trigger(TriggerNodeData),
    Conditions(ConditionsNodeData),
    Actions(ActionsNodeData),
}

impl NodeData {
    /// The payload of a freshly dropped palette item.
    pub fn empty(kind: NodeKind) -> Self {
        match kind {
            NodeKind::Rule => NodeData::Rule(RuleNodeData::default()),
            NodeKind::Trigger => NodeData::Trigger(TriggerNodeData::default()),
            NodeKind::Conditions => NodeData::Conditions(ConditionsNodeData::default()),
            NodeKind::Actions => NodeData::Actions(ActionsNodeData::default()),
        }
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            NodeData::Rule(_) => NodeKind::Rule,
            NodeData::Trigger(_) => NodeKind::Trigger,
            NodeData::Conditions(_) => NodeKind::Conditions,
            NodeData::Actions(_) => NodeKind::Actions,
        }
    }
}

/// A vertex of the rule canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    #[serde(default)]
    pub position: Position,
    #[serde(flatten)]
    pub data: NodeData,
}

impl Node {
    pub fn new(id: impl Into<String>, position: Position, data: NodeData) -> Self {
        Self {
            id: id.into(),
            position,
            data,
        }
    }

    pub fn kind(&self) -> NodeKind {
        self.data.kind()
    }

    pub fn as_rule(&self) -> Option<&RuleNodeData> {
        match &self.data {
            NodeData::Rule(data) => Some(data),
            _ => None,
        }
    }

    pub fn as_rule_mut(&mut self) -> Option<&mut RuleNodeData> {
        match &mut self.data {
            NodeData::Rule(data) => Some(data),
            _ => None,
        }
    }

    pub fn as_trigger(&self) -> Option<&TriggerNodeData> {
        match &self.data {
            NodeData::Trigger(data) => Some(data),
            _ => None,
        }
    }

    pub fn as_conditions(&self) -> Option<&ConditionsNodeData> {
        match &self.data {
            NodeData::Conditions(data) => Some(data),
            _ => None,
        }
    }

    pub fn as_actions(&self) -> Option<&ActionsNodeData> {
        match &self.data {
            NodeData::Actions(data) => Some(data),
            _ => None,
        }
    }
}
