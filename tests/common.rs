//! Common test utilities for building rule canvases, metadata and stores.
use async_trait::async_trait;
use rulegraph::prelude::*;
use std::future::Future;
use std::pin::Pin;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::task::{Context, Poll};

/// Metadata catalogue shared by the editor and save gate tests.
#[allow(dead_code)]
pub const METADATA_JSON: &str = r#"{
    "triggers": {
        "deviceData": [
            { "name": "deviceId", "type": "string", "required": true }
        ],
        "scheduled_time": [
            { "name": "frequency", "type": "enum", "required": true, "options": ["hourly", "daily", "weekly"] },
            { "name": "minute_of_hour", "type": "number", "required": true },
            { "name": "time_of_day", "type": "time", "required": true },
            { "name": "day_of_week", "type": "enum", "required": true, "options": ["monday", "friday"] },
            { "name": "timezone", "type": "string" }
        ]
    },
    "actions": {
        "sendEmail": [
            { "name": "to", "type": "string", "required": true },
            { "name": "subject", "type": "string" }
        ],
        "setThreshold": [
            { "name": "threshold", "type": "number", "required": true }
        ]
    },
    "facts": [
        { "name": "temperature", "triggers": ["deviceData"], "operators": ["greaterThan", "lessThan", "equals"] },
        { "name": "alarmActive", "triggers": ["deviceData"], "operators": ["isTrue", "isFalse"] },
        { "name": "currentHour", "triggers": ["scheduled_time"] },
        { "name": "weekday" }
    ],
    "operators": ["equals", "notEquals", "greaterThan", "lessThan", "isTrue", "isFalse"]
}"#;

#[allow(dead_code)]
pub fn create_metadata() -> RuleMetadata {
    RuleMetadata::from_json(METADATA_JSON).expect("fixture metadata must parse")
}

#[allow(dead_code)]
pub fn rule_node(id: &str, name: &str) -> Node {
    Node::new(
        id,
        Position::new(0.0, 0.0),
        NodeData::Rule(RuleNodeData {
            name: Some(name.to_string()),
            label: Some(name.to_string()),
            saved: false,
            backend_id: None,
        }),
    )
}

#[allow(dead_code)]
pub fn trigger_node(id: &str, trigger_type: &str, params: &[(&str, &str)]) -> Node {
    Node::new(
        id,
        Position::new(-200.0, 0.0),
        NodeData::Trigger(TriggerNodeData {
            label: Some("Trigger".to_string()),
            trigger_type: trigger_type.to_string(),
            parameters: params.iter().map(|(k, v)| ParamKv::new(*k, *v)).collect(),
        }),
    )
}

#[allow(dead_code)]
pub fn conditions_node(id: &str, rows: Vec<ConditionRow>) -> Node {
    Node::new(
        id,
        Position::new(200.0, -100.0),
        NodeData::Conditions(ConditionsNodeData {
            label: Some("Conditions".to_string()),
            conditions: rows,
        }),
    )
}

#[allow(dead_code)]
pub fn actions_node(id: &str, actions: Vec<ActionRow>) -> Node {
    Node::new(
        id,
        Position::new(200.0, 100.0),
        NodeData::Actions(ActionsNodeData {
            label: Some("Actions".to_string()),
            actions,
        }),
    )
}

#[allow(dead_code)]
pub fn action(action_type: &str, params: &[(&str, &str)]) -> ActionRow {
    ActionRow {
        action_type: action_type.to_string(),
        parameters: params.iter().map(|(k, v)| ParamKv::new(*k, *v)).collect(),
    }
}

/// Creates the "High Temp Alert" canvas: one complete rule star.
///
/// `trigger-1 -> rule-1`, `rule-1 -> cond-1`, `rule-1 -> act-1`. The action
/// carries a blank-key parameter row that must never reach the wire format.
#[allow(dead_code)]
pub fn create_high_temp_graph() -> RuleGraph {
    RuleGraph::from_parts(
        vec![
            rule_node("rule-1", "High Temp Alert"),
            trigger_node("trigger-1", "deviceData", &[("deviceId", "sensor-7")]),
            conditions_node(
                "cond-1",
                vec![
                    ConditionRow::new("temperature", "greaterThan", "30"),
                    ConditionRow::new("alarmActive", "isTrue", "stale"),
                ],
            ),
            actions_node(
                "act-1",
                vec![action(
                    "sendEmail",
                    &[("to", "ops@example.com"), ("  ", "ignored")],
                )],
            ),
        ],
        vec![
            Edge::between("trigger-1", "rule-1"),
            Edge::between("rule-1", "cond-1"),
            Edge::between("rule-1", "act-1"),
        ],
    )
}

/// A rule node plus one unconnected child of every kind.
#[allow(dead_code)]
pub fn create_loose_graph() -> RuleGraph {
    RuleGraph::from_parts(
        vec![
            rule_node("rule-1", "Loose"),
            trigger_node("trigger-1", "deviceData", &[]),
            trigger_node("trigger-2", "scheduled_time", &[]),
            conditions_node("cond-1", Vec::new()),
            actions_node("act-1", Vec::new()),
        ],
        Vec::new(),
    )
}

#[allow(dead_code)]
pub fn persisted(id: impl Into<BackendId>, spec: RuleSpec) -> PersistedRuleRecord {
    PersistedRuleRecord {
        id: id.into(),
        name: spec.name.clone(),
        spec,
    }
}

/// A store that records every call it receives before delegating to a
/// [`MemoryRuleStore`].
#[allow(dead_code)]
#[derive(Default)]
pub struct RecordingStore {
    pub inner: MemoryRuleStore,
    pub list_calls: AtomicUsize,
    pub create_calls: AtomicUsize,
    pub update_ids: Mutex<Vec<String>>,
    pub delete_ids: Mutex<Vec<String>>,
    /// When set, `list` fails instead of answering.
    pub fail_list: bool,
}

#[allow(dead_code)]
impl RecordingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(records: Vec<PersistedRuleRecord>) -> Self {
        Self {
            inner: MemoryRuleStore::with_records(records),
            ..Self::default()
        }
    }

    pub fn lists(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn creates(&self) -> usize {
        self.create_calls.load(Ordering::SeqCst)
    }

    pub fn updates(&self) -> Vec<String> {
        self.update_ids.lock().unwrap().clone()
    }

    pub fn deletes(&self) -> Vec<String> {
        self.delete_ids.lock().unwrap().clone()
    }

    pub fn total_calls(&self) -> usize {
        self.lists() + self.creates() + self.updates().len() + self.deletes().len()
    }
}

#[async_trait]
impl RuleStore for RecordingStore {
    async fn list(&self) -> std::result::Result<Vec<PersistedRuleRecord>, StoreError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_list {
            return Err(StoreError::Backend("list unavailable".to_string()));
        }
        self.inner.list().await
    }

    async fn create(&self, spec: &RuleSpec) -> std::result::Result<BackendId, StoreError> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        self.inner.create(spec).await
    }

    async fn update(&self, id: &str, spec: &RuleSpec) -> std::result::Result<(), StoreError> {
        self.update_ids.lock().unwrap().push(id.to_string());
        self.inner.update(id, spec).await
    }

    async fn delete(&self, id: &str) -> std::result::Result<(), StoreError> {
        self.delete_ids.lock().unwrap().push(id.to_string());
        self.inner.delete(id).await
    }
}

/// A store whose every write fails.
#[allow(dead_code)]
pub struct FailingStore;

#[async_trait]
impl RuleStore for FailingStore {
    async fn list(&self) -> std::result::Result<Vec<PersistedRuleRecord>, StoreError> {
        Ok(Vec::new())
    }

    async fn create(&self, _spec: &RuleSpec) -> std::result::Result<BackendId, StoreError> {
        Err(StoreError::Backend("create rejected".to_string()))
    }

    async fn update(&self, _id: &str, _spec: &RuleSpec) -> std::result::Result<(), StoreError> {
        Err(StoreError::Backend("update rejected".to_string()))
    }

    async fn delete(&self, _id: &str) -> std::result::Result<(), StoreError> {
        Err(StoreError::Backend("delete rejected".to_string()))
    }
}

/// A store whose writes stay pending until [`GatedStore::open`] is called.
#[allow(dead_code)]
#[derive(Default)]
pub struct GatedStore {
    pub inner: MemoryRuleStore,
    open: AtomicBool,
}

#[allow(dead_code)]
impl GatedStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open(&self) {
        self.open.store(true, Ordering::SeqCst);
    }

    fn gate(&self) -> Gate<'_> {
        Gate(&self.open)
    }
}

struct Gate<'a>(&'a AtomicBool);

impl Future for Gate<'_> {
    type Output = ();

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        if self.0.load(Ordering::SeqCst) {
            Poll::Ready(())
        } else {
            cx.waker().wake_by_ref();
            Poll::Pending
        }
    }
}

#[async_trait]
impl RuleStore for GatedStore {
    async fn list(&self) -> std::result::Result<Vec<PersistedRuleRecord>, StoreError> {
        self.inner.list().await
    }

    async fn create(&self, spec: &RuleSpec) -> std::result::Result<BackendId, StoreError> {
        self.gate().await;
        self.inner.create(spec).await
    }

    async fn update(&self, id: &str, spec: &RuleSpec) -> std::result::Result<(), StoreError> {
        self.gate().await;
        self.inner.update(id, spec).await
    }

    async fn delete(&self, id: &str) -> std::result::Result<(), StoreError> {
        self.inner.delete(id).await
    }
}
