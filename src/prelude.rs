//! Prelude module for convenient imports
//!
//! This module re-exports the most commonly used types and traits from the rulegraph
//! crate. Import this module to get access to the core functionality without having to
//! import each type individually.
//!
//! # Example
//!
//! ```rust,no_run
//! use rulegraph::prelude::*;
//!
//! # fn run_example() -> Result<()> {
//! let graph = RuleGraph::from_json(&std::fs::read_to_string("path/to/canvas.json")?)?;
//! for spec in export_all_rules(&graph.nodes, &graph.edges)? {
//!     println!("{} -> {}", spec.id, spec.spec.name);
//! }
//! # Ok(())
//! # }
//! ```

// Graph model
pub use crate::connection::{Connection, is_valid_connection};
pub use crate::graph::{
    ActionRow, ActionsNodeData, BackendId, ConditionRow, ConditionsNodeData, Edge, GraphQuery,
    Node, NodeData, NodeKind, ParamKv, Position, RuleGraph, RuleNodeData, TriggerNodeData,
};

// Wire format and conversions
pub use crate::materializer::{materialize, materialize_from_store};
pub use crate::serializer::{export_all_rules, export_all_rules_at, export_rule};
pub use crate::spec::{
    ActionSpec, ConditionSpec, ExportedRule, PersistedRuleRecord, RuleSpec, TriggerSpec, UiGraph,
    kv_list_from_object, object_from_kv_list,
};

// Backend sync
pub use crate::sync::{MemoryRuleStore, RuleStore, RuleSync, SyncEvent, SyncObserver};

// Metadata and editors
pub use crate::editor::{
    ActionsEditor, ConditionsEditor, RuleEditor, SaveState, TriggerEditor, validate_rule,
};
pub use crate::metadata::{MetadataProvider, RuleMetadata, visible_keys};

// Error types
pub use crate::error::{
    GraphError, SaveBlocked, SaveError, StoreError, SyncError, ValidationIssue, ValidationReport,
};

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;
