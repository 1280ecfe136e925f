//! # RuleGraph - Rule Canvas Model and Serialization Engine
//!
//! **RuleGraph** is the engine behind a visual rule-authoring canvas. Users compose
//! business rules from four node kinds (Rule, Trigger, Conditions, Actions) joined by
//! edges; RuleGraph validates those connections, normalizes each rule into a portable
//! `RuleSpec` (RuleV2), keeps it in sync with a remote rule store and rebuilds the
//! canvas from persisted records.
//!
//! ## Core Workflow
//!
//! 1.  **Build the canvas**: Add nodes to a [`graph::RuleGraph`] and connect them with
//!     `RuleGraph::connect`, which enforces the one-trigger/one-conditions/one-actions
//!     star around each rule.
//! 2.  **Edit nodes**: Use the editors in [`editor`] to change payloads. Every edit flags
//!     the connected rule as unsaved.
//! 3.  **Export**: [`serializer::export_rule`] turns a rule and its children into a
//!     `RuleSpec` with a `_ui` layout sub-graph.
//! 4.  **Persist**: [`sync::RuleSync`] creates or updates the record in a
//!     [`sync::RuleStore`] and tags the rule node with its backend id.
//! 5.  **Reload**: [`materializer::materialize`] rebuilds the canvas from stored records.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use rulegraph::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let mut graph = RuleGraph::new();
//!     let rule = graph.add_node(NodeKind::Rule, Position::new(0.0, 0.0));
//!     let trigger = graph.add_node(NodeKind::Trigger, Position::new(-200.0, 0.0));
//!     graph.connect(&trigger, &rule)?;
//!
//!     let metadata = RuleMetadata::from_file("metadata.json")?;
//!     TriggerEditor::new(trigger.as_str(), &metadata).set_trigger_type(&mut graph, "deviceData")?;
//!     RuleEditor::new(rule.as_str(), &metadata).rename(&mut graph, "High Temp Alert")?;
//!
//!     let spec = export_rule(&graph.nodes, &graph.edges, &rule)?;
//!     println!("{}", spec.to_json()?);
//!
//!     let sync = RuleSync::new(MemoryRuleStore::new());
//!     let backend_id = tokio_test::block_on(sync.save_rule(&mut graph, &rule, None))?;
//!     println!("Saved as {}", backend_id);
//!     Ok(())
//! }
//! ```

pub mod connection;
pub mod editor;
pub mod error;
pub mod graph;
pub mod materializer;
pub mod metadata;
pub mod prelude;
pub mod serializer;
pub mod spec;
pub mod sync;
