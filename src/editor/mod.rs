//! Per-node editors: the mutations a user performs on trigger, conditions,
//! actions and rule nodes.
//!
//! Every successful edit of a child node flags the rules it is connected to as
//! unsaved, since their persisted copy no longer matches the canvas.

mod actions;
mod conditions;
mod rule;
mod trigger;
mod validate;

pub use actions::*;
pub use conditions::*;
pub use rule::*;
pub use trigger::*;
pub use validate::*;

use crate::error::GraphError;
use crate::graph::{
    ActionsNodeData, ConditionsNodeData, GraphQuery, NodeData, NodeKind, ParamKv, RuleGraph,
    TriggerNodeData,
};
use crate::metadata::ParameterDefinition;

/// A node payload an editor can borrow out of a [`NodeData`].
pub trait EditablePayload: Sized {
    const KIND: NodeKind;

    fn payload(data: &NodeData) -> Option<&Self>;

    fn payload_mut(data: &mut NodeData) -> Option<&mut Self>;
}

macro_rules! editable_payload {
    ($payload:ty, $variant:ident) => {
        impl EditablePayload for $payload {
            const KIND: NodeKind = NodeKind::$variant;

            fn payload(data: &NodeData) -> Option<&Self> {
                match data {
                    NodeData::$variant(inner) => Some(inner),
                    _ => None,
                }
            }

            fn payload_mut(data: &mut NodeData) -> Option<&mut Self> {
                match data {
                    NodeData::$variant(inner) => Some(inner),
                    _ => None,
                }
            }
        }
    };
}

editable_payload!(TriggerNodeData, Trigger);
editable_payload!(ConditionsNodeData, Conditions);
editable_payload!(ActionsNodeData, Actions);

/// Borrows the payload of `node_id` as `T`.
pub(crate) fn read<'g, T, G>(graph: &'g G, node_id: &str) -> Result<&'g T, GraphError>
where
    T: EditablePayload,
    G: GraphQuery + ?Sized,
{
    let node = graph
        .node(node_id)
        .ok_or_else(|| GraphError::NodeNotFound(node_id.to_string()))?;
    T::payload(&node.data).ok_or_else(|| GraphError::NotAnEditableNode {
        id: node_id.to_string(),
        expected: T::KIND,
    })
}

/// Applies `edit` to the payload of `node_id`. When the edit reports a change,
/// the rules connected to the node are marked unsaved.
pub(crate) fn mutate<T, F>(graph: &mut RuleGraph, node_id: &str, edit: F) -> Result<bool, GraphError>
where
    T: EditablePayload,
    F: FnOnce(&mut T) -> bool,
{
    let node = graph
        .node_mut(node_id)
        .ok_or_else(|| GraphError::NodeNotFound(node_id.to_string()))?;
    let payload = T::payload_mut(&mut node.data).ok_or_else(|| GraphError::NotAnEditableNode {
        id: node_id.to_string(),
        expected: T::KIND,
    })?;

    let changed = edit(payload);
    if changed {
        let rules = graph.mark_rules_unsaved(node_id);
        log::debug!("Edited '{}', invalidated rules {:?}", node_id, rules);
    }
    Ok(changed)
}

fn is_required_key(definitions: Option<&[ParameterDefinition]>, key: &str) -> bool {
    definitions
        .unwrap_or_default()
        .iter()
        .any(|d| d.required && d.name == key)
}

/// Shared parameter-list edits used by the trigger and action editors.
pub(crate) mod params {
    use super::*;

    pub(crate) fn add_blank(params: &mut Vec<ParamKv>) -> bool {
        params.push(ParamKv::default());
        true
    }

    /// Removes the row at `index` unless its key is a required parameter.
    pub(crate) fn remove_custom(
        params: &mut Vec<ParamKv>,
        index: usize,
        definitions: Option<&[ParameterDefinition]>,
    ) -> bool {
        match params.get(index) {
            Some(p) if !is_required_key(definitions, &p.key) => {
                params.remove(index);
                true
            }
            _ => false,
        }
    }

    pub(crate) fn edit_at(params: &mut [ParamKv], index: usize, key: &str, value: &str) -> bool {
        match params.get_mut(index) {
            Some(p) if p.key != key || p.value != value => {
                p.key = key.to_string();
                p.value = value.to_string();
                true
            }
            _ => false,
        }
    }

    /// Sets the value of `key`, appending a row when the key is not present yet.
    pub(crate) fn set_value(params: &mut Vec<ParamKv>, key: &str, value: &str) -> bool {
        match params.iter_mut().find(|p| p.key == key) {
            Some(p) if p.value == value => false,
            Some(p) => {
                p.value = value.to_string();
                true
            }
            None => {
                params.push(ParamKv::new(key, value));
                true
            }
        }
    }
}
