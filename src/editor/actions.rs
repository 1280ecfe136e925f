use super::{mutate, params, read};
use crate::error::GraphError;
use crate::graph::{ActionRow, ActionsNodeData, GraphQuery, RuleGraph};
use crate::metadata::{MetadataProvider, default_parameters};

/// Partial update of an actions payload.
#[derive(Debug, Clone, Default)]
pub struct ActionsPatch {
    pub actions: Option<Vec<ActionRow>>,
}

/// Mutations of a single actions node.
pub struct ActionsEditor<'m, M: MetadataProvider + ?Sized> {
    node_id: String,
    metadata: &'m M,
}

impl<'m, M: MetadataProvider + ?Sized> ActionsEditor<'m, M> {
    pub fn new(node_id: impl Into<String>, metadata: &'m M) -> Self {
        Self {
            node_id: node_id.into(),
            metadata,
        }
    }

    pub fn node_id(&self) -> &str {
        &self.node_id
    }

    pub fn data<'g, G: GraphQuery + ?Sized>(
        &self,
        graph: &'g G,
    ) -> Result<&'g ActionsNodeData, GraphError> {
        read(graph, &self.node_id)
    }

    pub fn update(&self, graph: &mut RuleGraph, patch: ActionsPatch) -> Result<bool, GraphError> {
        mutate(graph, &self.node_id, |data: &mut ActionsNodeData| match patch.actions {
            Some(actions) if actions != data.actions => {
                data.actions = actions;
                true
            }
            _ => false,
        })
    }

    pub fn add_action(&self, graph: &mut RuleGraph) -> Result<bool, GraphError> {
        mutate(graph, &self.node_id, |data: &mut ActionsNodeData| {
            data.actions.push(ActionRow::default());
            true
        })
    }

    pub fn remove_action(&self, graph: &mut RuleGraph, index: usize) -> Result<bool, GraphError> {
        mutate(graph, &self.node_id, |data: &mut ActionsNodeData| {
            if index < data.actions.len() {
                data.actions.remove(index);
                true
            } else {
                false
            }
        })
    }

    /// Changes the type of one action and resets its parameters to the new
    /// type's schema.
    pub fn set_action_type(
        &self,
        graph: &mut RuleGraph,
        index: usize,
        action_type: &str,
    ) -> Result<bool, GraphError> {
        let parameters = self
            .metadata
            .action_parameters(action_type)
            .map(default_parameters)
            .unwrap_or_default();
        mutate(graph, &self.node_id, |data: &mut ActionsNodeData| {
            let Some(action) = data.actions.get_mut(index) else {
                return false;
            };
            action.action_type = action_type.to_string();
            action.parameters = parameters;
            true
        })
    }

    pub fn add_parameter(&self, graph: &mut RuleGraph, action_index: usize) -> Result<bool, GraphError> {
        mutate(graph, &self.node_id, |data: &mut ActionsNodeData| {
            data.actions
                .get_mut(action_index)
                .is_some_and(|action| params::add_blank(&mut action.parameters))
        })
    }

    /// Removes a custom parameter of one action. Required parameters of the
    /// action type cannot be removed and yield `Ok(false)`.
    pub fn remove_parameter(
        &self,
        graph: &mut RuleGraph,
        action_index: usize,
        param_index: usize,
    ) -> Result<bool, GraphError> {
        let definitions = self
            .data(&*graph)?
            .actions
            .get(action_index)
            .and_then(|action| self.metadata.action_parameters(&action.action_type));
        mutate(graph, &self.node_id, |data: &mut ActionsNodeData| {
            data.actions.get_mut(action_index).is_some_and(|action| {
                params::remove_custom(&mut action.parameters, param_index, definitions)
            })
        })
    }

    pub fn edit_parameter(
        &self,
        graph: &mut RuleGraph,
        action_index: usize,
        param_index: usize,
        key: &str,
        value: &str,
    ) -> Result<bool, GraphError> {
        mutate(graph, &self.node_id, |data: &mut ActionsNodeData| {
            data.actions
                .get_mut(action_index)
                .is_some_and(|action| params::edit_at(&mut action.parameters, param_index, key, value))
        })
    }

    pub fn set_parameter(
        &self,
        graph: &mut RuleGraph,
        action_index: usize,
        key: &str,
        value: &str,
    ) -> Result<bool, GraphError> {
        mutate(graph, &self.node_id, |data: &mut ActionsNodeData| {
            data.actions
                .get_mut(action_index)
                .is_some_and(|action| params::set_value(&mut action.parameters, key, value))
        })
    }
}
