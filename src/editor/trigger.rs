use super::{mutate, params, read};
use crate::error::GraphError;
use crate::graph::{GraphQuery, ParamKv, RuleGraph, TriggerNodeData};
use crate::metadata::{MetadataProvider, ParameterDefinition, default_parameters, visible_keys};

/// Partial update of a trigger payload. `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct TriggerPatch {
    pub trigger_type: Option<String>,
    pub parameters: Option<Vec<ParamKv>>,
}

/// Mutations of a single trigger node.
pub struct TriggerEditor<'m, M: MetadataProvider + ?Sized> {
    node_id: String,
    metadata: &'m M,
}

impl<'m, M: MetadataProvider + ?Sized> TriggerEditor<'m, M> {
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
    ) -> Result<&'g TriggerNodeData, GraphError> {
        read(graph, &self.node_id)
    }

    fn definitions(&self, trigger_type: &str) -> Option<&'m [ParameterDefinition]> {
        self.metadata.trigger_parameters(trigger_type)
    }

    /// Shallow-merges `patch` into the payload.
    pub fn update(&self, graph: &mut RuleGraph, patch: TriggerPatch) -> Result<bool, GraphError> {
        mutate(graph, &self.node_id, |data: &mut TriggerNodeData| {
            let mut changed = false;
            if let Some(trigger_type) = patch.trigger_type {
                changed |= data.trigger_type != trigger_type;
                data.trigger_type = trigger_type;
            }
            if let Some(parameters) = patch.parameters {
                changed |= data.parameters != parameters;
                data.parameters = parameters;
            }
            changed
        })
    }

    /// Switches the trigger type and resets the parameters to that type's schema,
    /// discarding previous values.
    pub fn set_trigger_type(&self, graph: &mut RuleGraph, trigger_type: &str) -> Result<bool, GraphError> {
        let parameters = self
            .definitions(trigger_type)
            .map(default_parameters)
            .unwrap_or_default();
        mutate(graph, &self.node_id, |data: &mut TriggerNodeData| {
            data.trigger_type = trigger_type.to_string();
            data.parameters = parameters;
            true
        })
    }

    pub fn add_parameter(&self, graph: &mut RuleGraph) -> Result<bool, GraphError> {
        mutate(graph, &self.node_id, |data: &mut TriggerNodeData| {
            params::add_blank(&mut data.parameters)
        })
    }

    /// Removes a custom parameter. Rows whose key is a required parameter of
    /// the trigger type are kept and `Ok(false)` is returned.
    pub fn remove_parameter(&self, graph: &mut RuleGraph, index: usize) -> Result<bool, GraphError> {
        let trigger_type = self.data(&*graph)?.trigger_type.clone();
        let definitions = self.definitions(&trigger_type);
        mutate(graph, &self.node_id, |data: &mut TriggerNodeData| {
            params::remove_custom(&mut data.parameters, index, definitions)
        })
    }

    pub fn edit_parameter(
        &self,
        graph: &mut RuleGraph,
        index: usize,
        key: &str,
        value: &str,
    ) -> Result<bool, GraphError> {
        mutate(graph, &self.node_id, |data: &mut TriggerNodeData| {
            params::edit_at(&mut data.parameters, index, key, value)
        })
    }

    pub fn set_parameter(&self, graph: &mut RuleGraph, key: &str, value: &str) -> Result<bool, GraphError> {
        mutate(graph, &self.node_id, |data: &mut TriggerNodeData| {
            params::set_value(&mut data.parameters, key, value)
        })
    }

    /// Whether the remove button of the row with `key` is enabled.
    pub fn can_remove(&self, graph: &RuleGraph, key: &str) -> Result<bool, GraphError> {
        let trigger_type = &self.data(graph)?.trigger_type;
        Ok(!super::is_required_key(self.definitions(trigger_type), key))
    }

    /// Rows to render, with their index in the full parameter list.
    ///
    /// Schema parameters hidden by the current values are left out; custom
    /// rows (including blank ones) are always shown.
    pub fn visible_parameters<'g>(
        &self,
        graph: &'g RuleGraph,
    ) -> Result<Vec<(usize, &'g ParamKv)>, GraphError> {
        let data = self.data(graph)?;
        let visible = visible_keys(&data.trigger_type, &data.parameters);
        let definitions = self.definitions(&data.trigger_type).unwrap_or_default();
        let is_schema_key = |key: &str| definitions.iter().any(|d| d.name == key);

        Ok(data
            .parameters
            .iter()
            .enumerate()
            .filter(|(_, p)| visible.contains(&p.key) || !is_schema_key(&p.key))
            .collect())
    }
}
