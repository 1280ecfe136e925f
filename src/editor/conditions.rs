use super::{mutate, read};
use crate::error::GraphError;
use crate::graph::{ConditionRow, ConditionsNodeData, GraphQuery, NodeKind, RuleGraph};
use crate::metadata::{FactDefinition, MetadataProvider};
use crate::spec::is_boolean_operator;

/// Partial update of a conditions payload.
#[derive(Debug, Clone, Default)]
pub struct ConditionsPatch {
    pub conditions: Option<Vec<ConditionRow>>,
}

/// Mutations of a single conditions node.
pub struct ConditionsEditor<'m, M: MetadataProvider + ?Sized> {
    node_id: String,
    metadata: &'m M,
}

/// Keeps a row's operator within the set `allowed` and drops the value of
/// boolean operators.
fn normalize_row(row: &mut ConditionRow, allowed: &[String]) {
    if !allowed.is_empty() && !allowed.iter().any(|op| *op == row.operator) {
        row.operator = allowed[0].clone();
    }
    if is_boolean_operator(&row.operator) {
        row.value = None;
    } else if row.value.is_none() {
        row.value = Some(String::new());
    }
}

impl<'m, M: MetadataProvider + ?Sized> ConditionsEditor<'m, M> {
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
    ) -> Result<&'g ConditionsNodeData, GraphError> {
        read(graph, &self.node_id)
    }

    /// Operators the row may use once `fact` is selected.
    pub fn allowed_operators(&self, fact: &str) -> &'m [String] {
        self.metadata.operators_for_fact(fact)
    }

    /// Facts offered for new rows, narrowed to the trigger type of the owning
    /// rule. Without a connected trigger every fact is offered.
    pub fn available_facts<G: GraphQuery + ?Sized>(
        &self,
        graph: &G,
    ) -> Result<Vec<&'m FactDefinition>, GraphError> {
        self.data(graph)?;
        let trigger_type = graph
            .neighbors(&self.node_id, NodeKind::Rule)
            .into_iter()
            .flat_map(|rule| graph.neighbors(&rule.id, NodeKind::Trigger))
            .find_map(|trigger| trigger.as_trigger())
            .map(|t| t.trigger_type.as_str())
            .filter(|t| !t.is_empty());

        Ok(match trigger_type {
            Some(trigger_type) => self.metadata.facts_for_trigger(trigger_type),
            None => self.metadata.facts().iter().collect(),
        })
    }

    pub fn update(&self, graph: &mut RuleGraph, patch: ConditionsPatch) -> Result<bool, GraphError> {
        mutate(graph, &self.node_id, |data: &mut ConditionsNodeData| {
            match patch.conditions {
                Some(conditions) if conditions != data.conditions => {
                    data.conditions = conditions;
                    true
                }
                _ => false,
            }
        })
    }

    /// Appends an empty row using the first global operator.
    pub fn add_condition(&self, graph: &mut RuleGraph) -> Result<bool, GraphError> {
        let mut row = ConditionRow {
            operator: self.metadata.operators().first().cloned().unwrap_or_default(),
            ..ConditionRow::default()
        };
        normalize_row(&mut row, &[]);
        mutate(graph, &self.node_id, |data: &mut ConditionsNodeData| {
            data.conditions.push(row);
            true
        })
    }

    pub fn remove_condition(&self, graph: &mut RuleGraph, index: usize) -> Result<bool, GraphError> {
        mutate(graph, &self.node_id, |data: &mut ConditionsNodeData| {
            if index < data.conditions.len() {
                data.conditions.remove(index);
                true
            } else {
                false
            }
        })
    }

    /// Selects `fact` for a row, falling back to the fact's first allowed
    /// operator when the current one is no longer valid.
    pub fn set_fact(&self, graph: &mut RuleGraph, index: usize, fact: &str) -> Result<bool, GraphError> {
        let allowed = self.allowed_operators(fact);
        mutate(graph, &self.node_id, |data: &mut ConditionsNodeData| {
            let Some(row) = data.conditions.get_mut(index) else {
                return false;
            };
            let before = row.clone();
            row.fact = fact.to_string();
            normalize_row(row, allowed);
            *row != before
        })
    }

    /// Sets the operator. An operator the row's fact does not support is
    /// refused and the row stays as it was.
    pub fn set_operator(&self, graph: &mut RuleGraph, index: usize, operator: &str) -> Result<bool, GraphError> {
        mutate(graph, &self.node_id, |data: &mut ConditionsNodeData| {
            let Some(row) = data.conditions.get_mut(index) else {
                return false;
            };
            let allowed = self.allowed_operators(&row.fact);
            if !allowed.is_empty() && !allowed.iter().any(|op| op == operator) {
                log::debug!("Operator '{}' is not offered for fact '{}'", operator, row.fact);
                return false;
            }
            let before = row.clone();
            row.operator = operator.to_string();
            normalize_row(row, allowed);
            *row != before
        })
    }

    /// Sets the comparison value. Rows with a boolean operator keep no value.
    pub fn set_value(&self, graph: &mut RuleGraph, index: usize, value: &str) -> Result<bool, GraphError> {
        mutate(graph, &self.node_id, |data: &mut ConditionsNodeData| {
            match data.conditions.get_mut(index) {
                Some(row) if !is_boolean_operator(&row.operator) && row.value.as_deref() != Some(value) => {
                    row.value = Some(value.to_string());
                    true
                }
                _ => false,
            }
        })
    }
}
