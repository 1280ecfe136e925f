//! Schemas for trigger and action parameters, fact definitions and operators.
//!
//! The canvas does not hard-code which parameters a trigger or action takes; it
//! asks a [`MetadataProvider`]. [`RuleMetadata`] is the JSON-backed provider.

mod visibility;

pub use visibility::*;

use crate::error::MetadataError;
use crate::graph::ParamKv;
use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use std::fs;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterType {
    #[default]
    String,
    Number,
    Boolean,
    Date,
    Time,
    Enum,
}

/// One entry of a trigger or action parameter schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterDefinition {
    pub name: String,
    #[serde(rename = "type", default)]
    pub param_type: ParameterType,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ParameterDefinition {
    /// The value a freshly reset parameter starts with: the first option, if any.
    pub fn default_value(&self) -> String {
        self.options
            .as_ref()
            .and_then(|options| options.first())
            .cloned()
            .unwrap_or_default()
    }

    pub fn has_options(&self) -> bool {
        self.options.as_ref().is_some_and(|o| !o.is_empty())
    }
}

/// A fact conditions can test, with the trigger types it applies to and the
/// operators it supports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactDefinition {
    pub name: String,
    #[serde(default)]
    pub triggers: Vec<String>,
    #[serde(default)]
    pub operators: Vec<String>,
}

/// Source of rule schemas consumed by the editors and the save gate.
pub trait MetadataProvider {
    fn trigger_parameters(&self, trigger_type: &str) -> Option<&[ParameterDefinition]>;

    fn action_parameters(&self, action_type: &str) -> Option<&[ParameterDefinition]>;

    fn facts(&self) -> &[FactDefinition];

    /// The global operator list, used when a fact does not restrict its operators.
    fn operators(&self) -> &[String];

    fn fact(&self, name: &str) -> Option<&FactDefinition> {
        self.facts().iter().find(|f| f.name == name)
    }

    /// Facts relevant to `trigger_type`. A fact with no trigger list applies to all.
    fn facts_for_trigger(&self, trigger_type: &str) -> Vec<&FactDefinition> {
        self.facts()
            .iter()
            .filter(|f| f.triggers.is_empty() || f.triggers.iter().any(|t| t == trigger_type))
            .collect()
    }

    /// Operators allowed for `fact`, falling back to the global list.
    fn operators_for_fact(&self, fact: &str) -> &[String] {
        match self.fact(fact) {
            Some(def) if !def.operators.is_empty() => &def.operators,
            _ => self.operators(),
        }
    }
}

/// Builds the parameter list a trigger or action resets to when its type changes.
pub fn default_parameters(definitions: &[ParameterDefinition]) -> Vec<ParamKv> {
    definitions
        .iter()
        .map(|d| ParamKv::new(d.name.as_str(), d.default_value()))
        .collect()
}

/// JSON metadata catalogue.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuleMetadata {
    #[serde(default)]
    pub triggers: AHashMap<String, Vec<ParameterDefinition>>,
    #[serde(default)]
    pub actions: AHashMap<String, Vec<ParameterDefinition>>,
    #[serde(default)]
    pub facts: Vec<FactDefinition>,
    #[serde(default)]
    pub operators: Vec<String>,
}

impl RuleMetadata {
    pub fn from_json(json: &str) -> Result<Self, MetadataError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a metadata catalogue from a JSON file.
    pub fn from_file(path: &str) -> Result<Self, MetadataError> {
        let content = fs::read_to_string(path).map_err(|source| MetadataError::Io {
            path: path.to_string(),
            source,
        })?;
        Self::from_json(&content)
    }
}

impl MetadataProvider for RuleMetadata {
    fn trigger_parameters(&self, trigger_type: &str) -> Option<&[ParameterDefinition]> {
        self.triggers.get(trigger_type).map(Vec::as_slice)
    }

    fn action_parameters(&self, action_type: &str) -> Option<&[ParameterDefinition]> {
        self.actions.get(action_type).map(Vec::as_slice)
    }

    fn facts(&self) -> &[FactDefinition] {
        &self.facts
    }

    fn operators(&self) -> &[String] {
        &self.operators
    }
}
