use crate::graph::NodeKind;
use itertools::Itertools;
use thiserror::Error;

/// Structural errors raised while reading or mutating a rule graph.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GraphError {
    #[error("Rule '{0}' not found, or the node is not a rule")]
    RuleNotFound(String),

    #[error("Node '{0}' not found in the graph")]
    NodeNotFound(String),

    #[error("A connection between '{source_id}' and '{target_id}' is not allowed")]
    InvalidConnection {
        source_id: String,
        target_id: String,
    },

    #[error("Node '{id}' cannot be edited as a {expected} node")]
    NotAnEditableNode { id: String, expected: NodeKind },
}

/// A single parameter that failed validation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationIssue {
    #[error("{owner}: parameter '{key}' is required")]
    MissingRequired { owner: String, key: String },

    #[error("{owner}: parameter '{key}' must be a number, got '{value}'")]
    NotANumber {
        owner: String,
        key: String,
        value: String,
    },

    #[error("{owner}: parameter '{key}' must be one of [{allowed}], got '{value}'")]
    NotAnOption {
        owner: String,
        key: String,
        value: String,
        allowed: String,
    },
}

/// All parameter issues found in one pass over a rule.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationReport {
    pub issues: Vec<ValidationIssue>,
}

impl ValidationReport {
    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn len(&self) -> usize {
        self.issues.len()
    }

    pub(crate) fn push(&mut self, issue: ValidationIssue) {
        self.issues.push(issue);
    }

    /// Returns `Ok(())` for an empty report, otherwise the report itself as the error.
    pub fn into_result(self) -> Result<(), ValidationReport> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl std::fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} invalid parameter(s):\n{}",
            self.issues.len(),
            self.issues.iter().map(|i| format!("  - {}", i)).join("\n")
        )
    }
}

impl std::error::Error for ValidationReport {}

/// Reasons the rule save gate refuses to persist a rule.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SaveBlocked {
    #[error(
        "A rule needs exactly one trigger, one conditions and one actions node (missing: [{}], duplicated: [{}])",
        .missing.iter().join(", "),
        .extra.iter().join(", ")
    )]
    IncompleteTopology {
        missing: Vec<NodeKind>,
        extra: Vec<NodeKind>,
    },

    #[error("Please enter a rule name before saving")]
    BlankName,

    #[error("{0}")]
    InvalidParameters(ValidationReport),
}

/// Errors reported by a remote rule store.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    #[error("Rule record '{0}' does not exist in the store")]
    NotFound(String),

    #[error("Rule store request failed: {0}")]
    Backend(String),
}

/// Errors raised by the backend sync layer.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SyncError {
    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Errors returned by the rule editor's save action.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SaveError {
    #[error("Rule cannot be saved: {0}")]
    Blocked(#[from] SaveBlocked),

    #[error("Failed to save rule: {0}")]
    Sync(#[from] SyncError),
}

/// Errors that can occur while loading a metadata catalogue.
#[derive(Error, Debug)]
pub enum MetadataError {
    #[error("Could not read metadata file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse metadata JSON: {0}")]
    Parse(#[from] serde_json::Error),
}
