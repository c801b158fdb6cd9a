//! Batch operation types
//!
//! A batch is an ordered list of independent create/update/delete requests.
//! Each item succeeds or fails on its own; see `Engine::batch`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ParamError;
use super::{NewParameter, Parameter};

/// Kind of mutation a batch item performs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BatchAction {
    Create,
    Update,
    Delete,
}

impl BatchAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            BatchAction::Create => "create",
            BatchAction::Update => "update",
            BatchAction::Delete => "delete",
        }
    }
}

impl fmt::Display for BatchAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Case-insensitive: `"Create"` and `"CREATE"` both parse
impl FromStr for BatchAction {
    type Err = ParamError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "create" => Ok(BatchAction::Create),
            "update" => Ok(BatchAction::Update),
            "delete" => Ok(BatchAction::Delete),
            other => Err(ParamError::InvalidRequest(format!(
                "Unknown batch action: {:?}",
                other
            ))),
        }
    }
}

/// One batch item
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchOp {
    pub action: BatchAction,
    pub namespace: String,
    pub key: String,
    /// New value for create/update, ignored by delete
    pub value: String,
    /// Only used by create
    pub value_type: Option<String>,
    /// Create stores it; update replaces the old one only when `Some`
    pub description: Option<String>,
}

impl BatchOp {
    pub fn create(namespace: impl Into<String>, key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::with_action(BatchAction::Create, namespace, key, value)
    }

    pub fn update(namespace: impl Into<String>, key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::with_action(BatchAction::Update, namespace, key, value)
    }

    pub fn delete(namespace: impl Into<String>, key: impl Into<String>) -> Self {
        Self::with_action(BatchAction::Delete, namespace, key, String::new())
    }

    fn with_action(
        action: BatchAction,
        namespace: impl Into<String>,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            action,
            namespace: namespace.into(),
            key: key.into(),
            value: value.into(),
            value_type: None,
            description: None,
        }
    }

    pub fn with_type(mut self, value_type: impl Into<String>) -> Self {
        self.value_type = Some(value_type.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// The create payload carried by this item
    pub(crate) fn to_new_parameter(&self) -> NewParameter {
        NewParameter {
            namespace: self.namespace.clone(),
            key: self.key.clone(),
            value: self.value.clone(),
            value_type: self.value_type.clone(),
            description: self.description.clone(),
        }
    }
}

/// A batch item that did not apply
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchFailure {
    /// Position of the item in the submitted list
    pub index: usize,
    pub action: String,
    pub namespace: String,
    pub key: String,
    pub error: String,
}

/// Aggregate result of a batch
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchOutcome {
    /// Entries produced by successful creates and updates, in item order
    pub entries: Vec<Parameter>,

    /// Items that failed, in item order
    pub failures: Vec<BatchFailure>,

    /// Number of deletes that found and removed an entry
    pub removed: usize,
}

impl BatchOutcome {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}
