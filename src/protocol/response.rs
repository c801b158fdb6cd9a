//! Response definitions
//!
//! Represents responses to clients.

use serde::{Deserialize, Serialize};

use crate::model::{BatchFailure, Parameter};

/// A response to send to client
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    /// Whether the request (or at least one bulk item) succeeded
    pub success: bool,

    /// Human-readable outcome or error text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// Single-entry result
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Parameter>,

    /// List result
    #[serde(default)]
    pub data_list: Vec<Parameter>,

    /// Item count (list length, removed count, or store size for stats)
    #[serde(default)]
    pub total: usize,

    /// Advisory entry limit (stats only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,

    /// Per-item failures of a bulk request
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<BatchFailure>,
}

impl Response {
    /// Create a successful single-entry response
    pub fn entry(parameter: Parameter) -> Self {
        Self {
            success: true,
            data: Some(parameter),
            ..Self::default()
        }
    }

    /// Create a successful list response
    pub fn list(parameters: Vec<Parameter>) -> Self {
        Self {
            success: true,
            total: parameters.len(),
            data_list: parameters,
            ..Self::default()
        }
    }

    /// Create a successful response carrying only a message
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            ..Self::default()
        }
    }

    /// Create an ERROR response
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
            ..Self::default()
        }
    }

    /// Attach a message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}
