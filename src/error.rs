//! Error types for ParamKV
//!
//! Provides a unified error type for all operations.

use thiserror::Error;

/// Result type alias using ParamError
pub type Result<T> = std::result::Result<T, ParamError>;

/// Unified error type for ParamKV operations
#[derive(Debug, Error)]
pub enum ParamError {
    // -------------------------------------------------------------------------
    // Engine Errors
    // -------------------------------------------------------------------------
    #[error("Parameter not found: {namespace}.{key}")]
    NotFound { namespace: String, key: String },

    #[error("Parameter already exists: {namespace}.{key}")]
    AlreadyExists { namespace: String, key: String },

    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Document Errors
    // -------------------------------------------------------------------------
    #[error("Document parse error: {0}")]
    Parse(String),

    // -------------------------------------------------------------------------
    // Serialization Errors
    // -------------------------------------------------------------------------
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // -------------------------------------------------------------------------
    // Request Errors
    // -------------------------------------------------------------------------
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    // -------------------------------------------------------------------------
    // Network Errors
    // -------------------------------------------------------------------------
    #[error("Network error: {0}")]
    Network(String),

    #[error("Protocol error: {0}")]
    Protocol(String),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ParamError {
    pub(crate) fn not_found(namespace: &str, key: &str) -> Self {
        Self::NotFound {
            namespace: namespace.to_string(),
            key: key.to_string(),
        }
    }

    pub(crate) fn already_exists(namespace: &str, key: &str) -> Self {
        Self::AlreadyExists {
            namespace: namespace.to_string(),
            key: key.to_string(),
        }
    }

    /// True for a lookup miss on update
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// True for a create collision
    pub fn is_already_exists(&self) -> bool {
        matches!(self, Self::AlreadyExists { .. })
    }
}
