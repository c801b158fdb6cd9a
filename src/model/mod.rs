//! Model Module
//!
//! Plain data types shared by the store, engine and protocol layers.
//!
//! ## Types
//! - [`Parameter`]: one stored (namespace, key) → value record with metadata
//! - [`Document`]: the full persisted collection, in insertion order
//! - [`BatchOp`] / [`BatchOutcome`]: independent mutations applied in order
//!
//! ## Addressing
//! Entries are addressed by (namespace, key). An empty namespace means
//! [`DEFAULT_NAMESPACE`]; [`normalize_namespace`] is the one place that
//! substitution happens.

mod parameter;
mod document;
mod batch;

pub use parameter::{NewParameter, Parameter, DEFAULT_VALUE_TYPE};
pub use document::Document;
pub use batch::{BatchAction, BatchFailure, BatchOp, BatchOutcome};

/// Namespace used when a caller omits one
pub const DEFAULT_NAMESPACE: &str = "default";

/// Map an omitted (empty) namespace to [`DEFAULT_NAMESPACE`]
///
/// Whitespace is not trimmed: `" "` is a distinct namespace.
pub fn normalize_namespace(namespace: &str) -> &str {
    if namespace.is_empty() {
        DEFAULT_NAMESPACE
    } else {
        namespace
    }
}
