//! Parameter record
//!
//! The on-disk field names are camelCase. PascalCase names are accepted on
//! read so documents written by older tooling still load.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Type hint stored when the caller gives none
pub const DEFAULT_VALUE_TYPE: &str = "string";

/// A stored parameter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Parameter {
    /// Assigned once at creation, never reassigned, never used for lookup
    #[serde(alias = "Id", default, deserialize_with = "nullable_string")]
    pub id: String,

    #[serde(alias = "Namespace", default, deserialize_with = "nullable_string")]
    pub namespace: String,

    #[serde(alias = "Key", default, deserialize_with = "nullable_string")]
    pub key: String,

    #[serde(alias = "Value", default, deserialize_with = "nullable_string")]
    pub value: String,

    /// `string`, `number`, `boolean` or `json`. Never validated.
    #[serde(
        rename = "type",
        alias = "Type",
        default = "default_value_type",
        deserialize_with = "nullable_value_type"
    )]
    pub value_type: String,

    #[serde(alias = "Description", default)]
    pub description: Option<String>,

    /// Missing or null reads as the Unix epoch
    #[serde(alias = "CreatedAt", default, deserialize_with = "nullable_timestamp")]
    pub created_at: DateTime<Utc>,

    #[serde(alias = "UpdatedAt", default, deserialize_with = "nullable_timestamp")]
    pub updated_at: DateTime<Utc>,
}

impl Parameter {
    /// Exact (namespace, key) match
    pub fn is_addressed_by(&self, namespace: &str, key: &str) -> bool {
        self.namespace == namespace && self.key == key
    }

    /// Case-insensitive substring match on namespace, key, value or description
    ///
    /// `needle` must already be lowercase.
    pub fn matches_keyword(&self, needle: &str) -> bool {
        self.namespace.to_lowercase().contains(needle)
            || self.key.to_lowercase().contains(needle)
            || self.value.to_lowercase().contains(needle)
            || self
                .description
                .as_deref()
                .is_some_and(|d| d.to_lowercase().contains(needle))
    }

    /// Dotted `namespace.key` label for log lines and messages
    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.namespace, self.key)
    }
}

/// Input to `create`: everything but the engine-assigned fields
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NewParameter {
    pub namespace: String,
    pub key: String,
    pub value: String,
    pub value_type: Option<String>,
    pub description: Option<String>,
}

impl NewParameter {
    pub fn new(namespace: impl Into<String>, key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            key: key.into(),
            value: value.into(),
            value_type: None,
            description: None,
        }
    }

    /// Set the type hint
    pub fn with_type(mut self, value_type: impl Into<String>) -> Self {
        self.value_type = Some(value_type.into());
        self
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

// =============================================================================
// Serde helpers
// =============================================================================

fn default_value_type() -> String {
    DEFAULT_VALUE_TYPE.to_string()
}

fn nullable_string<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

fn nullable_value_type<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_else(default_value_type))
}

fn nullable_timestamp<'de, D>(deserializer: D) -> std::result::Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<DateTime<Utc>>::deserialize(deserializer)?.unwrap_or_default())
}
