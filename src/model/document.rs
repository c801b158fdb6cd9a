//! Document: the whole persisted dataset

use serde::{Deserialize, Deserializer, Serialize};

use super::Parameter;

/// Every parameter, in insertion order
///
/// Serialized as `{"parameters": [...]}`. Order carries no meaning.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    #[serde(alias = "Parameters", default, deserialize_with = "nullable_list")]
    pub parameters: Vec<Parameter>,
}

impl Document {
    /// Create an empty document
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.parameters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty()
    }

    /// Index of the first entry addressed by (namespace, key)
    pub fn position(&self, namespace: &str, key: &str) -> Option<usize> {
        self.parameters
            .iter()
            .position(|p| p.is_addressed_by(namespace, key))
    }

    /// First entry addressed by (namespace, key)
    pub fn find(&self, namespace: &str, key: &str) -> Option<&Parameter> {
        self.parameters
            .iter()
            .find(|p| p.is_addressed_by(namespace, key))
    }

    /// Mutable handle to the first entry addressed by (namespace, key)
    pub fn find_mut(&mut self, namespace: &str, key: &str) -> Option<&mut Parameter> {
        self.parameters
            .iter_mut()
            .find(|p| p.is_addressed_by(namespace, key))
    }

    pub fn contains(&self, namespace: &str, key: &str) -> bool {
        self.position(namespace, key).is_some()
    }
}

impl From<Vec<Parameter>> for Document {
    fn from(parameters: Vec<Parameter>) -> Self {
        Self { parameters }
    }
}

fn nullable_list<'de, D>(deserializer: D) -> std::result::Result<Vec<Parameter>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<Parameter>>::deserialize(deserializer)?.unwrap_or_default())
}
