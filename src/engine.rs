//! Engine Module
//!
//! The parameter engine: CRUD, search and batch over the document store.
//!
//! ## Responsibilities
//! - Enforce (namespace, key) uniqueness
//! - Assign ids and creation/update timestamps
//! - Apply the default namespace to every namespace argument
//! - Run each operation as one store transaction

use std::path::Path;

use chrono::Utc;
use uuid::Uuid;

use crate::config::Config;
use crate::error::{ParamError, Result};
use crate::model::{
    normalize_namespace, BatchAction, BatchFailure, BatchOp, BatchOutcome, NewParameter,
    Parameter, DEFAULT_VALUE_TYPE,
};
use crate::store::DocumentStore;

/// The parameter engine
///
/// ## Concurrency Model: One Transaction at a Time
///
/// Every operation opens a [`DocumentStore`] transaction and holds it for
/// the whole read → mutate → write sequence. Two operations never
/// interleave, so each one sees the fully applied result of the previous
/// one. Two concurrent creates of the same pair produce exactly one entry.
///
/// - Reads (get/get_all/get_by_namespace/search/count) load the document
///   inside a transaction and never write
/// - Writes (create/update/delete) reload, mutate and persist the full
///   document; a failed write leaves the previous file in place
/// - Batches run each item as its own transaction
///
/// Every call pays a full-document load, and writes a full-document save.
/// Fine for thousands of entries; linear scan is the only lookup.
pub struct Engine {
    /// Engine configuration
    config: Config,

    /// Backing document (owns the mutual-exclusion region)
    store: DocumentStore,
}

impl Engine {
    /// Open an engine with the given config
    ///
    /// The data directory is created on the first write, not here.
    pub fn open(config: Config) -> Result<Self> {
        config.validate()?;
        let store = DocumentStore::from_config(&config);

        // Surfaces a corrupt file now under ReadPolicy::Strict
        let existing = store.read()?.len();
        tracing::info!(
            "Parameter store at {} holds {} parameters",
            store.path().display(),
            existing
        );

        Ok(Self { config, store })
    }

    /// Open with a path (convenience method)
    ///
    /// Uses default config with the specified data directory
    pub fn open_path(path: &Path) -> Result<Self> {
        let config = Config::builder().data_dir(path).build();
        Self::open(config)
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Every parameter, in document order
    pub fn get_all(&self) -> Result<Vec<Parameter>> {
        let txn = self.store.transaction();
        Ok(txn.read()?.parameters)
    }

    /// Look up one parameter; `None` when absent
    pub fn get(&self, namespace: &str, key: &str) -> Result<Option<Parameter>> {
        let namespace = normalize_namespace(namespace);
        let txn = self.store.transaction();
        let document = txn.read()?;
        Ok(document.find(namespace, key).cloned())
    }

    /// Every parameter in one namespace
    pub fn get_by_namespace(&self, namespace: &str) -> Result<Vec<Parameter>> {
        let namespace = normalize_namespace(namespace);
        let txn = self.store.transaction();
        let document = txn.read()?;
        Ok(document
            .parameters
            .into_iter()
            .filter(|p| p.namespace == namespace)
            .collect())
    }

    /// Case-insensitive substring search over namespace, key, value and
    /// description
    ///
    /// An absent, empty or whitespace-only keyword returns everything.
    pub fn search(&self, keyword: Option<&str>) -> Result<Vec<Parameter>> {
        let txn = self.store.transaction();
        let document = txn.read()?;

        let needle = match keyword {
            Some(k) if !k.trim().is_empty() => k.to_lowercase(),
            _ => return Ok(document.parameters),
        };

        Ok(document
            .parameters
            .into_iter()
            .filter(|p| p.matches_keyword(&needle))
            .collect())
    }

    /// Number of stored parameters
    pub fn count(&self) -> Result<usize> {
        let txn = self.store.transaction();
        Ok(txn.read()?.len())
    }

    // =========================================================================
    // Writes
    // =========================================================================

    /// Create a parameter
    ///
    /// Fails with `AlreadyExists` if (namespace, key) is taken; the
    /// document is left untouched in that case.
    pub fn create(&self, new: NewParameter) -> Result<Parameter> {
        let namespace = normalize_namespace(&new.namespace).to_string();

        let mut txn = self.store.transaction();
        let mut document = txn.read()?;

        if document.contains(&namespace, &new.key) {
            return Err(ParamError::already_exists(&namespace, &new.key));
        }

        let now = Utc::now();
        let parameter = Parameter {
            id: Uuid::new_v4().to_string(),
            namespace,
            key: new.key,
            value: new.value,
            value_type: new
                .value_type
                .unwrap_or_else(|| DEFAULT_VALUE_TYPE.to_string()),
            description: new.description,
            created_at: now,
            updated_at: now,
        };

        document.parameters.push(parameter.clone());
        txn.write(&document)?;
        drop(txn);

        tracing::info!("Created parameter {}", parameter.qualified_name());

        if document.len() > self.config.max_parameter_count {
            tracing::warn!(
                "Parameter count {} exceeds the advisory limit of {}",
                document.len(),
                self.config.max_parameter_count
            );
        }

        Ok(parameter)
    }

    /// Replace a parameter's value, and its description when one is given
    ///
    /// Fails with `NotFound` if (namespace, key) is absent; nothing is
    /// written in that case.
    pub fn update(
        &self,
        namespace: &str,
        key: &str,
        value: &str,
        description: Option<&str>,
    ) -> Result<Parameter> {
        let namespace = normalize_namespace(namespace);

        let mut txn = self.store.transaction();
        let mut document = txn.read()?;

        let parameter = document
            .find_mut(namespace, key)
            .ok_or_else(|| ParamError::not_found(namespace, key))?;

        parameter.value = value.to_string();
        if let Some(description) = description {
            parameter.description = Some(description.to_string());
        }
        parameter.updated_at = Utc::now();
        let updated = parameter.clone();

        txn.write(&document)?;
        drop(txn);

        tracing::info!("Updated parameter {}", updated.qualified_name());
        Ok(updated)
    }

    /// Remove a parameter
    ///
    /// Returns `false` (not an error) when there was nothing to remove.
    pub fn delete(&self, namespace: &str, key: &str) -> Result<bool> {
        let namespace = normalize_namespace(namespace);

        let mut txn = self.store.transaction();
        let mut document = txn.read()?;

        let Some(index) = document.position(namespace, key) else {
            return Ok(false);
        };

        document.parameters.remove(index);
        txn.write(&document)?;
        drop(txn);

        tracing::info!("Deleted parameter {}.{}", namespace, key);
        Ok(true)
    }

    /// Apply batch items in order
    ///
    /// Each item is its own transaction. A failed item is logged and
    /// recorded in the outcome; it never stops or undoes the others.
    pub fn batch<I>(&self, operations: I) -> BatchOutcome
    where
        I: IntoIterator<Item = BatchOp>,
    {
        let mut outcome = BatchOutcome::default();

        for (index, op) in operations.into_iter().enumerate() {
            let result = match op.action {
                BatchAction::Create => self.create(op.to_new_parameter()).map(Some),
                BatchAction::Update => self
                    .update(&op.namespace, &op.key, &op.value, op.description.as_deref())
                    .map(Some),
                BatchAction::Delete => self.delete(&op.namespace, &op.key).map(|removed| {
                    if removed {
                        outcome.removed += 1;
                    }
                    None
                }),
            };

            match result {
                Ok(Some(parameter)) => outcome.entries.push(parameter),
                Ok(None) => {}
                Err(e) => {
                    let namespace = normalize_namespace(&op.namespace);
                    tracing::error!(
                        "Batch {} failed for {}.{}: {}",
                        op.action,
                        namespace,
                        op.key,
                        e
                    );
                    outcome.failures.push(BatchFailure {
                        index,
                        action: op.action.to_string(),
                        namespace: namespace.to_string(),
                        key: op.key,
                        error: e.to_string(),
                    });
                }
            }
        }

        outcome
    }

    // =========================================================================
    // Accessors (for testing and debugging)
    // =========================================================================

    /// Get the data directory path
    pub fn data_dir(&self) -> &Path {
        &self.config.data_dir
    }

    /// Get the document file path
    pub fn data_file(&self) -> &Path {
        self.store.path()
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }
}
