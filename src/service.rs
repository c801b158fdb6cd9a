//! Request Service
//!
//! Maps protocol requests onto engine operations and engine outcomes onto
//! the response envelope. Holds no storage logic of its own.
//!
//! ## Responsibilities
//! - Pick the engine operation a request shape asks for
//! - Reject items with an empty key before they reach the engine
//! - Run bulk requests item by item, collecting per-item failures
//! - Turn engine errors into `success: false` responses

use std::sync::Arc;

use crate::engine::Engine;
use crate::error::ParamError;
use crate::model::{
    normalize_namespace, BatchAction, BatchFailure, BatchOp, NewParameter, Parameter,
};
use crate::protocol::{OperationItem, ParameterItem, Request, Response};

/// Handles decoded requests against a shared engine
#[derive(Clone)]
pub struct RequestService {
    engine: Arc<Engine>,
}

impl RequestService {
    pub fn new(engine: Arc<Engine>) -> Self {
        Self { engine }
    }

    /// Execute a request
    ///
    /// Never fails: every error becomes an unsuccessful response.
    pub fn handle(&self, request: Request) -> Response {
        match request {
            Request::List { namespace, keyword } => self.list(namespace, keyword),
            Request::Query {
                namespace,
                key,
                keys,
            } => self.query(namespace, key, keys),
            Request::Create {
                namespace,
                key,
                value,
                value_type,
                description,
                parameters,
            } => match parameters.filter(|p| !p.is_empty()) {
                Some(items) => self.bulk_create(items),
                None => self.create_one(namespace, key, value, value_type, description),
            },
            Request::Update {
                namespace,
                key,
                value,
                description,
                parameters,
            } => match parameters.filter(|p| !p.is_empty()) {
                Some(items) => self.bulk_update(items),
                None => self.update_one(namespace, key, value, description),
            },
            Request::Delete {
                namespace,
                key,
                keys,
                parameters,
            } => self.delete(namespace, key, keys, parameters),
            Request::Batch { operations } => self.batch(operations),
            Request::Stats => self.stats(),
            Request::Ping => Response::ok("PONG"),
        }
    }

    pub fn engine(&self) -> &Arc<Engine> {
        &self.engine
    }

    // =========================================================================
    // Reads
    // =========================================================================

    fn list(&self, namespace: Option<String>, keyword: Option<String>) -> Response {
        let result = if let Some(keyword) = non_empty(keyword.as_deref()) {
            self.engine.search(Some(keyword))
        } else if let Some(namespace) = non_empty(namespace.as_deref()) {
            self.engine.get_by_namespace(namespace)
        } else {
            self.engine.get_all()
        };

        match result {
            Ok(parameters) => Response::list(parameters),
            Err(e) => failed("Failed to list parameters", e),
        }
    }

    fn query(
        &self,
        namespace: Option<String>,
        key: Option<String>,
        keys: Option<Vec<String>>,
    ) -> Response {
        let ns = namespace.as_deref().unwrap_or_default();

        if let Some(key) = non_empty(key.as_deref()) {
            return match self.engine.get(ns, key) {
                Ok(Some(parameter)) => Response::entry(parameter),
                Ok(None) => Response::error("Parameter not found"),
                Err(e) => failed("Failed to query parameters", e),
            };
        }

        if let Some(keys) = keys.filter(|k| !k.is_empty()) {
            let mut found = Vec::new();
            for key in &keys {
                match self.engine.get(ns, key) {
                    Ok(Some(parameter)) => found.push(parameter),
                    Ok(None) => {}
                    Err(e) => return failed("Failed to query parameters", e),
                }
            }
            return Response::list(found);
        }

        if let Some(namespace) = non_empty(namespace.as_deref()) {
            return match self.engine.get_by_namespace(namespace) {
                Ok(parameters) => Response::list(parameters),
                Err(e) => failed("Failed to query parameters", e),
            };
        }

        Response::error("Provide key, keys or namespace")
    }

    fn stats(&self) -> Response {
        match self.engine.count() {
            Ok(count) => Response {
                success: true,
                total: count,
                limit: Some(self.engine.config().max_parameter_count),
                ..Response::default()
            },
            Err(e) => failed("Failed to count parameters", e),
        }
    }

    // =========================================================================
    // Single-entry writes
    // =========================================================================

    fn create_one(
        &self,
        namespace: Option<String>,
        key: Option<String>,
        value: Option<String>,
        value_type: Option<String>,
        description: Option<String>,
    ) -> Response {
        let Some(key) = key.filter(|k| !k.is_empty()) else {
            return Response::error("Provide key or parameters");
        };

        let new = NewParameter {
            namespace: namespace.unwrap_or_default(),
            key,
            value: value.unwrap_or_default(),
            value_type,
            description,
        };

        match self.engine.create(new) {
            Ok(parameter) => Response::entry(parameter).with_message("Parameter created"),
            Err(e) => failed("Failed to create parameter", e),
        }
    }

    fn update_one(
        &self,
        namespace: Option<String>,
        key: Option<String>,
        value: Option<String>,
        description: Option<String>,
    ) -> Response {
        let Some(key) = non_empty(key.as_deref()) else {
            return Response::error("Provide key or parameters");
        };

        match self.engine.update(
            namespace.as_deref().unwrap_or_default(),
            key,
            value.as_deref().unwrap_or_default(),
            description.as_deref(),
        ) {
            Ok(parameter) => Response::entry(parameter).with_message("Parameter updated"),
            Err(e) => failed("Failed to update parameter", e),
        }
    }

    // =========================================================================
    // Bulk writes
    // =========================================================================

    fn bulk_create(&self, items: Vec<ParameterItem>) -> Response {
        let total = items.len();
        let mut tally = BulkTally::new("create");

        for (index, item) in items.into_iter().enumerate() {
            let Some(key) = item.key.clone().filter(|k| !k.is_empty()) else {
                tally.reject(index, &item);
                continue;
            };

            let new = NewParameter {
                namespace: item.namespace.clone().unwrap_or_default(),
                key,
                value: item.value.clone().unwrap_or_default(),
                value_type: item.value_type.clone(),
                description: item.description.clone(),
            };

            match self.engine.create(new) {
                Ok(parameter) => tally.entries.push(parameter),
                Err(e) => tally.fail(index, &item, e),
            }
        }

        let message = tally.summary("Created", tally.entries.len());
        tally.into_response(total, message)
    }

    fn bulk_update(&self, items: Vec<ParameterItem>) -> Response {
        let total = items.len();
        let mut tally = BulkTally::new("update");

        for (index, item) in items.into_iter().enumerate() {
            let Some(key) = non_empty(item.key.as_deref()) else {
                tally.reject(index, &item);
                continue;
            };

            match self.engine.update(
                item.namespace.as_deref().unwrap_or_default(),
                key,
                item.value.as_deref().unwrap_or_default(),
                item.description.as_deref(),
            ) {
                Ok(parameter) => tally.entries.push(parameter),
                Err(e) => tally.fail(index, &item, e),
            }
        }

        let message = tally.summary("Updated", tally.entries.len());
        tally.into_response(total, message)
    }

    fn delete(
        &self,
        namespace: Option<String>,
        key: Option<String>,
        keys: Option<Vec<String>>,
        parameters: Option<Vec<ParameterItem>>,
    ) -> Response {
        let ns = namespace.as_deref().unwrap_or_default();

        // Across namespaces
        if let Some(items) = parameters.filter(|p| !p.is_empty()) {
            let mut tally = BulkTally::new("delete");
            let mut removed = 0;

            for (index, item) in items.iter().enumerate() {
                let Some(key) = non_empty(item.key.as_deref()) else {
                    tally.reject(index, item);
                    continue;
                };

                let item_ns = item.namespace.as_deref().unwrap_or_default();
                match self.engine.delete(item_ns, key) {
                    Ok(true) => removed += 1,
                    Ok(false) => {
                        let missing = ParamError::not_found(normalize_namespace(item_ns), key);
                        tally.fail(index, item, missing);
                    }
                    Err(e) => tally.fail(index, item, e),
                }
            }

            let message = tally.summary("Deleted", removed);
            return Response {
                success: removed > 0,
                message: Some(message),
                total: removed,
                failures: tally.failures,
                ..Response::default()
            };
        }

        // Within one namespace
        if let Some(keys) = keys.filter(|k| !k.is_empty()) {
            let mut removed = 0;
            for key in &keys {
                match self.engine.delete(ns, key) {
                    Ok(true) => removed += 1,
                    Ok(false) => {}
                    Err(e) => return failed("Failed to delete parameters", e),
                }
            }
            return Response {
                success: removed > 0,
                message: Some(format!("Deleted {} parameters", removed)),
                total: removed,
                ..Response::default()
            };
        }

        if let Some(key) = non_empty(key.as_deref()) {
            return match self.engine.delete(ns, key) {
                Ok(true) => Response::ok("Parameter deleted"),
                Ok(false) => Response::error("Parameter not found"),
                Err(e) => failed("Failed to delete parameter", e),
            };
        }

        Response::error("Provide key, keys or parameters")
    }

    fn batch(&self, operations: Vec<OperationItem>) -> Response {
        let total = operations.len();
        let mut rejected = Vec::new();
        let mut ops = Vec::with_capacity(total);
        // positions[i] = request index of ops[i]
        let mut positions = Vec::with_capacity(total);

        for (index, item) in operations.into_iter().enumerate() {
            match to_batch_op(&item) {
                Ok(op) => {
                    ops.push(op);
                    positions.push(index);
                }
                Err(e) => {
                    tracing::error!("Batch item {} rejected: {}", index, e);
                    rejected.push(BatchFailure {
                        index,
                        action: item.action,
                        namespace: normalize_namespace(item.namespace.as_deref().unwrap_or_default())
                            .to_string(),
                        key: item.key.unwrap_or_default(),
                        error: e.to_string(),
                    });
                }
            }
        }

        let mut outcome = self.engine.batch(ops);
        for failure in &mut outcome.failures {
            failure.index = positions[failure.index];
        }
        outcome.failures.extend(rejected);
        outcome.failures.sort_by_key(|f| f.index);

        let applied = total - outcome.failures.len();
        Response {
            success: total == 0 || applied > 0,
            message: Some(format!("Applied {} of {} operations", applied, total)),
            total: outcome.entries.len(),
            data_list: outcome.entries,
            failures: outcome.failures,
            ..Response::default()
        }
    }
}

// =============================================================================
// Helpers
// =============================================================================

/// Accumulates bulk create/update/delete results
struct BulkTally {
    action: &'static str,
    entries: Vec<Parameter>,
    failures: Vec<BatchFailure>,
}

impl BulkTally {
    fn new(action: &'static str) -> Self {
        Self {
            action,
            entries: Vec::new(),
            failures: Vec::new(),
        }
    }

    fn reject(&mut self, index: usize, item: &ParameterItem) {
        self.record(index, item, "Parameter key must not be empty".to_string());
    }

    fn fail(&mut self, index: usize, item: &ParameterItem, err: ParamError) {
        tracing::error!(
            "Bulk {} failed for key {:?}: {}",
            self.action,
            item.key.as_deref().unwrap_or_default(),
            err
        );
        self.record(index, item, err.to_string());
    }

    fn record(&mut self, index: usize, item: &ParameterItem, error: String) {
        self.failures.push(BatchFailure {
            index,
            action: self.action.to_string(),
            namespace: normalize_namespace(item.namespace.as_deref().unwrap_or_default()).to_string(),
            key: item.key.clone().unwrap_or_default(),
            error,
        });
    }

    /// "Created 3 parameters, 1 failed"
    fn summary(&self, verb: &str, succeeded: usize) -> String {
        let mut message = format!("{} {} parameters", verb, succeeded);
        if !self.failures.is_empty() {
            message.push_str(&format!(", {} failed", self.failures.len()));
        }
        message
    }

    fn into_response(self, total: usize, message: String) -> Response {
        Response {
            success: self.failures.len() < total,
            message: Some(message),
            total: self.entries.len(),
            data_list: self.entries,
            failures: self.failures,
            ..Response::default()
        }
    }
}

fn to_batch_op(item: &OperationItem) -> Result<BatchOp, ParamError> {
    let action: BatchAction = item.action.parse()?;
    let key = non_empty(item.key.as_deref())
        .ok_or_else(|| ParamError::InvalidRequest("Parameter key must not be empty".to_string()))?;

    Ok(BatchOp {
        action,
        namespace: item.namespace.clone().unwrap_or_default(),
        key: key.to_string(),
        value: item.value.clone().unwrap_or_default(),
        value_type: item.value_type.clone(),
        description: item.description.clone(),
    })
}

fn non_empty(s: Option<&str>) -> Option<&str> {
    s.filter(|s| !s.is_empty())
}

fn failed(context: &str, err: ParamError) -> Response {
    tracing::error!("{}: {}", context, err);
    Response::error(format!("{}: {}", context, err))
}
