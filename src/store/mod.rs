//! Store Module
//!
//! Whole-document persistence for the parameter dataset.
//!
//! ## Responsibilities
//! - Load the full document from disk (empty when the file is absent)
//! - Replace the file atomically on every write
//! - Serialize every read and write through one mutual-exclusion region
//! - Hand out transactions that hold that region across read → write
//!
//! ## File Format
//! ```text
//! {data_dir}/parameters.json
//! ┌────────────────────────────────────────────────┐
//! │ {                                              │
//! │   "parameters": [                              │
//! │     { "id", "namespace", "key", "value",       │
//! │       "type", "description",                   │
//! │       "createdAt", "updatedAt" },              │
//! │     ...                                        │
//! │   ]                                            │
//! │ }                                              │
//! └────────────────────────────────────────────────┘
//! ```
//!
//! ## Write Path
//! ```text
//! serialize → .parameters.json.tmp → fsync → rename over parameters.json
//! ```

mod document_store;

pub use document_store::{DocumentStore, StoreTransaction};
