//! # ParamKV
//!
//! A small persistent parameter store with:
//! - Namespaced keys, unique per namespace
//! - One JSON document on disk, replaced atomically on every write
//! - Transaction-scoped locking: every operation is read → mutate → write
//!   under one lock
//! - Point lookup, namespace listing, substring search and batch mutation
//! - Length-prefixed JSON protocol over TCP
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      TCP Server                              │
//! │                (Worker Pool, Framed JSON)                    │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                  Request Service                             │
//! │        (Request Shapes → Engine Calls → Envelope)            │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                 Parameter Engine                             │
//! │      (Uniqueness, Timestamps, Search, Batch)                 │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │  transaction()
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                  Document Store                              │
//! │        (Mutex, Whole-File JSON, Temp + Rename)               │
//! └─────────────────────────────────────────────────────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod model;
pub mod store;
pub mod engine;
pub mod protocol;
pub mod service;
pub mod network;
pub mod client;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{ParamError, Result};
pub use config::{Config, ReadPolicy};
pub use engine::Engine;
pub use model::{BatchOp, BatchOutcome, Document, NewParameter, Parameter, DEFAULT_NAMESPACE};
pub use store::DocumentStore;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of ParamKV
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
