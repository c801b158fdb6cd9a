//! Document Store
//!
//! Owns the JSON file that holds the entire dataset.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use parking_lot::{Mutex, MutexGuard};

use crate::config::{Config, ReadPolicy};
use crate::error::{ParamError, Result};
use crate::model::Document;

/// Persists the whole [`Document`] as one file
///
/// ## Concurrency:
/// - `lock`: one region shared by every read and write of this store
/// - `read()` / `write()` each take the region for a single I/O call
/// - `transaction()` takes it until the returned guard is dropped, so a
///   read → mutate → write sequence cannot interleave with anyone else
/// - The region is not reentrant: do not call `read()`/`write()` while
///   holding a transaction from the same store
/// - The region belongs to this instance, not to the file. Two stores on
///   the same path do not exclude each other; keep one store per file
pub struct DocumentStore {
    /// Full path of the document file
    path: PathBuf,

    /// What to do when the file exists but cannot be loaded
    read_policy: ReadPolicy,

    /// Serializes all access to `path`
    lock: Mutex<()>,
}

impl DocumentStore {
    /// Create a store for the file at `path`
    ///
    /// Nothing touches the disk until the first read or write.
    pub fn new(path: impl Into<PathBuf>, read_policy: ReadPolicy) -> Self {
        Self {
            path: path.into(),
            read_policy,
            lock: Mutex::new(()),
        }
    }

    /// Create a store for `{data_dir}/{file_name}` from config
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.data_file(), config.read_policy)
    }

    /// Read the current document
    ///
    /// Absent file → empty document. Unreadable or corrupt file → empty
    /// document under [`ReadPolicy::FailOpen`], error under
    /// [`ReadPolicy::Strict`].
    pub fn read(&self) -> Result<Document> {
        self.transaction().read()
    }

    /// Replace the file with `document`
    ///
    /// Creates the containing directory if needed.
    pub fn write(&self, document: &Document) -> Result<()> {
        self.transaction().write(document)
    }

    /// Acquire the store's region for a multi-step transaction
    pub fn transaction(&self) -> StoreTransaction<'_> {
        StoreTransaction {
            store: self,
            _guard: self.lock.lock(),
        }
    }

    /// Path of the document file
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn read_policy(&self) -> ReadPolicy {
        self.read_policy
    }

    // =========================================================================
    // Private Helpers (caller holds `lock`)
    // =========================================================================

    fn load(&self) -> Result<Document> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Document::new()),
            Err(e) => {
                tracing::error!(
                    "Failed to read parameter document {}: {}",
                    self.path.display(),
                    e
                );
                return self.recover(ParamError::Io(e));
            }
        };

        // An empty file or a literal `null` is an empty store, not corruption
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Document::new());
        }

        match serde_json::from_slice::<Option<Document>>(&bytes) {
            Ok(document) => Ok(document.unwrap_or_default()),
            Err(e) => {
                tracing::error!(
                    "Failed to parse parameter document {}: {}",
                    self.path.display(),
                    e
                );
                self.recover(ParamError::Parse(e.to_string()))
            }
        }
    }

    /// Apply the read policy to a load failure
    fn recover(&self, err: ParamError) -> Result<Document> {
        match self.read_policy {
            ReadPolicy::FailOpen => {
                tracing::warn!(
                    "Treating {} as empty; the next write will replace it",
                    self.path.display()
                );
                Ok(Document::new())
            }
            ReadPolicy::Strict => Err(err),
        }
    }

    fn persist(&self, document: &Document) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                if let Err(e) = fs::create_dir_all(parent) {
                    tracing::error!(
                        "Failed to create parameter directory {}: {}",
                        parent.display(),
                        e
                    );
                    return Err(e.into());
                }
                tracing::info!("Created parameter directory {}", parent.display());
            }
        }

        let json = serde_json::to_vec_pretty(document)?;
        let temp_path = self.temp_path();

        if let Err(e) = Self::replace(&temp_path, &self.path, &json) {
            tracing::error!(
                "Failed to write parameter document {}: {}",
                self.path.display(),
                e
            );
            let _ = fs::remove_file(&temp_path);
            return Err(e.into());
        }

        tracing::info!("Parameter document saved, {} parameters", document.len());
        Ok(())
    }

    /// Write to `temp`, sync, then rename over `target`
    fn replace(temp: &Path, target: &Path, contents: &[u8]) -> io::Result<()> {
        let mut file = File::create(temp)?;
        file.write_all(contents)?;
        file.sync_all()?;
        drop(file);
        fs::rename(temp, target)
    }

    /// Sibling temp file: "parameters.json" → ".parameters.json.tmp"
    fn temp_path(&self) -> PathBuf {
        let name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "document".to_string());
        self.path.with_file_name(format!(".{}.tmp", name))
    }
}

/// Exclusive access to a [`DocumentStore`] until dropped
pub struct StoreTransaction<'a> {
    store: &'a DocumentStore,
    _guard: MutexGuard<'a, ()>,
}

impl StoreTransaction<'_> {
    /// Load the document
    pub fn read(&self) -> Result<Document> {
        self.store.load()
    }

    /// Persist the document
    pub fn write(&mut self, document: &Document) -> Result<()> {
        self.store.persist(document)
    }

    /// Path of the document file
    pub fn path(&self) -> &Path {
        self.store.path()
    }
}
