//! Configuration for ParamKV
//!
//! Centralized configuration with sensible defaults.

use std::path::{Path, PathBuf};

use crate::error::{ParamError, Result};

/// Main configuration for a ParamKV instance
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Storage Configuration
    // -------------------------------------------------------------------------
    /// Directory holding the document file (created on first write)
    /// Internal structure:
    ///   {data_dir}/
    ///     └── parameters.json
    pub data_dir: PathBuf,

    /// Name of the JSON document inside `data_dir`
    pub file_name: String,

    /// What a read does when the document cannot be loaded
    pub read_policy: ReadPolicy,

    // -------------------------------------------------------------------------
    // Engine Configuration
    // -------------------------------------------------------------------------
    /// Whether informational logging is wanted (binaries pick the filter)
    pub enable_logging: bool,

    /// Soft cap on entry count. Advisory only: exceeding it logs a warning.
    pub max_parameter_count: usize,

    // -------------------------------------------------------------------------
    // Network Configuration
    // -------------------------------------------------------------------------
    /// TCP listen address
    pub listen_addr: String,

    /// Max queued client connections awaiting a worker
    pub max_connections: usize,

    /// Number of connection worker threads
    pub worker_threads: usize,

    /// Connection read timeout (milliseconds)
    pub read_timeout_ms: u64,

    /// Connection write timeout (milliseconds)
    pub write_timeout_ms: u64,
}

/// Behavior when the document file exists but cannot be read or parsed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReadPolicy {
    /// Log the failure and treat the store as empty. The next successful
    /// write replaces the unreadable file.
    #[default]
    FailOpen,

    /// Surface the failure to the caller as an error
    Strict,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./paramkv_data"),
            file_name: "parameters.json".to_string(),
            read_policy: ReadPolicy::FailOpen,
            enable_logging: true,
            max_parameter_count: 10_000,
            listen_addr: "127.0.0.1:7878".to_string(),
            max_connections: 1024,
            worker_threads: 4,
            read_timeout_ms: 5000,
            write_timeout_ms: 5000,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Full path of the document file
    pub fn data_file(&self) -> PathBuf {
        self.data_dir.join(&self.file_name)
    }

    /// Reject settings the store cannot work with
    ///
    /// `file_name` must be a bare file name so the document and its temp
    /// file share `data_dir`.
    pub fn validate(&self) -> Result<()> {
        let name = Path::new(&self.file_name);
        if self.file_name.is_empty() || name.file_name() != Some(name.as_os_str()) {
            return Err(ParamError::Config(format!(
                "file_name must be a plain file name, got {:?}",
                self.file_name
            )));
        }
        Ok(())
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the data directory
    pub fn data_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.data_dir = path.into();
        self
    }

    /// Set the document file name
    pub fn file_name(mut self, name: impl Into<String>) -> Self {
        self.config.file_name = name.into();
        self
    }

    /// Set the read policy for unreadable documents
    pub fn read_policy(mut self, policy: ReadPolicy) -> Self {
        self.config.read_policy = policy;
        self
    }

    /// Enable or disable informational logging
    pub fn enable_logging(mut self, enabled: bool) -> Self {
        self.config.enable_logging = enabled;
        self
    }

    /// Set the advisory entry cap
    pub fn max_parameter_count(mut self, count: usize) -> Self {
        self.config.max_parameter_count = count;
        self
    }

    /// Set the TCP listen address
    pub fn listen_addr(mut self, addr: impl Into<String>) -> Self {
        self.config.listen_addr = addr.into();
        self
    }

    /// Set the maximum number of queued connections
    pub fn max_connections(mut self, count: usize) -> Self {
        self.config.max_connections = count;
        self
    }

    /// Set the number of worker threads
    pub fn worker_threads(mut self, count: usize) -> Self {
        self.config.worker_threads = count;
        self
    }

    /// Set the read timeout (in milliseconds)
    pub fn read_timeout_ms(mut self, ms: u64) -> Self {
        self.config.read_timeout_ms = ms;
        self
    }

    /// Set the write timeout (in milliseconds)
    pub fn write_timeout_ms(mut self, ms: u64) -> Self {
        self.config.write_timeout_ms = ms;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
