/// This module defines the error types for itemscout.
///
/// Errors fall into two families, and callers usually treat them differently:
///
/// 1. **Input errors** are contract violations detected before any mining starts:
///    an empty transaction list, a non-positive minimum support, an out-of-range
///    percentage, a malformed transaction file, or a dataset too wide for the
///    bit index type.
///
/// 2. **Execution errors** happen while a run is in flight: a worker thread that
///    panics mid-job, a worker that cannot be spawned, or an I/O failure while
///    writing results.
///
/// ```rust,ignore
/// match mine(&transactions, &config) {
///     Ok(output) => // Write itemsets,
///     Err(e) if e.is_input_error() => // Fix the input and retry,
///     Err(e) => // The run itself failed
/// }
/// ```
use std::path::PathBuf;
use thiserror::Error;

/// Result type for mining operations
pub type MiningResult<T> = Result<T, MiningError>;

/// Errors that can occur while loading transactions or mining itemsets
#[derive(Error, Debug)]
pub enum MiningError {
    #[error("Transaction list is empty")]
    EmptyTransactions,
    #[error("Invalid minimum support: {0}")]
    InvalidMinSupport(String),
    #[error("Capacity exceeded: {count} {what} exceeds the limit of {limit}")]
    CapacityExceeded {
        what: &'static str,
        count: usize,
        limit: usize,
    },
    #[error("Malformed transaction data in {source_name}: {message}")]
    MalformedInput {
        source_name: String,
        message: String,
    },
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),
    #[error("Worker {worker} panicked: {message}")]
    WorkerPanicked { worker: usize, message: String },
    #[error("Failed to spawn worker {worker}: {source}")]
    WorkerSpawn {
        worker: usize,
        source: std::io::Error,
    },
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl From<config::ConfigError> for MiningError {
    fn from(err: config::ConfigError) -> Self {
        Self::ConfigError(err.to_string())
    }
}

impl MiningError {
    pub fn invalid_min_support(msg: impl Into<String>) -> Self {
        Self::InvalidMinSupport(msg.into())
    }

    pub fn capacity_exceeded(what: &'static str, count: usize, limit: usize) -> Self {
        Self::CapacityExceeded { what, count, limit }
    }

    pub fn malformed_input(source_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::MalformedInput {
            source_name: source_name.into(),
            message: message.into(),
        }
    }

    pub fn file_not_found(path: impl Into<PathBuf>) -> Self {
        Self::FileNotFound(path.into())
    }

    pub fn worker_panicked(worker: usize, message: impl Into<String>) -> Self {
        Self::WorkerPanicked {
            worker,
            message: message.into(),
        }
    }

    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    /// Returns true when the error is a violation of the input contract rather
    /// than a failure of the run itself.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            Self::EmptyTransactions
                | Self::InvalidMinSupport(_)
                | Self::CapacityExceeded { .. }
                | Self::MalformedInput { .. }
                | Self::FileNotFound(_)
                | Self::ConfigError(_)
                | Self::JsonError(_)
        )
    }
}
