//! Error types for table loading, alias storage and configuration.
//!
//! Matching never fails: misses come back as empty suggestion lists.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FlavorError {
    /// A static table is missing or malformed. The process cannot serve.
    #[error("failed to load table {}: {source}", path.display())]
    StartupLoad {
        path: PathBuf,
        #[source]
        source: TableError,
    },

    /// The alias file could not be read for this request. Worth retrying.
    #[error("failed to load aliases from {}: {source}", path.display())]
    AliasLoad {
        path: PathBuf,
        #[source]
        source: TableError,
    },

    #[error("failed to save aliases to {}: {source}", path.display())]
    AliasSave {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Why a JSON table file could not be read.
#[derive(Error, Debug)]
pub enum TableError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, FlavorError>;
