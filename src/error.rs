//! Error taxonomy for loading generated documentation artifacts.
//!
//! Navigation problems are fatal for the tree they describe, while search partition problems are
//! meant to be caught, logged and turned into empty results by the search index.

use std::path::PathBuf;
use thiserror::Error;

/// Failures raised while loading navigation descriptors or search partitions.
#[derive(Debug, Error)]
pub enum DoxnavError {
    /// The navigation descriptor does not have the expected shape.
    #[error("invalid navigation descriptor at {location}: {reason}")]
    StructuralValidation {
        /// Position inside the descriptor, e.g. `NAVTREE[0][2][5]`.
        location: String,
        /// What was expected at that position.
        reason: String,
    },

    /// A search partition could not be read or did not have the expected shape.
    #[error("search partition {partition} unavailable: {reason}")]
    PartitionLoad {
        /// File name of the partition, e.g. `classes_c.js`.
        partition: String,
        /// Why the partition was rejected.
        reason: String,
    },

    /// The script could not be parsed into literal values.
    #[error("script error: {0}")]
    Script(String),

    /// A referenced file does not exist.
    #[error("path not found: {0}")]
    PathNotFound(PathBuf),

    /// Underlying filesystem failure.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl DoxnavError {
    pub(crate) fn structural(location: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::StructuralValidation {
            location: location.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn partition(partition: impl Into<String>, reason: impl ToString) -> Self {
        Self::PartitionLoad {
            partition: partition.into(),
            reason: reason.to_string(),
        }
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, DoxnavError>;
