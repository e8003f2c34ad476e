//! Error types for index operations.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for index operations.
pub type IndexResult<T> = Result<T, IndexError>;

/// Errors that can occur while persisting or restoring an index.
///
/// Lookups never fail: querying an unknown pair returns an empty result.
#[derive(Debug, Error)]
pub enum IndexError {
    /// The index could not be written to its backing file.
    #[error("could not write index file '{}': {source}", path.display())]
    Persistence {
        /// Path of the index file.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },

    /// The index file exists but is unreadable or is not a valid index.
    #[error("index file '{}' is broken or is not a valid index file: {message}", path.display())]
    Corrupt {
        /// Path of the index file.
        path: PathBuf,
        /// Description of the problem.
        message: String,
    },

    /// The index could not be serialized.
    #[error("index encoding failed: {message}")]
    Encoding {
        /// Description of the encoding error.
        message: String,
    },
}

impl IndexError {
    /// Creates a persistence error.
    pub fn persistence(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Persistence {
            path: path.into(),
            source,
        }
    }

    /// Creates a corrupt index error.
    pub fn corrupt(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Corrupt {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Creates an encoding error.
    pub fn encoding(message: impl Into<String>) -> Self {
        Self::Encoding {
            message: message.into(),
        }
    }
}
