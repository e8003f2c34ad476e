//! Error types for csvseek readers.

use csvseek_index::IndexError;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for reader operations.
pub type CsvResult<T> = Result<T, CsvError>;

/// Errors that can occur while reading, indexing or seeking.
///
/// Reaching the end of the file is not an error; it is reported by
/// `valid()` returning `false`.
#[derive(Debug, Error)]
pub enum CsvError {
    /// The file could not be opened.
    #[error("cannot open file '{}': {source}", path.display())]
    Resource {
        /// Path of the file.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },

    /// The file has no readable line, not even a header.
    #[error("file '{}' is empty", path.display())]
    EmptyFile {
        /// Path of the file.
        path: PathBuf,
    },

    /// A read failed for a reason other than end of file.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A configured column name is not among the headers.
    #[error("column '{name}' does not exist in headers")]
    UnknownColumn {
        /// The missing column name.
        name: String,
    },

    /// A configured column ordinal is past the last header.
    #[error("column number {ordinal} is out of bounds ({columns} columns)")]
    ColumnOutOfBounds {
        /// The configured ordinal.
        ordinal: usize,
        /// Number of header columns.
        columns: usize,
    },

    /// The key passed to `seek` is not in the index.
    #[error("key not found: '{key}'")]
    KeyNotFound {
        /// The key that was looked up.
        key: String,
    },

    /// A record is longer than the configured maximum line length.
    #[error("record at offset {offset} exceeds {limit} bytes")]
    RecordTooLong {
        /// Offset of the record.
        offset: u64,
        /// Configured limit in bytes.
        limit: usize,
    },

    /// The record splitter rejected a record.
    #[error("malformed record at offset {offset}: {message}")]
    Malformed {
        /// Offset of the record.
        offset: u64,
        /// Splitter error message.
        message: String,
    },

    /// Index persistence error.
    #[error("index error: {0}")]
    Index(#[from] IndexError),
}

impl CsvError {
    /// Creates a resource error.
    pub fn resource(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Resource {
            path: path.into(),
            source,
        }
    }

    /// Creates an empty file error.
    pub fn empty_file(path: impl Into<PathBuf>) -> Self {
        Self::EmptyFile { path: path.into() }
    }

    /// Creates an unknown column error.
    pub fn unknown_column(name: impl Into<String>) -> Self {
        Self::UnknownColumn { name: name.into() }
    }

    /// Creates a column out of bounds error.
    pub fn column_out_of_bounds(ordinal: usize, columns: usize) -> Self {
        Self::ColumnOutOfBounds { ordinal, columns }
    }

    /// Creates a key not found error.
    pub fn key_not_found(key: impl Into<String>) -> Self {
        Self::KeyNotFound { key: key.into() }
    }

    /// Creates a malformed record error.
    pub fn malformed(offset: u64, message: impl Into<String>) -> Self {
        Self::Malformed {
            offset,
            message: message.into(),
        }
    }

    /// Returns true if this is a [`CsvError::KeyNotFound`].
    #[must_use]
    pub fn is_key_not_found(&self) -> bool {
        matches!(self, Self::KeyNotFound { .. })
    }
}

/// Error returned by a [`crate::RecordSplitter`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct SplitError {
    /// Description of the problem.
    pub message: String,
}

impl SplitError {
    /// Creates a split error.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
