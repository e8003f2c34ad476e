//! CLI error type.

use csvseek_core::{CsvError, IndexError};
use thiserror::Error;

/// Result type for command implementations.
pub type CliResult<T> = Result<T, CliError>;

/// Errors reported by the CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Reader error.
    #[error("{0}")]
    Csv(#[from] CsvError),

    /// Index file error.
    #[error("{0}")]
    Index(#[from] IndexError),

    /// A dialect option is not a single ASCII character.
    #[error("--{option} must be a single ASCII character, got '{value}'")]
    NonAscii {
        /// Option name.
        option: &'static str,
        /// Rejected value.
        value: char,
    },

    /// Unsupported `--format` value.
    #[error("unknown output format '{0}' (expected text or json)")]
    UnknownFormat(String),

    /// JSON output error.
    #[error("json output failed: {0}")]
    Json(#[from] serde_json::Error),

    /// Writing to stdout failed.
    #[error("output failed: {0}")]
    Io(#[from] std::io::Error),
}
