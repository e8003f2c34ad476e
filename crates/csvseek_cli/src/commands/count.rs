//! Count command implementation.

use crate::error::CliResult;
use csvseek_core::{FileSizeEstimator, ReaderConfig, StreamCursor};
use std::io::Write;
use std::path::Path;

/// Runs the count command.
pub fn run(path: &Path, config: ReaderConfig, fast: bool, out: &mut impl Write) -> CliResult<()> {
    let mut cursor = StreamCursor::new(path, config);
    if fast {
        cursor = cursor.with_estimator(FileSizeEstimator::default());
    }

    match cursor.approximate_count()? {
        Some(estimate) if estimate.reliable => writeln!(out, "{} rows", estimate.rows)?,
        Some(estimate) => writeln!(out, "~{} rows (estimated)", estimate.rows)?,
        None => writeln!(out, "unknown")?,
    }
    Ok(())
}
