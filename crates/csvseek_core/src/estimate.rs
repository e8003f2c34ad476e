//! Row count estimation.
//!
//! Estimates are advisory. Nothing in the readers depends on them being
//! available or exact.

use crate::error::{CsvError, CsvResult};
use std::fmt;
use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::Path;

/// Read buffer size for line counting.
const COUNT_BUFFER_SIZE: usize = 64 * 1024; // 64 KB

/// Approximate number of data rows in a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowEstimate {
    /// Estimated number of data rows, header excluded.
    pub rows: u64,
    /// Whether `rows` comes from an exact line count.
    pub reliable: bool,
}

/// Estimates the number of data rows of a file.
pub trait RowEstimator: Send + Sync + fmt::Debug {
    /// Estimates the rows of the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be inspected.
    fn estimate(&self, path: &Path) -> CsvResult<RowEstimate>;
}

/// Counts physical lines and subtracts one for the header.
///
/// The count is exact for files without multi-line records.
#[derive(Debug, Clone, Copy, Default)]
pub struct LineCountEstimator;

impl RowEstimator for LineCountEstimator {
    fn estimate(&self, path: &Path) -> CsvResult<RowEstimate> {
        let mut file = File::open(path).map_err(|e| CsvError::resource(path, e))?;
        let mut buffer = vec![0u8; COUNT_BUFFER_SIZE];
        let mut lines = 0u64;
        let mut last = None;

        loop {
            let n = match file.read(&mut buffer) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            };
            lines += buffer[..n].iter().filter(|&&b| b == b'\n').count() as u64;
            last = Some(buffer[n - 1]);
        }

        // A last line without terminator still counts.
        if matches!(last, Some(b) if b != b'\n') {
            lines += 1;
        }

        Ok(RowEstimate {
            rows: lines.saturating_sub(1),
            reliable: true,
        })
    }
}

/// Divides the file size by an assumed average row length.
#[derive(Debug, Clone, Copy)]
pub struct FileSizeEstimator {
    bytes_per_row: u64,
}

impl FileSizeEstimator {
    /// Creates an estimator assuming `bytes_per_row` bytes per row.
    #[must_use]
    pub fn new(bytes_per_row: u64) -> Self {
        Self {
            bytes_per_row: bytes_per_row.max(1),
        }
    }
}

impl Default for FileSizeEstimator {
    fn default() -> Self {
        Self::new(100)
    }
}

impl RowEstimator for FileSizeEstimator {
    fn estimate(&self, path: &Path) -> CsvResult<RowEstimate> {
        let size = std::fs::metadata(path)
            .map_err(|e| CsvError::resource(path, e))?
            .len();
        Ok(RowEstimate {
            rows: size / self.bytes_per_row,
            reliable: false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn line_count_excludes_header() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("a.csv");
        fs::write(&path, "id,name\n1,Alice\n2,Bob\n").unwrap();

        let estimate = LineCountEstimator.estimate(&path).unwrap();
        assert_eq!(estimate, RowEstimate { rows: 2, reliable: true });
    }

    #[test]
    fn line_count_without_trailing_newline() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("a.csv");
        fs::write(&path, "id,name\n1,Alice\n2,Bob").unwrap();

        assert_eq!(LineCountEstimator.estimate(&path).unwrap().rows, 2);
    }

    #[test]
    fn line_count_of_empty_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("a.csv");
        fs::write(&path, "").unwrap();

        assert_eq!(LineCountEstimator.estimate(&path).unwrap().rows, 0);
    }

    #[test]
    fn line_count_spans_buffers() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("big.csv");
        let mut content = String::from("id\n");
        for i in 0..20_000 {
            content.push_str(&format!("{i}\n"));
        }
        fs::write(&path, content).unwrap();

        assert_eq!(LineCountEstimator.estimate(&path).unwrap().rows, 20_000);
    }

    #[test]
    fn file_size_is_unreliable() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("a.csv");
        fs::write(&path, vec![b'x'; 1050]).unwrap();

        let estimate = FileSizeEstimator::default().estimate(&path).unwrap();
        assert_eq!(estimate, RowEstimate { rows: 10, reliable: false });
    }

    #[test]
    fn missing_file_is_resource_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing.csv");

        let result = LineCountEstimator.estimate(&path);
        assert!(matches!(result, Err(CsvError::Resource { .. })));
        let result = FileSizeEstimator::new(0).estimate(&path);
        assert!(matches!(result, Err(CsvError::Resource { .. })));
    }
}
