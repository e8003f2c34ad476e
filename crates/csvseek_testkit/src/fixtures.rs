//! Test fixtures and file helpers.
//!
//! Provides temporary CSV files that are removed when dropped, and a few
//! canned files covering common scenarios.

use csvseek_core::{FileIndex, IndexedReader, ReaderConfig, SharedIndex, StreamCursor};
use parking_lot::RwLock;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

/// A CSV file in a temporary directory.
pub struct TestCsv {
    path: PathBuf,
    /// The temporary directory (kept alive to prevent cleanup).
    temp_dir: TempDir,
}

impl TestCsv {
    /// Writes `content` to a new temporary file named `data.csv`.
    pub fn new(content: &str) -> Self {
        Self::with_name("data.csv", content)
    }

    /// Writes `content` to a new temporary file named `name`.
    pub fn with_name(name: &str, content: &str) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join(name);
        fs::write(&path, content).expect("Failed to write CSV file");
        Self { path, temp_dir }
    }

    /// Returns the path of the CSV file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns a path for a sibling file in the same temporary directory.
    pub fn sibling(&self, name: &str) -> PathBuf {
        self.temp_dir.path().join(name)
    }

    /// Replaces the file content.
    pub fn rewrite(&self, content: &str) {
        fs::write(&self.path, content).expect("Failed to rewrite CSV file");
    }

    /// Returns a cursor with the default configuration.
    pub fn cursor(&self) -> StreamCursor {
        StreamCursor::new(&self.path, ReaderConfig::default())
    }

    /// Returns an indexed reader keyed on the first column.
    pub fn reader(&self) -> IndexedReader {
        IndexedReader::new(&self.path, ReaderConfig::default())
    }

    /// Returns an indexed reader backed by a file index named `name`.
    pub fn file_reader(&self, name: &str) -> (IndexedReader<FileIndex>, SharedIndex<FileIndex>) {
        let index = FileIndex::open(self.sibling(name)).expect("Failed to open index file");
        let index = Arc::new(RwLock::new(index));
        let reader = IndexedReader::with_index(&self.path, ReaderConfig::default(), index.clone());
        (reader, index)
    }
}

/// A table of string cells with a header row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    /// Header names.
    pub headers: Vec<String>,
    /// Data rows, each as wide as the headers.
    pub rows: Vec<Vec<String>>,
}

impl Table {
    /// Renders the table as CSV with `,` and `"`.
    ///
    /// Cells containing a delimiter, a quote or a line break are enclosed,
    /// with inner quotes doubled.
    pub fn to_csv(&self) -> String {
        let mut out = String::new();
        push_line(&mut out, &self.headers);
        for row in &self.rows {
            push_line(&mut out, row);
        }
        out
    }

    /// Returns the byte offset where each data row starts in [`Table::to_csv`].
    pub fn row_offsets(&self) -> Vec<u64> {
        let mut line = String::new();
        push_line(&mut line, &self.headers);
        let mut offset = line.len() as u64;

        self.rows
            .iter()
            .map(|row| {
                let start = offset;
                line.clear();
                push_line(&mut line, row);
                offset += line.len() as u64;
                start
            })
            .collect()
    }

    /// Writes the table to a temporary file.
    pub fn write(&self) -> TestCsv {
        TestCsv::new(&self.to_csv())
    }
}

fn push_line(out: &mut String, cells: &[String]) {
    for (i, cell) in cells.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        if cell.contains([',', '"', '\n', '\r']) {
            out.push('"');
            out.push_str(&cell.replace('"', "\"\""));
            out.push('"');
        } else {
            out.push_str(cell);
        }
    }
    out.push('\n');
}

/// Three people with unique ids.
pub fn people_csv() -> TestCsv {
    TestCsv::new("id,name,city\n1,Alice,Paris\n2,Bob,Oslo\n3,Carol,Paris\n")
}

/// Key `7` appears twice; the first occurrence is named `First`.
pub fn duplicate_keys_csv() -> TestCsv {
    TestCsv::new("id,name\n7,First\n8,Other\n7,Second\n")
}

/// Headers only, no data rows.
pub fn header_only_csv() -> TestCsv {
    TestCsv::new("id,name\n")
}

/// A zero-byte file.
pub fn empty_csv() -> TestCsv {
    TestCsv::new("")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> Table {
        Table {
            headers: vec!["id".into(), "note".into()],
            rows: vec![
                vec!["1".into(), "plain".into()],
                vec!["2".into(), "a, \"quoted\"\nline".into()],
                vec!["3".into(), String::new()],
            ],
        }
    }

    #[test]
    fn renders_with_quoting() {
        assert_eq!(
            table().to_csv(),
            "id,note\n1,plain\n2,\"a, \"\"quoted\"\"\nline\"\n3,\n"
        );
    }

    #[test]
    fn row_offsets_match_rendering() {
        let table = table();
        let csv = table.to_csv();
        let offsets = table.row_offsets();

        assert_eq!(offsets.len(), 3);
        assert!(csv[offsets[0] as usize..].starts_with("1,plain"));
        assert!(csv[offsets[1] as usize..].starts_with("2,\"a"));
        assert!(csv[offsets[2] as usize..].starts_with("3,"));
    }

    #[test]
    fn temp_file_is_removed_on_drop() {
        let csv = people_csv();
        let path = csv.path().to_path_buf();
        assert!(path.exists());
        drop(csv);
        assert!(!path.exists());
    }

    #[test]
    fn fixtures_have_expected_shape() {
        assert_eq!(people_csv().cursor().headers().unwrap(), &["id", "name", "city"]);
        assert!(!header_only_csv().cursor().valid().unwrap());
        assert!(empty_csv().cursor().open().is_err());

        let csv = duplicate_keys_csv();
        let mut reader = csv.reader();
        reader.seek("7").unwrap();
        assert_eq!(reader.current().unwrap().get("name"), Some("First"));
    }

    #[test]
    fn file_reader_saves_next_to_csv() {
        let csv = people_csv();
        let (mut reader, index) = csv.file_reader("people.idx");
        reader.build_index().unwrap();
        index.write().save().unwrap();

        assert!(csv.sibling("people.idx").exists());
    }
}
