//! Index command implementation.

use crate::error::CliResult;
use csvseek_core::{ColumnRef, FileIndex, Index, IndexedReader, ReaderConfig};
use parking_lot::RwLock;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;

/// Runs the index command.
///
/// Any existing file at `output` is replaced.
pub fn run(
    path: &Path,
    config: ReaderConfig,
    output: &Path,
    key_column: ColumnRef,
    columns: Vec<ColumnRef>,
    out: &mut impl Write,
) -> CliResult<()> {
    let index = Arc::new(RwLock::new(FileIndex::create(output)));
    let mut reader = IndexedReader::with_index(path, config, index.clone())
        .primary_key(key_column)
        .index_columns(columns);

    reader.build_index()?;

    let mut index = index.write();
    index.save()?;

    writeln!(out, "Index: {}", index.path().display())?;
    writeln!(out, "Pairs: {}", index.size())?;
    let fields: Vec<String> = index.field_keys().iter().map(ToString::to_string).collect();
    writeln!(out, "Fields: {}", fields.join(", "))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::{output, write_csv, PEOPLE};
    use std::fs;

    #[test]
    fn writes_index_with_extra_columns() {
        let (dir, path) = write_csv(PEOPLE);
        let index_path = dir.path().join("people.idx");

        let mut out = Vec::new();
        run(
            &path,
            ReaderConfig::default(),
            &index_path,
            "id".parse().unwrap(),
            vec!["city".parse().unwrap()],
            &mut out,
        )
        .unwrap();

        let text = output(out);
        assert!(text.contains("Pairs: 5"));
        assert!(text.contains("Fields: city, #0"));

        let restored = FileIndex::open(&index_path).unwrap();
        assert_eq!(restored.rows(&"city".into(), "Paris").len(), 2);
    }

    #[test]
    fn replaces_broken_index_file() {
        let (dir, path) = write_csv(PEOPLE);
        let index_path = dir.path().join("people.idx");
        fs::write(&index_path, b"garbage").unwrap();

        let mut out = Vec::new();
        run(
            &path,
            ReaderConfig::default(),
            &index_path,
            ColumnRef::Ordinal(0),
            Vec::new(),
            &mut out,
        )
        .unwrap();

        assert_eq!(FileIndex::open(&index_path).unwrap().size(), 3);
    }
}
