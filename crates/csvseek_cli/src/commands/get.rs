//! Get command implementation.

use super::{column_label, Format};
use crate::error::CliResult;
use csvseek_core::{ColumnRef, FileIndex, Index, IndexedReader, ReaderConfig, Record};
use parking_lot::RwLock;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// Runs the get command.
///
/// Without `index_path` the index lives in memory for this run only. With
/// it, the index is restored from that file, and saved back when this run
/// had to build it.
pub fn run(
    path: &Path,
    config: ReaderConfig,
    key: &str,
    key_column: ColumnRef,
    index_path: Option<&Path>,
    format: &str,
    out: &mut impl Write,
) -> CliResult<()> {
    let format = Format::parse(format)?;

    let Some(index_path) = index_path else {
        let mut reader = IndexedReader::new(path, config).primary_key(key_column);
        reader.seek(key)?;
        return print(reader.current(), format, out);
    };

    let index = Arc::new(RwLock::new(FileIndex::open(index_path)?));
    let was_empty = index.read().is_empty();
    debug!(path = %index_path.display(), was_empty, "using index file");
    let mut reader =
        IndexedReader::with_index(path, config, index.clone()).primary_key(key_column);

    let result = reader.seek(key);
    // Persist what this run had to build, even when the key was missing.
    if was_empty && !index.read().is_empty() {
        index.write().save()?;
    }
    result?;

    print(reader.current(), format, out)
}

fn print(record: Option<&Record>, format: Format, out: &mut impl Write) -> CliResult<()> {
    let Some(record) = record else {
        return Ok(());
    };

    match format {
        Format::Json => writeln!(out, "{}", serde_json::to_string_pretty(record)?)?,
        Format::Text => {
            for (column, value) in record.fields() {
                writeln!(out, "{}: {value}", column_label(column))?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::{output, write_csv, PEOPLE};
    use crate::error::CliError;
    use csvseek_core::CsvError;

    #[test]
    fn finds_by_first_column() {
        let (_dir, path) = write_csv(PEOPLE);
        let mut out = Vec::new();
        run(
            &path,
            ReaderConfig::default(),
            "2",
            ColumnRef::Ordinal(0),
            None,
            "text",
            &mut out,
        )
        .unwrap();

        assert_eq!(output(out), "id: 2\nname: Bob\ncity: Oslo\n");
    }

    #[test]
    fn finds_by_named_column_as_json() {
        let (_dir, path) = write_csv(PEOPLE);
        let mut out = Vec::new();
        run(
            &path,
            ReaderConfig::default(),
            "Carol",
            "name".parse().unwrap(),
            None,
            "json",
            &mut out,
        )
        .unwrap();

        let value: serde_json::Value = serde_json::from_str(&output(out)).unwrap();
        assert_eq!(value["id"], "3");
    }

    #[test]
    fn extra_fields_print_like_cat() {
        let (_dir, path) = write_csv("id\n1,x\n");
        let mut out = Vec::new();
        run(
            &path,
            ReaderConfig::default(),
            "1",
            ColumnRef::Ordinal(0),
            None,
            "text",
            &mut out,
        )
        .unwrap();

        assert_eq!(output(out), "id: 1\n1: x\n");
    }

    #[test]
    fn missing_key_is_an_error() {
        let (_dir, path) = write_csv(PEOPLE);
        let mut out = Vec::new();
        let result = run(
            &path,
            ReaderConfig::default(),
            "42",
            ColumnRef::Ordinal(0),
            None,
            "text",
            &mut out,
        );

        match result {
            Err(CliError::Csv(CsvError::KeyNotFound { key })) => assert_eq!(key, "42"),
            other => panic!("expected key not found, got {other:?}"),
        }
        assert!(out.is_empty());
    }

    #[test]
    fn builds_and_saves_index_file() {
        let (dir, path) = write_csv(PEOPLE);
        let index_path = dir.path().join("people.idx");

        let mut out = Vec::new();
        run(
            &path,
            ReaderConfig::default(),
            "1",
            ColumnRef::Ordinal(0),
            Some(&index_path),
            "text",
            &mut out,
        )
        .unwrap();
        assert!(index_path.exists());

        let restored = FileIndex::open(&index_path).unwrap();
        assert_eq!(restored.rows(&ColumnRef::Ordinal(0), "3").len(), 1);
    }

    #[test]
    fn saves_index_even_on_miss() {
        let (dir, path) = write_csv(PEOPLE);
        let index_path = dir.path().join("people.idx");

        let mut out = Vec::new();
        let result = run(
            &path,
            ReaderConfig::default(),
            "nope",
            ColumnRef::Ordinal(0),
            Some(&index_path),
            "text",
            &mut out,
        );
        assert!(result.is_err());
        assert!(index_path.exists());
    }
}
