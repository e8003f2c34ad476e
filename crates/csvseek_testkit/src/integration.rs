//! Cross-crate integration checks.
//!
//! Each check drives a cursor or reader over a generated [`Table`] and
//! asserts one behavior end to end. They panic on failure and are meant to
//! be called from tests.

use crate::fixtures::{Table, TestCsv};
use crate::generators::{distinct_keys, first_row_with_key};
use csvseek_core::{ColumnRef, FileIndex, Index, IndexedReader, ReaderConfig, Record};

/// Returns the cell values of a record.
pub fn values(record: &Record) -> Vec<String> {
    record.values().map(str::to_string).collect()
}

/// Reads every record of `csv` with a plain cursor.
pub fn read_all(csv: &TestCsv) -> Vec<Vec<String>> {
    let mut cursor = csv.cursor();
    cursor
        .records()
        .map(|item| values(&item.expect("Failed to read record").1))
        .collect()
}

/// Checks that forward iteration yields exactly the table rows, never the header.
pub fn check_forward_iteration(table: &Table) {
    let csv = table.write();
    let rows = read_all(&csv);

    // The header row is consumed, never counted.
    assert_eq!(rows.len(), table.rows.len());
    assert_eq!(rows, table.rows);
}

/// Checks that every key seeks to its own row.
pub fn check_seek_every_key(table: &Table) {
    let csv = table.write();
    let mut reader = csv.reader();

    // Seek in reverse file order to exercise backward jumps.
    for (i, row) in table.rows.iter().enumerate().rev() {
        reader.seek(&row[0]).expect("Key should be found");
        let record = reader.current().expect("Seek should expose a record");
        assert_eq!(values(record), *row, "wrong record for row {i}");
        assert_eq!(reader.key(), Some(row[0].as_str()));
    }
}

/// Checks that a second build leaves the index size unchanged.
pub fn check_build_idempotent(table: &Table) {
    let csv = table.write();
    let mut reader = csv.reader();

    reader.build_index().expect("First build failed");
    let size = reader.index().read().size();
    reader.build_index().expect("Second build failed");

    assert_eq!(reader.index().read().size(), size);
}

/// Checks that duplicate keys always resolve to their first row.
pub fn check_duplicate_keys(table: &Table) {
    let csv = table.write();
    let mut reader = csv.reader();
    let offsets = table.row_offsets();

    for _ in 0..2 {
        for key in distinct_keys(table) {
            let first = first_row_with_key(table, &key).expect("Key comes from the table");
            reader.seek(&key).expect("Key should be found");
            assert_eq!(reader.byte_offset(), offsets[first]);
            assert_eq!(
                values(reader.current().expect("Seek should expose a record")),
                table.rows[first]
            );
        }
    }
}

/// Checks that a missing key fails and leaves the reader where it was.
pub fn check_missing_key(table: &Table, missing: &str) {
    let csv = table.write();
    let mut reader = csv.reader();
    reader.open().expect("Open failed");
    if let Some(row) = table.rows.last() {
        reader.seek(&row[0]).expect("Key should be found");
    }

    let before = (
        reader.current().map(values),
        reader.key().map(str::to_string),
        reader.byte_offset(),
    );
    let err = reader.seek(missing).expect_err("Missing key should fail");
    assert!(err.is_key_not_found());

    let after = (
        reader.current().map(values),
        reader.key().map(str::to_string),
        reader.byte_offset(),
    );
    assert_eq!(before, after);
}

/// Checks that a saved file index restores identical lookups.
pub fn check_file_index_round_trip(table: &Table) {
    let csv = table.write();
    let (reader, index) = csv.file_reader("table.idx");
    reader
        .index_columns([ColumnRef::Ordinal(1)])
        .build_index()
        .expect("Build failed");
    index.write().save().expect("Save failed");

    let restored = FileIndex::open(csv.sibling("table.idx")).expect("Restore failed");
    let original = index.read();
    assert_eq!(restored.field_keys(), original.field_keys());
    assert_eq!(restored.size(), original.size());
    for (field, value, rows) in original.inner().entries() {
        assert_eq!(restored.rows(field, value), rows);
    }

    // A reader over the restored index finds the same rows without a rebuild.
    let mut again = IndexedReader::with_index(
        csv.path(),
        ReaderConfig::default(),
        std::sync::Arc::new(parking_lot::RwLock::new(restored)),
    );
    for key in distinct_keys(table) {
        let first = first_row_with_key(table, &key).expect("Key comes from the table");
        again.seek(&key).expect("Key should be found");
        assert_eq!(values(again.current().expect("Record")), table.rows[first]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::people_csv;
    use crate::generators::{duplicate_key_table_strategy, table_strategy, PropTestConfig};
    use csvseek_core::CsvError;
    use proptest::prelude::*;

    #[test]
    fn people_example() {
        let csv = TestCsv::new("id,name\n1,Alice\n2,Bob\n");
        let mut reader = csv.reader();

        assert_eq!(reader.headers().unwrap(), &["id", "name"]);
        let first = reader.current().unwrap();
        assert_eq!(first.get("id"), Some("1"));
        assert_eq!(first.get("name"), Some("Alice"));

        reader.seek("2").unwrap();
        let found = reader.current().unwrap();
        assert_eq!(found.get("id"), Some("2"));
        assert_eq!(found.get("name"), Some("Bob"));

        assert!(matches!(reader.seek("9"), Err(CsvError::KeyNotFound { .. })));
    }

    #[test]
    fn empty_file_example() {
        let csv = crate::fixtures::empty_csv();
        assert!(matches!(csv.reader().open(), Err(CsvError::EmptyFile { .. })));
    }

    #[test]
    fn read_all_people() {
        let rows = read_all(&people_csv());
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[1], vec!["2", "Bob", "Oslo"]);
    }

    proptest! {
        #![proptest_config(PropTestConfig::quick().to_proptest_config())]

        #[test]
        fn forward_iteration_round_trips(table in table_strategy(1, 30)) {
            check_forward_iteration(&table);
        }

        #[test]
        fn seek_finds_every_key(table in table_strategy(1, 30)) {
            check_seek_every_key(&table);
        }

        #[test]
        fn build_is_idempotent(table in table_strategy(0, 30)) {
            check_build_idempotent(&table);
        }

        #[test]
        fn duplicates_resolve_to_first(table in duplicate_key_table_strategy(30)) {
            check_duplicate_keys(&table);
        }

        #[test]
        fn missing_key_keeps_state(table in table_strategy(0, 20)) {
            // Generated keys never contain spaces.
            check_missing_key(&table, "no such key");
        }

        #[test]
        fn file_index_round_trips(table in table_strategy(1, 20)) {
            check_file_index_round_trip(&table);
        }
    }
}
