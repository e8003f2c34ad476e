//! In-memory index.

use crate::column::ColumnRef;
use crate::traits::{Condition, Index};
use std::collections::HashMap;

/// Values of one field, each with the rows it was seen in.
type ValueRows = HashMap<String, Vec<u64>>;

/// An in-memory index.
///
/// Storage is a two-level hash map: field, then value, then the ordered list
/// of rows. Lookups are O(1) on average.
///
/// Memory grows with the number of distinct indexed values, so index only
/// the columns you seek on when files are large.
///
/// # Example
///
/// ```rust
/// use csvseek_index::{Condition, Index, MemoryIndex};
///
/// let mut index = MemoryIndex::new();
/// index.set_index(0, &[Condition::new("id", "1")]);
/// index.set_index(8, &[Condition::new("id", "1")]);
/// assert_eq!(index.rows(&"id".into(), "1"), &[0, 8]);
/// assert_eq!(index.size(), 1);
/// ```
#[derive(Debug, Default, Clone)]
pub struct MemoryIndex {
    fields: HashMap<ColumnRef, ValueRows>,
    updated: bool,
}

impl MemoryIndex {
    /// Creates a new empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Iterates over `(field, value, rows)` for every recorded pair.
    pub fn entries(&self) -> impl Iterator<Item = (&ColumnRef, &str, &[u64])> + '_ {
        self.fields.iter().flat_map(|(field, values)| {
            values
                .iter()
                .map(move |(value, rows)| (field, value.as_str(), rows.as_slice()))
        })
    }

    /// Inserts a whole row list for a pair, replacing any previous list.
    ///
    /// Used when restoring a persisted index; does not mark the index updated.
    pub(crate) fn restore_rows(&mut self, field: ColumnRef, value: String, rows: Vec<u64>) {
        if rows.is_empty() {
            return;
        }
        self.fields.entry(field).or_default().insert(value, rows);
    }
}

impl Index for MemoryIndex {
    fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    fn flush(&mut self) {
        // The updated flag survives a flush.
        self.fields.clear();
    }

    fn is_updated(&self) -> bool {
        self.updated
    }

    fn field_keys(&self) -> Vec<ColumnRef> {
        let mut keys: Vec<ColumnRef> = self.fields.keys().cloned().collect();
        keys.sort();
        keys
    }

    fn size(&self) -> usize {
        self.fields.values().map(HashMap::len).sum()
    }

    fn rows(&self, field: &ColumnRef, value: &str) -> &[u64] {
        self.fields
            .get(field)
            .and_then(|values| values.get(value))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    fn set_index(&mut self, row_id: u64, conditions: &[Condition]) {
        for condition in conditions {
            self.fields
                .entry(condition.field.clone())
                .or_default()
                .entry(condition.value.clone())
                .or_default()
                .push(row_id);
        }
        self.updated = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id() -> ColumnRef {
        ColumnRef::Name("id".into())
    }

    #[test]
    fn new_is_empty() {
        let index = MemoryIndex::new();
        assert!(index.is_empty());
        assert!(!index.is_updated());
        assert_eq!(index.size(), 0);
        assert!(index.field_keys().is_empty());
    }

    #[test]
    fn set_index_and_rows() {
        let mut index = MemoryIndex::new();
        index.set_index(
            10,
            &[
                Condition::new("id", "a"),
                Condition::new(ColumnRef::Ordinal(0), "a"),
            ],
        );

        assert!(!index.is_empty());
        assert!(index.is_updated());
        assert_eq!(index.rows(&id(), "a"), &[10]);
        assert_eq!(index.rows(&ColumnRef::Ordinal(0), "a"), &[10]);
        assert!(index.has_rows(&id(), "a"));
    }

    #[test]
    fn unknown_pair_is_empty() {
        let mut index = MemoryIndex::new();
        index.set_index(1, &[Condition::new("id", "a")]);

        assert!(index.rows(&id(), "missing").is_empty());
        assert!(index.rows(&ColumnRef::Name("other".into()), "a").is_empty());
        assert!(!index.has_rows(&id(), "missing"));
    }

    #[test]
    fn rows_keep_insertion_order() {
        let mut index = MemoryIndex::new();
        index.set_index(30, &[Condition::new("id", "k")]);
        index.set_index(10, &[Condition::new("id", "k")]);
        index.set_index(20, &[Condition::new("id", "k")]);

        assert_eq!(index.rows(&id(), "k"), &[30, 10, 20]);
    }

    #[test]
    fn duplicates_are_appended() {
        let mut index = MemoryIndex::new();
        index.set_index(5, &[Condition::new("id", "k"), Condition::new("id", "k")]);

        assert_eq!(index.rows(&id(), "k"), &[5, 5]);
        assert_eq!(index.size(), 1);
    }

    #[test]
    fn size_counts_distinct_pairs() {
        let mut index = MemoryIndex::new();
        index.set_index(0, &[Condition::new("a", "x"), Condition::new("b", "x")]);
        index.set_index(1, &[Condition::new("a", "x"), Condition::new("b", "y")]);
        index.set_index(2, &[Condition::new("a", "z")]);

        // a: {x, z}, b: {x, y}
        assert_eq!(index.size(), 4);
    }

    #[test]
    fn field_keys_sorted() {
        let mut index = MemoryIndex::new();
        index.set_index(
            0,
            &[
                Condition::new("b", "1"),
                Condition::new(ColumnRef::Ordinal(1), "1"),
            ],
        );
        index.set_index(0, &[Condition::new("a", "1")]);

        assert_eq!(
            index.field_keys(),
            vec![
                ColumnRef::Name("a".into()),
                ColumnRef::Name("b".into()),
                ColumnRef::Ordinal(1),
            ]
        );
    }

    #[test]
    fn flush_clears_data_keeps_updated() {
        let mut index = MemoryIndex::new();
        index.set_index(0, &[Condition::new("id", "1")]);
        index.flush();

        assert!(index.is_empty());
        assert_eq!(index.size(), 0);
        assert!(index.rows(&id(), "1").is_empty());
        assert!(index.is_updated());
    }

    #[test]
    fn empty_conditions_still_mark_updated() {
        let mut index = MemoryIndex::new();
        index.set_index(0, &[]);

        assert!(index.is_empty());
        assert!(index.is_updated());
    }

    #[test]
    fn entries_visit_every_pair() {
        let mut index = MemoryIndex::new();
        index.set_index(0, &[Condition::new("a", "x"), Condition::new("b", "y")]);
        index.set_index(4, &[Condition::new("a", "x")]);

        let mut entries: Vec<(ColumnRef, String, Vec<u64>)> = index
            .entries()
            .map(|(f, v, r)| (f.clone(), v.to_string(), r.to_vec()))
            .collect();
        entries.sort();

        assert_eq!(
            entries,
            vec![
                (ColumnRef::Name("a".into()), "x".into(), vec![0, 4]),
                (ColumnRef::Name("b".into()), "y".into(), vec![0]),
            ]
        );
    }
}
