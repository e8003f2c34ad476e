//! Index trait and condition type.

use crate::column::ColumnRef;

/// A field/value couple associated with a row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Condition {
    /// Field the value was found in.
    pub field: ColumnRef,
    /// The field value.
    pub value: String,
}

impl Condition {
    /// Creates a new condition.
    pub fn new(field: impl Into<ColumnRef>, value: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
        }
    }
}

/// An index mapping `(field, value)` pairs to row identifiers.
///
/// Row identifiers are opaque `u64`s. For a delimited file they are the byte
/// offset where the record starts, so they can be used as seek targets.
///
/// # Invariants
///
/// - `rows` returns identifiers in insertion order
/// - Querying an unknown pair returns an empty slice
/// - `is_empty` is true after `flush`
///
/// # Implementors
///
/// - [`super::MemoryIndex`] - In-memory storage
/// - [`super::FileIndex`] - In-memory storage persisted to a file on demand
pub trait Index: Send + Sync {
    /// Returns true if no pair has been recorded.
    fn is_empty(&self) -> bool;

    /// Discards every recorded pair.
    ///
    /// This is a data reset only; whether [`Index::is_updated`] is cleared
    /// is up to the implementation.
    fn flush(&mut self);

    /// Returns true once [`Index::set_index`] has been called.
    fn is_updated(&self) -> bool;

    /// Returns every field with at least one recorded value, sorted.
    fn field_keys(&self) -> Vec<ColumnRef>;

    /// Returns the number of distinct `(field, value)` pairs recorded.
    fn size(&self) -> usize;

    /// Returns true if at least one row matches the pair.
    fn has_rows(&self, field: &ColumnRef, value: &str) -> bool {
        !self.rows(field, value).is_empty()
    }

    /// Returns the rows matching the pair, in insertion order.
    fn rows(&self, field: &ColumnRef, value: &str) -> &[u64];

    /// Records `row_id` for every condition.
    ///
    /// Duplicates are appended, not collapsed.
    fn set_index(&mut self, row_id: u64, conditions: &[Condition]);
}
