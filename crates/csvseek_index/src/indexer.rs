//! Row indexer.

use crate::column::ColumnRef;
use crate::traits::{Condition, Index};

/// Feeds the conditions of one row at a time into an [`Index`].
///
/// A row is an ordered list of `(field, value)` pairs, where `field` is the
/// header name of the column, or its ordinal when the row is wider than the
/// headers.
///
/// With an explicit column list only those columns are indexed: ordinals are
/// resolved against the row's field order, names against the row's fields,
/// and columns absent from the row are skipped. The list may name the same
/// column twice, once by name and once by ordinal, to allow lookups by
/// either.
///
/// Without a column list every field is indexed, and each named field is
/// recorded a second time under its ordinal.
pub struct Indexer<'a, I: Index + ?Sized> {
    index: &'a mut I,
    columns: Option<Vec<ColumnRef>>,
}

impl<'a, I: Index + ?Sized> Indexer<'a, I> {
    /// Creates an indexer bound to `index`.
    pub fn new(index: &'a mut I, columns: Option<Vec<ColumnRef>>) -> Self {
        Self { index, columns }
    }

    /// Returns the bound index.
    pub fn index_ref(&self) -> &I {
        self.index
    }

    /// Returns the configured column list, if any.
    pub fn columns(&self) -> Option<&[ColumnRef]> {
        self.columns.as_deref()
    }

    /// Indexes one row under `row_id`.
    pub fn index(&mut self, row_id: u64, row: &[(ColumnRef, String)]) {
        let conditions = self.conditions(row);
        self.index.set_index(row_id, &conditions);
    }

    /// Computes the conditions recorded for `row`.
    pub fn conditions(&self, row: &[(ColumnRef, String)]) -> Vec<Condition> {
        match &self.columns {
            Some(columns) => columns
                .iter()
                .filter_map(|column| {
                    let value = match column {
                        ColumnRef::Ordinal(n) => row.get(*n).map(|(_, v)| v),
                        name => row.iter().find(|(f, _)| f == name).map(|(_, v)| v),
                    }?;
                    Some(Condition::new(column.clone(), value.clone()))
                })
                .collect(),
            None => {
                let mut conditions = Vec::with_capacity(row.len() * 2);
                for (i, (field, value)) in row.iter().enumerate() {
                    conditions.push(Condition::new(field.clone(), value.clone()));
                    if let ColumnRef::Name(_) = field {
                        conditions.push(Condition::new(ColumnRef::Ordinal(i), value.clone()));
                    }
                }
                conditions
            }
        }
    }
}
