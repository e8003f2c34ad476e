//! Parsed records.

use csvseek_index::ColumnRef;
use serde::ser::{Serialize, SerializeMap, Serializer};

/// One record, as an ordered list of `(column, value)` pairs.
///
/// Columns are keyed by header name. Fields past the last header are keyed by
/// their ordinal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    fields: Vec<(ColumnRef, String)>,
}

impl Record {
    /// Builds a record from raw field values and the header names.
    pub fn from_values(headers: &[String], values: Vec<String>, trim: bool) -> Self {
        let fields = values
            .into_iter()
            .enumerate()
            .map(|(i, value)| {
                let column = match headers.get(i) {
                    Some(name) => ColumnRef::Name(name.clone()),
                    None => ColumnRef::Ordinal(i),
                };
                let value = if trim {
                    value.trim().to_string()
                } else {
                    value
                };
                (column, value)
            })
            .collect();
        Self { fields }
    }

    /// Returns the value of the first field named `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(column, _)| column.as_name() == Some(name))
            .map(|(_, value)| value.as_str())
    }

    /// Returns the value at position `i`.
    #[must_use]
    pub fn value_at(&self, i: usize) -> Option<&str> {
        self.fields.get(i).map(|(_, value)| value.as_str())
    }

    /// Returns the value for a column given by name or ordinal.
    #[must_use]
    pub fn column(&self, column: &ColumnRef) -> Option<&str> {
        match column {
            ColumnRef::Name(name) => self.get(name),
            ColumnRef::Ordinal(i) => self.value_at(*i),
        }
    }

    /// Returns the number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if the record has no field.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Returns the `(column, value)` pairs in file order.
    #[must_use]
    pub fn fields(&self) -> &[(ColumnRef, String)] {
        &self.fields
    }

    /// Iterates over the values in file order.
    pub fn values(&self) -> impl Iterator<Item = &str> + '_ {
        self.fields.iter().map(|(_, value)| value.as_str())
    }

    /// Consumes the record, returning its pairs.
    #[must_use]
    pub fn into_fields(self) -> Vec<(ColumnRef, String)> {
        self.fields
    }
}

/// Serializes as a map in file order; ordinal columns use their number as key.
impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (column, value) in &self.fields {
            match column {
                ColumnRef::Name(name) => map.serialize_entry(name, value)?,
                ColumnRef::Ordinal(i) => map.serialize_entry(&i.to_string(), value)?,
            }
        }
        map.end()
    }
}
