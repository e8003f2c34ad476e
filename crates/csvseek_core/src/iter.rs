//! Cursor iteration contract.

use crate::error::CsvResult;
use crate::estimate::RowEstimate;
use crate::record::Record;

/// Forward iteration over records.
///
/// `valid` opens lazily and reports whether a record is available; `current`
/// and `key` describe that record; `advance` moves past it. Reaching the end
/// of the file is terminal until `rewind`.
pub trait RecordCursor {
    /// Identifier of a record within one pass.
    type Key;

    /// Returns true if a record is available, opening the source if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the source cannot be opened or read.
    fn valid(&mut self) -> CsvResult<bool>;

    /// Returns the current record.
    fn current(&self) -> Option<&Record>;

    /// Returns the key of the current record.
    ///
    /// Must be `Some` whenever [`RecordCursor::current`] is; [`Records`]
    /// ends at the first record without a key.
    fn key(&self) -> Option<Self::Key>;

    /// Moves to the next record.
    ///
    /// # Errors
    ///
    /// Returns an error if the source cannot be read.
    fn advance(&mut self) -> CsvResult<()>;

    /// Closes the source and resets iteration.
    fn rewind(&mut self);

    /// Returns the approximate number of data rows, if known.
    ///
    /// # Errors
    ///
    /// Returns an error if the source cannot be inspected.
    fn approximate_count(&mut self) -> CsvResult<Option<RowEstimate>>;
}

/// Iterator over the records of a [`RecordCursor`].
///
/// Created by `records()` on the readers. The cursor is rewound first, so
/// iteration always starts at the first data record. An error is yielded
/// once and ends the iteration.
pub struct Records<'a, C: RecordCursor + ?Sized> {
    cursor: &'a mut C,
    started: bool,
    done: bool,
}

impl<'a, C: RecordCursor + ?Sized> Records<'a, C> {
    /// Rewinds `cursor` and wraps it.
    pub fn new(cursor: &'a mut C) -> Self {
        cursor.rewind();
        Self {
            cursor,
            started: false,
            done: false,
        }
    }
}

impl<C: RecordCursor + ?Sized> Iterator for Records<'_, C> {
    type Item = CsvResult<(C::Key, Record)>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        if self.started {
            if let Err(e) = self.cursor.advance() {
                self.done = true;
                return Some(Err(e));
            }
        }
        self.started = true;

        match self.cursor.valid() {
            Ok(true) => {}
            Ok(false) => {
                self.done = true;
                return None;
            }
            Err(e) => {
                self.done = true;
                return Some(Err(e));
            }
        }

        match (self.cursor.key(), self.cursor.current()) {
            (Some(key), Some(record)) => Some(Ok((key, record.clone()))),
            _ => {
                self.done = true;
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CsvError;

    /// In-memory cursor over pre-built records.
    struct VecCursor {
        records: Vec<Record>,
        position: Option<usize>,
        fail_at: Option<usize>,
    }

    impl VecCursor {
        fn new(values: &[&str]) -> Self {
            let headers = vec!["v".to_string()];
            let records = values
                .iter()
                .map(|v| Record::from_values(&headers, vec![v.to_string()], true))
                .collect();
            Self {
                records,
                position: None,
                fail_at: None,
            }
        }
    }

    impl RecordCursor for VecCursor {
        type Key = usize;

        fn valid(&mut self) -> CsvResult<bool> {
            let position = *self.position.get_or_insert(0);
            Ok(position < self.records.len())
        }

        fn current(&self) -> Option<&Record> {
            self.position.and_then(|p| self.records.get(p))
        }

        fn key(&self) -> Option<usize> {
            self.position.filter(|p| *p < self.records.len())
        }

        fn advance(&mut self) -> CsvResult<()> {
            let next = self.position.map_or(0, |p| p + 1);
            if Some(next) == self.fail_at {
                return Err(CsvError::malformed(next as u64, "boom"));
            }
            self.position = Some(next);
            Ok(())
        }

        fn rewind(&mut self) {
            self.position = None;
        }

        fn approximate_count(&mut self) -> CsvResult<Option<RowEstimate>> {
            Ok(Some(RowEstimate {
                rows: self.records.len() as u64,
                reliable: true,
            }))
        }
    }

    #[test]
    fn yields_every_record_with_key() {
        let mut cursor = VecCursor::new(&["a", "b", "c"]);
        let items: Vec<_> = Records::new(&mut cursor)
            .map(|item| {
                let (key, record) = item.unwrap();
                (key, record.get("v").unwrap().to_string())
            })
            .collect();

        assert_eq!(
            items,
            vec![(0, "a".to_string()), (1, "b".to_string()), (2, "c".to_string())]
        );
    }

    #[test]
    fn starts_from_the_beginning() {
        let mut cursor = VecCursor::new(&["a", "b"]);
        cursor.valid().unwrap();
        cursor.advance().unwrap();

        assert_eq!(Records::new(&mut cursor).count(), 2);
    }

    #[test]
    fn empty_cursor_yields_nothing() {
        let mut cursor = VecCursor::new(&[]);
        assert!(Records::new(&mut cursor).next().is_none());
    }

    #[test]
    fn error_is_yielded_once() {
        let mut cursor = VecCursor::new(&["a", "b", "c"]);
        cursor.fail_at = Some(1);

        let mut records = Records::new(&mut cursor);
        assert!(records.next().unwrap().is_ok());
        assert!(matches!(records.next(), Some(Err(CsvError::Malformed { .. }))));
        assert!(records.next().is_none());
    }

    #[test]
    fn works_through_trait_object() {
        let mut cursor = VecCursor::new(&["a"]);
        let dyn_cursor: &mut dyn RecordCursor<Key = usize> = &mut cursor;
        assert_eq!(dyn_cursor.approximate_count().unwrap().unwrap().rows, 1);
        assert_eq!(Records::new(dyn_cursor).count(), 1);
    }
}
