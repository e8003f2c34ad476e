//! Key-seekable reader.

use crate::config::ReaderConfig;
use crate::cursor::StreamCursor;
use crate::error::{CsvError, CsvResult};
use crate::estimate::RowEstimate;
use crate::iter::{RecordCursor, Records};
use crate::record::Record;
use csvseek_index::{ColumnRef, Index, Indexer, MemoryIndex};
use parking_lot::RwLock;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// Shared handle to an index.
///
/// Several readers over the same file may hold the same handle: one builds
/// the index, the others only query it. Building while another reader
/// queries is not supported.
pub type SharedIndex<I> = Arc<RwLock<I>>;

/// Lifecycle state of an [`IndexedReader`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReaderState {
    /// The file is closed.
    Unopened,
    /// The file is open and the index is empty.
    Open,
    /// The file is open and the index holds at least one pair.
    Indexed,
}

/// A [`StreamCursor`] with a secondary index on a primary key column.
///
/// Forward iteration behaves exactly like the cursor's. The first
/// [`IndexedReader::seek`] scans the whole file once to build the index,
/// unless the index handed in already has content. Afterwards every seek is
/// a hash lookup followed by one file seek.
///
/// The primary key is given by name or ordinal and resolved to an ordinal
/// once the headers are known. It is always part of the indexed columns.
/// Column resolution happens once per reader; shutting the file with
/// [`IndexedReader::rewind`] keeps both the resolution and the index.
///
/// When a key occurs in several records, the first one in file order wins.
///
/// # Example
///
/// ```no_run
/// use csvseek_core::{IndexedReader, ReaderConfig};
///
/// let mut reader = IndexedReader::new("people.csv", ReaderConfig::default())
///     .primary_key("id");
///
/// if let Some(record) = reader.lookup("2")? {
///     println!("{:?}", record.get("name"));
/// }
/// # Ok::<(), csvseek_core::CsvError>(())
/// ```
#[derive(Debug)]
pub struct IndexedReader<I: Index = MemoryIndex> {
    cursor: StreamCursor,
    index: SharedIndex<I>,
    primary_key: ColumnRef,
    /// Resolved primary key, `None` until headers were validated.
    key_ordinal: Option<usize>,
    /// Columns as configured by the caller.
    index_columns: Vec<ColumnRef>,
    /// Configured columns plus the key ordinal, valid with `key_ordinal`.
    resolved_columns: Vec<ColumnRef>,
    current_key: Option<String>,
}

impl IndexedReader<MemoryIndex> {
    /// Creates a reader with a fresh in-memory index.
    ///
    /// The primary key defaults to the first column.
    pub fn new(path: impl Into<PathBuf>, config: ReaderConfig) -> Self {
        Self::with_index(path, config, Arc::new(RwLock::new(MemoryIndex::new())))
    }
}

impl<I: Index> IndexedReader<I> {
    /// Creates a reader using an existing index handle.
    pub fn with_index(
        path: impl Into<PathBuf>,
        config: ReaderConfig,
        index: SharedIndex<I>,
    ) -> Self {
        Self::from_cursor(StreamCursor::new(path, config), index)
    }

    /// Creates a reader from a configured cursor.
    ///
    /// The cursor is rewound.
    pub fn from_cursor(mut cursor: StreamCursor, index: SharedIndex<I>) -> Self {
        cursor.rewind();
        Self {
            cursor,
            index,
            primary_key: ColumnRef::Ordinal(0),
            key_ordinal: None,
            index_columns: Vec::new(),
            resolved_columns: Vec::new(),
            current_key: None,
        }
    }

    /// Sets the primary key column.
    #[must_use]
    pub fn primary_key(mut self, column: impl Into<ColumnRef>) -> Self {
        self.primary_key = column.into();
        self.key_ordinal = None;
        self
    }

    /// Sets additional columns to index.
    ///
    /// The primary key is indexed whether or not it is listed.
    #[must_use]
    pub fn index_columns<C>(mut self, columns: C) -> Self
    where
        C: IntoIterator,
        C::Item: Into<ColumnRef>,
    {
        self.index_columns = columns.into_iter().map(Into::into).collect();
        self.key_ordinal = None;
        self
    }

    /// Returns the index handle.
    #[must_use]
    pub fn index(&self) -> &SharedIndex<I> {
        &self.index
    }

    /// Returns the underlying cursor.
    #[must_use]
    pub fn cursor(&self) -> &StreamCursor {
        &self.cursor
    }

    /// Returns the resolved primary key ordinal, once headers were read.
    #[must_use]
    pub fn key_column(&self) -> Option<usize> {
        self.key_ordinal
    }

    /// Returns the indexed columns.
    ///
    /// After resolution this includes the primary key ordinal.
    #[must_use]
    pub fn indexed_columns(&self) -> &[ColumnRef] {
        if self.key_ordinal.is_some() {
            &self.resolved_columns
        } else {
            &self.index_columns
        }
    }

    /// Returns the current state.
    #[must_use]
    pub fn state(&self) -> ReaderState {
        if !self.cursor.is_open() {
            ReaderState::Unopened
        } else if self.index.read().is_empty() {
            ReaderState::Open
        } else {
            ReaderState::Indexed
        }
    }

    /// Opens the file and validates the configured columns.
    ///
    /// # Errors
    ///
    /// - [`CsvError::Resource`] or [`CsvError::EmptyFile`] from the cursor
    /// - [`CsvError::UnknownColumn`] if a configured name is not a header
    /// - [`CsvError::ColumnOutOfBounds`] if a configured ordinal is past the
    ///   last header
    pub fn open(&mut self) -> CsvResult<()> {
        self.ensure_open().map(|_| ())
    }

    /// Returns the header names.
    ///
    /// # Errors
    ///
    /// See [`IndexedReader::open`].
    pub fn headers(&mut self) -> CsvResult<&[String]> {
        self.ensure_open()?;
        Ok(self.cursor.header_names())
    }

    /// Returns true if `name` is one of the headers.
    ///
    /// # Errors
    ///
    /// See [`IndexedReader::open`].
    pub fn has_header(&mut self, name: &str) -> CsvResult<bool> {
        Ok(self.headers()?.iter().any(|h| h == name))
    }

    /// Returns true if a record is available.
    ///
    /// # Errors
    ///
    /// See [`IndexedReader::open`].
    pub fn valid(&mut self) -> CsvResult<bool> {
        self.ensure_open()?;
        self.cursor.valid()
    }

    /// Returns the current record.
    #[must_use]
    pub fn current(&self) -> Option<&Record> {
        self.cursor.current()
    }

    /// Returns the primary key value of the current record.
    #[must_use]
    pub fn key(&self) -> Option<&str> {
        self.current_key.as_deref()
    }

    /// Returns the position where the current record starts.
    #[must_use]
    pub fn byte_offset(&self) -> u64 {
        self.cursor.byte_offset()
    }

    /// Moves to the next record in file order.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or read.
    pub fn advance(&mut self) -> CsvResult<()> {
        if !self.cursor.is_open() {
            return self.open();
        }
        self.cursor.advance()?;
        self.refresh_key();
        Ok(())
    }

    /// Closes the file. The index is kept.
    pub fn rewind(&mut self) {
        self.cursor.rewind();
        self.current_key = None;
    }

    /// Fills the index by scanning the whole file.
    ///
    /// Does nothing if the index already holds at least one pair. The scan
    /// uses its own cursor, so the reader's position is not affected. If the
    /// scan fails, the partially built index is flushed.
    ///
    /// # Errors
    ///
    /// See [`IndexedReader::open`]; also any read error from the scan.
    pub fn build_index(&mut self) -> CsvResult<()> {
        self.ensure_open()?;

        let mut guard = self.index.write();
        if !guard.is_empty() {
            return Ok(());
        }

        let started = Instant::now();
        let mut indexer = Indexer::new(&mut *guard, Some(self.resolved_columns.clone()));
        let mut scan = self.cursor.sibling();
        let mut rows = 0u64;

        let result = (|| -> CsvResult<()> {
            scan.open()?;
            while let Some(record) = scan.current() {
                indexer.index(scan.byte_offset(), record.fields());
                rows += 1;
                scan.advance()?;
            }
            Ok(())
        })();

        let pairs = indexer.index_ref().size();
        if let Err(e) = result {
            guard.flush();
            return Err(e);
        }

        info!(
            path = %self.cursor.path().display(),
            rows,
            pairs,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "index built"
        );
        Ok(())
    }

    /// Positions the reader on the first record whose primary key is `key`.
    ///
    /// Builds the index first if it is empty. On success the current record
    /// is the match, [`IndexedReader::key`] returns `key`, and the next
    /// [`IndexedReader::advance`] moves to the record physically following
    /// it.
    ///
    /// # Errors
    ///
    /// - [`CsvError::KeyNotFound`] if no record has this key; the current
    ///   record and key are left as they were
    /// - any error from [`IndexedReader::open`] or
    ///   [`IndexedReader::build_index`]
    pub fn seek(&mut self, key: &str) -> CsvResult<()> {
        let ordinal = self.ensure_open()?;
        self.build_index()?;

        let offset = {
            let index = self.index.read();
            let mut rows = index.rows(&ColumnRef::Ordinal(ordinal), key);
            if rows.is_empty() {
                // An index built elsewhere may only know the column by name.
                if let Some(name) = self.cursor.header_names().get(ordinal) {
                    rows = index.rows(&ColumnRef::Name(name.clone()), key);
                }
            }
            rows.first().copied()
        };

        let Some(offset) = offset else {
            debug!(key, "seek miss");
            return Err(CsvError::key_not_found(key));
        };

        self.cursor.seek_to(offset)?;
        self.current_key = Some(key.to_string());
        debug!(key, offset, "seek hit");
        Ok(())
    }

    /// Seeks to `key` and returns the record found, or `None` if absent.
    ///
    /// # Errors
    ///
    /// Any error from [`IndexedReader::seek`] except
    /// [`CsvError::KeyNotFound`].
    pub fn lookup(&mut self, key: &str) -> CsvResult<Option<&Record>> {
        match self.seek(key) {
            Ok(()) => Ok(self.cursor.current()),
            Err(e) if e.is_key_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Returns the approximate number of data rows.
    ///
    /// # Errors
    ///
    /// Returns an error if the estimator cannot inspect the file.
    pub fn approximate_count(&mut self) -> CsvResult<Option<RowEstimate>> {
        self.cursor.approximate_count()
    }

    /// Rewinds and iterates over `(primary key, record)` pairs in file order.
    ///
    /// A record with no value in the key column is yielded with a `None` key.
    pub fn records(&mut self) -> Records<'_, Self> {
        Records::new(self)
    }

    /// Opens the cursor and resolves columns on first use.
    fn ensure_open(&mut self) -> CsvResult<usize> {
        let was_open = self.cursor.is_open();
        self.cursor.open()?;

        let (ordinal, resolved) = match self.key_ordinal {
            Some(ordinal) => (ordinal, false),
            None => (self.resolve_columns()?, true),
        };
        if !was_open || resolved {
            self.refresh_key();
        }
        Ok(ordinal)
    }

    fn resolve_columns(&mut self) -> CsvResult<usize> {
        let headers = self.cursor.header_names();

        let ordinal = match &self.primary_key {
            ColumnRef::Ordinal(k) => *k,
            ColumnRef::Name(name) => headers
                .iter()
                .position(|h| h == name)
                .ok_or_else(|| CsvError::unknown_column(name.clone()))?,
        };

        let mut columns = self.index_columns.clone();
        let key_column = ColumnRef::Ordinal(ordinal);
        if !columns.contains(&key_column) {
            columns.push(key_column);
        }

        for column in &columns {
            match column {
                ColumnRef::Ordinal(n) if *n >= headers.len() => {
                    return Err(CsvError::column_out_of_bounds(*n, headers.len()));
                }
                ColumnRef::Name(name) if !headers.contains(name) => {
                    return Err(CsvError::unknown_column(name.clone()));
                }
                _ => {}
            }
        }

        self.resolved_columns = columns;
        self.key_ordinal = Some(ordinal);
        Ok(ordinal)
    }

    fn refresh_key(&mut self) {
        self.current_key = match (self.key_ordinal, self.cursor.current()) {
            (Some(ordinal), Some(record)) => record.value_at(ordinal).map(str::to_string),
            _ => None,
        };
    }
}

impl<I: Index> RecordCursor for IndexedReader<I> {
    /// The primary key value, `None` for a record too short to have one.
    type Key = Option<String>;

    fn valid(&mut self) -> CsvResult<bool> {
        Self::valid(self)
    }

    fn current(&self) -> Option<&Record> {
        Self::current(self)
    }

    fn key(&self) -> Option<Option<String>> {
        self.cursor.current().map(|_| self.current_key.clone())
    }

    fn advance(&mut self) -> CsvResult<()> {
        Self::advance(self)
    }

    fn rewind(&mut self) {
        Self::rewind(self);
    }

    fn approximate_count(&mut self) -> CsvResult<Option<RowEstimate>> {
        Self::approximate_count(self)
    }
}
