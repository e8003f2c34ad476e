//! Forward-only streaming cursor.

use crate::config::ReaderConfig;
use crate::error::{CsvError, CsvResult};
use crate::estimate::{LineCountEstimator, RowEstimate, RowEstimator};
use crate::iter::{RecordCursor, Records};
use crate::record::Record;
use crate::splitter::{CsvSplitter, RecordSplitter};
use std::fs::File;
use std::io::{BufRead, BufReader, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// Byte order mark some editors put in front of the header.
const UTF8_BOM: char = '\u{feff}';

/// A forward-only cursor over a delimited file.
///
/// The file is opened on first access. The first record is consumed as the
/// header row and is never returned as data; the first record exposed is the
/// first data record.
///
/// Before each record is read, the cursor remembers the byte position it
/// starts at ([`StreamCursor::byte_offset`]). Seeking back to that position
/// with [`StreamCursor::seek_to`] reads the same record again.
///
/// # Resource Model
///
/// The cursor exclusively owns its file handle. [`StreamCursor::rewind`]
/// closes it; the next access reopens the file and reads the header again.
///
/// # Example
///
/// ```no_run
/// use csvseek_core::{ReaderConfig, StreamCursor};
///
/// let mut cursor = StreamCursor::new("people.csv", ReaderConfig::default());
/// while cursor.valid()? {
///     let record = cursor.current().unwrap();
///     println!("{} at byte {}", record.get("name").unwrap_or(""), cursor.byte_offset());
///     cursor.advance()?;
/// }
/// # Ok::<(), csvseek_core::CsvError>(())
/// ```
#[derive(Debug)]
pub struct StreamCursor {
    path: PathBuf,
    config: ReaderConfig,
    splitter: Arc<dyn RecordSplitter>,
    estimator: Option<Arc<dyn RowEstimator>>,
    estimate: Option<RowEstimate>,
    source: Option<BufReader<File>>,
    /// Position of the next unread byte.
    position: u64,
    /// Position where the most recently fetched record starts.
    byte_offset: u64,
    headers: Vec<String>,
    current: Option<Record>,
    logical_index: usize,
    eof: bool,
}

impl StreamCursor {
    /// Creates a cursor over `path` using the default `csv` splitter.
    ///
    /// Nothing is opened until the first access.
    pub fn new(path: impl Into<PathBuf>, config: ReaderConfig) -> Self {
        let splitter = Arc::new(CsvSplitter::from_config(&config));
        Self::with_splitter(path, config, splitter)
    }

    /// Creates a cursor with a custom record splitter.
    pub fn with_splitter(
        path: impl Into<PathBuf>,
        config: ReaderConfig,
        splitter: Arc<dyn RecordSplitter>,
    ) -> Self {
        Self {
            path: path.into(),
            config,
            splitter,
            estimator: Some(Arc::new(LineCountEstimator)),
            estimate: None,
            source: None,
            position: 0,
            byte_offset: 0,
            headers: Vec::new(),
            current: None,
            logical_index: 0,
            eof: false,
        }
    }

    /// Replaces the row count estimator.
    #[must_use]
    pub fn with_estimator(mut self, estimator: impl RowEstimator + 'static) -> Self {
        self.estimator = Some(Arc::new(estimator));
        self.estimate = None;
        self
    }

    /// Removes the row count estimator.
    #[must_use]
    pub fn without_estimator(mut self) -> Self {
        self.estimator = None;
        self.estimate = None;
        self
    }

    /// Returns a fresh, unopened cursor over the same file and dialect.
    pub(crate) fn sibling(&self) -> Self {
        Self::with_splitter(self.path.clone(), self.config.clone(), self.splitter.clone())
            .without_estimator()
    }

    /// Returns the file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the reader configuration.
    #[must_use]
    pub fn config(&self) -> &ReaderConfig {
        &self.config
    }

    /// Returns true if the file is currently open.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.source.is_some()
    }

    /// Returns true once the end of the file has been reached.
    #[must_use]
    pub fn is_eof(&self) -> bool {
        self.eof
    }

    /// Opens the file if it is not open yet.
    ///
    /// Reads the header row and positions the cursor on the first data
    /// record. Calling this on an open cursor does nothing.
    ///
    /// # Errors
    ///
    /// - [`CsvError::Resource`] if the file cannot be opened
    /// - [`CsvError::EmptyFile`] if the file has no readable line
    /// - [`CsvError::Malformed`] if the header or first record is not valid
    ///   UTF-8 or cannot be split
    /// - [`CsvError::Io`] on read failure
    pub fn open(&mut self) -> CsvResult<()> {
        if self.source.is_some() {
            return Ok(());
        }

        let file = File::open(&self.path).map_err(|e| CsvError::resource(&self.path, e))?;
        self.source = Some(BufReader::new(file));
        self.position = 0;
        self.byte_offset = 0;
        debug!(path = %self.path.display(), "opened file");

        let header = match self.read_record() {
            Ok(Some(header)) => header,
            Ok(None) => {
                self.close();
                return Err(CsvError::empty_file(&self.path));
            }
            Err(e) => {
                self.close();
                return Err(e);
            }
        };

        self.headers = header
            .iter()
            .enumerate()
            .map(|(i, name)| {
                let name = if i == 0 {
                    name.trim_start_matches(UTF8_BOM)
                } else {
                    name.as_str()
                };
                name.trim().to_string()
            })
            .collect();
        debug!(columns = self.headers.len(), "captured headers");

        self.fetch()
    }

    /// Moves to the next record.
    ///
    /// On an unopened cursor this only opens the file, which positions it on
    /// the first data record. At the end of the file this does nothing.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or read.
    pub fn advance(&mut self) -> CsvResult<()> {
        if self.source.is_none() {
            return self.open();
        }
        if self.eof {
            return Ok(());
        }
        self.fetch()?;
        self.logical_index += 1;
        Ok(())
    }

    /// Returns true if a record is available.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened.
    pub fn valid(&mut self) -> CsvResult<bool> {
        self.open()?;
        Ok(!self.eof && self.current.is_some())
    }

    /// Returns the current record, or `None` before opening or at the end.
    #[must_use]
    pub fn current(&self) -> Option<&Record> {
        if self.eof {
            None
        } else {
            self.current.as_ref()
        }
    }

    /// Returns the 0-based number of records advanced past since the last rewind.
    #[must_use]
    pub fn key(&self) -> usize {
        self.logical_index
    }

    /// Returns the position where the current record starts.
    #[must_use]
    pub fn byte_offset(&self) -> u64 {
        self.byte_offset
    }

    /// Returns the header names, opening the file if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened.
    pub fn headers(&mut self) -> CsvResult<&[String]> {
        self.open()?;
        Ok(&self.headers)
    }

    /// Returns the headers read so far (empty before opening).
    #[must_use]
    pub fn header_names(&self) -> &[String] {
        &self.headers
    }

    /// Returns true if `name` is one of the headers.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened.
    pub fn has_header(&mut self, name: &str) -> CsvResult<bool> {
        Ok(self.headers()?.iter().any(|h| h == name))
    }

    /// Closes the file and clears all iteration state.
    pub fn rewind(&mut self) {
        self.close();
        self.eof = false;
        self.logical_index = 0;
        self.current = None;
        self.headers.clear();
        self.position = 0;
        self.byte_offset = 0;
    }

    /// Repositions the cursor on the record starting at `offset`.
    ///
    /// `offset` must be a value previously reported by
    /// [`StreamCursor::byte_offset`] for a data record. The end-of-file flag
    /// is cleared; if nothing can be read at `offset` the cursor ends up at
    /// the end again. The logical index is left unchanged.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened, seeked or read.
    pub fn seek_to(&mut self, offset: u64) -> CsvResult<()> {
        self.open()?;
        if let Some(source) = self.source.as_mut() {
            source.seek(SeekFrom::Start(offset))?;
        }
        self.position = offset;
        self.eof = false;
        self.fetch()
    }

    /// Returns the approximate number of data rows.
    ///
    /// The estimate is computed once and cached. Returns `None` when no
    /// estimator is configured.
    ///
    /// # Errors
    ///
    /// Returns an error if the estimator cannot inspect the file.
    pub fn approximate_count(&mut self) -> CsvResult<Option<RowEstimate>> {
        if self.estimate.is_none() {
            if let Some(estimator) = &self.estimator {
                self.estimate = Some(estimator.estimate(&self.path)?);
            }
        }
        Ok(self.estimate)
    }

    /// Rewinds and iterates over `(logical index, record)` pairs.
    pub fn records(&mut self) -> Records<'_, Self> {
        Records::new(self)
    }

    fn close(&mut self) {
        self.source = None;
    }

    fn fetch(&mut self) -> CsvResult<()> {
        self.current = None;
        match self.read_record()? {
            Some(values) => {
                self.current = Some(Record::from_values(
                    &self.headers,
                    values,
                    self.config.trim_values,
                ));
            }
            None => self.eof = true,
        }
        Ok(())
    }

    /// Reads and splits the next record.
    ///
    /// Returns `Ok(None)` at the end of the file. Updates `byte_offset` to the
    /// start of the returned record.
    fn read_record(&mut self) -> CsvResult<Option<Vec<String>>> {
        let Some(source) = self.source.as_mut() else {
            return Ok(None);
        };
        let limit = self.config.max_line_length;

        loop {
            let start = self.position;
            self.byte_offset = start;

            let mut raw = Vec::new();
            let n = source.read_until(b'\n', &mut raw)?;
            if n == 0 {
                return Ok(None);
            }
            self.position += n as u64;
            check_length(&raw, start, limit)?;

            if self.config.skip_blank_lines && is_blank(&raw) {
                continue;
            }

            while !self.splitter.is_complete(text_of(&raw, start)?) {
                let n = source.read_until(b'\n', &mut raw)?;
                if n == 0 {
                    break;
                }
                self.position += n as u64;
                check_length(&raw, start, limit)?;
            }

            let fields = self
                .splitter
                .split(text_of(&raw, start)?)
                .map_err(|e| CsvError::malformed(start, e.message))?;
            return Ok(Some(fields));
        }
    }
}

impl RecordCursor for StreamCursor {
    type Key = usize;

    fn valid(&mut self) -> CsvResult<bool> {
        StreamCursor::valid(self)
    }

    fn current(&self) -> Option<&Record> {
        StreamCursor::current(self)
    }

    fn key(&self) -> Option<usize> {
        self.current().map(|_| self.logical_index)
    }

    fn advance(&mut self) -> CsvResult<()> {
        StreamCursor::advance(self)
    }

    fn rewind(&mut self) {
        StreamCursor::rewind(self);
    }

    fn approximate_count(&mut self) -> CsvResult<Option<RowEstimate>> {
        StreamCursor::approximate_count(self)
    }
}

/// Returns the record text without its final line terminator.
///
/// Bytes that are not valid UTF-8 fail the record rather than being
/// replaced, so distinct keys never collapse into one.
fn text_of(raw: &[u8], offset: u64) -> CsvResult<&str> {
    let mut end = raw.len();
    if end > 0 && raw[end - 1] == b'\n' {
        end -= 1;
        if end > 0 && raw[end - 1] == b'\r' {
            end -= 1;
        }
    }
    std::str::from_utf8(&raw[..end]).map_err(|e| {
        CsvError::malformed(offset, format!("invalid UTF-8 at byte {}", e.valid_up_to()))
    })
}

fn is_blank(raw: &[u8]) -> bool {
    raw.iter().all(u8::is_ascii_whitespace)
}

fn check_length(raw: &[u8], offset: u64, limit: usize) -> CsvResult<()> {
    if limit > 0 && raw.len() > limit {
        let trimmed = raw
            .strip_suffix(b"\n")
            .map(|r| r.strip_suffix(b"\r").unwrap_or(r))
            .unwrap_or(raw);
        if trimmed.len() > limit {
            return Err(CsvError::RecordTooLong { offset, limit });
        }
    }
    Ok(())
}
