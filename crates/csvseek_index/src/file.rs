//! File-persisted index.

use crate::column::ColumnRef;
use crate::error::{IndexError, IndexResult};
use crate::memory::MemoryIndex;
use crate::traits::{Condition, Index};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Magic bytes for index files: "CSVX"
pub const INDEX_MAGIC: [u8; 4] = *b"CSVX";

/// Current index file format version.
pub const INDEX_VERSION: u8 = 1;

/// On-disk envelope, encoded as CBOR.
#[derive(Debug, Serialize, Deserialize)]
struct IndexFile {
    magic: [u8; 4],
    version: u8,
    fields: Vec<FieldEntry>,
}

#[derive(Debug, Serialize, Deserialize)]
struct FieldEntry {
    field: ColumnRef,
    values: Vec<ValueEntry>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ValueEntry {
    value: String,
    offsets: Vec<u64>,
}

/// An index that is restored from and saved to a file.
///
/// All operations go to an inner [`MemoryIndex`]. The file is read once when
/// the index is opened and written only when [`FileIndex::save`] is called.
///
/// # Format
///
/// ```text
/// IndexFile {
///     magic: "CSVX"
///     version: u8
///     fields: [ { field: ColumnRef, values: [ { value, offsets: [u64] } ] } ]
/// }
/// ```
///
/// Fields and values are written sorted, so two indexes with the same
/// content produce the same bytes. Offsets keep their insertion order.
///
/// # Example
///
/// ```no_run
/// use csvseek_index::{Condition, FileIndex, Index};
///
/// let mut index = FileIndex::open("people.csv.idx").unwrap();
/// if index.is_empty() {
///     index.set_index(0, &[Condition::new("id", "1")]);
///     index.save().unwrap();
/// }
/// ```
#[derive(Debug)]
pub struct FileIndex {
    path: PathBuf,
    inner: MemoryIndex,
    file_exists: bool,
}

impl FileIndex {
    /// Opens the index stored at `path`.
    ///
    /// A missing file is not an error: the index starts empty and the file is
    /// created on the first [`FileIndex::save`].
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::Corrupt`] if the file exists but cannot be read
    /// or does not decode to a valid index.
    pub fn open(path: impl AsRef<Path>) -> IndexResult<Self> {
        let path = path.as_ref().to_path_buf();

        if !path.exists() {
            return Ok(Self {
                path,
                inner: MemoryIndex::new(),
                file_exists: false,
            });
        }

        let data = fs::read(&path)
            .map_err(|e| IndexError::corrupt(&path, format!("file is not readable: {e}")))?;
        let inner = decode(&path, &data)?;

        if inner.is_empty() {
            warn!(path = %path.display(), "restored index file holds no pairs");
        } else {
            info!(path = %path.display(), pairs = inner.size(), "restored index");
        }

        Ok(Self {
            path,
            inner,
            file_exists: true,
        })
    }

    /// Creates an empty index bound to `path` without reading it.
    ///
    /// An existing file, valid or not, is replaced on the next
    /// [`FileIndex::save`].
    #[must_use]
    pub fn create(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let file_exists = path.exists();
        Self {
            path,
            inner: MemoryIndex::new(),
            file_exists,
        }
    }

    /// Writes the whole index to its file.
    ///
    /// The data goes to a sibling temporary file first, is synced, then
    /// renamed over the target.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::Persistence`] if any write step fails.
    pub fn save(&mut self) -> IndexResult<()> {
        let data = encode(&self.inner)?;
        let temp_path = temp_path(&self.path);

        let write = || -> std::io::Result<()> {
            let mut file = File::create(&temp_path)?;
            file.write_all(&data)?;
            file.sync_all()?;
            drop(file);
            fs::rename(&temp_path, &self.path)?;
            sync_parent(&self.path)
        };

        if let Err(e) = write() {
            let _ = fs::remove_file(&temp_path);
            return Err(IndexError::persistence(&self.path, e));
        }

        self.file_exists = true;
        info!(path = %self.path.display(), pairs = self.inner.size(), "saved index");
        Ok(())
    }

    /// Returns the path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns true if the backing file existed at open or has been saved.
    #[must_use]
    pub fn file_exists(&self) -> bool {
        self.file_exists
    }

    /// Returns the in-memory index.
    #[must_use]
    pub fn inner(&self) -> &MemoryIndex {
        &self.inner
    }

    /// Consumes this index, returning the in-memory index.
    #[must_use]
    pub fn into_inner(self) -> MemoryIndex {
        self.inner
    }
}

impl Index for FileIndex {
    fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    fn flush(&mut self) {
        self.inner.flush();
    }

    fn is_updated(&self) -> bool {
        self.inner.is_updated()
    }

    fn field_keys(&self) -> Vec<ColumnRef> {
        self.inner.field_keys()
    }

    fn size(&self) -> usize {
        self.inner.size()
    }

    fn rows(&self, field: &ColumnRef, value: &str) -> &[u64] {
        self.inner.rows(field, value)
    }

    fn set_index(&mut self, row_id: u64, conditions: &[Condition]) {
        self.inner.set_index(row_id, conditions);
    }
}

fn encode(index: &MemoryIndex) -> IndexResult<Vec<u8>> {
    let mut grouped: BTreeMap<&ColumnRef, Vec<ValueEntry>> = BTreeMap::new();
    for (field, value, rows) in index.entries() {
        grouped.entry(field).or_default().push(ValueEntry {
            value: value.to_string(),
            offsets: rows.to_vec(),
        });
    }

    let fields = grouped
        .into_iter()
        .map(|(field, mut values)| {
            values.sort_by(|a, b| a.value.cmp(&b.value));
            FieldEntry {
                field: field.clone(),
                values,
            }
        })
        .collect();

    let file = IndexFile {
        magic: INDEX_MAGIC,
        version: INDEX_VERSION,
        fields,
    };

    let mut buf = Vec::new();
    ciborium::into_writer(&file, &mut buf).map_err(|e| IndexError::encoding(e.to_string()))?;
    Ok(buf)
}

fn decode(path: &Path, data: &[u8]) -> IndexResult<MemoryIndex> {
    if data.is_empty() {
        return Err(IndexError::corrupt(path, "file is empty"));
    }

    let file: IndexFile =
        ciborium::from_reader(data).map_err(|e| IndexError::corrupt(path, e.to_string()))?;

    if file.magic != INDEX_MAGIC {
        return Err(IndexError::corrupt(path, "invalid index file magic"));
    }
    if file.version != INDEX_VERSION {
        return Err(IndexError::corrupt(
            path,
            format!("unsupported index version: {}", file.version),
        ));
    }

    let mut index = MemoryIndex::new();
    for entry in file.fields {
        for value in entry.values {
            index.restore_rows(entry.field.clone(), value.value, value.offsets);
        }
    }
    Ok(index)
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(unix)]
fn sync_parent(path: &Path) -> std::io::Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => File::open(parent)?.sync_all(),
        _ => Ok(()),
    }
}

#[cfg(not(unix))]
fn sync_parent(_path: &Path) -> std::io::Result<()> {
    Ok(())
}
