//! # csvseek Index
//!
//! Secondary indexes mapping `(field, value)` pairs to byte offsets.
//!
//! An index lives side by side with a delimited file. It does not know how
//! the file is read; it only records, for every indexed field and every value
//! seen in that field, the ordered list of offsets where a matching record
//! starts.
//!
//! ## Design Principles
//!
//! - Fields are identified by name or by ordinal ([`ColumnRef`]); both forms
//!   may be registered for the same logical column
//! - Offsets keep insertion order, so the first offset is the first record
//!   seen during the scan
//! - Unknown pairs yield an empty result, never an error
//!
//! ## Available Indexes
//!
//! - [`MemoryIndex`] - Lives in memory for the lifetime of the process
//! - [`FileIndex`] - Wraps a [`MemoryIndex`] and persists it on [`FileIndex::save`]
//!
//! ## Example
//!
//! ```rust
//! use csvseek_index::{ColumnRef, Condition, Index, MemoryIndex};
//!
//! let mut index = MemoryIndex::new();
//! index.set_index(12, &[Condition::new(ColumnRef::Ordinal(0), "alice")]);
//! assert_eq!(index.rows(&ColumnRef::Ordinal(0), "alice"), &[12]);
//! assert!(index.rows(&ColumnRef::Ordinal(0), "bob").is_empty());
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod column;
mod error;
mod file;
mod indexer;
mod memory;
mod traits;

pub use column::ColumnRef;
pub use error::{IndexError, IndexResult};
pub use file::{FileIndex, INDEX_MAGIC, INDEX_VERSION};
pub use indexer::Indexer;
pub use memory::MemoryIndex;
pub use traits::{Condition, Index};
