//! # csvseek Core
//!
//! Streaming, memory-bounded readers for delimited text files.
//!
//! This crate provides:
//! - [`StreamCursor`]: a forward-only cursor that consumes the header row
//!   lazily and remembers the byte offset of every record it yields
//! - [`IndexedReader`]: a cursor plus a secondary index, built on the first
//!   [`IndexedReader::seek`], for O(1) average lookup by a key column
//! - [`RecordCursor`] and [`Records`]: the iteration contract shared by both
//!   readers, and a Rust [`Iterator`] over it
//!
//! The file is never loaded into memory. Only the index, when one is built,
//! grows with the file.
//!
//! ## Example
//!
//! ```no_run
//! use csvseek_core::{IndexedReader, ReaderConfig};
//!
//! let mut reader = IndexedReader::new("people.csv", ReaderConfig::default())
//!     .primary_key("id");
//!
//! reader.seek("42").unwrap();
//! let record = reader.current().unwrap();
//! println!("{:?}", record.get("name"));
//!
//! // Forward iteration resumes after the record found by seek.
//! reader.advance().unwrap();
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod cursor;
mod error;
mod estimate;
mod iter;
mod reader;
mod record;
mod splitter;

pub use config::ReaderConfig;
pub use cursor::StreamCursor;
pub use error::{CsvError, CsvResult, SplitError};
pub use estimate::{FileSizeEstimator, LineCountEstimator, RowEstimate, RowEstimator};
pub use iter::{RecordCursor, Records};
pub use reader::{IndexedReader, ReaderState, SharedIndex};
pub use record::Record;
pub use splitter::{CsvSplitter, RecordSplitter};

pub use csvseek_index::{
    ColumnRef, Condition, FileIndex, Index, IndexError, IndexResult, Indexer, MemoryIndex,
};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
