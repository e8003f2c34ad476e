//! # csvseek Testkit
//!
//! Test utilities for csvseek.
//!
//! This crate provides:
//! - Temporary CSV files and canned fixtures
//! - Property-based test generators using proptest
//! - Cross-crate checks driving cursors, readers and indexes together
//!
//! ## Usage
//!
//! ```rust
//! use csvseek_testkit::prelude::*;
//!
//! let csv = people_csv();
//! let mut reader = csv.reader();
//! reader.seek("2").unwrap();
//! assert_eq!(reader.current().unwrap().get("name"), Some("Bob"));
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod fixtures;
pub mod generators;
pub mod integration;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::fixtures::*;
    pub use crate::generators::*;
    pub use crate::integration::*;
}

pub use fixtures::*;
pub use generators::*;
pub use integration::*;
