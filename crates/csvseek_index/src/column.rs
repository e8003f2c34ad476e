//! Column identifiers.

use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// Identifies a column either by header name or by 0-based position.
///
/// The same logical column may be known under both forms. Indexes treat
/// `Name("id")` and `Ordinal(0)` as distinct fields even when they describe
/// the same column, which is what allows lookups by either form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ColumnRef {
    /// A header name, matched exactly.
    Name(String),
    /// A 0-based column position.
    Ordinal(usize),
}

impl ColumnRef {
    /// Returns the ordinal if this is an ordinal reference.
    #[must_use]
    pub fn as_ordinal(&self) -> Option<usize> {
        match self {
            Self::Ordinal(n) => Some(*n),
            Self::Name(_) => None,
        }
    }

    /// Returns the name if this is a named reference.
    #[must_use]
    pub fn as_name(&self) -> Option<&str> {
        match self {
            Self::Name(name) => Some(name),
            Self::Ordinal(_) => None,
        }
    }
}

impl fmt::Display for ColumnRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name(name) => f.write_str(name),
            Self::Ordinal(n) => write!(f, "#{n}"),
        }
    }
}

/// Parses all-digit text as an ordinal and anything else as a name.
impl FromStr for ColumnRef {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) {
            if let Ok(n) = s.parse() {
                return Ok(Self::Ordinal(n));
            }
        }
        Ok(Self::Name(s.to_string()))
    }
}

impl From<usize> for ColumnRef {
    fn from(n: usize) -> Self {
        Self::Ordinal(n)
    }
}

impl From<&str> for ColumnRef {
    fn from(name: &str) -> Self {
        Self::Name(name.to_string())
    }
}

impl From<String> for ColumnRef {
    fn from(name: String) -> Self {
        Self::Name(name)
    }
}
