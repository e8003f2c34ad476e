//! CLI command implementations.

pub mod cat;
pub mod count;
pub mod get;
pub mod headers;
pub mod index;

use crate::error::{CliError, CliResult};
use csvseek_core::ColumnRef;
use std::borrow::Cow;

/// Output format selected with `--format`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// Human readable text.
    Text,
    /// JSON.
    Json,
}

impl Format {
    /// Parses a `--format` value.
    pub fn parse(value: &str) -> CliResult<Self> {
        match value {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(CliError::UnknownFormat(other.to_string())),
        }
    }
}

/// Returns the label printed for a column in text output.
///
/// Named columns print their name, unnamed extra fields their ordinal.
pub fn column_label(column: &ColumnRef) -> Cow<'_, str> {
    match column {
        ColumnRef::Name(name) => Cow::Borrowed(name.as_str()),
        ColumnRef::Ordinal(i) => Cow::Owned(i.to_string()),
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    pub const PEOPLE: &str = "id,name,city\n1,Alice,Paris\n2,Bob,Oslo\n3,Carol,Paris\n";

    pub fn write_csv(content: &str) -> (TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("people.csv");
        fs::write(&path, content).unwrap();
        (dir, path)
    }

    pub fn output(buffer: Vec<u8>) -> String {
        String::from_utf8(buffer).unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_format() {
        assert_eq!(Format::parse("text").unwrap(), Format::Text);
        assert_eq!(Format::parse("json").unwrap(), Format::Json);
        assert!(matches!(Format::parse("xml"), Err(CliError::UnknownFormat(f)) if f == "xml"));
    }

    #[test]
    fn labels_for_names_and_ordinals() {
        assert_eq!(column_label(&ColumnRef::Name("city".into())), "city");
        assert_eq!(column_label(&ColumnRef::Ordinal(2)), "2");
    }
}
