//! Record splitting.

use crate::config::ReaderConfig;
use crate::error::SplitError;
use std::fmt;

/// Splits the raw text of one record into its fields.
///
/// The cursor reads physical lines and hands them to the splitter. A record
/// whose enclosure is still open at the end of a line spans several physical
/// lines; [`RecordSplitter::is_complete`] tells the cursor to keep reading.
pub trait RecordSplitter: Send + Sync + fmt::Debug {
    /// Splits `raw` (without its final line terminator) into field values.
    ///
    /// # Errors
    ///
    /// Returns an error if `raw` is not a valid record.
    fn split(&self, raw: &str) -> Result<Vec<String>, SplitError>;

    /// Returns false if `raw` ends inside an enclosed field.
    fn is_complete(&self, _raw: &str) -> bool {
        true
    }
}

/// The default splitter, backed by the `csv` crate.
///
/// Enclosed fields may contain delimiters, doubled enclosures and, when an
/// escape character is configured, escaped enclosures. Records may have any
/// number of fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvSplitter {
    delimiter: u8,
    enclosure: u8,
    escape: Option<u8>,
}

impl CsvSplitter {
    /// Creates a splitter for the given dialect.
    #[must_use]
    pub const fn new(delimiter: u8, enclosure: u8, escape: Option<u8>) -> Self {
        Self {
            delimiter,
            enclosure,
            escape,
        }
    }

    /// Creates a splitter for the dialect of `config`.
    #[must_use]
    pub const fn from_config(config: &ReaderConfig) -> Self {
        Self::new(config.delimiter, config.enclosure, config.escape)
    }
}

impl Default for CsvSplitter {
    fn default() -> Self {
        Self::from_config(&ReaderConfig::default())
    }
}

impl RecordSplitter for CsvSplitter {
    fn split(&self, raw: &str) -> Result<Vec<String>, SplitError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .delimiter(self.delimiter)
            .quote(self.enclosure)
            .escape(self.escape)
            .double_quote(true)
            .from_reader(raw.as_bytes());

        let mut record = csv::StringRecord::new();
        match reader.read_record(&mut record) {
            Ok(true) => Ok(record.iter().map(str::to_string).collect()),
            // Only an empty line yields no record.
            Ok(false) => Ok(vec![String::new()]),
            Err(e) => Err(SplitError::new(e.to_string())),
        }
    }

    fn is_complete(&self, raw: &str) -> bool {
        let bytes = raw.as_bytes();
        let mut in_quotes = false;
        let mut at_field_start = true;
        let mut i = 0;

        while i < bytes.len() {
            let b = bytes[i];
            if in_quotes {
                if Some(b) == self.escape && b != self.enclosure {
                    i += 2;
                    continue;
                }
                if b == self.enclosure {
                    if bytes.get(i + 1) == Some(&self.enclosure) {
                        i += 2;
                        continue;
                    }
                    in_quotes = false;
                }
            } else if b == self.enclosure && at_field_start {
                in_quotes = true;
            }
            at_field_start = !in_quotes && (b == self.delimiter || b == b'\n');
            i += 1;
        }

        !in_quotes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn split(raw: &str) -> Vec<String> {
        CsvSplitter::default().split(raw).unwrap()
    }

    #[test]
    fn plain_fields() {
        assert_eq!(split("1,Alice,30"), vec!["1", "Alice", "30"]);
    }

    #[test]
    fn empty_fields() {
        assert_eq!(split("a,,c,"), vec!["a", "", "c", ""]);
    }

    #[test]
    fn empty_line_is_one_empty_field() {
        assert_eq!(split(""), vec![""]);
    }

    #[test]
    fn quoted_delimiter() {
        assert_eq!(split(r#"1,"Smith, John",x"#), vec!["1", "Smith, John", "x"]);
    }

    #[test]
    fn doubled_quote() {
        assert_eq!(split(r#""say ""hi""",2"#), vec![r#"say "hi""#, "2"]);
    }

    #[test]
    fn escaped_quote() {
        assert_eq!(split(r#""a\"b",c"#), vec![r#"a"b"#, "c"]);
    }

    #[test]
    fn embedded_newline() {
        assert_eq!(split("1,\"two\nlines\",3"), vec!["1", "two\nlines", "3"]);
    }

    #[test]
    fn custom_dialect() {
        let splitter = CsvSplitter::new(b';', b'\'', None);
        assert_eq!(
            splitter.split("1;'a;b';c").unwrap(),
            vec!["1", "a;b", "c"]
        );
    }

    #[test]
    fn complete_lines() {
        let splitter = CsvSplitter::default();
        assert!(splitter.is_complete("1,Alice"));
        assert!(splitter.is_complete(r#"1,"quoted""#));
        assert!(splitter.is_complete(r#""a""b",c"#));
        assert!(splitter.is_complete(r#""a\"b",c"#));
        assert!(splitter.is_complete("1,\"two\nlines\""));
        // A quote inside an unquoted field is literal.
        assert!(splitter.is_complete(r#"1,ab"c"#));
    }

    #[test]
    fn open_enclosure_is_incomplete() {
        let splitter = CsvSplitter::default();
        assert!(!splitter.is_complete("1,\"two"));
        assert!(!splitter.is_complete(r#"1,"it""s"#));
        assert!(!splitter.is_complete(r#"1,"ends with escape\""#));
    }

    #[test]
    fn from_config_uses_dialect() {
        let config = ReaderConfig::new().delimiter(b'\t');
        let splitter = CsvSplitter::from_config(&config);
        assert_eq!(splitter.split("a\tb").unwrap(), vec!["a", "b"]);
    }
}
