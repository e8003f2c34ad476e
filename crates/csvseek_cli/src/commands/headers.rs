//! Headers command implementation.

use super::Format;
use crate::error::CliResult;
use csvseek_core::{ReaderConfig, StreamCursor};
use serde::Serialize;
use std::io::Write;
use std::path::Path;

/// One header column.
#[derive(Debug, Serialize)]
pub struct HeaderInfo<'a> {
    /// 0-based position.
    pub ordinal: usize,
    /// Trimmed header name.
    pub name: &'a str,
}

/// Runs the headers command.
pub fn run(
    path: &Path,
    config: ReaderConfig,
    format: &str,
    out: &mut impl Write,
) -> CliResult<()> {
    let format = Format::parse(format)?;
    let mut cursor = StreamCursor::new(path, config).without_estimator();
    let headers: Vec<HeaderInfo<'_>> = cursor
        .headers()?
        .iter()
        .enumerate()
        .map(|(ordinal, name)| HeaderInfo { ordinal, name })
        .collect();

    match format {
        Format::Json => writeln!(out, "{}", serde_json::to_string_pretty(&headers)?)?,
        Format::Text => {
            for header in &headers {
                writeln!(out, "{:>4}  {}", header.ordinal, header.name)?;
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::{output, write_csv, PEOPLE};
    use crate::error::CliError;
    use csvseek_core::CsvError;

    #[test]
    fn text_lists_ordinals() {
        let (_dir, path) = write_csv(PEOPLE);
        let mut out = Vec::new();
        run(&path, ReaderConfig::default(), "text", &mut out).unwrap();

        assert_eq!(output(out), "   0  id\n   1  name\n   2  city\n");
    }

    #[test]
    fn json_is_an_array() {
        let (_dir, path) = write_csv(PEOPLE);
        let mut out = Vec::new();
        run(&path, ReaderConfig::default(), "json", &mut out).unwrap();

        let value: serde_json::Value = serde_json::from_str(&output(out)).unwrap();
        assert_eq!(value[1]["ordinal"], 1);
        assert_eq!(value[1]["name"], "name");
    }

    #[test]
    fn empty_file_fails() {
        let (_dir, path) = write_csv("");
        let mut out = Vec::new();
        let result = run(&path, ReaderConfig::default(), "text", &mut out);

        assert!(matches!(result, Err(CliError::Csv(CsvError::EmptyFile { .. }))));
    }
}
