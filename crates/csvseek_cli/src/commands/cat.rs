//! Cat command implementation.

use super::{column_label, Format};
use crate::error::CliResult;
use csvseek_core::{ReaderConfig, Record, StreamCursor};
use std::io::Write;
use std::path::Path;

/// Runs the cat command.
///
/// Text output prints one `column=value` line per record. JSON output prints
/// one object per line.
pub fn run(
    path: &Path,
    config: ReaderConfig,
    limit: Option<usize>,
    format: &str,
    out: &mut impl Write,
) -> CliResult<()> {
    let format = Format::parse(format)?;
    let mut cursor = StreamCursor::new(path, config).without_estimator();

    for item in cursor.records().take(limit.unwrap_or(usize::MAX)) {
        let (position, record) = item?;
        match format {
            Format::Json => writeln!(out, "{}", serde_json::to_string(&record)?)?,
            Format::Text => writeln!(out, "{position:>6}  {}", format_record(&record))?,
        }
    }

    Ok(())
}

/// Formats a record as space separated `column=value` pairs.
pub fn format_record(record: &Record) -> String {
    record
        .fields()
        .iter()
        .map(|(column, value)| format!("{}={value}", column_label(column)))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::{output, write_csv, PEOPLE};

    #[test]
    fn text_output_in_file_order() {
        let (_dir, path) = write_csv(PEOPLE);
        let mut out = Vec::new();
        run(&path, ReaderConfig::default(), None, "text", &mut out).unwrap();

        let text = output(out);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "     0  id=1 name=Alice city=Paris");
        assert_eq!(lines[2], "     2  id=3 name=Carol city=Paris");
    }

    #[test]
    fn limit_stops_early() {
        let (_dir, path) = write_csv(PEOPLE);
        let mut out = Vec::new();
        run(&path, ReaderConfig::default(), Some(1), "json", &mut out).unwrap();

        assert_eq!(output(out), "{\"id\":\"1\",\"name\":\"Alice\",\"city\":\"Paris\"}\n");
    }

    #[test]
    fn extra_fields_use_ordinals() {
        let (_dir, path) = write_csv("id\n1,x\n");
        let mut out = Vec::new();
        run(&path, ReaderConfig::default(), None, "text", &mut out).unwrap();

        assert_eq!(output(out), "     0  id=1 1=x\n");
    }
}
