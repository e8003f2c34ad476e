//! Reader configuration.

/// Dialect and limits for reading a delimited file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReaderConfig {
    /// Field delimiter.
    pub delimiter: u8,

    /// Quote character enclosing fields that contain delimiters or newlines.
    pub enclosure: u8,

    /// Escape character inside enclosed fields (`None` = doubled quotes only).
    pub escape: Option<u8>,

    /// Maximum record length in bytes (0 = unlimited).
    pub max_line_length: usize,

    /// Whether to trim whitespace around field values. Headers are always trimmed.
    pub trim_values: bool,

    /// Whether to skip blank physical lines.
    pub skip_blank_lines: bool,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            delimiter: b',',
            enclosure: b'"',
            escape: Some(b'\\'),
            max_line_length: 0,
            trim_values: true,
            skip_blank_lines: true,
        }
    }
}

impl ReaderConfig {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the field delimiter.
    #[must_use]
    pub const fn delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Sets the enclosure (quote) character.
    #[must_use]
    pub const fn enclosure(mut self, enclosure: u8) -> Self {
        self.enclosure = enclosure;
        self
    }

    /// Sets the escape character.
    #[must_use]
    pub const fn escape(mut self, escape: Option<u8>) -> Self {
        self.escape = escape;
        self
    }

    /// Sets the maximum record length in bytes (0 = unlimited).
    #[must_use]
    pub const fn max_line_length(mut self, max: usize) -> Self {
        self.max_line_length = max;
        self
    }

    /// Sets whether field values are trimmed.
    #[must_use]
    pub const fn trim_values(mut self, value: bool) -> Self {
        self.trim_values = value;
        self
    }

    /// Sets whether blank lines are skipped.
    #[must_use]
    pub const fn skip_blank_lines(mut self, value: bool) -> Self {
        self.skip_blank_lines = value;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = ReaderConfig::default();
        assert_eq!(config.delimiter, b',');
        assert_eq!(config.enclosure, b'"');
        assert_eq!(config.escape, Some(b'\\'));
        assert_eq!(config.max_line_length, 0);
        assert!(config.trim_values);
        assert!(config.skip_blank_lines);
    }

    #[test]
    fn builder_pattern() {
        let config = ReaderConfig::new()
            .delimiter(b';')
            .enclosure(b'\'')
            .escape(None)
            .max_line_length(4096)
            .trim_values(false)
            .skip_blank_lines(false);

        assert_eq!(config.delimiter, b';');
        assert_eq!(config.enclosure, b'\'');
        assert_eq!(config.escape, None);
        assert_eq!(config.max_line_length, 4096);
        assert!(!config.trim_values);
        assert!(!config.skip_blank_lines);
    }
}
