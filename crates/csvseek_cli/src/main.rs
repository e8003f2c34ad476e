//! csvseek CLI
//!
//! Command-line tools for large delimited files.
//!
//! # Commands
//!
//! - `headers` - List header names with their ordinals
//! - `cat` - Stream records in file order
//! - `get` - Look up a record by primary key
//! - `index` - Build and save a persistent index
//! - `count` - Estimate the number of data rows

mod commands;
mod error;

use clap::{Args, Parser, Subcommand};
use csvseek_core::{ColumnRef, ReaderConfig};
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use crate::error::{CliError, CliResult};

/// Parses a column argument through `ColumnRef`'s `FromStr` impl, so
/// all-digit values become ordinals (clap would otherwise pick `From<String>`).
fn parse_column_ref(s: &str) -> Result<ColumnRef, std::convert::Infallible> {
    s.parse()
}

/// Inspect, index and seek large delimited files.
#[derive(Parser)]
#[command(name = "csvseek")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(global = true, short, long)]
    verbose: bool,

    #[command(flatten)]
    dialect: DialectArgs,

    #[command(subcommand)]
    command: Commands,
}

/// File dialect options shared by every command.
#[derive(Args, Debug, Clone)]
struct DialectArgs {
    /// Field delimiter
    #[arg(global = true, short, long, default_value_t = ',')]
    delimiter: char,

    /// Quote character
    #[arg(global = true, long, default_value_t = '"')]
    quote: char,

    /// Escape character inside quoted fields
    #[arg(global = true, long, default_value_t = '\\')]
    escape: char,

    /// Only accept doubled quotes inside quoted fields
    #[arg(global = true, long)]
    no_escape: bool,

    /// Maximum record length in bytes (0 = unlimited)
    #[arg(global = true, long, default_value_t = 0)]
    max_line_length: usize,

    /// Keep whitespace around values
    #[arg(global = true, long)]
    no_trim: bool,

    /// Treat blank lines as records
    #[arg(global = true, long)]
    keep_blank_lines: bool,
}

impl DialectArgs {
    fn to_config(&self) -> CliResult<ReaderConfig> {
        let escape = if self.no_escape {
            None
        } else {
            Some(ascii_byte("escape", self.escape)?)
        };
        Ok(ReaderConfig::new()
            .delimiter(ascii_byte("delimiter", self.delimiter)?)
            .enclosure(ascii_byte("quote", self.quote)?)
            .escape(escape)
            .max_line_length(self.max_line_length)
            .trim_values(!self.no_trim)
            .skip_blank_lines(!self.keep_blank_lines))
    }
}

#[derive(Subcommand)]
enum Commands {
    /// List header names with their ordinals
    Headers {
        /// Delimited file to read
        file: PathBuf,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Stream records in file order
    Cat {
        /// Delimited file to read
        file: PathBuf,

        /// Maximum number of records to print
        #[arg(short, long)]
        limit: Option<usize>,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Look up a record by primary key
    Get {
        /// Delimited file to read
        file: PathBuf,

        /// Primary key value to look up
        key: String,

        /// Primary key column, by name or 0-based ordinal
        #[arg(short, long, default_value = "0", value_parser = parse_column_ref)]
        key_column: ColumnRef,

        /// Persistent index file, created if missing
        #[arg(short, long)]
        index: Option<PathBuf>,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Build and save a persistent index
    Index {
        /// Delimited file to read
        file: PathBuf,

        /// Index file to write
        #[arg(short, long)]
        output: PathBuf,

        /// Primary key column, by name or 0-based ordinal
        #[arg(short, long, default_value = "0", value_parser = parse_column_ref)]
        key_column: ColumnRef,

        /// Additional columns to index, comma separated
        #[arg(short, long, value_delimiter = ',', value_parser = parse_column_ref)]
        columns: Vec<ColumnRef>,
    },

    /// Estimate the number of data rows
    Count {
        /// Delimited file to read
        file: PathBuf,

        /// Estimate from the file size instead of counting lines
        #[arg(long)]
        fast: bool,
    },

    /// Show version information
    Version,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match run(cli, &mut out).and_then(|()| out.flush().map_err(CliError::from)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli, out: &mut impl Write) -> CliResult<()> {
    let config = cli.dialect.to_config()?;

    match cli.command {
        Commands::Headers { file, format } => {
            commands::headers::run(&file, config, &format, out)?;
        }
        Commands::Cat {
            file,
            limit,
            format,
        } => {
            commands::cat::run(&file, config, limit, &format, out)?;
        }
        Commands::Get {
            file,
            key,
            key_column,
            index,
            format,
        } => {
            commands::get::run(&file, config, &key, key_column, index.as_deref(), &format, out)?;
        }
        Commands::Index {
            file,
            output,
            key_column,
            columns,
        } => {
            commands::index::run(&file, config, &output, key_column, columns, out)?;
        }
        Commands::Count { file, fast } => {
            commands::count::run(&file, config, fast, out)?;
        }
        Commands::Version => {
            writeln!(out, "csvseek CLI v{}", env!("CARGO_PKG_VERSION"))?;
            writeln!(out, "csvseek Core v{}", csvseek_core::VERSION)?;
        }
    }

    Ok(())
}

fn ascii_byte(option: &'static str, c: char) -> CliResult<u8> {
    u8::try_from(c)
        .ok()
        .filter(u8::is_ascii)
        .ok_or(CliError::NonAscii { option, value: c })
}
