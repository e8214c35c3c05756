//! Command-line interface for moebius.

use clap::Parser;
use std::path::PathBuf;

/// moebius - An ANSI and ASCII art editor host
#[derive(Parser, Debug)]
#[command(name = "moebius")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Documents to open at startup
    #[arg(value_name = "FILE")]
    pub files: Vec<PathBuf>,

    /// Set debug log level (overrides RUST_LOG)
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevelArg>,
}

/// Log level argument for CLI
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum LogLevelArg {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevelArg {
    /// Convert to `log::LevelFilter`
    pub fn to_level_filter(self) -> log::LevelFilter {
        match self {
            LogLevelArg::Off => log::LevelFilter::Off,
            LogLevelArg::Error => log::LevelFilter::Error,
            LogLevelArg::Warn => log::LevelFilter::Warn,
            LogLevelArg::Info => log::LevelFilter::Info,
            LogLevelArg::Debug => log::LevelFilter::Debug,
            LogLevelArg::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Runtime options passed from CLI to the application
#[derive(Clone, Debug, Default)]
pub struct RuntimeOptions {
    /// Files to open once the host is ready
    pub files: Vec<PathBuf>,
    /// Log level override from CLI
    pub log_level: Option<log::LevelFilter>,
}

impl From<Cli> for RuntimeOptions {
    fn from(cli: Cli) -> Self {
        Self {
            files: cli.files,
            log_level: cli.log_level.map(|l| l.to_level_filter()),
        }
    }
}

/// Result of CLI processing
pub enum CliResult {
    /// Continue with normal application startup
    Continue(RuntimeOptions),
    /// Exit with the given code
    Exit(i32),
}

/// Process CLI arguments
pub fn process_cli() -> CliResult {
    match Cli::try_parse() {
        Ok(cli) => CliResult::Continue(cli.into()),
        Err(e) => {
            let code = e.exit_code();
            let _ = e.print();
            CliResult::Exit(code)
        }
    }
}
