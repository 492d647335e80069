//! Log output flags for the `storefront` binary.

use clap::{Args, ValueEnum};

/// How log lines are rendered on stderr.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// One short line per event, for a terminal.
    Compact,

    /// One JSON object per event, for log shippers.
    Json,
}

/// Verbosity and format of the CLI's diagnostics.
#[derive(Debug, Args)]
pub struct LoggingConfig {
    /// Filter directive, e.g. `info` or `storefront_app=debug`
    #[arg(short, long, env = "RUST_LOG", default_value = "info")]
    pub log_level: String,

    /// Line format for diagnostics written to stderr
    #[arg(long, env = "STOREFRONT_LOG_FORMAT", value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,
}
