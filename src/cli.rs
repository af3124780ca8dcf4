// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// Command-line arguments for `doo`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "doo",
    version,
    about = "Start and stop project services in dependency order.",
    long_about = None
)]
pub struct CliArgs {
    /// Target names to start (or stop with --stop). A query that is not an
    /// exact target name is treated as a glob over all target names.
    #[arg(value_name = "TARGET")]
    pub targets: Vec<String>,

    /// Stop the matched targets instead of starting them.
    #[arg(long)]
    pub stop: bool,

    /// List available targets and exit.
    #[arg(long)]
    pub list: bool,

    /// Load additional configuration files.
    #[arg(long, value_name = "CONFIG")]
    pub load: Vec<PathBuf>,

    /// Ignore dependencies; run only the matched targets.
    #[arg(long)]
    pub only: bool,

    /// Print the working directory of each matched target and exit.
    #[arg(long)]
    pub pwd: bool,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `DOO_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
