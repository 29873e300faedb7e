//! Command-line argument definitions for the Quill CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Arguments control the input path, which analysis runs,
//! configuration file selection, and logging verbosity.

use clap::{Parser, ValueEnum};

/// Which analysis the CLI runs
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum Mode {
    /// Tokens and statistics only
    Lexical,
    /// Syntax check only
    Syntax,
    /// Tokens, statistics and syntax check
    #[default]
    Full,
}

/// Command-line arguments for the Quill analyzer
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the source file to analyze
    #[arg(help = "Path to the input file")]
    pub input: String,

    /// Analysis to run
    #[arg(short, long, value_enum, default_value_t = Mode::Full)]
    pub mode: Mode,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "warn")]
    pub log_level: String,
}
