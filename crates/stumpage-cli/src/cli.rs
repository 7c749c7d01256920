//! CLI argument definitions for the stumpage unifier.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "stumpage",
    version,
    about = "Stumpage price unifier - harmonize state timber price reports",
    long_about = "Harmonize stumpage price reports from state agencies into one dataset.\n\n\
                  Loads every configured source, normalizes product and unit labels,\n\
                  converts volumetric prices to $/ton and writes a unified CSV."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Prefix log lines with a timestamp.
    #[arg(long = "log-timestamps", global = true)]
    pub log_timestamps: bool,

    /// Include the emitting module in log lines.
    #[arg(long = "log-target", global = true)]
    pub log_target: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Load all sources and write the unified dataset.
    Unify(UnifyArgs),

    /// List the configured sources.
    Sources(SourcesArgs),

    /// List the volume-to-weight conversion factors.
    Factors,
}

#[derive(Parser)]
pub struct UnifyArgs {
    /// Directory holding the per-agency raw inputs.
    #[arg(value_name = "RAW_DIR")]
    pub raw_dir: PathBuf,

    /// Unified CSV path (default: RAW_DIR/../processed/stumpage_unified.csv).
    #[arg(long = "output", short = 'o', value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// JSON source configurations replacing the built-in list.
    #[arg(long = "sources", value_name = "JSON")]
    pub sources: Option<PathBuf>,

    /// Restrict the run to these source codes.
    #[arg(long = "only", value_name = "CODE", num_args = 1..)]
    pub only: Vec<String>,

    /// Ignore an existing unified file instead of merging into it.
    #[arg(long = "no-merge")]
    pub no_merge: bool,

    /// Also write the run summary as JSON.
    #[arg(long = "summary-json", value_name = "FILE")]
    pub summary_json: Option<PathBuf>,

    /// Run every stage but skip writing the unified file.
    #[arg(long = "dry-run")]
    pub dry_run: bool,
}

#[derive(Parser)]
pub struct SourcesArgs {
    /// JSON source configurations replacing the built-in list.
    #[arg(long = "sources", value_name = "JSON")]
    pub sources: Option<PathBuf>,

    /// Print the configurations as JSON instead of a table.
    #[arg(long = "json")]
    pub json: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
