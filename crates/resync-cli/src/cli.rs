//! CLI argument definitions for the sync tool.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "resync",
    version,
    about = "Reconcile Live Alumni data into Raiser's Edge import batches",
    long_about = "Compare a Live Alumni snapshot against a Raiser's Edge snapshot and\n\
                  produce the incremental import batches (organisations, attributes,\n\
                  contacts, addresses, custom fields) the import tool can ingest."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for errors only).
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
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the full reconciliation and export the import batches.
    Sync(SyncArgs),

    /// Propose links for source people not yet matched to a constituent.
    Discover(DiscoverArgs),
}

#[derive(Parser)]
pub struct SyncArgs {
    /// Folder holding the snapshot CSV exports from both systems.
    #[arg(value_name = "SNAPSHOT_DIR")]
    pub snapshot_dir: PathBuf,

    /// Output directory for the batches (default: <SNAPSHOT_DIR>/Final).
    #[arg(long = "output-dir", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Similarity score (0-100) at or above which an employer name matches
    /// an existing organisation.
    #[arg(long = "threshold", value_name = "SCORE", default_value_t = 90.0)]
    pub threshold: f64,

    /// How to fill a missing employment month when only the year is known.
    #[arg(
        long = "missing-month",
        value_enum,
        default_value = "random",
        value_name = "RULE"
    )]
    pub missing_month: MissingMonthArg,

    /// Month substituted by the fixed missing-month rule.
    #[arg(
        long = "fixed-month",
        value_name = "MONTH",
        default_value_t = 1,
        value_parser = clap::value_parser!(u32).range(1..=12)
    )]
    pub fixed_month: u32,

    /// Seed for month substitution and fallback identifier bases; makes a
    /// run reproducible.
    #[arg(long = "seed", value_name = "SEED")]
    pub seed: Option<u64>,

    /// Date stamped on attribute and custom-field rows (default: today).
    #[arg(long = "run-date", value_name = "YYYY-MM-DD")]
    pub run_date: Option<NaiveDate>,

    /// Reconcile and report without writing output files.
    #[arg(long = "dry-run")]
    pub dry_run: bool,
}

#[derive(Parser)]
pub struct DiscoverArgs {
    /// Folder holding the snapshot CSV exports from both systems.
    #[arg(value_name = "SNAPSHOT_DIR")]
    pub snapshot_dir: PathBuf,

    /// Output directory for the matches file (default: <SNAPSHOT_DIR>/Final).
    #[arg(long = "output-dir", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Pre-vetted manual matches (CSV with 'personid' and 'ConsID' columns).
    #[arg(long = "matches-file", value_name = "PATH")]
    pub matches_file: Option<PathBuf>,

    /// Seed for fallback identifier bases.
    #[arg(long = "seed", value_name = "SEED")]
    pub seed: Option<u64>,

    /// Date stamped on the proposed link rows (default: today).
    #[arg(long = "run-date", value_name = "YYYY-MM-DD")]
    pub run_date: Option<NaiveDate>,
}

/// Missing-month substitution choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum MissingMonthArg {
    /// Uniformly random month (non-reproducible unless --seed is given).
    Random,
    /// Always substitute --fixed-month.
    Fixed,
    /// Leave the whole date unknown.
    Skip,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
