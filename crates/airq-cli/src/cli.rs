//! CLI argument definitions for `airq`.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "airq",
    version,
    about = "Seoul PM10/PM2.5 data preparation",
    long_about = "Prepare district-level PM10/PM2.5 daily exports for analysis.\n\n\
                  Classifies missing days, fills them from per-year secondary archives,\n\
                  merges regional files, and summarizes monthly averages."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for warnings only).
    #[command(flatten)]
    pub verbosity: Verbosity<InfoLevel>,

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

    /// Configuration file (default: ./airq.toml when present).
    #[arg(long = "config", value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Normalize one region's primary CSV and write it.
    Prepare(PrepareArgs),

    /// Report the missing days of one region.
    Classify(ClassifyArgs),

    /// Fill one region's missing days from the secondary archives.
    Reconcile(ReconcileArgs),

    /// Merge per-region CSV files into one table.
    Merge(MergeArgs),

    /// Build a year archive from monthly exports.
    BuildArchive(BuildArchiveArgs),

    /// Print monthly per-region averages of a merged table.
    Monthly(MonthlyArgs),

    /// Score predicted concentrations against observed ones.
    Score(ScoreArgs),
}

/// Options shared by commands that read one region's primary table.
#[derive(Parser)]
pub struct RegionInput {
    /// Primary CSV export for the region.
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Region name (default: the input file stem).
    #[arg(long = "region", value_name = "NAME")]
    pub region: Option<String>,

    /// First day kept (YYYY-MM-DD).
    #[arg(long = "start", value_name = "DATE")]
    pub start: Option<NaiveDate>,

    /// Last day kept (YYYY-MM-DD).
    #[arg(long = "end", value_name = "DATE")]
    pub end: Option<NaiveDate>,
}

/// Options for commands that write per-region CSV files.
#[derive(Parser)]
pub struct RegionOutput {
    /// Output directory.
    #[arg(long = "output-dir", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// File-name prefix for the written CSV.
    #[arg(long = "prefix", value_name = "PREFIX")]
    pub prefix: Option<String>,
}

#[derive(Parser)]
pub struct PrepareArgs {
    #[command(flatten)]
    pub input: RegionInput,

    #[command(flatten)]
    pub output: RegionOutput,
}

#[derive(Parser)]
pub struct ClassifyArgs {
    #[command(flatten)]
    pub input: RegionInput,

    /// Save the report as JSON.
    #[arg(long = "json", value_name = "PATH")]
    pub json: Option<PathBuf>,
}

#[derive(Parser)]
pub struct ReconcileArgs {
    #[command(flatten)]
    pub input: RegionInput,

    #[command(flatten)]
    pub output: RegionOutput,

    /// Directory of `{year}.csv` archive files.
    #[arg(long = "archive-dir", value_name = "DIR")]
    pub archive_dir: Option<PathBuf>,

    /// Start from a saved report instead of classifying.
    #[arg(long = "report", value_name = "JSON")]
    pub report: Option<PathBuf>,

    /// Save the pending dates and fill counters as JSON.
    #[arg(long = "json", value_name = "PATH")]
    pub json: Option<PathBuf>,
}

#[derive(Parser)]
pub struct MergeArgs {
    /// Directory of per-region CSV files.
    #[arg(value_name = "INPUT_DIR")]
    pub input_dir: PathBuf,

    /// Merged CSV file to write.
    #[arg(long = "output", value_name = "FILE")]
    pub output: PathBuf,
}

#[derive(Parser)]
pub struct BuildArchiveArgs {
    /// Folder of monthly CSV exports for one year.
    #[arg(value_name = "YEAR_DIR")]
    pub year_dir: PathBuf,

    /// Archive directory to write `{year}.csv` into.
    #[arg(long = "archive-dir", value_name = "DIR")]
    pub archive_dir: Option<PathBuf>,

    /// Archive year (default: the folder name).
    #[arg(long = "year")]
    pub year: Option<i32>,
}

#[derive(Parser)]
pub struct MonthlyArgs {
    /// Merged CSV with region, date, and pollutant columns.
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Column to average.
    #[arg(long = "value", default_value = "pm10")]
    pub value: String,

    /// Also write the pivot as CSV.
    #[arg(long = "output", value_name = "FILE")]
    pub output: Option<PathBuf>,
}

#[derive(Parser)]
pub struct ScoreArgs {
    /// CSV holding observed and predicted columns.
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Observed column.
    #[arg(long = "observed", default_value = "pm10")]
    pub observed: String,

    /// Predicted column.
    #[arg(long = "predicted", value_name = "COLUMN")]
    pub predicted: String,
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
