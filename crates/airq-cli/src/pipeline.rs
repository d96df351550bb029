//! Stage functions behind the `airq` subcommands.
//!
//! Each stage reads its inputs, runs the library operations, and returns the
//! data the command reports on. Printing is left to the binary.

use std::path::{Path, PathBuf};

use airq_ingest::{
    SecondaryArchive, build_year_archive, canonicalize_missing, frame_to_table,
    merge_region_files, normalize_frame, read_csv_text, save_region_csv, table_to_frame,
    write_archive, write_csv, year_from_path,
};
use airq_model::{ArchiveRecord, DailyTable, MissingReport};
use airq_reconcile::{Reconciled, classify, reconcile};
use airq_stats::{RegressionScores, add_month_column, monthly_average_by_region, score_columns};
use anyhow::{Context, Result, anyhow};
use polars::prelude::DataFrame;
use serde::Serialize;
use tracing::{info, info_span};

use crate::config::AppConfig;

/// Name of the month column added before pivoting.
pub const MONTH_COLUMN: &str = "month";

/// A primary table after normalization and canonicalization.
#[derive(Debug)]
pub struct PreparedTable {
    pub region: String,
    pub frame: DataFrame,
}

/// Reads and normalizes one region's primary CSV.
pub fn prepare_region(input: &Path, region: &str, config: &AppConfig) -> Result<PreparedTable> {
    let raw = read_csv_text(input).with_context(|| format!("read {}", input.display()))?;
    let normalized =
        normalize_frame(&raw, &config.normalize_options()).context("normalize primary table")?;
    let pollutants: Vec<&str> = config
        .columns
        .pollutants()
        .into_iter()
        .filter(|name| normalized.column(name).is_ok())
        .collect();
    let frame = canonicalize_missing(&normalized, &pollutants).context("canonicalize missing values")?;
    info!(region, rows = frame.height(), "prepared primary table");
    Ok(PreparedTable {
        region: region.to_string(),
        frame,
    })
}

/// Writes a prepared or reconciled frame as `{dir}/{prefix}{region}.csv`.
pub fn save_region(frame: &DataFrame, region: &str, dir: &Path, prefix: &str) -> Result<PathBuf> {
    save_region_csv(frame, region, dir, prefix)
        .with_context(|| format!("write output for region {region}"))
}

/// The typed table of a prepared region.
pub fn load_table(prepared: &PreparedTable, config: &AppConfig) -> Result<DailyTable> {
    frame_to_table(&prepared.frame, &config.columns, &prepared.region)
        .context("convert primary table")
}

/// Classifies a region's missing days.
pub fn classify_region(input: &Path, region: &str, config: &AppConfig) -> Result<MissingReport> {
    let prepared = prepare_region(input, region, config)?;
    let table = load_table(&prepared, config)?;
    classify(&table).context("classify missing data")
}

/// Reads a report saved by `airq classify --json`.
pub fn read_report(path: &Path) -> Result<MissingReport> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("open report {}", path.display()))?;
    serde_json::from_reader(std::io::BufReader::new(file))
        .with_context(|| format!("parse report {}", path.display()))
}

/// Writes any serializable value as pretty JSON, creating parent directories.
pub fn write_json<T: Serialize>(value: &T, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create directory {}", parent.display()))?;
    }
    let file = std::fs::File::create(path)
        .with_context(|| format!("create {}", path.display()))?;
    serde_json::to_writer_pretty(file, value)
        .with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

/// Result of reconciling one region.
#[derive(Debug)]
pub struct RegionReconciliation {
    /// Report the run started from.
    pub initial: MissingReport,
    pub reconciled: Reconciled,
    pub output: PathBuf,
}

/// Classifies (or reuses `report`), reconciles, and writes one region.
pub fn reconcile_region(
    input: &Path,
    region: &str,
    report: Option<MissingReport>,
    archive_dir: &Path,
    output_dir: &Path,
    config: &AppConfig,
) -> Result<RegionReconciliation> {
    let span = info_span!("reconcile", region = %region);
    let _guard = span.enter();

    let prepared = prepare_region(input, region, config)?;
    let table = load_table(&prepared, config)?;
    let initial = match report {
        Some(report) => report,
        None => classify(&table).context("classify missing data")?,
    };

    let archive = SecondaryArchive::load_dir(archive_dir)
        .with_context(|| format!("load archive {}", archive_dir.display()))?;
    let reconciled = reconcile(&table, &initial, &archive).context("reconcile")?;

    let frame = table_to_frame(&reconciled.table, &config.columns)?;
    let output = save_region(&frame, region, output_dir, &config.output.prefix)?;

    Ok(RegionReconciliation {
        initial,
        reconciled,
        output,
    })
}

/// Merges per-region files and writes the combined table.
pub fn merge_regions(input_dir: &Path, output: &Path, config: &AppConfig) -> Result<DataFrame> {
    let merged = merge_region_files(input_dir, &config.merge_options())
        .with_context(|| format!("merge {}", input_dir.display()))?;
    write_csv(&merged, output).with_context(|| format!("write {}", output.display()))?;
    Ok(merged)
}

/// Output of [`build_archive`].
#[derive(Debug)]
pub struct BuiltArchive {
    pub year: i32,
    pub records: Vec<ArchiveRecord>,
    pub path: PathBuf,
}

/// Builds `{archive_dir}/{year}.csv` from a folder of monthly exports.
///
/// The year comes from `year` or, when absent, from the folder name.
pub fn build_archive(
    year_dir: &Path,
    year: Option<i32>,
    archive_dir: &Path,
    config: &AppConfig,
) -> Result<BuiltArchive> {
    let year = year
        .or_else(|| year_from_path(year_dir))
        .ok_or_else(|| anyhow!("cannot derive a year from {}; pass --year", year_dir.display()))?;
    let records = build_year_archive(year_dir, &config.archive_build_options())
        .with_context(|| format!("build archive from {}", year_dir.display()))?;
    let path = write_archive(&records, archive_dir, year)?;
    Ok(BuiltArchive {
        year,
        records,
        path,
    })
}

/// Monthly per-region means of `value_column` from a merged table.
pub fn monthly_pivot(input: &Path, value_column: &str, config: &AppConfig) -> Result<DataFrame> {
    let merged = read_csv_text(input).with_context(|| format!("read {}", input.display()))?;
    let with_month = add_month_column(&merged, &config.columns.date, MONTH_COLUMN)?;
    let pivot = monthly_average_by_region(
        &with_month,
        &config.columns.region,
        MONTH_COLUMN,
        value_column,
    )?;
    Ok(pivot)
}

/// Regression scores of `predicted` against `observed` in one CSV.
pub fn score_predictions(input: &Path, observed: &str, predicted: &str) -> Result<RegressionScores> {
    let table = read_csv_text(input).with_context(|| format!("read {}", input.display()))?;
    score_columns(&table, observed, predicted)
        .with_context(|| format!("score {predicted} against {observed}"))
}
