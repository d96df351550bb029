use std::path::PathBuf;

use anyhow::{Result, anyhow};
use serde::Serialize;
use tracing::info;

use airq_cli::config::AppConfig;
use airq_cli::pipeline::{
    build_archive, classify_region, merge_regions, monthly_pivot, prepare_region, read_report,
    reconcile_region, save_region, score_predictions, write_json,
};
use airq_ingest::{region_from_path, write_csv};
use airq_model::MissingReport;
use airq_reconcile::FillSummary;

use crate::cli::{
    BuildArchiveArgs, ClassifyArgs, MergeArgs, MonthlyArgs, PrepareArgs, ReconcileArgs,
    RegionInput, RegionOutput, ScoreArgs,
};
use crate::summary::{
    print_archive, print_frame, print_reconciliation, print_report, print_scores, print_written,
};

/// Pending dates and counters written by `reconcile --json`.
#[derive(Serialize)]
struct ReconcileRecord<'a> {
    region: &'a str,
    remaining: &'a MissingReport,
    skipped: &'a [String],
    summary: &'a FillSummary,
}

fn region_name(input: &RegionInput) -> Result<String> {
    input
        .region
        .clone()
        .or_else(|| region_from_path(&input.input))
        .ok_or_else(|| {
            anyhow!(
                "cannot derive a region from {}; pass --region",
                input.input.display()
            )
        })
}

/// Applies command-line range overrides.
fn with_input_overrides(config: &AppConfig, input: &RegionInput) -> AppConfig {
    let mut config = config.clone();
    if input.start.is_some() {
        config.range.start = input.start;
    }
    if input.end.is_some() {
        config.range.end = input.end;
    }
    config
}

fn with_output_overrides(mut config: AppConfig, output: &RegionOutput) -> AppConfig {
    if let Some(dir) = &output.output_dir {
        config.output.dir = dir.clone();
    }
    if let Some(prefix) = &output.prefix {
        config.output.prefix = prefix.clone();
    }
    config
}

pub fn run_prepare(args: &PrepareArgs, config: &AppConfig) -> Result<()> {
    let region = region_name(&args.input)?;
    let config = with_output_overrides(with_input_overrides(config, &args.input), &args.output);

    let prepared = prepare_region(&args.input.input, &region, &config)?;
    let path = save_region(
        &prepared.frame,
        &region,
        &config.output.dir,
        &config.output.prefix,
    )?;
    print_written(&region, prepared.frame.height(), &path);
    Ok(())
}

pub fn run_classify(args: &ClassifyArgs, config: &AppConfig) -> Result<()> {
    let region = region_name(&args.input)?;
    let config = with_input_overrides(config, &args.input);

    let report = classify_region(&args.input.input, &region, &config)?;
    if let Some(path) = &args.json {
        write_json(&report, path)?;
        info!(path = %path.display(), "saved missing-data report");
    }
    print_report(&region, &report);
    Ok(())
}

pub fn run_reconcile(args: &ReconcileArgs, config: &AppConfig) -> Result<()> {
    let region = region_name(&args.input)?;
    let config = with_output_overrides(with_input_overrides(config, &args.input), &args.output);
    let archive_dir: PathBuf = args
        .archive_dir
        .clone()
        .unwrap_or_else(|| config.archive.dir.clone());

    let report = args.report.as_deref().map(read_report).transpose()?;
    let result = reconcile_region(
        &args.input.input,
        &region,
        report,
        &archive_dir,
        &config.output.dir,
        &config,
    )?;

    if let Some(path) = &args.json {
        let record = ReconcileRecord {
            region: &region,
            remaining: &result.reconciled.remaining,
            skipped: &result.reconciled.skipped,
            summary: &result.reconciled.summary,
        };
        write_json(&record, path)?;
    }
    print_reconciliation(&region, &result);
    Ok(())
}

pub fn run_merge(args: &MergeArgs, config: &AppConfig) -> Result<()> {
    let merged = merge_regions(&args.input_dir, &args.output, config)?;
    print_written("Merged", merged.height(), &args.output);
    Ok(())
}

pub fn run_build_archive(args: &BuildArchiveArgs, config: &AppConfig) -> Result<()> {
    let archive_dir = args
        .archive_dir
        .clone()
        .unwrap_or_else(|| config.archive.dir.clone());
    let built = build_archive(&args.year_dir, args.year, &archive_dir, config)?;
    print_archive(&built);
    Ok(())
}

pub fn run_monthly(args: &MonthlyArgs, config: &AppConfig) -> Result<()> {
    let pivot = monthly_pivot(&args.input, &args.value, config)?;
    if let Some(path) = &args.output {
        write_csv(&pivot, path)?;
    }
    print_frame(&pivot);
    Ok(())
}

pub fn run_score(args: &ScoreArgs) -> Result<()> {
    let scores = score_predictions(&args.input, &args.observed, &args.predicted)?;
    print_scores(&args.observed, &args.predicted, &scores);
    Ok(())
}
