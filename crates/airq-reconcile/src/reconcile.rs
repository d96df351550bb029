//! Filling missing days from the secondary archives.

use std::collections::BTreeMap;

use airq_ingest::{ArchiveLookup, SecondaryArchive};
use airq_model::{DailyRecord, DailyTable, MissingKind, MissingReport, format_day, parse_day};
use chrono::Datelike;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::{ReconcileError, Result};

/// Counters describing what a reconciliation run did.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FillSummary {
    /// Placeholder rows inserted for days without a row.
    pub inserted: usize,
    /// Days whose values were written from the archive, per category.
    pub filled: BTreeMap<MissingKind, usize>,
    /// Lookups that found no archive row.
    pub misses: usize,
    /// Days left pending because their year has no archive.
    pub unavailable: usize,
}

impl FillSummary {
    pub fn filled(&self, kind: MissingKind) -> usize {
        self.filled.get(&kind).copied().unwrap_or(0)
    }

    pub fn total_filled(&self) -> usize {
        self.filled.values().sum()
    }
}

/// Output of [`reconcile`].
#[derive(Debug, Clone, PartialEq)]
pub struct Reconciled {
    /// The primary table after filling, sorted by date.
    pub table: DailyTable,
    /// Dates still pending per category.
    pub remaining: MissingReport,
    /// Report entries whose date could not be read.
    pub skipped: Vec<String>,
    pub summary: FillSummary,
}

/// Fills a region's missing days from the secondary archives.
///
/// Neither input is modified. Categories are processed in a fixed order:
///
/// 1. Each [`MissingKind::NoDate`] day gets a placeholder row with both
///    pollutants unset and moves to [`MissingKind::BothMissing`].
/// 2. [`MissingKind::BothMissing`], [`MissingKind::Pm10Missing`] and
///    [`MissingKind::Pm25Missing`] days are looked up by region and date.
///    A hit writes the fields the category names into every row of that day.
///    A day leaves the pending list once its lookup ran; days whose year has
///    no archive stay pending.
///
/// The result table is sorted by date (stable).
///
/// # Errors
///
/// Returns [`ReconcileError::DuplicateDate`] when the table holds more than
/// one row for a day.
pub fn reconcile(
    table: &DailyTable,
    report: &MissingReport,
    archive: &SecondaryArchive,
) -> Result<Reconciled> {
    if let Some(date) = table.duplicate_dates().first() {
        return Err(ReconcileError::DuplicateDate {
            region: table.region().to_string(),
            date: format_day(*date),
        });
    }

    let mut state = Reconciled {
        table: table.clone(),
        remaining: report.clone(),
        skipped: Vec::new(),
        summary: FillSummary::default(),
    };

    insert_placeholders(&mut state);
    for kind in [
        MissingKind::BothMissing,
        MissingKind::Pm10Missing,
        MissingKind::Pm25Missing,
    ] {
        fill_category(kind, &mut state, archive);
    }

    state.table.sort_by_date();
    info!(
        region = state.table.region(),
        inserted = state.summary.inserted,
        filled = state.summary.total_filled(),
        misses = state.summary.misses,
        pending = state.remaining.total(),
        "reconciled with secondary archive"
    );
    Ok(state)
}

fn skip_unreadable(state: &mut Reconciled, kind: MissingKind, date_text: &str) {
    warn!(
        region = state.table.region(),
        category = kind.label(),
        date = date_text,
        "skipping unreadable date"
    );
    state.skipped.push(date_text.to_string());
}

/// Turns every day without a row into an empty row awaiting a full fill.
fn insert_placeholders(state: &mut Reconciled) {
    let pending = state.remaining.dates(MissingKind::NoDate).to_vec();
    for date_text in pending {
        let Some(date) = parse_day(&date_text) else {
            skip_unreadable(state, MissingKind::NoDate, &date_text);
            continue;
        };

        if state.table.rows_on(date).next().is_none() {
            let region = state.table.region().to_string();
            state.table.push(DailyRecord::placeholder(region, date));
            state.summary.inserted += 1;
        }
        state
            .remaining
            .push(MissingKind::BothMissing, format_day(date));
        state.remaining.remove(MissingKind::NoDate, &date_text);
    }
}

/// Looks up every pending day of `kind` and writes what the archive holds.
fn fill_category(kind: MissingKind, state: &mut Reconciled, archive: &SecondaryArchive) {
    let pending = state.remaining.dates(kind).to_vec();
    for date_text in pending {
        let Some(date) = parse_day(&date_text) else {
            skip_unreadable(state, kind, &date_text);
            continue;
        };

        let region = state.table.region().to_string();
        match archive.lookup(&region, date) {
            ArchiveLookup::NoArchive => {
                debug!(region = %region, year = date.year(), "no archive for year");
                state.summary.unavailable += 1;
                continue;
            }
            ArchiveLookup::Miss => {
                info!(
                    region = %region,
                    date = %date,
                    category = kind.label(),
                    "no archive row; table left unchanged"
                );
                state.summary.misses += 1;
            }
            ArchiveLookup::Hit(record) => {
                let pm10 = record.pm10.filter(|_| kind.fills_pm10());
                let pm25 = record.pm25.filter(|_| kind.fills_pm25());
                let complete = match kind {
                    MissingKind::BothMissing => pm10.is_some() && pm25.is_some(),
                    _ => pm10.is_some() || pm25.is_some(),
                };
                if complete {
                    let rows = state.table.update_on(date, |row| {
                        if let Some(value) = pm10 {
                            row.pm10 = Some(value);
                        }
                        if let Some(value) = pm25 {
                            row.pm25 = Some(value);
                        }
                    });
                    if rows > 0 {
                        *state.summary.filled.entry(kind).or_insert(0) += 1;
                    }
                    debug!(region = %region, date = %date, rows, category = kind.label(), "filled from archive");
                }
            }
        }
        state.remaining.remove(kind, &date_text);
    }
}
