//! Missing-data classification.

use std::collections::BTreeSet;

use airq_ingest::{canonicalize_missing, frame_to_table};
use airq_model::{ColumnNames, DailyTable, MissingKind, MissingReport, day_range, format_day};
use polars::prelude::DataFrame;
use tracing::{debug, info};

use crate::error::{ReconcileError, Result};

/// Classifies every day of a region's calendar span by what data is missing.
///
/// The span runs from the earliest to the latest date in the table. Days with
/// no row at all are [`MissingKind::NoDate`], listed ascending. Days that have
/// rows are visited in first-encounter order: a day is
/// [`MissingKind::BothMissing`] when every row lacks both pollutants,
/// [`MissingKind::Pm10Missing`] when every row lacks PM10, and
/// [`MissingKind::Pm25Missing`] when every row lacks PM2.5. Complete days are
/// left out.
///
/// # Errors
///
/// Returns [`ReconcileError::EmptyInput`] when the table has no rows.
pub fn classify(table: &DailyTable) -> Result<MissingReport> {
    let Some((first, last)) = table.date_span() else {
        return Err(ReconcileError::EmptyInput {
            region: table.region().to_string(),
        });
    };

    let present: BTreeSet<_> = table.records().iter().map(|r| r.date).collect();
    let mut report = MissingReport::new();

    for day in day_range(first, last) {
        if !present.contains(&day) {
            report.push(MissingKind::NoDate, format_day(day));
        }
    }

    for day in table.distinct_dates() {
        let mut pm10_missing = true;
        let mut pm25_missing = true;
        for row in table.rows_on(day) {
            pm10_missing &= row.pm10.is_none();
            pm25_missing &= row.pm25.is_none();
        }

        let kind = match (pm10_missing, pm25_missing) {
            (true, true) => MissingKind::BothMissing,
            (true, false) => MissingKind::Pm10Missing,
            (false, true) => MissingKind::Pm25Missing,
            (false, false) => continue,
        };
        report.push(kind, format_day(day));
    }

    info!(
        region = table.region(),
        no_date = report.count(MissingKind::NoDate),
        both_missing = report.count(MissingKind::BothMissing),
        pm10_missing = report.count(MissingKind::Pm10Missing),
        pm25_missing = report.count(MissingKind::Pm25Missing),
        "classified missing data"
    );
    Ok(report)
}

/// Classifies a primary frame after canonicalizing its pollutant columns.
///
/// Dates may use any format accepted by [`airq_model::parse_day`].
pub fn classify_frame(df: &DataFrame, names: &ColumnNames, region: &str) -> Result<MissingReport> {
    if df.height() == 0 {
        return Err(ReconcileError::EmptyInput {
            region: region.to_string(),
        });
    }
    let canonical = canonicalize_missing(df, &names.pollutants())?;
    let table = frame_to_table(&canonical, names, region)?;
    debug!(region, rows = table.len(), "classifying primary frame");
    classify(&table)
}
