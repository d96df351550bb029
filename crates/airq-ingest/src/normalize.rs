//! Column and date normalization for primary tables.
//!
//! A raw export goes through a fixed sequence: header cleanup, renaming to
//! canonical names, date coercion, column selection, date-range filtering, and
//! a stable sort by date. Every step returns a new frame.

use std::collections::BTreeMap;

use airq_model::{columns, format_day, parse_day};
use chrono::NaiveDate;
use polars::prelude::{
    AnyValue, BooleanChunked, DataFrame, NamedFrom, NewChunkedArray, Series, SortMultipleOptions,
};
use tracing::{debug, warn};

use crate::csv::{rename_columns, strip_column_names};
use crate::error::{IngestError, Result};
use crate::values::any_to_string;

/// Options for [`normalize_frame`].
#[derive(Debug, Clone)]
pub struct NormalizeOptions {
    /// Name of the date column after renaming.
    pub date_column: String,
    /// Source header -> canonical name.
    pub rename: BTreeMap<String, String>,
    /// Columns to keep, in output order. `None` keeps all columns.
    pub keep_columns: Option<Vec<String>>,
    /// First day kept, inclusive.
    pub start: Option<NaiveDate>,
    /// Last day kept, inclusive.
    pub end: Option<NaiveDate>,
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self {
            date_column: columns::DATE.to_string(),
            rename: BTreeMap::new(),
            keep_columns: None,
            start: None,
            end: None,
        }
    }
}

impl NormalizeOptions {
    pub fn new(date_column: impl Into<String>) -> Self {
        Self {
            date_column: date_column.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_rename(mut self, rename: BTreeMap<String, String>) -> Self {
        self.rename = rename;
        self
    }

    #[must_use]
    pub fn with_keep_columns(mut self, keep: Vec<String>) -> Self {
        self.keep_columns = Some(keep);
        self
    }

    #[must_use]
    pub fn with_range(mut self, start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        self.start = start;
        self.end = end;
        self
    }
}

/// Runs the full normalization sequence on a raw table.
pub fn normalize_frame(df: &DataFrame, options: &NormalizeOptions) -> Result<DataFrame> {
    let mut out = strip_column_names(df)?;
    rename_columns(&mut out, &options.rename)?;
    let mut out = normalize_date_column(&out, &options.date_column)?;

    if let Some(keep) = &options.keep_columns {
        out = select_columns(&out, keep)?;
    }
    if options.start.is_some() || options.end.is_some() {
        out = filter_date_range(&out, &options.date_column, options.start, options.end)?;
    }
    let out = sort_by_date(&out, &options.date_column)?;

    debug!(
        rows = out.height(),
        columns = out.width(),
        "normalized primary table"
    );
    Ok(out)
}

/// Rewrites a date column as `YYYY-MM-DD` text; unreadable cells become null.
pub fn normalize_date_column(df: &DataFrame, date_column: &str) -> Result<DataFrame> {
    let column = df
        .column(date_column)
        .map_err(|_| IngestError::ColumnNotFound {
            column: date_column.to_string(),
        })?;

    let mut unreadable = 0usize;
    let mut values: Vec<Option<String>> = Vec::with_capacity(df.height());
    for idx in 0..df.height() {
        let raw = any_to_string(column.get(idx).unwrap_or(AnyValue::Null));
        let day = parse_day(&raw);
        if day.is_none() && !raw.trim().is_empty() {
            unreadable += 1;
        }
        values.push(day.map(format_day));
    }
    if unreadable > 0 {
        warn!(
            column = date_column,
            unreadable, "date values could not be parsed and were cleared"
        );
    }

    let mut out = df.clone();
    out.with_column(Series::new(date_column.into(), values))?;
    Ok(out)
}

/// Keeps only `keep`, in that order.
pub fn select_columns<S: AsRef<str>>(df: &DataFrame, keep: &[S]) -> Result<DataFrame> {
    for name in keep {
        if df.column(name.as_ref()).is_err() {
            return Err(IngestError::ColumnNotFound {
                column: name.as_ref().to_string(),
            });
        }
    }
    Ok(df.select(keep.iter().map(|name| name.as_ref().to_string()))?)
}

/// Keeps rows whose date falls within `[start, end]`.
///
/// Expects a column already rewritten by [`normalize_date_column`]; rows with
/// a null date are dropped.
pub fn filter_date_range(
    df: &DataFrame,
    date_column: &str,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> Result<DataFrame> {
    let column = df
        .column(date_column)
        .map_err(|_| IngestError::ColumnNotFound {
            column: date_column.to_string(),
        })?;

    let mut keep = Vec::with_capacity(df.height());
    for idx in 0..df.height() {
        let day = parse_day(&any_to_string(column.get(idx).unwrap_or(AnyValue::Null)));
        let inside = day.is_some_and(|day| {
            start.is_none_or(|start| day >= start) && end.is_none_or(|end| day <= end)
        });
        keep.push(inside);
    }

    let mask = BooleanChunked::from_slice("in_range".into(), &keep);
    Ok(df.filter(&mask)?)
}

/// Stable ascending sort on a `YYYY-MM-DD` date column.
pub fn sort_by_date(df: &DataFrame, date_column: &str) -> Result<DataFrame> {
    sort_by_columns(df, &[date_column])
}

/// Stable ascending sort on several columns, first column most significant.
pub fn sort_by_columns(df: &DataFrame, by: &[&str]) -> Result<DataFrame> {
    for name in by {
        if df.column(name).is_err() {
            return Err(IngestError::ColumnNotFound {
                column: (*name).to_string(),
            });
        }
    }
    let names: Vec<String> = by.iter().map(|name| (*name).to_string()).collect();
    Ok(df.sort(
        names,
        SortMultipleOptions::default().with_maintain_order(true),
    )?)
}
