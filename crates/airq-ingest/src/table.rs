//! Conversion between Polars frames and typed [`DailyTable`]s.

use airq_model::{ColumnNames, DailyRecord, DailyTable, format_day, parse_day};
use polars::prelude::{AnyValue, Column, DataFrame, IntoColumn, NamedFrom, Series};
use tracing::debug;

use crate::error::{IngestError, Result};
use crate::values::{any_to_string, parse_pollutant};

fn require<'a>(df: &'a DataFrame, name: &str) -> Result<&'a Column> {
    df.column(name).map_err(|_| IngestError::ColumnNotFound {
        column: name.to_string(),
    })
}

/// Builds a typed table for `region` from a primary frame.
///
/// The date and both pollutant columns are required. A region column is
/// optional; blank cells and absent columns fall back to `region`. Pollutant
/// cells go through the sentinel check and are rounded to whole numbers.
///
/// # Errors
///
/// Returns [`IngestError::InvalidDate`] for the first row whose date cannot
/// be read, including blank dates.
pub fn frame_to_table(df: &DataFrame, names: &ColumnNames, region: &str) -> Result<DailyTable> {
    let date_col = require(df, &names.date)?;
    let pm10_col = require(df, &names.pm10)?;
    let pm25_col = require(df, &names.pm25)?;
    let region_col = df.column(&names.region).ok();

    let mut records = Vec::with_capacity(df.height());
    for idx in 0..df.height() {
        let raw_date = any_to_string(date_col.get(idx).unwrap_or(AnyValue::Null));
        let Some(date) = parse_day(&raw_date) else {
            return Err(IngestError::InvalidDate {
                column: names.date.clone(),
                row: idx,
                value: raw_date,
            });
        };

        let row_region = region_col
            .map(|col| any_to_string(col.get(idx).unwrap_or(AnyValue::Null)))
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| region.to_string());

        records.push(DailyRecord::new(
            row_region,
            date,
            parse_pollutant(pm10_col.get(idx).unwrap_or(AnyValue::Null)),
            parse_pollutant(pm25_col.get(idx).unwrap_or(AnyValue::Null)),
        ));
    }

    debug!(region, rows = records.len(), "built daily table");
    Ok(DailyTable::from_records(region, records))
}

/// Builds the output frame `region, date, pm10, pm25` for a typed table.
///
/// Dates are written as `YYYY-MM-DD`; unset pollutants become null.
pub fn table_to_frame(table: &DailyTable, names: &ColumnNames) -> Result<DataFrame> {
    let records = table.records();
    let regions: Vec<&str> = records.iter().map(|r| r.region.as_str()).collect();
    let dates: Vec<String> = records.iter().map(|r| format_day(r.date)).collect();
    let pm10: Vec<Option<i64>> = records.iter().map(|r| r.pm10).collect();
    let pm25: Vec<Option<i64>> = records.iter().map(|r| r.pm25).collect();

    let columns = vec![
        Series::new(names.region.as_str().into(), regions).into_column(),
        Series::new(names.date.as_str().into(), dates).into_column(),
        Series::new(names.pm10.as_str().into(), pm10).into_column(),
        Series::new(names.pm25.as_str().into(), pm25).into_column(),
    ];
    Ok(DataFrame::new(columns)?)
}
