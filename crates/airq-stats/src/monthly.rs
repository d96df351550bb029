//! Calendar-month aggregation.

use std::collections::BTreeMap;

use airq_ingest::{any_to_string, canonicalize_missing};
use airq_model::parse_day;
use chrono::Datelike;
use polars::prelude::{
    AnyValue, Column, DataFrame, DataType, IntoColumn, IntoLazy, NamedFrom, Series,
    SortMultipleOptions, col, lit,
};
use tracing::debug;

use crate::error::{Result, StatsError};

fn require<'a>(df: &'a DataFrame, name: &str) -> Result<&'a Column> {
    df.column(name).map_err(|_| StatsError::ColumnNotFound {
        column: name.to_string(),
    })
}

/// Adds `month_column` (1-12) derived from `date_column`.
///
/// Dates that cannot be read give a null month. An existing column with the
/// same name is replaced.
pub fn add_month_column(df: &DataFrame, date_column: &str, month_column: &str) -> Result<DataFrame> {
    let dates = require(df, date_column)?;
    let months: Vec<Option<i32>> = (0..df.height())
        .map(|idx| {
            let raw = any_to_string(dates.get(idx).unwrap_or(AnyValue::Null));
            parse_day(&raw).map(|day| day.month() as i32)
        })
        .collect();

    let mut out = df.clone();
    out.with_column(Series::new(month_column.into(), months))?;
    Ok(out)
}

/// Mean of `value_column` per region and month, pivoted to one row per region.
///
/// Rows missing the region, the month, or the value are dropped first; value
/// sentinels such as `-999` count as missing. The result has `region_column`
/// (ascending) followed by one `Float64` column per month present, named by
/// the month number in ascending order. A region with no data for a month
/// gets null.
pub fn monthly_average_by_region(
    df: &DataFrame,
    region_column: &str,
    month_column: &str,
    value_column: &str,
) -> Result<DataFrame> {
    for name in [region_column, month_column, value_column] {
        require(df, name)?;
    }

    let cleaned = canonicalize_missing(df, &[value_column])?;
    let long = cleaned
        .lazy()
        .select([
            col(region_column).cast(DataType::String),
            col(month_column).cast(DataType::Int32),
            col(value_column).cast(DataType::Float64),
        ])
        .filter(
            col(region_column)
                .is_not_null()
                .and(col(region_column).neq(lit("")))
                .and(col(month_column).is_not_null())
                .and(col(value_column).is_not_null()),
        )
        .group_by([col(region_column), col(month_column)])
        .agg([col(value_column).mean()])
        .sort([region_column, month_column], SortMultipleOptions::default())
        .collect()?;

    let pivot = widen_by_month(&long, region_column, month_column, value_column)?;
    debug!(
        rows = df.height(),
        groups = long.height(),
        regions = pivot.height(),
        value = value_column,
        "built monthly averages"
    );
    Ok(pivot)
}

/// Reshapes `(region, month, mean)` rows sorted by region into one row per
/// region and one column per month.
fn widen_by_month(
    long: &DataFrame,
    region_column: &str,
    month_column: &str,
    value_column: &str,
) -> Result<DataFrame> {
    let regions = long.column(region_column)?.str()?;
    let months = long.column(month_column)?.i32()?;
    let means = long.column(value_column)?.f64()?;

    let mut names: Vec<String> = Vec::new();
    let mut by_month: BTreeMap<i32, Vec<Option<f64>>> = BTreeMap::new();
    for ((region, month), mean) in regions.into_iter().zip(months).zip(means) {
        let (Some(region), Some(month)) = (region, month) else {
            continue;
        };
        if names.last().map(String::as_str) != Some(region) {
            names.push(region.to_string());
        }
        let cells = by_month.entry(month).or_default();
        cells.resize(names.len() - 1, None);
        cells.push(mean);
    }

    let mut columns = vec![Series::new(region_column.into(), &names).into_column()];
    for (month, mut cells) in by_month {
        cells.resize(names.len(), None);
        columns.push(Series::new(month.to_string().into(), cells).into_column());
    }
    Ok(DataFrame::new(columns)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn daily() -> DataFrame {
        DataFrame::new(vec![
            Series::new(
                "region".into(),
                vec!["중구", "중구", "중구", "강남구", "강남구"],
            )
            .into_column(),
            Series::new(
                "date".into(),
                vec!["2020-01-01", "2020-01-02", "2020-02-01", "2020-02-03", "bad"],
            )
            .into_column(),
            Series::new("pm10".into(), vec![Some(40.0), Some(50.0), Some(30.0), Some(20.0), Some(1.0)])
                .into_column(),
        ])
        .unwrap()
    }

    #[test]
    fn test_add_month_column() {
        let out = add_month_column(&daily(), "date", "month").unwrap();
        let month = out.column("month").unwrap();
        assert_eq!(month.get(0).unwrap(), AnyValue::Int32(1));
        assert_eq!(month.get(2).unwrap(), AnyValue::Int32(2));
        assert_eq!(month.null_count(), 1);
        // source untouched
        assert!(daily().column("month").is_err());
    }

    #[test]
    fn test_monthly_pivot() {
        let with_month = add_month_column(&daily(), "date", "month").unwrap();
        let pivot = monthly_average_by_region(&with_month, "region", "month", "pm10").unwrap();

        let names: Vec<String> = pivot
            .get_column_names()
            .iter()
            .map(|n| n.to_string())
            .collect();
        assert_eq!(names, vec!["region", "1", "2"]);
        assert_eq!(pivot.height(), 2);

        assert_eq!(
            pivot.column("region").unwrap().get(0).unwrap(),
            AnyValue::String("강남구")
        );
        assert_eq!(pivot.column("1").unwrap().get(0).unwrap(), AnyValue::Null);
        assert_eq!(pivot.column("1").unwrap().get(1).unwrap(), AnyValue::Float64(45.0));
        assert_eq!(pivot.column("2").unwrap().get(0).unwrap(), AnyValue::Float64(20.0));
    }

    #[test]
    fn test_text_values_and_sentinels() {
        let df = DataFrame::new(vec![
            Series::new("region".into(), vec!["중구", "중구", "중구", ""]).into_column(),
            Series::new("month".into(), vec![Some(3i32), Some(3), Some(3), Some(3)]).into_column(),
            Series::new("pm10".into(), vec!["40", "-999", "NA", "10"]).into_column(),
        ])
        .unwrap();

        let pivot = monthly_average_by_region(&df, "region", "month", "pm10").unwrap();

        assert_eq!(pivot.height(), 1);
        assert_eq!(pivot.column("3").unwrap().get(0).unwrap(), AnyValue::Float64(40.0));
    }

    #[test]
    fn test_missing_value_column() {
        let result = monthly_average_by_region(&daily(), "region", "month", "pm10");
        assert!(matches!(result, Err(StatsError::ColumnNotFound { .. })));
    }
}
