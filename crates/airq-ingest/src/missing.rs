//! Missing-value canonicalization.

use polars::prelude::{AnyValue, Column, DataFrame, DataType, NamedFrom, Series};
use tracing::debug;

use crate::error::{IngestError, Result};
use crate::values::{any_to_f64, any_to_string, is_missing_value};

/// Copies a column cell by cell, nulling sentinel cells and counting them.
///
/// Integers are extracted at their own width so large values survive.
fn rebuild<T>(
    column: &Column,
    replaced: &mut usize,
    convert: impl Fn(AnyValue<'_>) -> Option<T>,
) -> Vec<Option<T>> {
    (0..column.len())
        .map(|idx| {
            let value = column.get(idx).unwrap_or(AnyValue::Null);
            if is_missing_value(&value) {
                if !value.is_null() {
                    *replaced += 1;
                }
                None
            } else {
                convert(value)
            }
        })
        .collect()
}

/// Replaces every sentinel "no data" marker in `columns` with null.
///
/// Recognised markers are the exact values in
/// [`TEXT_SENTINELS`](crate::TEXT_SENTINELS), the numeric sentinel `-999`,
/// float `NaN`, and existing nulls. Column types are preserved; other columns
/// are left as they are. An empty column list returns an unchanged copy.
pub fn canonicalize_missing<S: AsRef<str>>(df: &DataFrame, columns: &[S]) -> Result<DataFrame> {
    let mut out = df.clone();
    for name in columns {
        let name = name.as_ref();
        let column = out.column(name).map_err(|_| IngestError::ColumnNotFound {
            column: name.to_string(),
        })?;
        let dtype = column.dtype().clone();

        let mut replaced = 0usize;
        let series = match &dtype {
            DataType::String => Series::new(
                name.into(),
                rebuild(column, &mut replaced, |value| Some(any_to_string(value))),
            ),
            dt if dt.is_signed_integer() => Series::new(
                name.into(),
                rebuild(column, &mut replaced, |value| value.extract::<i64>()),
            )
            .cast(&dtype)?,
            dt if dt.is_unsigned_integer() => Series::new(
                name.into(),
                rebuild(column, &mut replaced, |value| value.extract::<u64>()),
            )
            .cast(&dtype)?,
            dt if dt.is_float() => Series::new(
                name.into(),
                rebuild(column, &mut replaced, any_to_f64),
            )
            .cast(&dtype)?,
            _ => continue,
        };

        if replaced > 0 {
            debug!(column = name, replaced, "canonicalized missing values");
        }
        out.with_column(series)?;
    }
    Ok(out)
}
