//! Column-name cleanup.

use std::collections::BTreeMap;

use polars::prelude::DataFrame;
use tracing::debug;

use crate::error::Result;

/// Normalizes a header value by trimming whitespace and a leading BOM.
pub fn normalize_header(value: &str) -> String {
    value.trim_start_matches('\u{feff}').trim().to_string()
}

/// Returns a copy of `df` whose column names have surrounding whitespace removed.
pub fn strip_column_names(df: &DataFrame) -> Result<DataFrame> {
    let mut out = df.clone();
    let names: Vec<String> = out
        .get_column_names()
        .iter()
        .map(|name| name.to_string())
        .collect();
    for name in names {
        let cleaned = normalize_header(&name);
        if cleaned != name {
            out.rename(&name, cleaned.into())?;
        }
    }
    Ok(out)
}

/// Renames columns through `mapping` (source header -> canonical name).
///
/// Entries whose source column is absent are ignored.
pub fn rename_columns(df: &mut DataFrame, mapping: &BTreeMap<String, String>) -> Result<()> {
    for (source, target) in mapping {
        if source == target || df.column(source).is_err() {
            continue;
        }
        debug!(source = %source, target = %target, "renaming column");
        df.rename(source, target.as_str().into())?;
    }
    Ok(())
}
