//! Concatenation of per-region files into one long table.

use std::collections::BTreeSet;
use std::path::Path;

use airq_model::columns;
use polars::prelude::{DataFrame, NamedFrom, Series};
use tracing::{debug, info};

use crate::csv::read_csv_text;
use crate::discovery::{list_csv_files, region_from_path};
use crate::error::{IngestError, Result};
use crate::normalize::{normalize_date_column, sort_by_columns};

/// Options for [`merge_region_files`].
#[derive(Debug, Clone)]
pub struct MergeOptions {
    /// Column receiving the region taken from each file name.
    pub region_column: String,
    /// Date column normalized and used for ordering when present.
    pub date_column: String,
}

impl Default for MergeOptions {
    fn default() -> Self {
        Self {
            region_column: columns::REGION.to_string(),
            date_column: columns::DATE.to_string(),
        }
    }
}

fn column_list(df: &DataFrame) -> Vec<String> {
    df.get_column_names()
        .iter()
        .map(|name| name.to_string())
        .collect()
}

/// Whether two headers name the same columns, in any order.
fn same_columns(expected: &[String], found: &[String]) -> bool {
    let expected: BTreeSet<&str> = expected.iter().map(String::as_str).collect();
    let found_set: BTreeSet<&str> = found.iter().map(String::as_str).collect();
    expected.len() == found.len() && expected == found_set
}

/// Merges every CSV file in `input_dir` into one frame tagged by region.
///
/// Files are read in file-name order with all cells as text. Each file must
/// have the same column names as the first one; columns are aligned by name,
/// so their order may differ.
/// The region column is set to the file stem, replacing any existing values.
/// When the date column exists it is normalized and the result is sorted by
/// region, then date.
///
/// # Errors
///
/// - [`IngestError::NoInputFiles`] when the directory holds no CSV file.
/// - [`IngestError::StructuralMismatch`] when a file's columns differ.
pub fn merge_region_files(input_dir: &Path, options: &MergeOptions) -> Result<DataFrame> {
    let files = list_csv_files(input_dir)?;
    if files.is_empty() {
        return Err(IngestError::NoInputFiles {
            path: input_dir.to_path_buf(),
        });
    }

    let mut expected: Option<Vec<String>> = None;
    let mut merged: Option<DataFrame> = None;

    for path in &files {
        let Some(region) = region_from_path(path) else {
            continue;
        };
        let mut df = read_csv_text(path)?;

        let found = column_list(&df);
        if let Some(expected) = &expected {
            if !same_columns(expected, &found) {
                return Err(IngestError::StructuralMismatch {
                    path: path.clone(),
                    expected: expected.join(", "),
                    found: found.join(", "),
                });
            }
            df = df.select(expected.iter().cloned())?;
        } else {
            expected = Some(found);
        }

        let tag = Series::new(
            options.region_column.as_str().into(),
            vec![region.as_str(); df.height()],
        );
        df.with_column(tag)?;
        debug!(region = %region, rows = df.height(), "read regional file");

        match merged.as_mut() {
            Some(acc) => {
                acc.vstack_mut(&df)?;
            }
            None => merged = Some(df),
        }
    }

    let Some(merged) = merged else {
        return Err(IngestError::NoInputFiles {
            path: input_dir.to_path_buf(),
        });
    };

    let merged = if merged.column(&options.date_column).is_ok() {
        let dated = normalize_date_column(&merged, &options.date_column)?;
        sort_by_columns(&dated, &[&options.region_column, &options.date_column])?
    } else {
        sort_by_columns(&merged, &[&options.region_column])?
    };

    info!(
        files = files.len(),
        rows = merged.height(),
        "merged regional files"
    );
    Ok(merged)
}
