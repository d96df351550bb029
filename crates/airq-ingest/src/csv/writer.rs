//! CSV output.

use std::fs::File;
use std::path::{Path, PathBuf};

use polars::prelude::{CsvWriter, DataFrame, SerWriter};
use tracing::info;

use crate::error::{IngestError, Result};

/// Writes `df` as UTF-8 CSV with a header row and no index column.
///
/// The parent directory is created when absent. Nulls are written as empty cells.
pub fn write_csv(df: &DataFrame, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| IngestError::FileWrite {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }

    let mut file = File::create(path).map_err(|e| IngestError::FileWrite {
        path: path.to_path_buf(),
        source: e,
    })?;

    let mut out = df.clone();
    CsvWriter::new(&mut file)
        .include_header(true)
        .finish(&mut out)
        .map_err(|e| IngestError::CsvWrite {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    info!(path = %path.display(), rows = df.height(), "wrote CSV");
    Ok(())
}

/// Writes one region's table to `{output_dir}/{prefix}{region}.csv`.
pub fn save_region_csv(
    df: &DataFrame,
    region: &str,
    output_dir: &Path,
    prefix: &str,
) -> Result<PathBuf> {
    let path = output_dir.join(format!("{prefix}{region}.csv"));
    write_csv(df, &path)?;
    Ok(path)
}
