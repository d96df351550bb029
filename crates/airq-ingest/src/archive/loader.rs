//! Loading archive files from disk.

use std::path::Path;

use airq_model::{ArchiveRecord, parse_day};
use serde::Deserialize;
use tracing::{info, warn};

use super::SecondaryArchive;
use crate::discovery::{list_csv_files, year_from_path};
use crate::error::{IngestError, Result};
use crate::values::parse_pollutant_text;

/// Raw archive row as written in the file.
#[derive(Debug, Deserialize)]
struct RawArchiveRow {
    region: String,
    date: String,
    #[serde(default)]
    pm10: Option<String>,
    #[serde(default)]
    pm25: Option<String>,
}

/// Reads one `{year}.csv` archive file.
///
/// Only the first ten characters of the date are read, so both `YYYY-MM-DD`
/// and timestamped values work. Rows whose date cannot be read are skipped.
pub fn read_archive_file(path: &Path) -> Result<Vec<ArchiveRecord>> {
    if !path.exists() {
        return Err(IngestError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::Headers)
        .from_path(path)
        .map_err(|e| IngestError::CsvParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    let mut records = Vec::new();
    let mut skipped = 0usize;
    for result in reader.deserialize::<RawArchiveRow>() {
        let row = result.map_err(|e| IngestError::CsvParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        let date_text: String = row.date.trim().chars().take(10).collect();
        let Some(date) = parse_day(&date_text) else {
            skipped += 1;
            continue;
        };

        records.push(ArchiveRecord::new(
            row.region.trim(),
            date,
            row.pm10.as_deref().and_then(parse_pollutant_text),
            row.pm25.as_deref().and_then(parse_pollutant_text),
        ));
    }

    if skipped > 0 {
        warn!(path = %path.display(), skipped, "archive rows with unreadable dates were skipped");
    }
    Ok(records)
}

impl SecondaryArchive {
    /// Loads every `{year}.csv` file in `dir`.
    ///
    /// Files whose name is not a year are ignored. A missing directory yields
    /// an empty archive, so no correction can be made from it.
    pub fn load_dir(dir: &Path) -> Result<Self> {
        let mut archive = Self::new();
        if !dir.is_dir() {
            warn!(path = %dir.display(), "archive directory not found; no corrections available");
            return Ok(archive);
        }

        for path in list_csv_files(dir)? {
            let Some(year) = year_from_path(&path) else {
                continue;
            };
            archive.load_year_file(year, &path)?;
        }

        info!(
            path = %dir.display(),
            years = archive.years.len(),
            rows = archive.len(),
            "loaded secondary archive"
        );
        Ok(archive)
    }

    /// Loads one archive file as the rows of `year`.
    pub fn load_year_file(&mut self, year: i32, path: &Path) -> Result<()> {
        let records = read_archive_file(path)?;
        self.insert_year(year, records);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archive::ArchiveLookup;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    #[test]
    fn test_load_dir_reads_year_files() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("2020.csv"),
            "region, date ,pm10,pm25\n중구,2020-03-05,42,18\n중구,2020-03-06 00:00:00,-999,\n중구,unknown,1,1\n",
        )
        .unwrap();
        std::fs::write(dir.path().join("notes.csv"), "x\n1\n").unwrap();

        let archive = SecondaryArchive::load_dir(dir.path()).unwrap();

        assert!(archive.has_year(2020));
        assert!(!archive.has_year(2019));
        assert_eq!(archive.len(), 2);
        let day = NaiveDate::from_ymd_opt(2020, 3, 6).unwrap();
        match archive.lookup("중구", day) {
            ArchiveLookup::Hit(record) => {
                assert_eq!(record.pm10, None);
                assert_eq!(record.pm25, None);
            }
            other => panic!("unexpected lookup: {other:?}"),
        }
    }

    #[test]
    fn test_missing_directory_is_empty_archive() {
        let dir = TempDir::new().unwrap();
        let archive = SecondaryArchive::load_dir(&dir.path().join("sub")).unwrap();
        assert!(archive.years().next().is_none());
    }

    #[test]
    fn test_malformed_row() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("2020.csv");
        std::fs::write(&path, "region,date,pm10,pm25\n중구\n").unwrap();
        let result = read_archive_file(&path);
        assert!(matches!(result, Err(IngestError::CsvParse { .. })));
    }
}
