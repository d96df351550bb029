//! Building a year archive from raw monthly exports.
//!
//! Monthly exports carry hourly rows for every metro area. A year archive keeps
//! the rows of one metro area, drops the area prefix from the region, and
//! averages the hours of each day.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use airq_model::{ArchiveRecord, ColumnNames, parse_day};
use chrono::NaiveDate;
use polars::prelude::AnyValue;
use tracing::{debug, info};

use crate::csv::{read_csv_text, rename_columns, strip_column_names};
use crate::discovery::list_csv_files;
use crate::error::{IngestError, Result};
use crate::values::{any_to_f64, any_to_string, is_missing_value, round_concentration};

/// Options for [`build_year_archive`].
#[derive(Debug, Clone)]
pub struct ArchiveBuildOptions {
    /// Source header -> canonical name.
    pub rename: BTreeMap<String, String>,
    /// Region prefix selecting the metro area; stripped from kept regions.
    pub region_prefix: String,
    pub columns: ColumnNames,
}

impl Default for ArchiveBuildOptions {
    fn default() -> Self {
        let rename = [
            ("측정일시", "date"),
            ("PM10", "pm10"),
            ("PM25", "pm25"),
            ("지역", "region"),
        ]
        .into_iter()
        .map(|(from, to)| (from.to_string(), to.to_string()))
        .collect();
        Self {
            rename,
            region_prefix: "서울 ".to_string(),
            columns: ColumnNames::default(),
        }
    }
}

#[derive(Debug, Default)]
struct DailyMean {
    pm10_sum: f64,
    pm10_count: u32,
    pm25_sum: f64,
    pm25_count: u32,
}

impl DailyMean {
    fn add(sum: &mut f64, count: &mut u32, value: AnyValue<'_>) {
        if is_missing_value(&value) {
            return;
        }
        if let Some(v) = any_to_f64(value) {
            *sum += v;
            *count += 1;
        }
    }

    fn mean(sum: f64, count: u32) -> Option<i64> {
        (count > 0)
            .then(|| sum / f64::from(count))
            .and_then(round_concentration)
    }
}

/// Builds the archive rows of one year folder of monthly CSV exports.
///
/// Every CSV in `year_dir` is read as text, its headers are trimmed and
/// renamed, and rows whose region starts with the configured prefix are kept.
/// The date is the first eight characters (`YYYYMMDD`) of the timestamp.
/// Pollutants are averaged per region and day, ignoring missing values, and
/// rounded to whole numbers. Rows come back sorted by region, then date.
pub fn build_year_archive(
    year_dir: &Path,
    options: &ArchiveBuildOptions,
) -> Result<Vec<ArchiveRecord>> {
    let files = list_csv_files(year_dir)?;
    if files.is_empty() {
        return Err(IngestError::NoInputFiles {
            path: year_dir.to_path_buf(),
        });
    }

    let names = &options.columns;
    let mut days: BTreeMap<(String, NaiveDate), DailyMean> = BTreeMap::new();

    for path in &files {
        let raw = read_csv_text(path)?;
        let mut df = strip_column_names(&raw)?;
        rename_columns(&mut df, &options.rename)?;

        let column = |name: &str| {
            df.column(name).map_err(|_| IngestError::ColumnNotFound {
                column: name.to_string(),
            })
        };
        let region_col = column(&names.region)?;
        let date_col = column(&names.date)?;
        let pm10_col = column(&names.pm10)?;
        let pm25_col = column(&names.pm25)?;

        let mut kept = 0usize;
        for idx in 0..df.height() {
            let region = any_to_string(region_col.get(idx).unwrap_or(AnyValue::Null));
            let Some(region) = region.strip_prefix(&options.region_prefix) else {
                continue;
            };
            let stamp = any_to_string(date_col.get(idx).unwrap_or(AnyValue::Null));
            let day_text: String = stamp.trim().chars().take(8).collect();
            let Some(date) = parse_day(&day_text) else {
                continue;
            };

            let entry = days
                .entry((region.trim().to_string(), date))
                .or_default();
            DailyMean::add(
                &mut entry.pm10_sum,
                &mut entry.pm10_count,
                pm10_col.get(idx).unwrap_or(AnyValue::Null),
            );
            DailyMean::add(
                &mut entry.pm25_sum,
                &mut entry.pm25_count,
                pm25_col.get(idx).unwrap_or(AnyValue::Null),
            );
            kept += 1;
        }
        debug!(path = %path.display(), rows = df.height(), kept, "read monthly export");
    }

    let records: Vec<ArchiveRecord> = days
        .into_iter()
        .map(|((region, date), mean)| {
            ArchiveRecord::new(
                region,
                date,
                DailyMean::mean(mean.pm10_sum, mean.pm10_count),
                DailyMean::mean(mean.pm25_sum, mean.pm25_count),
            )
        })
        .collect();

    info!(
        path = %year_dir.display(),
        files = files.len(),
        rows = records.len(),
        "built year archive"
    );
    Ok(records)
}

/// Writes archive rows to `{dir}/{year}.csv`, creating `dir` when absent.
pub fn write_archive(records: &[ArchiveRecord], dir: &Path, year: i32) -> Result<PathBuf> {
    std::fs::create_dir_all(dir).map_err(|e| IngestError::FileWrite {
        path: dir.to_path_buf(),
        source: e,
    })?;
    let path = dir.join(format!("{year}.csv"));
    let to_csv_error = |e: csv::Error| IngestError::CsvWrite {
        path: path.clone(),
        message: e.to_string(),
    };

    let mut writer = csv::Writer::from_path(&path).map_err(to_csv_error)?;
    for record in records {
        writer.serialize(record).map_err(to_csv_error)?;
    }
    writer.flush().map_err(|e| IngestError::FileWrite {
        path: path.clone(),
        source: e,
    })?;

    info!(path = %path.display(), rows = records.len(), "wrote archive");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archive::read_archive_file;
    use tempfile::TempDir;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_build_year_archive_averages_days() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("202003.csv"),
            " 지역 ,측정일시,PM10,PM25\n\
             서울 중구,2020030501,40,17\n\
             서울 중구,2020030502,45,-999\n\
             서울 중구,2020030601,,\n\
             경기 수원,2020030501,99,99\n",
        )
        .unwrap();
        std::fs::write(
            dir.path().join("202004.csv"),
            "지역,측정일시,PM10,PM25\n서울 강남구,2020040124,30,12\n",
        )
        .unwrap();

        let records = build_year_archive(dir.path(), &ArchiveBuildOptions::default()).unwrap();

        assert_eq!(
            records,
            vec![
                ArchiveRecord::new("강남구", day(2020, 4, 1), Some(30), Some(12)),
                ArchiveRecord::new("중구", day(2020, 3, 5), Some(42), Some(17)),
                ArchiveRecord::new("중구", day(2020, 3, 6), None, None),
            ]
        );
    }

    #[test]
    fn test_write_archive_roundtrips_through_loader() {
        let dir = TempDir::new().unwrap();
        let records = vec![ArchiveRecord::new("중구", day(2020, 3, 5), Some(42), None)];

        let path = write_archive(&records, &dir.path().join("sub"), 2020).unwrap();

        assert!(path.ends_with("sub/2020.csv"));
        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, "region,date,pm10,pm25\n중구,2020-03-05,42,\n");
        assert_eq!(read_archive_file(&path).unwrap(), records);
    }

    #[test]
    fn test_missing_pollutant_column() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("202003.csv"),
            "지역,측정일시,PM10\n서울 중구,2020030501,40\n",
        )
        .unwrap();
        let result = build_year_archive(dir.path(), &ArchiveBuildOptions::default());
        assert!(matches!(result, Err(IngestError::ColumnNotFound { .. })));
    }
}
