//! Reconciliation against archives loaded from disk.

use std::path::Path;

use airq_ingest::SecondaryArchive;
use airq_model::{DailyRecord, DailyTable, MissingKind, MissingReport, parse_day};
use airq_reconcile::{classify, reconcile};
use tempfile::TempDir;

fn write_year(dir: &Path, year: i32, rows: &str) {
    let content = format!("region,date,pm10,pm25\n{rows}");
    std::fs::write(dir.join(format!("{year}.csv")), content).expect("write archive");
}

fn record(date: &str, pm10: Option<i64>, pm25: Option<i64>) -> DailyRecord {
    DailyRecord::new("중구", parse_day(date).expect("date"), pm10, pm25)
}

#[test]
fn pm10_gap_filled_from_archive() {
    let dir = TempDir::new().expect("temp dir");
    write_year(dir.path(), 2020, "중구,2020-03-05,42,18\n");
    let archive = SecondaryArchive::load_dir(dir.path()).expect("load");

    let table = DailyTable::from_records("중구", vec![record("2020-03-05", None, Some(20))]);
    let mut report = MissingReport::new();
    report.push(MissingKind::Pm10Missing, "2020-03-05");

    let out = reconcile(&table, &report, &archive).expect("reconcile");

    assert_eq!(out.table.records(), [record("2020-03-05", Some(42), Some(20))]);
    assert!(out.remaining.dates(MissingKind::Pm10Missing).is_empty());
    assert_eq!(out.summary.filled(MissingKind::Pm10Missing), 1);
}

#[test]
fn missing_day_without_archive_becomes_placeholder() {
    let dir = TempDir::new().expect("temp dir");
    let archive = SecondaryArchive::load_dir(dir.path()).expect("load");

    let table = DailyTable::from_records(
        "중구",
        vec![
            record("2019-07-02", Some(30), Some(12)),
            record("2019-06-30", Some(31), Some(13)),
        ],
    );
    let report = classify(&table).expect("classify");
    assert_eq!(report.dates(MissingKind::NoDate), ["2019-07-01"]);

    let out = reconcile(&table, &report, &archive).expect("reconcile");

    assert_eq!(
        out.table.records(),
        [
            record("2019-06-30", Some(31), Some(13)),
            record("2019-07-01", None, None),
            record("2019-07-02", Some(30), Some(12)),
        ]
    );
    assert_eq!(out.remaining.dates(MissingKind::BothMissing), ["2019-07-01"]);
}

#[test]
fn archive_miss_leaves_row_unchanged() {
    let dir = TempDir::new().expect("temp dir");
    write_year(dir.path(), 2020, "강남구,2020-03-05,42,18\n중구,2020-03-06,42,18\n");
    let archive = SecondaryArchive::load_dir(dir.path()).expect("load");

    let table = DailyTable::from_records("중구", vec![record("2020-03-05", Some(40), None)]);
    let mut report = MissingReport::new();
    report.push(MissingKind::Pm25Missing, "2020-03-05");

    let out = reconcile(&table, &report, &archive).expect("reconcile");

    assert_eq!(out.table, table);
    assert_eq!(out.summary.misses, 1);
    assert!(out.remaining.is_empty());
}

#[test]
fn full_round_trip_fills_placeholder_from_archive() {
    let dir = TempDir::new().expect("temp dir");
    write_year(dir.path(), 2021, "중구,2021-01-02,55,-999\n중구,2021-01-03 00:00,60,25\n");
    let archive = SecondaryArchive::load_dir(dir.path()).expect("load");

    let table = DailyTable::from_records(
        "중구",
        vec![
            record("2021-01-01", Some(50), Some(20)),
            record("2021-01-03", None, None),
            record("2021-01-04", Some(52), Some(21)),
        ],
    );
    let report = classify(&table).expect("classify");
    let out = reconcile(&table, &report, &archive).expect("reconcile");

    // 01-02 has no PM2.5 in the archive, so the full fill is not applied.
    assert_eq!(out.table.records()[1], record("2021-01-02", None, None));
    assert_eq!(out.table.records()[2], record("2021-01-03", Some(60), Some(25)));
    assert!(out.remaining.is_empty());
    assert!(out.skipped.is_empty());
}
