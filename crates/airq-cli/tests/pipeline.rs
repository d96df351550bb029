//! End-to-end runs of the `airq` stages over temporary folders.

use std::path::Path;

use airq_cli::config::AppConfig;
use airq_cli::pipeline::{
    build_archive, classify_region, merge_regions, monthly_pivot, prepare_region, read_report,
    reconcile_region, score_predictions, write_json,
};
use airq_ingest::{any_to_string, read_csv_text};
use airq_model::MissingKind;
use polars::prelude::AnyValue;
use tempfile::TempDir;

fn write(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("create dir");
    }
    std::fs::write(path, content).expect("write file");
}

fn config() -> AppConfig {
    AppConfig::from_toml(
        r#"
[rename]
"측정일시" = "date"
"미세먼지" = "pm10"
"초미세먼지" = "pm25"

[prepare]
keep = ["date", "pm10", "pm25"]
"#,
    )
    .expect("config")
}

fn primary(dir: &Path) -> std::path::PathBuf {
    let path = dir.join("raw/중구.csv");
    write(
        &path,
        " 측정일시 ,미세먼지,초미세먼지,비고\n\
         2020-03-07,45,NA,x\n\
         2020-03-04,40,20,x\n\
         2020-03-05,-999,18,x\n",
    );
    path
}

#[test]
fn classify_reports_every_category() {
    let dir = TempDir::new().expect("temp dir");
    let input = primary(dir.path());

    let report = classify_region(&input, "중구", &config()).expect("classify");

    assert_eq!(report.dates(MissingKind::NoDate), ["2020-03-06"]);
    assert_eq!(report.dates(MissingKind::Pm10Missing), ["2020-03-05"]);
    assert_eq!(report.dates(MissingKind::Pm25Missing), ["2020-03-07"]);
    assert!(report.dates(MissingKind::BothMissing).is_empty());
}

#[test]
fn prepare_keeps_listed_columns_sorted() {
    let dir = TempDir::new().expect("temp dir");
    let input = primary(dir.path());

    let prepared = prepare_region(&input, "중구", &config()).expect("prepare");

    assert_eq!(prepared.frame.width(), 3);
    let date = prepared.frame.column("date").expect("date");
    assert_eq!(date.get(0).expect("cell"), AnyValue::String("2020-03-04"));
    assert_eq!(prepared.frame.column("pm10").expect("pm10").null_count(), 1);
}

#[test]
fn archive_build_then_reconcile() {
    let dir = TempDir::new().expect("temp dir");
    let input = primary(dir.path());
    write(
        &dir.path().join("monthly/2020/202003.csv"),
        "지역,측정일시,PM10,PM25\n\
         서울 중구,2020030501,42,18\n\
         서울 중구,2020030601,30,12\n\
         서울 중구,2020030701,50,24\n\
         서울 중구,2020030702,50,25\n",
    );
    let config = config();
    let archive_dir = dir.path().join("sub");

    let built = build_archive(&dir.path().join("monthly/2020"), None, &archive_dir, &config)
        .expect("build archive");
    assert_eq!(built.year, 2020);
    assert_eq!(built.records.len(), 3);

    let report_path = dir.path().join("reports/중구.json");
    let report = classify_region(&input, "중구", &config).expect("classify");
    write_json(&report, &report_path).expect("save report");
    let report = read_report(&report_path).expect("load report");

    let out_dir = dir.path().join("processed");
    let result = reconcile_region(&input, "중구", Some(report), &archive_dir, &out_dir, &config)
        .expect("reconcile");

    assert!(result.reconciled.remaining.is_empty());
    assert_eq!(result.output, out_dir.join("중구.csv"));

    let written = read_csv_text(&result.output).expect("read output");
    let rows: Vec<String> = (0..written.height())
        .map(|idx| {
            written
                .get_columns()
                .iter()
                .map(|column| any_to_string(column.get(idx).expect("cell")))
                .collect::<Vec<_>>()
                .join(",")
        })
        .collect();
    assert_eq!(
        rows,
        vec![
            "중구,2020-03-04,40,20",
            "중구,2020-03-05,42,18",
            "중구,2020-03-06,30,12",
            "중구,2020-03-07,45,24",
        ]
    );
}

#[test]
fn merge_then_monthly_pivot() {
    let dir = TempDir::new().expect("temp dir");
    write(
        &dir.path().join("regions/중구.csv"),
        "date,pm10,pm25\n2020-01-01,40,20\n2020-01-02,50,22\n2020-02-01,30,10\n",
    );
    write(
        &dir.path().join("regions/강남구.csv"),
        "date,pm10,pm25\n2020-02-01,20,8\n",
    );
    let merged_path = dir.path().join("merged/all.csv");

    let merged =
        merge_regions(&dir.path().join("regions"), &merged_path, &AppConfig::default()).expect("merge");
    assert_eq!(merged.height(), 4);

    let pivot = monthly_pivot(&merged_path, "pm10", &AppConfig::default()).expect("pivot");
    assert_eq!(pivot.height(), 2);
    assert_eq!(
        pivot.column("1").expect("january").get(1).expect("cell"),
        AnyValue::Float64(45.0)
    );
}

#[test]
fn score_predictions_from_csv() {
    let dir = TempDir::new().expect("temp dir");
    let input = dir.path().join("predictions.csv");
    write(
        &input,
        "date,pm10,predicted\n\
         2020-03-01,3,2.5\n\
         2020-03-02,-0.5,0\n\
         2020-03-03,2,2\n\
         2020-03-04,7,8\n\
         2020-03-05,NA,4\n",
    );

    let scores = score_predictions(&input, "pm10", "predicted").expect("score");

    assert!((scores.mse - 0.375).abs() < 1e-9);
    assert!((scores.mae - 0.5).abs() < 1e-9);

    let missing = score_predictions(&input, "pm10", "forecast");
    assert!(missing.is_err());
}
