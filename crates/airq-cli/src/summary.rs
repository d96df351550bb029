use std::path::Path;

use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use polars::prelude::{AnyValue, DataFrame};

use airq_cli::pipeline::{BuiltArchive, RegionReconciliation};
use airq_ingest::any_to_f64;
use airq_model::{MissingKind, MissingReport};
use airq_stats::RegressionScores;

pub fn print_report(region: &str, report: &MissingReport) {
    println!("Region: {region}");
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Category"),
        header_cell("Days"),
        header_cell("First"),
        header_cell("Last"),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    for kind in MissingKind::ALL {
        let dates = report.dates(kind);
        table.add_row(vec![
            Cell::new(kind.label()),
            count_cell(dates.len(), Color::Yellow),
            date_cell(dates.iter().min()),
            date_cell(dates.iter().max()),
        ]);
    }
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(report.total()).add_attribute(Attribute::Bold),
        dim_cell("-"),
        dim_cell("-"),
    ]);
    println!("{table}");
}

pub fn print_reconciliation(region: &str, result: &RegionReconciliation) {
    println!("Region: {region}");
    println!("Output: {}", result.output.display());
    let reconciled = &result.reconciled;
    let summary = &reconciled.summary;

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Category"),
        header_cell("Reported"),
        header_cell("Filled"),
        header_cell("Pending"),
    ]);
    apply_summary_table_style(&mut table);
    for index in 1..4 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    for kind in MissingKind::ALL {
        let filled = match kind {
            MissingKind::NoDate => summary.inserted,
            other => summary.filled(other),
        };
        table.add_row(vec![
            Cell::new(kind.label()),
            Cell::new(result.initial.count(kind)),
            count_cell(filled, Color::Green),
            count_cell(reconciled.remaining.count(kind), Color::Yellow),
        ]);
    }
    println!("{table}");
    println!(
        "Archive misses: {}  No archive for year: {}",
        summary.misses, summary.unavailable
    );
    if !reconciled.skipped.is_empty() {
        eprintln!("Skipped unreadable dates:");
        for date in &reconciled.skipped {
            eprintln!("- {date}");
        }
    }
}

pub fn print_written(label: &str, rows: usize, path: &Path) {
    println!("{label}: {rows} rows -> {}", path.display());
}

pub fn print_archive(result: &BuiltArchive) {
    print_written(
        &format!("Archive {}", result.year),
        result.records.len(),
        &result.path,
    );
}

pub fn print_frame(df: &DataFrame) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(
        df.get_column_names()
            .iter()
            .map(|name| header_cell(name.as_str()))
            .collect::<Vec<_>>(),
    );
    for index in 1..df.width() {
        align_column(&mut table, index, CellAlignment::Right);
    }
    let columns = df.get_columns();
    for row in 0..df.height() {
        let cells: Vec<Cell> = columns
            .iter()
            .map(|column| value_cell(column.get(row).unwrap_or(AnyValue::Null)))
            .collect();
        table.add_row(cells);
    }
    println!("{table}");
}

pub fn print_scores(observed: &str, predicted: &str, scores: &RegressionScores) {
    println!("Observed: {observed}  Predicted: {predicted}");
    let mut table = Table::new();
    table.set_header(vec![header_cell("Score"), header_cell("Value")]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    for (label, value) in [
        ("MSE", scores.mse),
        ("RMSE", scores.rmse),
        ("MAE", scores.mae),
        ("R²", scores.r2),
    ] {
        let cell = if value.is_nan() {
            dim_cell("-")
        } else {
            Cell::new(format!("{value:.3}"))
        };
        table.add_row(vec![Cell::new(label), cell]);
    }
    println!("{table}");
}

fn value_cell(value: AnyValue<'_>) -> Cell {
    match value {
        AnyValue::Null => dim_cell("-"),
        AnyValue::String(s) => Cell::new(s),
        AnyValue::StringOwned(s) => Cell::new(s.as_str()),
        other => match any_to_f64(other) {
            Some(number) => Cell::new(format!("{number:.1}")),
            None => dim_cell("?"),
        },
    }
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn date_cell(date: Option<&String>) -> Cell {
    match date {
        Some(date) => Cell::new(date),
        None => dim_cell("-"),
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
