//! Air-quality data ingestion utilities.
//!
//! This crate reads district-level PM10/PM2.5 exports into Polars DataFrames
//! and prepares them for missing-data analysis.
//!
//! # Features
//!
//! - **CSV Loading**: Read exports with inferred or all-text schemas
//! - **Normalization**: Trim and rename headers, coerce dates, filter a date range
//! - **Missing Values**: Replace sentinel markers such as `-999` and `NA` with null
//! - **Typed Tables**: Convert frames to and from [`airq_model::DailyTable`]
//! - **Regional Merge**: Concatenate per-region files tagged by file name
//! - **Secondary Archives**: Load and build per-year archives for reconciliation
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use airq_ingest::{NormalizeOptions, canonicalize_missing, normalize_frame, read_csv_text};
//!
//! let raw = read_csv_text(Path::new("data/중구.csv"))?;
//! let df = normalize_frame(&raw, &NormalizeOptions::default())?;
//! let df = canonicalize_missing(&df, &["pm10", "pm25"])?;
//! ```

mod archive;
mod csv;
mod discovery;
mod error;
mod merge;
mod missing;
mod normalize;
mod table;
mod values;

// === Error Types ===
pub use error::{IngestError, Result};

// === CSV Reading and Writing ===
pub use csv::{
    normalize_header, read_csv_text, rename_columns, save_region_csv,
    strip_column_names, validate_encoding, write_csv,
};

// === File Discovery ===
pub use discovery::{list_csv_files, region_from_path, year_from_path};

// === Normalization ===
pub use missing::canonicalize_missing;
pub use normalize::{
    NormalizeOptions, filter_date_range, normalize_date_column, normalize_frame,
    select_columns, sort_by_columns, sort_by_date,
};

// === Typed Tables ===
pub use table::{frame_to_table, table_to_frame};

// === Regional Merge ===
pub use merge::{MergeOptions, merge_region_files};

// === Secondary Archives ===
pub use archive::{
    ArchiveBuildOptions, ArchiveLookup, SecondaryArchive, build_year_archive, read_archive_file,
    write_archive,
};

// === Cell Values ===
pub use values::{
    NUMERIC_SENTINEL, TEXT_SENTINELS, any_to_f64, any_to_string, is_missing_text,
    is_missing_value, parse_pollutant, parse_pollutant_text, round_concentration,
};
