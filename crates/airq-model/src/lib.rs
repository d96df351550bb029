//! Data model for the air-quality preparation workspace.
//!
//! - **record**: daily pollutant records and single-region tables
//! - **missing**: the closed set of missing-data categories and the per-run report
//! - **archive**: rows of the secondary per-year archives
//! - **columns**: canonical column names shared by readers and writers
//! - **date**: calendar-day parsing and formatting

pub mod archive;
pub mod columns;
pub mod date;
pub mod missing;
pub mod record;

pub use archive::ArchiveRecord;
pub use columns::ColumnNames;
pub use date::{day_range, format_day, parse_day};
pub use missing::{MissingKind, MissingReport};
pub use record::{DailyRecord, DailyTable};
