//! Rows of the secondary per-year archives.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One `(region, date)` row of a secondary archive.
///
/// Serializes to the archive file layout `region,date,pm10,pm25`, with the
/// date written as `YYYY-MM-DD`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchiveRecord {
    pub region: String,
    pub date: NaiveDate,
    pub pm10: Option<i64>,
    pub pm25: Option<i64>,
}

impl ArchiveRecord {
    pub fn new(
        region: impl Into<String>,
        date: NaiveDate,
        pm10: Option<i64>,
        pm25: Option<i64>,
    ) -> Self {
        Self {
            region: region.into(),
            date,
            pm10,
            pm25,
        }
    }
}
