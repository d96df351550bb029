//! Secondary per-year archives.
//!
//! An archive directory holds one `{year}.csv` file per year with the layout
//! `region,date,pm10,pm25`. The reconciler looks days up by `(region, date)`
//! and must tell three outcomes apart: the year has no file at all, the year
//! exists but has no row for the key, or a row was found.

mod builder;
mod loader;

use std::collections::{BTreeMap, HashMap};

use airq_model::ArchiveRecord;
use chrono::{Datelike, NaiveDate};
use tracing::debug;

pub use builder::{ArchiveBuildOptions, build_year_archive, write_archive};
pub use loader::read_archive_file;

/// Result of an archive lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveLookup<'a> {
    /// No archive is available for the date's year.
    NoArchive,
    /// The year is available but holds no row for the region and date.
    Miss,
    /// The archive row for the region and date.
    Hit(&'a ArchiveRecord),
}

/// Rows of one archive year, keyed by region then date.
#[derive(Debug, Clone, Default)]
struct YearArchive {
    rows: HashMap<String, BTreeMap<NaiveDate, ArchiveRecord>>,
}

impl YearArchive {
    fn insert(&mut self, record: ArchiveRecord) -> bool {
        let by_date = self.rows.entry(record.region.clone()).or_default();
        if by_date.contains_key(&record.date) {
            return false;
        }
        by_date.insert(record.date, record);
        true
    }

    fn get(&self, region: &str, date: NaiveDate) -> Option<&ArchiveRecord> {
        self.rows.get(region).and_then(|by_date| by_date.get(&date))
    }

    fn len(&self) -> usize {
        self.rows.values().map(BTreeMap::len).sum()
    }
}

/// Read-only lookup over the secondary archives, one entry per year.
#[derive(Debug, Clone, Default)]
pub struct SecondaryArchive {
    years: BTreeMap<i32, YearArchive>,
}

impl SecondaryArchive {
    /// An archive with no years; every lookup yields [`ArchiveLookup::NoArchive`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds an archive from in-memory rows, grouped by the year of each date.
    pub fn from_records(records: impl IntoIterator<Item = ArchiveRecord>) -> Self {
        let mut grouped: BTreeMap<i32, Vec<ArchiveRecord>> = BTreeMap::new();
        for record in records {
            grouped.entry(record.date.year()).or_default().push(record);
        }
        let mut archive = Self::new();
        for (year, rows) in grouped {
            archive.insert_year(year, rows);
        }
        archive
    }

    /// Registers `year` with its rows. The year counts as available even when
    /// `records` is empty. For duplicate `(region, date)` keys the first row wins.
    pub fn insert_year(&mut self, year: i32, records: impl IntoIterator<Item = ArchiveRecord>) {
        let entry = self.years.entry(year).or_default();
        let mut duplicates = 0usize;
        for record in records {
            if !entry.insert(record) {
                duplicates += 1;
            }
        }
        if duplicates > 0 {
            debug!(year, duplicates, "ignored duplicate archive rows");
        }
    }

    pub fn has_year(&self, year: i32) -> bool {
        self.years.contains_key(&year)
    }

    /// Available years, ascending.
    pub fn years(&self) -> impl Iterator<Item = i32> + '_ {
        self.years.keys().copied()
    }

    /// Total number of rows across all years.
    pub fn len(&self) -> usize {
        self.years.values().map(YearArchive::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn lookup(&self, region: &str, date: NaiveDate) -> ArchiveLookup<'_> {
        match self.years.get(&date.year()) {
            None => ArchiveLookup::NoArchive,
            Some(year) => match year.get(region, date) {
                Some(record) => ArchiveLookup::Hit(record),
                None => ArchiveLookup::Miss,
            },
        }
    }
}
