//! Daily pollutant records and single-region tables.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One day of measurements for one region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyRecord {
    pub region: String,
    pub date: NaiveDate,
    pub pm10: Option<i64>,
    pub pm25: Option<i64>,
}

impl DailyRecord {
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

    /// A row for `date` with both pollutants unset.
    pub fn placeholder(region: impl Into<String>, date: NaiveDate) -> Self {
        Self::new(region, date, None, None)
    }
}

/// The daily series of a single region, in row order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyTable {
    region: String,
    records: Vec<DailyRecord>,
}

impl DailyTable {
    pub fn new(region: impl Into<String>) -> Self {
        Self {
            region: region.into(),
            records: Vec::new(),
        }
    }

    pub fn from_records(region: impl Into<String>, records: Vec<DailyRecord>) -> Self {
        Self {
            region: region.into(),
            records,
        }
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    pub fn records(&self) -> &[DailyRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn push(&mut self, record: DailyRecord) {
        self.records.push(record);
    }

    /// Earliest and latest date, or `None` for an empty table.
    pub fn date_span(&self) -> Option<(NaiveDate, NaiveDate)> {
        let first = self.records.iter().map(|r| r.date).min()?;
        let last = self.records.iter().map(|r| r.date).max()?;
        Some((first, last))
    }

    /// Rows dated `date`, in row order.
    pub fn rows_on(&self, date: NaiveDate) -> impl Iterator<Item = &DailyRecord> {
        self.records.iter().filter(move |r| r.date == date)
    }

    /// Applies `update` to every row dated `date` and returns how many rows matched.
    pub fn update_on<F>(&mut self, date: NaiveDate, mut update: F) -> usize
    where
        F: FnMut(&mut DailyRecord),
    {
        let mut touched = 0;
        for record in self.records.iter_mut().filter(|r| r.date == date) {
            update(record);
            touched += 1;
        }
        touched
    }

    /// Distinct dates in first-encounter order.
    pub fn distinct_dates(&self) -> Vec<NaiveDate> {
        let mut seen = BTreeSet::new();
        self.records
            .iter()
            .filter(|r| seen.insert(r.date))
            .map(|r| r.date)
            .collect()
    }

    /// Dates carried by more than one row, ascending.
    pub fn duplicate_dates(&self) -> Vec<NaiveDate> {
        let mut seen = BTreeSet::new();
        let mut duplicates = BTreeSet::new();
        for record in &self.records {
            if !seen.insert(record.date) {
                duplicates.insert(record.date);
            }
        }
        duplicates.into_iter().collect()
    }

    /// Stable ascending sort by date.
    pub fn sort_by_date(&mut self) {
        self.records.sort_by_key(|r| r.date);
    }

    /// Returns a copy sorted ascending by date.
    #[must_use]
    pub fn sorted_by_date(&self) -> Self {
        let mut sorted = self.clone();
        sorted.sort_by_date();
        sorted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2020, 3, d).unwrap()
    }

    fn table() -> DailyTable {
        DailyTable::from_records(
            "중구",
            vec![
                DailyRecord::new("중구", day(3), Some(30), Some(12)),
                DailyRecord::new("중구", day(1), None, Some(10)),
                DailyRecord::new("중구", day(3), None, None),
            ],
        )
    }

    #[test]
    fn span_and_distinct_dates() {
        let table = table();
        assert_eq!(table.date_span(), Some((day(1), day(3))));
        assert_eq!(table.distinct_dates(), vec![day(3), day(1)]);
        assert_eq!(table.duplicate_dates(), vec![day(3)]);
        assert_eq!(DailyTable::new("중구").date_span(), None);
    }

    #[test]
    fn update_touches_every_row_of_a_date() {
        let mut table = table();
        let touched = table.update_on(day(3), |r| r.pm10 = Some(42));
        assert_eq!(touched, 2);
        assert!(table.rows_on(day(3)).all(|r| r.pm10 == Some(42)));
        assert_eq!(table.update_on(day(2), |r| r.pm10 = Some(1)), 0);
    }

    #[test]
    fn sort_is_stable() {
        let sorted = table().sorted_by_date();
        let dates: Vec<_> = sorted.records().iter().map(|r| r.date).collect();
        assert_eq!(dates, vec![day(1), day(3), day(3)]);
        assert_eq!(sorted.records()[1].pm10, Some(30));
        assert_eq!(sorted.records()[2].pm10, None);
    }
}
