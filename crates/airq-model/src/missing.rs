//! Missing-data categories and the per-run classification report.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Why a calendar day needs attention in a primary series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingKind {
    /// The day has no row at all.
    NoDate,
    /// The day has rows, but neither pollutant has a value.
    BothMissing,
    /// The day has PM2.5 but no PM10.
    Pm10Missing,
    /// The day has PM10 but no PM2.5.
    Pm25Missing,
}

impl MissingKind {
    /// All categories in reconciliation order.
    pub const ALL: [MissingKind; 4] = [
        MissingKind::NoDate,
        MissingKind::BothMissing,
        MissingKind::Pm10Missing,
        MissingKind::Pm25Missing,
    ];

    /// Short human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            MissingKind::NoDate => "no date",
            MissingKind::BothMissing => "both missing",
            MissingKind::Pm10Missing => "PM10 missing",
            MissingKind::Pm25Missing => "PM2.5 missing",
        }
    }

    /// Whether a fill for this category writes PM10.
    pub fn fills_pm10(self) -> bool {
        matches!(self, MissingKind::BothMissing | MissingKind::Pm10Missing)
    }

    /// Whether a fill for this category writes PM2.5.
    pub fn fills_pm25(self) -> bool {
        matches!(self, MissingKind::BothMissing | MissingKind::Pm25Missing)
    }
}

impl fmt::Display for MissingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Dates of one region grouped by [`MissingKind`].
///
/// Dates are `YYYY-MM-DD` strings. `no_date` is sorted ascending; the other
/// lists keep the order in which the classifier met each date.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MissingReport {
    pub no_date: Vec<String>,
    pub both_missing: Vec<String>,
    pub pm10_missing: Vec<String>,
    pub pm25_missing: Vec<String>,
}

impl MissingReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Dates recorded for a category.
    pub fn dates(&self, kind: MissingKind) -> &[String] {
        match kind {
            MissingKind::NoDate => &self.no_date,
            MissingKind::BothMissing => &self.both_missing,
            MissingKind::Pm10Missing => &self.pm10_missing,
            MissingKind::Pm25Missing => &self.pm25_missing,
        }
    }

    /// Mutable access to the dates of a category.
    pub fn dates_mut(&mut self, kind: MissingKind) -> &mut Vec<String> {
        match kind {
            MissingKind::NoDate => &mut self.no_date,
            MissingKind::BothMissing => &mut self.both_missing,
            MissingKind::Pm10Missing => &mut self.pm10_missing,
            MissingKind::Pm25Missing => &mut self.pm25_missing,
        }
    }

    pub fn push(&mut self, kind: MissingKind, date: impl Into<String>) {
        self.dates_mut(kind).push(date.into());
    }

    /// Removes the first occurrence of `date` from a category.
    ///
    /// Returns `false` when the date was not listed.
    pub fn remove(&mut self, kind: MissingKind, date: &str) -> bool {
        let dates = self.dates_mut(kind);
        match dates.iter().position(|entry| entry == date) {
            Some(idx) => {
                dates.remove(idx);
                true
            }
            None => false,
        }
    }

    pub fn count(&self, kind: MissingKind) -> usize {
        self.dates(kind).len()
    }

    /// Number of entries over all categories.
    pub fn total(&self) -> usize {
        MissingKind::ALL.iter().map(|kind| self.count(*kind)).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_and_remove() {
        let mut report = MissingReport::new();
        report.push(MissingKind::Pm10Missing, "2020-03-05");
        report.push(MissingKind::Pm10Missing, "2020-03-06");
        assert_eq!(report.count(MissingKind::Pm10Missing), 2);
        assert!(report.remove(MissingKind::Pm10Missing, "2020-03-05"));
        assert!(!report.remove(MissingKind::Pm10Missing, "2020-03-05"));
        assert_eq!(report.dates(MissingKind::Pm10Missing), ["2020-03-06"]);
        assert_eq!(report.total(), 1);
    }

    #[test]
    fn fill_targets() {
        assert!(MissingKind::BothMissing.fills_pm10() && MissingKind::BothMissing.fills_pm25());
        assert!(MissingKind::Pm10Missing.fills_pm10() && !MissingKind::Pm10Missing.fills_pm25());
        assert!(!MissingKind::Pm25Missing.fills_pm10() && MissingKind::Pm25Missing.fills_pm25());
        assert!(!MissingKind::NoDate.fills_pm10() && !MissingKind::NoDate.fills_pm25());
    }

    #[test]
    fn report_json_uses_snake_case_keys() {
        let mut report = MissingReport::new();
        report.push(MissingKind::BothMissing, "2021-01-01");
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["both_missing"][0], "2021-01-01");

        let partial: MissingReport = serde_json::from_str(r#"{"no_date":["2021-01-02"]}"#).unwrap();
        assert_eq!(partial.no_date, ["2021-01-02"]);
        assert!(partial.pm10_missing.is_empty());
    }
}
