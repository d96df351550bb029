//! Canonical column names.

use serde::{Deserialize, Serialize};

/// Canonical region column name.
pub const REGION: &str = "region";
/// Canonical date column name.
pub const DATE: &str = "date";
/// Canonical PM10 column name.
pub const PM10: &str = "pm10";
/// Canonical PM2.5 column name.
pub const PM25: &str = "pm25";

/// Names of the columns a daily table is read from and written to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnNames {
    pub region: String,
    pub date: String,
    pub pm10: String,
    pub pm25: String,
}

impl Default for ColumnNames {
    fn default() -> Self {
        Self {
            region: REGION.to_string(),
            date: DATE.to_string(),
            pm10: PM10.to_string(),
            pm25: PM25.to_string(),
        }
    }
}

impl ColumnNames {
    /// The two pollutant columns, PM10 first.
    pub fn pollutants(&self) -> [&str; 2] {
        [self.pm10.as_str(), self.pm25.as_str()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_config_keeps_defaults() {
        let names: ColumnNames = serde_json::from_str(r#"{"date":"측정일"}"#).unwrap();
        assert_eq!(names.date, "측정일");
        assert_eq!(names.pm10, PM10);
        assert_eq!(names.pollutants(), ["pm10", "pm25"]);
    }
}
