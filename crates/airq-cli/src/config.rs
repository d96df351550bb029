//! TOML configuration for the `airq` tool.
//!
//! Every section is optional. Values from the command line override the file.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use airq_ingest::{ArchiveBuildOptions, MergeOptions, NormalizeOptions};
use airq_model::ColumnNames;
use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::Deserialize;
use tracing::debug;

/// File read when `--config` is not given, if it exists.
pub const DEFAULT_CONFIG_FILE: &str = "airq.toml";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// Canonical column names.
    pub columns: ColumnNames,
    /// Source header -> canonical name, applied to primary tables.
    pub rename: BTreeMap<String, String>,
    pub prepare: PrepareSection,
    pub range: RangeSection,
    pub archive: ArchiveSection,
    pub output: OutputSection,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PrepareSection {
    /// Columns kept after renaming; all columns when absent.
    pub keep: Option<Vec<String>>,
}

/// Inclusive date bounds for primary tables.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RangeSection {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ArchiveSection {
    /// Directory holding `{year}.csv` archive files.
    pub dir: PathBuf,
    /// Region prefix selecting rows when building archives.
    pub region_prefix: String,
    /// Source header -> canonical name for monthly exports.
    pub rename: BTreeMap<String, String>,
}

impl Default for ArchiveSection {
    fn default() -> Self {
        let build = ArchiveBuildOptions::default();
        Self {
            dir: PathBuf::from("data/sub"),
            region_prefix: build.region_prefix,
            rename: build.rename,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputSection {
    pub dir: PathBuf,
    /// File-name prefix for per-region outputs.
    pub prefix: String,
}

impl Default for OutputSection {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("processed"),
            prefix: String::new(),
        }
    }
}

impl AppConfig {
    /// Parses configuration from TOML text.
    pub fn from_toml(contents: &str) -> Result<Self> {
        toml::from_str(contents).context("parse configuration")
    }

    /// Loads configuration.
    ///
    /// An explicit path must exist and parse. Without one, [`DEFAULT_CONFIG_FILE`]
    /// in the working directory is used when present, otherwise defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => {
                let default = PathBuf::from(DEFAULT_CONFIG_FILE);
                if !default.is_file() {
                    debug!("no configuration file; using defaults");
                    return Ok(Self::default());
                }
                default
            }
        };

        let contents = std::fs::read_to_string(&path)
            .with_context(|| format!("read configuration {}", path.display()))?;
        let config =
            Self::from_toml(&contents).with_context(|| format!("in {}", path.display()))?;
        debug!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    pub fn normalize_options(&self) -> NormalizeOptions {
        let options = NormalizeOptions::new(self.columns.date.clone())
            .with_rename(self.rename.clone())
            .with_range(self.range.start, self.range.end);
        match &self.prepare.keep {
            Some(keep) => options.with_keep_columns(keep.clone()),
            None => options,
        }
    }

    pub fn archive_build_options(&self) -> ArchiveBuildOptions {
        ArchiveBuildOptions {
            rename: self.archive.rename.clone(),
            region_prefix: self.archive.region_prefix.clone(),
            columns: self.columns.clone(),
        }
    }

    pub fn merge_options(&self) -> MergeOptions {
        MergeOptions {
            region_column: self.columns.region.clone(),
            date_column: self.columns.date.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_file() {
        let config = AppConfig::from_toml(
            r#"
[columns]
region = "측정소명"

[rename]
"측정일시" = "date"

[prepare]
keep = ["date", "pm10", "pm25"]

[range]
start = "2018-01-01"
end = "2024-12-31"

[archive]
dir = "data/sub"
region_prefix = "부산 "

[output]
dir = "out"
prefix = "clean_"
"#,
        )
        .unwrap();

        assert_eq!(config.columns.region, "측정소명");
        assert_eq!(config.columns.date, "date");
        assert_eq!(config.rename.get("측정일시").map(String::as_str), Some("date"));
        assert_eq!(config.range.start, NaiveDate::from_ymd_opt(2018, 1, 1));
        assert_eq!(config.archive.region_prefix, "부산 ");
        assert_eq!(config.archive.rename.get("PM10").map(String::as_str), Some("pm10"));
        assert_eq!(config.output.prefix, "clean_");

        let options = config.normalize_options();
        assert_eq!(options.keep_columns.as_ref().map(Vec::len), Some(3));
        assert_eq!(config.merge_options().region_column, "측정소명");
    }

    #[test]
    fn test_empty_file_uses_defaults() {
        let config = AppConfig::from_toml("").unwrap();
        assert_eq!(config.output.dir, PathBuf::from("processed"));
        assert_eq!(config.archive.region_prefix, "서울 ");
        assert!(config.range.start.is_none());
    }

    #[test]
    fn test_unknown_key_rejected() {
        assert!(AppConfig::from_toml("[output]\nfolder = \"x\"\n").is_err());
    }

    #[test]
    fn test_explicit_missing_file() {
        let result = AppConfig::load(Some(Path::new("/nonexistent/airq.toml")));
        assert!(result.is_err());
    }
}
