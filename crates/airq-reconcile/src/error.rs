//! Error types for classification and reconciliation.

use airq_ingest::IngestError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReconcileError {
    /// The classifier received a table with no rows.
    #[error("cannot classify an empty table for region '{region}'")]
    EmptyInput { region: String },

    /// The primary table holds more than one row for a day.
    #[error("duplicate rows for region '{region}' on {date}")]
    DuplicateDate { region: String, date: String },

    #[error(transparent)]
    Ingest(#[from] IngestError),
}

impl From<polars::prelude::PolarsError> for ReconcileError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        Self::Ingest(err.into())
    }
}

/// Result type for reconciliation operations.
pub type Result<T> = std::result::Result<T, ReconcileError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ReconcileError::DuplicateDate {
            region: "중구".to_string(),
            date: "2020-03-05".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "duplicate rows for region '중구' on 2020-03-05"
        );
    }

    #[test]
    fn test_ingest_error_is_transparent() {
        let err: ReconcileError = IngestError::ColumnNotFound {
            column: "pm10".to_string(),
        }
        .into();
        assert_eq!(err.to_string(), "column 'pm10' not found in DataFrame");
    }
}
