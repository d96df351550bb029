//! Error types for statistics.

use airq_ingest::IngestError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StatsError {
    #[error("column '{column}' not found in DataFrame")]
    ColumnNotFound { column: String },

    /// Truth and prediction series differ in length.
    #[error("length mismatch: {truth} observed values, {predicted} predictions")]
    LengthMismatch { truth: usize, predicted: usize },

    #[error("cannot score empty series")]
    EmptyInput,

    #[error("DataFrame operation failed: {message}")]
    DataFrame { message: String },

    #[error(transparent)]
    Ingest(#[from] IngestError),
}

impl From<polars::prelude::PolarsError> for StatsError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        Self::DataFrame {
            message: err.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, StatsError>;
