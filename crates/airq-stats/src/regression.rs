//! Regression error scores for PM10 predictions.

use airq_ingest::canonicalize_missing;
use polars::prelude::{DataFrame, DataType, IntoLazy, col};
use tracing::debug;

use crate::error::{Result, StatsError};

/// Standard regression scores comparing predictions with observed values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegressionScores {
    pub mse: f64,
    pub rmse: f64,
    pub mae: f64,
    /// Coefficient of determination; `NaN` when the observed values are constant.
    pub r2: f64,
}

impl RegressionScores {
    /// Scores `predicted` against `truth`.
    ///
    /// # Errors
    ///
    /// - [`StatsError::LengthMismatch`] when the slices differ in length.
    /// - [`StatsError::EmptyInput`] when both are empty.
    pub fn evaluate(truth: &[f64], predicted: &[f64]) -> Result<Self> {
        if truth.len() != predicted.len() {
            return Err(StatsError::LengthMismatch {
                truth: truth.len(),
                predicted: predicted.len(),
            });
        }
        if truth.is_empty() {
            return Err(StatsError::EmptyInput);
        }

        let n = truth.len() as f64;
        let mut squared = 0.0;
        let mut absolute = 0.0;
        for (observed, estimate) in truth.iter().zip(predicted) {
            let residual = observed - estimate;
            squared += residual * residual;
            absolute += residual.abs();
        }

        let mean = truth.iter().sum::<f64>() / n;
        let total: f64 = truth.iter().map(|v| (v - mean) * (v - mean)).sum();
        let r2 = if total == 0.0 {
            f64::NAN
        } else {
            1.0 - squared / total
        };

        let mse = squared / n;
        Ok(Self {
            mse,
            rmse: mse.sqrt(),
            mae: absolute / n,
            r2,
        })
    }
}

/// Scores the `predicted` column of a table against its `observed` column.
///
/// Cells are read as numbers after the sentinel check; rows where either side
/// is missing or not numeric are left out.
///
/// # Errors
///
/// - [`StatsError::ColumnNotFound`] when a column is absent.
/// - [`StatsError::EmptyInput`] when no row has both values.
pub fn score_columns(df: &DataFrame, observed: &str, predicted: &str) -> Result<RegressionScores> {
    for name in [observed, predicted] {
        if df.column(name).is_err() {
            return Err(StatsError::ColumnNotFound {
                column: name.to_string(),
            });
        }
    }

    let cleaned = canonicalize_missing(df, &[observed, predicted])?;
    let pairs = cleaned
        .lazy()
        .select([
            col(observed).cast(DataType::Float64),
            col(predicted).cast(DataType::Float64),
        ])
        .filter(col(observed).is_not_null().and(col(predicted).is_not_null()))
        .collect()?;

    let truth: Vec<f64> = pairs.column(observed)?.f64()?.into_no_null_iter().collect();
    let estimates: Vec<f64> = pairs.column(predicted)?.f64()?.into_no_null_iter().collect();
    debug!(
        rows = df.height(),
        scored = truth.len(),
        observed,
        predicted,
        "scoring predictions"
    );
    RegressionScores::evaluate(&truth, &estimates)
}
