//! Summary statistics over prepared air-quality tables.

mod error;
mod monthly;
mod regression;

pub use error::{Result, StatsError};
pub use monthly::{add_month_column, monthly_average_by_region};
pub use regression::{RegressionScores, score_columns};
