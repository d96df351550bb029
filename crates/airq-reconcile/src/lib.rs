//! Missing-data classification and reconciliation.
//!
//! [`classify`] sorts every day of a region's date span into a
//! [`MissingReport`](airq_model::MissingReport). [`reconcile`] then fills the
//! reported days from a [`SecondaryArchive`](airq_ingest::SecondaryArchive),
//! returning a new table and the dates that are still pending.

mod classify;
mod error;
mod reconcile;

pub use classify::{classify, classify_frame};
pub use error::{ReconcileError, Result};
pub use reconcile::{FillSummary, Reconciled, reconcile};
