//! Error types for econ-core

use chrono::NaiveDate;
use thiserror::Error;

/// Result type alias for econ-core
pub type Result<T> = std::result::Result<T, SeriesError>;

/// Errors describing malformed observation series
#[derive(Error, Debug)]
pub enum SeriesError {
    /// Observations are not in ascending date order
    #[error("observations out of order at {date}")]
    OutOfOrder { date: NaiveDate },

    /// Two observations share the same date
    #[error("duplicate observation date {date}")]
    DuplicateDate { date: NaiveDate },
}
