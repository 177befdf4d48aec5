//! Error types for metric computation

use thiserror::Error;

/// Result type alias for metric computation
pub type Result<T> = std::result::Result<T, MetricsError>;

/// Errors raised by metric computation
///
/// Short history, zero denominators, and constant series are not errors;
/// those metrics come back as `None` in the report. Only total absence
/// of input data is fatal.
#[derive(Error, Debug)]
pub enum MetricsError {
    /// The series holds no observations at all
    #[error("cannot compute metrics for an empty series")]
    EmptySeries,
}
