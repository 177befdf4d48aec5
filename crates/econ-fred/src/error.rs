//! Error types for FRED data retrieval

use thiserror::Error;

/// Result type alias for FRED operations
pub type Result<T> = std::result::Result<T, FredError>;

/// FRED retrieval errors
#[derive(Debug, Error)]
pub enum FredError {
    /// The FRED API returned a non-success status or malformed payload
    #[error("FRED API error: {0}")]
    Api(String),

    /// No series exists for the requested identifier
    #[error("series not found: {0}")]
    SeriesNotFound(String),

    /// The series exists but has no usable observations
    #[error("no data available for series {series_id}: {reason}")]
    NoData { series_id: String, reason: String },

    /// Network or HTTP error
    #[error("network error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Malformed value in a FRED response
    #[error("parse error: {0}")]
    Parse(String),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),
}

impl From<econ_core::SeriesError> for FredError {
    fn from(err: econ_core::SeriesError) -> Self {
        FredError::Parse(err.to_string())
    }
}
