//! Error types for the analysis pipeline

use thiserror::Error;

/// Result type alias for pipeline operations
pub type Result<T> = std::result::Result<T, PipelineError>;

/// Pipeline errors
///
/// Each variant is a deliberate early exit the original system
/// expressed as prose instructions to an agent: reject non-economic
/// queries, stop when search finds nothing, stop when every retrieval
/// fails. None of them are retried at this level.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The query contains no economic vocabulary or series identifier
    #[error("query is outside the scope of economic data: {0}")]
    OutOfScope(String),

    /// Neither explicit identifiers, aliases, nor search produced a series
    #[error("no matching series found for query: {0}")]
    NoSeriesFound(String),

    /// Every requested series failed to retrieve
    #[error("no data could be retrieved for any requested series")]
    NoData,

    /// Data retrieval error
    #[error(transparent)]
    Fred(#[from] econ_fred::FredError),

    /// Metric computation error
    #[error(transparent)]
    Metrics(#[from] econ_metrics::MetricsError),
}
