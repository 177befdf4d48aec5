//! Descriptive and change metrics for economic time series
//!
//! Given a chronologically ordered series and its sampling frequency,
//! [`compute`] derives a fixed set of metrics: period-over-period and
//! year-over-year change, rolling average, historical summary statistics,
//! percentile rank, and distance from the mean in standard deviations.
//!
//! The computation is a pure synchronous function. Metrics whose
//! preconditions are unmet (too little history, zero denominators, a
//! constant series) come back as `None` rather than a fabricated number;
//! only a completely empty series is an error.
//!
//! # Example
//!
//! ```
//! use chrono::NaiveDate;
//! use econ_core::{Frequency, Observation, ObservationSeries, SeriesMetadata};
//! use econ_metrics::compute;
//!
//! let observations: Vec<Observation> = (1..=5)
//!     .map(|m| {
//!         Observation::new(
//!             NaiveDate::from_ymd_opt(2024, m, 1).unwrap(),
//!             f64::from(m),
//!         )
//!     })
//!     .collect();
//! let series = ObservationSeries::new(observations)?;
//! let metadata = SeriesMetadata::new(Frequency::Monthly);
//!
//! let report = compute(&series, &metadata)?;
//! assert_eq!(report.current_value, 5.0);
//! assert_eq!(report.period_change, Some(1.0));
//! // Only 5 monthly observations: a 12-period lookback is out of reach
//! assert_eq!(report.yoy_change, None);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod computer;
pub mod error;
pub mod report;

pub use computer::compute;
pub use error::{MetricsError, Result};
pub use report::MetricsReport;
