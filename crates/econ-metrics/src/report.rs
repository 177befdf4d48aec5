//! Metrics report value object

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Derived metrics for one series, produced fresh per computation
///
/// Every `Option` field is an explicit "not computable" marker: its
/// preconditions were unmet (insufficient history, a zero denominator,
/// or a constant series). `None` is distinct from zero so a formatter
/// never prints a misleading number. All values carry full precision;
/// rounding and sign prefixes are presentation concerns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsReport {
    /// Value of the most recent observation
    pub current_value: f64,
    /// Date of the most recent observation
    pub current_date: NaiveDate,

    /// Change versus the previous observation; `None` with fewer than 2
    pub period_change: Option<f64>,
    /// Percent change versus the previous observation; `None` when the
    /// previous value is 0
    pub period_change_pct: Option<f64>,

    /// Change versus the observation one frequency-dependent lookback
    /// back; `None` when the series is too short
    pub yoy_change: Option<f64>,
    /// Percent form of `yoy_change`; `None` when the base value is 0
    pub yoy_change_pct: Option<f64>,

    /// Mean of the last min(3, len) observations
    pub rolling_average: f64,

    /// Mean over the entire series
    pub mean: f64,
    /// Sample standard deviation (N-1 denominator); `None` with fewer
    /// than 2 observations
    pub std_dev: Option<f64>,
    /// Smallest value in the series
    pub min: f64,
    /// Largest value in the series
    pub max: f64,
    /// Date of the first occurrence of `min`
    pub min_date: NaiveDate,
    /// Date of the first occurrence of `max`
    pub max_date: NaiveDate,

    /// Share of values strictly below the current value, scaled to 0-100
    pub percentile_rank: f64,
    /// Distance of the current value from the mean in standard
    /// deviations; `None` when the deviation is 0 or unavailable
    pub std_devs_from_mean: Option<f64>,

    /// Number of observations in the series
    pub observation_count: usize,
    /// Date of the oldest observation
    pub start_date: NaiveDate,
    /// Date of the newest observation
    pub end_date: NaiveDate,
}
