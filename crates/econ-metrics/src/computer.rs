//! Series metrics computation

use crate::error::{MetricsError, Result};
use crate::report::MetricsReport;
use econ_core::{ObservationSeries, SeriesMetadata};

/// Number of observations in the rolling average window
const ROLLING_WINDOW: usize = 3;

/// Compute the full metrics report for a series
///
/// Fails only when the series is empty. Every other edge case (short
/// series, zero denominators, constant series) is absorbed into `None`
/// fields so callers can distinguish "no value" from a genuine zero.
pub fn compute(series: &ObservationSeries, metadata: &SeriesMetadata) -> Result<MetricsReport> {
    let current = series.last().ok_or(MetricsError::EmptySeries)?;
    let first = series.first().ok_or(MetricsError::EmptySeries)?;
    let n = series.len();

    let (period_change, period_change_pct) = change_against(series, 1);

    let lookback = metadata.frequency.yoy_lookback();
    let (yoy_change, yoy_change_pct) = change_against(series, lookback);

    let window = series.recent(ROLLING_WINDOW);
    let rolling_average = window.iter().map(|o| o.value).sum::<f64>() / window.len() as f64;

    let mean = series.values().sum::<f64>() / n as f64;
    let std_dev = sample_std_dev(series, mean);

    // First occurrence wins ties, so strict comparisons only
    let mut min = *first;
    let mut max = *first;
    for obs in series {
        if obs.value < min.value {
            min = *obs;
        }
        if obs.value > max.value {
            max = *obs;
        }
    }

    let below = series.values().filter(|&v| v < current.value).count();
    let percentile_rank = below as f64 / n as f64 * 100.0;

    let std_devs_from_mean = match std_dev {
        Some(sd) if sd != 0.0 => Some((current.value - mean) / sd),
        _ => None,
    };

    tracing::debug!(
        observations = n,
        current = current.value,
        percentile = percentile_rank,
        "computed series metrics"
    );

    Ok(MetricsReport {
        current_value: current.value,
        current_date: current.date,
        period_change,
        period_change_pct,
        yoy_change,
        yoy_change_pct,
        rolling_average,
        mean,
        std_dev,
        min: min.value,
        max: max.value,
        min_date: min.date,
        max_date: max.date,
        percentile_rank,
        std_devs_from_mean,
        observation_count: n,
        start_date: first.date,
        end_date: current.date,
    })
}

/// Change of the latest value against the one `lookback` positions back
///
/// Returns (absolute, percent). Absolute is `None` when the series has
/// no observation that far back; percent additionally requires a
/// non-zero base.
fn change_against(series: &ObservationSeries, lookback: usize) -> (Option<f64>, Option<f64>) {
    let (Some(current), Some(base)) = (series.last(), series.nth_back(lookback)) else {
        return (None, None);
    };

    let change = current.value - base.value;
    let pct = if base.value != 0.0 {
        Some(change / base.value * 100.0)
    } else {
        None
    };
    (Some(change), pct)
}

/// Sample standard deviation (N-1 denominator); `None` with fewer than
/// 2 observations
fn sample_std_dev(series: &ObservationSeries, mean: f64) -> Option<f64> {
    let n = series.len();
    if n < 2 {
        return None;
    }
    let sum_sq: f64 = series.values().map(|v| (v - mean).powi(2)).sum();
    Some((sum_sq / (n - 1) as f64).sqrt())
}
