//! Observation series and metadata types
//!
//! An `ObservationSeries` holds the present (non-missing) samples of one
//! economic time series in strictly ascending date order. Providers mark
//! missing samples with sentinel values; those are dropped before a
//! series is constructed, so everything downstream computes over real
//! numbers only.

use crate::error::{Result, SeriesError};
use crate::frequency::Frequency;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A single (date, value) sample of a series
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub date: NaiveDate,
    pub value: f64,
}

impl Observation {
    pub fn new(date: NaiveDate, value: f64) -> Self {
        Self { date, value }
    }
}

/// Metadata describing a series, sourced from the provider
///
/// Only `frequency` participates in metric computation (it selects the
/// year-over-year lookback). The remaining fields are carried for
/// display.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SeriesMetadata {
    /// Sampling frequency, used to pick the year-over-year lookback
    pub frequency: Frequency,
    /// Human-readable series title
    pub title: String,
    /// Units of measurement (e.g. "Percent", "Billions of Dollars")
    pub units: String,
    /// Seasonal adjustment descriptor
    pub seasonal_adjustment: String,
}

impl SeriesMetadata {
    pub fn new(frequency: Frequency) -> Self {
        Self {
            frequency,
            ..Self::default()
        }
    }
}

/// An ordered sequence of present observations
///
/// Invariant: dates are strictly increasing. Construction validates this
/// and rejects out-of-order or duplicate dates. An empty series is a
/// valid value here; emptiness is the metrics computer's fatal error,
/// not a construction failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ObservationSeries {
    observations: Vec<Observation>,
}

impl ObservationSeries {
    /// Build a series from ascending-ordered observations
    pub fn new(observations: Vec<Observation>) -> Result<Self> {
        for pair in observations.windows(2) {
            if pair[1].date < pair[0].date {
                return Err(SeriesError::OutOfOrder { date: pair[1].date });
            }
            if pair[1].date == pair[0].date {
                return Err(SeriesError::DuplicateDate { date: pair[1].date });
            }
        }
        Ok(Self { observations })
    }

    /// Build a series without order validation
    ///
    /// For callers that already hold sorted data (e.g. test fixtures
    /// generated in order).
    pub fn from_sorted(observations: Vec<Observation>) -> Self {
        debug_assert!(
            observations.windows(2).all(|p| p[0].date < p[1].date),
            "observations must be strictly ascending"
        );
        Self { observations }
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    /// Most recent observation
    pub fn last(&self) -> Option<&Observation> {
        self.observations.last()
    }

    /// Oldest observation
    pub fn first(&self) -> Option<&Observation> {
        self.observations.first()
    }

    /// Observation `n` positions before the most recent one
    pub fn nth_back(&self, n: usize) -> Option<&Observation> {
        let len = self.observations.len();
        len.checked_sub(n + 1).map(|i| &self.observations[i])
    }

    /// The last `n` observations (all of them when the series is shorter)
    pub fn recent(&self, n: usize) -> &[Observation] {
        let start = self.observations.len().saturating_sub(n);
        &self.observations[start..]
    }

    /// All values in date order
    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.observations.iter().map(|o| o.value)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Observation> {
        self.observations.iter()
    }

    pub fn as_slice(&self) -> &[Observation] {
        &self.observations
    }
}

impl<'a> IntoIterator for &'a ObservationSeries {
    type Item = &'a Observation;
    type IntoIter = std::slice::Iter<'a, Observation>;

    fn into_iter(self) -> Self::IntoIter {
        self.observations.iter()
    }
}
