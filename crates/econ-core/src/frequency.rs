//! Sampling frequency codes for economic time series

use serde::{Deserialize, Serialize};

/// Sampling frequency of a series, as reported by the data provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Frequency {
    Daily,
    Weekly,
    Monthly,
    Quarterly,
    Annual,
    /// Frequency not reported or not recognized
    Unknown,
}

impl Default for Frequency {
    fn default() -> Self {
        Self::Unknown
    }
}

impl Frequency {
    /// Parse a FRED `frequency_short` code ("M", "Q", ...)
    ///
    /// Unrecognized codes map to `Unknown` rather than failing; FRED
    /// also reports compounded codes like "5Y" for niche series.
    pub fn from_short_code(code: &str) -> Self {
        match code.trim() {
            "D" => Self::Daily,
            "W" => Self::Weekly,
            "M" => Self::Monthly,
            "Q" => Self::Quarterly,
            "A" => Self::Annual,
            _ => Self::Unknown,
        }
    }

    /// Number of observations back for a year-over-year comparison.
    ///
    /// Only Monthly and Quarterly series get a true one-year lookback;
    /// every other frequency falls back to a single period. Daily and
    /// Weekly series therefore report a one-period change under the
    /// year-over-year label. Callers that need true annual distances
    /// for those frequencies must resample upstream.
    pub fn yoy_lookback(self) -> usize {
        match self {
            Self::Monthly => 12,
            Self::Quarterly => 4,
            _ => 1,
        }
    }

    /// Human-readable name
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Daily => "Daily",
            Self::Weekly => "Weekly",
            Self::Monthly => "Monthly",
            Self::Quarterly => "Quarterly",
            Self::Annual => "Annual",
            Self::Unknown => "Unknown",
        }
    }
}

impl std::fmt::Display for Frequency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_code_parsing() {
        assert_eq!(Frequency::from_short_code("M"), Frequency::Monthly);
        assert_eq!(Frequency::from_short_code("Q"), Frequency::Quarterly);
        assert_eq!(Frequency::from_short_code("D"), Frequency::Daily);
        assert_eq!(Frequency::from_short_code("W"), Frequency::Weekly);
        assert_eq!(Frequency::from_short_code("A"), Frequency::Annual);
        assert_eq!(Frequency::from_short_code("5Y"), Frequency::Unknown);
        assert_eq!(Frequency::from_short_code(""), Frequency::Unknown);
    }

    #[test]
    fn test_yoy_lookback() {
        assert_eq!(Frequency::Monthly.yoy_lookback(), 12);
        assert_eq!(Frequency::Quarterly.yoy_lookback(), 4);
        // Everything else is a single period back
        assert_eq!(Frequency::Daily.yoy_lookback(), 1);
        assert_eq!(Frequency::Weekly.yoy_lookback(), 1);
        assert_eq!(Frequency::Annual.yoy_lookback(), 1);
        assert_eq!(Frequency::Unknown.yoy_lookback(), 1);
    }
}
