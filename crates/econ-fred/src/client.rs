//! FRED API client
//!
//! Wraps the three endpoints the pipeline needs: full-text series
//! search, series metadata, and observation history. Requests are rate
//! limited to FRED's documented 120 requests per minute.

use crate::config::EconConfig;
use crate::error::{FredError, Result};
use econ_core::{Frequency, Observation, ObservationSeries, SeriesMetadata};
use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::num::NonZeroU32;
use std::sync::Arc;

type SharedRateLimiter = Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>;

const FRED_BASE_URL: &str = "https://api.stlouisfed.org/fred";

/// FRED marks a missing observation with a bare dot
const MISSING_VALUE: &str = ".";

/// Common FRED series IDs for economic indicators
pub mod series {
    /// Unemployment Rate
    pub const UNEMPLOYMENT_RATE: &str = "UNRATE";
    /// Total Nonfarm Payrolls
    pub const NONFARM_PAYROLLS: &str = "PAYEMS";
    /// Consumer Price Index (All Urban)
    pub const CPI: &str = "CPIAUCSL";
    /// Core CPI (Less Food and Energy)
    pub const CORE_CPI: &str = "CPILFESL";
    /// Personal Consumption Expenditures
    pub const PCE: &str = "PCEPI";
    /// Core PCE (Fed's preferred inflation measure)
    pub const CORE_PCE: &str = "PCEPILFE";
    /// Real GDP
    pub const GDP: &str = "GDPC1";
    /// GDP Growth Rate (Quarterly)
    pub const GDP_GROWTH: &str = "A191RL1Q225SBEA";
    /// Federal Funds Effective Rate
    pub const FED_FUNDS_RATE: &str = "FEDFUNDS";
    /// 10-Year Treasury Constant Maturity Rate
    pub const TREASURY_10Y: &str = "DGS10";
    /// 2-Year Treasury Constant Maturity Rate
    pub const TREASURY_2Y: &str = "DGS2";
    /// M2 Money Supply
    pub const M2: &str = "M2SL";
    /// Retail Sales
    pub const RETAIL_SALES: &str = "RSAFS";
    /// Consumer Sentiment (U of Michigan)
    pub const CONSUMER_SENTIMENT: &str = "UMCSENT";
    /// Industrial Production Index
    pub const INDUSTRIAL_PRODUCTION: &str = "INDPRO";
    /// Housing Starts
    pub const HOUSING_STARTS: &str = "HOUST";
    /// S&P 500 Index
    pub const SP500: &str = "SP500";
    /// VIX Volatility Index
    pub const VIX: &str = "VIXCLS";
    /// Crude Oil Price (WTI)
    pub const OIL_WTI: &str = "DCOILWTICO";
}

/// Raw observation as returned by FRED
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawObservation {
    /// Date of observation (YYYY-MM-DD)
    pub date: String,
    /// Value; "." marks a missing observation
    pub value: String,
}

/// FRED series information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeriesInfo {
    pub id: String,
    pub title: String,
    pub observation_start: String,
    pub observation_end: String,
    pub frequency: String,
    pub frequency_short: String,
    pub units: String,
    pub units_short: String,
    pub seasonal_adjustment: String,
    pub seasonal_adjustment_short: String,
    pub last_updated: String,
    #[serde(default)]
    pub notes: Option<String>,
}

impl SeriesInfo {
    /// Build series metadata for the metrics computation
    pub fn metadata(&self) -> SeriesMetadata {
        SeriesMetadata {
            frequency: Frequency::from_short_code(&self.frequency_short),
            title: self.title.clone(),
            units: self.units.clone(),
            seasonal_adjustment: self.seasonal_adjustment.clone(),
        }
    }
}

/// A fully retrieved series: provider metadata plus parsed observations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeriesData {
    pub info: SeriesInfo,
    pub metadata: SeriesMetadata,
    pub series: ObservationSeries,
}

/// FRED series response
#[derive(Debug, Clone, Deserialize)]
struct SeriesResponse {
    seriess: Vec<SeriesInfo>,
}

/// FRED observations response
#[derive(Debug, Clone, Deserialize)]
struct ObservationsResponse {
    observations: Vec<RawObservation>,
}

/// FRED API client
pub struct FredClient {
    client: Client,
    api_key: String,
    rate_limiter: SharedRateLimiter,
}

impl FredClient {
    /// Create a new FRED client
    ///
    /// # Arguments
    /// * `api_key` - FRED API key
    /// * `rate_limit` - Requests per minute (default 120)
    pub fn new(api_key: impl Into<String>, rate_limit: Option<u32>) -> Self {
        let quota = Quota::per_minute(
            NonZeroU32::new(rate_limit.unwrap_or(120)).unwrap_or(NonZeroU32::new(120).unwrap()),
        );
        let rate_limiter = Arc::new(RateLimiter::direct(quota));

        Self {
            client: Client::new(),
            api_key: api_key.into(),
            rate_limiter,
        }
    }

    /// Create a client from a validated configuration
    pub fn from_config(config: &EconConfig) -> Result<Self> {
        config.validate()?;

        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(FredError::Http)?;

        let quota = Quota::per_minute(
            NonZeroU32::new(config.rate_limit).unwrap_or(NonZeroU32::new(120).unwrap()),
        );

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            rate_limiter: Arc::new(RateLimiter::direct(quota)),
        })
    }

    /// Search the FRED database for series matching a query
    ///
    /// Results come back ordered by search rank.
    pub async fn search(&self, query: &str, limit: u32) -> Result<Vec<SeriesInfo>> {
        self.rate_limiter.until_ready().await;

        let limit = limit.to_string();
        let mut params = HashMap::new();
        params.insert("search_text", query);
        params.insert("api_key", &self.api_key);
        params.insert("file_type", "json");
        params.insert("order_by", "search_rank");
        params.insert("limit", &limit);

        let url = format!("{FRED_BASE_URL}/series/search");
        let response = self.client.get(&url).query(&params).send().await?;

        if !response.status().is_success() {
            return Err(FredError::Api(format!(
                "search failed with status {}",
                response.status()
            )));
        }

        let data: SeriesResponse = response.json().await?;
        tracing::debug!(query, results = data.seriess.len(), "FRED search");
        Ok(data.seriess)
    }

    /// Get series information
    pub async fn series_info(&self, series_id: &str) -> Result<SeriesInfo> {
        self.rate_limiter.until_ready().await;

        let mut params = HashMap::new();
        params.insert("series_id", series_id);
        params.insert("api_key", &self.api_key);
        params.insert("file_type", "json");

        let url = format!("{FRED_BASE_URL}/series");
        let response = self.client.get(&url).query(&params).send().await?;

        if !response.status().is_success() {
            return Err(FredError::Api(format!(
                "series request failed with status {}",
                response.status()
            )));
        }

        let data: SeriesResponse = response.json().await?;

        data.seriess
            .into_iter()
            .next()
            .ok_or_else(|| FredError::SeriesNotFound(series_id.to_string()))
    }

    /// Get raw observations for a series, ascending by date
    pub async fn observations(
        &self,
        series_id: &str,
        start_date: Option<&str>,
        end_date: Option<&str>,
    ) -> Result<Vec<RawObservation>> {
        self.rate_limiter.until_ready().await;

        let mut params: HashMap<&str, String> = HashMap::new();
        params.insert("series_id", series_id.to_string());
        params.insert("api_key", self.api_key.clone());
        params.insert("file_type", "json".to_string());
        params.insert("sort_order", "asc".to_string());

        if let Some(start) = start_date {
            params.insert("observation_start", start.to_string());
        }
        if let Some(end) = end_date {
            params.insert("observation_end", end.to_string());
        }

        let url = format!("{FRED_BASE_URL}/series/observations");
        let response = self.client.get(&url).query(&params).send().await?;

        if !response.status().is_success() {
            return Err(FredError::Api(format!(
                "observations request failed with status {}",
                response.status()
            )));
        }

        let data: ObservationsResponse = response.json().await?;
        Ok(data.observations)
    }

    /// Retrieve a complete series: metadata plus parsed observations
    ///
    /// Missing observations are dropped so downstream metrics only ever
    /// see present values.
    pub async fn fetch_series(
        &self,
        series_id: &str,
        start_date: Option<&str>,
        end_date: Option<&str>,
    ) -> Result<SeriesData> {
        let info = self.series_info(series_id).await?;
        let raw = self.observations(series_id, start_date, end_date).await?;

        let series = parse_observations(&raw)?;
        if series.is_empty() {
            return Err(FredError::NoData {
                series_id: series_id.to_string(),
                reason: "no present observations in range".to_string(),
            });
        }

        tracing::info!(
            series_id,
            title = %info.title,
            observations = series.len(),
            "fetched series"
        );

        let metadata = info.metadata();
        Ok(SeriesData {
            info,
            metadata,
            series,
        })
    }
}

/// Parse raw FRED observations into a dense series
///
/// Missing values (".") are dropped; a malformed date or number is a
/// parse error rather than a silent skip.
pub fn parse_observations(raw: &[RawObservation]) -> Result<ObservationSeries> {
    let mut observations = Vec::with_capacity(raw.len());

    for obs in raw {
        if obs.value == MISSING_VALUE {
            continue;
        }

        let date = obs
            .date
            .parse::<chrono::NaiveDate>()
            .map_err(|e| FredError::Parse(format!("bad date {:?}: {e}", obs.date)))?;
        let value = obs
            .value
            .parse::<f64>()
            .map_err(|_| FredError::Parse(format!("bad value {:?} at {date}", obs.value)))?;
        // f64::from_str accepts "NaN" and "inf"; neither is a usable observation
        if !value.is_finite() {
            return Err(FredError::Parse(format!(
                "non-finite value {:?} at {date}",
                obs.value
            )));
        }

        observations.push(Observation::new(date, value));
    }

    Ok(ObservationSeries::new(observations)?)
}
