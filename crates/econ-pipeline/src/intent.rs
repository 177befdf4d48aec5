//! Query intent resolution
//!
//! Replaces the natural-language understanding the original system
//! delegated to an LLM with explicit rules: a vocabulary scope check,
//! regex extraction of FRED-style series identifiers, an alias table
//! for well-known indicators, and full-text search as a last resort.

use crate::error::{PipelineError, Result};
use crate::stage::Stage;
use async_trait::async_trait;
use chrono::NaiveDate;
use econ_fred::{EconConfig, FredClient, series};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, LazyLock};

/// Uppercase tokens that look like FRED series identifiers
static SERIES_ID_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b[A-Z][A-Z0-9]{2,15}\b").expect("valid regex")
});

/// ISO dates appearing literally in the query
static ISO_DATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:19|20)\d{2}-\d{2}-\d{2}\b").expect("valid regex")
});

/// "since 2008" / "from 2008" style range starts
static FROM_YEAR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:since|from|after)\s+((?:19|20)\d{2})\b").expect("valid regex")
});

/// "until 2010" / "through 2010" style range ends
static TO_YEAR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:until|to|before|through)\s+((?:19|20)\d{2})\b").expect("valid regex")
});

/// Uppercase words that match the identifier shape but never name a series
const ID_STOPWORDS: &[&str] = &[
    "THE", "AND", "FOR", "WITH", "FROM", "FED", "USA", "YOY", "MOM", "AVG", "NOT", "ALL", "HOW",
    "WHAT", "SHOW", "DATA",
];

/// Indicator aliases, checked in order so the more specific phrase wins
const SERIES_ALIASES: &[(&str, &str)] = &[
    ("core cpi", series::CORE_CPI),
    ("core pce", series::CORE_PCE),
    ("gdp growth", series::GDP_GROWTH),
    ("fed funds", series::FED_FUNDS_RATE),
    ("federal funds", series::FED_FUNDS_RATE),
    ("interest rate", series::FED_FUNDS_RATE),
    ("10-year treasury", series::TREASURY_10Y),
    ("10 year treasury", series::TREASURY_10Y),
    ("2-year treasury", series::TREASURY_2Y),
    ("2 year treasury", series::TREASURY_2Y),
    ("treasury", series::TREASURY_10Y),
    ("unemployment", series::UNEMPLOYMENT_RATE),
    ("payroll", series::NONFARM_PAYROLLS),
    ("jobs report", series::NONFARM_PAYROLLS),
    ("inflation", series::CPI),
    ("cpi", series::CPI),
    ("pce", series::PCE),
    ("gdp", series::GDP),
    ("money supply", series::M2),
    ("retail sales", series::RETAIL_SALES),
    ("consumer sentiment", series::CONSUMER_SENTIMENT),
    ("industrial production", series::INDUSTRIAL_PRODUCTION),
    ("housing starts", series::HOUSING_STARTS),
    ("housing", series::HOUSING_STARTS),
    ("s&p 500", series::SP500),
    ("sp500", series::SP500),
    ("vix", series::VIX),
    ("volatility", series::VIX),
    ("oil price", series::OIL_WTI),
];

/// Vocabulary that marks a query as in scope for economic data
const ECONOMIC_KEYWORDS: &[&str] = &[
    "economy",
    "economic",
    "recession",
    "inflation",
    "deflation",
    "unemployment",
    "employment",
    "jobs",
    "payroll",
    "labor",
    "wage",
    "income",
    "gdp",
    "growth",
    "cpi",
    "pce",
    "price",
    "rate",
    "interest",
    "treasury",
    "yield",
    "fed",
    "monetary",
    "money",
    "m2",
    "retail",
    "consumer",
    "sentiment",
    "housing",
    "mortgage",
    "industrial",
    "production",
    "market",
    "volatility",
    "oil",
    "dollar",
    "debt",
    "deficit",
    "trade",
    "spending",
];

/// Structured intent extracted from a query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryIntent {
    /// The original query text
    pub query: String,
    /// Resolved series identifiers, in resolution order
    pub series_ids: Vec<String>,
    /// Optional start of the requested observation range
    pub start_date: Option<NaiveDate>,
    /// Optional end of the requested observation range
    pub end_date: Option<NaiveDate>,
}

/// Stage that resolves a query string into a `QueryIntent`
pub struct IntentStage {
    client: Arc<FredClient>,
    config: Arc<EconConfig>,
}

impl IntentStage {
    pub fn new(client: Arc<FredClient>, config: Arc<EconConfig>) -> Self {
        Self { client, config }
    }

    /// Resolve identifiers from the query without network access
    fn resolve_local(query: &str) -> Vec<String> {
        let mut ids = extract_series_ids(query);
        for id in resolve_aliases(query) {
            if !ids.contains(&id) {
                ids.push(id);
            }
        }
        ids
    }
}

#[async_trait]
impl Stage for IntentStage {
    type Input = String;
    type Output = QueryIntent;

    async fn run(&self, query: String) -> Result<QueryIntent> {
        let explicit_ids = Self::resolve_local(&query);

        // Scope guardrail: a query with no economic vocabulary and no
        // identifier is rejected outright, never sent to search.
        if explicit_ids.is_empty() && !is_economic(&query) {
            tracing::warn!(%query, "rejecting out-of-scope query");
            return Err(PipelineError::OutOfScope(query));
        }

        let (start_date, end_date) = extract_date_range(&query);

        let mut series_ids = explicit_ids;
        if series_ids.is_empty() {
            // Last resort: full-text search, top-ranked result only.
            // Empty results are an explicit early exit.
            let results = self
                .client
                .search(&query, self.config.search_limit)
                .await?;
            match results.into_iter().next() {
                Some(info) => series_ids.push(info.id),
                None => return Err(PipelineError::NoSeriesFound(query)),
            }
        }

        series_ids.truncate(self.config.max_series);

        tracing::info!(%query, ?series_ids, "resolved query intent");

        Ok(QueryIntent {
            query,
            series_ids,
            start_date,
            end_date,
        })
    }

    fn name(&self) -> &str {
        "intent"
    }
}

/// Check the query against the economic vocabulary
pub fn is_economic(query: &str) -> bool {
    let lower = query.to_lowercase();
    ECONOMIC_KEYWORDS.iter().any(|kw| lower.contains(kw))
}

/// Extract explicit FRED-style identifiers from the query
pub fn extract_series_ids(query: &str) -> Vec<String> {
    let mut ids = Vec::new();
    for m in SERIES_ID_RE.find_iter(query) {
        let token = m.as_str();
        if ID_STOPWORDS.contains(&token) {
            continue;
        }
        if !ids.iter().any(|id| id == token) {
            ids.push(token.to_string());
        }
    }
    ids
}

/// Map well-known indicator phrases to series identifiers
///
/// A matched phrase is consumed so a more specific alias shadows the
/// generic one it contains ("core cpi" must not also resolve "cpi").
pub fn resolve_aliases(query: &str) -> Vec<String> {
    let mut lower = query.to_lowercase();
    let mut ids = Vec::new();
    for (phrase, id) in SERIES_ALIASES {
        if lower.contains(phrase) {
            lower = lower.replace(phrase, " ");
            if !ids.iter().any(|existing| existing == id) {
                ids.push((*id).to_string());
            }
        }
    }
    ids
}

/// Extract an optional observation date range from the query
pub fn extract_date_range(query: &str) -> (Option<NaiveDate>, Option<NaiveDate>) {
    let lower = query.to_lowercase();

    let mut dates: Vec<NaiveDate> = ISO_DATE_RE
        .find_iter(&lower)
        .filter_map(|m| m.as_str().parse().ok())
        .collect();
    dates.sort_unstable();

    match dates.len() {
        0 => {}
        1 => return (Some(dates[0]), None),
        _ => return (Some(dates[0]), Some(dates[dates.len() - 1])),
    }

    let start = FROM_YEAR_RE
        .captures(&lower)
        .and_then(|c| c[1].parse::<i32>().ok())
        .and_then(|y| NaiveDate::from_ymd_opt(y, 1, 1));
    let end = TO_YEAR_RE
        .captures(&lower)
        .and_then(|c| c[1].parse::<i32>().ok())
        .and_then(|y| NaiveDate::from_ymd_opt(y, 12, 31));

    (start, end)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn test_config() -> Arc<EconConfig> {
        Arc::new(
            EconConfig::builder()
                .api_key("test_key")
                .cache_ttl(Duration::from_secs(60))
                .build()
                .expect("valid config"),
        )
    }

    fn stage() -> IntentStage {
        let config = test_config();
        let client = Arc::new(FredClient::new("test_key", None));
        IntentStage::new(client, config)
    }

    #[test]
    fn test_is_economic() {
        assert!(is_economic("What is the current unemployment rate?"));
        assert!(is_economic("Compare CPI inflation with wage growth"));
        assert!(!is_economic("best lasagna recipe"));
        assert!(!is_economic("weather in Paris tomorrow"));
    }

    #[test]
    fn test_extract_series_ids() {
        assert_eq!(extract_series_ids("show me UNRATE"), vec!["UNRATE"]);
        assert_eq!(
            extract_series_ids("compare UNRATE and DGS10"),
            vec!["UNRATE", "DGS10"]
        );
        // Stopwords that look like identifiers are skipped
        assert!(extract_series_ids("WHAT is THE trend FOR wages").is_empty());
        // Lowercase text yields nothing
        assert!(extract_series_ids("unemployment rate").is_empty());
    }

    #[test]
    fn test_extract_series_ids_deduplicates() {
        assert_eq!(
            extract_series_ids("UNRATE versus UNRATE"),
            vec!["UNRATE"]
        );
    }

    #[test]
    fn test_resolve_aliases() {
        assert_eq!(resolve_aliases("unemployment rate"), vec!["UNRATE"]);
        assert_eq!(resolve_aliases("core cpi trend"), vec!["CPILFESL"]);
        // Plain "cpi" resolves to the headline index
        assert_eq!(resolve_aliases("cpi trend"), vec!["CPIAUCSL"]);
        assert_eq!(
            resolve_aliases("compare unemployment and inflation"),
            vec!["UNRATE", "CPIAUCSL"]
        );
        assert!(resolve_aliases("nothing relevant").is_empty());
    }

    #[test]
    fn test_specific_alias_wins_over_generic() {
        // "gdp growth" must map to the growth-rate series, not real GDP
        let ids = resolve_aliases("gdp growth since 2020");
        assert_eq!(ids[0], "A191RL1Q225SBEA");
    }

    #[test]
    fn test_extract_date_range_iso() {
        let (start, end) = extract_date_range("UNRATE 2008-01-01..2010-12-31");
        assert_eq!(start, NaiveDate::from_ymd_opt(2008, 1, 1));
        assert_eq!(end, NaiveDate::from_ymd_opt(2010, 12, 31));
    }

    #[test]
    fn test_extract_date_range_single_date() {
        let (start, end) = extract_date_range("inflation after 2015-06-01");
        assert_eq!(start, NaiveDate::from_ymd_opt(2015, 6, 1));
        assert_eq!(end, None);
    }

    #[test]
    fn test_extract_date_range_years() {
        let (start, end) = extract_date_range("unemployment since 2008 until 2012");
        assert_eq!(start, NaiveDate::from_ymd_opt(2008, 1, 1));
        assert_eq!(end, NaiveDate::from_ymd_opt(2012, 12, 31));
    }

    #[test]
    fn test_extract_date_range_absent() {
        assert_eq!(extract_date_range("unemployment rate"), (None, None));
    }

    #[tokio::test]
    async fn test_run_resolves_aliases_without_search() {
        let intent = stage()
            .run("compare unemployment and inflation".to_string())
            .await
            .expect("resolvable locally");
        assert_eq!(intent.series_ids, vec!["UNRATE", "CPIAUCSL"]);
        assert_eq!(intent.start_date, None);
    }

    #[tokio::test]
    async fn test_run_rejects_out_of_scope() {
        let result = stage().run("best lasagna recipe".to_string()).await;
        assert!(matches!(result, Err(PipelineError::OutOfScope(_))));
    }

    #[tokio::test]
    async fn test_run_caps_series_count() {
        let config = Arc::new(
            EconConfig::builder()
                .api_key("test_key")
                .max_series(2)
                .build()
                .expect("valid config"),
        );
        let client = Arc::new(FredClient::new("test_key", None));
        let stage = IntentStage::new(client, config);

        let intent = stage
            .run("unemployment, inflation, gdp and housing starts".to_string())
            .await
            .expect("resolvable locally");
        assert_eq!(intent.series_ids.len(), 2);
    }
}
