//! Concurrent series retrieval with bounded retries
//!
//! Each series in the intent is fetched independently; a failing series
//! is retried up to the configured attempt count with exponential
//! backoff, then reported as a failure rather than aborting the whole
//! query. Only the case where every series fails is fatal.

use crate::error::{PipelineError, Result};
use crate::intent::QueryIntent;
use crate::stage::Stage;
use async_trait::async_trait;
use econ_fred::{CacheKey, EconConfig, FredClient, FredError, SeriesCache, SeriesData};
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Provider seam for series retrieval
///
/// The fetch stage only needs one operation from the FRED client, so it
/// takes that operation as a trait and stays independent of the HTTP
/// layer.
#[async_trait]
pub trait SeriesSource: Send + Sync {
    async fn fetch(
        &self,
        series_id: &str,
        start: Option<&str>,
        end: Option<&str>,
    ) -> std::result::Result<SeriesData, FredError>;
}

#[async_trait]
impl SeriesSource for FredClient {
    async fn fetch(
        &self,
        series_id: &str,
        start: Option<&str>,
        end: Option<&str>,
    ) -> std::result::Result<SeriesData, FredError> {
        self.fetch_series(series_id, start, end).await
    }
}

/// A series that could not be retrieved
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeriesFailure {
    pub series_id: String,
    pub reason: String,
}

/// Result of the fetch stage: retrieved series plus per-series failures
#[derive(Debug, Clone)]
pub struct FetchOutcome {
    pub intent: QueryIntent,
    pub series: Vec<SeriesData>,
    pub failures: Vec<SeriesFailure>,
}

/// Stage that retrieves every series named by the intent
pub struct FetchStage<S: SeriesSource = FredClient> {
    source: Arc<S>,
    config: Arc<EconConfig>,
    cache: SeriesCache,
}

impl<S: SeriesSource> FetchStage<S> {
    pub fn new(source: Arc<S>, config: Arc<EconConfig>) -> Self {
        let cache = SeriesCache::new(config.cache_ttl);
        Self {
            source,
            config,
            cache,
        }
    }

    /// Fetch one series through the cache, retrying on failure
    async fn fetch_with_retry(
        &self,
        series_id: &str,
        start: Option<&str>,
        end: Option<&str>,
    ) -> std::result::Result<SeriesData, FredError> {
        let key = CacheKey::new(
            series_id,
            "series",
            serde_json::json!({ "start": start, "end": end }),
        );

        let mut last_err = None;
        for attempt in 0..self.config.max_retries {
            if attempt > 0 {
                let backoff = self.config.retry_backoff(attempt - 1);
                tracing::debug!(series_id, attempt, ?backoff, "retrying fetch");
                tokio::time::sleep(backoff).await;
            }

            let result = self
                .cache
                .get_or_fetch(key.clone(), || async {
                    let data = self.source.fetch(series_id, start, end).await?;
                    serde_json::to_value(&data).map_err(FredError::Json)
                })
                .await
                .and_then(|value| serde_json::from_value(value).map_err(FredError::Json));

            match result {
                Ok(data) => return Ok(data),
                Err(err) => {
                    tracing::warn!(series_id, attempt, %err, "fetch attempt failed");
                    // A missing series will not appear on retry
                    if matches!(err, FredError::SeriesNotFound(_)) {
                        return Err(err);
                    }
                    last_err = Some(err);
                }
            }
        }

        Err(last_err.unwrap_or_else(|| FredError::Api("no attempts made".to_string())))
    }
}

#[async_trait]
impl<S: SeriesSource> Stage for FetchStage<S> {
    type Input = QueryIntent;
    type Output = FetchOutcome;

    async fn run(&self, intent: QueryIntent) -> Result<FetchOutcome> {
        let start = intent.start_date.map(|d| d.to_string());
        let end = intent.end_date.map(|d| d.to_string());

        let fetches = intent.series_ids.iter().map(|id| {
            let start = start.as_deref();
            let end = end.as_deref();
            async move { (id.clone(), self.fetch_with_retry(id, start, end).await) }
        });

        let mut series = Vec::new();
        let mut failures = Vec::new();
        for (id, result) in join_all(fetches).await {
            match result {
                Ok(data) => series.push(data),
                Err(err) => failures.push(SeriesFailure {
                    series_id: id,
                    reason: err.to_string(),
                }),
            }
        }

        if series.is_empty() {
            return Err(PipelineError::NoData);
        }

        tracing::info!(
            retrieved = series.len(),
            failed = failures.len(),
            "fetch stage complete"
        );

        Ok(FetchOutcome {
            intent,
            series,
            failures,
        })
    }

    fn name(&self) -> &str {
        "fetch"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use econ_core::{Observation, ObservationSeries};
    use econ_fred::SeriesInfo;
    use std::collections::{HashMap, VecDeque};
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Duration;

    type FetchResult = std::result::Result<SeriesData, FredError>;

    /// Source that replays a fixed sequence of outcomes per series
    struct ScriptedSource {
        responses: Mutex<HashMap<String, VecDeque<FetchResult>>>,
        calls: AtomicU32,
    }

    impl ScriptedSource {
        fn new() -> Self {
            Self {
                responses: Mutex::new(HashMap::new()),
                calls: AtomicU32::new(0),
            }
        }

        fn script(self, series_id: &str, outcomes: Vec<FetchResult>) -> Self {
            self.responses
                .lock()
                .expect("responses lock")
                .insert(series_id.to_string(), outcomes.into());
            self
        }

        fn call_count(&self) -> u32 {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl SeriesSource for ScriptedSource {
        async fn fetch(
            &self,
            series_id: &str,
            _start: Option<&str>,
            _end: Option<&str>,
        ) -> FetchResult {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.responses
                .lock()
                .expect("responses lock")
                .get_mut(series_id)
                .and_then(VecDeque::pop_front)
                .unwrap_or_else(|| {
                    Err(FredError::Api(format!("unscripted call for {series_id}")))
                })
        }
    }

    fn sample_data(series_id: &str) -> SeriesData {
        let info = SeriesInfo {
            id: series_id.to_string(),
            title: format!("{series_id} title"),
            observation_start: "2024-01-01".to_string(),
            observation_end: "2024-02-01".to_string(),
            frequency: "Monthly".to_string(),
            frequency_short: "M".to_string(),
            units: "Percent".to_string(),
            units_short: "%".to_string(),
            seasonal_adjustment: "Seasonally Adjusted".to_string(),
            seasonal_adjustment_short: "SA".to_string(),
            last_updated: "2024-02-05".to_string(),
            notes: None,
        };
        let series = ObservationSeries::new(vec![
            Observation::new(NaiveDate::from_ymd_opt(2024, 1, 1).expect("date"), 1.0),
            Observation::new(NaiveDate::from_ymd_opt(2024, 2, 1).expect("date"), 2.0),
        ])
        .expect("ordered observations");

        SeriesData {
            metadata: info.metadata(),
            info,
            series,
        }
    }

    fn test_config(max_retries: u32) -> Arc<EconConfig> {
        Arc::new(
            EconConfig::builder()
                .api_key("test_key")
                .max_retries(max_retries)
                .retry_backoff_base(Duration::from_millis(1))
                .build()
                .expect("valid config"),
        )
    }

    fn intent_for(series_ids: &[&str]) -> QueryIntent {
        QueryIntent {
            query: "unemployment".to_string(),
            series_ids: series_ids.iter().map(|id| (*id).to_string()).collect(),
            start_date: None,
            end_date: None,
        }
    }

    #[tokio::test]
    async fn test_all_attempts_exhausted_is_fatal_when_nothing_retrieved() {
        let source = Arc::new(ScriptedSource::new().script(
            "UNRATE",
            vec![
                Err(FredError::Api("status 500".to_string())),
                Err(FredError::Api("status 500".to_string())),
            ],
        ));
        let stage = FetchStage::new(Arc::clone(&source), test_config(2));

        let result = stage.run(intent_for(&["UNRATE"])).await;
        assert!(matches!(result, Err(PipelineError::NoData)));
        assert_eq!(source.call_count(), 2);
    }

    #[tokio::test]
    async fn test_transient_error_is_retried_until_success() {
        let source = Arc::new(ScriptedSource::new().script(
            "UNRATE",
            vec![
                Err(FredError::Api("status 503".to_string())),
                Ok(sample_data("UNRATE")),
            ],
        ));
        let stage = FetchStage::new(Arc::clone(&source), test_config(3));

        let outcome = stage
            .run(intent_for(&["UNRATE"]))
            .await
            .expect("recovers on second attempt");
        assert_eq!(outcome.series.len(), 1);
        assert!(outcome.failures.is_empty());
        assert_eq!(source.call_count(), 2);
    }

    #[tokio::test]
    async fn test_missing_series_is_not_retried() {
        let source = Arc::new(
            ScriptedSource::new()
                .script(
                    "NOSUCH",
                    vec![Err(FredError::SeriesNotFound("NOSUCH".to_string()))],
                )
                .script("UNRATE", vec![Ok(sample_data("UNRATE"))]),
        );
        let stage = FetchStage::new(Arc::clone(&source), test_config(3));

        let outcome = stage
            .run(intent_for(&["NOSUCH", "UNRATE"]))
            .await
            .expect("one series retrieved");
        assert_eq!(outcome.failures.len(), 1);
        assert_eq!(outcome.failures[0].series_id, "NOSUCH");
        // One call for the missing series, one for the good one
        assert_eq!(source.call_count(), 2);
    }

    #[tokio::test]
    async fn test_partial_failure_keeps_retrieved_series() {
        let source = Arc::new(
            ScriptedSource::new()
                .script("UNRATE", vec![Ok(sample_data("UNRATE"))])
                .script(
                    "CPIAUCSL",
                    vec![
                        Err(FredError::Api("status 500".to_string())),
                        Err(FredError::Api("status 500".to_string())),
                    ],
                ),
        );
        let stage = FetchStage::new(Arc::clone(&source), test_config(2));

        let outcome = stage
            .run(intent_for(&["UNRATE", "CPIAUCSL"]))
            .await
            .expect("partial success is not fatal");
        assert_eq!(outcome.series.len(), 1);
        assert_eq!(outcome.series[0].info.id, "UNRATE");
        assert_eq!(outcome.failures.len(), 1);
        assert_eq!(outcome.failures[0].series_id, "CPIAUCSL");
    }

    #[tokio::test]
    async fn test_successful_fetch_is_cached_across_runs() {
        let source =
            Arc::new(ScriptedSource::new().script("UNRATE", vec![Ok(sample_data("UNRATE"))]));
        let stage = FetchStage::new(Arc::clone(&source), test_config(3));

        stage
            .run(intent_for(&["UNRATE"]))
            .await
            .expect("first run");
        // The scripted response is spent; a second run must hit the cache
        let outcome = stage
            .run(intent_for(&["UNRATE"]))
            .await
            .expect("served from cache");
        assert_eq!(outcome.series.len(), 1);
        assert_eq!(source.call_count(), 1);
    }
}
