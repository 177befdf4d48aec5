//! Pipeline wiring
//!
//! Sequential execution of the typed stages: intent resolution, fetch,
//! and metric computation plus rendering. The output of each stage is
//! the input of the next.

use crate::error::Result;
use crate::fetch::FetchStage;
use crate::intent::IntentStage;
use crate::report::RenderStage;
use crate::stage::Stage;
use econ_fred::{EconConfig, FredClient};
use std::sync::Arc;

/// The full query-to-report pipeline
pub struct Pipeline {
    intent: IntentStage,
    fetch: FetchStage,
    render: RenderStage,
}

impl Pipeline {
    /// Build a pipeline from a validated configuration
    pub fn new(config: EconConfig) -> Result<Self> {
        let client = Arc::new(FredClient::from_config(&config)?);
        Ok(Self::with_client(client, Arc::new(config)))
    }

    /// Build a pipeline around an existing client
    pub fn with_client(client: Arc<FredClient>, config: Arc<EconConfig>) -> Self {
        Self {
            intent: IntentStage::new(Arc::clone(&client), Arc::clone(&config)),
            fetch: FetchStage::new(client, Arc::clone(&config)),
            render: RenderStage::new(config),
        }
    }

    /// Run a query through every stage and return the rendered report
    pub async fn run(&self, query: impl Into<String>) -> Result<String> {
        self.run_with_range(query, None, None).await
    }

    /// Run a query with explicit date-range overrides
    ///
    /// Overrides win over any range found in the query text.
    pub async fn run_with_range(
        &self,
        query: impl Into<String>,
        start: Option<chrono::NaiveDate>,
        end: Option<chrono::NaiveDate>,
    ) -> Result<String> {
        let query = query.into();
        tracing::info!(%query, "running analysis pipeline");

        let mut intent = self.intent.run(query).await?;
        if start.is_some() {
            intent.start_date = start;
        }
        if end.is_some() {
            intent.end_date = end;
        }

        let outcome = self.fetch.run(intent).await?;
        self.render.run(outcome).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PipelineError;

    fn pipeline() -> Pipeline {
        let config = Arc::new(
            EconConfig::builder()
                .api_key("test_key")
                .build()
                .expect("valid config"),
        );
        let client = Arc::new(FredClient::new("test_key", None));
        Pipeline::with_client(client, config)
    }

    #[tokio::test]
    async fn test_out_of_scope_query_fails_before_any_fetch() {
        let result = pipeline().run("top 10 pasta dishes").await;
        assert!(matches!(result, Err(PipelineError::OutOfScope(_))));
    }

    #[tokio::test]
    #[ignore] // Requires API key and network
    async fn test_end_to_end_unemployment() {
        let config = EconConfig::builder()
            .with_env_api_key()
            .build()
            .expect("FRED_API_KEY set");
        let pipeline = Pipeline::new(config).expect("pipeline");
        let report = pipeline
            .run("current unemployment rate")
            .await
            .expect("live run");
        assert!(report.contains("UNRATE"));
        assert!(report.contains("Current Percentile Rank"));
    }
}
