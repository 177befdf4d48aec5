//! Command-line interface for econ-rs

use anyhow::Context as _;
use chrono::NaiveDate;
use clap::Parser;
use econ_fred::EconConfig;
use econ_pipeline::Pipeline;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "econ")]
#[command(about = "Query FRED economic data and render an analytical report", long_about = None)]
struct Args {
    /// Natural-language query, e.g. "compare unemployment and inflation"
    query: String,

    /// FRED API key; falls back to the FRED_API_KEY environment variable
    #[arg(long)]
    api_key: Option<String>,

    /// Start of the observation range (YYYY-MM-DD), overrides the query
    #[arg(long)]
    start: Option<NaiveDate>,

    /// End of the observation range (YYYY-MM-DD), overrides the query
    #[arg(long)]
    end: Option<NaiveDate>,

    /// Maximum number of series to analyze
    #[arg(long, default_value_t = 5)]
    limit: usize,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    econ_core::init_tracing();

    let args = Args::parse();

    // The environment is only consulted here, at the binary boundary;
    // everything below receives the key through the config.
    let mut builder = EconConfig::builder()
        .with_env_api_key()
        .max_series(args.limit);
    if let Some(key) = args.api_key {
        builder = builder.api_key(key);
    }
    let config = builder
        .build()
        .context("missing FRED API key: pass --api-key or set FRED_API_KEY")?;

    info!(query = %args.query, "starting analysis");

    let pipeline = Pipeline::new(config)?;

    // CLI date flags take precedence over any range found in the query
    let report = pipeline
        .run_with_range(args.query, args.start, args.end)
        .await?;
    println!("{report}");

    Ok(())
}
