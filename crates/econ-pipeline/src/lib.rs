//! Query-to-report analysis pipeline
//!
//! Turns a natural-language economic-data query into a rendered report
//! through explicit, rule-driven stages:
//!
//! 1. **Intent** - validate the query against an economic vocabulary
//!    and resolve it to concrete FRED series identifiers (explicit IDs,
//!    indicator aliases, or full-text search as a fallback).
//! 2. **Fetch** - retrieve each series concurrently with bounded retries.
//! 3. **Analyze** - compute the derived metrics per series.
//! 4. **Render** - assemble the sectioned text report, omitting every
//!    metric that was not computable.
//!
//! There is no language model anywhere in this path; the guardrails the
//! original agent prompts expressed in prose (scope checks, early exit
//! on empty search results, bounded retries, never fabricating data)
//! are explicit control flow here.

pub mod error;
pub mod fetch;
pub mod intent;
pub mod pipeline;
pub mod report;
pub mod stage;

pub use error::{PipelineError, Result};
pub use fetch::{FetchOutcome, FetchStage, SeriesFailure, SeriesSource};
pub use intent::{IntentStage, QueryIntent};
pub use pipeline::Pipeline;
pub use report::{RenderStage, SeriesAnalysis};
pub use stage::Stage;
