//! Report assembly and rendering
//!
//! Renders each analyzed series into the sectioned text report: current
//! data, calculated metrics, historical context, a recent-observations
//! table, and a full-dataset summary. A metric that was not computable
//! is omitted entirely; the report never prints a placeholder token in
//! its place.

use crate::error::Result;
use crate::fetch::FetchOutcome;
use crate::stage::Stage;
use async_trait::async_trait;
use comfy_table::{Table, presets::ASCII_MARKDOWN};
use econ_fred::{EconConfig, SeriesData};
use econ_metrics::MetricsReport;
use std::fmt::Write as _;
use std::sync::Arc;

/// One fully analyzed series: retrieved data plus computed metrics
#[derive(Debug, Clone)]
pub struct SeriesAnalysis {
    pub data: SeriesData,
    pub report: MetricsReport,
}

/// Stage that computes metrics and renders the final report
pub struct RenderStage {
    config: Arc<EconConfig>,
}

impl RenderStage {
    pub fn new(config: Arc<EconConfig>) -> Self {
        Self { config }
    }

    fn render_series(&self, analysis: &SeriesAnalysis) -> String {
        let data = &analysis.data;
        let report = &analysis.report;
        let mut out = String::new();

        let _ = writeln!(out, "=== SERIES ANALYSIS: {} ===", data.info.title);
        out.push('\n');

        let _ = writeln!(out, "CURRENT DATA:");
        let _ = writeln!(out, "Series ID: {}", data.info.id);
        let _ = writeln!(out, "Current Value: {}", num(report.current_value));
        let _ = writeln!(out, "Date: {}", report.current_date);
        let _ = writeln!(out, "Frequency: {}", data.metadata.frequency);
        let _ = writeln!(out, "Units: {}", data.info.units);
        let _ = writeln!(
            out,
            "Seasonal Adjustment: {}",
            data.info.seasonal_adjustment
        );
        out.push('\n');

        let _ = writeln!(out, "CALCULATED METRICS:");
        if let Some(change) = report.period_change {
            match report.period_change_pct {
                Some(pct) => {
                    let _ = writeln!(
                        out,
                        "Period Change: {} ({}%)",
                        signed(change),
                        signed(pct)
                    );
                }
                None => {
                    let _ = writeln!(out, "Period Change: {}", signed(change));
                }
            }
        }
        if let Some(change) = report.yoy_change {
            match report.yoy_change_pct {
                Some(pct) => {
                    let _ = writeln!(
                        out,
                        "Year-over-Year Change: {} ({}%)",
                        signed(change),
                        signed(pct)
                    );
                }
                None => {
                    let _ = writeln!(out, "Year-over-Year Change: {}", signed(change));
                }
            }
        }
        let _ = writeln!(out, "3-Period Average: {}", num(report.rolling_average));
        out.push('\n');

        let _ = writeln!(out, "HISTORICAL CONTEXT:");
        let _ = writeln!(out, "Historical Mean: {}", num(report.mean));
        if let Some(sd) = report.std_dev {
            let _ = writeln!(out, "Standard Deviation: {}", num(sd));
        }
        let _ = writeln!(
            out,
            "Historical Range: {} to {}",
            num(report.min),
            num(report.max)
        );
        let _ = writeln!(
            out,
            "Current Percentile Rank: {:.1}th percentile",
            report.percentile_rank
        );
        if let Some(z) = report.std_devs_from_mean {
            let _ = writeln!(out, "Distance from Mean: {} standard deviations", signed(z));
        }
        let _ = writeln!(
            out,
            "Data Range: {} to {}",
            report.start_date, report.end_date
        );
        let _ = writeln!(out, "Total Observations: {}", report.observation_count);
        out.push('\n');

        let recent = data.series.recent(self.config.recent_points);
        let _ = writeln!(out, "RECENT DATA POINTS (Last {}):", recent.len());
        let mut table = Table::new();
        table.load_preset(ASCII_MARKDOWN);
        table.set_header(vec!["Date", "Value"]);
        for obs in recent {
            table.add_row(vec![obs.date.to_string(), num(obs.value)]);
        }
        let _ = writeln!(out, "{table}");
        out.push('\n');

        let _ = writeln!(out, "FULL DATASET SUMMARY:");
        let _ = writeln!(
            out,
            "Oldest data: {} = {}",
            report.start_date,
            num(data.series.first().map_or(report.current_value, |o| o.value))
        );
        let _ = writeln!(
            out,
            "Newest data: {} = {}",
            report.end_date,
            num(report.current_value)
        );
        let _ = writeln!(out, "Average over entire period: {}", num(report.mean));
        let _ = writeln!(
            out,
            "Peak value: {} on {}",
            num(report.max),
            report.max_date
        );
        let _ = writeln!(
            out,
            "Trough value: {} on {}",
            num(report.min),
            report.min_date
        );
        out.push('\n');

        let _ = writeln!(
            out,
            "View on FRED: https://fred.stlouisfed.org/series/{}",
            data.info.id
        );

        out
    }
}

#[async_trait]
impl Stage for RenderStage {
    type Input = FetchOutcome;
    type Output = String;

    async fn run(&self, outcome: FetchOutcome) -> Result<String> {
        let mut analyses = Vec::with_capacity(outcome.series.len());
        for data in outcome.series {
            let report = econ_metrics::compute(&data.series, &data.metadata)?;
            analyses.push(SeriesAnalysis { data, report });
        }

        let mut out = String::new();
        let _ = writeln!(out, "Query: {}", outcome.intent.query);
        let _ = writeln!(out, "Series analyzed: {}", analyses.len());
        out.push('\n');

        for analysis in &analyses {
            out.push_str(&self.render_series(analysis));
            out.push('\n');
        }

        if !outcome.failures.is_empty() {
            let _ = writeln!(out, "UNAVAILABLE SERIES:");
            for failure in &outcome.failures {
                let _ = writeln!(out, "- {}: {}", failure.series_id, failure.reason);
            }
        }

        Ok(out)
    }

    fn name(&self) -> &str {
        "render"
    }
}

/// Fixed two-decimal rendering
fn num(value: f64) -> String {
    format!("{value:.2}")
}

/// Sign-prefixed two-decimal rendering for changes
fn signed(value: f64) -> String {
    format!("{value:+.2}")
}
