//! JSON log lines: one JSON object per line (ndjson) for ingestion and audit.

use crate::risk::{RiskReport, Summary};
use serde::Serialize;
use std::io::Write;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Machine-readable outcome of one pipeline stage, printed as a single stdout line.
#[derive(Debug, Serialize)]
pub struct StageSummary<'a> {
    pub status: &'a str,
    pub stage: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub out: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rows: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub columns: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub re_p95_global: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub counts: Option<ReportCounts>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resumo: Option<Summary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<'a> StageSummary<'a> {
    pub fn ok(stage: &'a str) -> Self {
        Self {
            status: "ok",
            stage,
            out: None,
            rows: None,
            columns: None,
            re_p95_global: None,
            counts: None,
            resumo: None,
            error: None,
        }
    }

    pub fn failed(stage: &'a str, error: impl ToString) -> Self {
        Self {
            status: "error",
            error: Some(error.to_string()),
            ..Self::ok(stage)
        }
    }
}

/// Section sizes of a written risk report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReportCounts {
    pub hotspots: usize,
    pub risco_p95_por_job: usize,
    pub top_amostras: usize,
}

impl<'a> StageSummary<'a> {
    /// Attach the report's headline numbers.
    pub fn with_report(mut self, report: &RiskReport) -> Self {
        self.rows = Some(report.summary.total_count);
        self.re_p95_global = report.summary.global_p95_re;
        self.counts = Some(ReportCounts {
            hotspots: report.hotspots.len(),
            risco_p95_por_job: report.per_job_risk.len(),
            top_amostras: report.sampled_hotspots.len(),
        });
        self.resumo = Some(report.summary.clone());
        self
    }
}

pub struct StructuredLogger;

impl StructuredLogger {
    /// Install global subscriber on stderr (stdout carries stage summaries),
    /// level from RUST_LOG or `default_level`. Safe to call more than once.
    pub fn init(json: bool, default_level: &str) {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
        let result = if json {
            let fmt = tracing_subscriber::fmt::layer()
                .json()
                .with_span_events(FmtSpan::NONE)
                .with_writer(std::io::stderr);
            tracing_subscriber::registry().with(filter).with(fmt).try_init()
        } else {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .try_init()
        };
        if result.is_err() {
            tracing::debug!("tracing subscriber already installed");
        }
    }

    /// Emit a single structured line without going through tracing
    pub fn emit_json(event: &impl Serialize, w: &mut impl Write) {
        if let Ok(line) = serde_json::to_string(event) {
            let _ = writeln!(w, "{}", line);
        }
    }
}
