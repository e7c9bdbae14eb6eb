//! Execution feed ingestion: one schema-normalization step at the system boundary.
//! Everything past this module sees canonical field names only.

mod reader;
mod schema;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

pub use reader::{parse_number, parse_timestamp, read_executions, write_executions};
pub use schema::{normalize_header, ColumnMap, Field};

/// Format used whenever a start time is written back out.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// One historical job run, as consumed by the feature extractor and the aggregator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionRecord {
    pub project: Option<String>,
    pub job: String,
    pub exec_id: String,
    pub start_time: Option<NaiveDateTime>,
    pub status: Status,
    pub duration_seconds: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Success,
    Failed,
    Unknown,
}

impl Status {
    /// Fold the status vocabulary of common schedulers into three buckets.
    pub fn normalize(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "success" | "succeeded" | "succeed" | "successful" | "ok" | "pass" | "completed"
            | "done" => Status::Success,
            "failed" | "fail" | "error" | "ko" | "timedout" | "timeout" => Status::Failed,
            _ => Status::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Success => "success",
            Status::Failed => "failed",
            Status::Unknown => "unknown",
        }
    }
}

impl ExecutionRecord {
    /// Grouping key for per-job statistics.
    pub fn job_key(&self) -> (Option<&str>, &str) {
        (self.project.as_deref(), self.job.as_str())
    }

    pub fn start_time_iso(&self) -> Option<String> {
        self.start_time
            .map(|t| t.format(TIMESTAMP_FORMAT).to_string())
    }
}

/// Deterministic id for feeds that carry none: first 16 hex chars of
/// SHA-256 over `project|job|start_time`.
pub fn derive_exec_id(project: Option<&str>, job: &str, start_time: Option<&NaiveDateTime>) -> String {
    let start = start_time
        .map(|t| t.format(TIMESTAMP_FORMAT).to_string())
        .unwrap_or_default();
    let digest = Sha256::digest(format!("{}|{}|{}", project.unwrap_or(""), job, start).as_bytes());
    hex_prefix(&digest, 16)
}

pub(crate) fn hex_prefix(bytes: &[u8], chars: usize) -> String {
    let mut out: String = bytes.iter().map(|b| format!("{:02x}", b)).collect();
    out.truncate(chars);
    out
}
