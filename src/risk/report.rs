//! Risk report document. Serialized field names are what the dashboard reads.

use crate::ingest::Status;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskReport {
    #[serde(rename = "resumo")]
    pub summary: Summary,
    #[serde(rename = "risco_p95_por_job")]
    pub per_job_risk: Vec<JobRisk>,
    pub hotspots: Vec<Hotspot>,
    #[serde(rename = "top_amostras")]
    pub sampled_hotspots: Vec<Hotspot>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    #[serde(rename = "total_execucoes")]
    pub total_count: usize,
    #[serde(rename = "por_status")]
    pub status_histogram: BTreeMap<Status, usize>,
    #[serde(rename = "duracao_media_s")]
    pub mean_duration: Option<f64>,
    #[serde(rename = "re_p95_global")]
    pub global_p95_re: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobRisk {
    #[serde(rename = "projeto", default, skip_serializing_if = "Option::is_none")]
    pub project: Option<String>,
    pub job: String,
    pub re_p95: f64,
}

/// One high-scoring execution with its full context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hotspot {
    #[serde(rename = "projeto")]
    pub project: Option<String>,
    pub job: String,
    pub exec_id: String,
    #[serde(rename = "inicio")]
    pub start_time: Option<String>,
    pub status: Status,
    #[serde(rename = "duracao_s")]
    pub duration_seconds: Option<f64>,
    pub re: f64,
}
