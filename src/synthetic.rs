//! Seeded synthetic execution history: a fixed set of scheduled jobs, three runs a day,
//! weekly and month-end load swings, and a small share of inflated, failing runs.

use crate::ingest::{ExecutionRecord, Status};
use chrono::{Datelike, Duration, NaiveDate};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::f64::consts::PI;

/// (job, project, base duration in seconds)
pub const JOBS: [(&str, &str, f64); 8] = [
    ("backup-db", "infra", 180.0),
    ("etl-billing", "finance", 600.0),
    ("load-kpis", "bi", 240.0),
    ("rotate-logs", "infra", 120.0),
    ("sync-catalog", "retail", 300.0),
    ("recalc-limits", "cards", 420.0),
    ("replicate-olap", "bi", 360.0),
    ("agg-clicks", "marketing", 200.0),
];

pub const RUN_HOURS: [u32; 3] = [2, 10, 18];

#[derive(Debug, Clone)]
pub struct SyntheticConfig {
    pub days: u32,
    pub seed: u64,
    pub start_date: NaiveDate,
    /// Share of runs with an inflated duration
    pub incident_rate: f64,
    /// Share of remaining runs that fail at normal duration
    pub failure_rate: f64,
}

impl Default for SyntheticConfig {
    fn default() -> Self {
        Self {
            days: 90,
            seed: 42,
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or(NaiveDate::MIN),
            incident_rate: 0.03,
            failure_rate: 0.05,
        }
    }
}

/// `days × JOBS.len() × RUN_HOURS.len()` records, deterministic for a given config.
pub fn generate(config: &SyntheticConfig) -> Vec<ExecutionRecord> {
    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut out = Vec::with_capacity(config.days as usize * JOBS.len() * RUN_HOURS.len());
    let mut next_id: u64 = 100_000;

    for d in 0..config.days {
        let day = config.start_date + Duration::days(d as i64);
        let weekly = 1.0 + 0.2 * (2.0 * PI * d as f64 / 7.0).sin();
        let month_end = if matches!(day.day(), 1 | 2 | 30) { 1.3 } else { 1.0 };

        for (job, project, base) in JOBS {
            for hour in RUN_HOURS {
                let minute = rng.gen_range(0..59);
                let noise = rng.gen_range(-0.15..0.15) * base;
                let mut duration = (base * weekly * month_end + noise).max(30.0);
                let status = if rng.gen::<f64>() < config.incident_rate {
                    duration *= rng.gen_range(1.8..3.2);
                    Status::Failed
                } else if rng.gen::<f64>() < config.failure_rate {
                    Status::Failed
                } else {
                    Status::Success
                };

                out.push(ExecutionRecord {
                    project: Some(project.to_string()),
                    job: job.to_string(),
                    exec_id: next_id.to_string(),
                    start_time: day.and_hms_opt(hour, minute, 0),
                    status,
                    duration_seconds: Some(duration.floor()),
                });
                next_id += 1;
            }
        }
    }
    out
}
