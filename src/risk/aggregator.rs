//! Joins execution metadata with scores and builds the risk report.

use super::{Hotspot, JobRisk, RiskReport, Summary};
use crate::config::ReportConfig;
use crate::error::{Error, Result};
use crate::ingest::ExecutionRecord;
use crate::stats;
use crate::storage::ScoreRecord;
use std::collections::{BTreeMap, HashMap};
use tracing::info;

pub struct RiskAggregator {
    config: ReportConfig,
}

impl RiskAggregator {
    pub fn new(config: ReportConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ReportConfig {
        &self.config
    }

    /// Left join on `exec_id`: unscored executions count toward the summary
    /// but never toward percentiles or rankings. A repeated id in `scores`
    /// keeps its last value.
    pub fn aggregate(&self, records: &[ExecutionRecord], scores: &[ScoreRecord]) -> Result<RiskReport> {
        if records.is_empty() {
            return Err(Error::EmptyInput("no executions to aggregate".into()));
        }
        let by_id: HashMap<&str, f64> = scores
            .iter()
            .filter(|s| s.re.is_finite())
            .map(|s| (s.exec_id.as_str(), s.re))
            .collect();
        let joined: Vec<(&ExecutionRecord, Option<f64>)> = records
            .iter()
            .map(|r| (r, by_id.get(r.exec_id.as_str()).copied()))
            .collect();

        let summary = self.summary(&joined);
        let per_job_risk = self.per_job_risk(&joined);
        let hotspots = self.hotspots(&joined);
        let take = self.config.max_samples.min(hotspots.len());
        let sampled_hotspots = hotspots[..take].to_vec();

        info!(
            total = summary.total_count,
            scored = joined.iter().filter(|(_, re)| re.is_some()).count(),
            jobs = per_job_risk.len(),
            hotspots = hotspots.len(),
            "risk report aggregated"
        );
        Ok(RiskReport {
            summary,
            per_job_risk,
            hotspots,
            sampled_hotspots,
        })
    }

    fn summary(&self, joined: &[(&ExecutionRecord, Option<f64>)]) -> Summary {
        let mut status_histogram = BTreeMap::new();
        for (r, _) in joined {
            *status_histogram.entry(r.status).or_insert(0) += 1;
        }
        let durations: Vec<f64> = joined.iter().filter_map(|(r, _)| r.duration_seconds).collect();
        let scores: Vec<f64> = joined.iter().filter_map(|(_, re)| *re).collect();
        Summary {
            total_count: joined.len(),
            status_histogram,
            mean_duration: stats::mean(&durations).and_then(stats::finite),
            global_p95_re: stats::quantile(&scores, self.config.quantile).and_then(stats::finite),
        }
    }

    fn per_job_risk(&self, joined: &[(&ExecutionRecord, Option<f64>)]) -> Vec<JobRisk> {
        let mut groups: BTreeMap<(Option<&str>, &str), Vec<f64>> = BTreeMap::new();
        for (r, re) in joined {
            if let Some(re) = re {
                groups.entry(r.job_key()).or_default().push(*re);
            }
        }
        let mut out: Vec<JobRisk> = groups
            .into_iter()
            .filter_map(|((project, job), res)| {
                let re_p95 = stats::quantile(&res, self.config.quantile).and_then(stats::finite)?;
                Some(JobRisk {
                    project: project.map(String::from),
                    job: job.to_string(),
                    re_p95,
                })
            })
            .collect();
        out.sort_by(|a, b| b.re_p95.total_cmp(&a.re_p95));
        out.truncate(self.config.max_jobs);
        out
    }

    fn hotspots(&self, joined: &[(&ExecutionRecord, Option<f64>)]) -> Vec<Hotspot> {
        let mut scored: Vec<(&ExecutionRecord, f64)> = joined
            .iter()
            .filter_map(|(r, re)| (*re).map(|re| (*r, re)))
            .collect();
        // stable: equal scores keep input order
        scored.sort_by(|a, b| b.1.total_cmp(&a.1));
        scored
            .into_iter()
            .take(self.config.max_hotspots)
            .map(|(r, re)| Hotspot {
                project: r.project.clone(),
                job: r.job.clone(),
                exec_id: r.exec_id.clone(),
                start_time: r.start_time_iso(),
                status: r.status,
                duration_seconds: r.duration_seconds.and_then(stats::finite),
                re,
            })
            .collect()
    }
}
