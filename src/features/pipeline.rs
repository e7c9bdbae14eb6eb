//! Feature extraction pipeline: execution records → imputed columns → encodings → vectors.

use super::{cyclic_01, high_runtime_flags, minmax_01, zclip_01, FeatureVector};
use crate::config::FeaturesConfig;
use crate::error::{Error, Result};
use crate::ingest::{ExecutionRecord, Status};
use crate::stats;
use chrono::{Datelike, Timelike};
use tracing::{debug, info};

pub struct FeatureExtractor {
    config: FeaturesConfig,
}

impl FeatureExtractor {
    pub fn new(config: FeaturesConfig) -> Self {
        Self { config }
    }

    /// One vector per record, in input order. Statistics (min/max, mean/std,
    /// percentiles, medians) are taken over the whole batch.
    pub fn extract(&self, records: &[ExecutionRecord]) -> Result<Vec<FeatureVector>> {
        if records.is_empty() {
            return Err(Error::EmptyInput("no execution records to featurize".into()));
        }

        let durations: Vec<f64> = stats::impute_median(
            &records.iter().map(|r| r.duration_seconds).collect::<Vec<_>>(),
            0.0,
        )
        .into_iter()
        .map(|d| d.max(0.0))
        .collect();
        let hours = stats::impute_median(
            &records
                .iter()
                .map(|r| r.start_time.map(|t| t.hour() as f64))
                .collect::<Vec<_>>(),
            0.0,
        );
        let weekdays = stats::impute_median(
            &records
                .iter()
                .map(|r| r.start_time.map(|t| t.weekday().num_days_from_monday() as f64))
                .collect::<Vec<_>>(),
            0.0,
        );

        let duration_mm = minmax_01(&durations);
        let duration_z = zclip_01(&durations, self.config.z_clip);
        let keys: Vec<(Option<&str>, &str)> = records.iter().map(|r| r.job_key()).collect();
        let high_runtime = high_runtime_flags(
            &keys,
            &durations,
            self.config.high_runtime_quantile,
            self.config.min_job_samples,
        );

        let vectors: Vec<FeatureVector> = records
            .iter()
            .enumerate()
            .map(|(i, r)| {
                let (hour_sin_mm, hour_cos_mm) = cyclic_01(hours[i].clamp(0.0, 23.0), 24.0);
                let (weekday_sin_mm, weekday_cos_mm) = cyclic_01(weekdays[i].clamp(0.0, 6.0), 7.0);
                FeatureVector {
                    exec_id: r.exec_id.clone(),
                    duration_mm: duration_mm[i],
                    duration_z_clipped_mm: duration_z[i],
                    hour_sin_mm,
                    hour_cos_mm,
                    weekday_sin_mm,
                    weekday_cos_mm,
                    failed: if r.status == Status::Failed { 1.0 } else { 0.0 },
                    high_runtime: high_runtime[i],
                }
            })
            .collect();

        info!(
            rows = vectors.len(),
            high_runtime = high_runtime.iter().filter(|f| **f > 0.0).count(),
            failed = vectors.iter().filter(|v| v.failed > 0.0).count(),
            "features extracted"
        );
        if let Some(first) = vectors.first() {
            debug!(sample = ?first, "feature sample");
        }
        Ok(vectors)
    }
}
