//! Anomaly scoring: persisted scaler + model applied to a feature table.

use crate::error::{Error, Result};
use crate::features::FeatureTable;
use crate::model::{imputed_matrix, TrainedModel};
use crate::storage::ScoreRecord;
use tracing::{debug, info};

pub struct AnomalyScorer<'a> {
    trained: &'a TrainedModel,
}

impl<'a> AnomalyScorer<'a> {
    pub fn new(trained: &'a TrainedModel) -> Self {
        Self { trained }
    }

    /// One score per feature row, in row order.
    ///
    /// Medians used to impute missing cells come from `table` itself, not from
    /// the training set; only the min/max bounds are reused from training.
    pub fn score(&self, table: &FeatureTable) -> Result<Vec<ScoreRecord>> {
        let columns = &self.trained.scaler.columns;
        let missing = table.missing_columns(columns.iter().map(String::as_str));
        if !missing.is_empty() {
            return Err(Error::missing_columns("feature table", missing));
        }
        if table.is_empty() {
            return Err(Error::EmptyInput("no feature rows to score".into()));
        }

        let raw = imputed_matrix(table, columns)?;
        let scaled = self
            .trained
            .scaler
            .transform(columns, &raw)?
            .mapv(|x| x.clamp(0.0, 1.0));
        let errors = self.trained.model.reconstruction_errors(&scaled)?;

        let scores: Vec<ScoreRecord> = table
            .exec_ids
            .iter()
            .zip(errors.iter())
            .map(|(id, &re)| {
                debug_assert!(re.is_finite());
                ScoreRecord {
                    exec_id: id.clone(),
                    re,
                }
            })
            .collect();

        info!(rows = scores.len(), columns = columns.len(), "executions scored");
        if let Some(max) = scores.iter().map(|s| s.re).reduce(f64::max) {
            debug!(max_re = max, "score range");
        }
        Ok(scores)
    }
}
