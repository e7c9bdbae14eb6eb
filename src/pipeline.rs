//! Stage orchestration: each stage reads its complete input from disk, computes a
//! complete output, and writes it atomically. A failed stage writes nothing.

use crate::config::PipelineConfig;
use crate::error::Result;
use crate::features::{FeatureExtractor, FeatureTable};
use crate::ingest::read_executions;
use crate::model::{self, TrainedModel};
use crate::risk::{RiskAggregator, RiskReport};
use crate::scoring::AnomalyScorer;
use crate::storage::{
    load_artifacts, read_features, read_scores, save_artifacts, write_atomic, write_features,
    write_scores, ScoreRecord,
};
use std::io::Write;
use tracing::info;

/// Outcome of the training stage.
#[derive(Debug, Clone)]
pub struct TrainingRun {
    pub trained: TrainedModel,
    /// Feature rows the model was fitted on
    pub rows: usize,
}

pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Execution feed → feature file.
    pub fn build_features(&self) -> Result<FeatureTable> {
        let records = read_executions(&self.config.paths.executions)?;
        let vectors = FeatureExtractor::new(self.config.features.clone()).extract(&records)?;
        let table = FeatureTable::from_vectors(&vectors);
        write_features(&self.config.paths.features, &table)?;
        Ok(table)
    }

    /// Feature file → scaler and model artifacts.
    pub fn train(&self) -> Result<TrainingRun> {
        let table = read_features(&self.config.paths.features)?;
        let trained = model::train(&table, &self.config.preprocessing, &self.config.model)?;
        save_artifacts(&self.config.paths, &trained)?;
        Ok(TrainingRun {
            trained,
            rows: table.len(),
        })
    }

    /// Feature file + artifacts → score file.
    pub fn score(&self) -> Result<Vec<ScoreRecord>> {
        let trained = load_artifacts(&self.config.paths)?;
        let table = read_features(&self.config.paths.features)?;
        let scores = AnomalyScorer::new(&trained).score(&table)?;
        write_scores(&self.config.paths.scores, &scores)?;
        Ok(scores)
    }

    /// Execution feed + score file → risk report.
    pub fn report(&self) -> Result<RiskReport> {
        let records = read_executions(&self.config.paths.executions)?;
        let scores = read_scores(&self.config.paths.scores)?;
        let report = RiskAggregator::new(self.config.report.clone()).aggregate(&records, &scores)?;
        let path = &self.config.paths.report;
        write_atomic(path, |w| {
            serde_json::to_writer_pretty(&mut *w, &report)?;
            writeln!(w)?;
            Ok(())
        })?;
        info!(path = %path.display(), "risk report written");
        Ok(report)
    }

    /// All stages in order; stops at the first failure.
    pub fn run(&self) -> Result<RiskReport> {
        self.build_features()?;
        self.train()?;
        self.score()?;
        self.report()
    }
}
