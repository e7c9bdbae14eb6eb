//! Pipeline configuration. One explicit object handed to every stage; all defaults live here.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Input/output locations for every stage
    pub paths: PathsConfig,
    /// Feature extraction parameters
    pub features: FeaturesConfig,
    /// Training-time matrix preparation
    pub preprocessing: PreprocessConfig,
    /// RBM hyperparameters
    pub model: ModelConfig,
    /// Report size limits
    pub report: ReportConfig,
    /// Logging
    pub log: LogConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Normalized execution feed (CSV)
    pub executions: PathBuf,
    /// Feature file written by `features`, read by `train` and `score`
    pub features: PathBuf,
    /// Directory holding `scaler.json` and `model.json`
    pub model_dir: PathBuf,
    /// Score file written by `score`
    pub scores: PathBuf,
    /// Risk report written by `report`
    pub report: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeaturesConfig {
    /// Clip bound for the duration z-score
    pub z_clip: f64,
    /// Percentile above which a run counts as high runtime
    pub high_runtime_quantile: f64,
    /// Minimum runs a job needs before its own percentile is trusted
    pub min_job_samples: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreprocessConfig {
    /// Hard-binarize the scaled training matrix
    pub binarize: bool,
    pub binarize_threshold: f64,
    /// Drop columns with a single distinct value before fitting the scaler
    pub drop_constant_columns: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    pub hidden_units: usize,
    pub learning_rate: f64,
    pub epochs: usize,
    pub batch_size: usize,
    pub seed: u64,
    /// Draw Bernoulli hidden samples in the positive phase (otherwise use probabilities)
    pub sample_hidden: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    pub quantile: f64,
    pub max_jobs: usize,
    pub max_hotspots: usize,
    /// Size of the sampled-hotspot prefix (capped by `max_hotspots`)
    pub max_samples: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub level: String,
    pub json: bool,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            executions: PathBuf::from("data/execucoes.csv"),
            features: PathBuf::from("data/features.csv"),
            model_dir: PathBuf::from("models"),
            scores: PathBuf::from("data/score.csv"),
            report: PathBuf::from("app/ai_analysis.json"),
        }
    }
}

impl Default for FeaturesConfig {
    fn default() -> Self {
        Self {
            z_clip: 3.0,
            high_runtime_quantile: 0.95,
            min_job_samples: 1,
        }
    }
}

impl Default for PreprocessConfig {
    fn default() -> Self {
        Self {
            binarize: false,
            binarize_threshold: 0.5,
            drop_constant_columns: true,
        }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            hidden_units: 32,
            learning_rate: 0.01,
            epochs: 50,
            batch_size: 64,
            seed: 42,
            sample_hidden: true,
        }
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            quantile: 0.95,
            max_jobs: 200,
            max_hotspots: 50,
            max_samples: 100,
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: true,
        }
    }
}

impl PathsConfig {
    /// All paths rooted under one directory, using the default file names.
    pub fn under(root: &Path) -> Self {
        let d = Self::default();
        Self {
            executions: root.join(d.executions),
            features: root.join(d.features),
            model_dir: root.join(d.model_dir),
            scores: root.join(d.scores),
            report: root.join(d.report),
        }
    }

    pub fn scaler_path(&self) -> PathBuf {
        self.model_dir.join("scaler.json")
    }

    pub fn model_path(&self) -> PathBuf {
        self.model_dir.join("model.json")
    }
}

impl PipelineConfig {
    /// Load from JSON file if present; otherwise return default.
    /// A file that exists but does not parse is an error rather than a silent fallback.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "config file not found; using defaults");
            return Ok(Self::default());
        }
        let data = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&data)?)
    }
}
