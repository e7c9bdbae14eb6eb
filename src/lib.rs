//! jobrisk — anomaly scoring and risk reporting for scheduled job executions.
//!
//! Modular structure:
//! - [`ingest`] — Execution feed reading and schema normalization
//! - [`features`] — Per-execution feature extraction
//! - [`model`] — Min-max scaler and RBM reconstruction model
//! - [`scoring`] — Reconstruction-error scoring
//! - [`risk`] — Risk report aggregation
//! - [`storage`] — Versioned artifacts and CSV tables, written atomically
//! - [`pipeline`] — Stage orchestration
//! - [`logging`] — Structured JSON logging

pub mod config;
pub mod error;
pub mod features;
pub mod ingest;
pub mod logging;
pub mod model;
pub mod pipeline;
pub mod risk;
pub mod scoring;
pub mod stats;
pub mod storage;
pub mod synthetic;

pub use config::PipelineConfig;
pub use error::{Error, ErrorKind, Result};
pub use features::{FeatureExtractor, FeatureTable, FeatureVector};
pub use ingest::{ExecutionRecord, Status};
pub use logging::StructuredLogger;
pub use model::{ModelState, ScalerState, TrainedModel};
pub use pipeline::Pipeline;
pub use risk::{RiskAggregator, RiskReport};
pub use scoring::AnomalyScorer;
pub use storage::ScoreRecord;
