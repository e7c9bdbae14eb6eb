//! Versioned scaler/model artifacts. Both files carry the same schema fingerprint
//! so a scaler is never paired with a model trained against another column set.

use super::write_atomic;
use crate::config::{ModelConfig, PathsConfig, PreprocessConfig};
use crate::error::{Error, Result};
use crate::ingest::hex_prefix;
use crate::model::{ModelState, ScalerState, TrainedModel};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::io::Write;
use std::path::Path;
use tracing::info;

pub const FORMAT_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScalerArtifact {
    pub format_version: u32,
    pub schema_fingerprint: String,
    pub preprocessing: PreprocessConfig,
    pub scaler: ScalerState,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub format_version: u32,
    pub schema_fingerprint: String,
    pub hyperparameters: ModelConfig,
    pub model: ModelState,
}

/// First 16 hex chars of SHA-256 over the column list and model dimensions.
pub fn schema_fingerprint(columns: &[String], visible_dim: usize, hidden_dim: usize) -> String {
    let mut hasher = Sha256::new();
    for c in columns {
        hasher.update(c.as_bytes());
        hasher.update([0u8]);
    }
    hasher.update(format!("{}x{}", visible_dim, hidden_dim).as_bytes());
    hex_prefix(&hasher.finalize(), 16)
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    write_atomic(path, |w| {
        serde_json::to_writer_pretty(&mut *w, value)?;
        writeln!(w)?;
        Ok(())
    })
}

fn read_json<T: DeserializeOwned>(path: &Path, what: &'static str) -> Result<T> {
    if !path.exists() {
        return Err(Error::MissingInput {
            what,
            path: path.to_path_buf(),
        });
    }
    let data = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&data)?)
}

pub fn save_artifacts(paths: &PathsConfig, trained: &TrainedModel) -> Result<()> {
    let fingerprint = schema_fingerprint(
        &trained.scaler.columns,
        trained.model.visible_dim,
        trained.model.hidden_dim,
    );
    write_json(
        &paths.model_path(),
        &ModelArtifact {
            format_version: FORMAT_VERSION,
            schema_fingerprint: fingerprint.clone(),
            hyperparameters: trained.hyperparameters.clone(),
            model: trained.model.clone(),
        },
    )?;
    write_json(
        &paths.scaler_path(),
        &ScalerArtifact {
            format_version: FORMAT_VERSION,
            schema_fingerprint: fingerprint.clone(),
            preprocessing: trained.preprocessing.clone(),
            scaler: trained.scaler.clone(),
        },
    )?;
    info!(dir = %paths.model_dir.display(), %fingerprint, "artifacts saved");
    Ok(())
}

/// Load both artifacts and refuse any pair that was not produced together.
pub fn load_artifacts(paths: &PathsConfig) -> Result<TrainedModel> {
    let scaler: ScalerArtifact = read_json(&paths.scaler_path(), "scaler artifact")?;
    let model: ModelArtifact = read_json(&paths.model_path(), "model artifact")?;

    for (name, version) in [("scaler", scaler.format_version), ("model", model.format_version)] {
        if version != FORMAT_VERSION {
            return Err(Error::IncompatibleArtifact(format!(
                "{} artifact has format version {}, expected {}",
                name, version, FORMAT_VERSION
            )));
        }
    }
    scaler.scaler.validate()?;
    model.model.validate()?;
    if scaler.scaler.columns.len() != model.model.visible_dim {
        return Err(Error::IncompatibleArtifact(format!(
            "scaler has {} columns but model has {} visible units",
            scaler.scaler.columns.len(),
            model.model.visible_dim
        )));
    }
    let expected = schema_fingerprint(
        &scaler.scaler.columns,
        model.model.visible_dim,
        model.model.hidden_dim,
    );
    if scaler.schema_fingerprint != expected || model.schema_fingerprint != expected {
        return Err(Error::IncompatibleArtifact(format!(
            "fingerprint mismatch: scaler {}, model {}, schema {}",
            scaler.schema_fingerprint, model.schema_fingerprint, expected
        )));
    }

    Ok(TrainedModel {
        scaler: scaler.scaler,
        model: model.model,
        preprocessing: scaler.preprocessing,
        hyperparameters: model.hyperparameters,
    })
}
