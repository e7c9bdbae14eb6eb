//! On-disk stage outputs: versioned model artifacts and CSV tables, all written atomically.

mod artifacts;
mod atomic;
mod tables;

pub use artifacts::{
    load_artifacts, save_artifacts, schema_fingerprint, ModelArtifact, ScalerArtifact,
    FORMAT_VERSION,
};
pub use atomic::write_atomic;
pub use tables::{read_features, read_scores, write_features, write_scores, ScoreRecord};
