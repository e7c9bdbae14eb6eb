//! Statistical feature extraction from execution records.

mod encoding;
mod pipeline;

pub use encoding::{cyclic_01, high_runtime_flags, minmax_01, zclip_01};
pub use pipeline::FeatureExtractor;

use serde::{Deserialize, Serialize};

/// Number of numeric features per execution.
pub const FEATURE_DIM: usize = 8;

/// Canonical feature column order of the feature file.
pub const FEATURE_COLUMNS: [&str; FEATURE_DIM] = [
    "duration_mm",
    "duration_z_clipped_mm",
    "hour_sin_mm",
    "hour_cos_mm",
    "weekday_sin_mm",
    "weekday_cos_mm",
    "failed",
    "high_runtime",
];

/// Fixed-size, `[0,1]`-bounded feature vector for one execution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    pub exec_id: String,
    pub duration_mm: f64,
    pub duration_z_clipped_mm: f64,
    pub hour_sin_mm: f64,
    pub hour_cos_mm: f64,
    pub weekday_sin_mm: f64,
    pub weekday_cos_mm: f64,
    pub failed: f64,
    pub high_runtime: f64,
}

impl FeatureVector {
    /// Values in [`FEATURE_COLUMNS`] order.
    pub fn values(&self) -> [f64; FEATURE_DIM] {
        [
            self.duration_mm,
            self.duration_z_clipped_mm,
            self.hour_sin_mm,
            self.hour_cos_mm,
            self.weekday_sin_mm,
            self.weekday_cos_mm,
            self.failed,
            self.high_runtime,
        ]
    }
}

/// In-memory form of the feature file. Cells are `None` where the file held
/// an empty or non-numeric value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureTable {
    pub columns: Vec<String>,
    pub exec_ids: Vec<String>,
    pub rows: Vec<Vec<Option<f64>>>,
}

impl FeatureTable {
    pub fn from_vectors(vectors: &[FeatureVector]) -> Self {
        Self {
            columns: FEATURE_COLUMNS.iter().map(|c| c.to_string()).collect(),
            exec_ids: vectors.iter().map(|v| v.exec_id.clone()).collect(),
            rows: vectors
                .iter()
                .map(|v| v.values().iter().map(|x| Some(*x)).collect())
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// One column's cells, top to bottom.
    pub fn column(&self, name: &str) -> Option<Vec<Option<f64>>> {
        let idx = self.column_index(name)?;
        Some(
            self.rows
                .iter()
                .map(|r| r.get(idx).copied().flatten())
                .collect(),
        )
    }

    /// Names from `wanted` that this table lacks.
    pub fn missing_columns<'a>(&self, wanted: impl IntoIterator<Item = &'a str>) -> Vec<String> {
        wanted
            .into_iter()
            .filter(|w| self.column_index(w).is_none())
            .map(String::from)
            .collect()
    }
}
