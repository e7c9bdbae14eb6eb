//! Per-column min-max scaler. Fitted once; the stored column order is part of its identity.

use crate::error::{Error, Result};
use ndarray::{Array2, Axis};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScalerState {
    pub columns: Vec<String>,
    pub data_min: Vec<f64>,
    pub data_max: Vec<f64>,
}

impl ScalerState {
    pub fn fit(columns: &[String], matrix: &Array2<f64>) -> Result<Self> {
        if matrix.nrows() == 0 {
            return Err(Error::EmptyInput("cannot fit scaler on zero rows".into()));
        }
        if matrix.ncols() != columns.len() {
            return Err(Error::SchemaMismatch(format!(
                "{} column names for a matrix of width {}",
                columns.len(),
                matrix.ncols()
            )));
        }
        let data_min = matrix
            .axis_iter(Axis(1))
            .map(|c| c.iter().copied().fold(f64::INFINITY, f64::min))
            .collect();
        let data_max = matrix
            .axis_iter(Axis(1))
            .map(|c| c.iter().copied().fold(f64::NEG_INFINITY, f64::max))
            .collect();
        Ok(Self {
            columns: columns.to_vec(),
            data_min,
            data_max,
        })
    }

    /// Scale each column into `[0,1]`, clamping values outside the fitted range.
    /// A zero-width range is treated as width 1.
    pub fn transform(&self, columns: &[String], matrix: &Array2<f64>) -> Result<Array2<f64>> {
        if columns != self.columns.as_slice() {
            return Err(Error::SchemaMismatch(format!(
                "scaler fitted on [{}], got [{}]",
                self.columns.join(", "),
                columns.join(", ")
            )));
        }
        if matrix.ncols() != self.columns.len() {
            return Err(Error::SchemaMismatch(format!(
                "scaler expects {} columns, matrix has {}",
                self.columns.len(),
                matrix.ncols()
            )));
        }
        let mut out = matrix.clone();
        for (j, mut col) in out.axis_iter_mut(Axis(1)).enumerate() {
            let min = self.data_min[j];
            let range = self.data_max[j] - min;
            let range = if range == 0.0 || !range.is_finite() { 1.0 } else { range };
            col.mapv_inplace(|x| ((x - min) / range).clamp(0.0, 1.0));
        }
        Ok(out)
    }

    /// Structural sanity check for a deserialized scaler.
    pub fn validate(&self) -> Result<()> {
        let n = self.columns.len();
        if n == 0 || self.data_min.len() != n || self.data_max.len() != n {
            return Err(Error::IncompatibleArtifact(format!(
                "scaler has {} columns, {} minima, {} maxima",
                n,
                self.data_min.len(),
                self.data_max.len()
            )));
        }
        if self
            .data_min
            .iter()
            .chain(&self.data_max)
            .any(|v| !v.is_finite())
        {
            return Err(Error::IncompatibleArtifact("scaler bounds are not finite".into()));
        }
        Ok(())
    }
}
