//! Scaler + RBM anomaly model and the training stage that fits them together.

mod rbm;
mod scaler;

pub use rbm::ModelState;
pub use scaler::ScalerState;

use crate::config::{ModelConfig, PreprocessConfig};
use crate::error::{Error, Result};
use crate::features::FeatureTable;
use crate::stats;
use ndarray::Array2;
use tracing::{info, warn};

/// A scaler and the model trained against it. Meaningless apart.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainedModel {
    pub scaler: ScalerState,
    pub model: ModelState,
    pub preprocessing: PreprocessConfig,
    pub hyperparameters: ModelConfig,
}

/// Select `columns` from `table` in that order, median-imputing each from the
/// table's own values (0 when a column holds no numbers at all).
pub fn imputed_matrix(table: &FeatureTable, columns: &[String]) -> Result<Array2<f64>> {
    let missing = table.missing_columns(columns.iter().map(String::as_str));
    if !missing.is_empty() {
        return Err(Error::missing_columns("feature table", missing));
    }
    let mut out = Array2::zeros((table.len(), columns.len()));
    for (j, name) in columns.iter().enumerate() {
        let cells = table.column(name).unwrap_or_default();
        if cells.iter().all(Option::is_none) && !cells.is_empty() {
            warn!(column = %name, "column has no numeric values; imputing 0");
        }
        for (i, v) in stats::impute_median(&cells, 0.0).into_iter().enumerate() {
            out[[i, j]] = v;
        }
    }
    Ok(out)
}

fn is_constant(matrix: &Array2<f64>, j: usize) -> bool {
    let col = matrix.column(j);
    match col.first() {
        Some(first) => col.iter().all(|v| v == first),
        None => true,
    }
}

/// Training stage: impute, optionally drop constant columns, fit the scaler,
/// scale (and optionally binarize), then fit the RBM.
pub fn train(
    table: &FeatureTable,
    preprocessing: &PreprocessConfig,
    hyperparameters: &ModelConfig,
) -> Result<TrainedModel> {
    if table.is_empty() {
        return Err(Error::EmptyInput("feature table has no rows".into()));
    }
    let full = imputed_matrix(table, &table.columns)?;

    let keep: Vec<usize> = (0..table.columns.len())
        .filter(|&j| !(preprocessing.drop_constant_columns && is_constant(&full, j)))
        .collect();
    if keep.len() < table.columns.len() {
        let dropped: Vec<&str> = (0..table.columns.len())
            .filter(|j| !keep.contains(j))
            .map(|j| table.columns[j].as_str())
            .collect();
        warn!(?dropped, "constant columns removed");
    }
    if keep.is_empty() {
        return Err(Error::EmptyInput("no usable feature columns to train on".into()));
    }
    let columns: Vec<String> = keep.iter().map(|&j| table.columns[j].clone()).collect();
    let raw = full.select(ndarray::Axis(1), &keep);

    let scaler = ScalerState::fit(&columns, &raw)?;
    let mut scaled = scaler.transform(&columns, &raw)?;
    if preprocessing.binarize {
        let thr = preprocessing.binarize_threshold;
        scaled.mapv_inplace(|x| if x >= thr { 1.0 } else { 0.0 });
    }
    debug_assert!(scaled.iter().all(|v| v.is_finite()));
    info!(
        rows = scaled.nrows(),
        columns = scaled.ncols(),
        binarize = preprocessing.binarize,
        "training matrix prepared"
    );

    let model = ModelState::train(&scaled, hyperparameters)?;
    Ok(TrainedModel {
        scaler,
        model,
        preprocessing: preprocessing.clone(),
        hyperparameters: hyperparameters.clone(),
    })
}
