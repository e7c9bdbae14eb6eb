//! Scaler, RBM training/reconstruction, and scoring against trained artifacts.

use jobrisk::{
    config::{ModelConfig, PreprocessConfig},
    features::{FeatureExtractor, FeatureTable, FEATURE_COLUMNS},
    model::{self, ModelState, ScalerState},
    scoring::AnomalyScorer,
    stats,
    synthetic::{self, SyntheticConfig},
    Error, ErrorKind,
};
use ndarray::{array, Array2};

fn cols(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

fn small_config() -> ModelConfig {
    ModelConfig {
        hidden_units: 8,
        epochs: 20,
        batch_size: 16,
        ..ModelConfig::default()
    }
}

fn synthetic_table(days: u32) -> FeatureTable {
    let records = synthetic::generate(&SyntheticConfig {
        days,
        ..SyntheticConfig::default()
    });
    let vectors = FeatureExtractor::new(Default::default())
        .extract(&records)
        .unwrap();
    FeatureTable::from_vectors(&vectors)
}

#[test]
fn scaler_transform_of_fit_data_spans_unit_interval() {
    let names = cols(&["a", "b"]);
    let m = array![[2.0, -1.0], [4.0, 0.0], [3.0, 1.0]];
    let scaler = ScalerState::fit(&names, &m).unwrap();
    let out = scaler.transform(&names, &m).unwrap();
    assert_eq!(out, array![[0.0, 0.0], [1.0, 0.5], [0.5, 1.0]]);

    // data already spanning [0,1] is reproduced exactly
    let unit = array![[0.0, 1.0], [0.25, 0.0], [1.0, 0.5]];
    let scaler = ScalerState::fit(&names, &unit).unwrap();
    assert_eq!(scaler.transform(&names, &unit).unwrap(), unit);
}

#[test]
fn scaler_clamps_out_of_range_and_rejects_other_schemas() {
    let names = cols(&["a", "b"]);
    let scaler = ScalerState::fit(&names, &array![[0.0, 5.0], [10.0, 5.0]]).unwrap();
    let out = scaler.transform(&names, &array![[-5.0, 5.0], [20.0, 9.0]]).unwrap();
    assert_eq!(out, array![[0.0, 0.0], [1.0, 1.0]]);

    let swapped = cols(&["b", "a"]);
    let err = scaler.transform(&swapped, &array![[1.0, 1.0]]).unwrap_err();
    assert!(matches!(err, Error::SchemaMismatch(_)));
    assert_eq!(err.kind(), ErrorKind::SchemaViolation);
    assert!(scaler.transform(&names, &array![[1.0, 1.0, 1.0]]).is_err());
}

#[test]
fn rbm_training_is_deterministic() {
    let table = synthetic_table(10);
    let cfg = small_config();
    let a = model::train(&table, &PreprocessConfig::default(), &cfg).unwrap();
    let b = model::train(&table, &PreprocessConfig::default(), &cfg).unwrap();
    assert_eq!(a, b);

    let sa = AnomalyScorer::new(&a).score(&table).unwrap();
    let sb = AnomalyScorer::new(&b).score(&table).unwrap();
    assert_eq!(sa, sb);

    let other = model::train(
        &table,
        &PreprocessConfig::default(),
        &ModelConfig { seed: 7, ..cfg },
    )
    .unwrap();
    assert_ne!(a.model, other.model);
}

#[test]
fn reconstruction_is_bounded_and_errors_non_negative() {
    let data = Array2::from_shape_fn((40, 5), |(i, j)| ((i * 7 + j * 3) % 11) as f64 / 10.0);
    let model = ModelState::train(&data, &small_config()).unwrap();
    assert_eq!(model.weights.dim(), (5, 8));

    let recon = model.reconstruct(&data).unwrap();
    assert_eq!(recon.dim(), data.dim());
    assert!(recon.iter().all(|v| (0.0..=1.0).contains(v)));

    let errors = model.reconstruction_errors(&data).unwrap();
    assert_eq!(errors.len(), 40);
    assert!(errors.iter().all(|e| e.is_finite() && *e >= 0.0));

    assert!(model.reconstruct(&Array2::zeros((2, 4))).is_err());
}

#[test]
fn training_drops_constant_columns_and_binarizes_on_request() {
    let mut table = synthetic_table(5);
    table.columns.push("constant".into());
    for row in &mut table.rows {
        row.push(Some(0.3));
    }

    let trained = model::train(&table, &PreprocessConfig::default(), &small_config()).unwrap();
    assert!(!trained.scaler.columns.contains(&"constant".to_string()));
    assert_eq!(trained.model.visible_dim, trained.scaler.columns.len());

    let keep_all = PreprocessConfig {
        drop_constant_columns: false,
        binarize: true,
        ..PreprocessConfig::default()
    };
    let trained = model::train(&table, &keep_all, &small_config()).unwrap();
    assert_eq!(trained.scaler.columns.len(), FEATURE_COLUMNS.len() + 1);
}

#[test]
fn training_rejects_empty_tables() {
    let err = model::train(
        &FeatureTable::default(),
        &PreprocessConfig::default(),
        &small_config(),
    )
    .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::EmptyInput);
}

#[test]
fn scorer_requires_trained_columns() {
    let table = synthetic_table(5);
    let trained = model::train(&table, &PreprocessConfig::default(), &small_config()).unwrap();

    let mut partial = table.clone();
    let idx = partial.column_index("failed").unwrap();
    partial.columns.remove(idx);
    for row in &mut partial.rows {
        row.remove(idx);
    }
    let err = AnomalyScorer::new(&trained).score(&partial).unwrap_err();
    match err {
        Error::MissingColumns { columns, .. } => assert_eq!(columns, vec!["failed".to_string()]),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn scorer_imputes_missing_cells_from_the_scoring_batch() {
    let table = synthetic_table(5);
    let trained = model::train(&table, &PreprocessConfig::default(), &small_config()).unwrap();
    let col = table.column_index("duration_mm").unwrap();
    let training_median = stats::median(
        &table
            .column("duration_mm")
            .unwrap()
            .into_iter()
            .flatten()
            .collect::<Vec<_>>(),
    )
    .unwrap();

    // scoring batch whose duration column sits far from the training median
    let mut batch = table.clone();
    for row in &mut batch.rows {
        row[col] = Some(0.9);
    }
    batch.rows[0][col] = None;
    assert!((training_median - 0.9).abs() > 0.1);

    let scorer = AnomalyScorer::new(&trained);
    let gappy = scorer.score(&batch).unwrap();

    let mut filled = batch.clone();
    filled.rows[0][col] = Some(0.9);
    assert_eq!(gappy[0].re, scorer.score(&filled).unwrap()[0].re);

    filled.rows[0][col] = Some(training_median);
    assert_ne!(gappy[0].re, scorer.score(&filled).unwrap()[0].re);

    let mut blank = batch.clone();
    blank.rows[1] = vec![None; blank.columns.len()];
    let scores = scorer.score(&blank).unwrap();
    assert_eq!(scores.len(), table.len());
    assert_eq!(scores[0].exec_id, table.exec_ids[0]);
    assert!(scores.iter().all(|s| s.re.is_finite() && s.re >= 0.0));
}

#[test]
fn binarize_changes_the_trained_model() {
    let table = synthetic_table(10);
    let plain = model::train(&table, &PreprocessConfig::default(), &small_config()).unwrap();
    let binary = PreprocessConfig {
        binarize: true,
        ..PreprocessConfig::default()
    };
    let a = model::train(&table, &binary, &small_config()).unwrap();
    let b = model::train(&table, &binary, &small_config()).unwrap();
    assert_eq!(a, b);
    assert_eq!(a.scaler, plain.scaler);
    assert_ne!(a.model, plain.model);
}

#[test]
fn mean_field_positive_phase_is_deterministic_and_distinct() {
    let table = synthetic_table(10);
    let sampled = model::train(&table, &PreprocessConfig::default(), &small_config()).unwrap();
    let mean_field = ModelConfig {
        sample_hidden: false,
        ..small_config()
    };
    let a = model::train(&table, &PreprocessConfig::default(), &mean_field).unwrap();
    let b = model::train(&table, &PreprocessConfig::default(), &mean_field).unwrap();
    assert_eq!(a, b);
    assert_ne!(a.model, sampled.model);
}

#[test]
fn inflated_runs_score_higher_on_average() {
    let records = synthetic::generate(&SyntheticConfig::default());
    let vectors = FeatureExtractor::new(Default::default())
        .extract(&records)
        .unwrap();
    let table = FeatureTable::from_vectors(&vectors);
    let trained = model::train(&table, &PreprocessConfig::default(), &ModelConfig::default()).unwrap();
    let scores = AnomalyScorer::new(&trained).score(&table).unwrap();

    let mean = |flag: f64| {
        let picked: Vec<f64> = vectors
            .iter()
            .zip(&scores)
            .filter(|(v, _)| v.high_runtime == flag)
            .map(|(_, s)| s.re)
            .collect();
        picked.iter().sum::<f64>() / picked.len() as f64
    };
    assert!(mean(1.0) > mean(0.0));
}
