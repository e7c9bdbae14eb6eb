//! Storage benchmark: atomic table writes and artifact save/load.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use jobrisk::config::{ModelConfig, PathsConfig, PreprocessConfig};
use jobrisk::features::{FeatureExtractor, FeatureTable};
use jobrisk::model;
use jobrisk::storage::{load_artifacts, save_artifacts, write_scores, ScoreRecord};
use jobrisk::synthetic::{self, SyntheticConfig};
use tempfile::tempdir;

fn bench_write_scores(c: &mut Criterion) {
    let dir = tempdir().unwrap();
    let path = dir.path().join("score.csv");
    let scores: Vec<ScoreRecord> = (0..2160)
        .map(|i| ScoreRecord {
            exec_id: (100_000 + i).to_string(),
            re: i as f64 / 2160.0,
        })
        .collect();

    c.bench_function("storage_write_scores", |b| {
        b.iter(|| write_scores(&path, black_box(&scores)).unwrap())
    });
}

fn bench_artifact_roundtrip(c: &mut Criterion) {
    let dir = tempdir().unwrap();
    let paths = PathsConfig::under(dir.path());
    let records = synthetic::generate(&SyntheticConfig {
        days: 10,
        ..SyntheticConfig::default()
    });
    let vectors = FeatureExtractor::new(Default::default())
        .extract(&records)
        .unwrap();
    let table = FeatureTable::from_vectors(&vectors);
    let cfg = ModelConfig {
        epochs: 1,
        ..ModelConfig::default()
    };
    let trained = model::train(&table, &PreprocessConfig::default(), &cfg).unwrap();

    c.bench_function("storage_save_artifacts", |b| {
        b.iter(|| save_artifacts(&paths, black_box(&trained)).unwrap())
    });
    save_artifacts(&paths, &trained).unwrap();
    c.bench_function("storage_load_artifacts", |b| {
        b.iter(|| black_box(load_artifacts(&paths)).unwrap())
    });
}

criterion_group!(benches, bench_write_scores, bench_artifact_roundtrip);
criterion_main!(benches);
