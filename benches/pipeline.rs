//! Pipeline benchmark: execution records → feature vectors, and one training pass.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use jobrisk::config::{FeaturesConfig, ModelConfig, PreprocessConfig};
use jobrisk::features::{FeatureExtractor, FeatureTable};
use jobrisk::model;
use jobrisk::synthetic::{self, SyntheticConfig};

fn bench_feature_extraction(c: &mut Criterion) {
    let extractor = FeatureExtractor::new(FeaturesConfig::default());
    let records = synthetic::generate(&SyntheticConfig::default());

    c.bench_function("feature_extract_90_days", |b| {
        b.iter(|| black_box(extractor.extract(black_box(&records)).unwrap()))
    });
}

fn bench_train_epoch(c: &mut Criterion) {
    let records = synthetic::generate(&SyntheticConfig::default());
    let vectors = FeatureExtractor::new(FeaturesConfig::default())
        .extract(&records)
        .unwrap();
    let table = FeatureTable::from_vectors(&vectors);
    let cfg = ModelConfig {
        epochs: 1,
        ..ModelConfig::default()
    };

    c.bench_function("train_single_epoch", |b| {
        b.iter(|| model::train(black_box(&table), &PreprocessConfig::default(), &cfg).unwrap())
    });
}

criterion_group!(benches, bench_feature_extraction, bench_train_epoch);
criterion_main!(benches);
