//! Inference benchmark: feature table → reconstruction error.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use jobrisk::config::{ModelConfig, PreprocessConfig};
use jobrisk::features::{FeatureExtractor, FeatureTable};
use jobrisk::model::{self, ModelState};
use jobrisk::scoring::AnomalyScorer;
use jobrisk::synthetic::{self, SyntheticConfig};
use ndarray::Array2;

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

fn bench_score_batch(c: &mut Criterion) {
    let table = synthetic_table(90);
    let cfg = ModelConfig {
        epochs: 5,
        ..ModelConfig::default()
    };
    let trained = model::train(&table, &PreprocessConfig::default(), &cfg).unwrap();
    let scorer = AnomalyScorer::new(&trained);

    c.bench_function("score_2160_rows", |b| {
        b.iter(|| scorer.score(black_box(&table)).unwrap())
    });
}

fn bench_reconstruct_by_hidden(c: &mut Criterion) {
    let data = Array2::from_shape_fn((512, 8), |(i, j)| ((i * 13 + j * 5) % 17) as f64 / 16.0);

    let mut g = c.benchmark_group("reconstruct_by_hidden");
    for hidden in [8, 16, 32, 64] {
        let cfg = ModelConfig {
            hidden_units: hidden,
            epochs: 1,
            ..ModelConfig::default()
        };
        let rbm = ModelState::train(&data, &cfg).unwrap();
        g.bench_function(format!("hidden_{}", hidden).as_str(), |b| {
            b.iter(|| rbm.reconstruction_errors(black_box(&data)).unwrap())
        });
    }
    g.finish();
}

criterion_group!(benches, bench_score_batch, bench_reconstruct_by_hidden);
criterion_main!(benches);
