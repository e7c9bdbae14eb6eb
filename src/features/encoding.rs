//! Column encodings. Each returns values in `[0,1]`; degenerate inputs map to fixed fallbacks.

use crate::stats;
use std::collections::HashMap;
use std::f64::consts::PI;

/// Min-max over the whole column; all zeros when max == min or the column is not finite.
pub fn minmax_01(values: &[f64]) -> Vec<f64> {
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if !min.is_finite() || !max.is_finite() || max == min {
        return vec![0.0; values.len()];
    }
    values
        .iter()
        .map(|v| ((v - min) / (max - min)).clamp(0.0, 1.0))
        .collect()
}

/// Population z-score clipped to `[-clip, clip]`, remapped to `[0,1]`.
/// Midpoint 0.5 everywhere when the standard deviation is zero or not finite.
pub fn zclip_01(values: &[f64], clip: f64) -> Vec<f64> {
    let (mu, sd) = match (stats::mean(values), stats::std_dev(values)) {
        (Some(mu), Some(sd)) if sd.is_finite() && sd > 0.0 => (mu, sd),
        _ => return vec![0.5; values.len()],
    };
    values
        .iter()
        .map(|v| {
            let z = ((v - mu) / sd).clamp(-clip, clip);
            ((z + clip) / (2.0 * clip)).clamp(0.0, 1.0)
        })
        .collect()
}

/// Sine/cosine of `2π·(v mod period)/period`, each remapped from `[-1,1]` to `[0,1]`.
pub fn cyclic_01(value: f64, period: f64) -> (f64, f64) {
    let angle = 2.0 * PI * value.rem_euclid(period) / period;
    (
        ((angle.sin() + 1.0) / 2.0).clamp(0.0, 1.0),
        ((angle.cos() + 1.0) / 2.0).clamp(0.0, 1.0),
    )
}

/// 1 where a duration exceeds its group's `quantile` threshold, else 0.
/// Groups with fewer than `min_samples` members use the global threshold.
pub fn high_runtime_flags<K>(keys: &[K], durations: &[f64], quantile: f64, min_samples: usize) -> Vec<f64>
where
    K: std::hash::Hash + Eq,
{
    let mut groups: HashMap<&K, Vec<f64>> = HashMap::new();
    for (k, d) in keys.iter().zip(durations) {
        groups.entry(k).or_default().push(*d);
    }
    let global = stats::quantile(durations, quantile).unwrap_or(f64::INFINITY);
    let thresholds: HashMap<&K, f64> = groups
        .into_iter()
        .map(|(k, ds)| {
            let thr = if ds.len() >= min_samples.max(1) {
                stats::quantile(&ds, quantile).unwrap_or(global)
            } else {
                global
            };
            (k, thr)
        })
        .collect();

    keys.iter()
        .zip(durations)
        .map(|(k, d)| {
            let thr = thresholds.get(k).copied().unwrap_or(global);
            if *d > thr {
                1.0
            } else {
                0.0
            }
        })
        .collect()
}
