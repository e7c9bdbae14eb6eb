//! Order statistics shared by feature extraction, scoring and aggregation.
//! Non-finite inputs are skipped everywhere.

use std::cmp::Ordering;

fn sorted_finite(values: &[f64]) -> Vec<f64> {
    let mut v: Vec<f64> = values.iter().copied().filter(|x| x.is_finite()).collect();
    v.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    v
}

/// Quantile `q ∈ [0,1]` with linear interpolation between order statistics
/// (`pos = q·(n−1)`). `None` for an empty sample.
pub fn quantile(values: &[f64], q: f64) -> Option<f64> {
    let sorted = sorted_finite(values);
    quantile_sorted(&sorted, q)
}

pub fn quantile_sorted(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() || !q.is_finite() {
        return None;
    }
    let q = q.clamp(0.0, 1.0);
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let lo_v = *sorted.get(lo)?;
    let hi_v = *sorted.get(hi)?;
    Some(lo_v + (hi_v - lo_v) * (pos - lo as f64))
}

pub fn median(values: &[f64]) -> Option<f64> {
    quantile(values, 0.5)
}

pub fn mean(values: &[f64]) -> Option<f64> {
    let (sum, n) = values
        .iter()
        .filter(|x| x.is_finite())
        .fold((0.0, 0usize), |(s, n), x| (s + x, n + 1));
    (n > 0).then(|| sum / n as f64)
}

/// Population standard deviation (divisor `n`).
pub fn std_dev(values: &[f64]) -> Option<f64> {
    let mu = mean(values)?;
    let (ss, n) = values
        .iter()
        .filter(|x| x.is_finite())
        .fold((0.0, 0usize), |(s, n), x| (s + (x - mu).powi(2), n + 1));
    Some((ss / n as f64).sqrt())
}

/// Fill `None` cells with the median of the present ones; `fallback` when none are present.
pub fn impute_median(column: &[Option<f64>], fallback: f64) -> Vec<f64> {
    let present: Vec<f64> = column.iter().flatten().copied().collect();
    let fill = median(&present).unwrap_or(fallback);
    column
        .iter()
        .map(|v| (*v).filter(|x| x.is_finite()).unwrap_or(fill))
        .collect()
}

/// `Some(v)` only for finite values; used before anything reaches JSON.
pub fn finite(v: f64) -> Option<f64> {
    v.is_finite().then_some(v)
}
