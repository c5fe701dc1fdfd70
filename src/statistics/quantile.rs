//! Weighted quantiles.
//!
//! Each sample is placed at the midpoint of its weight interval on the
//! normalised cumulative weight axis:
//!
//! ```text
//! cᵢ = (Σ_{j<i} wⱼ + wᵢ/2) / Σ wⱼ
//! ```
//!
//! and the quantile at probability `p` is linearly interpolated between
//! the neighbouring `cᵢ`. Probabilities outside `[c₀, c_{n-1}]` clamp to the
//! extreme samples. With unit weights this reduces to the Hazen (Type 5)
//! estimator of Hyndman & Fan (1996).

/// Compute a weighted quantile.
///
/// Returns NaN if there are no samples with positive weight, or if `p` is
/// outside `[0, 1]`.
pub fn weighted_quantile(values: &[f64], weights: &[f64], p: f64) -> f64 {
    let sorted = sorted_pairs(values, weights);
    quantile_sorted(&sorted, p)
}

/// Compute several weighted quantiles, sorting the input once.
pub fn weighted_quantiles(values: &[f64], weights: &[f64], probs: &[f64]) -> Vec<f64> {
    let sorted = sorted_pairs(values, weights);
    probs.iter().map(|&p| quantile_sorted(&sorted, p)).collect()
}

fn sorted_pairs(values: &[f64], weights: &[f64]) -> Vec<(f64, f64)> {
    debug_assert_eq!(values.len(), weights.len());
    let mut pairs: Vec<(f64, f64)> = values
        .iter()
        .copied()
        .zip(weights.iter().copied())
        .filter(|&(x, w)| w > 0.0 && !x.is_nan())
        .collect();
    pairs.sort_by(|a, b| a.0.total_cmp(&b.0));
    pairs
}

fn quantile_sorted(pairs: &[(f64, f64)], p: f64) -> f64 {
    if pairs.is_empty() || !(0.0..=1.0).contains(&p) {
        return f64::NAN;
    }
    if pairs.len() == 1 {
        return pairs[0].0;
    }

    let total: f64 = pairs.iter().map(|&(_, w)| w).sum();
    let mut cum = 0.0;
    let positions: Vec<f64> = pairs
        .iter()
        .map(|&(_, w)| {
            let c = (cum + w / 2.0) / total;
            cum += w;
            c
        })
        .collect();

    if p <= positions[0] {
        return pairs[0].0;
    }
    let last = pairs.len() - 1;
    if p >= positions[last] {
        return pairs[last].0;
    }

    // First position strictly greater than p; guaranteed in 1..=last.
    let hi = positions.partition_point(|&c| c <= p);
    let lo = hi - 1;
    let span = positions[hi] - positions[lo];
    let t = if span > 0.0 { (p - positions[lo]) / span } else { 0.0 };
    pairs[lo].0 + t * (pairs[hi].0 - pairs[lo].0)
}
