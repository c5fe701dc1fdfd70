//! Weighted moments and log-space reductions.

/// Weighted arithmetic mean.
///
/// Returns NaN for empty input or zero total weight.
pub fn weighted_mean(values: &[f64], weights: &[f64]) -> f64 {
    debug_assert_eq!(values.len(), weights.len());
    let total: f64 = weights.iter().sum();
    if values.is_empty() || total == 0.0 {
        return f64::NAN;
    }
    values
        .iter()
        .zip(weights)
        .map(|(x, w)| x * w)
        .sum::<f64>()
        / total
}

/// Unbiased weighted variance, treating weights as reliability weights.
///
/// ```text
/// var = Σ wᵢ (xᵢ - μ)² / (V₁ - V₂/V₁),   V₁ = Σ wᵢ,  V₂ = Σ wᵢ²
/// ```
///
/// With unit weights this is the usual `n - 1` sample variance. Returns NaN
/// when fewer than two effective samples are available.
pub fn weighted_variance(values: &[f64], weights: &[f64]) -> f64 {
    let mean = weighted_mean(values, weights);
    if mean.is_nan() {
        return f64::NAN;
    }
    let v1: f64 = weights.iter().sum();
    let v2: f64 = weights.iter().map(|w| w * w).sum();
    let denom = v1 - v2 / v1;
    if denom <= 0.0 {
        return f64::NAN;
    }
    values
        .iter()
        .zip(weights)
        .map(|(x, w)| w * (x - mean) * (x - mean))
        .sum::<f64>()
        / denom
}

/// Weighted standard deviation, the square root of [`weighted_variance`].
pub fn weighted_std(values: &[f64], weights: &[f64]) -> f64 {
    weighted_variance(values, weights).sqrt()
}

/// `ln Σ exp(xᵢ)` without overflow.
///
/// Returns negative infinity for empty input or when every term is `-inf`.
pub fn logsumexp(values: &[f64]) -> f64 {
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if max == f64::NEG_INFINITY {
        return f64::NEG_INFINITY;
    }
    if max.is_infinite() {
        return max;
    }
    max + values.iter().map(|x| (x - max).exp()).sum::<f64>().ln()
}
