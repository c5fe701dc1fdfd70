//! Evidence, KL divergence and Bayesian dimensionality of a chain.
//!
//! ## Volume compression
//!
//! At iteration `i` the prior volume shrinks by `tᵢ ~ Beta(nᵢ, 1)`, where
//! `nᵢ` is the number of live points. In log space `ln tᵢ = ln(U)/nᵢ` with
//! `U ~ Uniform(0, 1)`; the deterministic variant uses the expectation
//! `E[ln tᵢ] = -1/nᵢ`.
//!
//! ## Per realisation
//!
//! ```text
//! ln Xᵢ   = Σ_{j≤i} ln tⱼ
//! ln ΔXᵢ  = ln Xᵢ₋₁ + ln(1 - tᵢ)
//! ln wᵢ   = ln Lᵢ + ln ΔXᵢ
//! ln Z    = logsumexp(ln w)
//! pᵢ      = exp(ln wᵢ - ln Z)
//! ⟨ln L⟩  = Σ pᵢ ln Lᵢ
//! D_KL    = ⟨ln L⟩ - ln Z
//! d_G     = 2 Σ pᵢ (ln Lᵢ - ⟨ln L⟩)²
//! ```

use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;
use tracing::trace;

use super::NestedSamples;
use crate::error::Result;
use crate::statistics::logsumexp;
use crate::types::StatsTable;

/// Summary statistics of one volume realisation.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Realisation {
    log_z: f64,
    log_l_p: f64,
    d_kl: f64,
    d_g: f64,
}

pub(super) fn compute(
    samples: &NestedSamples,
    nsamples: Option<usize>,
    seed: u64,
) -> Result<StatsTable> {
    let nlive = samples.nlive();
    let logl = samples.logl();
    trace!(
        label = samples.label().unwrap_or("<unnamed>"),
        dead_points = logl.len(),
        nsamples = nsamples.unwrap_or(1),
        "computing chain statistics"
    );

    let rows: Vec<Realisation> = match nsamples {
        None => {
            let log_t: Vec<f64> = nlive.iter().map(|&n| -1.0 / n as f64).collect();
            vec![realise(logl, &log_t)]
        }
        Some(n) => {
            let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
            let mut log_t = vec![0.0; nlive.len()];
            (0..n)
                .map(|_| {
                    for (t, &live) in log_t.iter_mut().zip(&nlive) {
                        // 1 - U lies in (0, 1], keeping the log finite.
                        let u: f64 = rng.gen();
                        *t = (1.0 - u).ln() / live as f64;
                    }
                    realise(logl, &log_t)
                })
                .collect()
        }
    };

    StatsTable::from_parts(
        samples.label().map(str::to_string),
        rows.iter().map(|r| r.log_z).collect(),
        rows.iter().map(|r| r.log_l_p).collect(),
        rows.iter().map(|r| r.d_kl).collect(),
        rows.iter().map(|r| r.d_g).collect(),
    )
}

fn realise(logl: &[f64], log_t: &[f64]) -> Realisation {
    let mut log_x = 0.0;
    let log_w: Vec<f64> = logl
        .iter()
        .zip(log_t)
        .map(|(&l, &t)| {
            let log_dx = log_x + (-t.exp_m1()).ln();
            log_x += t;
            l + log_dx
        })
        .collect();

    let log_z = logsumexp(&log_w);
    let posterior: Vec<f64> = log_w.iter().map(|&w| (w - log_z).exp()).collect();

    let log_l_p: f64 = posterior.iter().zip(logl).map(|(p, l)| p * l).sum();
    let d_g = 2.0
        * posterior
            .iter()
            .zip(logl)
            .map(|(p, l)| p * (l - log_l_p) * (l - log_l_p))
            .sum::<f64>();

    Realisation {
        log_z,
        log_l_p,
        d_kl: log_l_p - log_z,
        d_g,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Chain with constant likelihood: every statistic is known exactly.
    fn flat_chain(n: usize) -> NestedSamples {
        NestedSamples::new(vec![-2.0; n], vec![-1e30; n]).unwrap()
    }

    /// Gaussian-like chain with a fixed number of live points.
    fn gaussian_chain(nlive: usize, iterations: usize) -> NestedSamples {
        // ln L = -X^(2/d)/2 with X = exp(-i/nlive), d = 2
        let logl: Vec<f64> = (0..iterations)
            .map(|i| -0.5 * (-(i as f64) / nlive as f64).exp() * 100.0)
            .collect();
        let mut logl_birth = vec![-1e30; nlive];
        logl_birth.extend_from_slice(&logl[..iterations - nlive]);
        NestedSamples::new(logl, logl_birth).unwrap()
    }

    #[test]
    fn test_flat_likelihood_expected() {
        let n = 50;
        let table = flat_chain(n).stats(None, 0).unwrap();
        assert_eq!(table.len(), 1);

        // Compressions telescope: the dead points cover 1 - X_n of the prior,
        // with ln X_n = -H_n for a draining live set.
        let harmonic: f64 = (1..=n).map(|k| 1.0 / k as f64).sum();
        let covered = (-(-harmonic).exp()).ln_1p();

        assert!((table.log_z()[0] - (-2.0 + covered)).abs() < 1e-10, "logZ = {}", table.log_z()[0]);
        assert!((table.log_l_p()[0] - (-2.0)).abs() < 1e-12);
        assert!((table.d_kl()[0] + covered).abs() < 1e-10);
        assert!(table.d_g()[0].abs() < 1e-12);
    }

    #[test]
    fn test_exponential_likelihood_expected() {
        let chain = gaussian_chain(20, 400);
        let log_t: Vec<f64> = chain.nlive().iter().map(|&n| -1.0 / n as f64).collect();
        let r = realise(chain.logl(), &log_t);
        // ln L = -50 X: Z ≈ 1/50, ⟨ln L⟩ ≈ -1, d_G ≈ 2
        assert!((r.log_z - (1.0f64 / 50.0).ln()).abs() < 0.1, "logZ = {}", r.log_z);
        assert!((r.log_l_p + 1.0).abs() < 0.1, "logL_P = {}", r.log_l_p);
        assert!(r.d_kl > 0.0);
        assert!((r.d_g - 2.0).abs() < 0.3, "d_G = {}", r.d_g);
    }

    #[test]
    fn test_seeded_realisations_are_deterministic() {
        let chain = gaussian_chain(20, 400);
        let a = chain.stats(Some(25), 42).unwrap();
        let b = chain.stats(Some(25), 42).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 25);
        assert!(a.weights().iter().all(|&w| w == 1.0));

        let c = chain.stats(Some(25), 43).unwrap();
        assert_ne!(a, c, "different seeds should give different draws");
    }

    #[test]
    fn test_simulated_scatter_around_expected() {
        let chain = gaussian_chain(50, 1500);
        let expected = chain.stats(None, 0).unwrap().log_z()[0];
        let simulated = chain.stats(Some(200), 7).unwrap();
        let mean = simulated.log_z().iter().sum::<f64>() / simulated.len() as f64;
        assert!(
            (mean - expected).abs() < 0.5,
            "simulated mean {} far from expected {}",
            mean,
            expected
        );
    }

    #[test]
    fn test_table_named_after_chain() {
        let table = flat_chain(5).with_label("act").stats(None, 0).unwrap();
        assert_eq!(table.name(), Some("act"));
    }

    #[test]
    fn test_zero_realisations_rejected() {
        let err = flat_chain(5).with_label("act").stats(Some(0), 0).unwrap_err();
        assert!(err.is_schema_mismatch());
        assert!(err.run().contains("act"), "error should name the chain: {}", err);
    }
}
