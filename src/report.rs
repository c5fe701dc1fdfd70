//! Bundled diagnostics for one pair or triple of runs.

use serde::Serialize;
use statrs::function::erf::erfc_inv;

use crate::types::Series;

/// Display names of the derived diagnostics.
pub mod names {
    /// log Bayes ratio.
    pub const LOG_R: &str = "logR";
    /// log suspiciousness.
    pub const LOG_S: &str = "logS";
    /// log information ratio.
    pub const LOG_I: &str = "logI";
    /// Bayesian dimensionality difference.
    pub const D: &str = "d";
    /// log p-value.
    pub const LOG_P: &str = "logp";
    /// p-value.
    pub const P: &str = "p";
    /// Gaussian-equivalent tension.
    pub const SIGMA: &str = "sigma";
}

/// Which formula family produced a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Family {
    /// Independent priors: runs A, B and AB.
    Uncorrelated,
    /// Correlated priors: runs H1 and H0.
    Correlated,
}

/// All six diagnostics computed from one resolution of the runs.
#[derive(Debug, Clone, Serialize)]
pub struct TensionReport {
    /// Formula family.
    pub family: Family,
    /// Identifiers of the input runs, in argument order.
    pub runs: Vec<String>,
    /// log Bayes ratio.
    pub log_r: Series,
    /// log suspiciousness.
    pub log_s: Series,
    /// log information ratio.
    pub log_i: Series,
    /// Bayesian dimensionality difference.
    pub d: Series,
    /// log p-value.
    pub log_p: Series,
    /// p-value.
    pub p: Series,
}

/// Weighted summary of one diagnostic.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    /// Display name.
    pub name: String,
    /// Weighted mean.
    pub mean: f64,
    /// Weighted standard deviation.
    pub std: f64,
    /// 16th percentile.
    pub lower: f64,
    /// Median.
    pub median: f64,
    /// 84th percentile.
    pub upper: f64,
}

impl Summary {
    /// Summarise a series.
    pub fn of(series: &Series) -> Self {
        Self {
            name: series.name().to_string(),
            mean: series.mean(),
            std: series.std(),
            lower: series.quantile(0.16),
            median: series.quantile(0.5),
            upper: series.quantile(0.84),
        }
    }
}

impl TensionReport {
    /// The six diagnostics in canonical order.
    pub fn series(&self) -> Vec<&Series> {
        vec![&self.log_r, &self.log_s, &self.log_i, &self.d, &self.log_p, &self.p]
    }

    /// Summaries of the six diagnostics plus the Gaussian-equivalent tension.
    pub fn summaries(&self) -> Vec<Summary> {
        let mut out: Vec<Summary> = self.series().into_iter().map(Summary::of).collect();
        out.push(Summary::of(&self.sigma()));
        out
    }

    /// The p-value as a two-sided Gaussian significance, `√2 erfc⁻¹(p)`.
    pub fn sigma(&self) -> Series {
        self.p.map(names::SIGMA, sigma_from_p)
    }
}

/// Two-sided Gaussian significance of a tail probability.
pub fn sigma_from_p(p: f64) -> f64 {
    if p.is_nan() {
        return f64::NAN;
    }
    if p <= 0.0 {
        return f64::INFINITY;
    }
    if p >= 1.0 {
        return 0.0;
    }
    std::f64::consts::SQRT_2 * erfc_inv(p)
}

/// Chi-squared tail of `d - 2 logS` with `d` degrees of freedom, per sample.
pub(crate) fn tail(name: &str, d: &Series, log_s: &Series, f: fn(f64, f64) -> f64) -> Series {
    let values = d
        .values()
        .iter()
        .zip(log_s.values())
        .map(|(&d, &s)| f(d - 2.0 * s, d))
        .collect();
    Series::new(name, values, d.weights().to_vec())
}
