//! Tension statistics for datasets analysed with correlated priors.
//!
//! Here no joint run is needed: H0 is the run whose prior ties the shared
//! parameters together, H1 the run where they are free. Each function
//! accepts any mix of labels, chain objects and statistic tables.
//!
//! ```text
//! logR = logZ(H0)   - logZ(H1)
//! logS = logL_P(H0) - logL_P(H1)
//! logI = D_KL(H1)   - D_KL(H0)
//! d    = d_G(H1)    - d_G(H0)
//! p    = chi2.sf(d - 2 logS, d)
//! ```

use crate::config::Config;
use crate::error::Result;
use crate::output::{print_summary, show};
use crate::report::{Family, TensionReport};
use crate::resolve::with_resolved_runs;
use crate::types::{Run, Series};

/// log Bayes ratio of H0 against H1.
pub fn log_r<'a>(h1: impl Into<Run<'a>>, h0: impl Into<Run<'a>>, config: &Config) -> Result<Series> {
    let series = with_resolved_runs([h1.into(), h0.into()], config, |[h1, h0]| {
        tables::log_r(h1, h0)
    })?;
    Ok(show(series, config))
}

/// log suspiciousness of H0 against H1.
pub fn log_s<'a>(h1: impl Into<Run<'a>>, h0: impl Into<Run<'a>>, config: &Config) -> Result<Series> {
    let series = with_resolved_runs([h1.into(), h0.into()], config, |[h1, h0]| {
        tables::log_s(h1, h0)
    })?;
    Ok(show(series, config))
}

/// log information ratio, `D_KL(H1) - D_KL(H0)`.
pub fn log_i<'a>(h1: impl Into<Run<'a>>, h0: impl Into<Run<'a>>, config: &Config) -> Result<Series> {
    let series = with_resolved_runs([h1.into(), h0.into()], config, |[h1, h0]| {
        tables::log_i(h1, h0)
    })?;
    Ok(show(series, config))
}

/// Difference in Bayesian dimensionality, `d_G(H1) - d_G(H0)`.
pub fn d<'a>(h1: impl Into<Run<'a>>, h0: impl Into<Run<'a>>, config: &Config) -> Result<Series> {
    let series = with_resolved_runs([h1.into(), h0.into()], config, |[h1, h0]| {
        tables::d(h1, h0)
    })?;
    Ok(show(series, config))
}

/// log p-value, evaluated in log space.
pub fn log_p<'a>(h1: impl Into<Run<'a>>, h0: impl Into<Run<'a>>, config: &Config) -> Result<Series> {
    let series = with_resolved_runs([h1.into(), h0.into()], config, |[h1, h0]| {
        tables::log_p(h1, h0)
    })?;
    Ok(show(series, config))
}

/// p-value, `chi2.sf(d - 2 logS, d)`.
pub fn p<'a>(h1: impl Into<Run<'a>>, h0: impl Into<Run<'a>>, config: &Config) -> Result<Series> {
    let series = with_resolved_runs([h1.into(), h0.into()], config, |[h1, h0]| {
        tables::p(h1, h0)
    })?;
    Ok(show(series, config))
}

/// All six diagnostics from a single resolution of both runs.
pub fn report<'a>(
    h1: impl Into<Run<'a>>,
    h0: impl Into<Run<'a>>,
    config: &Config,
) -> Result<TensionReport> {
    let runs = [h1.into(), h0.into()];
    let ids = runs.iter().map(ToString::to_string).collect();
    let report = with_resolved_runs(runs, config, |[h1, h0]| TensionReport {
        family: Family::Correlated,
        runs: ids,
        log_r: tables::log_r(h1, h0),
        log_s: tables::log_s(h1, h0),
        log_i: tables::log_i(h1, h0),
        d: tables::d(h1, h0),
        log_p: tables::log_p(h1, h0),
        p: tables::p(h1, h0),
    })?;
    if config.show {
        report.series().into_iter().for_each(print_summary);
    }
    Ok(report)
}

/// The same statistics as pure functions of resolved tables.
///
/// The output inherits the weights of `h1`. Both tables must have the same
/// sample count; a mismatch panics in debug builds.
pub mod tables {
    use crate::report::{names, tail};
    use crate::statistics::chi2;
    use crate::types::{Series, StatsTable};

    fn combine(name: &str, h1: &StatsTable, x: &[f64], y: &[f64], f: impl Fn(f64, f64) -> f64) -> Series {
        debug_assert_eq!(x.len(), y.len(), "tables differ in sample count");
        let values = x.iter().zip(y).map(|(&x, &y)| f(x, y)).collect();
        Series::new(name, values, h1.weights().to_vec())
    }

    /// `logZ(H0) - logZ(H1)`
    pub fn log_r(h1: &StatsTable, h0: &StatsTable) -> Series {
        combine(names::LOG_R, h1, h1.log_z(), h0.log_z(), |h1, h0| h0 - h1)
    }

    /// `logL_P(H0) - logL_P(H1)`
    pub fn log_s(h1: &StatsTable, h0: &StatsTable) -> Series {
        combine(names::LOG_S, h1, h1.log_l_p(), h0.log_l_p(), |h1, h0| h0 - h1)
    }

    /// `D_KL(H1) - D_KL(H0)`
    pub fn log_i(h1: &StatsTable, h0: &StatsTable) -> Series {
        combine(names::LOG_I, h1, h1.d_kl(), h0.d_kl(), |h1, h0| h1 - h0)
    }

    /// `d_G(H1) - d_G(H0)`
    pub fn d(h1: &StatsTable, h0: &StatsTable) -> Series {
        combine(names::D, h1, h1.d_g(), h0.d_g(), |h1, h0| h1 - h0)
    }

    /// `ln chi2.sf(d - 2 logS, d)`
    pub fn log_p(h1: &StatsTable, h0: &StatsTable) -> Series {
        tail(names::LOG_P, &d(h1, h0), &log_s(h1, h0), chi2::log_sf)
    }

    /// `chi2.sf(d - 2 logS, d)`
    pub fn p(h1: &StatsTable, h0: &StatsTable) -> Series {
        tail(names::P, &d(h1, h0), &log_s(h1, h0), chi2::sf)
    }
}
