//! Tension statistics for datasets analysed with independent priors.
//!
//! Three runs are needed: dataset A alone, dataset B alone, and the joint
//! run AB. Each function accepts any mix of labels, chain objects and
//! statistic tables; see [`resolve`](crate::resolve).
//!
//! ```text
//! logR = logZ(AB)   - logZ(A)   - logZ(B)
//! logS = logL_P(AB) - logL_P(A) - logL_P(B)
//! logI = D_KL(A)    + D_KL(B)   - D_KL(AB)
//! d    = d_G(A)     + d_G(B)    - d_G(AB)
//! p    = chi2.sf(d - 2 logS, d)
//! ```

use crate::config::Config;
use crate::error::Result;
use crate::output::{print_summary, show};
use crate::report::{Family, TensionReport};
use crate::resolve::with_resolved_runs;
use crate::types::{Run, Series};

/// log Bayes ratio of a shared model against two independent ones.
pub fn log_r<'a>(
    a: impl Into<Run<'a>>,
    b: impl Into<Run<'a>>,
    ab: impl Into<Run<'a>>,
    config: &Config,
) -> Result<Series> {
    let series = with_resolved_runs([a.into(), b.into(), ab.into()], config, |[a, b, ab]| {
        tables::log_r(a, b, ab)
    })?;
    Ok(show(series, config))
}

/// log suspiciousness: `logR` with the prior-volume (Occam) effect removed.
pub fn log_s<'a>(
    a: impl Into<Run<'a>>,
    b: impl Into<Run<'a>>,
    ab: impl Into<Run<'a>>,
    config: &Config,
) -> Result<Series> {
    let series = with_resolved_runs([a.into(), b.into(), ab.into()], config, |[a, b, ab]| {
        tables::log_s(a, b, ab)
    })?;
    Ok(show(series, config))
}

/// log information ratio: information lost by forcing a joint fit.
pub fn log_i<'a>(
    a: impl Into<Run<'a>>,
    b: impl Into<Run<'a>>,
    ab: impl Into<Run<'a>>,
    config: &Config,
) -> Result<Series> {
    let series = with_resolved_runs([a.into(), b.into(), ab.into()], config, |[a, b, ab]| {
        tables::log_i(a, b, ab)
    })?;
    Ok(show(series, config))
}

/// Difference in Bayesian dimensionality between independent and joint fits.
pub fn d<'a>(
    a: impl Into<Run<'a>>,
    b: impl Into<Run<'a>>,
    ab: impl Into<Run<'a>>,
    config: &Config,
) -> Result<Series> {
    let series = with_resolved_runs([a.into(), b.into(), ab.into()], config, |[a, b, ab]| {
        tables::d(a, b, ab)
    })?;
    Ok(show(series, config))
}

/// log p-value, `ln chi2.sf(d - 2 logS, d)`, evaluated in log space.
pub fn log_p<'a>(
    a: impl Into<Run<'a>>,
    b: impl Into<Run<'a>>,
    ab: impl Into<Run<'a>>,
    config: &Config,
) -> Result<Series> {
    let series = with_resolved_runs([a.into(), b.into(), ab.into()], config, |[a, b, ab]| {
        tables::log_p(a, b, ab)
    })?;
    Ok(show(series, config))
}

/// p-value, `chi2.sf(d - 2 logS, d)`.
pub fn p<'a>(
    a: impl Into<Run<'a>>,
    b: impl Into<Run<'a>>,
    ab: impl Into<Run<'a>>,
    config: &Config,
) -> Result<Series> {
    let series = with_resolved_runs([a.into(), b.into(), ab.into()], config, |[a, b, ab]| {
        tables::p(a, b, ab)
    })?;
    Ok(show(series, config))
}

/// All six diagnostics from a single resolution of the three runs.
pub fn report<'a>(
    a: impl Into<Run<'a>>,
    b: impl Into<Run<'a>>,
    ab: impl Into<Run<'a>>,
    config: &Config,
) -> Result<TensionReport> {
    let runs = [a.into(), b.into(), ab.into()];
    let ids = runs.iter().map(ToString::to_string).collect();
    let report = with_resolved_runs(runs, config, |[a, b, ab]| TensionReport {
        family: Family::Uncorrelated,
        runs: ids,
        log_r: tables::log_r(a, b, ab),
        log_s: tables::log_s(a, b, ab),
        log_i: tables::log_i(a, b, ab),
        d: tables::d(a, b, ab),
        log_p: tables::log_p(a, b, ab),
        p: tables::p(a, b, ab),
    })?;
    if config.show {
        report.series().into_iter().for_each(print_summary);
    }
    Ok(report)
}

/// The same statistics as pure functions of resolved tables.
///
/// Tables must already agree in sample count and weights; use
/// [`resolve_all`](crate::resolve::resolve_all) to check. The output
/// inherits the weights of `a`. Passing tables of different lengths is a
/// caller bug and panics in debug builds.
pub mod tables {
    use crate::report::{names, tail};
    use crate::statistics::chi2;
    use crate::types::{Series, StatsTable};

    fn combine(
        name: &str,
        a: &StatsTable,
        cols: (&[f64], &[f64], &[f64]),
        f: impl Fn(f64, f64, f64) -> f64,
    ) -> Series {
        let (x, y, z) = cols;
        debug_assert!(
            x.len() == y.len() && y.len() == z.len(),
            "tables differ in sample count: {}, {}, {}",
            x.len(),
            y.len(),
            z.len()
        );
        let values = x
            .iter()
            .zip(y)
            .zip(z)
            .map(|((&x, &y), &z)| f(x, y, z))
            .collect();
        Series::new(name, values, a.weights().to_vec())
    }

    /// `logZ(AB) - logZ(A) - logZ(B)`
    pub fn log_r(a: &StatsTable, b: &StatsTable, ab: &StatsTable) -> Series {
        combine(names::LOG_R, a, (a.log_z(), b.log_z(), ab.log_z()), |a, b, ab| {
            ab - a - b
        })
    }

    /// `logL_P(AB) - logL_P(A) - logL_P(B)`
    pub fn log_s(a: &StatsTable, b: &StatsTable, ab: &StatsTable) -> Series {
        combine(
            names::LOG_S,
            a,
            (a.log_l_p(), b.log_l_p(), ab.log_l_p()),
            |a, b, ab| ab - a - b,
        )
    }

    /// `D_KL(A) + D_KL(B) - D_KL(AB)`
    pub fn log_i(a: &StatsTable, b: &StatsTable, ab: &StatsTable) -> Series {
        combine(names::LOG_I, a, (a.d_kl(), b.d_kl(), ab.d_kl()), |a, b, ab| {
            a + b - ab
        })
    }

    /// `d_G(A) + d_G(B) - d_G(AB)`
    pub fn d(a: &StatsTable, b: &StatsTable, ab: &StatsTable) -> Series {
        combine(names::D, a, (a.d_g(), b.d_g(), ab.d_g()), |a, b, ab| a + b - ab)
    }

    /// `ln chi2.sf(d - 2 logS, d)`
    pub fn log_p(a: &StatsTable, b: &StatsTable, ab: &StatsTable) -> Series {
        tail(names::LOG_P, &d(a, b, ab), &log_s(a, b, ab), chi2::log_sf)
    }

    /// `chi2.sf(d - 2 logS, d)`
    pub fn p(a: &StatsTable, b: &StatsTable, ab: &StatsTable) -> Series {
        tail(names::P, &d(a, b, ab), &log_s(a, b, ab), chi2::sf)
    }
}
