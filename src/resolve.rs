//! Resolution adapter: turns any [`Run`] into a [`StatsTable`].
//!
//! This is the only place that branches on how a run was supplied:
//! - `Run::Stats` passes through unchanged (borrowed, no work)
//! - `Run::Chain` computes the chain's statistics once
//! - `Run::Label` loads the chain from the chain store, then computes its
//!   statistics once
//!
//! Formula functions receive fully resolved tables through
//! [`with_resolved_runs`] and never see labels or chain objects.

use std::borrow::Cow;

use tracing::debug;

use crate::chains::{ChainStore, PolyChordStore};
use crate::config::Config;
use crate::error::{Error, ResolutionKind, Result};
use crate::types::{Run, StatsTable};

/// Relative tolerance when comparing weight vectors across tables.
const WEIGHT_RTOL: f64 = 1e-12;

/// Resolve one run against the chains root configured in `config`.
///
/// # Errors
/// `Resolution` naming the run if a label has no chain on disk or no
/// chains root is configured.
pub fn resolve<'a>(run: &Run<'a>, config: &Config) -> Result<Cow<'a, StatsTable>> {
    match run {
        Run::Label(label) => {
            let root = config
                .chains_root()
                .ok_or_else(|| Error::resolution(*label, ResolutionKind::NoChainsRoot))?;
            resolve_in(run, &PolyChordStore::new(root), config)
        }
        _ => resolve_in(run, &NoStore, config),
    }
}

/// Resolve one run, loading labels from an explicit chain store.
pub fn resolve_in<'a>(
    run: &Run<'a>,
    store: &dyn ChainStore,
    config: &Config,
) -> Result<Cow<'a, StatsTable>> {
    let table = match run {
        Run::Stats(table) => return Ok(Cow::Borrowed(*table)),
        Run::Chain(chain) => chain.stats(config.nsamples, config.seed)?,
        Run::Label(label) => {
            let chain = store.load(label)?;
            chain.stats(config.nsamples, config.seed)?.with_name(*label)
        }
    };
    debug!(run = %run, samples = table.len(), "resolved run");
    Ok(Cow::Owned(table))
}

/// Resolve several runs and check they are mutually compatible.
///
/// # Errors
/// Any resolution error, or `SchemaMismatch` naming both runs if two
/// tables differ in sample count or weights.
pub fn resolve_all<'a>(runs: &[Run<'a>], config: &Config) -> Result<Vec<Cow<'a, StatsTable>>> {
    let tables = runs
        .iter()
        .map(|run| resolve(run, config))
        .collect::<Result<Vec<_>>>()?;
    check_compatible(runs, &tables)?;
    Ok(tables)
}

/// Like [`resolve_all`], loading labels from an explicit chain store.
pub fn resolve_all_in<'a>(
    runs: &[Run<'a>],
    store: &dyn ChainStore,
    config: &Config,
) -> Result<Vec<Cow<'a, StatsTable>>> {
    let tables = runs
        .iter()
        .map(|run| resolve_in(run, store, config))
        .collect::<Result<Vec<_>>>()?;
    check_compatible(runs, &tables)?;
    Ok(tables)
}

/// Resolve `N` runs, then evaluate `formula` on the resolved tables.
///
/// This is how every statistic in the crate is exposed: the formula is a
/// pure function of tables, and this adapter supplies them.
pub fn with_resolved_runs<'a, const N: usize, T>(
    runs: [Run<'a>; N],
    config: &Config,
    formula: impl FnOnce([&StatsTable; N]) -> T,
) -> Result<T> {
    let tables = resolve_all(&runs, config)?;
    Ok(formula(std::array::from_fn(|i| &*tables[i])))
}

/// Like [`with_resolved_runs`], loading labels from an explicit chain store.
pub fn with_store<'a, const N: usize, T>(
    runs: [Run<'a>; N],
    store: &dyn ChainStore,
    config: &Config,
    formula: impl FnOnce([&StatsTable; N]) -> T,
) -> Result<T> {
    let tables = resolve_all_in(&runs, store, config)?;
    Ok(formula(std::array::from_fn(|i| &*tables[i])))
}

/// Check that every table agrees with the first in sample count and weights.
pub fn check_compatible(runs: &[Run<'_>], tables: &[Cow<'_, StatsTable>]) -> Result<()> {
    let Some(first) = tables.first() else {
        return Ok(());
    };
    for (i, table) in tables.iter().enumerate().skip(1) {
        let mismatch = |reason: String| Error::SchemaMismatch {
            run: runs[i].to_string(),
            other: Some(runs[0].to_string()),
            reason,
        };
        if table.len() != first.len() {
            return Err(mismatch(format!(
                "{} samples vs {}",
                table.len(),
                first.len()
            )));
        }
        let differing = table
            .weights()
            .iter()
            .zip(first.weights())
            .position(|(a, b)| (a - b).abs() > WEIGHT_RTOL * a.abs().max(b.abs()));
        if let Some(idx) = differing {
            return Err(mismatch(format!(
                "weights differ at sample {} ({} vs {})",
                idx,
                table.weights()[idx],
                first.weights()[idx]
            )));
        }
    }
    Ok(())
}

/// Store used when no chains root is needed; labels never reach it.
struct NoStore;

impl ChainStore for NoStore {
    fn load(&self, label: &str) -> Result<crate::nested::NestedSamples> {
        Err(Error::resolution(label, ResolutionKind::NoChainsRoot))
    }
}
