//! # suspiciousness
//!
//! Quantify tension between two datasets analysed under a shared model.
//!
//! Given summary statistics of nested-sampling runs, this crate computes
//! per-sample tension diagnostics:
//! - log Bayes ratio `logR`
//! - log suspiciousness `logS`
//! - log information ratio `logI`
//! - Bayesian dimensionality difference `d`
//! - tail probability `p` and its logarithm `logp`
//!
//! Two formula families are provided:
//! - [`uncorrelated`]: independent priors, three runs (A, B, AB)
//! - [`correlated`]: correlated priors, two runs (H1, H0)
//!
//! ## Supplying runs
//!
//! Every function accepts each run as a statistic table, a chain object,
//! or a label resolved against a chains root. The three calls below are
//! equivalent:
//!
//! ```ignore
//! use suspiciousness::{uncorrelated, chains::{ChainStore, PolyChordStore}, Config};
//!
//! let config = Config::new().chains("chains/uniform");
//! let store = PolyChordStore::new("chains/uniform");
//! let (a, b, ab) = (store.load("act")?, store.load("bao")?, store.load("actbao")?);
//! let (sa, sb, sab) = (
//!     a.stats(config.nsamples, config.seed)?,
//!     b.stats(config.nsamples, config.seed)?,
//!     ab.stats(config.nsamples, config.seed)?,
//! );
//!
//! uncorrelated::log_r(&sa, &sb, &sab, &config)?;
//! uncorrelated::log_r(&a, &b, &ab, &config)?;
//! uncorrelated::log_r("act", "bao", "actbao", &config)?;
//! ```
//!
//! ## Reports
//!
//! To compute every diagnostic while resolving each run only once, use
//! [`uncorrelated::report`] or [`correlated::report`]:
//!
//! ```ignore
//! let report = suspiciousness::uncorrelated::report("act", "bao", "actbao", &config)?;
//! println!("{}", suspiciousness::output::format_report(&report));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

// Core modules
mod config;
mod error;
mod report;
mod types;

// Functional modules
pub mod chains;
pub mod correlated;
pub mod nested;
pub mod output;
pub mod resolve;
pub mod statistics;
pub mod uncorrelated;

// Re-exports for public API
pub use config::{Config, CHAINS_ENV, DEFAULT_NSAMPLES, DEFAULT_SEED};
pub use error::{Error, ResolutionKind, Result};
pub use nested::NestedSamples;
pub use report::{names, sigma_from_p, Family, Summary, TensionReport};
pub use resolve::{resolve, resolve_all, with_resolved_runs};
pub use types::{Run, Series, StatsTable, D_G, D_KL, LOG_L_P, LOG_Z, REQUIRED_FIELDS, WEIGHTS};
