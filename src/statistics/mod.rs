//! Statistical primitives for tension diagnostics.
//!
//! This module provides the numeric building blocks used by the formula
//! families and the chain-statistics computation:
//! - Chi-squared survival function and its numerically stable logarithm
//! - Weighted mean and standard deviation
//! - Weighted quantiles by interpolation on the cumulative weight
//! - Log-sum-exp reduction

pub mod chi2;
mod moments;
mod quantile;

pub use moments::{logsumexp, weighted_mean, weighted_std, weighted_variance};
pub use quantile::{weighted_quantile, weighted_quantiles};
