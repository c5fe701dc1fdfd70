//! Configuration for run resolution and formula evaluation.

use std::path::{Path, PathBuf};

/// Environment variable overriding the chains root.
pub const CHAINS_ENV: &str = "SUSPICIOUSNESS_CHAINS";

/// Default number of simulated volume realisations per chain.
pub const DEFAULT_NSAMPLES: usize = 1_000;

/// Default seed for volume simulation.
pub const DEFAULT_SEED: u64 = 0x7E45_1011_5EED;

/// Options shared by every resolution and formula call.
///
/// One `Config` applies to all runs of a call, so labels for A, B and AB
/// (or H1 and H0) are always resolved against the same chains root with
/// the same simulation settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Root directory that labels are resolved against.
    ///
    /// Required only when a run is given as a label. Default: None.
    pub chains: Option<PathBuf>,

    /// Number of simulated prior-volume realisations per chain.
    ///
    /// `None` uses the expected compression and yields a single sample per
    /// table. Default: 1,000.
    pub nsamples: Option<usize>,

    /// Seed for volume simulation.
    ///
    /// Fixed so that a chain resolves to the same table every time.
    pub seed: u64,

    /// Print `name = mean ± std` for every diagnostic computed.
    ///
    /// Default: false.
    pub show: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            chains: None,
            nsamples: Some(DEFAULT_NSAMPLES),
            seed: DEFAULT_SEED,
            show: false,
        }
    }
}

impl Config {
    /// Create a new configuration with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Default configuration with the chains root taken from
    /// `SUSPICIOUSNESS_CHAINS`, if set and non-empty.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(root) = std::env::var_os(CHAINS_ENV).filter(|v| !v.is_empty()) {
            config.chains = Some(PathBuf::from(root));
        }
        config
    }

    /// Few realisations, for quick interactive checks.
    pub fn quick() -> Self {
        Self {
            nsamples: Some(100),
            ..Default::default()
        }
    }

    /// Many realisations, for publication-quality error bars.
    pub fn thorough() -> Self {
        Self {
            nsamples: Some(10_000),
            ..Default::default()
        }
    }

    /// Single deterministic realisation from the expected compression.
    pub fn expected() -> Self {
        Self {
            nsamples: None,
            ..Default::default()
        }
    }

    // =========================================================================
    // Builder methods
    // =========================================================================

    /// Set the chains root.
    pub fn chains(mut self, root: impl Into<PathBuf>) -> Self {
        self.chains = Some(root.into());
        self
    }

    /// Set the number of volume realisations.
    pub fn nsamples(mut self, n: usize) -> Self {
        assert!(n > 0, "nsamples must be > 0");
        self.nsamples = Some(n);
        self
    }

    /// Use the expected compression instead of simulation.
    pub fn expected_volume(mut self) -> Self {
        self.nsamples = None;
        self
    }

    /// Set the simulation seed.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Enable or disable printing of diagnostic summaries.
    pub fn show(mut self, show: bool) -> Self {
        self.show = show;
        self
    }

    /// The chains root, if configured.
    pub fn chains_root(&self) -> Option<&Path> {
        self.chains.as_deref()
    }
}
