//! Core data types: statistic tables, derived diagnostics and run identities.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, ResolutionKind, Result};
use crate::nested::NestedSamples;
use crate::statistics::{weighted_mean, weighted_quantile, weighted_std};

/// Column name of the log-evidence.
pub const LOG_Z: &str = "logZ";
/// Column name of the posterior-averaged log-likelihood.
pub const LOG_L_P: &str = "logL_P";
/// Column name of the Kullback-Leibler divergence.
pub const D_KL: &str = "D_KL";
/// Column name of the Bayesian model dimensionality.
pub const D_G: &str = "d_G";
/// Column name of the optional sample weights.
pub const WEIGHTS: &str = "weights";

/// The four statistics every table must provide.
pub const REQUIRED_FIELDS: [&str; 4] = [LOG_Z, LOG_L_P, D_KL, D_G];

/// Per-sample summary statistics of one nested-sampling run.
///
/// Each row is one realisation of the run's statistics; rows carry a
/// non-negative weight. Construction validates that every column has the
/// same length and that the weights are finite, non-negative and not all
/// zero, so a `StatsTable` is always usable by the formula layer.
#[derive(Debug, Clone)]
pub struct StatsTable {
    name: Option<String>,
    log_z: Vec<f64>,
    log_l_p: Vec<f64>,
    d_kl: Vec<f64>,
    d_g: Vec<f64>,
    weights: Vec<f64>,
}

/// On-disk JSON layout of a statistic table.
#[derive(Debug, Serialize, Deserialize)]
struct TableFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    columns: BTreeMap<String, Vec<f64>>,
}

impl StatsTable {
    /// Create a table with unit weights.
    ///
    /// # Errors
    /// `SchemaMismatch` if the columns differ in length or are empty.
    pub fn new(log_z: Vec<f64>, log_l_p: Vec<f64>, d_kl: Vec<f64>, d_g: Vec<f64>) -> Result<Self> {
        let weights = vec![1.0; log_z.len()];
        Self::with_weights(log_z, log_l_p, d_kl, d_g, weights)
    }

    /// Create a table with explicit sample weights.
    ///
    /// # Errors
    /// `SchemaMismatch` if the columns differ in length, are empty, or the
    /// weights are negative, non-finite or all zero.
    pub fn with_weights(
        log_z: Vec<f64>,
        log_l_p: Vec<f64>,
        d_kl: Vec<f64>,
        d_g: Vec<f64>,
        weights: Vec<f64>,
    ) -> Result<Self> {
        let table = Self {
            name: None,
            log_z,
            log_l_p,
            d_kl,
            d_g,
            weights,
        };
        table.validate()?;
        Ok(table)
    }

    /// Build a table from named columns.
    ///
    /// Columns are keyed by `logZ`, `logL_P`, `D_KL` and `d_G`; a `weights`
    /// column is optional and defaults to unit weights. Extra columns are
    /// ignored.
    ///
    /// # Errors
    /// `Resolution` naming the missing column if a required one is absent,
    /// `SchemaMismatch` if the columns are inconsistent.
    pub fn from_columns(
        name: Option<String>,
        mut columns: BTreeMap<String, Vec<f64>>,
    ) -> Result<Self> {
        let id = name.clone().unwrap_or_else(|| "<unnamed stats>".to_string());
        let mut take = |field: &'static str| {
            columns
                .remove(field)
                .ok_or_else(|| Error::resolution(id.clone(), ResolutionKind::MissingField { field }))
        };

        let log_z = take(LOG_Z)?;
        let log_l_p = take(LOG_L_P)?;
        let d_kl = take(D_KL)?;
        let d_g = take(D_G)?;
        let weights = columns
            .remove(WEIGHTS)
            .unwrap_or_else(|| vec![1.0; log_z.len()]);

        let table = Self {
            name,
            log_z,
            log_l_p,
            d_kl,
            d_g,
            weights,
        };
        table.validate()?;
        Ok(table)
    }

    /// Build a named table with unit weights.
    pub(crate) fn from_parts(
        name: Option<String>,
        log_z: Vec<f64>,
        log_l_p: Vec<f64>,
        d_kl: Vec<f64>,
        d_g: Vec<f64>,
    ) -> Result<Self> {
        let weights = vec![1.0; log_z.len()];
        let table = Self {
            name,
            log_z,
            log_l_p,
            d_kl,
            d_g,
            weights,
        };
        table.validate()?;
        Ok(table)
    }

    /// Attach a display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Display name, if any.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Identifier used in error messages.
    pub fn id(&self) -> String {
        match &self.name {
            Some(name) => format!("stats '{}'", name),
            None => "<unnamed stats>".to_string(),
        }
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.log_z.len()
    }

    /// True if the table has no samples. Never true for a validated table.
    pub fn is_empty(&self) -> bool {
        self.log_z.is_empty()
    }

    /// Log-evidence samples.
    pub fn log_z(&self) -> &[f64] {
        &self.log_z
    }

    /// Posterior-averaged log-likelihood samples.
    pub fn log_l_p(&self) -> &[f64] {
        &self.log_l_p
    }

    /// KL divergence samples.
    pub fn d_kl(&self) -> &[f64] {
        &self.d_kl
    }

    /// Bayesian model dimensionality samples.
    pub fn d_g(&self) -> &[f64] {
        &self.d_g
    }

    /// Sample weights.
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Look up a column by name.
    pub fn column(&self, field: &str) -> Option<&[f64]> {
        match field {
            LOG_Z => Some(&self.log_z),
            LOG_L_P => Some(&self.log_l_p),
            D_KL => Some(&self.d_kl),
            D_G => Some(&self.d_g),
            WEIGHTS => Some(&self.weights),
            _ => None,
        }
    }

    /// One column as a named series carrying the table's weights.
    pub fn series(&self, field: &'static str) -> Option<Series> {
        self.column(field)
            .map(|values| Series::new(field, values.to_vec(), self.weights.clone()))
    }

    fn validate(&self) -> Result<()> {
        let n = self.log_z.len();
        if n == 0 {
            return Err(Error::schema(self.id(), "table has no samples"));
        }
        for (field, len) in [
            (LOG_L_P, self.log_l_p.len()),
            (D_KL, self.d_kl.len()),
            (D_G, self.d_g.len()),
            (WEIGHTS, self.weights.len()),
        ] {
            if len != n {
                return Err(Error::schema(
                    self.id(),
                    format!("column '{}' has {} samples, expected {}", field, len, n),
                ));
            }
        }
        if let Some(w) = self.weights.iter().find(|w| !w.is_finite() || **w < 0.0) {
            return Err(Error::schema(
                self.id(),
                format!("weights must be finite and non-negative, found {}", w),
            ));
        }
        if self.weights.iter().all(|&w| w == 0.0) {
            return Err(Error::schema(self.id(), "all weights are zero"));
        }
        Ok(())
    }

    /// Read a table previously saved with [`StatsTable::write_json`].
    ///
    /// The table is named after the file stem unless the file carries a name.
    pub fn read_json(path: &Path) -> Result<Self> {
        let id = path.display().to_string();
        let text = fs::read_to_string(path).map_err(|e| {
            Error::resolution(id.clone(), ResolutionKind::Chain(e.into()))
        })?;
        let file: TableFile = serde_json::from_str(&text)
            .map_err(|e| Error::resolution(id.clone(), ResolutionKind::Json(e)))?;
        let name = file.name.or_else(|| {
            path.file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
        });
        Self::from_columns(name, file.columns)
    }

    /// Serialise the table to JSON.
    pub fn to_json(&self) -> std::result::Result<String, serde_json::Error> {
        let mut columns = BTreeMap::new();
        columns.insert(LOG_Z.to_string(), self.log_z.clone());
        columns.insert(LOG_L_P.to_string(), self.log_l_p.clone());
        columns.insert(D_KL.to_string(), self.d_kl.clone());
        columns.insert(D_G.to_string(), self.d_g.clone());
        columns.insert(WEIGHTS.to_string(), self.weights.clone());
        serde_json::to_string_pretty(&TableFile {
            name: self.name.clone(),
            columns,
        })
    }

    /// Write the table to a JSON file.
    pub fn write_json(&self, path: &Path) -> std::io::Result<()> {
        let json = self.to_json().map_err(std::io::Error::other)?;
        fs::write(path, json)
    }
}

/// Tables compare by content; the display name is cosmetic.
impl PartialEq for StatsTable {
    fn eq(&self, other: &Self) -> bool {
        self.log_z == other.log_z
            && self.log_l_p == other.log_l_p
            && self.d_kl == other.d_kl
            && self.d_g == other.d_g
            && self.weights == other.weights
    }
}

/// A derived diagnostic: one weighted value per sample plus a display name.
///
/// Equality compares values and weights only.
#[derive(Debug, Clone, Serialize)]
pub struct Series {
    name: String,
    values: Vec<f64>,
    weights: Vec<f64>,
}

impl Series {
    /// Create a series. `values` and `weights` must have equal length.
    pub fn new(name: impl Into<String>, values: Vec<f64>, weights: Vec<f64>) -> Self {
        debug_assert_eq!(values.len(), weights.len());
        Self {
            name: name.into(),
            values,
            weights,
        }
    }

    /// Replace the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Per-sample values.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Per-sample weights, inherited from the input tables.
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True if there are no samples.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Weighted mean.
    pub fn mean(&self) -> f64 {
        weighted_mean(&self.values, &self.weights)
    }

    /// Weighted standard deviation (unbiased, reliability weights).
    pub fn std(&self) -> f64 {
        weighted_std(&self.values, &self.weights)
    }

    /// Weighted quantile at probability `p`.
    pub fn quantile(&self, p: f64) -> f64 {
        weighted_quantile(&self.values, &self.weights, p)
    }

    /// Apply `f` to every value, keeping the weights.
    pub fn map(&self, name: impl Into<String>, f: impl Fn(f64) -> f64) -> Series {
        Series::new(
            name,
            self.values.iter().map(|&x| f(x)).collect(),
            self.weights.clone(),
        )
    }
}

impl PartialEq for Series {
    fn eq(&self, other: &Self) -> bool {
        self.values == other.values && self.weights == other.weights
    }
}

impl fmt::Display for Series {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {} ± {}", self.name, self.mean(), self.std())
    }
}

/// How a caller identifies one run.
///
/// Exactly one representation is consumed per formula argument; the
/// resolution adapter turns each into a [`StatsTable`].
#[derive(Debug, Clone, Copy)]
pub enum Run<'a> {
    /// Label resolved against the configured chains root.
    Label(&'a str),
    /// Chain object whose statistics are computed on resolution.
    Chain(&'a NestedSamples),
    /// Already-resolved statistics; resolution is a no-op.
    Stats(&'a StatsTable),
}

impl fmt::Display for Run<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Run::Label(label) => write!(f, "{}", label),
            Run::Chain(chain) => match chain.label() {
                Some(label) => write!(f, "chain '{}'", label),
                None => write!(f, "<unnamed chain>"),
            },
            Run::Stats(table) => write!(f, "{}", table.id()),
        }
    }
}

impl<'a> From<&'a str> for Run<'a> {
    fn from(label: &'a str) -> Self {
        Run::Label(label)
    }
}

impl<'a> From<&'a String> for Run<'a> {
    fn from(label: &'a String) -> Self {
        Run::Label(label)
    }
}

impl<'a> From<&'a NestedSamples> for Run<'a> {
    fn from(chain: &'a NestedSamples) -> Self {
        Run::Chain(chain)
    }
}

impl<'a> From<&'a StatsTable> for Run<'a> {
    fn from(table: &'a StatsTable) -> Self {
        Run::Stats(table)
    }
}
