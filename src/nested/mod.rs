//! Nested-sampling chain objects.
//!
//! A [`NestedSamples`] holds the dead points of one nested-sampling run
//! together with the likelihood contour each point was born at. From the
//! birth contours the number of live points at every iteration follows,
//! and from that the prior-volume compression needed to compute the
//! run's evidence, KL divergence and Bayesian dimensionality (see the
//! [`stats`](NestedSamples::stats) method).

mod stats;

use tracing::warn;

use crate::chains::ChainError;
use crate::types::StatsTable;

/// Dead points of a nested-sampling run, sorted by log-likelihood.
#[derive(Debug, Clone)]
pub struct NestedSamples {
    label: Option<String>,
    param_names: Vec<String>,
    params: Vec<Vec<f64>>,
    logl: Vec<f64>,
    logl_birth: Vec<f64>,
}

impl NestedSamples {
    /// Create a chain from death and birth log-likelihoods, without parameters.
    ///
    /// # Errors
    /// `ChainError::Empty` if there are no points, `ChainError::Inconsistent`
    /// if the two columns differ in length.
    pub fn new(logl: Vec<f64>, logl_birth: Vec<f64>) -> Result<Self, ChainError> {
        let params = vec![Vec::new(); logl.len()];
        Self::with_params(params, logl, logl_birth)
    }

    /// Create a chain with parameter values attached to each dead point.
    ///
    /// Points are reordered by increasing log-likelihood.
    pub fn with_params(
        params: Vec<Vec<f64>>,
        logl: Vec<f64>,
        logl_birth: Vec<f64>,
    ) -> Result<Self, ChainError> {
        if logl.is_empty() {
            return Err(ChainError::Empty);
        }
        if logl_birth.len() != logl.len() || params.len() != logl.len() {
            return Err(ChainError::Inconsistent(format!(
                "{} likelihoods, {} birth contours, {} parameter rows",
                logl.len(),
                logl_birth.len(),
                params.len()
            )));
        }
        if let Some(bad) = logl.iter().position(|x| x.is_nan()) {
            return Err(ChainError::Inconsistent(format!(
                "log-likelihood of point {} is NaN",
                bad
            )));
        }

        let mut order: Vec<usize> = (0..logl.len()).collect();
        order.sort_by(|&a, &b| logl[a].total_cmp(&logl[b]));

        let mut params = params;
        Ok(Self {
            label: None,
            param_names: Vec::new(),
            params: order.iter().map(|&i| std::mem::take(&mut params[i])).collect(),
            logl: order.iter().map(|&i| logl[i]).collect(),
            logl_birth: order.iter().map(|&i| logl_birth[i]).collect(),
        })
    }

    /// Attach parameter names. An empty list leaves the chain unnamed.
    ///
    /// # Errors
    /// `ChainError::Inconsistent` if the number of names differs from the
    /// number of parameter columns.
    pub fn with_param_names(mut self, names: Vec<String>) -> Result<Self, ChainError> {
        let width = self.params.first().map_or(0, Vec::len);
        if !names.is_empty() && names.len() != width {
            return Err(ChainError::Inconsistent(format!(
                "{} parameter names for {} parameter columns",
                names.len(),
                width
            )));
        }
        self.param_names = names;
        Ok(self)
    }

    /// Attach the run label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Run label, if any.
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Number of dead points.
    pub fn len(&self) -> usize {
        self.logl.len()
    }

    /// True if the chain has no dead points. Never true for a constructed chain.
    pub fn is_empty(&self) -> bool {
        self.logl.is_empty()
    }

    /// Parameter names, empty if unknown.
    pub fn param_names(&self) -> &[String] {
        &self.param_names
    }

    /// Parameter values of each dead point.
    pub fn params(&self) -> &[Vec<f64>] {
        &self.params
    }

    /// Values of the named parameter across dead points.
    pub fn param(&self, name: &str) -> Option<Vec<f64>> {
        let col = self.param_names.iter().position(|n| n == name)?;
        Some(self.params.iter().map(|row| row[col]).collect())
    }

    /// Log-likelihood of each dead point, ascending.
    pub fn logl(&self) -> &[f64] {
        &self.logl
    }

    /// Birth contour of each dead point.
    pub fn logl_birth(&self) -> &[f64] {
        &self.logl_birth
    }

    /// Number of live points at the moment each point died.
    ///
    /// A point is live at iteration `i` if it was born below `logL_i` and
    /// has not died before iteration `i`.
    pub fn nlive(&self) -> Vec<usize> {
        let mut births = self.logl_birth.clone();
        births.sort_by(f64::total_cmp);

        let mut clamped = 0usize;
        let nlive = self
            .logl
            .iter()
            .enumerate()
            .map(|(i, &l)| {
                let born = births.partition_point(|&b| b < l);
                match born.checked_sub(i) {
                    Some(n) if n > 0 => n,
                    _ => {
                        clamped += 1;
                        1
                    }
                }
            })
            .collect();

        if clamped > 0 {
            warn!(
                label = self.label.as_deref().unwrap_or("<unnamed>"),
                clamped, "birth contours inconsistent with death order; live count clamped to 1"
            );
        }
        nlive
    }

    /// Compute the run's statistic table.
    ///
    /// With `nsamples = None` a single row is produced from the expected
    /// prior-volume compression. With `Some(n)`, `n` rows are produced from
    /// independent simulated compressions drawn from a generator seeded with
    /// `seed`; the same seed always yields the same table.
    ///
    /// This is a full pass over the chain per row.
    ///
    /// # Errors
    /// `SchemaMismatch` naming the chain if `nsamples` is `Some(0)`, which
    /// would leave the table without rows.
    pub fn stats(&self, nsamples: Option<usize>, seed: u64) -> crate::error::Result<StatsTable> {
        stats::compute(self, nsamples, seed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sorted_on_construction() {
        let chain = NestedSamples::with_params(
            vec![vec![3.0], vec![1.0], vec![2.0]],
            vec![-1.0, -3.0, -2.0],
            vec![-1e30; 3],
        )
        .unwrap();
        assert_eq!(chain.logl(), &[-3.0, -2.0, -1.0]);
        assert_eq!(chain.params(), &[vec![1.0], vec![2.0], vec![3.0]]);
    }

    #[test]
    fn test_rejects_empty_and_ragged() {
        assert!(matches!(NestedSamples::new(vec![], vec![]), Err(ChainError::Empty)));
        assert!(matches!(
            NestedSamples::new(vec![1.0, 2.0], vec![0.0]),
            Err(ChainError::Inconsistent(_))
        ));
        assert!(matches!(
            NestedSamples::new(vec![f64::NAN], vec![0.0]),
            Err(ChainError::Inconsistent(_))
        ));
    }

    #[test]
    fn test_param_names_width_checked() {
        let chain =
            NestedSamples::with_params(vec![vec![1.0, 2.0]], vec![-1.0], vec![-1e30]).unwrap();
        assert!(chain.clone().with_param_names(vec!["a".to_string()]).is_err());

        let chain = chain
            .with_param_names(vec!["a".to_string(), "b".to_string()])
            .unwrap();
        assert_eq!(chain.param("b"), Some(vec![2.0]));
        assert_eq!(chain.param("c"), None);
    }

    #[test]
    fn test_nlive_all_born_at_prior() {
        // No replacements: the live set drains one point at a time.
        let chain = NestedSamples::new(vec![-4.0, -3.0, -2.0, -1.0], vec![-1e30; 4]).unwrap();
        assert_eq!(chain.nlive(), vec![4, 3, 2, 1]);
    }

    #[test]
    fn test_nlive_constant_with_replacement() {
        // Two live points; each death is replaced by a point born on its contour,
        // then the final two drain.
        let logl = vec![-5.0, -4.0, -3.0, -2.0, -1.0];
        let logl_birth = vec![-1e30, -1e30, -5.0, -4.0, -3.0];
        let chain = NestedSamples::new(logl, logl_birth).unwrap();
        assert_eq!(chain.nlive(), vec![2, 2, 2, 2, 1]);
    }
}
