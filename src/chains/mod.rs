//! Chain store: locating and loading nested-sampling chains on disk.
//!
//! Chains follow the conventional PolyChord layout under a chains root:
//!
//! ```text
//! <root>/<label>/<label>_polychord_raw/<label>_dead-birth.txt
//! <root>/<label>/<label>_polychord_raw/<label>_phys_live-birth.txt   (optional)
//! <root>/<label>/<label>_polychord_raw/<label>.paramnames   (optional)
//! ```
//!
//! Points still live at termination are appended to the dead points.
//! A label must be a single path component.
//!
//! The path without the suffix is the chain *stem*.
//!
//! # Example
//!
//! ```ignore
//! use suspiciousness::chains::{ChainStore, PolyChordStore};
//!
//! let store = PolyChordStore::new("chains/uniform");
//! let act = store.load("act")?;
//! println!("{} dead points", act.len());
//! ```

mod polychord;

pub use polychord::{read_dead_birth, read_live_birth, read_paramnames, DeadBirth};

use std::fmt;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{Error, ResolutionKind, Result};
use crate::nested::NestedSamples;

/// Suffix of the PolyChord dead-points file carrying birth contours.
pub const DEAD_BIRTH_SUFFIX: &str = "_dead-birth.txt";

/// Suffix of the optional file of points live at termination.
pub const LIVE_BIRTH_SUFFIX: &str = "_phys_live-birth.txt";

/// Suffix of the optional parameter-names file.
pub const PARAMNAMES_SUFFIX: &str = ".paramnames";

/// Errors that can occur while reading a chain file.
#[derive(Debug)]
pub enum ChainError {
    /// IO error reading the file.
    Io(std::io::Error),

    /// Parse error at a specific line.
    Parse {
        /// Line number where the error occurred (1-indexed).
        line: usize,
        /// Description of the parse error.
        message: String,
    },

    /// The chain contains no dead points.
    Empty,

    /// Columns of a chain disagree in length or width.
    Inconsistent(String),
}

impl fmt::Display for ChainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChainError::Io(e) => write!(f, "IO error: {}", e),
            ChainError::Parse { line, message } => {
                write!(f, "parse error at line {}: {}", line, message)
            }
            ChainError::Empty => write!(f, "chain contains no dead points"),
            ChainError::Inconsistent(message) => write!(f, "inconsistent chain: {}", message),
        }
    }
}

impl std::error::Error for ChainError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ChainError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ChainError {
    fn from(e: std::io::Error) -> Self {
        ChainError::Io(e)
    }
}

/// Source of chain objects addressed by label.
pub trait ChainStore {
    /// Load the chain for `label`.
    ///
    /// # Errors
    /// `Resolution` naming the label if no chain exists for it or the
    /// chain cannot be read.
    fn load(&self, label: &str) -> Result<NestedSamples>;
}

/// Filesystem store following the PolyChord directory convention.
#[derive(Debug, Clone)]
pub struct PolyChordStore {
    root: PathBuf,
}

impl PolyChordStore {
    /// Create a store rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The chains root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Chain stem for `label`: `root/label/label_polychord_raw/label`.
    pub fn stem(&self, label: &str) -> PathBuf {
        self.root
            .join(label)
            .join(format!("{}_polychord_raw", label))
            .join(label)
    }

    /// Whether a chain exists for `label`.
    pub fn contains(&self, label: &str) -> bool {
        check_label(label).is_ok() && with_suffix(&self.stem(label), DEAD_BIRTH_SUFFIX).is_file()
    }
}

impl ChainStore for PolyChordStore {
    fn load(&self, label: &str) -> Result<NestedSamples> {
        check_label(label)?;
        let stem = self.stem(label);
        let dead_birth = with_suffix(&stem, DEAD_BIRTH_SUFFIX);
        if !dead_birth.is_file() {
            return Err(Error::resolution(
                label,
                ResolutionKind::NotFound { path: dead_birth },
            ));
        }

        debug!(label, path = %dead_birth.display(), "loading chain");
        let chain_err = |e: ChainError| Error::resolution(label, ResolutionKind::Chain(e));

        let mut points = read_dead_birth(&dead_birth).map_err(chain_err)?;
        let live_birth = with_suffix(&stem, LIVE_BIRTH_SUFFIX);
        if live_birth.is_file() {
            let live = read_live_birth(&live_birth).map_err(chain_err)?;
            debug!(label, live_points = live.len(), "appending live points");
            points.append(live).map_err(chain_err)?;
        }
        let DeadBirth {
            params,
            logl,
            logl_birth,
        } = points;

        let paramnames = with_suffix(&stem, PARAMNAMES_SUFFIX);
        let names = if paramnames.is_file() {
            read_paramnames(&paramnames)
                .map_err(chain_err)?
                .into_iter()
                .map(|(name, _latex)| name)
                .collect()
        } else {
            Vec::new()
        };

        let samples = NestedSamples::with_params(params, logl, logl_birth)
            .and_then(|s| s.with_param_names(names))
            .map_err(chain_err)?
            .with_label(label);
        debug!(label, dead_points = samples.len(), "chain loaded");
        Ok(samples)
    }
}

/// Reject labels that would address a file outside the chains root.
fn check_label(label: &str) -> Result<()> {
    let mut components = Path::new(label).components();
    let single = matches!(
        (components.next(), components.next()),
        (Some(std::path::Component::Normal(_)), None)
    );
    if single && !label.contains(['/', '\\']) {
        Ok(())
    } else {
        Err(Error::resolution(label, ResolutionKind::InvalidLabel))
    }
}

fn with_suffix(stem: &Path, suffix: &str) -> PathBuf {
    let mut path = stem.as_os_str().to_owned();
    path.push(suffix);
    PathBuf::from(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_chain(root: &Path, label: &str, contents: &str) {
        let store = PolyChordStore::new(root);
        let stem = store.stem(label);
        fs::create_dir_all(stem.parent().unwrap()).unwrap();
        fs::write(with_suffix(&stem, DEAD_BIRTH_SUFFIX), contents).unwrap();
    }

    #[test]
    fn test_stem_layout() {
        let store = PolyChordStore::new("chains/uniform");
        assert_eq!(
            store.stem("act"),
            PathBuf::from("chains/uniform/act/act_polychord_raw/act")
        );
    }

    #[test]
    fn test_missing_label_is_resolution_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = PolyChordStore::new(dir.path());
        assert!(!store.contains("planck"));

        let err = store.load("planck").unwrap_err();
        assert!(err.is_resolution());
        assert_eq!(err.run(), "planck");
        assert!(err.to_string().contains("planck_dead-birth.txt"));
    }

    #[test]
    fn test_load_with_paramnames() {
        let dir = tempfile::tempdir().unwrap();
        write_chain(
            dir.path(),
            "bao",
            "0.1 0.2 -5.0 -1e30\n0.3 0.4 -3.0 -1e30\n0.5 0.6 -4.0 -1e30\n",
        );
        let store = PolyChordStore::new(dir.path());
        let stem = store.stem("bao");
        fs::write(
            with_suffix(&stem, PARAMNAMES_SUFFIX),
            "omegam  \\Omega_m\nH0*  H_0\n",
        )
        .unwrap();

        let chain = store.load("bao").unwrap();
        assert_eq!(chain.label(), Some("bao"));
        assert_eq!(chain.len(), 3);
        assert_eq!(chain.param_names(), &["omegam".to_string(), "H0".to_string()]);
        // Sorted by logL on construction
        assert_eq!(chain.logl(), &[-5.0, -4.0, -3.0]);
    }

    #[test]
    fn test_live_points_appended() {
        let dir = tempfile::tempdir().unwrap();
        write_chain(dir.path(), "act", "0.1 -5.0 -1e30\n0.2 -4.0 -1e30\n");
        let stem = PolyChordStore::new(dir.path()).stem("act");
        fs::write(with_suffix(&stem, LIVE_BIRTH_SUFFIX), "0.3 -1.0 -5.0\n").unwrap();

        let chain = PolyChordStore::new(dir.path()).load("act").unwrap();
        assert_eq!(chain.len(), 3);
        assert_eq!(chain.logl(), &[-5.0, -4.0, -1.0]);
    }

    #[test]
    fn test_labels_stay_inside_root() {
        let dir = tempfile::tempdir().unwrap();
        let store = PolyChordStore::new(dir.path());
        for label in ["../act", "act/bao", "/etc", "..", ".", "", "a\\b"] {
            let err = store.load(label).unwrap_err();
            assert!(err.is_resolution(), "label {:?}", label);
            assert_eq!(err.run(), label);
            assert!(err.to_string().contains("single path component"));
            assert!(!store.contains(label));
        }
    }

    #[test]
    fn test_malformed_chain_names_label() {
        let dir = tempfile::tempdir().unwrap();
        write_chain(dir.path(), "act", "0.1 -5.0 -1e30\n0.2 oops -1e30\n");
        let store = PolyChordStore::new(dir.path());

        let err = store.load("act").unwrap_err();
        assert_eq!(err.run(), "act");
        assert!(err.to_string().contains("line 2"), "got: {}", err);
    }
}
