//! Error types for run resolution and table validation.
//!
//! Every variant carries the identifier of the offending run (its label,
//! chain label or table name) so the caller can find the malformed input.

use std::fmt;
use std::path::PathBuf;

use crate::chains::ChainError;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by the resolution adapter and the formula layer.
///
/// Numerically degenerate inputs (non-positive degrees of freedom) are
/// not errors: they propagate as NaN through the p-value functions.
#[derive(Debug)]
pub enum Error {
    /// A run could not be turned into a statistic table.
    Resolution {
        /// Identifier of the run that failed to resolve.
        run: String,
        /// What went wrong.
        kind: ResolutionKind,
    },

    /// Statistic tables are internally inconsistent or disagree with each other.
    SchemaMismatch {
        /// Identifier of the offending run.
        run: String,
        /// Identifier of the run it was compared against, if any.
        other: Option<String>,
        /// Description of the mismatch.
        reason: String,
    },
}

/// Reason a run could not be resolved.
#[derive(Debug)]
pub enum ResolutionKind {
    /// A label was given but no chains root is configured.
    NoChainsRoot,

    /// No chain exists at the conventional location for the label.
    NotFound {
        /// The file that was looked for.
        path: PathBuf,
    },

    /// A label is not a single path component below the chains root.
    InvalidLabel,

    /// A table is missing one of the required statistic columns.
    MissingField {
        /// Name of the missing column.
        field: &'static str,
    },

    /// The chain exists but could not be read.
    Chain(ChainError),

    /// A saved statistic table could not be decoded.
    Json(serde_json::Error),
}

impl Error {
    pub(crate) fn resolution(run: impl Into<String>, kind: ResolutionKind) -> Self {
        Error::Resolution {
            run: run.into(),
            kind,
        }
    }

    pub(crate) fn schema(run: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::SchemaMismatch {
            run: run.into(),
            other: None,
            reason: reason.into(),
        }
    }

    /// Identifier of the run this error refers to.
    pub fn run(&self) -> &str {
        match self {
            Error::Resolution { run, .. } | Error::SchemaMismatch { run, .. } => run,
        }
    }

    /// Returns true for resolution failures.
    pub fn is_resolution(&self) -> bool {
        matches!(self, Error::Resolution { .. })
    }

    /// Returns true for schema mismatches.
    pub fn is_schema_mismatch(&self) -> bool {
        matches!(self, Error::SchemaMismatch { .. })
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Resolution { run, kind } => {
                write!(f, "cannot resolve run '{}': ", run)?;
                match kind {
                    ResolutionKind::NoChainsRoot => {
                        write!(f, "a label was given but no chains root is configured")
                    }
                    ResolutionKind::NotFound { path } => {
                        write!(f, "no chain found at {}", path.display())
                    }
                    ResolutionKind::InvalidLabel => {
                        write!(f, "a label must be a single path component")
                    }
                    ResolutionKind::MissingField { field } => {
                        write!(f, "missing required field '{}'", field)
                    }
                    ResolutionKind::Chain(e) => write!(f, "{}", e),
                    ResolutionKind::Json(e) => write!(f, "invalid statistic table: {}", e),
                }
            }
            Error::SchemaMismatch { run, other, reason } => match other {
                Some(other) => write!(
                    f,
                    "schema mismatch between '{}' and '{}': {}",
                    run, other, reason
                ),
                None => write!(f, "schema mismatch in '{}': {}", run, reason),
            },
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Resolution {
                kind: ResolutionKind::Chain(e),
                ..
            } => Some(e),
            Error::Resolution {
                kind: ResolutionKind::Json(e),
                ..
            } => Some(e),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_names_run() {
        let err = Error::resolution(
            "act",
            ResolutionKind::NotFound {
                path: PathBuf::from("chains/act/act_polychord_raw/act_dead-birth.txt"),
            },
        );
        let msg = err.to_string();
        assert!(msg.contains("'act'"), "message should name the run: {}", msg);
        assert!(msg.contains("act_dead-birth.txt"));
        assert_eq!(err.run(), "act");
        assert!(err.is_resolution());
    }

    #[test]
    fn test_schema_mismatch_names_both_runs() {
        let err = Error::SchemaMismatch {
            run: "bao".to_string(),
            other: Some("act".to_string()),
            reason: "3 samples vs 4".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("'bao'") && msg.contains("'act'"));
        assert!(err.is_schema_mismatch());
    }

    #[test]
    fn test_source_chain_error() {
        use std::error::Error as _;

        let err = Error::resolution("act", ResolutionKind::Chain(ChainError::Empty));
        assert!(err.source().is_some());
        let err = Error::resolution("act", ResolutionKind::NoChainsRoot);
        assert!(err.source().is_none());
    }
}
