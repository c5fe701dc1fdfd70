//! Readers for PolyChord output files.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use super::ChainError;

/// Contents of a `_dead-birth.txt` file.
#[derive(Debug, Clone, Default)]
pub struct DeadBirth {
    /// Parameter values, one row per dead point.
    pub params: Vec<Vec<f64>>,
    /// Log-likelihood at death.
    pub logl: Vec<f64>,
    /// Log-likelihood contour at which the point was born.
    pub logl_birth: Vec<f64>,
}

impl DeadBirth {
    /// Number of points.
    pub fn len(&self) -> usize {
        self.logl.len()
    }

    /// Returns true if there are no points.
    pub fn is_empty(&self) -> bool {
        self.logl.is_empty()
    }

    /// Append the points of `other`, which must have the same parameter width.
    ///
    /// # Errors
    /// `ChainError::Inconsistent` if the parameter widths differ.
    pub fn append(&mut self, other: DeadBirth) -> Result<(), ChainError> {
        let width = |d: &DeadBirth| d.params.first().map(Vec::len);
        if let (Some(a), Some(b)) = (width(self), width(&other)) {
            if a != b {
                return Err(ChainError::Inconsistent(format!(
                    "{} parameter columns in dead points, {} in live points",
                    a, b
                )));
            }
        }
        self.params.extend(other.params);
        self.logl.extend(other.logl);
        self.logl_birth.extend(other.logl_birth);
        Ok(())
    }
}

/// Read a PolyChord dead-birth file.
///
/// Each row holds whitespace-separated columns `params..., logL, logL_birth`.
/// Blank lines and lines starting with `#` are skipped. Every row must have
/// the same number of columns.
///
/// # Errors
/// `ChainError::Parse` on a malformed row, `ChainError::Empty` if the file
/// has no rows.
pub fn read_dead_birth(path: &Path) -> Result<DeadBirth, ChainError> {
    let out = read_birth_rows(path)?;
    if out.is_empty() {
        return Err(ChainError::Empty);
    }
    Ok(out)
}

/// Read a PolyChord `_phys_live-birth.txt` file of points still live at
/// termination.
///
/// Same layout as the dead-birth file. An empty file yields no points.
pub fn read_live_birth(path: &Path) -> Result<DeadBirth, ChainError> {
    read_birth_rows(path)
}

fn read_birth_rows(path: &Path) -> Result<DeadBirth, ChainError> {
    let reader = BufReader::new(File::open(path)?);
    let mut out = DeadBirth::default();
    let mut width: Option<usize> = None;

    for (line_num, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let row = line
            .split_whitespace()
            .map(|tok| {
                tok.parse::<f64>().map_err(|_| ChainError::Parse {
                    line: line_num + 1,
                    message: format!("invalid number '{}'", tok),
                })
            })
            .collect::<Result<Vec<f64>, _>>()?;

        if row.len() < 2 {
            return Err(ChainError::Parse {
                line: line_num + 1,
                message: format!("expected at least 2 columns, got {}", row.len()),
            });
        }
        match width {
            Some(w) if w != row.len() => {
                return Err(ChainError::Parse {
                    line: line_num + 1,
                    message: format!("expected {} columns, got {}", w, row.len()),
                });
            }
            None => width = Some(row.len()),
            _ => {}
        }

        let n = row.len();
        out.logl.push(row[n - 2]);
        out.logl_birth.push(row[n - 1]);
        out.params.push(row[..n - 2].to_vec());
    }
    Ok(out)
}

/// Read a `.paramnames` file into `(name, latex)` pairs.
///
/// Derived parameters are marked with a trailing `*`, which is stripped.
pub fn read_paramnames(path: &Path) -> Result<Vec<(String, String)>, ChainError> {
    let reader = BufReader::new(File::open(path)?);
    let mut names = Vec::new();

    for (line_num, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let (name, latex) = match line.split_once(char::is_whitespace) {
            Some((name, latex)) => (name, latex.trim()),
            None => (line, ""),
        };
        let name = name.trim_end_matches('*');
        if name.is_empty() {
            return Err(ChainError::Parse {
                line: line_num + 1,
                message: "empty parameter name".to_string(),
            });
        }
        names.push((name.to_string(), latex.to_string()));
    }
    Ok(names)
}
