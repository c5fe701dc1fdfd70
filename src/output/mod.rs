//! Output formatting for tension diagnostics.
//!
//! This module provides formatters for displaying results in different formats:
//! - Terminal: Human-readable output with colors and box drawing
//! - JSON: Machine-readable serialization

mod json;
mod terminal;

pub use json::{summary_json, to_json, to_json_pretty};
pub use terminal::{format_report, format_series};

use std::io::{self, Write};

use crate::config::Config;
use crate::types::Series;

/// Write `name = mean ± std` and a newline to `out`.
pub fn write_summary<W: Write>(out: &mut W, series: &Series) -> io::Result<()> {
    writeln!(out, "{}", format_series(series))
}

/// Print `name = mean ± std` to stdout.
pub fn print_summary(series: &Series) {
    // A closed stdout only loses the summary.
    let _ = write_summary(&mut io::stdout().lock(), series);
}

/// Print the series if `config.show` is set, then hand it back.
pub(crate) fn show(series: Series, config: &Config) -> Series {
    if config.show {
        print_summary(&series);
    }
    series
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_summary_line() {
        let series = Series::new("logR", vec![1.0, 3.0], vec![1.0, 1.0]);
        let mut out = Vec::new();
        write_summary(&mut out, &series).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text, format!("logR = 2 ± {}\n", series.std()));
    }

    #[test]
    fn test_show_returns_series_unchanged() {
        let series = Series::new("d", vec![0.5], vec![1.0]);
        let shown = show(series.clone(), &Config::new().show(true));
        assert_eq!(shown, series);
        assert_eq!(shown.name(), "d");
    }
}
