//! Terminal output formatting with colors and box drawing.

use colored::Colorize;

use crate::report::{Family, Summary, TensionReport};
use crate::types::Series;

/// p-value below which datasets are reported as in tension.
const TENSION_P: f64 = 0.05;

/// p-value below which the tension is highlighted as strong.
const STRONG_TENSION_P: f64 = 0.003;

/// Format one diagnostic as `name = mean ± std`.
pub fn format_series(series: &Series) -> String {
    format!("{} = {} ± {}", series.name(), series.mean(), series.std())
}

/// Format a TensionReport for human-readable terminal output.
///
/// The header verdict uses the weighted mean p-value.
pub fn format_report(report: &TensionReport) -> String {
    let mut output = String::new();

    let p = report.p.mean();
    let header = if p.is_nan() {
        format!("{} {}", "?".yellow().bold(), "UNDEFINED (d <= 0)".yellow().bold())
    } else if p < STRONG_TENSION_P {
        format!("{} {}", "\u{26A0}".red().bold(), "STRONG TENSION".red().bold())
    } else if p < TENSION_P {
        format!("{} {}", "\u{26A0}".yellow().bold(), "TENSION".yellow().bold())
    } else {
        format!("{} {}", "\u{2713}".green().bold(), "CONSISTENT".green().bold())
    };

    output.push_str(&format_box_top());
    output.push_str(&format_box_line(&header));
    output.push_str(&format_box_separator());

    let family = match report.family {
        Family::Uncorrelated => "uncorrelated (A, B, AB)",
        Family::Correlated => "correlated (H1, H0)",
    };
    output.push_str(&format_box_line(&format!("Family: {}", family)));
    output.push_str(&format_box_line(&format!("Runs: {}", report.runs.join(", "))));
    output.push_str(&format_box_line(&format!("Samples: {}", report.p.len())));
    output.push_str(&format_box_separator());

    for summary in report.summaries() {
        output.push_str(&format_box_line(&format_summary(&summary)));
    }

    output.push_str(&format_box_bottom());
    output
}

fn format_summary(summary: &Summary) -> String {
    let line = format!(
        "{:<6} {:>10.4} ± {:<8.4} [{:.3}, {:.3}]",
        summary.name, summary.mean, summary.std, summary.lower, summary.upper
    );
    match summary.name.as_str() {
        "p" if summary.mean < TENSION_P => line.red().to_string(),
        "p" => line.green().to_string(),
        _ => line,
    }
}

// Box drawing helpers

const BOX_WIDTH: usize = 60;

fn format_box_top() -> String {
    format!("\u{250C}{}\u{2510}\n", "\u{2500}".repeat(BOX_WIDTH))
}

fn format_box_bottom() -> String {
    format!("\u{2514}{}\u{2518}\n", "\u{2500}".repeat(BOX_WIDTH))
}

fn format_box_separator() -> String {
    format!("\u{251C}{}\u{2524}\n", "\u{2500}".repeat(BOX_WIDTH))
}

fn format_box_line(content: &str) -> String {
    let visible_len = strip_ansi_codes(content).chars().count();
    let padding = (BOX_WIDTH - 2).saturating_sub(visible_len);
    format!("\u{2502} {}{} \u{2502}\n", content, " ".repeat(padding))
}

/// Strip ANSI escape codes for accurate length calculation.
fn strip_ansi_codes(s: &str) -> String {
    let mut result = String::new();
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\x1b' {
            // Skip until 'm' (end of ANSI sequence)
            while let Some(&next) = chars.peek() {
                chars.next();
                if next == 'm' {
                    break;
                }
            }
        } else {
            result.push(c);
        }
    }
    result
}
