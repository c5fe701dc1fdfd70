//! JSON serialization for tension reports.

use serde::Serialize;

use crate::report::{Family, Summary, TensionReport};

/// Compact view of a report: summaries only, no per-sample values.
#[derive(Debug, Serialize)]
struct SummaryView<'a> {
    family: Family,
    runs: &'a [String],
    summaries: Vec<Summary>,
}

/// Serialize a full report, including every per-sample value, to compact JSON.
///
/// Non-finite values (NaN p-values for degenerate dimensionality) become `null`.
pub fn to_json(report: &TensionReport) -> Result<String, serde_json::Error> {
    serde_json::to_string(report)
}

/// Serialize a full report to pretty-printed JSON.
pub fn to_json_pretty(report: &TensionReport) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(report)
}

/// Serialize only the weighted summaries of a report to pretty-printed JSON.
pub fn summary_json(report: &TensionReport) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&SummaryView {
        family: report.family,
        runs: &report.runs,
        summaries: report.summaries(),
    })
}
