//! Closed-form checks of both formula families.
//!
//! Tests the per-sample formulas on hand-built statistic tables:
//! - Uncorrelated scenario with known logR, logS, logI, d and p
//! - Correlated scenario with known values
//! - Degenerate dimensionality propagating NaN
//! - Reports: one resolution, consistent series, JSON and terminal output

use suspiciousness::statistics::chi2;
use suspiciousness::{correlated, output, uncorrelated, Config, Family, StatsTable};

fn table(log_z: f64, log_l_p: f64, d_kl: f64, d_g: f64) -> StatsTable {
    StatsTable::new(vec![log_z], vec![log_l_p], vec![d_kl], vec![d_g]).unwrap()
}

fn close(a: f64, b: f64, tol: f64) -> bool {
    (a - b).abs() <= tol
}

// ============================================================================
// Uncorrelated family
// ============================================================================

#[test]
fn uncorrelated_closed_forms() {
    let a = table(-10.0, 5.0, 2.0, 3.0);
    let b = table(-12.0, 4.0, 3.0, 2.0);
    let ab = table(-21.0, 8.0, 4.0, 4.0);
    let config = Config::new();

    let r = uncorrelated::report(&a, &b, &ab, &config).unwrap();
    assert_eq!(r.family, Family::Uncorrelated);
    assert_eq!(r.log_r.values(), &[1.0]);
    assert_eq!(r.log_s.values(), &[-1.0]);
    assert_eq!(r.log_i.values(), &[1.0]);
    assert_eq!(r.d.values(), &[1.0]);

    // chi2.sf(d - 2 logS = 3, d = 1)
    assert!(close(r.p.values()[0], 0.083_264_516_663_550_6, 1e-10));
    assert!(close(r.log_p.values()[0], 0.083_264_516_663_550_6f64.ln(), 1e-9));
}

#[test]
fn uncorrelated_report_matches_single_calls() {
    let a = table(-10.0, 5.0, 2.0, 3.0);
    let b = table(-12.0, 4.0, 3.0, 2.0);
    let ab = table(-21.0, 8.0, 4.0, 4.0);
    let config = Config::new();

    let r = uncorrelated::report(&a, &b, &ab, &config).unwrap();
    assert_eq!(r.log_r, uncorrelated::log_r(&a, &b, &ab, &config).unwrap());
    assert_eq!(r.log_s, uncorrelated::log_s(&a, &b, &ab, &config).unwrap());
    assert_eq!(r.log_i, uncorrelated::log_i(&a, &b, &ab, &config).unwrap());
    assert_eq!(r.d, uncorrelated::d(&a, &b, &ab, &config).unwrap());
    assert_eq!(r.log_p, uncorrelated::log_p(&a, &b, &ab, &config).unwrap());
    assert_eq!(r.p, uncorrelated::p(&a, &b, &ab, &config).unwrap());
}

#[test]
fn pure_table_functions_match_adapter() {
    let a = table(-10.0, 5.0, 2.0, 3.0);
    let b = table(-12.0, 4.0, 3.0, 2.0);
    let ab = table(-21.0, 8.0, 4.0, 4.0);

    let via_adapter = uncorrelated::p(&a, &b, &ab, &Config::new()).unwrap();
    assert_eq!(uncorrelated::tables::p(&a, &b, &ab), via_adapter);
}

#[test]
fn concordant_datasets_are_consistent() {
    // Joint fit loses nothing: logS = 0 and d - 2 logS = d ⇒ p = sf(d, d)
    let a = table(-5.0, -1.0, 2.0, 2.0);
    let b = table(-6.0, -1.5, 2.0, 2.0);
    let ab = table(-9.0, -2.5, 3.0, 2.0);
    let p = uncorrelated::p(&a, &b, &ab, &Config::new()).unwrap();
    assert!(close(p.values()[0], chi2::sf(2.0, 2.0), 1e-12));
    assert!(p.values()[0] > 0.05);
}

// ============================================================================
// Correlated family
// ============================================================================

#[test]
fn correlated_closed_forms() {
    let h1 = table(-22.0, 9.0, 5.0, 5.0);
    let h0 = table(-21.0, 8.0, 4.0, 4.0);
    let config = Config::new();

    assert_eq!(correlated::log_r(&h1, &h0, &config).unwrap().values(), &[1.0]);
    assert_eq!(correlated::log_s(&h1, &h0, &config).unwrap().values(), &[-1.0]);
    assert_eq!(correlated::log_i(&h1, &h0, &config).unwrap().values(), &[1.0]);
    assert_eq!(correlated::d(&h1, &h0, &config).unwrap().values(), &[1.0]);

    let p = correlated::p(&h1, &h0, &config).unwrap();
    assert!(close(p.values()[0], chi2::sf(3.0, 1.0), 1e-14));
}

#[test]
fn correlated_report_family_and_runs() {
    let h1 = table(-22.0, 9.0, 5.0, 5.0).with_name("split");
    let h0 = table(-21.0, 8.0, 4.0, 4.0).with_name("shared");
    let r = correlated::report(&h1, &h0, &Config::new()).unwrap();
    assert_eq!(r.family, Family::Correlated);
    assert_eq!(r.runs, vec!["stats 'split'", "stats 'shared'"]);
}

// ============================================================================
// Degenerate inputs
// ============================================================================

#[test]
fn non_positive_dimensionality_gives_nan() {
    let h1 = table(-22.0, 9.0, 5.0, 4.0);
    let h0 = table(-21.0, 8.0, 4.0, 4.0);
    let config = Config::new();

    assert_eq!(correlated::d(&h1, &h0, &config).unwrap().values(), &[0.0]);
    assert!(correlated::p(&h1, &h0, &config).unwrap().values()[0].is_nan());
    assert!(correlated::log_p(&h1, &h0, &config).unwrap().values()[0].is_nan());
}

#[test]
fn extreme_tension_log_p_stays_finite() {
    // logS = -1000, d = 2 ⇒ sf underflows but ln sf ≈ -1000
    let h1 = table(0.0, 1000.0, 0.0, 2.0);
    let h0 = table(0.0, 0.0, 0.0, 0.0);
    let config = Config::new();

    let p = correlated::p(&h1, &h0, &config).unwrap();
    let log_p = correlated::log_p(&h1, &h0, &config).unwrap();
    assert!(p.values()[0] >= 0.0 && p.values()[0] < 1e-300);
    assert!(close(log_p.values()[0], -1001.0, 1e-6), "logp = {}", log_p.values()[0]);
}

// ============================================================================
// Weighted samples
// ============================================================================

#[test]
fn weighted_summary() {
    let w = vec![1.0, 3.0];
    let h1 = StatsTable::with_weights(
        vec![-20.0, -22.0],
        vec![9.0, 9.0],
        vec![5.0, 5.0],
        vec![5.0, 5.0],
        w.clone(),
    )
    .unwrap();
    let h0 = StatsTable::with_weights(
        vec![-21.0, -21.0],
        vec![8.0, 8.0],
        vec![4.0, 4.0],
        vec![4.0, 4.0],
        w,
    )
    .unwrap();

    let log_r = correlated::log_r(&h1, &h0, &Config::new()).unwrap();
    assert_eq!(log_r.values(), &[-1.0, 1.0]);
    assert_eq!(log_r.weights(), &[1.0, 3.0]);
    // (1·-1 + 3·1) / 4
    assert!(close(log_r.mean(), 0.5, 1e-12));
}

// ============================================================================
// Output
// ============================================================================

#[test]
fn summary_json_lists_every_diagnostic() {
    let h1 = table(-22.0, 9.0, 5.0, 5.0);
    let h0 = table(-21.0, 8.0, 4.0, 4.0);
    let r = correlated::report(&h1, &h0, &Config::new()).unwrap();

    let value: serde_json::Value = serde_json::from_str(&output::summary_json(&r).unwrap()).unwrap();
    let names: Vec<&str> = value["summaries"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["logR", "logS", "logI", "d", "logp", "p", "sigma"]);
}

#[test]
fn terminal_report_verdict() {
    let a = table(-10.0, 5.0, 2.0, 3.0);
    let b = table(-12.0, 4.0, 3.0, 2.0);
    let ab = table(-21.0, 8.0, 4.0, 4.0);
    let r = uncorrelated::report(&a, &b, &ab, &Config::new()).unwrap();

    // p ≈ 0.083
    let text = output::format_report(&r);
    assert!(text.contains("CONSISTENT"));
    assert!(text.contains("uncorrelated"));
}
