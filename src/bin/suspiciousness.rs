//! Command-line tension statistics between nested-sampling runs.
//!
//! # Usage
//!
//! ```bash
//! # Independent priors: A, B and the joint run AB, by label
//! suspiciousness --chains chains/uniform uncorrelated act bao actbao
//!
//! # Correlated priors: H1 and H0
//! suspiciousness --chains chains/correlated correlated split shared
//!
//! # Saved statistic tables, JSON output to a file
//! suspiciousness --json --output tension.json uncorrelated a.json b.json ab.json
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use suspiciousness::{correlated, output, uncorrelated, Config, Run, StatsTable, TensionReport};

#[derive(Parser)]
#[command(name = "suspiciousness")]
#[command(about = "Bayesian tension statistics between nested-sampling runs")]
#[command(version)]
struct Cli {
    /// Log verbosity level (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value = "warn")]
    log_level: tracing::Level,

    /// Chains root that labels are resolved against.
    /// Defaults to $SUSPICIOUSNESS_CHAINS.
    #[arg(long, global = true)]
    chains: Option<PathBuf>,

    /// Simulated prior-volume realisations per chain
    #[arg(long, global = true)]
    nsamples: Option<usize>,

    /// Use the expected compression (one sample per run) instead of simulation
    #[arg(long, global = true, conflicts_with = "nsamples")]
    expected: bool,

    /// Seed for volume simulation
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Print `name = mean ± std` for each diagnostic as it is computed
    #[arg(long, global = true)]
    show: bool,

    /// Emit JSON instead of a terminal summary
    #[arg(long, global = true)]
    json: bool,

    /// Include every per-sample value in JSON output
    #[arg(long, global = true, requires = "json")]
    full: bool,

    /// Output file. Defaults to stdout.
    #[arg(short, long, global = true)]
    output: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Datasets analysed with independent priors
    Uncorrelated {
        /// Dataset A: label or saved table (.json)
        a: String,
        /// Dataset B: label or saved table (.json)
        b: String,
        /// Joint run AB: label or saved table (.json)
        ab: String,
    },

    /// Datasets analysed with correlated priors
    Correlated {
        /// Alternative hypothesis H1: label or saved table (.json)
        h1: String,
        /// Null hypothesis H0: label or saved table (.json)
        h0: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(cli.log_level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = build_config(&cli);
    tracing::info!(chains = ?config.chains, nsamples = ?config.nsamples, "resolving runs");

    let report = match &cli.command {
        Commands::Uncorrelated { a, b, ab } => {
            let tables = load_tables(&[a, b, ab])?;
            uncorrelated::report(
                run(a, &tables[0]),
                run(b, &tables[1]),
                run(ab, &tables[2]),
                &config,
            )?
        }
        Commands::Correlated { h1, h0 } => {
            let tables = load_tables(&[h1, h0])?;
            correlated::report(run(h1, &tables[0]), run(h0, &tables[1]), &config)?
        }
    };
    tracing::info!(p = report.p.mean(), "tension computed");

    write_report(&cli, &report)
}

fn build_config(cli: &Cli) -> Config {
    let mut config = Config::from_env();
    if let Some(root) = &cli.chains {
        config = config.chains(root);
    }
    if let Some(n) = cli.nsamples {
        config = config.nsamples(n.max(1));
    }
    if cli.expected {
        config = config.expected_volume();
    }
    if let Some(seed) = cli.seed {
        config = config.seed(seed);
    }
    config.show(cli.show)
}

fn is_table_path(arg: &str) -> bool {
    Path::new(arg)
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}

/// Load every argument that names a saved table; labels yield `None`.
fn load_tables(args: &[&String]) -> Result<Vec<Option<StatsTable>>> {
    args.iter()
        .map(|arg| {
            if is_table_path(arg) {
                StatsTable::read_json(Path::new(arg.as_str()))
                    .map(Some)
                    .with_context(|| format!("loading statistic table {}", arg))
            } else {
                Ok(None)
            }
        })
        .collect()
}

fn run<'a>(arg: &'a str, table: &'a Option<StatsTable>) -> Run<'a> {
    match table {
        Some(table) => Run::Stats(table),
        None => Run::Label(arg),
    }
}

fn write_report(cli: &Cli, report: &TensionReport) -> Result<()> {
    let text = if cli.json {
        if cli.full {
            output::to_json_pretty(report)?
        } else {
            output::summary_json(report)?
        }
    } else {
        output::format_report(report)
    };

    if let Some(path) = &cli.output {
        std::fs::write(path, text).with_context(|| format!("writing {}", path.display()))?;
    } else {
        println!("{}", text);
    }
    Ok(())
}
