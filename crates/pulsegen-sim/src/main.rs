//! pulsegen-sim - run the clock retrofit firmware against a virtual board.

#![deny(clippy::unwrap_used)]

use anyhow::{Context, Result};
use clap::Parser;
use pulsegen_sim::{Scenario, run};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "pulsegen-sim")]
#[command(about = "Simulate the pulsegen clock retrofit firmware")]
#[command(version)]
struct Cli {
    /// Scenario file (YAML, or JSON with a .json extension)
    scenario: PathBuf,

    /// Output the report as JSON
    #[arg(long)]
    json: bool,

    /// Override the scenario duration
    #[arg(long, value_name = "MS")]
    duration_ms: Option<u64>,

    /// Exit with status 2 on bad characters or watchdog resets
    #[arg(long)]
    strict: bool,

    /// Verbose logging
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| log_level.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    let mut scenario = Scenario::from_path(&cli.scenario)
        .with_context(|| format!("loading {}", cli.scenario.display()))?;
    if let Some(duration_ms) = cli.duration_ms {
        scenario.duration_ms = duration_ms;
    }

    let report = run(&scenario).context("running scenario")?;
    if cli.json {
        println!("{}", report.to_json()?);
    } else {
        print!("{report}");
    }

    if cli.strict && !report.is_clean() {
        return Ok(ExitCode::from(2));
    }
    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;

    type TestResult = Result<(), Box<dyn std::error::Error>>;

    #[test]
    fn parse_defaults() -> TestResult {
        let cli = Cli::try_parse_from(["pulsegen-sim", "bench.yaml"])?;
        assert_eq!(cli.scenario, PathBuf::from("bench.yaml"));
        assert!(!cli.json);
        assert!(!cli.strict);
        assert_eq!(cli.verbose, 0);
        assert!(cli.duration_ms.is_none());
        Ok(())
    }

    #[test]
    fn parse_flags() -> TestResult {
        let cli = Cli::try_parse_from([
            "pulsegen-sim",
            "bench.json",
            "--json",
            "--strict",
            "--duration-ms",
            "1500",
            "-vv",
        ])?;
        assert!(cli.json);
        assert!(cli.strict);
        assert_eq!(cli.duration_ms, Some(1500));
        assert_eq!(cli.verbose, 2);
        Ok(())
    }

    #[test]
    fn scenario_is_required() {
        assert!(Cli::try_parse_from(["pulsegen-sim"]).is_err());
    }
}
