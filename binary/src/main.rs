use std::{fs, path::PathBuf};

use alpha_mining::{
    alpha_discover_petri_net, parse_event_log, AlphaConfig, AlphaError, EventLog,
};
use anyhow::{bail, Context, Result};
use clap::{crate_version, ArgGroup, Parser};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use env_logger::Builder;

/// Discover a workflow net from an event log using the Alpha algorithm
///
/// The log is written in angle-bracket notation, e.g., `<a,b,c>,<a,c,b>`.
#[derive(Debug, Parser)]
#[command(name = "alpha-miner", version = crate_version!())]
#[command(group(ArgGroup::new("input").required(true).args(["log", "file"])))]
struct Cli {
    /// Event log given directly on the command line
    #[arg(short, long)]
    log: Option<String>,

    /// Read the event log from a file
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// JSON file with algorithm parameters (see `AlphaConfig`)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Maximal number of distinct activities (overrides the config file)
    #[arg(long)]
    max_activities: Option<usize>,

    /// Abort candidate building after this many milliseconds
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// Build candidates in parallel
    #[arg(long)]
    parallel: bool,

    /// Print the net and report as JSON instead of text
    #[arg(long)]
    json: bool,

    #[command(flatten)]
    verbose: Verbosity<WarnLevel>,
}

fn load_config(cli: &Cli) -> Result<AlphaConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            let json = fs::read_to_string(path)
                .with_context(|| format!("Reading config file {}", path.display()))?;
            AlphaConfig::from_json(&json)
                .with_context(|| format!("Parsing config file {}", path.display()))?
        }
        None => AlphaConfig::default(),
    };
    if let Some(max) = cli.max_activities {
        config.max_activities = max;
    }
    if cli.timeout_ms.is_some() {
        config.timeout_ms = cli.timeout_ms;
    }
    config.parallel |= cli.parallel;
    Ok(config)
}

fn load_log(cli: &Cli) -> Result<EventLog> {
    let text = match (&cli.log, &cli.file) {
        (Some(log), _) => log.clone(),
        (None, Some(path)) => fs::read_to_string(path)
            .with_context(|| format!("Reading event log {}", path.display()))?,
        (None, None) => bail!("No event log given"),
    };
    parse_event_log(&text).context("Invalid event log")
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    Builder::new()
        .filter_level(cli.verbose.log_level_filter())
        .init();

    let config = load_config(&cli)?;
    log::debug!("Using config {}", config.to_json());
    let event_log = load_log(&cli)?;
    log::info!("Loaded event log with {} traces", event_log.traces().len());

    let result = match alpha_discover_petri_net(&event_log, &config) {
        Ok(result) => result,
        Err(e) if e.is_internal() => {
            return Err(e).context("Alpha discovery failed due to an internal error")
        }
        Err(e @ AlphaError::ResourceLimit { .. }) => {
            return Err(e).context("Log too large; raise --max-activities to allow it")
        }
        Err(e) => return Err(e).context("Alpha discovery aborted"),
    };

    if cli.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&result)?
        );
    } else {
        println!("{}", result.report);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_defaults() {
        let cli = Cli::try_parse_from([
            "alpha-miner",
            "--log",
            "<a,b>,<a,c>",
            "--max-activities",
            "8",
            "--parallel",
        ])
        .unwrap();
        let config = load_config(&cli).unwrap();
        assert_eq!(config.max_activities, 8);
        assert!(config.parallel);
        assert_eq!(config.timeout_ms, None);
        assert_eq!(load_log(&cli).unwrap().traces().len(), 2);
    }

    #[test]
    fn requires_an_input() {
        assert!(Cli::try_parse_from(["alpha-miner"]).is_err());
        let cli = Cli::try_parse_from(["alpha-miner", "--log", "<a,b"]).unwrap();
        assert!(load_log(&cli).is_err());
    }
}
