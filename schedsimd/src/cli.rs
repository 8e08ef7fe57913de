//! Command-line parsing

use crate::runtime::{HostConfig, HostError};
use sim_logger::LogLevel;
use std::path::PathBuf;

/// What the command line asked for
#[derive(Debug, Clone, PartialEq)]
pub enum CliCommand {
    Run(HostConfig),
    Help,
}

/// Parses `args`, including the program name at index 0
pub fn parse_args(args: &[String]) -> Result<CliCommand, HostError> {
    let mut config_path: Option<PathBuf> = None;
    let mut config = HostConfig::new(PathBuf::new());
    let mut i = 1;

    while i < args.len() {
        match args[i].as_str() {
            "--config" | "-c" => {
                config_path = Some(PathBuf::from(value_for(args, &mut i, "--config")?));
            }
            "--policy" | "-p" => {
                let value = value_for(args, &mut i, "--policy")?;
                config.policy = value.parse().map_err(HostError::Usage)?;
            }
            "--out-dir" | "-o" => {
                config.out_dir = PathBuf::from(value_for(args, &mut i, "--out-dir")?);
            }
            "--seed" => {
                let value = value_for(args, &mut i, "--seed")?;
                config.seed = Some(
                    value
                        .parse()
                        .map_err(|_| HostError::Usage(format!("Invalid seed value: {}", value)))?,
                );
            }
            "--format" | "-f" => {
                let value = value_for(args, &mut i, "--format")?;
                config.format = value.parse().map_err(HostError::Usage)?;
            }
            "--log-level" => {
                let value = value_for(args, &mut i, "--log-level")?;
                config.log_level = value.parse::<LogLevel>().map_err(HostError::Usage)?;
            }
            "--help" | "-h" => return Ok(CliCommand::Help),
            other => {
                return Err(HostError::Usage(format!("Unknown option: {}", other)));
            }
        }
        i += 1;
    }

    config.config_path =
        config_path.ok_or_else(|| HostError::Usage("Missing required option --config".to_string()))?;
    Ok(CliCommand::Run(config))
}

fn value_for<'a>(args: &'a [String], i: &mut usize, option: &str) -> Result<&'a str, HostError> {
    *i += 1;
    args.get(*i)
        .map(String::as_str)
        .ok_or_else(|| HostError::Usage(format!("Missing value for {}", option)))
}

/// Usage text
pub fn usage(program: &str) -> String {
    format!(
        "Usage: {program} --config <FILE> [OPTIONS]

Options:
  -c, --config <FILE>       Configuration file (legacy directives, or JSON if *.json)
  -p, --policy <POLICY>     fcfs, spn or all (default: spn)
  -o, --out-dir <DIR>       Directory for the summary files (default: summary)
      --seed <N>            Seed for the deviate source (overrides the file)
  -f, --format <FORMAT>     text or json (default: text)
      --log-level <LEVEL>   debug, info, warn or error (default: info)
  -h, --help                Show this help message

Examples:
  {program} --config scheduling.conf
  {program} --config scheduling.conf --policy all --seed 42
"
    )
}
