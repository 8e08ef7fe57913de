//! Legacy directive format
//!
//! One directive per line, whitespace separated:
//!
//! ```text
//! // scheduling.conf
//! numprocess 3
//! run_time_average 2000
//! run_time_stddev 0
//! stand_io_blocking_dev 10
//! alpha 0.5
//! process 100
//! process 500
//! runtime 10000
//! ```
//!
//! Lines starting with `//` or `#` are comments. Tokens after the value
//! are ignored.

use crate::error::{ConfigError, ConfigResult};
use crate::{ProcessSpec, SimulationConfig};
use std::str::FromStr;

/// Parses a legacy configuration
///
/// `runtime` is required. Unknown directives are rejected. Range checks
/// are left to [`SimulationConfig::validate`].
pub fn parse_legacy(text: &str) -> ConfigResult<SimulationConfig> {
    let mut config = SimulationConfig::new(0);
    let mut runtime_seen = false;

    for (index, raw) in text.lines().enumerate() {
        let line = index + 1;
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.starts_with("//") || trimmed.starts_with('#') {
            continue;
        }

        let mut tokens = trimmed.split_whitespace();
        let Some(directive) = tokens.next() else {
            continue;
        };
        let value = tokens.next().ok_or_else(|| ConfigError::MissingValue {
            line,
            directive: directive.to_string(),
        })?;

        match directive {
            "numprocess" => config.process_count = parse_value(line, directive, value)?,
            "run_time_average" => config.run_time_average = parse_value(line, directive, value)?,
            "run_time_stddev" => config.run_time_stddev = parse_value(line, directive, value)?,
            "stand_io_blocking_dev" => config.io_stddev = parse_value(line, directive, value)?,
            "base_estimated_execution_time" => {
                config.base_estimated_execution_time = Some(parse_value(line, directive, value)?)
            }
            "alpha" => config.alpha = parse_value(line, directive, value)?,
            "process" => config.processes.push(ProcessSpec {
                io_interval: parse_value(line, directive, value)?,
            }),
            "runtime" => {
                config.run_time_budget = parse_value(line, directive, value)?;
                runtime_seen = true;
            }
            "seed" => config.seed = Some(parse_value(line, directive, value)?),
            "deviate" => config.deviate = parse_value(line, directive, value)?,
            "max_idle_ticks" => config.max_idle_ticks = Some(parse_value(line, directive, value)?),
            other => {
                return Err(ConfigError::UnknownDirective {
                    line,
                    directive: other.to_string(),
                })
            }
        }
    }

    if !runtime_seen {
        return Err(ConfigError::MissingField("runtime"));
    }
    Ok(config)
}

fn parse_value<T: FromStr>(line: usize, directive: &str, value: &str) -> ConfigResult<T> {
    value.parse().map_err(|_| ConfigError::ParseValue {
        line,
        directive: directive.to_string(),
        value: value.to_string(),
    })
}
