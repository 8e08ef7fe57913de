//! # Simulation Configuration
//!
//! This crate describes a simulation run: how many processes, how their
//! bursts and I/O intervals are drawn, and how long the run may last.
//!
//! ## Philosophy
//!
//! - **Two formats, one model**: The legacy line-oriented directive file
//!   and versioned JSON both produce a [`SimulationConfig`].
//! - **Fail loudly**: A missing run-time budget or an out-of-range value is
//!   an error, never a silent default.
//! - **Setup is separate from simulation**: [`Workload`] turns a config
//!   into a process table; the driver never sees the config.
//!
//! ## Example
//!
//! ```
//! use sim_config::parse_legacy;
//!
//! let config = parse_legacy("numprocess 2\nprocess 50\nruntime 500\n").unwrap();
//! assert_eq!(config.process_count, 2);
//! assert_eq!(config.processes.len(), 1);
//! assert_eq!(config.run_time_budget, 500);
//! ```

pub mod error;
pub mod legacy;
pub mod persistence;
pub mod workload;

pub use error::{ConfigError, ConfigResult};
pub use legacy::parse_legacy;
pub use persistence::{deserialize_config, serialize_config};
pub use workload::Workload;

use core_types::Ticks;
use serde::{Deserialize, Serialize};
use sim_random::DeviateKind;
use std::path::Path;

/// Declared process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessSpec {
    /// Running ticks between I/O blocks (0 = never blocks)
    pub io_interval: Ticks,
}

/// A complete simulation configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Version of the configuration format (JSON only)
    #[serde(default = "SimulationConfig::current_version")]
    pub version: u32,
    /// Total number of processes; missing ones are synthesized
    #[serde(default = "SimulationConfig::default_process_count")]
    pub process_count: usize,
    /// Mean CPU burst
    #[serde(default = "SimulationConfig::default_run_time_average")]
    pub run_time_average: Ticks,
    /// Spread of the CPU burst around the mean
    #[serde(default = "SimulationConfig::default_run_time_stddev")]
    pub run_time_stddev: Ticks,
    /// Spread of each re-randomized I/O interval
    #[serde(default)]
    pub io_stddev: u64,
    /// Aging weight of the burst estimate, in `[0, 1]`
    #[serde(default)]
    pub alpha: f64,
    /// Initial burst estimate for every process
    #[serde(default)]
    pub base_estimated_execution_time: Option<u64>,
    /// Explicitly declared processes, in table order
    #[serde(default)]
    pub processes: Vec<ProcessSpec>,
    /// Ticks after which the run stops
    pub run_time_budget: Ticks,
    /// Seed for the deviate source
    #[serde(default)]
    pub seed: Option<u64>,
    /// Deviate distribution
    #[serde(default)]
    pub deviate: DeviateKind,
    /// Longest tolerated idle streak before the run is declared stalled
    #[serde(default)]
    pub max_idle_ticks: Option<Ticks>,
}

impl SimulationConfig {
    /// Current version of the JSON format
    pub const CURRENT_VERSION: u32 = 1;

    pub const DEFAULT_PROCESS_COUNT: usize = 5;
    pub const DEFAULT_RUN_TIME_AVERAGE: Ticks = 1000;
    pub const DEFAULT_RUN_TIME_STDDEV: Ticks = 100;

    /// Creates a configuration with default workload parameters
    pub fn new(run_time_budget: Ticks) -> Self {
        Self {
            version: Self::CURRENT_VERSION,
            process_count: Self::DEFAULT_PROCESS_COUNT,
            run_time_average: Self::DEFAULT_RUN_TIME_AVERAGE,
            run_time_stddev: Self::DEFAULT_RUN_TIME_STDDEV,
            io_stddev: 0,
            alpha: 0.0,
            base_estimated_execution_time: None,
            processes: Vec::new(),
            run_time_budget,
            seed: None,
            deviate: DeviateKind::default(),
            max_idle_ticks: None,
        }
    }

    fn current_version() -> u32 {
        Self::CURRENT_VERSION
    }

    fn default_process_count() -> usize {
        Self::DEFAULT_PROCESS_COUNT
    }

    fn default_run_time_average() -> Ticks {
        Self::DEFAULT_RUN_TIME_AVERAGE
    }

    fn default_run_time_stddev() -> Ticks {
        Self::DEFAULT_RUN_TIME_STDDEV
    }

    pub fn with_process_count(mut self, count: usize) -> Self {
        self.process_count = count;
        self
    }

    /// Declares one more process
    pub fn with_process(mut self, io_interval: Ticks) -> Self {
        self.processes.push(ProcessSpec { io_interval });
        self
    }

    pub fn with_burst(mut self, average: Ticks, stddev: Ticks) -> Self {
        self.run_time_average = average;
        self.run_time_stddev = stddev;
        self
    }

    pub fn with_io_stddev(mut self, io_stddev: u64) -> Self {
        self.io_stddev = io_stddev;
        self
    }

    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn with_base_estimate(mut self, estimate: u64) -> Self {
        self.base_estimated_execution_time = Some(estimate);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_deviate(mut self, deviate: DeviateKind) -> Self {
        self.deviate = deviate;
        self
    }

    /// Number of processes the workload will contain
    ///
    /// Declared processes beyond `process_count` are kept.
    pub fn effective_process_count(&self) -> usize {
        self.process_count.max(self.processes.len())
    }

    /// Checks value ranges
    pub fn validate(&self) -> ConfigResult<()> {
        if !self.alpha.is_finite() || !(0.0..=1.0).contains(&self.alpha) {
            return Err(ConfigError::InvalidValue {
                field: "alpha",
                reason: format!("{} is outside [0, 1]", self.alpha),
            });
        }
        Ok(())
    }
}

/// Loads and validates a configuration file
///
/// Files ending in `.json` are read as JSON; anything else is parsed as
/// the legacy directive format.
pub fn load(path: impl AsRef<Path>) -> ConfigResult<SimulationConfig> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    let config = if is_json {
        deserialize_config(text.as_bytes())?
    } else {
        parse_legacy(&text)?
    };

    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{Builder, NamedTempFile};

    #[test]
    fn test_defaults() {
        let config = SimulationConfig::new(1000);
        assert_eq!(config.process_count, 5);
        assert_eq!(config.run_time_average, 1000);
        assert_eq!(config.run_time_stddev, 100);
        assert_eq!(config.io_stddev, 0);
        assert_eq!(config.alpha, 0.0);
        assert_eq!(config.deviate, DeviateKind::Gaussian);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_effective_process_count() {
        let config = SimulationConfig::new(10)
            .with_process_count(1)
            .with_process(5)
            .with_process(7);
        assert_eq!(config.effective_process_count(), 2);

        let config = SimulationConfig::new(10).with_process_count(4).with_process(5);
        assert_eq!(config.effective_process_count(), 4);
    }

    #[test]
    fn test_validate_rejects_alpha_out_of_range() {
        for alpha in [-0.1, 1.5, f64::NAN] {
            let err = SimulationConfig::new(10).with_alpha(alpha).validate();
            assert!(matches!(
                err,
                Err(ConfigError::InvalidValue { field: "alpha", .. })
            ));
        }
    }

    #[test]
    fn test_load_legacy_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "// two processes").unwrap();
        writeln!(file, "numprocess 2").unwrap();
        writeln!(file, "process 100").unwrap();
        writeln!(file, "runtime 5000").unwrap();

        let config = load(file.path()).unwrap();
        assert_eq!(config.process_count, 2);
        assert_eq!(config.processes, vec![ProcessSpec { io_interval: 100 }]);
        assert_eq!(config.run_time_budget, 5000);
    }

    #[test]
    fn test_load_json_file() {
        let mut file = Builder::new().suffix(".json").tempfile().unwrap();
        write!(
            file,
            r#"{{"version": 1, "run_time_budget": 300, "alpha": 0.5, "deviate": "uniform"}}"#
        )
        .unwrap();

        let config = load(file.path()).unwrap();
        assert_eq!(config.run_time_budget, 300);
        assert_eq!(config.alpha, 0.5);
        assert_eq!(config.deviate, DeviateKind::Uniform);
        assert_eq!(config.process_count, 5);
    }

    #[test]
    fn test_load_validates() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "alpha 2.0").unwrap();
        writeln!(file, "runtime 10").unwrap();

        assert!(matches!(
            load(file.path()),
            Err(ConfigError::InvalidValue { field: "alpha", .. })
        ));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("scheduling.conf");
        assert!(matches!(load(&missing), Err(ConfigError::Io { .. })));
    }
}
