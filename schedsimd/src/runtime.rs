//! # Host Runtime
//!
//! Loads the configuration, runs the selected policies and writes the
//! reports.

use sched_policy::PolicyKind;
use sim_config::{ConfigError, SimulationConfig, Workload};
use sim_driver::{DriverConfig, SimError, SimulationDriver, SimulationRun};
use sim_logger::{LogLevel, Logger};
use sim_report::{
    render_comparison, render_process_log, render_summary, to_json, BurstDistribution,
    ReportError, SUMMARY_PROCESSES, SUMMARY_RESULTS,
};
use std::fmt;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

/// Offset between the workload seed and the seed of the runs
///
/// Keeps the bursts and the I/O re-randomization on separate streams.
const RUN_STREAM_OFFSET: u64 = 1;

/// Host error types
#[derive(Debug, Error)]
pub enum HostError {
    #[error("{0}")]
    Usage(String),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Simulation error: {0}")]
    Simulation(#[from] SimError),

    #[error("Report error: {0}")]
    Report(#[from] ReportError),

    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Output error: {0}")]
    Output(#[from] io::Error),
}

/// Which policies to run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicySelection {
    One(PolicyKind),
    All,
}

impl PolicySelection {
    pub fn kinds(&self) -> Vec<PolicyKind> {
        match self {
            PolicySelection::One(kind) => vec![*kind],
            PolicySelection::All => PolicyKind::ALL.to_vec(),
        }
    }
}

impl FromStr for PolicySelection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("all") {
            Ok(PolicySelection::All)
        } else {
            s.parse().map(PolicySelection::One)
        }
    }
}

/// Report format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Text => "",
            OutputFormat::Json => ".json",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Text => f.write_str("text"),
            OutputFormat::Json => f.write_str("json"),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            other => Err(format!("Invalid format: {}", other)),
        }
    }
}

/// Host configuration
#[derive(Debug, Clone, PartialEq)]
pub struct HostConfig {
    /// Simulation configuration file
    pub config_path: PathBuf,
    /// Policies to run
    pub policy: PolicySelection,
    /// Directory the reports are written to
    pub out_dir: PathBuf,
    /// Seed override; falls back to the file's seed, then a fresh one
    pub seed: Option<u64>,
    /// Report format
    pub format: OutputFormat,
    /// Lowest log level rendered to stderr
    pub log_level: LogLevel,
}

impl HostConfig {
    pub fn new(config_path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: config_path.into(),
            policy: PolicySelection::One(PolicyKind::ShortestProcessNext),
            out_dir: PathBuf::from("summary"),
            seed: None,
            format: OutputFormat::Text,
            log_level: LogLevel::Info,
        }
    }
}

/// Host runtime
pub struct HostRuntime {
    config: HostConfig,
}

impl HostRuntime {
    pub fn new(config: HostConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &HostConfig {
        &self.config
    }

    /// Runs every selected policy and writes their reports
    ///
    /// Progress goes to `out`; log entries go to `err`. Returns the runs in
    /// policy order.
    pub fn run<O, E>(&self, out: &mut O, err: &mut E) -> Result<Vec<SimulationRun>, HostError>
    where
        O: Write + ?Sized,
        E: Write + ?Sized,
    {
        writeln!(out, "Working...")?;

        let sim_config = sim_config::load(&self.config.config_path)?;
        let seed = self
            .config
            .seed
            .or(sim_config.seed)
            .unwrap_or_else(rand::random);

        let mut host_log = Logger::new(self.config.log_level);
        host_log.info(format!(
            "loaded {} (seed {}, deviate {})",
            self.config.config_path.display(),
            seed,
            sim_config.deviate
        ));

        let workload = Workload::build(&sim_config, &mut sim_config.deviate.source(Some(seed)))?;
        host_log.info(format!("workload has {} processes", workload.len()));
        host_log.info(format!(
            "writing {} reports to {}",
            self.config.format,
            self.config.out_dir.display()
        ));
        render_log(err, &host_log.drain())?;

        let kinds = self.config.policy.kinds();
        let suffixed = kinds.len() > 1;
        let mut runs = Vec::with_capacity(kinds.len());
        for kind in kinds {
            let run = self.run_policy(&sim_config, &workload, kind, seed)?;
            render_log(err, &run.log)?;
            self.write_reports(&sim_config, &run, suffixed)?;
            runs.push(run);
        }

        if suffixed {
            let results: Vec<_> = runs.iter().map(|r| r.result.clone()).collect();
            write!(out, "{}", render_comparison(&results))?;
        }
        writeln!(out, "Completed.")?;
        Ok(runs)
    }

    fn run_policy(
        &self,
        sim_config: &SimulationConfig,
        workload: &Workload,
        kind: PolicyKind,
        seed: u64,
    ) -> Result<SimulationRun, HostError> {
        let mut driver_config = DriverConfig::new(sim_config.run_time_budget);
        if let Some(max_idle) = sim_config.max_idle_ticks {
            driver_config = driver_config.with_max_idle_ticks(max_idle);
        }

        // Every policy replays the same random stream
        let source = sim_config
            .deviate
            .source(Some(seed.wrapping_add(RUN_STREAM_OFFSET)));
        let run = SimulationDriver::new(workload.table(), kind, driver_config, source)
            .with_logger(Logger::new(self.config.log_level))
            .run_to_end()?;
        Ok(run)
    }

    fn write_reports(
        &self,
        sim_config: &SimulationConfig,
        run: &SimulationRun,
        suffixed: bool,
    ) -> Result<(), HostError> {
        let dir = &self.config.out_dir;
        std::fs::create_dir_all(dir).map_err(|source| HostError::Write {
            path: dir.clone(),
            source,
        })?;

        let (results, processes) = match self.config.format {
            OutputFormat::Text => {
                let bursts = BurstDistribution {
                    mean: sim_config.run_time_average,
                    stddev: sim_config.run_time_stddev,
                };
                (
                    render_summary(&run.result, &bursts),
                    render_process_log(&run.events),
                )
            }
            OutputFormat::Json => (to_json(&run.result)?, to_json(&run.events)?),
        };

        let policy = suffixed.then_some(run.result.policy);
        write_file(&self.report_path(SUMMARY_RESULTS, policy), &results)?;
        write_file(&self.report_path(SUMMARY_PROCESSES, policy), &processes)?;
        Ok(())
    }

    /// Path of one report file, suffixed by policy in comparison runs
    pub fn report_path(&self, base: &str, policy: Option<PolicyKind>) -> PathBuf {
        let mut name = base.to_string();
        if let Some(kind) = policy {
            name.push('-');
            name.push_str(kind.short_name());
        }
        name.push_str(self.config.format.extension());
        self.config.out_dir.join(name)
    }
}

fn write_file(path: &Path, contents: &str) -> Result<(), HostError> {
    std::fs::write(path, contents).map_err(|source| HostError::Write {
        path: path.to_path_buf(),
        source,
    })
}

fn render_log<E: Write + ?Sized>(err: &mut E, entries: &[sim_logger::LogEntry]) -> io::Result<()> {
    for entry in entries {
        writeln!(err, "{}", entry)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const CONFIG: &str = "\
numprocess 3
run_time_average 200
run_time_stddev 20
stand_io_blocking_dev 5
alpha 0.5
process 30
process 70
runtime 10000
";

    fn setup(config_text: &str, file_name: &str) -> (TempDir, HostConfig) {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join(file_name);
        fs::write(&config_path, config_text).unwrap();
        let mut config = HostConfig::new(config_path);
        config.out_dir = dir.path().join("summary");
        config.seed = Some(42);
        (dir, config)
    }

    fn run(config: HostConfig) -> (Result<Vec<SimulationRun>, HostError>, String, String) {
        let mut out = Vec::new();
        let mut err = Vec::new();
        let result = HostRuntime::new(config).run(&mut out, &mut err);
        (
            result,
            String::from_utf8(out).unwrap(),
            String::from_utf8(err).unwrap(),
        )
    }

    #[test]
    fn test_single_policy_writes_reports() {
        let (_dir, config) = setup(CONFIG, "scheduling.conf");
        let out_dir = config.out_dir.clone();
        let (result, out, err) = run(config);

        let runs = result.unwrap();
        assert_eq!(runs.len(), 1);
        assert_eq!(out, "Working...\nCompleted.\n");
        assert!(err.contains("seed 42"));

        let summary = fs::read_to_string(out_dir.join("Summary-Results")).unwrap();
        assert!(summary.starts_with("Scheduling Type: Interactive (Nonpreemptive)\n"));
        assert!(summary.contains("Mean: 200\n"));
        assert!(summary.contains("Standard Deviation: 20\n"));

        let processes = fs::read_to_string(out_dir.join("Summary-Processes")).unwrap();
        assert!(processes.starts_with("Process: "));
    }

    #[test]
    fn test_all_policies_suffix_reports() {
        let (_dir, mut config) = setup(CONFIG, "scheduling.conf");
        config.policy = PolicySelection::All;
        let out_dir = config.out_dir.clone();
        let (result, out, _) = run(config);

        let runs = result.unwrap();
        assert_eq!(runs.len(), 2);
        for kind in PolicyKind::ALL {
            let name = format!("Summary-Results-{}", kind.short_name());
            assert!(out_dir.join(name).exists());
            let name = format!("Summary-Processes-{}", kind.short_name());
            assert!(out_dir.join(name).exists());
        }
        assert!(out.contains("fcfs"));
        assert!(out.contains("spn"));
        assert!(out.ends_with("Completed.\n"));
    }

    #[test]
    fn test_policies_share_the_workload() {
        let (_dir, mut config) = setup(CONFIG, "scheduling.conf");
        config.policy = PolicySelection::All;
        let runs = run(config).0.unwrap();

        let bursts = |run: &SimulationRun| -> Vec<u64> {
            run.result.processes.iter().map(|p| p.cpu_burst).collect()
        };
        assert_eq!(bursts(&runs[0]), bursts(&runs[1]));
        assert_eq!(runs[0].result.total_processes, 3);
    }

    #[test]
    fn test_same_seed_same_results() {
        let (_dir, config) = setup(CONFIG, "scheduling.conf");
        let a = run(config.clone()).0.unwrap();
        let b = run(config).0.unwrap();
        assert_eq!(a[0].result.elapsed_ticks, b[0].result.elapsed_ticks);
        assert_eq!(a[0].result.processes, b[0].result.processes);
    }

    #[test]
    fn test_json_format() {
        let json_config = r#"{"version": 1, "process_count": 2, "run_time_budget": 5000, "seed": 3}"#;
        let (_dir, mut config) = setup(json_config, "run.json");
        config.seed = None;
        config.format = OutputFormat::Json;
        let out_dir = config.out_dir.clone();
        let (result, _, err) = run(config);
        result.unwrap();
        assert!(err.contains("seed 3"));

        let text = fs::read_to_string(out_dir.join("Summary-Results.json")).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["policy"], "spn");
        assert!(out_dir.join("Summary-Processes.json").exists());
    }

    #[test]
    fn test_debug_level_logs_events() {
        let (_dir, mut config) = setup(CONFIG, "scheduling.conf");
        config.log_level = LogLevel::Debug;
        let (_, _, err) = run(config);
        assert!(err.contains("[DEBUG]"));
        assert!(err.contains("registered"));
    }

    #[test]
    fn test_missing_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = HostConfig::new(dir.path().join("absent.conf"));
        let (result, out, _) = run(config);
        assert!(matches!(result, Err(HostError::Config(ConfigError::Io { .. }))));
        assert_eq!(out, "Working...\n");
    }

    #[test]
    fn test_config_without_runtime() {
        let (_dir, config) = setup("numprocess 2\n", "scheduling.conf");
        let (result, _, _) = run(config);
        assert!(matches!(
            result,
            Err(HostError::Config(ConfigError::MissingField("runtime")))
        ));
    }

    #[test]
    fn test_policy_selection_from_str() {
        assert_eq!("all".parse::<PolicySelection>(), Ok(PolicySelection::All));
        assert_eq!(
            "fcfs".parse::<PolicySelection>(),
            Ok(PolicySelection::One(PolicyKind::FirstComeFirstServed))
        );
        assert!("lottery".parse::<PolicySelection>().is_err());
    }

    #[test]
    fn test_report_path() {
        let mut config = HostConfig::new("x");
        config.out_dir = PathBuf::from("out");
        config.format = OutputFormat::Json;
        let runtime = HostRuntime::new(config);
        assert_eq!(
            runtime.report_path(SUMMARY_RESULTS, Some(PolicyKind::FirstComeFirstServed)),
            PathBuf::from("out").join("Summary-Results-fcfs.json")
        );
        assert_eq!(
            runtime.report_path(SUMMARY_PROCESSES, None),
            PathBuf::from("out").join("Summary-Processes.json")
        );
    }
}
