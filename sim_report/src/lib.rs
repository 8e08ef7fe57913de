//! # Simulation Reports
//!
//! Renders run results for people and for tools.
//!
//! ## Philosophy
//!
//! - **Pure functions**: Every renderer takes data and returns a `String`.
//!   Writing files is the host's job.
//! - **Stable layouts**: The text reports keep the long-standing
//!   `Summary-Results` and `Summary-Processes` layouts so existing
//!   tooling that scrapes them keeps working.

use core_types::Ticks;
use serde::Serialize;
use sim_driver::{EventLog, RunOutcome, SimEvent, SimulationResult};
use std::fmt::Write;
use thiserror::Error;

/// File name of the aggregate report
pub const SUMMARY_RESULTS: &str = "Summary-Results";
/// File name of the per-process event report
pub const SUMMARY_PROCESSES: &str = "Summary-Processes";

/// Errors from report rendering
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Failed to serialize report: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// CPU burst distribution the workload was drawn from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BurstDistribution {
    pub mean: Ticks,
    pub stddev: Ticks,
}

/// Renders the aggregate `Summary-Results` report
pub fn render_summary(result: &SimulationResult, bursts: &BurstDistribution) -> String {
    let mut out = String::new();
    // Writing to a String cannot fail
    let _ = writeln!(out, "Scheduling Type: {}", result.scheduling_type);
    let _ = writeln!(out, "Scheduling Name: {}", result.scheduling_name);
    let _ = writeln!(out, "Simulation Run Time: {}", result.elapsed_ticks);
    let _ = writeln!(out, "Mean: {}", bursts.mean);
    let _ = writeln!(out, "Standard Deviation: {}", bursts.stddev);
    out.push_str("Process #\tCPU Time\tIO Blocking\tCPU Completed\tCPU Blocked\n");

    for (i, p) in result.processes.iter().enumerate() {
        let _ = write!(out, "{}    {}", i, column_gap(i as u64));
        push_ms(&mut out, p.cpu_burst);
        push_ms(&mut out, p.io_interval);
        push_ms(&mut out, p.cpu_done);
        let _ = writeln!(out, "{} times", p.block_count);
    }
    out
}

fn column_gap(value: u64) -> &'static str {
    if value < 100 {
        "\t\t"
    } else {
        "\t"
    }
}

fn push_ms(out: &mut String, value: Ticks) {
    let _ = write!(out, "{} (ms){}", value, column_gap(value));
}

/// Renders the per-process `Summary-Processes` report
///
/// One line per selection, I/O block and completion, in event order.
/// A block line shows the process as it reached its interval, before the
/// estimate was aged. Estimates are printed truncated to whole ticks.
pub fn render_process_log(events: &EventLog) -> String {
    let mut out = String::new();
    for event in events.events() {
        let (process, verb, snapshot) = match event {
            SimEvent::Registered {
                process, snapshot, ..
            } => (process, "registered", snapshot),
            SimEvent::Blocked {
                process, before, ..
            } => (process, "I/O blocked", before),
            SimEvent::Completed {
                process, snapshot, ..
            } => (process, "completed", snapshot),
            _ => continue,
        };
        let _ = writeln!(
            out,
            "Process: {} {}... ({} {} {} {})",
            process.index(),
            verb,
            snapshot.cpu_burst,
            snapshot.io_interval,
            snapshot.cpu_done,
            snapshot.estimated_burst as u64
        );
    }
    out
}

/// Renders a side-by-side comparison of several runs
pub fn render_comparison(results: &[SimulationResult]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<8}{:<26}{:>10}{:>12}{:>8}{:>8}  {}",
        "Policy", "Name", "Elapsed", "Completed", "Idle", "Blocks", "Outcome"
    );
    for result in results {
        let completed = format!("{}/{}", result.completed_count, result.total_processes);
        let outcome = match result.outcome {
            RunOutcome::AllCompleted => "all completed",
            RunOutcome::BudgetExhausted => "budget exhausted",
        };
        let _ = writeln!(
            out,
            "{:<8}{:<26}{:>10}{:>12}{:>8}{:>8}  {}",
            result.policy.short_name(),
            result.scheduling_name,
            result.elapsed_ticks,
            completed,
            result.idle_ticks,
            result.total_blocks(),
            outcome
        );
    }
    out
}

/// Serializes any report value as pretty JSON
pub fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String, ReportError> {
    Ok(serde_json::to_string_pretty(value)?)
}
