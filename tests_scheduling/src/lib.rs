//! Scheduling Test Utilities
//!
//! This crate provides shared utilities for end-to-end scheduling tests.
//!
//! ## Test Philosophy
//!
//! - **Hand-checkable**: Scenario tests use a zero deviate so every
//!   schedule can be worked out on paper
//! - **Reproducible**: Randomized tests always run from an explicit seed
//! - **Log as evidence**: Ordering and timing claims are proven from the
//!   event log, not from internal state

use core_types::{ProcessId, Ticks};
use process_model::{ProcessParams, ProcessTable};
use sched_policy::PolicyKind;
use sim_driver::{DriverConfig, EventLog, SimEvent, SimulationDriver, SimulationRun};
use sim_random::Gaussian;

pub use sim_driver::test_utils::{ids, run_unperturbed, table_from};

/// Runs a table with a seeded Gaussian source
pub fn run_seeded(table: ProcessTable, kind: PolicyKind, budget: Ticks, seed: u64) -> SimulationRun {
    SimulationDriver::new(table, kind, DriverConfig::new(budget), Gaussian::seeded(seed))
        .run_to_end()
        .unwrap_or_else(|e| panic!("{:?} run failed: {}", kind, e))
}

/// Builds a table where every process shares the same aging and spread
pub fn table_with(specs: &[(Ticks, Ticks)], alpha: f64, io_stddev: u64) -> ProcessTable {
    ProcessTable::from_params(specs.iter().map(|&(burst, io)| {
        ProcessParams::new(burst, io)
            .with_alpha(alpha)
            .with_io_stddev(io_stddev)
    }))
}

/// Ticks of every selection of `id`, in order
pub fn registration_ticks(events: &EventLog, id: ProcessId) -> Vec<Ticks> {
    events
        .events()
        .iter()
        .filter_map(|e| match e {
            SimEvent::Registered { process, tick, .. } if *process == id => Some(*tick),
            _ => None,
        })
        .collect()
}

/// Estimates recorded at each block of `id`, in order
pub fn estimates_at_blocks(events: &EventLog, id: ProcessId) -> Vec<f64> {
    events
        .events()
        .iter()
        .filter_map(|e| match e {
            SimEvent::Blocked {
                process, snapshot, ..
            } if *process == id => Some(snapshot.estimated_burst),
            _ => None,
        })
        .collect()
}

/// Ticks at which the clock idled
pub fn idle_ticks(events: &EventLog) -> Vec<Ticks> {
    events
        .events()
        .iter()
        .filter_map(|e| match e {
            SimEvent::Idle { tick } => Some(*tick),
            _ => None,
        })
        .collect()
}
