//! Test utilities for scheduling scenarios
//!
//! Shorthand for building tables and running them to the end with a
//! deterministic deviate source.

use crate::driver::{DriverConfig, SimulationDriver, SimulationRun};
use crate::error::SimError;
use core_types::{ProcessId, Ticks};
use process_model::{ProcessParams, ProcessTable};
use sched_policy::PolicyKind;
use sim_random::test_utils::ScriptedDeviates;

/// Builds a table from `(cpu_burst, io_interval)` pairs
pub fn table_from(specs: &[(Ticks, Ticks)]) -> ProcessTable {
    ProcessTable::from_params(
        specs
            .iter()
            .map(|&(cpu_burst, io_interval)| ProcessParams::new(cpu_burst, io_interval)),
    )
}

/// Maps indices to process ids
pub fn ids(indices: &[usize]) -> Vec<ProcessId> {
    indices.iter().copied().map(ProcessId::new).collect()
}

/// Runs a table to the end with every deviate at 0
///
/// With a zero deviate every re-randomized I/O interval equals the
/// declared one, so schedules can be worked out by hand.
pub fn run_unperturbed(
    table: ProcessTable,
    kind: PolicyKind,
    budget: Ticks,
) -> Result<SimulationRun, SimError> {
    SimulationDriver::new(
        table,
        kind,
        DriverConfig::new(budget),
        ScriptedDeviates::zero(),
    )
    .run_to_end()
}
