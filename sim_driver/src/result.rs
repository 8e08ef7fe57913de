//! Run results

use core_types::{ProcessId, RunId, Ticks};
use process_model::{Process, ProcessTable};
use sched_policy::PolicyKind;
use serde::{Deserialize, Serialize};

/// How a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunOutcome {
    /// Every process completed within the budget
    AllCompleted,
    /// The clock reached the run-time budget first
    BudgetExhausted,
}

/// Final counters of one process
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessSummary {
    pub id: ProcessId,
    pub cpu_burst: Ticks,
    /// Interval in effect when the run ended
    pub io_interval: Ticks,
    /// Interval the process was declared with
    pub base_io_interval: Ticks,
    pub cpu_done: Ticks,
    pub block_count: u64,
    pub blocked_ticks: Ticks,
    pub estimated_burst: f64,
    pub completed_at: Option<Ticks>,
}

impl From<&Process> for ProcessSummary {
    fn from(process: &Process) -> Self {
        Self {
            id: process.id(),
            cpu_burst: process.cpu_burst(),
            io_interval: process.io_interval(),
            base_io_interval: process.base_io_interval(),
            cpu_done: process.cpu_done(),
            block_count: process.block_count(),
            blocked_ticks: process.blocked_ticks(),
            estimated_burst: process.estimated_burst(),
            completed_at: process.completed_at(),
        }
    }
}

/// Result record of one simulation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    pub run_id: RunId,
    pub policy: PolicyKind,
    /// Scheduling category label, e.g. "Batch (Nonpreemptive)"
    pub scheduling_type: String,
    /// Scheduling strategy label, e.g. "First-Come First-Served"
    pub scheduling_name: String,
    pub elapsed_ticks: Ticks,
    pub idle_ticks: Ticks,
    pub completed_count: usize,
    pub total_processes: usize,
    pub outcome: RunOutcome,
    pub processes: Vec<ProcessSummary>,
}

impl SimulationResult {
    pub(crate) fn from_table(
        run_id: RunId,
        policy: PolicyKind,
        table: &ProcessTable,
        elapsed_ticks: Ticks,
        idle_ticks: Ticks,
        outcome: RunOutcome,
    ) -> Self {
        Self {
            run_id,
            policy,
            scheduling_type: policy.category().to_string(),
            scheduling_name: policy.name().to_string(),
            elapsed_ticks,
            idle_ticks,
            completed_count: table.completed_count(),
            total_processes: table.len(),
            outcome,
            processes: table.iter().map(ProcessSummary::from).collect(),
        }
    }

    /// Returns true if every process completed
    pub fn is_complete(&self) -> bool {
        self.outcome == RunOutcome::AllCompleted
    }

    /// CPU ticks consumed across all processes
    pub fn total_cpu_done(&self) -> Ticks {
        self.processes.iter().map(|p| p.cpu_done).sum()
    }

    /// I/O blocks across all processes
    pub fn total_blocks(&self) -> u64 {
        self.processes.iter().map(|p| p.block_count).sum()
    }

    /// Mean completion tick of the processes that completed
    pub fn mean_turnaround(&self) -> Option<f64> {
        let done: Vec<Ticks> = self.processes.iter().filter_map(|p| p.completed_at).collect();
        if done.is_empty() {
            return None;
        }
        Some(done.iter().sum::<Ticks>() as f64 / done.len() as f64)
    }
}
