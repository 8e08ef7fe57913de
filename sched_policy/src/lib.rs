//! # Scheduling Policies
//!
//! Pluggable strategies that decide which process gets the CPU.
//!
//! ## Philosophy
//!
//! - **Policy reads, driver writes**: A policy sees the process table
//!   through `&ProcessTable` and only returns a handle. The driver
//!   commits every state transition.
//! - **Closed set**: [`Policy`] enumerates the implemented strategies, so
//!   adding one is an exhaustively matched change, not an open hierarchy.
//! - **Non-preemptive**: Selection happens at block and completion
//!   boundaries only. Keeping the incumbent between boundaries is the
//!   driver's job; a policy just answers "who next?".
//!
//! ## Strategies
//!
//! - [`FirstComeFirstServed`]: lowest-index Ready process
//! - [`ShortestProcessNext`]: smallest aged burst estimate, ties by index

pub mod fcfs;
pub mod spn;

pub use fcfs::FirstComeFirstServed;
pub use spn::ShortestProcessNext;

use core_types::ProcessId;
use process_model::ProcessTable;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Trait for scheduling strategies
pub trait SchedulingPolicy {
    /// Which strategy this is
    fn kind(&self) -> PolicyKind;

    /// Picks the process to run at a scheduling boundary
    ///
    /// Must return a Ready process, or `None` when every process is
    /// Blocked or Completed.
    fn select_next(&self, table: &ProcessTable) -> Option<ProcessId>;

    /// Advances every blocked timer by one tick
    ///
    /// Returns the processes that became Ready. The countdown is the same
    /// for every strategy.
    fn on_tick_advance(&self, table: &mut ProcessTable) -> Vec<ProcessId> {
        table.advance_block_timers()
    }
}

/// Identifies a scheduling strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PolicyKind {
    #[serde(rename = "fcfs")]
    FirstComeFirstServed,
    #[serde(rename = "spn")]
    ShortestProcessNext,
}

impl PolicyKind {
    /// Every implemented strategy, in report order
    pub const ALL: [PolicyKind; 2] = [
        PolicyKind::FirstComeFirstServed,
        PolicyKind::ShortestProcessNext,
    ];

    /// Short name used on the command line and in file names
    pub fn short_name(&self) -> &'static str {
        match self {
            PolicyKind::FirstComeFirstServed => "fcfs",
            PolicyKind::ShortestProcessNext => "spn",
        }
    }

    /// Human-readable strategy name
    pub fn name(&self) -> &'static str {
        match self {
            PolicyKind::FirstComeFirstServed => "First-Come First-Served",
            PolicyKind::ShortestProcessNext => "Shortest Process Next",
        }
    }

    /// Scheduling category label
    pub fn category(&self) -> &'static str {
        match self {
            PolicyKind::FirstComeFirstServed => "Batch (Nonpreemptive)",
            PolicyKind::ShortestProcessNext => "Interactive (Nonpreemptive)",
        }
    }

    /// Builds the strategy
    pub fn build(self) -> Policy {
        match self {
            PolicyKind::FirstComeFirstServed => Policy::Fcfs(FirstComeFirstServed::new()),
            PolicyKind::ShortestProcessNext => Policy::Spn(ShortestProcessNext::new()),
        }
    }
}

impl fmt::Display for PolicyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PolicyKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "fcfs" | "f" => Ok(PolicyKind::FirstComeFirstServed),
            "spn" | "s" => Ok(PolicyKind::ShortestProcessNext),
            other => Err(format!("Unknown policy: {}", other)),
        }
    }
}

/// The implemented strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Policy {
    Fcfs(FirstComeFirstServed),
    Spn(ShortestProcessNext),
}

impl SchedulingPolicy for Policy {
    fn kind(&self) -> PolicyKind {
        match self {
            Policy::Fcfs(p) => p.kind(),
            Policy::Spn(p) => p.kind(),
        }
    }

    fn select_next(&self, table: &ProcessTable) -> Option<ProcessId> {
        match self {
            Policy::Fcfs(p) => p.select_next(table),
            Policy::Spn(p) => p.select_next(table),
        }
    }

    fn on_tick_advance(&self, table: &mut ProcessTable) -> Vec<ProcessId> {
        match self {
            Policy::Fcfs(p) => p.on_tick_advance(table),
            Policy::Spn(p) => p.on_tick_advance(table),
        }
    }
}

impl From<PolicyKind> for Policy {
    fn from(kind: PolicyKind) -> Self {
        kind.build()
    }
}
