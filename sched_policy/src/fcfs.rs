//! First-Come-First-Served

use crate::{PolicyKind, SchedulingPolicy};
use core_types::ProcessId;
use process_model::ProcessTable;

/// First-Come-First-Served
///
/// Takes the lowest-index Ready process. Index order is creation order,
/// so this is arrival order with no reordering and no starvation
/// avoidance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FirstComeFirstServed;

impl FirstComeFirstServed {
    pub fn new() -> Self {
        Self
    }
}

impl SchedulingPolicy for FirstComeFirstServed {
    fn kind(&self) -> PolicyKind {
        PolicyKind::FirstComeFirstServed
    }

    fn select_next(&self, table: &ProcessTable) -> Option<ProcessId> {
        table.ready().next().map(|p| p.id())
    }
}
