//! Process arena
//!
//! Processes live in a `Vec` and are addressed by [`ProcessId`], which is
//! simply the index. Handles stay valid for the whole run because nothing
//! is ever removed; completion is a state, not a deletion.

use crate::{Process, ProcessError, ProcessParams, StepOutcome};
use core_types::{ProcessId, Ticks};
use serde::{Deserialize, Serialize};
use sim_random::DeviateSource;

/// Arena of simulated processes
///
/// Readers (scheduling policies) get `&ProcessTable`. The mutating methods
/// are the narrow set of transitions the driver commits: step a process,
/// complete a finished process and count down blocked timers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProcessTable {
    processes: Vec<Process>,
}

impl ProcessTable {
    /// Creates an empty table
    pub fn new() -> Self {
        Self {
            processes: Vec::new(),
        }
    }

    /// Builds a table from creation parameters, in order
    pub fn from_params<I>(params: I) -> Self
    where
        I: IntoIterator<Item = ProcessParams>,
    {
        let mut table = Self::new();
        for p in params {
            table.spawn(p);
        }
        table
    }

    /// Adds a process and returns its handle
    pub fn spawn(&mut self, params: ProcessParams) -> ProcessId {
        let id = ProcessId::new(self.processes.len());
        self.processes.push(Process::new(id, params));
        id
    }

    pub fn len(&self) -> usize {
        self.processes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.processes.is_empty()
    }

    pub fn get(&self, id: ProcessId) -> Option<&Process> {
        self.processes.get(id.index())
    }

    /// Iterates over all processes in index order
    pub fn iter(&self) -> impl Iterator<Item = &Process> {
        self.processes.iter()
    }

    /// Iterates over Ready processes in index order
    pub fn ready(&self) -> impl Iterator<Item = &Process> {
        self.processes.iter().filter(|p| p.is_ready())
    }

    pub fn is_ready(&self, id: ProcessId) -> bool {
        self.get(id).is_some_and(Process::is_ready)
    }

    pub fn blocked_count(&self) -> usize {
        self.processes.iter().filter(|p| p.is_blocked()).count()
    }

    pub fn completed_count(&self) -> usize {
        self.processes.iter().filter(|p| p.is_completed()).count()
    }

    /// Largest outstanding unblock countdown
    pub fn max_unblock_countdown(&self) -> Option<Ticks> {
        self.processes.iter().filter_map(Process::ticks_to_unblock).max()
    }

    /// Sum of all CPU bursts
    pub fn total_burst(&self) -> Ticks {
        self.processes
            .iter()
            .fold(0, |acc: Ticks, p| acc.saturating_add(p.cpu_burst()))
    }

    /// Advances one process's state machine
    pub fn step<S>(
        &mut self,
        id: ProcessId,
        now: Ticks,
        source: &mut S,
        max_attempts: u32,
    ) -> Result<StepOutcome, ProcessError>
    where
        S: DeviateSource + ?Sized,
    {
        self.processes
            .get_mut(id.index())
            .ok_or(ProcessError::UnknownProcess(id))?
            .step(now, source, max_attempts)
    }

    /// Completes a Ready process with no CPU left
    ///
    /// Returns true if the process completed now.
    pub fn finish_if_done(&mut self, id: ProcessId, now: Ticks) -> bool {
        self.processes
            .get_mut(id.index())
            .is_some_and(|p| p.finish_if_done(now))
    }

    /// Counts down every blocked process by one tick
    ///
    /// Returns the processes that became Ready, in index order.
    pub fn advance_block_timers(&mut self) -> Vec<ProcessId> {
        self.processes
            .iter_mut()
            .filter_map(|p| p.advance_block_timer().then(|| p.id()))
            .collect()
    }
}
