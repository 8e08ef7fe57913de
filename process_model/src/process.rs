//! The simulated process and its state machine

use crate::ProcessError;
use core_types::{ProcessId, Ticks};
use serde::{Deserialize, Serialize};
use sim_random::{sample_around, DeviateSource};

/// Process state
///
/// "Running" is not a separate state: the running process is whichever
/// Ready process the driver is currently advancing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProcessState {
    /// Eligible to run
    Ready,
    /// Waiting on simulated I/O
    /// The process returns to Ready when the countdown reaches zero
    Blocked { ticks_to_unblock: Ticks },
    /// All CPU ticks consumed; terminal
    Completed { at_tick: Ticks },
}

/// Result of advancing a process by one step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// The process had no CPU left and is now Completed
    Completed,
    /// The process reached its I/O interval and is now Blocked
    Blocked { ticks_to_unblock: Ticks },
    /// The process consumed one CPU tick
    Ran,
}

/// Creation parameters for a process
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessParams {
    /// Total CPU ticks required
    pub cpu_burst: Ticks,
    /// Running ticks between I/O blocks (0 = never blocks)
    pub io_interval: Ticks,
    /// Aging weight in `[0, 1]`
    pub alpha: f64,
    /// Spread applied when re-randomizing the I/O interval
    pub io_stddev: u64,
    /// Initial burst estimate; defaults to the I/O interval
    pub initial_estimate: Option<f64>,
}

impl ProcessParams {
    /// Creates parameters with no aging and no I/O spread
    pub fn new(cpu_burst: Ticks, io_interval: Ticks) -> Self {
        Self {
            cpu_burst,
            io_interval,
            alpha: 0.0,
            io_stddev: 0,
            initial_estimate: None,
        }
    }

    /// Sets the aging weight
    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    /// Sets the I/O interval spread
    pub fn with_io_stddev(mut self, io_stddev: u64) -> Self {
        self.io_stddev = io_stddev;
        self
    }

    /// Sets the initial burst estimate
    pub fn with_initial_estimate(mut self, estimate: f64) -> Self {
        self.initial_estimate = Some(estimate);
        self
    }
}

/// Exponentially aged estimate
///
/// `alpha * measured + (1 - alpha) * prior`. An alpha close to 1 follows
/// the latest measurement, close to 0 keeps the history.
pub fn aged_estimate(alpha: f64, measured: f64, prior: f64) -> f64 {
    alpha * measured + (1.0 - alpha) * prior
}

/// Read-only view of the counters the event log records
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProcessSnapshot {
    pub cpu_burst: Ticks,
    pub io_interval: Ticks,
    pub cpu_done: Ticks,
    pub estimated_burst: f64,
}

/// A simulated job
///
/// Fields are private: the only mutations are the state-machine step,
/// the completion check and the blocking countdown, all of which keep
/// `cpu_done <= cpu_burst` and never move a Completed process.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Process {
    id: ProcessId,
    cpu_burst: Ticks,
    cpu_done: Ticks,
    io_interval: Ticks,
    base_io_interval: Ticks,
    ticks_since_block: Ticks,
    state: ProcessState,
    block_count: u64,
    blocked_ticks: Ticks,
    alpha: f64,
    estimated_burst: f64,
    io_stddev: u64,
}

impl Process {
    /// Creates a Ready process with zeroed progress counters
    pub fn new(id: ProcessId, params: ProcessParams) -> Self {
        let estimated_burst = params
            .initial_estimate
            .unwrap_or(params.io_interval as f64);
        Self {
            id,
            cpu_burst: params.cpu_burst,
            cpu_done: 0,
            io_interval: params.io_interval,
            base_io_interval: params.io_interval,
            ticks_since_block: 0,
            state: ProcessState::Ready,
            block_count: 0,
            blocked_ticks: 0,
            alpha: params.alpha.clamp(0.0, 1.0),
            estimated_burst,
            io_stddev: params.io_stddev,
        }
    }

    pub fn id(&self) -> ProcessId {
        self.id
    }

    pub fn cpu_burst(&self) -> Ticks {
        self.cpu_burst
    }

    pub fn cpu_done(&self) -> Ticks {
        self.cpu_done
    }

    /// Current I/O interval (re-randomized after every block)
    pub fn io_interval(&self) -> Ticks {
        self.io_interval
    }

    /// Declared I/O interval every re-randomization is centred on
    pub fn base_io_interval(&self) -> Ticks {
        self.base_io_interval
    }

    pub fn ticks_since_block(&self) -> Ticks {
        self.ticks_since_block
    }

    pub fn state(&self) -> ProcessState {
        self.state
    }

    pub fn block_count(&self) -> u64 {
        self.block_count
    }

    /// Total ticks spent blocked
    pub fn blocked_ticks(&self) -> Ticks {
        self.blocked_ticks
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn estimated_burst(&self) -> f64 {
        self.estimated_burst
    }

    pub fn io_stddev(&self) -> u64 {
        self.io_stddev
    }

    /// CPU ticks still needed
    pub fn remaining(&self) -> Ticks {
        self.cpu_burst - self.cpu_done
    }

    pub fn is_ready(&self) -> bool {
        self.state == ProcessState::Ready
    }

    pub fn is_blocked(&self) -> bool {
        matches!(self.state, ProcessState::Blocked { .. })
    }

    pub fn is_completed(&self) -> bool {
        matches!(self.state, ProcessState::Completed { .. })
    }

    /// Tick at which the process completed, if it has
    pub fn completed_at(&self) -> Option<Ticks> {
        match self.state {
            ProcessState::Completed { at_tick } => Some(at_tick),
            _ => None,
        }
    }

    /// Remaining blocking countdown, if blocked
    pub fn ticks_to_unblock(&self) -> Option<Ticks> {
        match self.state {
            ProcessState::Blocked { ticks_to_unblock } => Some(ticks_to_unblock),
            _ => None,
        }
    }

    pub fn snapshot(&self) -> ProcessSnapshot {
        ProcessSnapshot {
            cpu_burst: self.cpu_burst,
            io_interval: self.io_interval,
            cpu_done: self.cpu_done,
            estimated_burst: self.estimated_burst,
        }
    }

    /// Advances the state machine by one step
    ///
    /// Transitions are tried in order: completion, I/O block, run. Only a
    /// run consumes the tick; completion and blocking happen at the tick
    /// boundary so the driver can pick another process for the same tick.
    pub fn step<S>(
        &mut self,
        now: Ticks,
        source: &mut S,
        max_attempts: u32,
    ) -> Result<StepOutcome, ProcessError>
    where
        S: DeviateSource + ?Sized,
    {
        if !self.is_ready() {
            return Err(ProcessError::NotRunnable {
                id: self.id,
                state: self.state,
            });
        }

        if self.finish_if_done(now) {
            return Ok(StepOutcome::Completed);
        }

        if self.io_interval > 0 && self.ticks_since_block == self.io_interval {
            let ticks_to_unblock = self.block(source, max_attempts)?;
            return Ok(StepOutcome::Blocked { ticks_to_unblock });
        }

        self.cpu_done += 1;
        if self.io_interval > 0 {
            self.ticks_since_block += 1;
        }
        Ok(StepOutcome::Ran)
    }

    /// Marks a Ready process Completed if it has no CPU left
    ///
    /// Returns true if the process completed now.
    pub fn finish_if_done(&mut self, now: Ticks) -> bool {
        if self.is_ready() && self.cpu_done == self.cpu_burst {
            self.state = ProcessState::Completed { at_tick: now };
            true
        } else {
            false
        }
    }

    /// Counts down one blocked tick
    ///
    /// Returns true if the process became Ready on this tick.
    pub fn advance_block_timer(&mut self) -> bool {
        if let ProcessState::Blocked { ticks_to_unblock } = self.state {
            self.blocked_ticks += 1;
            let left = ticks_to_unblock.saturating_sub(1);
            if left == 0 {
                self.state = ProcessState::Ready;
                return true;
            }
            self.state = ProcessState::Blocked {
                ticks_to_unblock: left,
            };
        }
        false
    }

    fn block<S>(&mut self, source: &mut S, max_attempts: u32) -> Result<Ticks, ProcessError>
    where
        S: DeviateSource + ?Sized,
    {
        // Draw first so a failed draw leaves the process untouched
        let next_interval =
            sample_around(source, self.base_io_interval, self.io_stddev, max_attempts)?;

        self.estimated_burst =
            aged_estimate(self.alpha, self.io_interval as f64, self.estimated_burst);
        self.io_interval = next_interval;
        self.block_count += 1;
        self.ticks_since_block = 0;
        self.state = ProcessState::Blocked {
            ticks_to_unblock: next_interval,
        };
        Ok(next_interval)
    }
}
