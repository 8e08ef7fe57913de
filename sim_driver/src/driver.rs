//! Simulation Driver
//!
//! Owns the clock and the process table and advances them tick by tick
//! under a scheduling policy.
//!
//! ## Philosophy
//!
//! - **Determinism first**: Same table + same policy + same deviate
//!   source => same schedule, same result, same event log.
//! - **Only runs cost time**: Completion and I/O blocking are boundaries
//!   at the start of a tick. The driver re-selects for the same tick, so
//!   the CPU never idles while a Ready process exists.
//! - **Non-preemptive**: The incumbent keeps the CPU until it blocks or
//!   completes.
//! - **Faults, not hangs**: A table that can never make progress is
//!   reported as [`SimError`] instead of idling until the budget runs out.
//!
//! ## Tick
//!
//! 1. Take the incumbent if it is still Ready, otherwise ask the policy.
//!    Step it: a completion or block is recorded and step 1 repeats
//!    without touching the clock.
//! 2. Nothing eligible: idle tick. The clock advances and every blocked
//!    timer counts down.
//! 3. Otherwise the selected process ran for one tick. Blocked timers
//!    count down, the clock advances, and a process that just consumed its
//!    last tick completes at the new clock value.

use crate::clock::SimClock;
use crate::error::SimError;
use crate::event_log::{EventLog, SimEvent};
use crate::result::{RunOutcome, SimulationResult};
use core_types::{ProcessId, RunId, Ticks};
use process_model::{ProcessTable, StepOutcome};
use sched_policy::{Policy, PolicyKind, SchedulingPolicy};
use sim_logger::{LogEntry, LogLevel, Logger};
use sim_random::{DeviateSource, DEFAULT_MAX_ATTEMPTS};

/// Driver configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DriverConfig {
    /// Ticks after which the run stops regardless of completion
    pub run_time_budget: Ticks,
    /// Attempts per deviate before giving up on a rejecting source
    pub max_draw_attempts: u32,
    /// Longest tolerated idle streak
    ///
    /// `None` derives the bound from the largest pending unblock countdown
    /// when the streak starts.
    pub max_idle_ticks: Option<Ticks>,
}

impl DriverConfig {
    pub fn new(run_time_budget: Ticks) -> Self {
        Self {
            run_time_budget,
            max_draw_attempts: DEFAULT_MAX_ATTEMPTS,
            max_idle_ticks: None,
        }
    }

    pub fn with_max_draw_attempts(mut self, attempts: u32) -> Self {
        self.max_draw_attempts = attempts;
        self
    }

    pub fn with_max_idle_ticks(mut self, max_idle_ticks: Ticks) -> Self {
        self.max_idle_ticks = Some(max_idle_ticks);
        self
    }
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self::new(1000)
    }
}

/// What one call to [`SimulationDriver::step_tick`] did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The process ran for one tick
    Ran(ProcessId),
    /// No process was eligible; the clock advanced anyway
    Idle,
    /// The run is over; the clock did not move
    Finished(RunOutcome),
}

/// Everything a finished run produced
#[derive(Debug, Clone)]
pub struct SimulationRun {
    pub result: SimulationResult,
    pub events: EventLog,
    pub log: Vec<LogEntry>,
}

/// Discrete-time simulation of one policy over one process table
pub struct SimulationDriver<S = Box<dyn DeviateSource>> {
    config: DriverConfig,
    run_id: RunId,
    clock: SimClock,
    table: ProcessTable,
    policy: Policy,
    current: Option<ProcessId>,
    completed_count: usize,
    idle_ticks: Ticks,
    idle_streak: Ticks,
    idle_limit: Ticks,
    started: bool,
    outcome: Option<RunOutcome>,
    events: EventLog,
    logger: Logger,
    source: S,
}

impl<S: DeviateSource> SimulationDriver<S> {
    /// Creates a driver at tick 0
    pub fn new(
        table: ProcessTable,
        policy: impl Into<Policy>,
        config: DriverConfig,
        source: S,
    ) -> Self {
        Self {
            config,
            run_id: RunId::new(),
            clock: SimClock::new(),
            table,
            policy: policy.into(),
            current: None,
            completed_count: 0,
            idle_ticks: 0,
            idle_streak: 0,
            idle_limit: 0,
            started: false,
            outcome: None,
            events: EventLog::new(),
            logger: Logger::default(),
            source,
        }
    }

    /// Replaces the default Info-level logger
    pub fn with_logger(mut self, logger: Logger) -> Self {
        self.logger = logger;
        self
    }

    pub fn with_run_id(mut self, run_id: RunId) -> Self {
        self.run_id = run_id;
        self
    }

    pub fn run_id(&self) -> RunId {
        self.run_id
    }

    pub fn policy_kind(&self) -> PolicyKind {
        self.policy.kind()
    }

    pub fn config(&self) -> &DriverConfig {
        &self.config
    }

    pub fn current_ticks(&self) -> Ticks {
        self.clock.current_ticks()
    }

    pub fn table(&self) -> &ProcessTable {
        &self.table
    }

    /// Process holding the CPU, if any
    pub fn current(&self) -> Option<ProcessId> {
        self.current
    }

    pub fn completed_count(&self) -> usize {
        self.completed_count
    }

    pub fn idle_ticks(&self) -> Ticks {
        self.idle_ticks
    }

    /// How the run ended, once it has
    pub fn outcome(&self) -> Option<RunOutcome> {
        self.outcome
    }

    pub fn events(&self) -> &EventLog {
        &self.events
    }

    pub fn logger(&self) -> &Logger {
        &self.logger
    }

    pub fn logger_mut(&mut self) -> &mut Logger {
        &mut self.logger
    }

    /// Advances the simulation by one tick
    ///
    /// Once the run is over every further call returns
    /// [`TickOutcome::Finished`] without changing anything.
    pub fn step_tick(&mut self) -> Result<TickOutcome, SimError> {
        if let Some(outcome) = self.outcome {
            return Ok(TickOutcome::Finished(outcome));
        }
        if !self.started {
            self.start();
        }
        if let Some(outcome) = self.check_termination() {
            return Ok(TickOutcome::Finished(outcome));
        }

        match self.dispatch()? {
            Some(id) => {
                self.idle_streak = 0;
                self.advance_clock();
                let now = self.clock.current_ticks();
                if self.table.finish_if_done(id, now) {
                    self.on_completed(id);
                }
                Ok(TickOutcome::Ran(id))
            }
            None if self.all_completed() => {
                Ok(TickOutcome::Finished(self.conclude(RunOutcome::AllCompleted)))
            }
            None => {
                self.idle_tick()?;
                Ok(TickOutcome::Idle)
            }
        }
    }

    /// Runs until every process completes or the budget runs out
    pub fn run(&mut self) -> Result<SimulationResult, SimError> {
        loop {
            if let TickOutcome::Finished(outcome) = self.step_tick()? {
                return Ok(self.build_result(outcome));
            }
        }
    }

    /// Runs to the end and hands back the result, events and log entries
    pub fn run_to_end(mut self) -> Result<SimulationRun, SimError> {
        let result = self.run()?;
        Ok(SimulationRun {
            result,
            events: self.events,
            log: self.logger.drain(),
        })
    }

    /// Result record, once the run is over
    pub fn result(&self) -> Option<SimulationResult> {
        self.outcome.map(|outcome| self.build_result(outcome))
    }

    fn build_result(&self, outcome: RunOutcome) -> SimulationResult {
        SimulationResult::from_table(
            self.run_id,
            self.policy.kind(),
            &self.table,
            self.clock.current_ticks(),
            self.idle_ticks,
            outcome,
        )
    }

    fn all_completed(&self) -> bool {
        self.completed_count == self.table.len()
    }

    fn start(&mut self) {
        self.started = true;
        self.logger.record(
            LogEntry::new(LogLevel::Info, "run started")
                .at_tick(self.clock.current_ticks())
                .with_field("run", self.run_id)
                .with_field("policy", self.policy.kind().short_name())
                .with_field("processes", self.table.len())
                .with_field("budget", self.config.run_time_budget),
        );

        // Nothing to run for an empty burst
        let now = self.clock.current_ticks();
        let done: Vec<ProcessId> = self
            .table
            .ready()
            .filter(|p| p.remaining() == 0)
            .map(|p| p.id())
            .collect();
        for id in done {
            if self.table.finish_if_done(id, now) {
                self.on_completed(id);
            }
        }
    }

    fn check_termination(&mut self) -> Option<RunOutcome> {
        if self.all_completed() {
            Some(self.conclude(RunOutcome::AllCompleted))
        } else if self.clock.current_ticks() >= self.config.run_time_budget {
            Some(self.conclude(RunOutcome::BudgetExhausted))
        } else {
            None
        }
    }

    /// Picks the process that runs this tick, handling boundaries
    ///
    /// Every pass either runs the candidate or moves it out of Ready, so
    /// the loop ends after at most two passes per process.
    fn dispatch(&mut self) -> Result<Option<ProcessId>, SimError> {
        loop {
            let now = self.clock.current_ticks();
            let id = match self.current {
                Some(id) if self.table.is_ready(id) => id,
                _ => match self.policy.select_next(&self.table) {
                    Some(id) => {
                        self.current = Some(id);
                        if let Some(process) = self.table.get(id) {
                            let snapshot = process.snapshot();
                            self.record(SimEvent::Registered {
                                process: id,
                                tick: now,
                                snapshot,
                            });
                        }
                        id
                    }
                    None => {
                        self.current = None;
                        return Ok(None);
                    }
                },
            };

            let before = self.table.get(id).map(|p| p.snapshot());
            let stepped =
                self.table
                    .step(id, now, &mut self.source, self.config.max_draw_attempts);
            let outcome = match stepped {
                Ok(outcome) => outcome,
                Err(err) => return Err(self.fault(err.into())),
            };

            match outcome {
                StepOutcome::Ran => return Ok(Some(id)),
                StepOutcome::Completed => {
                    self.on_completed(id);
                    if self.all_completed() {
                        return Ok(None);
                    }
                }
                StepOutcome::Blocked { ticks_to_unblock } => {
                    self.current = None;
                    let after = self.table.get(id).map(|p| p.snapshot());
                    if let (Some(before), Some(snapshot)) = (before, after) {
                        self.record(SimEvent::Blocked {
                            process: id,
                            tick: now,
                            ticks_to_unblock,
                            before,
                            snapshot,
                        });
                    }
                }
            }
        }
    }

    fn idle_tick(&mut self) -> Result<(), SimError> {
        let now = self.clock.current_ticks();
        if self.table.blocked_count() == 0 {
            let remaining = self.table.len() - self.completed_count;
            return Err(self.fault(SimError::SchedulingFault {
                tick: now,
                remaining,
            }));
        }

        if self.idle_streak == 0 {
            self.idle_limit = self.config.max_idle_ticks.unwrap_or_else(|| {
                self.table
                    .max_unblock_countdown()
                    .unwrap_or(0)
                    .saturating_add(1)
            });
        }
        self.idle_streak += 1;
        if self.idle_streak > self.idle_limit {
            return Err(self.fault(SimError::IdleStall {
                tick: now,
                idle_ticks: self.idle_streak,
            }));
        }

        self.record(SimEvent::Idle { tick: now });
        self.idle_ticks += 1;
        self.advance_clock();
        Ok(())
    }

    fn advance_clock(&mut self) {
        let unblocked = self.policy.on_tick_advance(&mut self.table);
        self.clock.tick();
        let now = self.clock.current_ticks();
        for process in unblocked {
            self.record(SimEvent::Unblocked { process, tick: now });
        }
    }

    fn on_completed(&mut self, id: ProcessId) {
        self.completed_count += 1;
        if self.current == Some(id) {
            self.current = None;
        }
        if let Some(process) = self.table.get(id) {
            let snapshot = process.snapshot();
            let tick = process
                .completed_at()
                .unwrap_or_else(|| self.clock.current_ticks());
            self.record(SimEvent::Completed {
                process: id,
                tick,
                snapshot,
            });
        }
    }

    fn conclude(&mut self, outcome: RunOutcome) -> RunOutcome {
        self.outcome = Some(outcome);
        let now = self.clock.current_ticks();
        if outcome == RunOutcome::BudgetExhausted {
            self.record(SimEvent::BudgetExhausted {
                tick: now,
                completed: self.completed_count,
                remaining: self.table.len() - self.completed_count,
            });
        }
        self.logger.record(
            LogEntry::new(LogLevel::Info, "run finished")
                .at_tick(now)
                .with_field("policy", self.policy.kind().short_name())
                .with_field("outcome", format!("{:?}", outcome))
                .with_field("completed", self.completed_count)
                .with_field("idle_ticks", self.idle_ticks),
        );
        outcome
    }

    fn fault(&mut self, err: SimError) -> SimError {
        self.logger.record(
            LogEntry::new(LogLevel::Error, err.to_string())
                .at_tick(self.clock.current_ticks())
                .with_field("policy", self.policy.kind().short_name()),
        );
        err
    }

    fn record(&mut self, event: SimEvent) {
        self.logger.record(event.to_log_entry());
        self.events.record(event);
    }
}
