//! Simulation Event Log
//!
//! Records every scheduling decision and state transition of a run.
//! Reports are rendered from this log and tests query it to prove
//! ordering and timing properties.

use core_types::{ProcessId, Ticks};
use process_model::ProcessSnapshot;
use serde::{Deserialize, Serialize};
use sim_logger::{LogEntry, LogLevel};

/// A single simulation event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SimEvent {
    /// The policy handed the CPU to a process
    Registered {
        process: ProcessId,
        tick: Ticks,
        snapshot: ProcessSnapshot,
    },
    /// A process reached its I/O interval and left the CPU
    ///
    /// `before` is the process as it reached its interval. `snapshot` is
    /// taken after the block and carries the new interval and the aged
    /// estimate.
    Blocked {
        process: ProcessId,
        tick: Ticks,
        ticks_to_unblock: Ticks,
        before: ProcessSnapshot,
        snapshot: ProcessSnapshot,
    },
    /// A blocked process became Ready again
    Unblocked { process: ProcessId, tick: Ticks },
    /// A process consumed its whole burst
    Completed {
        process: ProcessId,
        tick: Ticks,
        snapshot: ProcessSnapshot,
    },
    /// No process was eligible and the clock advanced anyway
    Idle { tick: Ticks },
    /// The run-time budget ran out before every process completed
    BudgetExhausted {
        tick: Ticks,
        completed: usize,
        remaining: usize,
    },
}

impl SimEvent {
    /// Simulated time the event happened at
    pub fn tick(&self) -> Ticks {
        match self {
            SimEvent::Registered { tick, .. }
            | SimEvent::Blocked { tick, .. }
            | SimEvent::Unblocked { tick, .. }
            | SimEvent::Completed { tick, .. }
            | SimEvent::Idle { tick }
            | SimEvent::BudgetExhausted { tick, .. } => *tick,
        }
    }

    /// Process the event is about, if any
    pub fn process(&self) -> Option<ProcessId> {
        match self {
            SimEvent::Registered { process, .. }
            | SimEvent::Blocked { process, .. }
            | SimEvent::Unblocked { process, .. }
            | SimEvent::Completed { process, .. } => Some(*process),
            SimEvent::Idle { .. } | SimEvent::BudgetExhausted { .. } => None,
        }
    }

    /// Short event name used in log messages
    pub fn name(&self) -> &'static str {
        match self {
            SimEvent::Registered { .. } => "registered",
            SimEvent::Blocked { .. } => "blocked",
            SimEvent::Unblocked { .. } => "unblocked",
            SimEvent::Completed { .. } => "completed",
            SimEvent::Idle { .. } => "idle",
            SimEvent::BudgetExhausted { .. } => "budget exhausted",
        }
    }

    /// Converts the event into a structured log entry
    pub fn to_log_entry(&self) -> LogEntry {
        let level = match self {
            SimEvent::BudgetExhausted { .. } => LogLevel::Warn,
            _ => LogLevel::Debug,
        };
        let mut entry = LogEntry::new(level, self.name()).at_tick(self.tick());
        if let Some(process) = self.process() {
            entry = entry.with_source(process);
        }

        match self {
            SimEvent::Registered { snapshot, .. } | SimEvent::Completed { snapshot, .. } => {
                with_snapshot(entry, snapshot)
            }
            SimEvent::Blocked {
                ticks_to_unblock,
                snapshot,
                ..
            } => with_snapshot(entry.with_field("ticks_to_unblock", ticks_to_unblock), snapshot),
            SimEvent::BudgetExhausted {
                completed,
                remaining,
                ..
            } => entry
                .with_field("completed", completed)
                .with_field("remaining", remaining),
            SimEvent::Unblocked { .. } | SimEvent::Idle { .. } => entry,
        }
    }
}

fn with_snapshot(entry: LogEntry, snapshot: &ProcessSnapshot) -> LogEntry {
    entry
        .with_field("cpu_burst", snapshot.cpu_burst)
        .with_field("io_interval", snapshot.io_interval)
        .with_field("cpu_done", snapshot.cpu_done)
        .with_field("estimate", format!("{:.2}", snapshot.estimated_burst))
}

/// Ordered log of simulation events
///
/// Events are appended in the order the driver produced them, which is
/// also non-decreasing tick order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventLog {
    events: Vec<SimEvent>,
}

impl EventLog {
    /// Creates a new empty log
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    /// Appends an event
    pub fn record(&mut self, event: SimEvent) {
        self.events.push(event);
    }

    /// Returns all recorded events
    pub fn events(&self) -> &[SimEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Clears all recorded events
    pub fn clear(&mut self) {
        self.events.clear();
    }

    /// Returns events matching a predicate
    pub fn find_events<F>(&self, predicate: F) -> Vec<&SimEvent>
    where
        F: Fn(&SimEvent) -> bool,
    {
        self.events.iter().filter(|e| predicate(e)).collect()
    }

    /// Checks if any event matches a predicate
    pub fn has_event<F>(&self, predicate: F) -> bool
    where
        F: Fn(&SimEvent) -> bool,
    {
        self.events.iter().any(predicate)
    }

    /// Counts events matching a predicate
    pub fn count_events<F>(&self, predicate: F) -> usize
    where
        F: Fn(&SimEvent) -> bool,
    {
        self.events.iter().filter(|e| predicate(e)).count()
    }

    /// Returns every event about one process
    pub fn for_process(&self, id: ProcessId) -> Vec<&SimEvent> {
        self.find_events(|e| e.process() == Some(id))
    }

    /// Returns the tick a process completed at, if it did
    pub fn completion_tick(&self, id: ProcessId) -> Option<Ticks> {
        self.events.iter().find_map(|e| match e {
            SimEvent::Completed { process, tick, .. } if *process == id => Some(*tick),
            _ => None,
        })
    }

    /// Processes in the order they completed
    pub fn completion_order(&self) -> Vec<ProcessId> {
        self.events
            .iter()
            .filter_map(|e| match e {
                SimEvent::Completed { process, .. } => Some(*process),
                _ => None,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> ProcessSnapshot {
        ProcessSnapshot {
            cpu_burst: 10,
            io_interval: 3,
            cpu_done: 4,
            estimated_burst: 3.0,
        }
    }

    fn sample_log() -> EventLog {
        let mut log = EventLog::new();
        log.record(SimEvent::Registered {
            process: ProcessId::new(0),
            tick: 0,
            snapshot: snapshot(),
        });
        log.record(SimEvent::Blocked {
            process: ProcessId::new(0),
            tick: 3,
            ticks_to_unblock: 3,
            before: snapshot(),
            snapshot: snapshot(),
        });
        log.record(SimEvent::Idle { tick: 3 });
        log.record(SimEvent::Completed {
            process: ProcessId::new(1),
            tick: 5,
            snapshot: snapshot(),
        });
        log
    }

    #[test]
    fn test_empty_log() {
        let log = EventLog::new();
        assert!(log.is_empty());
        assert_eq!(log.len(), 0);
        assert!(log.completion_order().is_empty());
    }

    #[test]
    fn test_queries() {
        let log = sample_log();
        assert_eq!(log.len(), 4);
        assert!(log.has_event(|e| matches!(e, SimEvent::Idle { .. })));
        assert_eq!(
            log.count_events(|e| matches!(e, SimEvent::Blocked { .. })),
            1
        );
        assert_eq!(log.for_process(ProcessId::new(0)).len(), 2);
        assert_eq!(log.completion_tick(ProcessId::new(1)), Some(5));
        assert_eq!(log.completion_tick(ProcessId::new(0)), None);
        assert_eq!(log.completion_order(), vec![ProcessId::new(1)]);
    }

    #[test]
    fn test_clear() {
        let mut log = sample_log();
        log.clear();
        assert!(log.is_empty());
    }

    #[test]
    fn test_event_accessors() {
        let event = SimEvent::Idle { tick: 7 };
        assert_eq!(event.tick(), 7);
        assert_eq!(event.process(), None);
        assert_eq!(event.name(), "idle");
    }

    #[test]
    fn test_blocked_log_entry_fields() {
        let entry = SimEvent::Blocked {
            process: ProcessId::new(2),
            tick: 9,
            ticks_to_unblock: 4,
            before: snapshot(),
            snapshot: snapshot(),
        }
        .to_log_entry();

        assert_eq!(entry.level, LogLevel::Debug);
        assert_eq!(entry.source, Some(ProcessId::new(2)));
        assert_eq!(entry.tick, Some(9));
        assert_eq!(entry.field("ticks_to_unblock"), Some("4"));
        assert_eq!(entry.field("estimate"), Some("3.00"));
    }

    #[test]
    fn test_budget_exhausted_is_a_warning() {
        let entry = SimEvent::BudgetExhausted {
            tick: 100,
            completed: 1,
            remaining: 2,
        }
        .to_log_entry();
        assert_eq!(entry.level, LogLevel::Warn);
        assert_eq!(entry.field("remaining"), Some("2"));
    }

    #[test]
    fn test_serialization() {
        let log = sample_log();
        let json = serde_json::to_string(&log).unwrap();
        let back: EventLog = serde_json::from_str(&json).unwrap();
        assert_eq!(back, log);
    }
}
