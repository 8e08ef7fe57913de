//! # Simulation Driver
//!
//! This crate runs the discrete-time scheduling simulation.
//!
//! ## Purpose
//!
//! Given a process table, a policy and a deviate source, the driver
//! advances a simulated clock one tick at a time and produces:
//! - a [`SimulationResult`] with elapsed time and per-process counters
//! - an [`EventLog`] of every selection, block, unblock and completion
//! - structured log entries for the host to render
//!
//! ## Philosophy
//!
//! - **No I/O**: Nothing here touches files or prints. The host owns that.
//! - **Inspectable**: Tests can step a tick at a time and query the log.
//! - **Reproducible**: A seeded source makes a run repeatable bit for bit.

pub mod clock;
pub mod driver;
pub mod error;
pub mod event_log;
pub mod result;
pub mod test_utils;

pub use clock::SimClock;
pub use driver::{DriverConfig, SimulationDriver, SimulationRun, TickOutcome};
pub use error::SimError;
pub use event_log::{EventLog, SimEvent};
pub use result::{ProcessSummary, RunOutcome, SimulationResult};
