//! # Process Model
//!
//! The mutable simulation unit of the scheduler and the arena that holds it.
//!
//! ## State Machine
//!
//! ```text
//!            step: cpu left, interval not reached
//!              +-----+
//!              v     |
//!   created -> Ready --+-- step: interval reached --> Blocked
//!              |  ^                                     |
//!              |  +------ countdown reaches zero -------+
//!              |
//!              +-- step: no cpu left --> Completed (terminal)
//! ```
//!
//! Every process carries an exponentially aged estimate of its I/O
//! interval. Aging-based policies rank processes by it; other policies
//! ignore it.

pub mod process;
pub mod table;

pub use process::{
    aged_estimate, Process, ProcessParams, ProcessSnapshot, ProcessState, StepOutcome,
};
pub use table::ProcessTable;

use core_types::ProcessId;
use sim_random::RandomError;
use thiserror::Error;

/// Errors from advancing a process
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum ProcessError {
    /// The process is Blocked or Completed and cannot be stepped
    #[error("{id} is not runnable in state {state:?}")]
    NotRunnable { id: ProcessId, state: ProcessState },

    /// No process with this handle exists
    #[error("unknown process: {0}")]
    UnknownProcess(ProcessId),

    /// Re-randomizing the I/O interval failed
    #[error("I/O interval re-randomization failed: {0}")]
    Random(#[from] RandomError),
}
