//! Driver errors

use core_types::Ticks;
use process_model::ProcessError;
use thiserror::Error;

/// Faults that stop a simulation run
///
/// Running out of budget is not one of them: see
/// [`RunOutcome::BudgetExhausted`](crate::RunOutcome::BudgetExhausted).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SimError {
    #[error("No eligible process at tick {tick}: {remaining} unfinished and none blocked")]
    SchedulingFault { tick: Ticks, remaining: usize },

    #[error("Idle for {idle_ticks} consecutive ticks at tick {tick} without an unblock")]
    IdleStall { tick: Ticks, idle_ticks: Ticks },

    #[error("Process error: {0}")]
    Process(#[from] ProcessError),
}
