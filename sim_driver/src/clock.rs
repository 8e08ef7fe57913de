//! # Simulation Clock
//!
//! Deterministic tick counter for the simulation loop.
//!
//! The clock only advances when the driver tells it to. There is no
//! relation to wall-clock time.

use core_types::Ticks;

/// Simulated clock with controllable time progression
///
/// # Examples
///
/// ```
/// use sim_driver::clock::SimClock;
///
/// let mut clock = SimClock::new();
/// assert_eq!(clock.current_ticks(), 0);
///
/// clock.tick();
/// clock.advance_ticks(9);
/// assert_eq!(clock.current_ticks(), 10);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SimClock {
    ticks: Ticks,
}

impl SimClock {
    /// Creates a clock starting at tick 0
    pub fn new() -> Self {
        Self { ticks: 0 }
    }

    /// Advances the clock by one tick
    pub fn tick(&mut self) {
        self.advance_ticks(1);
    }

    /// Advances the clock by `delta` ticks
    ///
    /// Saturates at `Ticks::MAX`; the run-time budget ends every run long
    /// before that.
    pub fn advance_ticks(&mut self, delta: Ticks) {
        self.ticks = self.ticks.saturating_add(delta);
    }

    /// Returns the current tick count
    pub fn current_ticks(&self) -> Ticks {
        self.ticks
    }
}
