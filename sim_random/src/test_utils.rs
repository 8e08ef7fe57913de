//! Test utilities for deterministic randomness
//!
//! [`ScriptedDeviates`] replays a fixed script of draws so tests can
//! predict every re-randomized interval exactly.

use crate::DeviateSource;

/// Deviate source that replays a script
///
/// The script repeats once exhausted. `None` entries stand for rejected
/// draws.
#[derive(Debug, Clone)]
pub struct ScriptedDeviates {
    script: Vec<Option<f64>>,
    position: usize,
    draws: usize,
}

impl ScriptedDeviates {
    /// Creates a source replaying `script`
    ///
    /// An empty script behaves like [`always_rejecting`](Self::always_rejecting).
    pub fn new(script: Vec<Option<f64>>) -> Self {
        Self {
            script,
            position: 0,
            draws: 0,
        }
    }

    /// Creates a source that always draws `value`
    pub fn constant(value: f64) -> Self {
        Self::new(vec![Some(value)])
    }

    /// Creates a source that draws zero, leaving every base value unchanged
    pub fn zero() -> Self {
        Self::constant(0.0)
    }

    /// Creates a source that rejects every draw
    pub fn always_rejecting() -> Self {
        Self::new(vec![None])
    }

    /// Returns how many candidates have been drawn
    pub fn draws(&self) -> usize {
        self.draws
    }
}

impl DeviateSource for ScriptedDeviates {
    fn draw(&mut self) -> Option<f64> {
        self.draws += 1;
        if self.script.is_empty() {
            return None;
        }
        let value = self.script[self.position];
        self.position = (self.position + 1) % self.script.len();
        value
    }
}
