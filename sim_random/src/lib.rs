//! # Simulation Randomness
//!
//! Bounded pseudo-random deviations for the scheduling simulator.
//!
//! ## Philosophy
//!
//! - **Pluggable**: Every random decision goes through a [`DeviateSource`]
//! - **Seedable**: Same seed => same draws => same schedule
//! - **Bounded retries**: A rejected draw is resampled, but never forever
//!
//! Deviates are used twice: once at setup to spread each process's CPU
//! burst around the configured mean, and after every I/O block to
//! re-randomize the blocking interval around its base value.

pub mod deviate;
pub mod test_utils;

pub use deviate::{DeviateKind, DeviateSource, Gaussian, Uniform};

use thiserror::Error;

/// Default number of candidate draws before giving up
pub const DEFAULT_MAX_ATTEMPTS: u32 = 64;

/// Errors from sampling
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum RandomError {
    /// Every candidate in the attempt budget was rejected
    #[error("deviate source rejected {attempts} consecutive draws")]
    Exhausted { attempts: u32 },
}

/// Draws an accepted deviate, resampling rejected candidates
///
/// At most `max_attempts` candidates are drawn. A source that rejects all
/// of them yields [`RandomError::Exhausted`] instead of spinning.
pub fn sample<S>(source: &mut S, max_attempts: u32) -> Result<f64, RandomError>
where
    S: DeviateSource + ?Sized,
{
    for _ in 0..max_attempts {
        if let Some(x) = source.draw() {
            return Ok(x);
        }
    }
    Err(RandomError::Exhausted {
        attempts: max_attempts,
    })
}

/// Offsets `base` by `floor(deviate * spread)`, clamped at zero
///
/// This is the shared rule for both CPU bursts (`base` = mean) and I/O
/// intervals (`base` = declared interval).
pub fn spread_around(base: u64, deviate: f64, spread: u64) -> u64 {
    let offset = (deviate * spread as f64).floor();
    let value = base as f64 + offset;
    if value <= 0.0 {
        0
    } else if value >= u64::MAX as f64 {
        u64::MAX
    } else {
        value as u64
    }
}

/// Samples a deviate and spreads `base` by it
pub fn sample_around<S>(
    source: &mut S,
    base: u64,
    spread: u64,
    max_attempts: u32,
) -> Result<u64, RandomError>
where
    S: DeviateSource + ?Sized,
{
    let deviate = sample(source, max_attempts)?;
    Ok(spread_around(base, deviate, spread))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::ScriptedDeviates;

    #[test]
    fn test_sample_skips_rejections() {
        let mut source = ScriptedDeviates::new(vec![None, None, Some(0.25)]);
        assert_eq!(sample(&mut source, 5), Ok(0.25));
    }

    #[test]
    fn test_sample_gives_up_after_budget() {
        let mut source = ScriptedDeviates::always_rejecting();
        assert_eq!(
            sample(&mut source, 3),
            Err(RandomError::Exhausted { attempts: 3 })
        );
        assert_eq!(source.draws(), 3);
    }

    #[test]
    fn test_spread_around_floors_offset() {
        assert_eq!(spread_around(100, 0.55, 10), 105);
        // floor, not truncation: -0.5 * 3 = -1.5 -> -2
        assert_eq!(spread_around(100, -0.5, 3), 98);
    }

    #[test]
    fn test_spread_around_clamps_at_zero() {
        assert_eq!(spread_around(5, -3.0, 10), 0);
    }

    #[test]
    fn test_spread_around_zero_spread_keeps_base() {
        assert_eq!(spread_around(42, 1.7, 0), 42);
        assert_eq!(spread_around(42, -1.7, 0), 42);
    }

    #[test]
    fn test_sample_around_uses_source() {
        let mut source = ScriptedDeviates::constant(1.0);
        assert_eq!(sample_around(&mut source, 1000, 100, 4), Ok(1100));
    }

    #[test]
    fn test_sample_works_through_trait_object() {
        let mut source: Box<dyn DeviateSource> = Box::new(ScriptedDeviates::constant(-0.5));
        assert_eq!(sample(&mut source, 1), Ok(-0.5));
    }
}
