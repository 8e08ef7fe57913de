//! Deviate sources
//!
//! A deviate source produces candidate draws. A candidate may be rejected,
//! which the source reports as `None`; callers resample through
//! [`sample`](crate::sample) with a bounded attempt count.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Source of candidate deviates
///
/// `draw` returns `None` when the candidate is rejected or degenerate.
/// Implementations must never loop internally waiting for an accepted
/// draw; resampling is the caller's job so the retry bound stays visible.
pub trait DeviateSource {
    /// Draws one candidate deviate
    fn draw(&mut self) -> Option<f64>;
}

impl<T: DeviateSource + ?Sized> DeviateSource for &mut T {
    fn draw(&mut self) -> Option<f64> {
        (**self).draw()
    }
}

impl<T: DeviateSource + ?Sized> DeviateSource for Box<T> {
    fn draw(&mut self) -> Option<f64> {
        (**self).draw()
    }
}

/// sqrt(8 / e), the width of the ratio-of-uniforms acceptance box
const RATIO_BOX_WIDTH: f64 = 1.715_527_769_921_413_5;

/// Standard normal deviates by the ratio-of-uniforms method
///
/// Each candidate is `sqrt(8/e) * (v - 0.5) / u` for uniform `u`, `v`.
/// The quick-accept and quick-reject bounds settle most candidates; the
/// rest go through the exact `x^2 <= -4 ln u` test. Rejected candidates
/// come back as `None`.
#[derive(Debug, Clone)]
pub struct Gaussian<R = StdRng> {
    rng: R,
}

impl Gaussian<StdRng> {
    /// Creates a reproducible source from a seed
    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    /// Creates a source seeded from the operating system
    pub fn from_os_rng() -> Self {
        Self::with_rng(StdRng::from_os_rng())
    }
}

impl<R: Rng> Gaussian<R> {
    /// Wraps an existing generator
    pub fn with_rng(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> DeviateSource for Gaussian<R> {
    fn draw(&mut self) -> Option<f64> {
        let u: f64 = self.rng.random();
        let v: f64 = self.rng.random();
        if u <= 0.0 {
            return None;
        }

        let x = RATIO_BOX_WIDTH * (v - 0.5) / u;
        let x2 = x * x;

        if x2 <= 5.0 - 4.0 * 0.25f64.exp() * u {
            return Some(x);
        }
        if x2 >= 4.0 * (-1.35f64).exp() / u + 1.4 {
            return None;
        }
        if x2 <= -4.0 * u.ln() {
            Some(x)
        } else {
            None
        }
    }
}

/// Uniform deviates in `[-1, 1)`
///
/// Never rejects a draw.
#[derive(Debug, Clone)]
pub struct Uniform<R = StdRng> {
    rng: R,
}

impl Uniform<StdRng> {
    /// Creates a reproducible source from a seed
    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    /// Creates a source seeded from the operating system
    pub fn from_os_rng() -> Self {
        Self::with_rng(StdRng::from_os_rng())
    }
}

impl<R: Rng> Uniform<R> {
    /// Wraps an existing generator
    pub fn with_rng(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> DeviateSource for Uniform<R> {
    fn draw(&mut self) -> Option<f64> {
        Some(self.rng.random_range(-1.0..1.0))
    }
}

/// Selectable deviate distribution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviateKind {
    /// Ratio-of-uniforms normal deviates
    #[default]
    Gaussian,
    /// Uniform deviates in `[-1, 1)`
    Uniform,
}

impl DeviateKind {
    /// Builds a boxed source of this kind
    ///
    /// With a seed the source is reproducible; without one it is seeded
    /// from the operating system.
    pub fn source(self, seed: Option<u64>) -> Box<dyn DeviateSource> {
        match (self, seed) {
            (DeviateKind::Gaussian, Some(seed)) => Box::new(Gaussian::seeded(seed)),
            (DeviateKind::Gaussian, None) => Box::new(Gaussian::from_os_rng()),
            (DeviateKind::Uniform, Some(seed)) => Box::new(Uniform::seeded(seed)),
            (DeviateKind::Uniform, None) => Box::new(Uniform::from_os_rng()),
        }
    }

    /// Returns the configuration name of this kind
    pub fn as_str(&self) -> &'static str {
        match self {
            DeviateKind::Gaussian => "gaussian",
            DeviateKind::Uniform => "uniform",
        }
    }
}

impl fmt::Display for DeviateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeviateKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "gaussian" | "normal" => Ok(DeviateKind::Gaussian),
            "uniform" => Ok(DeviateKind::Uniform),
            other => Err(format!("unknown deviate kind: {}", other)),
        }
    }
}
