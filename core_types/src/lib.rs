//! # Core Types
//!
//! This crate defines the fundamental types shared by the scheduling
//! simulator crates.
//!
//! ## Key Types
//!
//! - [`ProcessId`]: Stable arena handle for a simulated process
//! - [`RunId`]: Unique identifier for one simulation run
//! - [`Ticks`]: Simulated time, counted in whole ticks

pub mod ids;

pub use ids::{ProcessId, RunId};

/// Simulated time in ticks
///
/// A tick is the only unit of time in the simulator. CPU progress,
/// blocking countdowns and the run-time budget are all counted in ticks.
pub type Ticks = u64;
