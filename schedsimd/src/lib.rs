//! # Scheduling Simulator Host
//!
//! This crate provides the command-line host for the scheduling
//! simulator.
//!
//! ## Philosophy
//!
//! - **Host owns I/O**: The simulation crates never print or touch files
//! - **Reproducible by default**: Every run reports the seed it used
//! - **Comparable**: One workload, every policy, same random stream
//!
//! ## Responsibilities
//!
//! The host:
//! - Parses the command line and loads the configuration file
//! - Draws the workload once and runs each selected policy on a copy
//! - Writes `Summary-Results` and `Summary-Processes` reports
//! - Renders structured log entries to stderr
//!
//! ## Non-Responsibilities
//!
//! The host does NOT:
//! - Make scheduling decisions
//! - Interpret simulation results beyond rendering them

pub mod cli;
pub mod runtime;

pub use cli::{parse_args, usage, CliCommand};
pub use runtime::{HostConfig, HostError, HostRuntime, OutputFormat, PolicySelection};
