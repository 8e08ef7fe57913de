//! Workload setup
//!
//! Turns a configuration into concrete process parameters. Every process
//! gets a CPU burst of `max(0, run_time_average + floor(X * run_time_stddev))`
//! for a fresh deviate `X`. Declared processes come first in declaration
//! order; if fewer are declared than `process_count`, the rest are
//! synthesized with I/O intervals 0, 100, 200, ...

use crate::error::ConfigResult;
use crate::SimulationConfig;
use core_types::Ticks;
use process_model::{ProcessParams, ProcessTable};
use sim_random::{sample_around, DeviateSource, DEFAULT_MAX_ATTEMPTS};

/// I/O interval step between synthesized processes
pub const SYNTHESIZED_IO_STEP: Ticks = 100;

/// Creation parameters for every process of a run
#[derive(Debug, Clone, PartialEq)]
pub struct Workload {
    params: Vec<ProcessParams>,
}

impl Workload {
    /// Draws the workload described by `config`
    ///
    /// Bursts are drawn in table order, so a seeded source always yields
    /// the same workload.
    pub fn build<S>(config: &SimulationConfig, source: &mut S) -> ConfigResult<Self>
    where
        S: DeviateSource + ?Sized,
    {
        let synthesized = config.process_count.saturating_sub(config.processes.len());
        let io_intervals = config
            .processes
            .iter()
            .map(|spec| spec.io_interval)
            .chain((0..synthesized as Ticks).map(|i| i * SYNTHESIZED_IO_STEP));

        let mut params = Vec::with_capacity(config.effective_process_count());
        for io_interval in io_intervals {
            let cpu_burst = sample_around(
                source,
                config.run_time_average,
                config.run_time_stddev,
                DEFAULT_MAX_ATTEMPTS,
            )?;
            let mut p = ProcessParams::new(cpu_burst, io_interval)
                .with_alpha(config.alpha)
                .with_io_stddev(config.io_stddev);
            if let Some(estimate) = config.base_estimated_execution_time {
                p = p.with_initial_estimate(estimate as f64);
            }
            params.push(p);
        }

        Ok(Self { params })
    }

    pub fn params(&self) -> &[ProcessParams] {
        &self.params
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Builds a fresh process table with zeroed counters
    pub fn table(&self) -> ProcessTable {
        ProcessTable::from_params(self.params.iter().cloned())
    }
}
