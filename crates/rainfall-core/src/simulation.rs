//! Step coordinator: dispatch bands, join, merge trickle, test convergence.
//!
//! The worker pool is built once per simulation and reused for every step.
//! `ThreadPool::install` returns only after every band has finished, which is
//! the per-step barrier: trickle from step `t` is merged into `current_rain`
//! after the join and is first seen by absorption in step `t + 1`.
use std::time::Instant;

use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::config::SimConfig;
use crate::engine::{process_band, split_bands, BandView, StepContext};
use crate::error::SimulationError;
use crate::grid::{GridModel, Matrix};
use crate::landscape::load_landscape;
use crate::locks::BoundaryLockTable;
use crate::partition::{partition_rows, RowBand};
use crate::report::SimulationReport;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// A drop still falls on every cell each step.
    Raining,
    /// Rain has stopped but some water is unabsorbed.
    Draining,
    Converged,
}

/// Where all the water injected so far currently is.
#[derive(Debug, Clone, Copy)]
pub struct WaterBalance {
    pub injected: f64,
    /// Unabsorbed water, including trickle not yet merged.
    pub in_flight: f64,
    pub absorbed: f64,
}

impl WaterBalance {
    /// `injected - (in_flight + absorbed)`; zero up to float rounding.
    pub fn discrepancy(&self) -> f64 {
        self.injected - (self.in_flight + self.absorbed)
    }
}

pub struct Simulation {
    grid: GridModel,
    locks: BoundaryLockTable,
    bands: Vec<RowBand>,
    pool: ThreadPool,
    rain_steps: u64,
    absorption: f32,
    steps: u64,
}

impl Simulation {
    /// Set up a simulation over `elevation`, which must be `config.size` square.
    pub fn new(config: &SimConfig, elevation: Matrix<i32>) -> Result<Self, SimulationError> {
        config.validate()?;
        if elevation.size != config.size {
            return Err(SimulationError::SizeMismatch {
                expected: config.size,
                found: elevation.size,
            });
        }

        let workers = config.effective_workers();
        let pool = ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("rainfall-band-{i}"))
            .build()
            .map_err(|source| SimulationError::WorkerPool { workers, source })?;

        Ok(Self {
            bands: partition_rows(config.size, workers),
            locks: BoundaryLockTable::new(config.size),
            grid: GridModel::new(elevation),
            pool,
            rain_steps: config.rain_steps as u64,
            absorption: config.absorption,
            steps: 0,
        })
    }

    pub fn grid(&self) -> &GridModel {
        &self.grid
    }

    pub fn bands(&self) -> &[RowBand] {
        &self.bands
    }

    /// Steps completed so far.
    pub fn steps(&self) -> u64 {
        self.steps
    }

    fn rain_drop(&self) -> f32 {
        if self.steps < self.rain_steps {
            1.0
        } else {
            0.0
        }
    }

    /// Rain has stopped and every cell holds exactly zero unabsorbed water.
    ///
    /// Water trapped where no neighbour is strictly lower never leaves when
    /// the absorption rate is zero, so this may never become true.
    pub fn all_absorbed(&self) -> bool {
        self.steps >= self.rain_steps && self.grid.is_dry()
    }

    pub fn phase(&self) -> Phase {
        if self.steps < self.rain_steps {
            Phase::Raining
        } else if self.grid.is_dry() {
            Phase::Converged
        } else {
            Phase::Draining
        }
    }

    pub fn water_balance(&self) -> WaterBalance {
        let n = self.grid.size() as f64;
        let rained = self.steps.min(self.rain_steps) as f64;
        WaterBalance {
            injected: rained * n * n,
            in_flight: self.grid.current_rain.total()
                + self.grid.trickle_in.total()
                + self.locks.pending(),
            absorbed: self.grid.absorbed.total(),
        }
    }

    /// Run one full step: all bands in parallel, then merge and reset trickle.
    pub fn step(&mut self) {
        let n = self.grid.size();
        let rain_drop = self.rain_drop();
        let step = self.steps;
        {
            let GridModel { elevation, current_rain, trickle_in, absorbed } = &mut self.grid;
            let ctx = StepContext {
                elevation,
                locks: &self.locks,
                absorption: self.absorption,
                rain_drop,
            };
            let views: Vec<BandView<'_>> = self
                .bands
                .iter()
                .zip(split_bands(&mut current_rain.data, &self.bands, n))
                .zip(split_bands(&mut absorbed.data, &self.bands, n))
                .zip(split_bands(&mut trickle_in.data, &self.bands, n))
                .map(|(((&band, rain), absorbed), trickle)| BandView { band, rain, absorbed, trickle })
                .collect();

            self.pool.install(|| {
                views.into_par_iter().for_each(|view| {
                    log::trace!("step {step}: rows {}..{}", view.band.lo, view.band.hi);
                    process_band(view, &ctx);
                });
            });
        }

        self.grid.merge_trickle();
        self.locks.drain_into(&mut self.grid.current_rain);
        self.steps += 1;
    }

    /// Step until [`all_absorbed`](Self::all_absorbed) holds.
    pub fn run(&mut self) -> SimulationReport {
        let n = self.grid.size();
        log::info!(
            "simulating {n}×{n} grid on {} workers, {} rain steps, absorption {}",
            self.bands.len(),
            self.rain_steps,
            self.absorption
        );

        let start = Instant::now();
        while !self.all_absorbed() {
            self.step();
            if log::log_enabled!(log::Level::Debug) {
                let wb = self.water_balance();
                log::debug!(
                    "step {:>6} {:?}: in flight {:.3}, absorbed {:.3}, drift {:.2e}",
                    self.steps,
                    self.phase(),
                    wb.in_flight,
                    wb.absorbed,
                    wb.discrepancy()
                );
            }
        }
        let elapsed = start.elapsed();
        log::info!("converged after {} steps in {:.3}s", self.steps, elapsed.as_secs_f64());

        SimulationReport {
            size: n,
            steps: self.steps,
            elapsed,
            absorbed: self.grid.absorbed.clone(),
        }
    }
}

/// Validate `config`, load its elevation file and run to convergence.
pub fn run_simulation(config: &SimConfig) -> Result<SimulationReport, SimulationError> {
    config.validate()?;
    let elevation = load_landscape(&config.elevation, config.size)?;
    let mut sim = Simulation::new(config, elevation)?;
    Ok(sim.run())
}
