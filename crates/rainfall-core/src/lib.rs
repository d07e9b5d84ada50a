//! Rainfall over an N×N elevation grid.
//!
//! Every step each cell gains a drop of rain (for the first M steps), absorbs
//! up to A units, and trickles at most one unit of the remainder to its
//! strictly-lowest orthogonal neighbours. Rows are split into bands that run
//! in parallel; the simulation ends once rain has stopped and no cell holds
//! unabsorbed water.
pub mod config;
pub mod engine;
pub mod error;
pub mod grid;
pub mod landscape;
pub mod locks;
pub mod partition;
pub mod report;
pub mod simulation;

pub use config::{ConfigError, SimConfig};
pub use error::SimulationError;
pub use grid::{GridModel, Matrix};
pub use landscape::{load_landscape, parse_landscape, write_landscape, LoadError};
pub use partition::{partition_rows, RowBand};
pub use report::SimulationReport;
pub use simulation::{run_simulation, Phase, Simulation, WaterBalance};
