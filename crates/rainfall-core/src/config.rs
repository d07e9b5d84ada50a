use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Run parameters for one rainfall simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimConfig {
    /// Requested worker count P. Clamped to `size` when partitioning.
    pub workers: usize,
    /// Number of initial steps M during which one drop falls on every cell.
    pub rain_steps: u32,
    /// Water absorbed per cell per step, A.
    pub absorption: f32,
    /// Grid dimension N (the grid is N×N).
    pub size: usize,
    /// Elevation file, N lines of N integers.
    pub elevation: PathBuf,
}

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("worker count must be at least 1")]
    NoWorkers,
    #[error("grid size must be at least 1")]
    EmptyGrid,
    #[error("absorption rate must be a finite non-negative number, got {0}")]
    BadAbsorption(f32),
}

impl SimConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.workers == 0 {
            return Err(ConfigError::NoWorkers);
        }
        if self.size == 0 {
            return Err(ConfigError::EmptyGrid);
        }
        if !self.absorption.is_finite() || self.absorption < 0.0 {
            return Err(ConfigError::BadAbsorption(self.absorption));
        }
        Ok(())
    }

    /// Worker count actually used: never more workers than rows.
    pub fn effective_workers(&self) -> usize {
        self.workers.min(self.size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> SimConfig {
        SimConfig {
            workers: 4,
            rain_steps: 10,
            absorption: 0.25,
            size: 16,
            elevation: PathBuf::from("sample_16x16.in"),
        }
    }

    #[test]
    fn valid_config_passes() {
        assert_eq!(base().validate(), Ok(()));
    }

    #[test]
    fn rejects_degenerate_values() {
        assert_eq!(SimConfig { workers: 0, ..base() }.validate(), Err(ConfigError::NoWorkers));
        assert_eq!(SimConfig { size: 0, ..base() }.validate(), Err(ConfigError::EmptyGrid));
        assert!(matches!(
            SimConfig { absorption: -0.1, ..base() }.validate(),
            Err(ConfigError::BadAbsorption(_))
        ));
        assert!(SimConfig { absorption: f32::NAN, ..base() }.validate().is_err());
    }

    #[test]
    fn workers_clamp_to_rows() {
        assert_eq!(SimConfig { workers: 64, ..base() }.effective_workers(), 16);
        assert_eq!(base().effective_workers(), 4);
    }

    #[test]
    fn config_round_trips_through_json() {
        let json = serde_json::to_string(&base()).unwrap();
        let back: SimConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, base());
    }
}
