use thiserror::Error;

use crate::config::ConfigError;
use crate::landscape::LoadError;

/// Fatal conditions that stop a simulation before or while it runs.
#[derive(Debug, Error)]
pub enum SimulationError {
    #[error("invalid configuration")]
    Config(#[from] ConfigError),

    #[error("failed to load elevation grid")]
    Load(#[from] LoadError),

    /// The worker pool for band dispatch could not be created.
    #[error("failed to start {workers} simulation workers")]
    WorkerPool {
        workers: usize,
        #[source]
        source: rayon::ThreadPoolBuildError,
    },

    #[error("elevation grid is {found}×{found}, configuration expects {expected}×{expected}")]
    SizeMismatch { expected: usize, found: usize },
}
