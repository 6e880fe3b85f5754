use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("population size must be at least 1")]
    EmptyPopulation,
    #[error("elite ({elites}) plus random ({random}) agents exceed the population size ({population})")]
    ElitesExceedPopulation {
        elites: usize,
        random: usize,
        population: usize,
    },
    #[error("grid size {0} is too small, need at least 3")]
    GridTooSmall(i32),
    #[error("grid size {0} is too large, at most {max}", max = crate::config::MAX_GRID_SIZE)]
    GridTooLarge(i32),
    #[error("invalid mutation range [{min}, {max}]")]
    InvalidMutationRange { min: f64, max: f64 },
    #[error("max ticks per generation must be at least 1")]
    ZeroMaxTicks,
    #[error("move interval must be at least 1")]
    ZeroMoveInterval,
    #[error("hidden layer {0} has no neurons")]
    EmptyHiddenLayer(usize),
    #[error("failed to read config {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed config json")]
    Json(#[from] serde_json::Error),
}
