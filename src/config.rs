//! Run configuration, loaded from JSON or taken from defaults.

use crate::agent::ACTIONS;
use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Largest accepted board side; the input layer has one neuron per cell.
pub const MAX_GRID_SIZE: i32 = 256;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Side length of the square board.
    pub grid_size: i32,
    /// Agents per generation.
    pub population_size: usize,
    /// Top agents copied unmutated into the next generation.
    pub elite_count: usize,
    /// Freshly randomized agents injected every generation.
    pub random_count: usize,
    pub mutation_min: f64,
    pub mutation_max: f64,
    /// A generation ends after this many ticks even if agents are alive.
    pub max_ticks: u32,
    /// Snakes move on every `move_interval`-th tick and only check the apple
    /// in between.
    pub move_interval: u32,
    pub hidden_layers: Vec<usize>,
    /// Seed for the population's random source; entropy when absent.
    pub seed: Option<u64>,
    /// Advance agents on the rayon pool instead of serially.
    pub parallel: bool,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            grid_size: 11,
            population_size: 150,
            elite_count: 20,
            random_count: 20,
            mutation_min: -1.0,
            mutation_max: 1.0,
            max_ticks: 100,
            move_interval: 1,
            hidden_layers: vec![10, 10],
            seed: None,
            parallel: false,
        }
    }
}

impl SimConfig {
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json_pretty(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.population_size == 0 {
            return Err(ConfigError::EmptyPopulation);
        }
        if self.elite_count + self.random_count > self.population_size {
            return Err(ConfigError::ElitesExceedPopulation {
                elites: self.elite_count,
                random: self.random_count,
                population: self.population_size,
            });
        }
        if self.grid_size < 3 {
            return Err(ConfigError::GridTooSmall(self.grid_size));
        }
        if self.grid_size > MAX_GRID_SIZE {
            return Err(ConfigError::GridTooLarge(self.grid_size));
        }
        let finite = self.mutation_min.is_finite() && self.mutation_max.is_finite();
        if !finite || self.mutation_min > self.mutation_max {
            return Err(ConfigError::InvalidMutationRange {
                min: self.mutation_min,
                max: self.mutation_max,
            });
        }
        if self.max_ticks == 0 {
            return Err(ConfigError::ZeroMaxTicks);
        }
        if self.move_interval == 0 {
            return Err(ConfigError::ZeroMoveInterval);
        }
        if let Some(i) = self.hidden_layers.iter().position(|&n| n == 0) {
            return Err(ConfigError::EmptyHiddenLayer(i));
        }
        Ok(())
    }

    /// Input layer is one neuron per board cell, output layer one per action.
    pub fn layer_sizes(&self) -> Vec<usize> {
        let side = self.grid_size as usize;
        let cells = side * side;
        let mut sizes = Vec::with_capacity(self.hidden_layers.len() + 2);
        sizes.push(cells);
        sizes.extend_from_slice(&self.hidden_layers);
        sizes.push(ACTIONS);
        sizes
    }

    /// Slots filled with mutated clones each generation.
    pub fn offspring_count(&self) -> usize {
        self.population_size
            .saturating_sub(self.elite_count + self.random_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let c = SimConfig::default();
        c.validate().unwrap();
        assert_eq!(c.layer_sizes(), vec![121, 10, 10, 3]);
        assert_eq!(c.offspring_count(), 110);
    }

    #[test]
    fn rejects_each_invalid_field() {
        let bad = |f: fn(&mut SimConfig)| {
            let mut c = SimConfig::default();
            f(&mut c);
            c.validate().unwrap_err()
        };

        assert!(matches!(bad(|c| c.population_size = 0), ConfigError::EmptyPopulation));
        assert!(matches!(
            bad(|c| c.elite_count = 140),
            ConfigError::ElitesExceedPopulation { elites: 140, random: 20, population: 150 }
        ));
        assert!(matches!(bad(|c| c.grid_size = 2), ConfigError::GridTooSmall(2)));
        assert!(matches!(
            bad(|c| c.grid_size = 50_000),
            ConfigError::GridTooLarge(50_000)
        ));
        assert!(matches!(
            bad(|c| c.mutation_min = 2.0),
            ConfigError::InvalidMutationRange { .. }
        ));
        assert!(matches!(
            bad(|c| c.mutation_max = f64::NAN),
            ConfigError::InvalidMutationRange { .. }
        ));
        assert!(matches!(bad(|c| c.max_ticks = 0), ConfigError::ZeroMaxTicks));
        assert!(matches!(bad(|c| c.move_interval = 0), ConfigError::ZeroMoveInterval));
        assert!(matches!(
            bad(|c| c.hidden_layers = vec![4, 0]),
            ConfigError::EmptyHiddenLayer(1)
        ));
    }

    #[test]
    fn largest_grid_is_accepted_and_sizes_the_input_layer() {
        let c = SimConfig {
            grid_size: MAX_GRID_SIZE,
            ..SimConfig::default()
        };
        c.validate().unwrap();
        assert_eq!(c.layer_sizes()[0], 256 * 256);
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let c: SimConfig =
            serde_json::from_str(r#"{ "population_size": 40, "seed": 7 }"#).unwrap();
        assert_eq!(c.population_size, 40);
        assert_eq!(c.seed, Some(7));
        assert_eq!(c.grid_size, 11);
        assert_eq!(c.hidden_layers, vec![10, 10]);
    }

    #[test]
    fn pretty_json_reads_back_identically() {
        let c = SimConfig {
            seed: Some(3),
            parallel: true,
            ..SimConfig::default()
        };
        let json = c.to_json_pretty().unwrap();
        let back: SimConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, c);
    }

    #[test]
    fn missing_file_reports_the_path() {
        let err = SimConfig::from_json_file("/nonexistent/snake.json").unwrap_err();
        assert!(err.to_string().contains("/nonexistent/snake.json"));
    }
}
