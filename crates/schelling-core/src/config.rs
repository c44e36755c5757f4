//! Configuration System
//!
//! Loads run parameters from a TOML file. Every section has defaults, so a
//! file only needs the values it changes.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::components::{EdgePolicy, Neighborhood, OccupancyPolicy};
use crate::error::{ConfigurationError, SimError};
use crate::systems::{Comparison, Convergence, HappinessRule, Rules};

/// Default config file path
pub const DEFAULT_CONFIG_PATH: &str = "schelling.toml";

/// Top-level configuration structure
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub grid: GridConfig,
    pub population: PopulationConfig,
    pub rules: RulesConfig,
    pub run: RunConfig,
    pub metrics: MetricsConfig,
}

/// Grid shape and policies
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    pub width: usize,
    pub height: usize,
    pub occupancy: OccupancyPolicy,
    pub edge: EdgePolicy,
}

impl GridConfig {
    /// Number of cells, or an error if it does not fit in `usize`.
    pub fn area(&self) -> Result<usize, ConfigurationError> {
        self.width
            .checked_mul(self.height)
            .ok_or(ConfigurationError::GridTooLarge {
                width: self.width,
                height: self.height,
            })
    }
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            width: 10,
            height: 10,
            occupancy: OccupancyPolicy::Single,
            edge: EdgePolicy::Bounded,
        }
    }
}

/// Population sizes, as explicit counts or as fractions of the grid area.
/// Counts take precedence when both are given.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PopulationConfig {
    pub count_a: Option<usize>,
    pub count_b: Option<usize>,
    pub fraction_a: Option<f64>,
    pub fraction_b: Option<f64>,
}

impl Default for PopulationConfig {
    fn default() -> Self {
        Self {
            count_a: Some(75),
            count_b: Some(10),
            fraction_a: None,
            fraction_b: None,
        }
    }
}

impl PopulationConfig {
    /// Explicit counts.
    pub fn counts(count_a: usize, count_b: usize) -> Self {
        Self {
            count_a: Some(count_a),
            count_b: Some(count_b),
            fraction_a: None,
            fraction_b: None,
        }
    }

    /// Fractions of the grid area, rounded down.
    pub fn fractions(fraction_a: f64, fraction_b: f64) -> Self {
        Self {
            count_a: None,
            count_b: None,
            fraction_a: Some(fraction_a),
            fraction_b: Some(fraction_b),
        }
    }

    /// Resolves to `(count_a, count_b)` for a grid of `area` cells.
    pub fn resolve(&self, area: usize) -> Result<(usize, usize), ConfigurationError> {
        if self.count_a.is_some() || self.count_b.is_some() {
            return Ok((self.count_a.unwrap_or(0), self.count_b.unwrap_or(0)));
        }

        let fraction_a = self.fraction_a.unwrap_or(0.0);
        let fraction_b = self.fraction_b.unwrap_or(0.0);
        let valid = |f: f64| (0.0..=1.0).contains(&f);
        if !valid(fraction_a) || !valid(fraction_b) || fraction_a + fraction_b > 1.0 {
            return Err(ConfigurationError::InvalidFractions {
                fraction_a,
                fraction_b,
            });
        }

        let count = |f: f64| (f * area as f64).floor() as usize;
        Ok((count(fraction_a), count(fraction_b)))
    }
}

/// Happiness rule parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    pub threshold: f64,
    pub neighborhood: Neighborhood,
    pub comparison: Comparison,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            threshold: 0.25,
            neighborhood: Neighborhood::Moore,
            comparison: Comparison::AtLeast,
        }
    }
}

impl RulesConfig {
    pub fn to_rules(&self) -> Rules {
        Rules::new(
            self.neighborhood,
            HappinessRule::new(self.threshold, self.comparison),
        )
    }
}

/// Step budget, seed and stopping
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub steps: u64,
    pub seed: u64,
    pub convergence: Convergence,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            steps: 100,
            seed: 42,
            convergence: Convergence::None,
        }
    }
}

/// Dissimilarity block size
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    pub block_width: usize,
    pub block_height: usize,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            block_width: 2,
            block_height: 2,
        }
    }
}

impl SimConfig {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SimError> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string
    pub fn from_toml_str(content: &str) -> Result<Self, SimError> {
        Ok(toml::from_str(content)?)
    }

    pub fn to_toml(&self) -> Result<String, SimError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Resolved `(count_a, count_b)`.
    pub fn population_counts(&self) -> Result<(usize, usize), ConfigurationError> {
        self.population.resolve(self.grid.area()?)
    }

    /// Checks everything that must hold before a run can start.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        let GridConfig { width, height, .. } = self.grid;
        if width == 0 || height == 0 {
            return Err(ConfigurationError::EmptyGrid { width, height });
        }
        let capacity = self.grid.area()?;

        let threshold = self.rules.threshold;
        if !(0.0..=1.0).contains(&threshold) {
            return Err(ConfigurationError::ThresholdOutOfRange(threshold));
        }

        if self.run.steps == 0 {
            return Err(ConfigurationError::ZeroSteps);
        }

        let MetricsConfig {
            block_width,
            block_height,
        } = self.metrics;
        if block_width == 0 || block_height == 0 {
            return Err(ConfigurationError::EmptyBlock {
                block_width,
                block_height,
            });
        }
        if width % block_width != 0 || height % block_height != 0 {
            return Err(ConfigurationError::BlockSizeMismatch {
                width,
                height,
                block_width,
                block_height,
            });
        }

        let (count_a, count_b) = self.population_counts()?;
        let population = count_a.saturating_add(count_b);
        if population == 0 {
            return Err(ConfigurationError::EmptyPopulation);
        }
        if self.grid.occupancy == OccupancyPolicy::Single && population > capacity {
            return Err(ConfigurationError::PopulationExceedsCapacity {
                population,
                capacity,
            });
        }

        Ok(())
    }
}
