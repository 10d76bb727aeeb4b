//! Cultural search configuration.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SolveError};

/// Cultural search configuration.
///
/// # Example
///
/// ```
/// use u_makespan::cultural::CulturalConfig;
///
/// let config = CulturalConfig::default()
///     .with_population_size(200)
///     .with_generation_count(50)
///     .with_seed(42);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CulturalConfig {
    /// Individuals per generation.
    pub population_size: usize,
    /// Generations to run; the only stopping rule.
    pub generation_count: usize,
    /// Relative slack over the best fitness before an individual is nudged.
    /// `0.0` nudges everything strictly worse than the best.
    pub tolerance: f64,
    /// Fraction of the population feeding the normative knowledge.
    pub elite_fraction: f64,
    /// RNG seed. `None` draws one from the OS (reported in the statistics).
    pub seed: Option<u64>,
    /// Evaluate initial individuals and nudges on the rayon pool.
    pub parallel: bool,
}

impl Default for CulturalConfig {
    fn default() -> Self {
        Self {
            population_size: 1000,
            generation_count: 100,
            tolerance: 0.0,
            elite_fraction: 0.25,
            seed: None,
            parallel: true,
        }
    }
}

impl CulturalConfig {
    pub fn with_population_size(mut self, size: usize) -> Self {
        self.population_size = size;
        self
    }

    pub fn with_generation_count(mut self, count: usize) -> Self {
        self.generation_count = count;
        self
    }

    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn with_elite_fraction(mut self, fraction: f64) -> Self {
        self.elite_fraction = fraction;
        self
    }

    /// Fixes the RNG seed for reproducible runs.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Checks value ranges.
    ///
    /// # Errors
    /// [`SolveError::InvalidConfig`] for zero sizes, a negative or
    /// non-finite tolerance, or an elite fraction outside `(0, 1]`.
    pub fn validate(&self) -> Result<()> {
        if self.population_size == 0 {
            return Err(SolveError::InvalidConfig(
                "population_size must be at least 1".into(),
            ));
        }
        if self.generation_count == 0 {
            return Err(SolveError::InvalidConfig(
                "generation_count must be at least 1".into(),
            ));
        }
        if !self.tolerance.is_finite() || self.tolerance < 0.0 {
            return Err(SolveError::InvalidConfig(format!(
                "tolerance must be a finite non-negative number, got {}",
                self.tolerance
            )));
        }
        if !(self.elite_fraction > 0.0 && self.elite_fraction <= 1.0) {
            return Err(SolveError::InvalidConfig(format!(
                "elite_fraction must lie in (0, 1], got {}",
                self.elite_fraction
            )));
        }
        Ok(())
    }
}
