//! Branch-and-bound configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::{Result, SolveError};

/// Branch-and-bound configuration.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use u_makespan::bnb::BnbConfig;
///
/// let config = BnbConfig::default()
///     .with_time_limit(Duration::from_secs(5))
///     .with_progress_interval(1_000);
/// assert!(config.greedy_seed);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BnbConfig {
    /// Wall-clock budget. `None` searches until the tree is exhausted.
    pub time_limit: Option<Duration>,
    /// Seed the incumbent with the greedy list schedule.
    pub greedy_seed: bool,
    /// Branch on only the first empty machine at each node.
    pub symmetry_breaking: bool,
    /// Nodes explored between progress callbacks.
    pub progress_interval: u64,
    /// Search steps between clock reads. The time limit may be overrun by
    /// up to this many steps.
    pub deadline_check_interval: u64,
}

impl Default for BnbConfig {
    fn default() -> Self {
        Self {
            time_limit: None,
            greedy_seed: true,
            symmetry_breaking: true,
            progress_interval: 10_000,
            deadline_check_interval: 64,
        }
    }
}

impl BnbConfig {
    /// Sets the wall-clock budget.
    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = Some(limit);
        self
    }

    /// Enables or disables the greedy incumbent seed.
    pub fn with_greedy_seed(mut self, enabled: bool) -> Self {
        self.greedy_seed = enabled;
        self
    }

    /// Enables or disables empty-machine symmetry breaking.
    pub fn with_symmetry_breaking(mut self, enabled: bool) -> Self {
        self.symmetry_breaking = enabled;
        self
    }

    /// Sets the number of nodes between progress callbacks.
    pub fn with_progress_interval(mut self, nodes: u64) -> Self {
        self.progress_interval = nodes;
        self
    }

    /// Sets the number of search steps between clock reads.
    pub fn with_deadline_check_interval(mut self, steps: u64) -> Self {
        self.deadline_check_interval = steps;
        self
    }

    /// Checks value ranges.
    ///
    /// # Errors
    /// [`SolveError::InvalidConfig`] if an interval is zero.
    pub fn validate(&self) -> Result<()> {
        if self.progress_interval == 0 {
            return Err(SolveError::InvalidConfig(
                "progress_interval must be at least 1".into(),
            ));
        }
        if self.deadline_check_interval == 0 {
            return Err(SolveError::InvalidConfig(
                "deadline_check_interval must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = BnbConfig::default();
        assert_eq!(config.time_limit, None);
        assert!(config.greedy_seed);
        assert!(config.symmetry_breaking);
        assert_eq!(config.progress_interval, 10_000);
        assert_eq!(config.deadline_check_interval, 64);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_intervals_rejected() {
        let config = BnbConfig::default().with_progress_interval(0);
        assert!(matches!(config.validate(), Err(SolveError::InvalidConfig(_))));

        let config = BnbConfig::default().with_deadline_check_interval(0);
        assert!(matches!(config.validate(), Err(SolveError::InvalidConfig(_))));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: BnbConfig = serde_json::from_str(r#"{"greedy_seed":false}"#).unwrap();
        assert!(!config.greedy_seed);
        assert_eq!(config.deadline_check_interval, 64);
    }
}
