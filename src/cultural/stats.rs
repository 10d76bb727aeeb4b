//! Cultural search statistics.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::models::Time;

/// Counters collected during a cultural run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CulturalStatistics {
    /// Seed the run used; replaying it reproduces the run.
    pub seed: u64,
    pub generations: u64,
    pub population_size: usize,
    pub nudges_attempted: u64,
    pub nudges_applied: u64,
    pub nudges_rejected: u64,
    /// Best fitness of the initial population.
    pub initial_best: Time,
    pub final_best: Time,
    pub time_total: Duration,
}

impl CulturalStatistics {
    #[inline]
    pub fn on_generation(&mut self) {
        self.generations = self.generations.saturating_add(1);
    }

    #[inline]
    pub fn on_nudge_applied(&mut self) {
        self.nudges_attempted = self.nudges_attempted.saturating_add(1);
        self.nudges_applied = self.nudges_applied.saturating_add(1);
    }

    #[inline]
    pub fn on_nudge_rejected(&mut self) {
        self.nudges_attempted = self.nudges_attempted.saturating_add(1);
        self.nudges_rejected = self.nudges_rejected.saturating_add(1);
    }

    #[inline]
    pub fn set_total_time(&mut self, duration: Duration) {
        self.time_total = duration;
    }
}

impl std::fmt::Display for CulturalStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Cultural Search Statistics:")?;
        writeln!(f, "  Seed:              {}", self.seed)?;
        writeln!(f, "  Generations:       {}", self.generations)?;
        writeln!(f, "  Population size:   {}", self.population_size)?;
        writeln!(f, "  Nudges attempted:  {}", self.nudges_attempted)?;
        writeln!(f, "  Nudges applied:    {}", self.nudges_applied)?;
        writeln!(f, "  Nudges rejected:   {}", self.nudges_rejected)?;
        writeln!(f, "  Initial best:      {}", self.initial_best)?;
        writeln!(f, "  Final best:        {}", self.final_best)?;
        writeln!(f, "  Total time:        {:.2?}", self.time_total)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nudge_counters() {
        let mut stats = CulturalStatistics::default();
        stats.on_nudge_applied();
        stats.on_nudge_rejected();
        stats.on_nudge_applied();
        stats.on_generation();

        assert_eq!(stats.nudges_attempted, 3);
        assert_eq!(stats.nudges_applied, 2);
        assert_eq!(stats.nudges_rejected, 1);
        assert_eq!(stats.generations, 1);
        assert!(stats.to_string().contains("Nudges applied:    2"));
    }
}
