//! Search statistics.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::models::Time;

/// Counters collected during a branch-and-bound run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BnbStatistics {
    pub nodes_explored: u64,
    pub backtracks: u64,
    pub decisions_generated: u64,
    pub max_depth: u64,
    /// Nodes or candidates cut by a bound.
    pub prunings_bound: u64,
    /// Candidates skipped because an equivalent empty machine was branched on.
    pub prunings_symmetry: u64,
    /// Decisions whose commit was rejected by the timeline.
    pub prunings_infeasible: u64,
    /// Improving complete schedules (including the greedy seed).
    pub solutions_found: u64,
    pub root_lower_bound: Time,
    pub time_total: Duration,
}

impl BnbStatistics {
    #[inline]
    pub fn on_node_explored(&mut self) {
        self.nodes_explored = self.nodes_explored.saturating_add(1);
    }

    #[inline]
    pub fn on_backtrack(&mut self) {
        self.backtracks = self.backtracks.saturating_add(1);
    }

    #[inline]
    pub fn on_solution_found(&mut self) {
        self.solutions_found = self.solutions_found.saturating_add(1);
    }

    #[inline]
    pub fn on_depth_update(&mut self, depth: u64) {
        self.max_depth = self.max_depth.max(depth);
    }

    #[inline]
    pub fn on_decision_generated(&mut self) {
        self.decisions_generated = self.decisions_generated.saturating_add(1);
    }

    #[inline]
    pub fn on_pruning_bound(&mut self) {
        self.prunings_bound = self.prunings_bound.saturating_add(1);
    }

    #[inline]
    pub fn on_pruning_symmetry(&mut self) {
        self.prunings_symmetry = self.prunings_symmetry.saturating_add(1);
    }

    #[inline]
    pub fn on_pruning_infeasible(&mut self) {
        self.prunings_infeasible = self.prunings_infeasible.saturating_add(1);
    }

    #[inline]
    pub fn set_total_time(&mut self, duration: Duration) {
        self.time_total = duration;
    }

    #[inline]
    pub fn set_root_lower_bound(&mut self, bound: Time) {
        self.root_lower_bound = bound;
    }
}

impl std::fmt::Display for BnbStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Branch-and-Bound Statistics:")?;
        writeln!(f, "  Nodes explored:        {}", self.nodes_explored)?;
        writeln!(f, "  Backtracks:            {}", self.backtracks)?;
        writeln!(f, "  Max depth reached:     {}", self.max_depth)?;
        writeln!(f, "  Decisions generated:   {}", self.decisions_generated)?;
        writeln!(f, "  Prunings (bound):      {}", self.prunings_bound)?;
        writeln!(f, "  Prunings (symmetry):   {}", self.prunings_symmetry)?;
        writeln!(f, "  Prunings (infeasible): {}", self.prunings_infeasible)?;
        writeln!(f, "  Solutions found:       {}", self.solutions_found)?;
        writeln!(f, "  Root lower bound:      {}", self.root_lower_bound)?;
        writeln!(f, "  Total time:            {:.2?}", self.time_total)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters() {
        let mut stats = BnbStatistics::default();
        stats.on_node_explored();
        stats.on_node_explored();
        stats.on_depth_update(3);
        stats.on_depth_update(2);
        stats.on_pruning_symmetry();
        stats.set_root_lower_bound(42);

        assert_eq!(stats.nodes_explored, 2);
        assert_eq!(stats.max_depth, 3);
        assert_eq!(stats.prunings_symmetry, 1);

        let text = stats.to_string();
        assert!(text.contains("Nodes explored:        2"));
        assert!(text.contains("Root lower bound:      42"));
    }
}
