//! Solver result bundle.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::Timeline;
use crate::progress::TraceSample;
use crate::scheduler::ScheduleMetrics;

/// How a solver call ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SolveStatus {
    /// The search space was exhausted (or the incumbent met the root lower
    /// bound): the returned timeline is optimal.
    Optimal,
    /// The time budget ran out; the best incumbent is returned but
    /// optimality is unproven.
    TimeLimitReached,
    /// A heuristic run finished its fixed budget; no optimality claim.
    Heuristic,
}

impl SolveStatus {
    /// Whether the returned makespan is proven optimal.
    pub fn is_optimal(self) -> bool {
        matches!(self, SolveStatus::Optimal)
    }
}

impl fmt::Display for SolveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SolveStatus::Optimal => "optimal",
            SolveStatus::TimeLimitReached => "time limit reached",
            SolveStatus::Heuristic => "heuristic",
        };
        f.write_str(label)
    }
}

/// Everything a solver call returns.
///
/// `S` is the solver-specific statistics type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolveOutcome<S> {
    /// The best complete timeline found.
    pub timeline: Timeline,
    /// Metrics of `timeline`, including solver wall clock.
    pub metrics: ScheduleMetrics,
    /// Best makespan over time; never increases.
    pub trace: Vec<TraceSample>,
    pub status: SolveStatus,
    pub statistics: S,
}

impl<S> SolveOutcome<S> {
    /// Makespan of the returned timeline.
    pub fn makespan(&self) -> u64 {
        self.metrics.makespan
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_display_and_optimality() {
        assert_eq!(SolveStatus::TimeLimitReached.to_string(), "time limit reached");
        assert!(SolveStatus::Optimal.is_optimal());
        assert!(!SolveStatus::Heuristic.is_optimal());
    }
}
