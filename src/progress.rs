//! Progress reporting shared by both solvers.
//!
//! Solvers call a caller-supplied `FnMut(u64, ProgressInfo)` at fixed
//! points (every `progress_interval` nodes for branch-and-bound, every
//! generation for the cultural search). The callback only observes; it
//! cannot steer or cancel the search.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::Time;

/// Best objective known at the time of a progress report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BestMetric {
    /// No complete schedule found yet.
    Pending,
    /// Makespan of the best schedule found so far.
    Makespan(Time),
}

impl BestMetric {
    /// The makespan, if one is known.
    pub fn makespan(self) -> Option<Time> {
        match self {
            BestMetric::Pending => None,
            BestMetric::Makespan(t) => Some(t),
        }
    }
}

impl From<Option<Time>> for BestMetric {
    fn from(best: Option<Time>) -> Self {
        best.map_or(BestMetric::Pending, BestMetric::Makespan)
    }
}

impl fmt::Display for BestMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BestMetric::Pending => f.write_str("pending"),
            BestMetric::Makespan(t) => write!(f, "makespan {t}"),
        }
    }
}

/// Payload of a progress report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressInfo {
    pub best_metric: BestMetric,
}

impl ProgressInfo {
    pub fn new(best_metric: BestMetric) -> Self {
        Self { best_metric }
    }
}

/// One point of a convergence trace: best makespan after `step`
/// (nodes explored for branch-and-bound, generation for cultural search).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceSample {
    pub step: u64,
    pub best: Time,
}

impl TraceSample {
    pub fn new(step: u64, best: Time) -> Self {
        Self { step, best }
    }
}

/// Callback that ignores every report.
pub fn no_progress(_step: u64, _info: ProgressInfo) {}
