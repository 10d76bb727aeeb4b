//! Side-by-side run of both solvers.
//!
//! Runs branch-and-bound and the cultural search concurrently on scoped
//! threads, each on its own copy of the problem, and tabulates their
//! metrics with a winner per row.

use log::info;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::thread;

use crate::bnb::{BnbConfig, BnbStatistics, BranchAndBound};
use crate::cultural::{CulturalConfig, CulturalSolver, CulturalStatistics};
use crate::error::{Result, SolveError};
use crate::models::ProblemModel;
use crate::outcome::SolveOutcome;
use crate::scheduler::ScheduleMetrics;

/// Compared quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Metric {
    Makespan,
    IdleTime,
    Utilization,
    ExecutionTime,
}

impl Metric {
    pub const ALL: [Metric; 4] = [
        Metric::Makespan,
        Metric::IdleTime,
        Metric::Utilization,
        Metric::ExecutionTime,
    ];

    /// Whether a larger value is better.
    pub fn higher_is_better(self) -> bool {
        matches!(self, Metric::Utilization)
    }

    /// Value of this metric, as `f64` (seconds for execution time, percent
    /// for utilization).
    pub fn value(self, metrics: &ScheduleMetrics) -> f64 {
        match self {
            Metric::Makespan => metrics.makespan as f64,
            Metric::IdleTime => metrics.total_idle_time as f64,
            Metric::Utilization => metrics.utilization_percent(),
            Metric::ExecutionTime => metrics.execution_time.as_secs_f64(),
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Metric::Makespan => "makespan",
            Metric::IdleTime => "idle time",
            Metric::Utilization => "utilization (%)",
            Metric::ExecutionTime => "execution time (s)",
        };
        f.write_str(label)
    }
}

/// Which solver did better on a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Winner {
    BranchAndBound,
    Cultural,
    Tie,
}

/// One compared metric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonRow {
    pub metric: Metric,
    pub branch_and_bound: f64,
    pub cultural: f64,
    pub winner: Winner,
}

impl ComparisonRow {
    fn new(metric: Metric, bnb: &ScheduleMetrics, cultural: &ScheduleMetrics) -> Self {
        let b = metric.value(bnb);
        let c = metric.value(cultural);
        let winner = if b == c {
            Winner::Tie
        } else if (b > c) == metric.higher_is_better() {
            Winner::BranchAndBound
        } else {
            Winner::Cultural
        };
        Self {
            metric,
            branch_and_bound: b,
            cultural: c,
            winner,
        }
    }
}

/// Both outcomes and the metric table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comparison {
    pub branch_and_bound: SolveOutcome<BnbStatistics>,
    pub cultural: SolveOutcome<CulturalStatistics>,
    pub rows: Vec<ComparisonRow>,
}

impl Comparison {
    pub fn row(&self, metric: Metric) -> Option<&ComparisonRow> {
        self.rows.iter().find(|r| r.metric == metric)
    }
}

/// Runs both solvers concurrently and compares their schedules.
///
/// # Errors
/// The first solver error (branch-and-bound checked first), or
/// [`SolveError::InvariantViolation`] if a solver thread panicked.
pub fn compare(
    problem: &ProblemModel,
    bnb_config: BnbConfig,
    cultural_config: CulturalConfig,
) -> Result<Comparison> {
    let bnb_problem = problem.clone();
    let cultural_problem = problem.clone();

    let (bnb, cultural) = thread::scope(|scope| {
        let bnb = scope.spawn(move || {
            BranchAndBound::new()
                .with_config(bnb_config)
                .solve(&bnb_problem)
        });
        let cultural = scope.spawn(move || {
            CulturalSolver::new()
                .with_config(cultural_config)
                .solve(&cultural_problem)
        });
        (join(bnb, "branch-and-bound"), join(cultural, "cultural"))
    });
    let bnb = bnb?;
    let cultural = cultural?;

    let rows: Vec<ComparisonRow> = Metric::ALL
        .iter()
        .map(|&metric| ComparisonRow::new(metric, &bnb.metrics, &cultural.metrics))
        .collect();
    info!(
        "comparison: branch-and-bound {} ({}), cultural {}",
        bnb.makespan(),
        bnb.status,
        cultural.makespan()
    );

    Ok(Comparison {
        branch_and_bound: bnb,
        cultural,
        rows,
    })
}

fn join<T>(handle: thread::ScopedJoinHandle<'_, Result<T>>, solver: &str) -> Result<T> {
    handle
        .join()
        .map_err(|_| SolveError::InvariantViolation(format!("{solver} solver thread panicked")))?
}
