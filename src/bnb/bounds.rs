//! Admissible makespan lower bounds.
//!
//! | Bound | Value |
//! |-------|-------|
//! | Work distribution | `ceil(total_work / machines)` |
//! | Critical path | `max_j(ready_j + remaining_j)` |
//! | Machine readiness | makespan of the partial timeline |
//!
//! Idle gaps in a partial timeline may still be filled by later tasks, so
//! the work bound only uses the global work share.
//!
//! # Reference
//! Brucker (2007), "Scheduling Algorithms", Ch. 5 (parallel machines)

use super::state::SearchState;
use crate::models::{ProblemModel, Time};

/// `ceil(total_work / machine_count)`.
pub(crate) fn work_bound(problem: &ProblemModel) -> Time {
    let machines = problem.machine_count().max(1) as Time;
    problem.total_work().div_ceil(machines)
}

/// Lower bound valid for every schedule of the problem.
pub(crate) fn root_lower_bound(problem: &ProblemModel) -> Time {
    work_bound(problem).max(problem.longest_chain())
}

/// Every job still has to run its remaining chain after its ready time.
pub(crate) fn critical_path_bound(state: &SearchState<'_>, jobs: usize) -> Time {
    (0..jobs)
        .map(|j| state.ready_time(j) + state.remaining_work(j))
        .max()
        .unwrap_or(0)
}

/// Max of all bounds at the current node.
pub(crate) fn node_lower_bound(state: &SearchState<'_>, jobs: usize, work: Time) -> Time {
    work.max(critical_path_bound(state, jobs))
        .max(state.timeline().makespan())
}
