//! Greedy list scheduler.
//!
//! # Algorithm
//!
//! 1. Rank all jobs once, longest total work first (ties by job ID).
//! 2. Collect the ready task of every unfinished job (its next task).
//! 3. For every ready task and every machine, compute the earliest
//!    feasible start after the job's previous task.
//! 4. Commit the pair with the smallest finish time (ties: job rank, then
//!    machine id) and repeat until every task is placed.
//!
//! # Complexity
//! O(J log J + T × J × M × E) where T=tasks, J=jobs, M=machines,
//! E=entries per machine.
//!
//! # Reference
//! Graham (1966), "Bounds for Certain Multiprocessing Anomalies";
//! Pinedo (2016), "Scheduling", Ch. 4: Priority Dispatching

use log::debug;

use crate::dispatching::RuleEngine;
use crate::error::{Result, SolveError};
use crate::models::{Job, MachineId, ProblemModel, Time, Timeline};

/// Earliest-finish list scheduler.
///
/// Produces a complete, feasible timeline fast. Used to seed the
/// branch-and-bound incumbent and as its fallback when the time budget
/// runs out before any incumbent exists.
///
/// # Example
///
/// ```
/// use u_makespan::models::{Job, ProblemModel};
/// use u_makespan::scheduler::GreedyScheduler;
///
/// let problem = ProblemModel::build(2, vec![
///     Job::new(1).with_tasks([10]),
///     Job::new(2).with_tasks([10]),
/// ]).unwrap();
///
/// let timeline = GreedyScheduler::new().schedule(&problem).unwrap();
/// assert_eq!(timeline.makespan(), 10);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct GreedyScheduler;

impl GreedyScheduler {
    pub fn new() -> Self {
        Self
    }

    /// Schedules every task of `problem`.
    ///
    /// # Errors
    /// [`SolveError::NoFeasibleSchedule`] if a ready task cannot be placed.
    pub fn schedule(&self, problem: &ProblemModel) -> Result<Timeline> {
        let jobs = problem.jobs();
        let job_refs: Vec<&Job> = jobs.iter().collect();
        let ranking = RuleEngine::longest_first().sort_indices(&job_refs);

        let mut timeline = Timeline::new(problem.machine_count());
        let mut done = vec![0usize; jobs.len()];
        let mut ready_at: Vec<Time> = vec![0; jobs.len()];
        let mut unplaced = problem.task_count();

        while unplaced > 0 {
            // (finish, rank, machine, start, job position)
            let mut best: Option<(Time, usize, MachineId, Time, usize)> = None;
            for (rank, &pos) in ranking.iter().enumerate() {
                let Some(task) = jobs[pos].tasks.get(done[pos]) else {
                    continue;
                };
                for machine in MachineId::all(problem.machine_count()) {
                    let start = timeline.earliest_start(machine, ready_at[pos], task.duration);
                    let candidate = (start + task.duration, rank, machine, start, pos);
                    let better = match best {
                        None => true,
                        Some(b) => (candidate.0, candidate.1, candidate.2) < (b.0, b.1, b.2),
                    };
                    if better {
                        best = Some(candidate);
                    }
                }
            }

            let Some((finish, _, machine, start, pos)) = best else {
                return Err(SolveError::NoFeasibleSchedule { unplaced });
            };
            let task = &jobs[pos].tasks[done[pos]];
            timeline
                .commit(task, machine, start)
                .map_err(|_| SolveError::NoFeasibleSchedule { unplaced })?;

            done[pos] += 1;
            ready_at[pos] = finish;
            unplaced -= 1;
        }

        debug!(
            "greedy schedule: {} tasks on {} machines, makespan {}",
            problem.task_count(),
            problem.machine_count(),
            timeline.makespan()
        );
        Ok(timeline)
    }
}
