//! Problem model: machines plus job chains.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::{Job, JobId, Task, Time};
use crate::error::{Result, SolveError};
use crate::validation::validate_problem;

/// A validated scheduling instance.
///
/// Built only through [`ProblemModel::build`] (or deserialization, which
/// runs the same checks), so every instance satisfies:
/// - `machine_count >= 1`;
/// - every job has at least one task, indexed contiguously from 1;
/// - durations are positive and job ids unique.
///
/// # Examples
///
/// ```
/// use u_makespan::models::{Job, ProblemModel};
///
/// let problem = ProblemModel::build(2, vec![
///     Job::new(1).with_tasks([5, 3]),
///     Job::new(2).with_tasks([4]),
/// ]).unwrap();
/// assert_eq!(problem.task_count(), 3);
/// assert_eq!(problem.total_work(), 12);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ProblemSpec", into = "ProblemSpec")]
pub struct ProblemModel {
    machine_count: usize,
    jobs: Vec<Job>,
    positions: HashMap<JobId, usize>,
    task_count: usize,
    total_work: Time,
}

/// Wire form of a problem.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProblemSpec {
    pub machine_count: usize,
    pub jobs: Vec<Job>,
}

impl From<ProblemModel> for ProblemSpec {
    fn from(problem: ProblemModel) -> Self {
        Self {
            machine_count: problem.machine_count,
            jobs: problem.jobs,
        }
    }
}

impl TryFrom<ProblemSpec> for ProblemModel {
    type Error = SolveError;

    fn try_from(spec: ProblemSpec) -> Result<Self> {
        ProblemModel::build(spec.machine_count, spec.jobs)
    }
}

impl ProblemModel {
    /// Validates and builds a problem.
    ///
    /// # Errors
    /// [`SolveError::InvalidProblem`] listing every detected issue.
    pub fn build(machine_count: usize, jobs: Vec<Job>) -> Result<Self> {
        // Validation rejects total work beyond `Time`, so the sums below cannot overflow.
        validate_problem(machine_count, &jobs).map_err(SolveError::InvalidProblem)?;

        let positions = jobs
            .iter()
            .enumerate()
            .map(|(pos, job)| (job.job_id, pos))
            .collect();
        let task_count = jobs.iter().map(Job::task_count).sum();
        let total_work = jobs.iter().map(Job::total_work).sum();

        Ok(Self {
            machine_count,
            jobs,
            positions,
            task_count,
            total_work,
        })
    }

    /// Number of interchangeable machines.
    #[inline]
    pub fn machine_count(&self) -> usize {
        self.machine_count
    }

    /// Jobs in input order.
    #[inline]
    pub fn jobs(&self) -> &[Job] {
        &self.jobs
    }

    /// Job by id.
    pub fn job(&self, job_id: JobId) -> Option<&Job> {
        self.positions.get(&job_id).map(|&pos| &self.jobs[pos])
    }

    /// Position of a job in [`ProblemModel::jobs`].
    pub fn job_position(&self, job_id: JobId) -> Option<usize> {
        self.positions.get(&job_id).copied()
    }

    /// Task by job id and 1-based index.
    pub fn task(&self, job_id: JobId, task_index: u32) -> Option<&Task> {
        self.job(job_id)?.task(task_index)
    }

    /// All tasks, job by job in precedence order.
    pub fn tasks(&self) -> impl Iterator<Item = &Task> {
        self.jobs.iter().flat_map(|j| j.tasks.iter())
    }

    /// Total number of tasks over all jobs.
    #[inline]
    pub fn task_count(&self) -> usize {
        self.task_count
    }

    /// Sum of all task durations.
    #[inline]
    pub fn total_work(&self) -> Time {
        self.total_work
    }

    /// Length of the longest job chain (a makespan lower bound).
    pub fn longest_chain(&self) -> Time {
        self.jobs.iter().map(Job::total_work).max().unwrap_or(0)
    }
}
