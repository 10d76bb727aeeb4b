//! Mutable search state with trail-based undo.
//!
//! The state owns the working timeline plus per-job progress. Applying a
//! decision commits one task and records what it overwrote on the trail;
//! undoing pops the trail and uncommits, so backtracking never copies the
//! timeline.

use super::stack::Decision;
use crate::error::{Result, SolveError};
use crate::models::{MachineId, ProblemModel, Task, Time, Timeline};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct TrailEntry {
    job: usize,
    machine: MachineId,
    old_ready: Time,
}

#[derive(Debug, Clone)]
pub(crate) struct SearchState<'a> {
    problem: &'a ProblemModel,
    timeline: Timeline,
    /// Tasks already placed, per job position.
    placed: Vec<usize>,
    /// End time of the last placed task, per job position.
    ready: Vec<Time>,
    /// Work not yet placed, per job position.
    remaining: Vec<Time>,
    trail: Vec<TrailEntry>,
}

impl<'a> SearchState<'a> {
    pub fn new(problem: &'a ProblemModel) -> Self {
        let jobs = problem.jobs();
        Self {
            problem,
            timeline: Timeline::new(problem.machine_count()),
            placed: vec![0; jobs.len()],
            ready: vec![0; jobs.len()],
            remaining: jobs.iter().map(|j| j.total_work()).collect(),
            trail: Vec::with_capacity(problem.task_count()),
        }
    }

    #[inline]
    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    /// Number of tasks placed so far.
    #[inline]
    pub fn depth(&self) -> usize {
        self.trail.len()
    }

    #[inline]
    pub fn is_complete(&self) -> bool {
        self.trail.len() == self.problem.task_count()
    }

    /// Next unplaced task of a job, if any.
    #[inline]
    pub fn next_task(&self, job: usize) -> Option<&'a Task> {
        self.problem.jobs()[job].tasks.get(self.placed[job])
    }

    /// Earliest time the job's next task may start.
    #[inline]
    pub fn ready_time(&self, job: usize) -> Time {
        self.ready[job]
    }

    /// Unplaced work of a job.
    #[inline]
    pub fn remaining_work(&self, job: usize) -> Time {
        self.remaining[job]
    }

    /// Unplaced work of a job excluding its next task.
    #[inline]
    pub fn remaining_after_next(&self, job: usize) -> Time {
        let next = self.next_task(job).map_or(0, |t| t.duration);
        self.remaining[job] - next
    }

    /// Commits the decision's task.
    ///
    /// # Errors
    /// [`SolveError::Infeasible`] from the timeline; the state is unchanged.
    pub fn apply(&mut self, decision: &Decision) -> Result<()> {
        let job = decision.job;
        let Some(task) = self.next_task(job) else {
            return Err(SolveError::InvariantViolation(format!(
                "decision for job position {job} which has no task left"
            )));
        };
        let entry = self.timeline.commit(task, decision.machine, decision.start)?;

        self.trail.push(TrailEntry {
            job,
            machine: decision.machine,
            old_ready: self.ready[job],
        });
        self.placed[job] += 1;
        self.ready[job] = entry.end_time;
        self.remaining[job] -= task.duration;
        Ok(())
    }

    /// Reverts the most recent [`SearchState::apply`].
    ///
    /// # Errors
    /// [`SolveError::InvariantViolation`] if the trail is empty or the
    /// timeline has no matching entry.
    pub fn undo(&mut self) -> Result<()> {
        let Some(last) = self.trail.pop() else {
            return Err(SolveError::InvariantViolation(
                "backtrack with an empty trail".into(),
            ));
        };
        let job = last.job;
        let pos = self.placed[job].checked_sub(1).ok_or_else(|| {
            SolveError::InvariantViolation(format!("job position {job} has nothing to undo"))
        })?;
        let task = &self.problem.jobs()[job].tasks[pos];
        self.timeline.uncommit(task, last.machine)?;

        self.placed[job] = pos;
        self.ready[job] = last.old_ready;
        self.remaining[job] += task.duration;
        Ok(())
    }
}
