//! Task and job models.
//!
//! A job is a chain of tasks with strict sequential precedence: task `k`
//! may only start once task `k-1` of the same job has finished. Tasks are
//! the atomic units placed on machines.
//!
//! # Reference
//! Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems", Ch. 1

use serde::{Deserialize, Serialize};

/// Time unit used by every duration and timestamp (abstract ticks).
pub type Time = u64;

/// Job identifier as supplied by the caller.
pub type JobId = u32;

/// A task: one link of a job's chain.
///
/// All machines are interchangeable, so a task carries a single duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Task {
    /// Owning job.
    pub job_id: JobId,
    /// Position within the job (1-based). Defines precedence.
    pub task_index: u32,
    /// Processing time (positive).
    pub duration: Time,
}

impl Task {
    /// Creates a task.
    pub fn new(job_id: JobId, task_index: u32, duration: Time) -> Self {
        Self {
            job_id,
            task_index,
            duration,
        }
    }

    /// Key identifying this task inside a timeline.
    #[inline]
    pub fn key(&self) -> TaskKey {
        TaskKey::new(self.job_id, self.task_index)
    }
}

/// `(job_id, task_index)` pair identifying a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TaskKey {
    pub job_id: JobId,
    pub task_index: u32,
}

impl TaskKey {
    #[inline]
    pub fn new(job_id: JobId, task_index: u32) -> Self {
        Self { job_id, task_index }
    }

    /// Key of the preceding task in the same job, if any.
    #[inline]
    pub fn predecessor(&self) -> Option<TaskKey> {
        (self.task_index > 1).then(|| TaskKey::new(self.job_id, self.task_index - 1))
    }

    /// Key of the following task in the same job.
    #[inline]
    pub fn successor(&self) -> TaskKey {
        TaskKey::new(self.job_id, self.task_index + 1)
    }
}

/// A job: an ordered chain of tasks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    /// Unique job identifier.
    pub job_id: JobId,
    /// Tasks in precedence order (`tasks[k].task_index == k + 1` once validated).
    pub tasks: Vec<Task>,
}

impl Job {
    /// Creates a job with no tasks.
    pub fn new(job_id: JobId) -> Self {
        Self {
            job_id,
            tasks: Vec::new(),
        }
    }

    /// Appends a task with the next free index.
    pub fn with_task(mut self, duration: Time) -> Self {
        let task_index = self.tasks.len() as u32 + 1;
        self.tasks.push(Task::new(self.job_id, task_index, duration));
        self
    }

    /// Appends one task per duration, in order.
    pub fn with_tasks<I>(self, durations: I) -> Self
    where
        I: IntoIterator<Item = Time>,
    {
        durations.into_iter().fold(self, Job::with_task)
    }

    /// Total processing time of the chain.
    pub fn total_work(&self) -> Time {
        self.tasks.iter().map(|t| t.duration).sum()
    }

    /// Number of tasks.
    pub fn task_count(&self) -> usize {
        self.tasks.len()
    }

    /// Whether the job has any tasks.
    pub fn has_tasks(&self) -> bool {
        !self.tasks.is_empty()
    }

    /// Task by 1-based index.
    pub fn task(&self, task_index: u32) -> Option<&Task> {
        let pos = (task_index as usize).checked_sub(1)?;
        self.tasks.get(pos)
    }
}
