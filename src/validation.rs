//! Input validation and timeline feasibility audits.
//!
//! Checks structural integrity of a problem before solving. Detects:
//! - Missing machines
//! - Empty jobs
//! - Task indices that are not contiguous from 1
//! - Zero durations
//! - Duplicate job IDs
//! - Tasks filed under the wrong job
//!
//! Also audits solver output: a returned timeline must cover every task
//! exactly once, never overlap on a machine, and respect each job's order.
//!
//! # Reference
//! Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems", Ch. 2

use crate::models::{Job, MachineId, ProblemModel, Time, Timeline};
use std::collections::HashSet;

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Machine count is zero.
    NoMachines,
    /// A job has no tasks.
    EmptyJob,
    /// Task indices of a job are not `1, 2, ..., n`.
    NonContiguousTasks,
    /// A task has zero processing time.
    ZeroDuration,
    /// Two jobs share the same ID.
    DuplicateJobId,
    /// Total processing time does not fit in [`Time`].
    WorkOverflow,
    /// A task's `job_id` differs from the job holding it.
    ForeignTask,
    /// Timeline machine count differs from the problem's.
    MachineCountMismatch,
    /// A task of the problem is missing from the timeline.
    MissingTask,
    /// The timeline holds a task the problem does not know.
    UnknownTask,
    /// A scheduled entry's length differs from its task's duration.
    DurationMismatch,
    /// Two entries on one machine overlap.
    MachineOverlap,
    /// A task starts before the previous task of its job ends.
    PrecedenceViolation,
}

impl ValidationError {
    pub fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates the input data for a problem.
///
/// Checks:
/// 1. At least one machine
/// 2. No duplicate job IDs
/// 3. Every job has at least one task
/// 4. Every task carries its job's ID
/// 5. Task indices are contiguous from 1
/// 6. Every duration is positive
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_problem(machine_count: usize, jobs: &[Job]) -> ValidationResult {
    let mut errors = Vec::new();

    if machine_count == 0 {
        errors.push(ValidationError::new(
            ValidationErrorKind::NoMachines,
            "machine count must be at least 1",
        ));
    }

    let mut job_ids = HashSet::new();
    for job in jobs {
        if !job_ids.insert(job.job_id) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateJobId,
                format!("duplicate job ID: {}", job.job_id),
            ));
        }

        if job.tasks.is_empty() {
            errors.push(ValidationError::new(
                ValidationErrorKind::EmptyJob,
                format!("job {} has no tasks", job.job_id),
            ));
        }

        for (pos, task) in job.tasks.iter().enumerate() {
            if task.job_id != job.job_id {
                errors.push(ValidationError::new(
                    ValidationErrorKind::ForeignTask,
                    format!(
                        "task {} of job {} is labelled with job {}",
                        task.task_index, job.job_id, task.job_id
                    ),
                ));
            }
            if task.task_index as usize != pos + 1 {
                errors.push(ValidationError::new(
                    ValidationErrorKind::NonContiguousTasks,
                    format!(
                        "job {}: task at position {} has index {} (expected {})",
                        job.job_id,
                        pos + 1,
                        task.task_index,
                        pos + 1
                    ),
                ));
            }
            if task.duration == 0 {
                errors.push(ValidationError::new(
                    ValidationErrorKind::ZeroDuration,
                    format!("job {} task {} has zero duration", job.job_id, task.task_index),
                ));
            }
        }
    }

    let total_work = jobs
        .iter()
        .flat_map(|job| &job.tasks)
        .try_fold(0, |sum: Time, task| sum.checked_add(task.duration));
    if total_work.is_none() {
        errors.push(ValidationError::new(
            ValidationErrorKind::WorkOverflow,
            "total processing time overflows the time type",
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Audits a complete timeline against its problem.
///
/// Checks:
/// 1. Same machine count
/// 2. Every task present exactly once, nothing extra
/// 3. Entry lengths equal task durations
/// 4. No overlap on any machine
/// 5. Job order respected
pub fn validate_timeline(problem: &ProblemModel, timeline: &Timeline) -> ValidationResult {
    let mut errors = Vec::new();

    if timeline.machine_count() != problem.machine_count() {
        errors.push(ValidationError::new(
            ValidationErrorKind::MachineCountMismatch,
            format!(
                "timeline has {} machines, problem has {}",
                timeline.machine_count(),
                problem.machine_count()
            ),
        ));
    }

    for task in problem.tasks() {
        match timeline.entry_for(task.job_id, task.task_index) {
            None => errors.push(ValidationError::new(
                ValidationErrorKind::MissingTask,
                format!("job {} task {} is not scheduled", task.job_id, task.task_index),
            )),
            Some(entry) if entry.duration() != task.duration => {
                errors.push(ValidationError::new(
                    ValidationErrorKind::DurationMismatch,
                    format!(
                        "job {} task {} runs {} instead of {}",
                        task.job_id,
                        task.task_index,
                        entry.duration(),
                        task.duration
                    ),
                ))
            }
            Some(_) => {}
        }
    }

    for entry in timeline.iter() {
        if problem.task(entry.job_id, entry.task_index).is_none() {
            errors.push(ValidationError::new(
                ValidationErrorKind::UnknownTask,
                format!(
                    "job {} task {} is not part of the problem",
                    entry.job_id, entry.task_index
                ),
            ));
        }
    }

    errors.extend(overlap_errors(timeline));
    if let Err(order) = validate_job_order(timeline) {
        errors.extend(order);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Checks that, for every job present, each task starts no earlier than
/// the previous task of the job ends.
///
/// Works on partial timelines too.
pub fn validate_job_order(timeline: &Timeline) -> ValidationResult {
    let mut errors = Vec::new();

    for entry in timeline.iter() {
        let Some(pred_index) = entry.task_index.checked_sub(1).filter(|&i| i > 0) else {
            continue;
        };
        if let Some(pred) = timeline.entry_for(entry.job_id, pred_index) {
            if pred.end_time > entry.start_time {
                errors.push(ValidationError::new(
                    ValidationErrorKind::PrecedenceViolation,
                    format!(
                        "job {} task {} starts at {} before task {} ends at {}",
                        entry.job_id,
                        entry.task_index,
                        entry.start_time,
                        pred_index,
                        pred.end_time
                    ),
                ));
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn overlap_errors(timeline: &Timeline) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    for machine in MachineId::all(timeline.machine_count()) {
        for pair in timeline.entries(machine).windows(2) {
            if pair[0].end_time > pair[1].start_time {
                errors.push(ValidationError::new(
                    ValidationErrorKind::MachineOverlap,
                    format!(
                        "{machine}: job {} task {} overlaps job {} task {}",
                        pair[0].job_id, pair[0].task_index, pair[1].job_id, pair[1].task_index
                    ),
                ));
            }
        }
    }
    errors
}
