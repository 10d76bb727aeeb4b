//! Error taxonomy shared by the model, the timeline and both solvers.
//!
//! | Variant | Raised by | Recovery |
//! |---------|-----------|----------|
//! | `InvalidProblem` | `ProblemModel::build` | none, fix the input |
//! | `InvalidConfig` | solver entry points | none, fix the configuration |
//! | `Infeasible` | `Timeline::commit` | caller tries another candidate |
//! | `NoFeasibleSchedule` | constructive passes | defect, should be unreachable |
//! | `InvariantViolation` | internal consistency checks | aborts the solver call |

use thiserror::Error;

use crate::models::MachineId;
use crate::validation::ValidationError;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, SolveError>;

/// Errors produced while building problems or solving them.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolveError {
    /// The problem description is malformed; every detected issue is listed.
    #[error("invalid problem: {}", summarize(.0))]
    InvalidProblem(Vec<ValidationError>),

    /// A solver configuration value is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Committing the task at the given slot would break a timeline invariant.
    #[error("cannot commit job {job_id} task {task_index} on {machine} at {start_time}: {reason}")]
    Infeasible {
        job_id: u32,
        task_index: u32,
        machine: MachineId,
        start_time: u64,
        reason: &'static str,
    },

    /// A constructive pass ended with tasks it could not place.
    #[error("no feasible schedule could be constructed ({unplaced} task(s) unplaced)")]
    NoFeasibleSchedule { unplaced: usize },

    /// Internal state is inconsistent; the current solver call is aborted.
    #[error("internal invariant violated: {0}")]
    InvariantViolation(String),
}

fn summarize(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::ValidationErrorKind;

    #[test]
    fn test_invalid_problem_message_joins_issues() {
        let err = SolveError::InvalidProblem(vec![
            ValidationError::new(ValidationErrorKind::NoMachines, "machine count must be at least 1"),
            ValidationError::new(ValidationErrorKind::EmptyJob, "job 3 has no tasks"),
        ]);
        assert_eq!(
            err.to_string(),
            "invalid problem: machine count must be at least 1; job 3 has no tasks"
        );
    }

    #[test]
    fn test_infeasible_message_uses_one_based_machine() {
        let err = SolveError::Infeasible {
            job_id: 2,
            task_index: 1,
            machine: MachineId::new(0),
            start_time: 5,
            reason: "overlaps an entry on the machine",
        };
        assert_eq!(
            err.to_string(),
            "cannot commit job 2 task 1 on M1 at 5: overlaps an entry on the machine"
        );
    }
}
