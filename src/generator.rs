//! Random instance generation.
//!
//! Produces valid [`ProblemModel`]s for tests, benchmarks and comparisons.
//! Three size presets cover the usual experiment scales; custom ranges can
//! be set through the `with_*` builders. Generation is reproducible for a
//! fixed seed.
//!
//! | Preset | Machines | Jobs | Tasks per job |
//! |--------|----------|------|---------------|
//! | small  | 2..=5    | 3..=5   | 2..=5  |
//! | medium | 5..=12   | 8..=20  | 2..=8  |
//! | large  | 10..=20  | 20..=50 | 2..=10 |
//!
//! Task durations default to 5..=60 in every preset.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

use crate::error::{Result, SolveError};
use crate::models::{Job, JobId, ProblemModel, Time};

/// Instance scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InstanceSize {
    Small,
    Medium,
    Large,
}

/// Seeded random instance generator.
///
/// # Example
///
/// ```
/// use u_makespan::generator::{InstanceGenerator, InstanceSize};
///
/// let problem = InstanceGenerator::preset(InstanceSize::Small)
///     .with_seed(7)
///     .generate()
///     .unwrap();
/// assert!((2..=5).contains(&problem.machine_count()));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstanceGenerator {
    pub machines: RangeInclusive<usize>,
    pub jobs: RangeInclusive<usize>,
    pub tasks_per_job: RangeInclusive<usize>,
    pub durations: RangeInclusive<Time>,
    pub seed: u64,
}

impl InstanceGenerator {
    /// Generator for a size preset, seed 0.
    pub fn preset(size: InstanceSize) -> Self {
        let (machines, jobs, tasks_per_job) = match size {
            InstanceSize::Small => (2..=5, 3..=5, 2..=5),
            InstanceSize::Medium => (5..=12, 8..=20, 2..=8),
            InstanceSize::Large => (10..=20, 20..=50, 2..=10),
        };
        Self {
            machines,
            jobs,
            tasks_per_job,
            durations: 5..=60,
            seed: 0,
        }
    }

    pub fn small() -> Self {
        Self::preset(InstanceSize::Small)
    }

    pub fn medium() -> Self {
        Self::preset(InstanceSize::Medium)
    }

    pub fn large() -> Self {
        Self::preset(InstanceSize::Large)
    }

    pub fn with_machines(mut self, range: RangeInclusive<usize>) -> Self {
        self.machines = range;
        self
    }

    pub fn with_jobs(mut self, range: RangeInclusive<usize>) -> Self {
        self.jobs = range;
        self
    }

    pub fn with_tasks_per_job(mut self, range: RangeInclusive<usize>) -> Self {
        self.tasks_per_job = range;
        self
    }

    pub fn with_durations(mut self, range: RangeInclusive<Time>) -> Self {
        self.durations = range;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Draws one instance. Job IDs run from 1.
    ///
    /// # Errors
    /// [`SolveError::InvalidConfig`] for an empty range, zero machines, zero
    /// tasks per job, or zero durations.
    pub fn generate(&self) -> Result<ProblemModel> {
        self.validate()?;
        let mut rng = SmallRng::seed_from_u64(self.seed);

        let machine_count = rng.random_range(self.machines.clone());
        let job_count = rng.random_range(self.jobs.clone());
        let jobs = (1..=job_count as JobId)
            .map(|job_id| {
                let tasks = rng.random_range(self.tasks_per_job.clone());
                let durations: Vec<Time> = (0..tasks)
                    .map(|_| rng.random_range(self.durations.clone()))
                    .collect();
                Job::new(job_id).with_tasks(durations)
            })
            .collect();

        ProblemModel::build(machine_count, jobs)
    }

    fn validate(&self) -> Result<()> {
        let bad = |what: &str| Err(SolveError::InvalidConfig(what.to_string()));
        if self.machines.is_empty() || *self.machines.start() == 0 {
            return bad("machine range must be non-empty and start at 1 or more");
        }
        if self.jobs.is_empty() {
            return bad("job range must be non-empty");
        }
        if self.tasks_per_job.is_empty() || *self.tasks_per_job.start() == 0 {
            return bad("tasks-per-job range must be non-empty and start at 1 or more");
        }
        if self.durations.is_empty() || *self.durations.start() == 0 {
            return bad("duration range must be non-empty and start at 1 or more");
        }
        Ok(())
    }
}

impl Default for InstanceGenerator {
    fn default() -> Self {
        Self::small()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_respect_ranges() {
        for size in [InstanceSize::Small, InstanceSize::Medium, InstanceSize::Large] {
            let generator = InstanceGenerator::preset(size);
            for seed in 0..10 {
                let problem = generator.clone().with_seed(seed).generate().unwrap();
                assert!(generator.machines.contains(&problem.machine_count()));
                assert!(generator.jobs.contains(&problem.jobs().len()));
                for job in problem.jobs() {
                    assert!(generator.tasks_per_job.contains(&job.task_count()));
                    assert!(job.tasks.iter().all(|t| (5..=60).contains(&t.duration)));
                }
            }
        }
    }

    #[test]
    fn test_same_seed_same_instance() {
        let a = InstanceGenerator::medium().with_seed(3).generate().unwrap();
        let b = InstanceGenerator::medium().with_seed(3).generate().unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_custom_ranges() {
        let problem = InstanceGenerator::small()
            .with_machines(3..=3)
            .with_jobs(4..=4)
            .with_tasks_per_job(1..=1)
            .with_durations(2..=2)
            .generate()
            .unwrap();

        assert_eq!(problem.machine_count(), 3);
        assert_eq!(problem.task_count(), 4);
        assert_eq!(problem.total_work(), 8);
        let ids: Vec<JobId> = problem.jobs().iter().map(|j| j.job_id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_invalid_ranges() {
        #[allow(clippy::reversed_empty_ranges)]
        let cases = [
            InstanceGenerator::small().with_machines(0..=2),
            InstanceGenerator::small().with_jobs(5..=3),
            InstanceGenerator::small().with_tasks_per_job(0..=0),
            InstanceGenerator::small().with_durations(0..=4),
        ];
        for generator in cases {
            assert!(matches!(
                generator.generate(),
                Err(SolveError::InvalidConfig(_))
            ));
        }
    }
}
