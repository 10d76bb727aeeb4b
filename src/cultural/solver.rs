//! Cultural algorithm driver.
//!
//! # Algorithm
//!
//! 1. Draw `population_size` random individuals and fold them into the
//!    belief space.
//! 2. For each of `generation_count` generations:
//!    - nudge every individual whose fitness exceeds the situational best
//!      by more than `tolerance` (relative);
//!    - fold the nudged population back into the belief space;
//!    - record `(generation, best)` and report progress.
//!
//! Every individual draws from its own RNG seeded from
//! `(seed, generation, index)`, so results do not depend on whether the
//! population is processed sequentially or on the rayon pool.
//!
//! # Reference
//! Reynolds (1994), "An Introduction to Cultural Algorithms";
//! Steele (2014), "Fast Splittable Pseudorandom Number Generators" (SplitMix64)

use log::{debug, info};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use rayon::prelude::*;
use std::time::Instant;

use super::belief::BeliefSpace;
use super::config::CulturalConfig;
use super::individual::{Individual, NudgeOutcome, TaskLayout};
use super::stats::CulturalStatistics;
use crate::error::{Result, SolveError};
use crate::models::{ProblemModel, Time};
use crate::outcome::{SolveOutcome, SolveStatus};
use crate::progress::{no_progress, BestMetric, ProgressInfo, TraceSample};
use crate::scheduler::ScheduleMetrics;
use crate::validation::validate_timeline;

/// Population-based heuristic makespan solver.
///
/// # Example
///
/// ```
/// use u_makespan::cultural::{CulturalConfig, CulturalSolver};
/// use u_makespan::models::{Job, ProblemModel};
///
/// let problem = ProblemModel::build(2, vec![
///     Job::new(1).with_tasks([4, 2]),
///     Job::new(2).with_tasks([3, 3]),
/// ]).unwrap();
///
/// let config = CulturalConfig::default()
///     .with_population_size(50)
///     .with_generation_count(10)
///     .with_seed(7);
/// let outcome = CulturalSolver::new().with_config(config).solve(&problem).unwrap();
/// assert!(outcome.makespan() >= 6);
/// assert_eq!(outcome.statistics.seed, 7);
/// ```
#[derive(Debug, Clone, Default)]
pub struct CulturalSolver {
    config: CulturalConfig,
}

impl CulturalSolver {
    /// Creates a solver with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the configuration.
    pub fn with_config(mut self, config: CulturalConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &CulturalConfig {
        &self.config
    }

    /// Solves without progress reporting.
    pub fn solve(&self, problem: &ProblemModel) -> Result<SolveOutcome<CulturalStatistics>> {
        self.solve_with_progress(problem, no_progress)
    }

    /// Solves, calling `progress(generation, info)` after every generation.
    ///
    /// # Errors
    /// - [`SolveError::InvalidConfig`] for a bad configuration.
    /// - [`SolveError::InvariantViolation`] if the best timeline fails the
    ///   feasibility audit.
    pub fn solve_with_progress<F>(
        &self,
        problem: &ProblemModel,
        mut progress: F,
    ) -> Result<SolveOutcome<CulturalStatistics>>
    where
        F: FnMut(u64, ProgressInfo),
    {
        self.config.validate()?;
        let start = Instant::now();
        let config = &self.config;
        let seed = config.seed.unwrap_or_else(rand::random::<u64>);
        info!(
            "cultural search: {} jobs, {} tasks, {} machines, population {}, {} generations, seed {}",
            problem.jobs().len(),
            problem.task_count(),
            problem.machine_count(),
            config.population_size,
            config.generation_count,
            seed
        );

        let layout = TaskLayout::new(problem);
        let mut stats = CulturalStatistics {
            seed,
            population_size: config.population_size,
            ..CulturalStatistics::default()
        };

        let mut population = self.initial_population(problem, &layout, seed)?;
        let mut belief = BeliefSpace::new(problem.jobs().len(), problem.machine_count());
        belief.update(&population, &layout, config.elite_fraction);
        stats.initial_best = best_of(&belief)?;

        let mut trace = Vec::with_capacity(config.generation_count);
        for generation in 1..=config.generation_count as u64 {
            let best = best_of(&belief)?;
            let outcomes = self.nudge_population(
                problem,
                &layout,
                &belief,
                &mut population,
                seed,
                generation,
                best,
            )?;
            for outcome in outcomes.into_iter().flatten() {
                match outcome {
                    NudgeOutcome::Applied => stats.on_nudge_applied(),
                    NudgeOutcome::Rejected => stats.on_nudge_rejected(),
                }
            }

            belief.update(&population, &layout, config.elite_fraction);
            stats.on_generation();
            let best = best_of(&belief)?;
            trace.push(TraceSample::new(generation, best));
            progress(generation, ProgressInfo::new(BestMetric::Makespan(best)));
            debug!(
                "generation {generation}: best {best}, elite average {:.2}",
                belief.normative().average_fitness
            );
        }

        let situational = belief.situational().ok_or_else(|| {
            SolveError::InvariantViolation("belief space holds no individual".to_string())
        })?;
        let timeline = situational.timeline.clone();
        validate_timeline(problem, &timeline).map_err(|errors| {
            SolveError::InvariantViolation(format!(
                "cultural search returned an infeasible timeline: {}",
                errors
                    .iter()
                    .map(|e| e.message.as_str())
                    .collect::<Vec<_>>()
                    .join("; ")
            ))
        })?;

        let elapsed = start.elapsed();
        stats.final_best = situational.fitness;
        stats.set_total_time(elapsed);
        let metrics = ScheduleMetrics::calculate(&timeline, elapsed);
        info!(
            "cultural search finished: makespan {} (initial {}), {}/{} nudges applied in {:.2?}",
            metrics.makespan,
            stats.initial_best,
            stats.nudges_applied,
            stats.nudges_attempted,
            elapsed
        );

        Ok(SolveOutcome {
            timeline,
            metrics,
            trace,
            status: SolveStatus::Heuristic,
            statistics: stats,
        })
    }

    fn initial_population(
        &self,
        problem: &ProblemModel,
        layout: &TaskLayout,
        seed: u64,
    ) -> Result<Vec<Individual>> {
        let draw = |index: usize| {
            let mut rng = SmallRng::seed_from_u64(derive_seed(seed, 0, index as u64));
            Individual::random(problem, layout, &mut rng)
        };
        let size = self.config.population_size;
        if self.config.parallel {
            (0..size).into_par_iter().map(draw).collect()
        } else {
            (0..size).map(draw).collect()
        }
    }

    /// Nudges every individual above the tolerance band.
    ///
    /// Returns one entry per individual; `None` when it was left alone.
    #[allow(clippy::too_many_arguments)]
    fn nudge_population(
        &self,
        problem: &ProblemModel,
        layout: &TaskLayout,
        belief: &BeliefSpace,
        population: &mut [Individual],
        seed: u64,
        generation: u64,
        best: Time,
    ) -> Result<Vec<Option<NudgeOutcome>>> {
        let threshold = best as f64 * (1.0 + self.config.tolerance);
        let nudge = |(index, individual): (usize, &mut Individual)| {
            if individual.fitness() as f64 <= threshold {
                return Ok(None);
            }
            let mut rng = SmallRng::seed_from_u64(derive_seed(seed, generation, index as u64));
            individual
                .nudge(problem, layout, belief, &mut rng)
                .map(Some)
        };
        if self.config.parallel {
            population.par_iter_mut().enumerate().map(nudge).collect()
        } else {
            population.iter_mut().enumerate().map(nudge).collect()
        }
    }
}

fn best_of(belief: &BeliefSpace) -> Result<Time> {
    belief.best_fitness().ok_or_else(|| {
        SolveError::InvariantViolation("belief space holds no individual".to_string())
    })
}

#[inline]
fn splitmix64(mut z: u64) -> u64 {
    z = z.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Per-individual seed for a generation.
fn derive_seed(seed: u64, generation: u64, index: u64) -> u64 {
    splitmix64(seed ^ splitmix64(generation ^ splitmix64(index)))
}
