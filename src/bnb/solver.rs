//! Depth-first branch-and-bound over (job, machine) decisions.
//!
//! # Algorithm
//!
//! A node is a partial timeline. Its children place the next task of one
//! unfinished job on one machine at the earliest feasible start. Jobs are
//! branched on longest-total-work first (ties by job ID), machines by
//! ascending end time (ties by machine ID). Branching over every ready job
//! and every machine keeps the search complete: any optimal schedule,
//! replayed in start-time order, is reachable.
//!
//! Pruning:
//! - a candidate whose job cannot finish before the incumbent makespan;
//! - a node whose lower bound (see [`super::bounds`]) reaches the incumbent;
//! - empty machines beyond the first (they are interchangeable).
//!
//! The search stops early once the incumbent meets the root lower bound.
//!
//! # Reference
//! Brucker (2007), "Scheduling Algorithms", Ch. 5;
//! Land & Doig (1960), "An Automatic Method of Solving Discrete Programming Problems"

use log::{debug, info, trace};
use std::time::Instant;

use super::bounds;
use super::config::BnbConfig;
use super::incumbent::Incumbent;
use super::stack::{Decision, SearchStack};
use super::state::SearchState;
use super::stats::BnbStatistics;
use super::time_limit::TimeLimit;
use crate::dispatching::RuleEngine;
use crate::error::{Result, SolveError};
use crate::models::{Job, MachineId, ProblemModel, Time, Timeline};
use crate::outcome::{SolveOutcome, SolveStatus};
use crate::progress::{no_progress, BestMetric, ProgressInfo, TraceSample};
use crate::scheduler::{GreedyScheduler, ScheduleMetrics};
use crate::validation::validate_timeline;

/// Exact makespan solver.
///
/// # Example
///
/// ```
/// use u_makespan::bnb::BranchAndBound;
/// use u_makespan::models::{Job, ProblemModel};
///
/// let problem = ProblemModel::build(2, vec![
///     Job::new(1).with_tasks([4, 2]),
///     Job::new(2).with_tasks([3, 3]),
/// ]).unwrap();
///
/// let outcome = BranchAndBound::new().solve(&problem).unwrap();
/// assert!(outcome.status.is_optimal());
/// assert_eq!(outcome.makespan(), 6);
/// ```
#[derive(Debug, Clone, Default)]
pub struct BranchAndBound {
    config: BnbConfig,
}

impl BranchAndBound {
    /// Creates a solver with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the configuration.
    pub fn with_config(mut self, config: BnbConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &BnbConfig {
        &self.config
    }

    /// Solves without progress reporting.
    pub fn solve(&self, problem: &ProblemModel) -> Result<SolveOutcome<BnbStatistics>> {
        self.solve_with_progress(problem, no_progress)
    }

    /// Solves, calling `progress(nodes_explored, info)` every
    /// `progress_interval` nodes.
    ///
    /// # Errors
    /// - [`SolveError::InvalidConfig`] for a bad configuration.
    /// - [`SolveError::InvariantViolation`] if the search state becomes
    ///   inconsistent or the returned timeline fails the feasibility audit.
    pub fn solve_with_progress<F>(
        &self,
        problem: &ProblemModel,
        progress: F,
    ) -> Result<SolveOutcome<BnbStatistics>>
    where
        F: FnMut(u64, ProgressInfo),
    {
        self.config.validate()?;
        let start = Instant::now();
        info!(
            "branch-and-bound: {} jobs, {} tasks, {} machines, time limit {:?}",
            problem.jobs().len(),
            problem.task_count(),
            problem.machine_count(),
            self.config.time_limit
        );

        let session = SearchSession::new(problem, &self.config, start, progress);
        let SearchResult {
            status,
            timeline,
            mut statistics,
            mut trace,
        } = session.run()?;

        let timeline = match timeline {
            Some(timeline) => timeline,
            None if status == SolveStatus::TimeLimitReached => {
                debug!("time limit hit before any incumbent; returning the greedy schedule");
                let fallback = GreedyScheduler::new().schedule(problem)?;
                trace.push(TraceSample::new(statistics.nodes_explored, fallback.makespan()));
                fallback
            }
            None => {
                return Err(SolveError::NoFeasibleSchedule {
                    unplaced: problem.task_count(),
                })
            }
        };

        validate_timeline(problem, &timeline).map_err(|errors| {
            SolveError::InvariantViolation(format!(
                "branch-and-bound returned an infeasible timeline: {}",
                errors
                    .iter()
                    .map(|e| e.message.as_str())
                    .collect::<Vec<_>>()
                    .join("; ")
            ))
        })?;

        let elapsed = start.elapsed();
        statistics.set_total_time(elapsed);
        let metrics = ScheduleMetrics::calculate(&timeline, elapsed);
        info!(
            "branch-and-bound finished: {status}, makespan {}, {} nodes in {:.2?}",
            metrics.makespan, statistics.nodes_explored, elapsed
        );

        Ok(SolveOutcome {
            timeline,
            metrics,
            trace,
            status,
            statistics,
        })
    }
}

struct SearchResult {
    status: SolveStatus,
    timeline: Option<Timeline>,
    statistics: BnbStatistics,
    trace: Vec<TraceSample>,
}

/// One solver invocation. Owns all mutable search state.
struct SearchSession<'a, F> {
    problem: &'a ProblemModel,
    config: &'a BnbConfig,
    state: SearchState<'a>,
    stack: SearchStack,
    incumbent: Incumbent,
    stats: BnbStatistics,
    time_limit: TimeLimit,
    /// Job positions in branching order.
    order: Vec<usize>,
    work_bound: Time,
    root_lower_bound: Time,
    trace: Vec<TraceSample>,
    progress: F,
}

impl<'a, F> SearchSession<'a, F>
where
    F: FnMut(u64, ProgressInfo),
{
    fn new(problem: &'a ProblemModel, config: &'a BnbConfig, start: Instant, progress: F) -> Self {
        Self {
            problem,
            config,
            state: SearchState::new(problem),
            stack: SearchStack::preallocated(problem.task_count(), problem.machine_count()),
            incumbent: Incumbent::new(),
            stats: BnbStatistics::default(),
            time_limit: TimeLimit::new(config.time_limit, config.deadline_check_interval, start),
            order: job_order(problem),
            work_bound: bounds::work_bound(problem),
            root_lower_bound: bounds::root_lower_bound(problem),
            trace: Vec::new(),
            progress,
        }
    }

    fn run(mut self) -> Result<SearchResult> {
        self.stats.set_root_lower_bound(self.root_lower_bound);
        debug!("root lower bound {}", self.root_lower_bound);

        if self.config.greedy_seed {
            let seed = GreedyScheduler::new().schedule(self.problem)?;
            if self.incumbent.try_install(&seed) {
                self.on_new_incumbent(seed.makespan());
            }
        }

        let status = self.search()?;

        Ok(SearchResult {
            status,
            timeline: self.incumbent.into_timeline(),
            statistics: self.stats,
            trace: self.trace,
        })
    }

    fn search(&mut self) -> Result<SolveStatus> {
        if self.state.is_complete() {
            self.handle_complete_solution();
            return Ok(SolveStatus::Optimal);
        }

        self.stack.push_frame();
        if self.expand() {
            return Ok(SolveStatus::Optimal);
        }

        loop {
            if self.incumbent.upper_bound() <= self.root_lower_bound {
                debug!(
                    "incumbent {} meets the root lower bound",
                    self.incumbent.upper_bound()
                );
                return Ok(SolveStatus::Optimal);
            }

            if self.time_limit.exceeded() {
                info!(
                    "time limit reached after {} nodes",
                    self.stats.nodes_explored
                );
                return Ok(SolveStatus::TimeLimitReached);
            }

            if self.stack.is_current_level_empty() {
                if self.stack.depth() <= 1 {
                    return Ok(SolveStatus::Optimal);
                }
                self.backtrack_step()?;
            } else {
                self.process_next_decision()?;
            }
        }
    }

    fn backtrack_step(&mut self) -> Result<()> {
        self.stats.on_backtrack();
        self.state.undo()?;
        self.stack.pop_frame();
        Ok(())
    }

    fn process_next_decision(&mut self) -> Result<()> {
        let Some(decision) = self.stack.pop() else {
            return Ok(());
        };

        // The incumbent may have improved since this decision was generated.
        if decision.estimate >= self.incumbent.upper_bound() {
            self.stats.on_pruning_bound();
            return Ok(());
        }

        self.descend(decision)
    }

    fn descend(&mut self, decision: Decision) -> Result<()> {
        match self.state.apply(&decision) {
            Ok(()) => {}
            Err(SolveError::Infeasible { reason, .. }) => {
                trace!("commit rejected: {reason}");
                self.stats.on_pruning_infeasible();
                return Ok(());
            }
            Err(e) => return Err(e),
        }
        self.stack.push_frame();

        self.stats.on_node_explored();
        self.stats.on_depth_update(self.state.depth() as u64);
        if self.stats.nodes_explored % self.config.progress_interval == 0 {
            self.report_progress();
        }

        if self.state.is_complete() {
            self.handle_complete_solution();
            return Ok(());
        }

        if self.expand() {
            self.backtrack_step()?;
        }
        Ok(())
    }

    fn handle_complete_solution(&mut self) {
        let makespan = self.state.timeline().makespan();
        if self.incumbent.try_install(self.state.timeline()) {
            self.on_new_incumbent(makespan);
        } else {
            self.stats.on_pruning_bound();
        }
    }

    /// Bounds the current node and pushes its children.
    ///
    /// Returns `true` if the node is pruned.
    fn expand(&mut self) -> bool {
        let best = self.incumbent.upper_bound();
        let lower = bounds::node_lower_bound(&self.state, self.order.len(), self.work_bound);
        if lower >= best {
            trace!(
                "prune at depth {}: lower bound {lower} >= incumbent {best}",
                self.state.depth()
            );
            self.stats.on_pruning_bound();
            return true;
        }

        let (machines, symmetric) = self.machine_order();
        let timeline = self.state.timeline();
        let mut decisions = Vec::new();

        for &job in &self.order {
            let Some(task) = self.state.next_task(job) else {
                continue;
            };
            let ready = self.state.ready_time(job);
            let tail = self.state.remaining_after_next(job);

            for &machine in &machines {
                let start = timeline.earliest_start(machine, ready, task.duration);
                let estimate = start + task.duration + tail;
                if estimate >= best {
                    self.stats.on_pruning_bound();
                    continue;
                }
                decisions.push(Decision {
                    job,
                    machine,
                    start,
                    estimate,
                });
            }
            for _ in 0..symmetric {
                self.stats.on_pruning_symmetry();
            }
        }

        for _ in &decisions {
            self.stats.on_decision_generated();
        }
        // Last pushed is explored first.
        self.stack.extend(decisions.into_iter().rev());
        false
    }

    /// Machines to branch on, by ascending end time then ID, plus the
    /// number of empty machines skipped as symmetric.
    fn machine_order(&self) -> (Vec<MachineId>, usize) {
        let timeline = self.state.timeline();
        let mut machines: Vec<MachineId> = MachineId::all(self.problem.machine_count()).collect();
        let mut skipped = 0;

        if self.config.symmetry_breaking {
            let mut seen_empty = false;
            machines.retain(|&m| {
                if !timeline.entries(m).is_empty() {
                    return true;
                }
                if seen_empty {
                    skipped += 1;
                    return false;
                }
                seen_empty = true;
                true
            });
        }

        machines.sort_by_key(|&m| (timeline.machine_end(m), m));
        (machines, skipped)
    }

    fn on_new_incumbent(&mut self, makespan: Time) {
        self.stats.on_solution_found();
        self.trace
            .push(TraceSample::new(self.stats.nodes_explored, makespan));
        debug!(
            "new incumbent: makespan {makespan} after {} nodes",
            self.stats.nodes_explored
        );
    }

    fn report_progress(&mut self) {
        let nodes = self.stats.nodes_explored;
        let best = self.incumbent.makespan();
        if let Some(best) = best {
            self.trace.push(TraceSample::new(nodes, best));
        }
        (self.progress)(nodes, ProgressInfo::new(BestMetric::from(best)));
    }
}

/// Job positions, longest total work first, ties by job ID.
fn job_order(problem: &ProblemModel) -> Vec<usize> {
    let jobs: Vec<&Job> = problem.jobs().iter().collect();
    RuleEngine::longest_first().sort_indices(&jobs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::{Rng, SeedableRng};
    use std::time::Duration;

    fn build(machines: usize, jobs: Vec<Job>) -> ProblemModel {
        ProblemModel::build(machines, jobs).unwrap()
    }

    /// Exhaustive search over every interleaving and machine choice,
    /// appending each task at `max(machine end, job ready)`.
    fn brute_force(problem: &ProblemModel) -> Time {
        fn go(
            jobs: &[Vec<Time>],
            next: &mut [usize],
            job_ready: &mut [Time],
            machine_end: &mut [Time],
            best: &mut Time,
        ) {
            let mut any = false;
            for j in 0..jobs.len() {
                if next[j] == jobs[j].len() {
                    continue;
                }
                any = true;
                let d = jobs[j][next[j]];
                for m in 0..machine_end.len() {
                    let (old_end, old_ready) = (machine_end[m], job_ready[j]);
                    let end = old_end.max(old_ready) + d;
                    machine_end[m] = end;
                    job_ready[j] = end;
                    next[j] += 1;
                    go(jobs, next, job_ready, machine_end, best);
                    next[j] -= 1;
                    job_ready[j] = old_ready;
                    machine_end[m] = old_end;
                }
            }
            if !any {
                let makespan = machine_end.iter().copied().max().unwrap_or(0);
                *best = (*best).min(makespan);
            }
        }

        let jobs: Vec<Vec<Time>> = problem
            .jobs()
            .iter()
            .map(|j| j.tasks.iter().map(|t| t.duration).collect())
            .collect();
        let mut best = Time::MAX;
        go(
            &jobs,
            &mut vec![0; jobs.len()],
            &mut vec![0; jobs.len()],
            &mut vec![0; problem.machine_count()],
            &mut best,
        );
        best
    }

    fn random_problem(rng: &mut SmallRng, machines: usize, jobs: u32, max_tasks: usize) -> ProblemModel {
        let jobs = (1..=jobs)
            .map(|id| {
                let count = rng.random_range(1..=max_tasks);
                Job::new(id).with_tasks((0..count).map(|_| rng.random_range(1..=9)))
            })
            .collect();
        build(machines, jobs)
    }

    #[test]
    fn test_single_chain_any_machine_count() {
        for machines in 1..=4 {
            let problem = build(machines, vec![Job::new(1).with_tasks([5, 3, 8])]);
            let outcome = BranchAndBound::new().solve(&problem).unwrap();
            assert_eq!(outcome.makespan(), 16);
            assert_eq!(outcome.status, SolveStatus::Optimal);
        }
    }

    #[test]
    fn test_two_parallel_tasks() {
        let problem = build(2, vec![Job::new(1).with_task(10), Job::new(2).with_task(10)]);
        let outcome = BranchAndBound::new().solve(&problem).unwrap();
        assert_eq!(outcome.makespan(), 10);
        assert!((outcome.metrics.machine_utilization - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_improves_on_greedy_seed() {
        let problem = build(
            2,
            (1..=5)
                .zip([3, 3, 2, 2, 2])
                .map(|(id, d)| Job::new(id).with_task(d))
                .collect(),
        );
        let outcome = BranchAndBound::new().solve(&problem).unwrap();

        assert_eq!(outcome.makespan(), 6);
        assert_eq!(outcome.status, SolveStatus::Optimal);
        assert_eq!(outcome.trace.first(), Some(&TraceSample::new(0, 7)));
        assert_eq!(outcome.trace.last().map(|s| s.best), Some(6));
        assert_eq!(outcome.statistics.solutions_found, 2);
    }

    #[test]
    fn test_matches_brute_force() {
        let mut rng = SmallRng::seed_from_u64(42);
        for _ in 0..8 {
            let problem = random_problem(&mut rng, 2, 3, 3);
            let expected = brute_force(&problem);
            let outcome = BranchAndBound::new().solve(&problem).unwrap();
            assert_eq!(outcome.makespan(), expected);
            assert!(validate_timeline(&problem, &outcome.timeline).is_ok());
        }
        for _ in 0..4 {
            let problem = random_problem(&mut rng, 3, 2, 3);
            let expected = brute_force(&problem);
            let outcome = BranchAndBound::new().solve(&problem).unwrap();
            assert_eq!(outcome.makespan(), expected);
        }
    }

    #[test]
    fn test_optimal_without_seed_or_symmetry() {
        let mut rng = SmallRng::seed_from_u64(7);
        let problem = random_problem(&mut rng, 2, 3, 3);
        let expected = brute_force(&problem);

        let config = BnbConfig::default()
            .with_greedy_seed(false)
            .with_symmetry_breaking(false);
        let outcome = BranchAndBound::new().with_config(config).solve(&problem).unwrap();

        assert_eq!(outcome.makespan(), expected);
        assert_eq!(outcome.statistics.prunings_symmetry, 0);
    }

    #[test]
    fn test_trace_never_increases() {
        let mut rng = SmallRng::seed_from_u64(3);
        let problem = random_problem(&mut rng, 2, 3, 3);
        let config = BnbConfig::default()
            .with_greedy_seed(false)
            .with_progress_interval(1);
        let outcome = BranchAndBound::new().with_config(config).solve(&problem).unwrap();

        assert!(!outcome.trace.is_empty());
        assert!(outcome.trace.windows(2).all(|w| w[1].best <= w[0].best));
        assert!(outcome.trace.windows(2).all(|w| w[1].step >= w[0].step));
    }

    #[test]
    fn test_deterministic() {
        let mut rng = SmallRng::seed_from_u64(11);
        let problem = random_problem(&mut rng, 2, 3, 3);

        let a = BranchAndBound::new().solve(&problem).unwrap();
        let b = BranchAndBound::new().solve(&problem).unwrap();
        assert_eq!(a.timeline, b.timeline);
        assert_eq!(a.trace, b.trace);
        assert_eq!(a.statistics.nodes_explored, b.statistics.nodes_explored);
    }

    #[test]
    fn test_progress_callback() {
        let problem = build(
            2,
            vec![Job::new(1).with_tasks([2, 3]), Job::new(2).with_tasks([4, 1])],
        );
        let config = BnbConfig::default()
            .with_greedy_seed(false)
            .with_progress_interval(1);

        let mut calls = Vec::new();
        let outcome = BranchAndBound::new()
            .with_config(config)
            .solve_with_progress(&problem, |nodes, info| calls.push((nodes, info)))
            .unwrap();

        assert_eq!(calls.len() as u64, outcome.statistics.nodes_explored);
        assert_eq!(calls[0], (1, ProgressInfo::new(BestMetric::Pending)));
        assert!(calls.windows(2).all(|w| w[1].0 == w[0].0 + 1));
    }

    #[test]
    fn test_time_limit_returns_feasible_timeline() {
        let problem = build(
            3,
            (1..=6)
                .map(|id| Job::new(id).with_tasks([3, id as Time, 5]))
                .collect(),
        );
        let config = BnbConfig::default()
            .with_greedy_seed(false)
            .with_time_limit(Duration::ZERO)
            .with_deadline_check_interval(1);
        let outcome = BranchAndBound::new().with_config(config).solve(&problem).unwrap();

        assert_eq!(outcome.status, SolveStatus::TimeLimitReached);
        assert!(validate_timeline(&problem, &outcome.timeline).is_ok());
        assert_eq!(outcome.trace.len(), 1);
    }

    #[test]
    fn test_invalid_config() {
        let problem = build(1, vec![Job::new(1).with_task(1)]);
        let config = BnbConfig::default().with_progress_interval(0);
        let err = BranchAndBound::new().with_config(config).solve(&problem).unwrap_err();
        assert!(matches!(err, SolveError::InvalidConfig(_)));
    }

    #[test]
    fn test_empty_problem() {
        let problem = build(3, Vec::new());
        let outcome = BranchAndBound::new().solve(&problem).unwrap();
        assert_eq!(outcome.makespan(), 0);
        assert_eq!(outcome.status, SolveStatus::Optimal);
        assert!(outcome.timeline.is_empty());
    }

    #[test]
    fn test_statistics_recorded() {
        let problem = build(
            2,
            vec![
                Job::new(1).with_tasks([4, 2]),
                Job::new(2).with_tasks([3, 3]),
                Job::new(3).with_tasks([5]),
            ],
        );
        let config = BnbConfig::default().with_greedy_seed(false);
        let outcome = BranchAndBound::new().with_config(config).solve(&problem).unwrap();

        let stats = &outcome.statistics;
        assert!(stats.nodes_explored > 0);
        assert!(stats.solutions_found >= 1);
        assert_eq!(stats.max_depth, 5);
        assert_eq!(stats.root_lower_bound, 9);
        assert!(stats.to_string().contains("Branch-and-Bound Statistics"));
    }
}
