//! Rule engine: lexicographic rule evaluation with a final tie break.
//!
//! # Reference
//! Haupt (1989), "A Survey of Priority Rule-Based Scheduling"

use std::cmp::Ordering;
use std::sync::Arc;

use super::{rules, DispatchingRule};
use crate::models::Job;

/// How ties are broken after all rules are exhausted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TieBreaker {
    /// Keep input order (stable sort).
    #[default]
    InputOrder,
    /// Deterministic by ascending job ID.
    ById,
}

/// Orders jobs by a sequence of rules.
///
/// The first rule decides; later rules are consulted only on ties, and the
/// [`TieBreaker`] settles whatever remains.
///
/// # Example
/// ```
/// use u_makespan::dispatching::{Lpt, RuleEngine, TieBreaker};
///
/// let engine = RuleEngine::new()
///     .with_rule(Lpt)
///     .with_final_tie_breaker(TieBreaker::ById);
/// assert_eq!(engine.rule_names(), vec!["LPT"]);
/// ```
#[derive(Clone, Default)]
pub struct RuleEngine {
    rules: Vec<Arc<dyn DispatchingRule>>,
    tie_breaker: TieBreaker,
}

impl RuleEngine {
    /// Creates an engine without rules (input order).
    pub fn new() -> Self {
        Self::default()
    }

    /// Longest total work first, ties by ascending job ID.
    pub fn longest_first() -> Self {
        Self::new()
            .with_rule(rules::Lpt)
            .with_final_tie_breaker(TieBreaker::ById)
    }

    /// Appends a rule; earlier rules take precedence.
    pub fn with_rule<R: DispatchingRule + 'static>(mut self, rule: R) -> Self {
        self.rules.push(Arc::new(rule));
        self
    }

    /// Sets the final tie-breaking strategy.
    pub fn with_final_tie_breaker(mut self, tie_breaker: TieBreaker) -> Self {
        self.tie_breaker = tie_breaker;
        self
    }

    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    /// Indices into `jobs`, highest priority first.
    pub fn sort_indices(&self, jobs: &[&Job]) -> Vec<usize> {
        let scores: Vec<Vec<_>> = jobs
            .iter()
            .map(|job| self.rules.iter().map(|r| r.evaluate(job)).collect())
            .collect();
        let mut indices: Vec<usize> = (0..jobs.len()).collect();
        indices.sort_by(|&a, &b| {
            scores[a]
                .cmp(&scores[b])
                .then_with(|| self.break_tie(jobs[a], jobs[b]))
        });
        indices
    }

    fn break_tie(&self, a: &Job, b: &Job) -> Ordering {
        match self.tie_breaker {
            TieBreaker::InputOrder => Ordering::Equal,
            TieBreaker::ById => a.job_id.cmp(&b.job_id),
        }
    }
}

impl std::fmt::Debug for RuleEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuleEngine")
            .field("rules", &self.rule_names())
            .field("tie_breaker", &self.tie_breaker)
            .finish()
    }
}
