//! Job ordering rules.
//!
//! A [`DispatchingRule`] scores a job; the [`RuleEngine`] sorts jobs by
//! those scores and breaks remaining ties by job ID. Both solvers order
//! jobs with [`RuleEngine::longest_first`]: the greedy list scheduler ranks
//! ready jobs with it, and branch-and-bound branches on jobs in that order.
//!
//! # Usage
//!
//! ```
//! use u_makespan::dispatching::RuleEngine;
//! use u_makespan::models::Job;
//!
//! let jobs = vec![Job::new(1).with_tasks([2, 2]), Job::new(2).with_tasks([9])];
//! let refs: Vec<&Job> = jobs.iter().collect();
//! assert_eq!(RuleEngine::longest_first().sort_indices(&refs), vec![1, 0]);
//! ```
//!
//! # References
//!
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems", Ch. 4
//! - Graham (1969), "Bounds on Multiprocessing Timing Anomalies"

mod engine;
mod rules;

pub use engine::{RuleEngine, TieBreaker};
pub use rules::Lpt;

use crate::models::Job;
use std::fmt::Debug;

/// Score returned by a dispatching rule.
///
/// Lower scores = higher priority. Integral so that large work totals
/// compare exactly.
pub type RuleScore = i128;

/// A rule that scores job priority.
///
/// # Score Convention
/// **Lower score = higher priority.**
pub trait DispatchingRule: Send + Sync + Debug {
    /// Rule name (e.g., "LPT").
    fn name(&self) -> &'static str;

    /// Scores a job; lower is dispatched first.
    fn evaluate(&self, job: &Job) -> RuleScore;
}
