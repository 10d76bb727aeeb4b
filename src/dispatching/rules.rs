//! Built-in dispatching rules.

use super::{DispatchingRule, RuleScore};
use crate::models::Job;

/// Longest Processing Time.
///
/// Prioritizes jobs with longer total processing time. Placing long
/// chains first keeps them off the critical path on parallel machines.
///
/// # Reference
/// Graham (1969), "Bounds on Multiprocessing Timing Anomalies"
#[derive(Debug, Clone, Copy)]
pub struct Lpt;

impl DispatchingRule for Lpt {
    fn name(&self) -> &'static str {
        "LPT"
    }

    fn evaluate(&self, job: &Job) -> RuleScore {
        -RuleScore::from(job.total_work())
    }
}
