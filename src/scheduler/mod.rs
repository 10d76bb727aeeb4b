//! Greedy scheduling and schedule metrics.
//!
//! # Algorithm
//!
//! `GreedyScheduler` is an earliest-finish list scheduler driven by a
//! dispatching rule engine. It is not optimal, but provides fast baseline
//! solutions and the initial incumbent of the branch-and-bound search.
//!
//! # Metrics
//!
//! `ScheduleMetrics` computes makespan, idle time and utilization of a
//! timeline.
//!
//! # References
//!
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems", Ch. 3-4
//! - Graham (1969), "Bounds on Multiprocessing Timing Anomalies"

mod greedy;
mod kpi;

pub use greedy::GreedyScheduler;
pub use kpi::ScheduleMetrics;
