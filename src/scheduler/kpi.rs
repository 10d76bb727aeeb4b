//! Schedule quality metrics.
//!
//! Computes the performance indicators reported with every solver outcome.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Makespan (C_max) | Latest completion time |
//! | Idle time | Per machine: lead-in gap + gaps between tasks + tail to C_max |
//! | Utilization | Total busy / (C_max × machines) |
//! | Execution time | Solver wall clock |
//!
//! # Reference
//! Pinedo (2016), "Scheduling", Ch. 1.2: Performance Measures

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::models::{MachineId, Time, Timeline};

/// Schedule performance indicators.
///
/// Pure function of the timeline (plus the wall clock handed in by the
/// solver), so recomputing it on the same timeline yields the same values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleMetrics {
    /// Completion time of the last task.
    pub makespan: Time,
    /// Idle time summed over machines.
    pub total_idle_time: Time,
    /// Fraction of machine capacity in use up to the makespan (0.0..=1.0).
    pub machine_utilization: f64,
    /// Solver wall clock.
    pub execution_time: Duration,
    /// Sum of all scheduled durations.
    pub total_work: Time,
    /// Busy time per machine, indexed by machine.
    pub busy_time_by_machine: Vec<Time>,
    /// Idle time per machine, indexed by machine.
    pub idle_time_by_machine: Vec<Time>,
    /// Utilization per machine (0.0..=1.0), indexed by machine.
    pub utilization_by_machine: Vec<f64>,
}

impl ScheduleMetrics {
    /// Computes metrics from a timeline.
    ///
    /// # Arguments
    /// * `timeline` - The schedule to evaluate (usually complete).
    /// * `execution_time` - Wall clock spent producing it.
    pub fn calculate(timeline: &Timeline, execution_time: Duration) -> Self {
        let makespan = timeline.makespan();
        let machines = MachineId::all(timeline.machine_count());

        let mut busy_time_by_machine = Vec::with_capacity(timeline.machine_count());
        let mut idle_time_by_machine = Vec::with_capacity(timeline.machine_count());
        let mut utilization_by_machine = Vec::with_capacity(timeline.machine_count());

        for machine in machines {
            let busy = timeline.busy_time(machine);
            busy_time_by_machine.push(busy);
            idle_time_by_machine.push(machine_idle(timeline, machine, makespan));
            utilization_by_machine.push(ratio(busy, makespan));
        }

        let total_work: Time = busy_time_by_machine.iter().sum();
        let capacity = makespan * timeline.machine_count() as Time;

        Self {
            makespan,
            total_idle_time: idle_time_by_machine.iter().sum(),
            machine_utilization: ratio(total_work, capacity),
            execution_time,
            total_work,
            busy_time_by_machine,
            idle_time_by_machine,
            utilization_by_machine,
        }
    }

    /// Utilization as a percentage (0.0..=100.0).
    pub fn utilization_percent(&self) -> f64 {
        self.machine_utilization * 100.0
    }
}

fn machine_idle(timeline: &Timeline, machine: MachineId, makespan: Time) -> Time {
    let entries = timeline.entries(machine);
    let Some(last) = entries.last() else {
        return makespan;
    };

    let lead_in = entries[0].start_time;
    let between: Time = entries
        .windows(2)
        .map(|w| w[1].start_time.saturating_sub(w[0].end_time))
        .sum();
    let tail = makespan.saturating_sub(last.end_time);

    lead_in + between + tail
}

fn ratio(part: Time, whole: Time) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Task;

    fn m(i: usize) -> MachineId {
        MachineId::new(i)
    }

    #[test]
    fn test_metrics_basic() {
        let mut tl = Timeline::new(2);
        tl.commit(&Task::new(1, 1, 10), m(0), 0).unwrap();
        tl.commit(&Task::new(2, 1, 5), m(1), 0).unwrap();

        let metrics = ScheduleMetrics::calculate(&tl, Duration::from_millis(3));
        assert_eq!(metrics.makespan, 10);
        assert_eq!(metrics.total_work, 15);
        assert_eq!(metrics.idle_time_by_machine, vec![0, 5]);
        assert_eq!(metrics.total_idle_time, 5);
        assert!((metrics.machine_utilization - 0.75).abs() < 1e-10);
        assert!((metrics.utilization_percent() - 75.0).abs() < 1e-10);
        assert!((metrics.utilization_by_machine[1] - 0.5).abs() < 1e-10);
        assert_eq!(metrics.execution_time, Duration::from_millis(3));
    }

    #[test]
    fn test_idle_counts_lead_in_and_gaps() {
        let mut tl = Timeline::new(2);
        tl.commit(&Task::new(1, 1, 4), m(0), 0).unwrap();
        tl.commit(&Task::new(1, 2, 3), m(1), 4).unwrap();
        tl.commit(&Task::new(2, 1, 2), m(1), 9).unwrap();

        let metrics = ScheduleMetrics::calculate(&tl, Duration::ZERO);
        assert_eq!(metrics.makespan, 11);
        // M1: tail 7. M2: lead-in 4 + gap 2.
        assert_eq!(metrics.idle_time_by_machine, vec![7, 6]);
        assert_eq!(metrics.total_idle_time, 13);
    }

    #[test]
    fn test_empty_machine_idle_for_whole_makespan() {
        let mut tl = Timeline::new(3);
        tl.commit(&Task::new(1, 1, 8), m(0), 0).unwrap();

        let metrics = ScheduleMetrics::calculate(&tl, Duration::ZERO);
        assert_eq!(metrics.idle_time_by_machine, vec![0, 8, 8]);
        assert!((metrics.machine_utilization - 8.0 / 24.0).abs() < 1e-10);
    }

    #[test]
    fn test_empty_timeline() {
        let metrics = ScheduleMetrics::calculate(&Timeline::new(2), Duration::ZERO);
        assert_eq!(metrics.makespan, 0);
        assert_eq!(metrics.total_idle_time, 0);
        assert_eq!(metrics.machine_utilization, 0.0);
    }

    #[test]
    fn test_idempotent_and_bounded() {
        let mut tl = Timeline::new(2);
        tl.commit(&Task::new(1, 1, 3), m(0), 2).unwrap();
        tl.commit(&Task::new(2, 1, 6), m(1), 0).unwrap();

        let a = ScheduleMetrics::calculate(&tl, Duration::ZERO);
        let b = ScheduleMetrics::calculate(&tl, Duration::ZERO);
        assert_eq!(a, b);
        assert!((0.0..=1.0).contains(&a.machine_utilization));
        // Idle plus busy always fills the capacity.
        assert_eq!(a.total_idle_time + a.total_work, a.makespan * 2);
    }
}
