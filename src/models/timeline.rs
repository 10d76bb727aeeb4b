//! Timeline (partial or complete solution) model.
//!
//! A timeline holds, per machine, the scheduled entries ordered by start
//! time. Every mutation goes through [`Timeline::commit`] and
//! [`Timeline::uncommit`], which keep two invariants for the entries that
//! are present:
//!
//! 1. no two entries on the same machine overlap;
//! 2. within a job, task `k` starts no earlier than task `k-1` ends.
//!
//! A complete timeline additionally holds every task of its problem exactly
//! once (see [`Timeline::is_complete`]).
//!
//! # Reference
//! Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems", Ch. 3

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;

use super::{JobId, ProblemModel, Task, TaskKey, Time};
use crate::error::{Result, SolveError};

/// Machine identifier.
///
/// Zero-based internally so it can index per-machine vectors directly.
/// Rendered and serialized one-based (`M1`, `M2`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MachineId(usize);

impl MachineId {
    /// Creates a machine id from its zero-based index.
    #[inline]
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    /// Zero-based index.
    #[inline]
    pub const fn index(self) -> usize {
        self.0
    }

    /// One-based number as shown to users.
    #[inline]
    pub const fn number(self) -> usize {
        self.0 + 1
    }

    /// All machine ids of a problem with `count` machines.
    pub fn all(count: usize) -> impl Iterator<Item = MachineId> {
        (0..count).map(MachineId)
    }
}

impl fmt::Display for MachineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "M{}", self.number())
    }
}

impl Serialize for MachineId {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_u64(self.number() as u64)
    }
}

impl<'de> Deserialize<'de> for MachineId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let number = u64::deserialize(deserializer)?;
        if number == 0 {
            return Err(serde::de::Error::custom("machine numbers start at 1"));
        }
        Ok(MachineId((number - 1) as usize))
    }
}

/// A task placed on a machine at a start time.
///
/// Only [`Timeline::commit`] creates entries, so `end_time` always equals
/// `start_time + duration`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledEntry {
    pub job_id: JobId,
    pub task_index: u32,
    pub machine_id: MachineId,
    pub start_time: Time,
    pub end_time: Time,
}

impl ScheduledEntry {
    /// Processing time.
    #[inline]
    pub fn duration(&self) -> Time {
        self.end_time.saturating_sub(self.start_time)
    }

    #[inline]
    pub fn key(&self) -> TaskKey {
        TaskKey::new(self.job_id, self.task_index)
    }

    /// Whether `[start, end)` intersects this entry.
    #[inline]
    pub fn overlaps(&self, start: Time, end: Time) -> bool {
        start < self.end_time && self.start_time < end
    }
}

/// Per-machine, start-ordered schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "TimelineData", into = "TimelineData")]
pub struct Timeline {
    machines: Vec<Vec<ScheduledEntry>>,
    placed: HashMap<TaskKey, ScheduledEntry>,
}

/// Wire form: machine count plus a flat entry list.
#[derive(Serialize, Deserialize)]
struct TimelineData {
    machine_count: usize,
    entries: Vec<ScheduledEntry>,
}

impl From<Timeline> for TimelineData {
    fn from(timeline: Timeline) -> Self {
        Self {
            machine_count: timeline.machine_count(),
            entries: timeline.machines.into_iter().flatten().collect(),
        }
    }
}

impl TryFrom<TimelineData> for Timeline {
    type Error = SolveError;

    fn try_from(data: TimelineData) -> Result<Self> {
        let mut timeline = Timeline::new(data.machine_count);
        for entry in data.entries {
            if entry.end_time <= entry.start_time {
                return Err(SolveError::Infeasible {
                    job_id: entry.job_id,
                    task_index: entry.task_index,
                    machine: entry.machine_id,
                    start_time: entry.start_time,
                    reason: "entry does not end after it starts",
                });
            }
            let task = Task::new(entry.job_id, entry.task_index, entry.duration());
            timeline.commit(&task, entry.machine_id, entry.start_time)?;
        }
        Ok(timeline)
    }
}

impl Timeline {
    /// Creates an empty timeline over `machine_count` machines.
    pub fn new(machine_count: usize) -> Self {
        Self {
            machines: vec![Vec::new(); machine_count],
            placed: HashMap::new(),
        }
    }

    /// Number of machines.
    #[inline]
    pub fn machine_count(&self) -> usize {
        self.machines.len()
    }

    /// Number of committed entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.placed.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.placed.is_empty()
    }

    /// Places `task` on `machine` at `start_time`.
    ///
    /// # Errors
    /// [`SolveError::Infeasible`] if the machine is unknown, the task is
    /// already placed, the slot overlaps another entry on the machine, or
    /// the slot breaks the ordering with an already placed neighbor of the
    /// same job. The timeline is unchanged on error.
    pub fn commit(
        &mut self,
        task: &Task,
        machine: MachineId,
        start_time: Time,
    ) -> Result<ScheduledEntry> {
        let infeasible = |reason: &'static str| SolveError::Infeasible {
            job_id: task.job_id,
            task_index: task.task_index,
            machine,
            start_time,
            reason,
        };
        let Some(end_time) = start_time.checked_add(task.duration) else {
            return Err(infeasible("end time overflows"));
        };

        let key = task.key();
        let Some(entries) = self.machines.get(machine.index()) else {
            return Err(infeasible("unknown machine"));
        };
        if self.placed.contains_key(&key) {
            return Err(infeasible("task is already committed"));
        }
        if let Some(pred) = key.predecessor().and_then(|k| self.placed.get(&k)) {
            if pred.end_time > start_time {
                return Err(infeasible("starts before the previous task of the job ends"));
            }
        }
        if let Some(succ) = self.placed.get(&key.successor()) {
            if end_time > succ.start_time {
                return Err(infeasible("ends after the next task of the job starts"));
            }
        }

        let pos = entries.partition_point(|e| e.start_time < start_time);
        let clashes_before = pos > 0 && entries[pos - 1].overlaps(start_time, end_time);
        let clashes_after = entries
            .get(pos)
            .is_some_and(|e| e.overlaps(start_time, end_time) || e.start_time == start_time);
        if clashes_before || clashes_after {
            return Err(infeasible("overlaps an entry on the machine"));
        }

        let entry = ScheduledEntry {
            job_id: task.job_id,
            task_index: task.task_index,
            machine_id: machine,
            start_time,
            end_time,
        };
        self.machines[machine.index()].insert(pos, entry);
        self.placed.insert(key, entry);
        Ok(entry)
    }

    /// Removes the entry of `task` from `machine`.
    ///
    /// # Errors
    /// [`SolveError::InvariantViolation`] if no such entry exists there.
    /// Callers must treat this as a corrupted search state.
    pub fn uncommit(&mut self, task: &Task, machine: MachineId) -> Result<ScheduledEntry> {
        let key = task.key();
        let pos = self
            .machines
            .get(machine.index())
            .and_then(|entries| entries.iter().rposition(|e| e.key() == key));
        let Some(pos) = pos else {
            return Err(SolveError::InvariantViolation(format!(
                "uncommit of job {} task {} found no entry on {machine}",
                task.job_id, task.task_index
            )));
        };
        let entry = self.machines[machine.index()].remove(pos);
        self.placed.remove(&key);
        Ok(entry)
    }

    /// Smallest `t >= ready_time` at which `[t, t + duration)` fits on
    /// `machine` without overlapping an entry.
    ///
    /// Entries are scanned in start order and the first gap that is large
    /// enough wins; otherwise the task goes after the last entry.
    pub fn earliest_start(&self, machine: MachineId, ready_time: Time, duration: Time) -> Time {
        let mut t = ready_time;
        for entry in self.entries(machine) {
            if entry.end_time <= t {
                continue;
            }
            if t.saturating_add(duration) <= entry.start_time && entry.start_time > t {
                break;
            }
            t = t.max(entry.end_time);
        }
        t
    }

    /// Entries of `machine` in start order (empty for an unknown machine).
    pub fn entries(&self, machine: MachineId) -> &[ScheduledEntry] {
        self.machines
            .get(machine.index())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// All entries, machine by machine.
    pub fn iter(&self) -> impl Iterator<Item = &ScheduledEntry> {
        self.machines.iter().flatten()
    }

    /// End time of the last entry on `machine`, 0 if it is empty.
    pub fn machine_end(&self, machine: MachineId) -> Time {
        self.entries(machine).last().map_or(0, |e| e.end_time)
    }

    /// Total processing time placed on `machine`.
    pub fn busy_time(&self, machine: MachineId) -> Time {
        self.entries(machine).iter().map(ScheduledEntry::duration).sum()
    }

    /// Completion time of the last task on any machine.
    pub fn makespan(&self) -> Time {
        MachineId::all(self.machine_count())
            .map(|m| self.machine_end(m))
            .max()
            .unwrap_or(0)
    }

    /// Entry of a task, if committed.
    pub fn entry_for(&self, job_id: JobId, task_index: u32) -> Option<&ScheduledEntry> {
        self.placed.get(&TaskKey::new(job_id, task_index))
    }

    /// Committed entries of a job, ordered by task index.
    pub fn entries_for_job(&self, job_id: JobId) -> Vec<ScheduledEntry> {
        let mut entries: Vec<ScheduledEntry> = self
            .placed
            .values()
            .filter(|e| e.job_id == job_id)
            .copied()
            .collect();
        entries.sort_by_key(|e| e.task_index);
        entries
    }

    /// Whether every task of `problem` is placed (and nothing else).
    pub fn is_complete(&self, problem: &ProblemModel) -> bool {
        self.machine_count() == problem.machine_count()
            && self.len() == problem.task_count()
            && problem
                .tasks()
                .all(|t| self.placed.contains_key(&t.key()))
    }
}
