//! Best complete schedule found so far.

use crate::models::{Time, Timeline};

/// Incumbent store.
///
/// Holds a snapshot of the best timeline; the snapshot is never mutated
/// after installation.
#[derive(Debug, Clone, Default)]
pub(crate) struct Incumbent {
    best: Option<(Time, Timeline)>,
}

impl Incumbent {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makespan to beat; `Time::MAX` while empty.
    #[inline]
    pub fn upper_bound(&self) -> Time {
        self.best.as_ref().map_or(Time::MAX, |(makespan, _)| *makespan)
    }

    #[inline]
    pub fn makespan(&self) -> Option<Time> {
        self.best.as_ref().map(|(makespan, _)| *makespan)
    }

    /// Installs a copy of `timeline` if it is strictly better.
    pub fn try_install(&mut self, timeline: &Timeline) -> bool {
        let makespan = timeline.makespan();
        if makespan >= self.upper_bound() {
            return false;
        }
        self.best = Some((makespan, timeline.clone()));
        true
    }

    pub fn into_timeline(self) -> Option<Timeline> {
        self.best.map(|(_, timeline)| timeline)
    }
}
