//! Frame-structured work stack for the depth-first search.
//!
//! Every search level owns one frame: a contiguous run of pending
//! decisions at the top of a single vector. Descending opens a frame,
//! backtracking drops it together with any decisions it still holds, so
//! the search never recurses.

use crate::models::{MachineId, Time};

/// A pending branch: place the next task of `job` on `machine` at `start`.
///
/// `estimate` is the earliest finish of the job if this branch is taken
/// (`start + duration + remaining work of the job after the task`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Decision {
    pub job: usize,
    pub machine: MachineId,
    pub start: Time,
    pub estimate: Time,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct SearchStack {
    entries: Vec<Decision>,
    frames: Vec<usize>,
}

impl SearchStack {
    /// Reserves room for a search over `task_count` tasks and `machine_count` machines.
    pub fn preallocated(task_count: usize, machine_count: usize) -> Self {
        Self {
            entries: Vec::with_capacity(task_count.saturating_mul(machine_count)),
            frames: Vec::with_capacity(task_count.saturating_add(1)),
        }
    }

    /// Number of open frames.
    #[inline]
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    #[inline]
    pub fn num_entries(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn push_frame(&mut self) {
        self.frames.push(self.entries.len());
    }

    /// Closes the top frame, discarding its remaining decisions.
    #[inline]
    pub fn pop_frame(&mut self) -> Option<()> {
        let start = self.frames.pop()?;
        self.entries.truncate(start);
        Some(())
    }

    #[inline]
    pub fn extend<I>(&mut self, iter: I)
    where
        I: IntoIterator<Item = Decision>,
    {
        self.entries.extend(iter);
    }

    /// Takes the next decision of the top frame.
    #[inline]
    pub fn pop(&mut self) -> Option<Decision> {
        if self.is_current_level_empty() {
            return None;
        }
        self.entries.pop()
    }

    #[inline]
    pub fn is_current_level_empty(&self) -> bool {
        match self.frames.last() {
            Some(&start) => self.entries.len() == start,
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decision(job: usize) -> Decision {
        Decision {
            job,
            machine: MachineId::new(0),
            start: 0,
            estimate: 0,
        }
    }

    #[test]
    fn test_frames_isolate_levels() {
        let mut stack = SearchStack::preallocated(4, 2);
        assert!(stack.is_current_level_empty());
        assert_eq!(stack.depth(), 0);

        stack.push_frame();
        stack.extend([decision(0), decision(1)]);
        stack.push_frame();
        assert!(stack.is_current_level_empty());
        assert_eq!(stack.pop(), None);

        stack.extend([decision(2)]);
        assert_eq!(stack.pop().map(|d| d.job), Some(2));
        assert!(stack.is_current_level_empty());

        stack.pop_frame();
        assert_eq!(stack.depth(), 1);
        assert_eq!(stack.pop().map(|d| d.job), Some(1));
        assert_eq!(stack.num_entries(), 1);
    }

    #[test]
    fn test_pop_frame_discards_pending() {
        let mut stack = SearchStack::default();
        stack.push_frame();
        stack.push_frame();
        stack.extend([decision(5), decision(6)]);

        assert_eq!(stack.pop_frame(), Some(()));
        assert_eq!(stack.num_entries(), 0);
        assert_eq!(stack.pop_frame(), Some(()));
        assert_eq!(stack.pop_frame(), None);
    }
}
