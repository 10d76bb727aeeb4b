//! Wall-clock budget checked at a fixed step interval.

use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub(crate) struct TimeLimit {
    limit: Option<Duration>,
    start: Instant,
    check_interval: u64,
    ops_since_last_check: u64,
}

impl TimeLimit {
    pub fn new(limit: Option<Duration>, check_interval: u64, start: Instant) -> Self {
        Self {
            limit,
            start,
            check_interval: check_interval.max(1),
            ops_since_last_check: 0,
        }
    }

    /// Counts one search step; reads the clock every `check_interval` steps.
    pub fn exceeded(&mut self) -> bool {
        let Some(limit) = self.limit else {
            return false;
        };
        self.ops_since_last_check = self.ops_since_last_check.saturating_add(1);
        if self.ops_since_last_check < self.check_interval {
            return false;
        }
        self.ops_since_last_check = 0;
        self.start.elapsed() >= limit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unlimited_never_fires() {
        let mut limit = TimeLimit::new(None, 1, Instant::now());
        assert!((0..1000).all(|_| !limit.exceeded()));
    }

    #[test]
    fn test_zero_budget_fires_on_check() {
        let mut limit = TimeLimit::new(Some(Duration::ZERO), 3, Instant::now());
        assert!(!limit.exceeded());
        assert!(!limit.exceeded());
        assert!(limit.exceeded());
    }

    #[test]
    fn test_generous_budget() {
        let mut limit = TimeLimit::new(Some(Duration::from_secs(3600)), 1, Instant::now());
        assert!(!limit.exceeded());
    }
}
