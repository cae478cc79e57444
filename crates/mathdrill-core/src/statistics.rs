//! Bounded history of solve times and strict-accuracy flags.

use std::collections::VecDeque;
use std::time::Duration;

use serde::Serialize;

pub const DEFAULT_RESULTS_TRACKED: usize = 100;

/// Most recent results first; the oldest fall off once `capacity` is
/// reached.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultHistory {
    capacity: usize,
    times: VecDeque<Duration>,
    strict: VecDeque<bool>,
}

impl ResultHistory {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            times: VecDeque::with_capacity(capacity),
            strict: VecDeque::with_capacity(capacity),
        }
    }

    pub fn record(&mut self, time: Duration, strictly_solved: bool) {
        self.times.push_front(time);
        self.strict.push_front(strictly_solved);
        self.truncate();
    }

    fn truncate(&mut self) {
        self.times.truncate(self.capacity);
        self.strict.truncate(self.capacity);
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Change how many results are kept, dropping the oldest if needed.
    pub fn change_capacity(&mut self, capacity: usize) {
        self.capacity = capacity;
        self.truncate();
    }

    pub fn clear(&mut self) {
        self.times.clear();
        self.strict.clear();
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    pub fn last_time(&self) -> Option<Duration> {
        self.times.front().copied()
    }

    pub fn average_time(&self) -> Option<Duration> {
        if self.times.is_empty() {
            return None;
        }
        let total: Duration = self.times.iter().sum();
        Some(total / self.times.len() as u32)
    }

    pub fn strict_count(&self) -> usize {
        self.strict.iter().filter(|&&s| s).count()
    }

    /// Proportion of tracked results that were strictly solved, `0.0..=1.0`.
    pub fn accuracy(&self) -> Option<f64> {
        if self.strict.is_empty() {
            return None;
        }
        Some(self.strict_count() as f64 / self.strict.len() as f64)
    }

    pub fn times(&self) -> impl Iterator<Item = Duration> + '_ {
        self.times.iter().copied()
    }

    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            solved: self.len(),
            strictly_solved: self.strict_count(),
            accuracy_percent: self.accuracy().map(|a| a * 100.0),
            last_time_secs: self.last_time().map(|t| t.as_secs_f64()),
            average_time_secs: self.average_time().map(|t| t.as_secs_f64()),
        }
    }
}

impl Default for ResultHistory {
    fn default() -> Self {
        Self::new(DEFAULT_RESULTS_TRACKED)
    }
}

/// Serializable snapshot of a [`ResultHistory`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSummary {
    pub solved: usize,
    pub strictly_solved: usize,
    pub accuracy_percent: Option<f64>,
    pub last_time_secs: Option<f64>,
    pub average_time_secs: Option<f64>,
}
