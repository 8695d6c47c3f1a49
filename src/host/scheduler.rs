//! Deferred work for a single-threaded event loop.
//!
//! Some UI effects must be undone after a fixed delay (restoring chrome
//! after printing, restoring a control label after a success tick). The
//! host calls `take_due` from its loop; nothing runs on another thread.

use std::time::{Duration, Instant};

/// Time-ordered queue of deferred tasks.
#[derive(Debug)]
pub struct Scheduler<T> {
    tasks: Vec<(Instant, T)>,
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self { tasks: Vec::new() }
    }
}

impl<T: PartialEq> Scheduler<T> {
    /// Like [`schedule`](Self::schedule), but first drops any pending task
    /// equal to `task`, so only the latest deadline counts.
    pub fn reschedule(&mut self, now: Instant, delay: Duration, task: T) {
        self.tasks.retain(|(_, pending)| *pending != task);
        self.schedule(now, delay, task);
    }
}

impl<T> Scheduler<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `task` once `delay` has elapsed after `now`.
    pub fn schedule(&mut self, now: Instant, delay: Duration, task: T) {
        let due = now + delay;
        let index = self.tasks.partition_point(|(at, _)| *at <= due);
        self.tasks.insert(index, (due, task));
    }

    /// Remove and return every task due at `now`, oldest first.
    pub fn take_due(&mut self, now: Instant) -> Vec<T> {
        let split = self.tasks.partition_point(|(at, _)| *at <= now);
        self.tasks.drain(..split).map(|(_, task)| task).collect()
    }

    /// Remove and return every task regardless of its deadline.
    pub fn drain_all(&mut self) -> Vec<T> {
        self.tasks.drain(..).map(|(_, task)| task).collect()
    }

    /// Number of tasks still waiting.
    pub fn pending(&self) -> usize {
        self.tasks.len()
    }

    /// Deadline of the next task, if any.
    pub fn next_due(&self) -> Option<Instant> {
        self.tasks.first().map(|(at, _)| *at)
    }
}
