//! Cancellable timers.
//!
//! The coordinator never touches a real clock. It hands handles to a
//! [`Scheduler`] and later receives them back as timer fires. Production hosts
//! back this with their own event loop; tests and the replay binary use
//! [`SimulatedScheduler`], a virtual clock that only moves when told to.

use crate::app::TimerHandle;
use std::collections::{BTreeSet, HashMap};
use std::time::Duration;

pub trait Scheduler {
    /// Time elapsed since the page was loaded.
    fn now(&self) -> Duration;

    /// Arms `handle` to fire `delay` from now.
    fn schedule(&mut self, handle: TimerHandle, delay: Duration);

    /// Disarms `handle`. Cancelling a fired, cancelled or unknown handle is a no-op.
    fn cancel(&mut self, handle: TimerHandle);

    /// Deadline of the earliest armed timer.
    fn next_deadline(&self) -> Option<Duration>;

    /// Removes and returns every handle whose deadline is not after `now()`,
    /// earliest first; equal deadlines fire in scheduling order.
    fn take_due(&mut self) -> Vec<TimerHandle>;
}

/// Virtual clock with deterministic firing order.
#[derive(Debug, Default)]
pub struct SimulatedScheduler {
    now: Duration,
    seq: u64,
    /// Ordered by (deadline, scheduling sequence).
    queue: BTreeSet<(Duration, u64, TimerHandle)>,
    armed: HashMap<TimerHandle, (Duration, u64)>,
}

impl SimulatedScheduler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Moves the clock forward to `at`. Moving backwards is ignored.
    pub fn advance_to(&mut self, at: Duration) {
        if at > self.now {
            self.now = at;
        }
    }

    #[must_use]
    pub fn armed_count(&self) -> usize {
        self.armed.len()
    }
}

impl Scheduler for SimulatedScheduler {
    fn now(&self) -> Duration {
        self.now
    }

    fn schedule(&mut self, handle: TimerHandle, delay: Duration) {
        self.cancel(handle);
        self.seq += 1;
        let deadline = self.now + delay;
        self.queue.insert((deadline, self.seq, handle));
        self.armed.insert(handle, (deadline, self.seq));
    }

    fn cancel(&mut self, handle: TimerHandle) {
        if let Some((deadline, seq)) = self.armed.remove(&handle) {
            self.queue.remove(&(deadline, seq, handle));
        }
    }

    fn next_deadline(&self) -> Option<Duration> {
        self.queue.first().map(|(deadline, _, _)| *deadline)
    }

    fn take_due(&mut self) -> Vec<TimerHandle> {
        let mut due = Vec::new();
        while let Some(&(deadline, seq, handle)) = self.queue.first() {
            if deadline > self.now {
                break;
            }
            self.queue.remove(&(deadline, seq, handle));
            self.armed.remove(&handle);
            due.push(handle);
        }
        due
    }
}
