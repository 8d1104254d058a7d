//! Deterministic timers for auto-run, auto-save and the quiz countdown.
//!
//! Time only moves when [`Scheduler::advance`] is called, so callers drive the
//! clock from a real timer in production and step it by hand in tests.

use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

use crate::model::Difficulty;

/// Quiet period before a code edit triggers an evaluation.
pub const AUTO_RUN_DELAY: Duration = Duration::from_millis(800);

/// Quiet period before a code edit is persisted.
pub const AUTO_SAVE_DELAY: Duration = Duration::from_millis(500);

/// Time allowed for one quiz question.
pub fn quiz_time_limit(difficulty: Difficulty) -> Duration {
    match difficulty {
        Difficulty::Hard => Duration::from_secs(60),
        Difficulty::Easy | Difficulty::Medium => Duration::from_secs(30),
    }
}

/// A manually advanced monotonic clock.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VirtualClock {
    now: Duration,
}

impl VirtualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Time elapsed since the clock was created.
    pub fn now(&self) -> Duration {
        self.now
    }

    fn advance(&mut self, by: Duration) {
        self.now = self.now.saturating_add(by);
    }
}

/// Identifies a scheduled action so it can be cancelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerHandle(u64);

/// Single-threaded timer queue over a [`VirtualClock`].
#[derive(Debug)]
pub struct Scheduler<A> {
    clock: VirtualClock,
    next_id: u64,
    queue: BTreeMap<(Duration, u64), A>,
    deadlines: HashMap<u64, Duration>,
}

impl<A> Default for Scheduler<A> {
    fn default() -> Self {
        Self::new(VirtualClock::new())
    }
}

impl<A> Scheduler<A> {
    pub fn new(clock: VirtualClock) -> Self {
        Self {
            clock,
            next_id: 0,
            queue: BTreeMap::new(),
            deadlines: HashMap::new(),
        }
    }

    pub fn now(&self) -> Duration {
        self.clock.now()
    }

    /// Schedule `action` to fire once `delay` has elapsed.
    pub fn schedule(&mut self, delay: Duration, action: A) -> TimerHandle {
        let id = self.next_id;
        self.next_id += 1;
        let deadline = self.clock.now().saturating_add(delay);
        self.queue.insert((deadline, id), action);
        self.deadlines.insert(id, deadline);
        TimerHandle(id)
    }

    /// Cancel a pending action. Returns `false` if it already fired or was
    /// cancelled before.
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        match self.deadlines.remove(&handle.0) {
            Some(deadline) => self.queue.remove(&(deadline, handle.0)).is_some(),
            None => false,
        }
    }

    pub fn is_pending(&self, handle: TimerHandle) -> bool {
        self.deadlines.contains_key(&handle.0)
    }

    /// Number of pending actions.
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Time left until `handle` fires, if still pending.
    pub fn remaining(&self, handle: TimerHandle) -> Option<Duration> {
        self.deadlines
            .get(&handle.0)
            .map(|deadline| deadline.saturating_sub(self.clock.now()))
    }

    /// Move the clock forward and return every action that came due, in
    /// deadline order. Actions with equal deadlines fire in the order they
    /// were scheduled.
    pub fn advance(&mut self, by: Duration) -> Vec<A> {
        self.clock.advance(by);
        let now = self.clock.now();
        let mut fired = Vec::new();
        while let Some(entry) = self.queue.first_entry() {
            let (deadline, id) = *entry.key();
            if deadline > now {
                break;
            }
            fired.push(entry.remove());
            self.deadlines.remove(&id);
        }
        fired
    }
}

/// Keeps at most one pending action on a scheduler.
///
/// Triggering again cancels the previous pending action. An action that has
/// already fired cannot be recalled.
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    pending: Option<TimerHandle>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Schedule `action`, replacing whatever was pending.
    pub fn trigger<A>(&mut self, scheduler: &mut Scheduler<A>, action: A) -> TimerHandle {
        self.cancel(scheduler);
        let handle = scheduler.schedule(self.delay, action);
        self.pending = Some(handle);
        handle
    }

    /// Drop the pending action, if any. Returns whether one was cancelled.
    pub fn cancel<A>(&mut self, scheduler: &mut Scheduler<A>) -> bool {
        self.pending
            .take()
            .is_some_and(|handle| scheduler.cancel(handle))
    }

    pub fn is_pending<A>(&self, scheduler: &Scheduler<A>) -> bool {
        self.pending.is_some_and(|handle| scheduler.is_pending(handle))
    }
}
