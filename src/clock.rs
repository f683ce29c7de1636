//! Cancellable timers
//!
//! The session never sleeps. It asks a [`Clock`] to schedule a [`Timer`] and
//! later receives it back as a [`FiredTimer`] when the deadline has passed.
//! Both clocks share one queue ordered by (deadline, submission order), so
//! timers with equal deadlines fire in the order they were scheduled and a
//! cancelled timer is never handed out again.

use std::collections::{BTreeMap, HashMap};
use std::time::Instant;

use serde::{Deserialize, Serialize};

/// Opaque id of a scheduled timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TimerHandle(u64);

/// What a timer does when it fires
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Timer {
    /// Visibility window of target `target_id` ran out
    Disappear { target_id: u64 },
    /// Show the next target
    Respawn,
}

/// A timer whose deadline has passed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FiredTimer {
    pub handle: TimerHandle,
    pub timer: Timer,
    pub deadline_ms: u64,
}

/// Time source that can schedule and cancel timers
pub trait Clock {
    /// Milliseconds since the clock was created
    fn now_ms(&self) -> u64;

    /// Arm `timer` to fire `delay_ms` from now
    fn schedule(&mut self, delay_ms: u64, timer: Timer) -> TimerHandle;

    /// Disarm a timer. Returns false if it already fired or was cancelled.
    fn cancel(&mut self, handle: TimerHandle) -> bool;

    /// Earliest pending deadline
    fn next_deadline(&self) -> Option<u64>;

    /// Remove and return the earliest timer whose deadline is <= now
    fn pop_due(&mut self) -> Option<FiredTimer>;
}

/// Deadline-ordered set of pending timers
#[derive(Debug, Default)]
pub struct TimerQueue {
    next_handle: u64,
    /// Keyed by (deadline, handle); handles grow monotonically so ties keep submission order
    pending: BTreeMap<(u64, u64), Timer>,
    deadlines: HashMap<TimerHandle, u64>,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, deadline_ms: u64, timer: Timer) -> TimerHandle {
        let handle = TimerHandle(self.next_handle);
        self.next_handle += 1;
        self.pending.insert((deadline_ms, handle.0), timer);
        self.deadlines.insert(handle, deadline_ms);
        handle
    }

    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        match self.deadlines.remove(&handle) {
            Some(deadline) => self.pending.remove(&(deadline, handle.0)).is_some(),
            None => false,
        }
    }

    pub fn next_deadline(&self) -> Option<u64> {
        self.pending.keys().next().map(|&(deadline, _)| deadline)
    }

    pub fn pop_due(&mut self, now_ms: u64) -> Option<FiredTimer> {
        let (&(deadline_ms, id), _) = self.pending.first_key_value()?;
        if deadline_ms > now_ms {
            return None;
        }
        let timer = self.pending.remove(&(deadline_ms, id))?;
        let handle = TimerHandle(id);
        self.deadlines.remove(&handle);
        Some(FiredTimer {
            handle,
            timer,
            deadline_ms,
        })
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

/// Virtual clock: time only moves when told to
#[derive(Debug, Default)]
pub struct ManualClock {
    now_ms: u64,
    queue: TimerQueue,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move time forward (never backward) without dispatching anything
    pub fn advance_to(&mut self, now_ms: u64) {
        self.now_ms = self.now_ms.max(now_ms);
    }

    /// Number of armed timers
    pub fn pending(&self) -> usize {
        self.queue.len()
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now_ms
    }

    fn schedule(&mut self, delay_ms: u64, timer: Timer) -> TimerHandle {
        self.queue.insert(self.now_ms + delay_ms, timer)
    }

    fn cancel(&mut self, handle: TimerHandle) -> bool {
        self.queue.cancel(handle)
    }

    fn next_deadline(&self) -> Option<u64> {
        self.queue.next_deadline()
    }

    fn pop_due(&mut self) -> Option<FiredTimer> {
        self.queue.pop_due(self.now_ms)
    }
}

/// Wall clock backed by [`Instant`]
#[derive(Debug)]
pub struct SystemClock {
    origin: Instant,
    queue: TimerQueue,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            queue: TimerQueue::new(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        self.origin.elapsed().as_millis() as u64
    }

    fn schedule(&mut self, delay_ms: u64, timer: Timer) -> TimerHandle {
        let deadline = self.now_ms() + delay_ms;
        self.queue.insert(deadline, timer)
    }

    fn cancel(&mut self, handle: TimerHandle) -> bool {
        self.queue.cancel(handle)
    }

    fn next_deadline(&self) -> Option<u64> {
        self.queue.next_deadline()
    }

    fn pop_due(&mut self) -> Option<FiredTimer> {
        let now = self.now_ms();
        self.queue.pop_due(now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equal_deadlines_fire_in_submission_order() {
        let mut clock = ManualClock::new();
        let a = clock.schedule(200, Timer::Respawn);
        let b = clock.schedule(200, Timer::Disappear { target_id: 1 });
        let c = clock.schedule(100, Timer::Disappear { target_id: 2 });

        clock.advance_to(200);
        let order: Vec<_> = std::iter::from_fn(|| clock.pop_due()).map(|f| f.handle).collect();
        assert_eq!(order, vec![c, a, b]);
    }

    #[test]
    fn test_not_due_before_deadline() {
        let mut clock = ManualClock::new();
        clock.schedule(2000, Timer::Disappear { target_id: 1 });
        clock.advance_to(1999);
        assert!(clock.pop_due().is_none());
        clock.advance_to(2000);
        let fired = clock.pop_due().unwrap();
        assert_eq!(fired.timer, Timer::Disappear { target_id: 1 });
        assert_eq!(fired.deadline_ms, 2000);
    }

    #[test]
    fn test_cancelled_timer_never_fires() {
        let mut clock = ManualClock::new();
        let handle = clock.schedule(50, Timer::Respawn);
        assert!(clock.cancel(handle));
        assert!(!clock.cancel(handle));
        clock.advance_to(1000);
        assert!(clock.pop_due().is_none());
        assert_eq!(clock.pending(), 0);
    }

    #[test]
    fn test_cancel_after_fire_is_noop() {
        let mut clock = ManualClock::new();
        let handle = clock.schedule(10, Timer::Respawn);
        clock.advance_to(10);
        assert!(clock.pop_due().is_some());
        assert!(!clock.cancel(handle));
    }

    #[test]
    fn test_manual_clock_never_goes_backwards() {
        let mut clock = ManualClock::new();
        clock.advance_to(500);
        clock.advance_to(100);
        assert_eq!(clock.now_ms(), 500);
    }

    #[test]
    fn test_system_clock_schedules_relative_to_now() {
        let mut clock = SystemClock::new();
        clock.schedule(60_000, Timer::Respawn);
        assert!(clock.next_deadline().unwrap() >= 60_000);
        assert!(clock.pop_due().is_none());
        let handle = clock.schedule(0, Timer::Respawn);
        assert_eq!(clock.pop_due().map(|f| f.handle), Some(handle));
    }
}
