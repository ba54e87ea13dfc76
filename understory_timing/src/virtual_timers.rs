// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A deterministic timer queue driven by explicit clock advances.
//!
//! ## Driving the queue
//!
//! The queue never moves on its own. A host loop (or a test) repeatedly pops expired timers up
//! to the time of the next external event, dispatches each one, and then advances the clock:
//!
//! ```
//! use core::time::Duration;
//! use understory_timing::{Timers, Timestamp, VirtualTimers};
//!
//! let mut timers = VirtualTimers::new();
//! timers.schedule(Duration::from_millis(50), 'a');
//! timers.schedule(Duration::from_millis(10), 'b');
//!
//! let until = Timestamp::from_millis(100);
//! let mut order = Vec::new();
//! while let Some(expired) = timers.pop_expired(until) {
//!     // Callbacks may schedule more timers here; they are seen by the next pop.
//!     order.push(expired.token);
//! }
//! timers.advance_to(until);
//! assert_eq!(order, ['b', 'a']);
//! assert_eq!(timers.now(), until);
//! ```
//!
//! Popping one timer at a time keeps re-entrant scheduling correct: a callback that schedules a
//! timer due before `until` sees it fire in the same drain.

use alloc::collections::BTreeMap;
use core::time::Duration;

use crate::clock::{TimerId, Timers, Timestamp};

/// A timer that came due.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Expired<T> {
    /// Handle returned when the timer was scheduled.
    pub id: TimerId,
    /// Time the timer was due. The queue clock reads this value while the expiry is dispatched.
    pub deadline: Timestamp,
    /// Token supplied at scheduling time.
    pub token: T,
}

/// Deterministic, manually advanced [`Timers`] implementation.
///
/// Timers with equal deadlines fire in scheduling order.
#[derive(Clone, Debug)]
pub struct VirtualTimers<T> {
    now: Timestamp,
    next_id: u64,
    // Keyed by (deadline, id); ids increase monotonically so ties keep scheduling order.
    queue: BTreeMap<(Timestamp, TimerId), T>,
    deadlines: BTreeMap<TimerId, Timestamp>,
}

impl<T> Default for VirtualTimers<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> VirtualTimers<T> {
    /// Create an empty queue with the clock at the epoch.
    pub fn new() -> Self {
        Self::starting_at(Timestamp::ZERO)
    }

    /// Create an empty queue with the clock at `now`.
    pub fn starting_at(now: Timestamp) -> Self {
        Self {
            now,
            next_id: 1,
            queue: BTreeMap::new(),
            deadlines: BTreeMap::new(),
        }
    }

    /// Number of pending timers.
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Whether `id` is still pending.
    pub fn is_pending(&self, id: TimerId) -> bool {
        self.deadlines.contains_key(&id)
    }

    /// Deadline of the earliest pending timer.
    pub fn next_deadline(&self) -> Option<Timestamp> {
        self.queue.keys().next().map(|&(deadline, _)| deadline)
    }

    /// Remove and return the earliest timer due at or before `until`.
    ///
    /// The clock moves forward to the timer's deadline (never backwards).
    pub fn pop_expired(&mut self, until: Timestamp) -> Option<Expired<T>> {
        let (&(deadline, id), _) = self.queue.first_key_value()?;
        if deadline > until {
            return None;
        }
        let token = self.queue.remove(&(deadline, id))?;
        self.deadlines.remove(&id);
        self.now = self.now.max(deadline);
        tracing::trace!(timer = id.into_raw(), at = deadline.as_millis(), "timer expired");
        Some(Expired {
            id,
            deadline,
            token,
        })
    }

    /// Move the clock to `until` without firing anything.
    ///
    /// Timers due before `until` stay queued and are still returned by
    /// [`pop_expired`](Self::pop_expired).
    pub fn advance_to(&mut self, until: Timestamp) {
        self.now = self.now.max(until);
    }

    /// Move the clock forward by `delta` without firing anything.
    pub fn advance_by(&mut self, delta: Duration) {
        self.now = self.now + delta;
    }
}

impl<T> Timers<T> for VirtualTimers<T> {
    fn now(&self) -> Timestamp {
        self.now
    }

    fn schedule(&mut self, delay: Duration, token: T) -> TimerId {
        let id = TimerId::from_raw(self.next_id);
        self.next_id += 1;
        let deadline = self.now + delay;
        self.queue.insert((deadline, id), token);
        self.deadlines.insert(id, deadline);
        tracing::trace!(timer = id.into_raw(), at = deadline.as_millis(), "timer scheduled");
        id
    }

    fn cancel(&mut self, id: TimerId) -> bool {
        let Some(deadline) = self.deadlines.remove(&id) else {
            return false;
        };
        self.queue.remove(&(deadline, id));
        tracing::trace!(timer = id.into_raw(), "timer cancelled");
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use alloc::vec::Vec;

    fn ms(v: u64) -> Timestamp {
        Timestamp::from_millis(v)
    }

    fn drain<T>(timers: &mut VirtualTimers<T>, until: Timestamp) -> Vec<T> {
        let mut out = Vec::new();
        while let Some(e) = timers.pop_expired(until) {
            out.push(e.token);
        }
        timers.advance_to(until);
        out
    }

    #[test]
    fn fires_in_deadline_order() {
        let mut t = VirtualTimers::new();
        t.schedule(Duration::from_millis(300), 3);
        t.schedule(Duration::from_millis(100), 1);
        t.schedule(Duration::from_millis(200), 2);
        assert_eq!(drain(&mut t, ms(1000)), vec![1, 2, 3]);
        assert_eq!(t.pending(), 0);
    }

    #[test]
    fn equal_deadlines_keep_scheduling_order() {
        let mut t = VirtualTimers::new();
        t.schedule(Duration::from_millis(1000), "throttle");
        t.schedule(Duration::from_millis(1000), "debounce");
        assert_eq!(drain(&mut t, ms(1000)), vec!["throttle", "debounce"]);
    }

    #[test]
    fn nothing_fires_before_deadline() {
        let mut t = VirtualTimers::new();
        t.schedule(Duration::from_millis(1000), ());
        assert!(drain(&mut t, ms(999)).is_empty());
        assert_eq!(t.now(), ms(999));
        assert_eq!(t.next_deadline(), Some(ms(1000)));
        assert_eq!(drain(&mut t, ms(1000)).len(), 1);
    }

    #[test]
    fn delays_are_relative_to_current_clock() {
        let mut t = VirtualTimers::starting_at(ms(400));
        t.schedule(Duration::from_millis(1000), ());
        assert_eq!(t.next_deadline(), Some(ms(1400)));
    }

    #[test]
    fn clock_reads_deadline_during_dispatch() {
        let mut t = VirtualTimers::new();
        t.schedule(Duration::from_millis(250), ());
        let e = t.pop_expired(ms(1000)).unwrap();
        assert_eq!(e.deadline, ms(250));
        assert_eq!(t.now(), ms(250));
    }

    #[test]
    fn cancel_removes_pending_only_once() {
        let mut t = VirtualTimers::new();
        let id = t.schedule(Duration::from_millis(10), ());
        assert!(t.is_pending(id));
        assert!(t.cancel(id));
        assert!(!t.cancel(id));
        assert!(!t.is_pending(id));
        assert!(drain(&mut t, ms(100)).is_empty());
    }

    #[test]
    fn cancel_after_fire_is_false() {
        let mut t = VirtualTimers::new();
        let id = t.schedule(Duration::from_millis(10), ());
        let _ = drain(&mut t, ms(10));
        assert!(!t.cancel(id));
    }

    #[test]
    fn reentrant_schedule_fires_in_same_drain() {
        let mut t = VirtualTimers::new();
        t.schedule(Duration::from_millis(10), 0_u32);
        let mut seen = Vec::new();
        while let Some(e) = t.pop_expired(ms(100)) {
            seen.push((e.token, e.deadline));
            if e.token < 2 {
                t.schedule(Duration::from_millis(10), e.token + 1);
            }
        }
        assert_eq!(seen, vec![(0, ms(10)), (1, ms(20)), (2, ms(30))]);
    }

    #[test]
    fn clock_never_moves_backwards() {
        let mut t: VirtualTimers<()> = VirtualTimers::starting_at(ms(500));
        t.advance_to(ms(100));
        assert_eq!(t.now(), ms(500));
        t.advance_by(Duration::from_millis(20));
        assert_eq!(t.now(), ms(520));
    }
}
