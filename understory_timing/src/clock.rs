// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Time points, timer handles, and the [`Timers`] scheduling seam.

use core::ops::Add;
use core::time::Duration;

/// A point on the host's monotonic timeline, in whole milliseconds.
///
/// The epoch is whatever the host chooses (page load, process start, zero in tests).
/// Arithmetic saturates instead of wrapping.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(u64);

impl Timestamp {
    /// The epoch.
    pub const ZERO: Self = Self(0);

    /// Create a timestamp `ms` milliseconds after the epoch.
    pub const fn from_millis(ms: u64) -> Self {
        Self(ms)
    }

    /// Milliseconds since the epoch.
    pub const fn as_millis(self) -> u64 {
        self.0
    }

    /// Add a duration, saturating at the end of the timeline.
    pub fn saturating_add(self, delay: Duration) -> Self {
        Self(self.0.saturating_add(whole_millis(delay)))
    }

    /// Time elapsed since `earlier`, or zero if `earlier` is in the future.
    pub fn saturating_duration_since(self, earlier: Self) -> Duration {
        Duration::from_millis(self.0.saturating_sub(earlier.0))
    }
}

impl Add<Duration> for Timestamp {
    type Output = Self;

    fn add(self, rhs: Duration) -> Self {
        self.saturating_add(rhs)
    }
}

/// Whole milliseconds in `d`, truncating sub-millisecond precision.
pub(crate) fn whole_millis(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

/// Handle of a scheduled timer.
///
/// Handles are opaque to the primitives in this crate; they are only compared for equality.
/// A [`Timers`] implementation must not hand out the same handle twice while the first timer
/// is still pending.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerId(u64);

impl TimerId {
    /// Wrap a host-provided raw timer handle.
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// The raw handle value.
    pub const fn into_raw(self) -> u64 {
        self.0
    }
}

/// A source of one-shot timers.
///
/// Implementations run on the same control thread as the code that schedules timers.
/// When a timer comes due the host calls back into its owner (usually by matching on the
/// token) and the owner feeds the [`TimerId`] to the primitive that scheduled it.
pub trait Timers<T> {
    /// Current time on the host timeline.
    fn now(&self) -> Timestamp;

    /// Schedule `token` to come due `delay` from now.
    fn schedule(&mut self, delay: Duration, token: T) -> TimerId;

    /// Cancel a pending timer. Returns `false` if it already fired or was cancelled.
    fn cancel(&mut self, id: TimerId) -> bool;
}

impl<T, S: Timers<T> + ?Sized> Timers<T> for &mut S {
    fn now(&self) -> Timestamp {
        (**self).now()
    }

    fn schedule(&mut self, delay: Duration, token: T) -> TimerId {
        (**self).schedule(delay, token)
    }

    fn cancel(&mut self, id: TimerId) -> bool {
        (**self).cancel(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timestamp_add_saturates() {
        let end = Timestamp::from_millis(u64::MAX - 5);
        assert_eq!(
            end + Duration::from_millis(10),
            Timestamp::from_millis(u64::MAX)
        );
        assert_eq!(
            Timestamp::ZERO + Duration::from_millis(1400),
            Timestamp::from_millis(1400)
        );
    }

    #[test]
    fn sub_millisecond_delays_truncate() {
        assert_eq!(whole_millis(Duration::from_micros(999)), 0);
        assert_eq!(whole_millis(Duration::from_micros(1500)), 1);
    }

    #[test]
    fn duration_since_never_negative() {
        let a = Timestamp::from_millis(400);
        let b = Timestamp::from_millis(1400);
        assert_eq!(b.saturating_duration_since(a), Duration::from_millis(1000));
        assert_eq!(a.saturating_duration_since(b), Duration::ZERO);
    }
}
