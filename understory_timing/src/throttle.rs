// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Leading-edge throttle.

use core::time::Duration;

use crate::clock::{TimerId, Timers, whole_millis};
use crate::error::TimingError;

/// Leading-edge throttle: at most one pass per window.
///
/// The first [`try_acquire`](Self::try_acquire) passes and arms a window timer.
/// Every further call is rejected until that timer is fed back through
/// [`expire`](Self::expire), which reopens the throttle.
/// Rejected calls do not extend the window.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Throttle {
    window: Duration,
    active: bool,
    timer: Option<TimerId>,
}

impl Throttle {
    /// Create an open throttle with the given window.
    pub fn new(window: Duration) -> Result<Self, TimingError> {
        if whole_millis(window) == 0 {
            return Err(TimingError::ZeroWindow { what: "throttle" });
        }
        Ok(Self {
            window,
            active: false,
            timer: None,
        })
    }

    /// Length of the window.
    pub fn window(&self) -> Duration {
        self.window
    }

    /// Whether a window is currently open (calls are being rejected).
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Handle of the pending window timer, if any.
    pub fn pending_timer(&self) -> Option<TimerId> {
        self.timer
    }

    /// Returns `true` if this call is the leading edge of a new window.
    ///
    /// On a pass, a window timer carrying `token` is scheduled on `timers`.
    pub fn try_acquire<T, S: Timers<T> + ?Sized>(&mut self, timers: &mut S, token: T) -> bool {
        if self.active {
            return false;
        }
        self.active = true;
        self.timer = Some(timers.schedule(self.window, token));
        true
    }

    /// Feed a timer expiry. Returns `true` if it was this throttle's window timer.
    ///
    /// Unrelated ids are ignored, so callers may offer every expiry they own.
    pub fn expire(&mut self, id: TimerId) -> bool {
        if self.timer != Some(id) {
            return false;
        }
        self.timer = None;
        self.active = false;
        true
    }

    /// Cancel the window timer and reopen the throttle.
    pub fn cancel<T, S: Timers<T> + ?Sized>(&mut self, timers: &mut S) {
        if let Some(id) = self.timer.take() {
            timers.cancel(id);
        }
        self.active = false;
    }
}
