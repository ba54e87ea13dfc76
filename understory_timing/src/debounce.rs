// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Trailing-edge debounce.

use core::time::Duration;

use crate::clock::{TimerId, Timers, whole_millis};
use crate::error::TimingError;

/// Trailing-edge debounce with a single pending timer.
///
/// Each [`schedule`](Self::schedule) cancels the previously pending timer before arming a new
/// one, so the trailing edge fires exactly one window after the last call of a burst.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Debounce {
    window: Duration,
    timer: Option<TimerId>,
}

impl Debounce {
    /// Create an idle debounce with the given window.
    pub fn new(window: Duration) -> Result<Self, TimingError> {
        if whole_millis(window) == 0 {
            return Err(TimingError::ZeroWindow { what: "debounce" });
        }
        Ok(Self {
            window,
            timer: None,
        })
    }

    /// Length of the window.
    pub fn window(&self) -> Duration {
        self.window
    }

    /// Whether a trailing edge is pending.
    pub fn is_pending(&self) -> bool {
        self.timer.is_some()
    }

    /// Handle of the pending timer, if any.
    pub fn pending_timer(&self) -> Option<TimerId> {
        self.timer
    }

    /// Restart the window, cancelling the previous pending timer first.
    pub fn schedule<T, S: Timers<T> + ?Sized>(&mut self, timers: &mut S, token: T) -> TimerId {
        if let Some(previous) = self.timer.take() {
            timers.cancel(previous);
        }
        let id = timers.schedule(self.window, token);
        self.timer = Some(id);
        id
    }

    /// Feed a timer expiry. Returns `true` if the trailing edge fired.
    ///
    /// Expiries of superseded or unrelated timers return `false`.
    pub fn expire(&mut self, id: TimerId) -> bool {
        if self.timer != Some(id) {
            return false;
        }
        self.timer = None;
        true
    }

    /// Drop the pending trailing edge. Returns `true` if one was pending.
    pub fn cancel<T, S: Timers<T> + ?Sized>(&mut self, timers: &mut S) -> bool {
        match self.timer.take() {
            Some(id) => {
                timers.cancel(id);
                true
            }
            None => false,
        }
    }
}
