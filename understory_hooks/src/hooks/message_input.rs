// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Typing presence for a message composer.
//!
//! ## Overview
//!
//! Every `keyup` or `input` on the bound field is an edit. The hook turns the stream of edits
//! into two server notifications:
//!
//! - [`START_TYPING`] on the first edit of a session, and (with `keep_alive`) again at most once
//!   per throttle window while edits keep arriving.
//! - [`END_TYPING`] once no edit has arrived for a full debounce window.
//!
//! Both timers belong to the instance: their tokens carry its [`InstanceId`](crate::InstanceId),
//! so two composers on one page never see each other's expiries.

use core::marker::PhantomData;

use understory_timing::{Debounce, Throttle, TimerId};

use crate::channel::{END_TYPING, START_TYPING};
use crate::config::MessageInputConfig;
use crate::dom::{Dom, DomEvent};
use crate::error::HookError;
use crate::hook::{Hook, HookContext, TimerSlot};

const THROTTLE: TimerSlot = TimerSlot(0);
const DEBOUNCE: TimerSlot = TimerSlot(1);

/// Whether a typing session is open.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum TypingState {
    /// No session; the next edit starts one.
    #[default]
    Idle,
    /// `start_typing` was sent and `end_typing` is pending.
    Typing,
}

/// Emits `start_typing`/`end_typing` around bursts of edits.
pub struct MessageInput<D> {
    state: TypingState,
    throttle: Throttle,
    debounce: Debounce,
    keep_alive: bool,
    sessions: u64,
    _dom: PhantomData<fn() -> D>,
}

impl<D> core::fmt::Debug for MessageInput<D> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("MessageInput")
            .field("state", &self.state)
            .field("throttle", &self.throttle)
            .field("debounce", &self.debounce)
            .field("keep_alive", &self.keep_alive)
            .field("sessions", &self.sessions)
            .finish()
    }
}

impl<D> Clone for MessageInput<D> {
    fn clone(&self) -> Self {
        Self {
            state: self.state,
            throttle: self.throttle.clone(),
            debounce: self.debounce.clone(),
            keep_alive: self.keep_alive,
            sessions: self.sessions,
            _dom: PhantomData,
        }
    }
}

impl<D> MessageInput<D> {
    /// Build an idle hook. Fails if either window rounds to zero milliseconds.
    pub fn new(config: &MessageInputConfig) -> Result<Self, HookError> {
        Ok(Self {
            state: TypingState::Idle,
            throttle: Throttle::new(config.throttle_window())?,
            debounce: Debounce::new(config.debounce_window())?,
            keep_alive: config.keep_alive,
            sessions: 0,
            _dom: PhantomData,
        })
    }

    /// Current session state.
    pub fn state(&self) -> TypingState {
        self.state
    }

    /// Whether further `start_typing` notifications are being suppressed.
    pub fn is_throttled(&self) -> bool {
        self.throttle.is_active()
    }

    /// Whether an `end_typing` is scheduled.
    pub fn is_stop_pending(&self) -> bool {
        self.debounce.is_pending()
    }

    /// Sessions opened so far.
    pub fn sessions(&self) -> u64 {
        self.sessions
    }
}

impl<D: Dom> MessageInput<D> {
    fn on_edit(&mut self, cx: &mut HookContext<'_, D>) {
        let start = match self.state {
            TypingState::Idle => {
                // A session always opens with a start, even if an old window is still running.
                self.throttle.cancel(&mut cx.timers());
                self.throttle.try_acquire(&mut cx.timers(), THROTTLE);
                self.sessions += 1;
                true
            }
            TypingState::Typing => {
                self.keep_alive && self.throttle.try_acquire(&mut cx.timers(), THROTTLE)
            }
        };
        self.state = TypingState::Typing;
        if start {
            cx.push_event(START_TYPING, None);
        }
        self.debounce.schedule(&mut cx.timers(), DEBOUNCE);
    }
}

impl<D: Dom> Hook<D> for MessageInput<D> {
    fn mounted(&mut self, cx: &mut HookContext<'_, D>) -> Result<(), HookError> {
        tracing::debug!(
            instance = cx.instance().get(),
            throttle = ?self.throttle.window(),
            debounce = ?self.debounce.window(),
            "message input mounted"
        );
        Ok(())
    }

    fn destroyed(&mut self, cx: &mut HookContext<'_, D>) {
        self.throttle.cancel(&mut cx.timers());
        self.debounce.cancel(&mut cx.timers());
        if self.state == TypingState::Typing {
            tracing::debug!(
                instance = cx.instance().get(),
                "message input destroyed mid-session"
            );
        }
        self.state = TypingState::Idle;
    }

    fn handle_event(&mut self, event: &DomEvent, cx: &mut HookContext<'_, D>) {
        if event.is_edit() {
            self.on_edit(cx);
        }
    }

    fn timer_fired(&mut self, id: TimerId, slot: TimerSlot, cx: &mut HookContext<'_, D>) {
        match slot {
            THROTTLE => {
                self.throttle.expire(id);
            }
            DEBOUNCE => {
                if self.debounce.expire(id) {
                    self.state = TypingState::Idle;
                    cx.push_event(END_TYPING, None);
                }
            }
            other => {
                tracing::warn!(
                    instance = cx.instance().get(),
                    slot = other.0,
                    "message input ignoring unknown timer slot"
                );
            }
        }
    }
}
