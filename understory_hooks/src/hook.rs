// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The hook protocol: lifecycle callbacks, capabilities, and the per-call context.

use core::time::Duration;

use serde_json::Value;
use understory_timing::{TimerId, Timers, Timestamp};

use crate::channel::PushEvent;
use crate::dom::{Dom, DomEvent};
use crate::error::HookError;

/// Identifier of a mounted hook instance.
///
/// Allocated by the [`HookHost`](crate::HookHost) and never reused within one host.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct InstanceId(pub(crate) u64);

impl InstanceId {
    /// The raw id value.
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// A hook-local timer discriminant.
///
/// Hooks that run several timers give each one a slot so expiries can be told apart.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerSlot(pub u8);

/// Token carried by every timer a hook schedules.
///
/// The host routes an expiry to `instance` and hands the hook `slot`; a hook can never observe
/// another instance's timers.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct TimerToken {
    /// Owner of the timer.
    pub instance: InstanceId,
    /// Which of the owner's timers this is.
    pub slot: TimerSlot,
}

bitflags::bitflags! {
    /// Callbacks a hook definition wants the host to deliver.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct Capabilities: u8 {
        /// [`Hook::mounted`].
        const MOUNTED   = 0b0000_0001;
        /// [`Hook::updated`].
        const UPDATED   = 0b0000_0010;
        /// [`Hook::destroyed`].
        const DESTROYED = 0b0000_0100;
        /// [`Hook::handle_event`].
        const EVENTS    = 0b0000_1000;
        /// [`Hook::timer_fired`].
        const TIMERS    = 0b0001_0000;
    }
}

/// A stateful behavior bound to one element.
///
/// All methods run on the host's control thread, one at a time. Methods not listed in the
/// definition's [`Capabilities`] are never called.
pub trait Hook<D: Dom> {
    /// The element entered the live tree. Acquire resources here.
    fn mounted(&mut self, cx: &mut HookContext<'_, D>) -> Result<(), HookError> {
        let _ = cx;
        Ok(())
    }

    /// The element's content was re-rendered while attached.
    fn updated(&mut self, cx: &mut HookContext<'_, D>) {
        let _ = cx;
    }

    /// The element left the live tree. Release everything; the instance is dropped afterwards.
    fn destroyed(&mut self, cx: &mut HookContext<'_, D>) {
        let _ = cx;
    }

    /// A DOM event targeted at (or broadcast to) the element.
    fn handle_event(&mut self, event: &DomEvent, cx: &mut HookContext<'_, D>) {
        let _ = (event, cx);
    }

    /// One of this instance's timers came due.
    fn timer_fired(&mut self, id: TimerId, slot: TimerSlot, cx: &mut HookContext<'_, D>) {
        let _ = (id, slot, cx);
    }
}

/// Everything a hook may touch during one callback.
pub struct HookContext<'a, D: Dom> {
    instance: InstanceId,
    el: D::Node,
    dom: &'a mut D,
    channel: &'a mut dyn PushEvent,
    timers: &'a mut dyn Timers<TimerToken>,
}

impl<D: Dom> core::fmt::Debug for HookContext<'_, D> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("HookContext")
            .field("instance", &self.instance)
            .field("el", &self.el)
            .finish_non_exhaustive()
    }
}

impl<'a, D: Dom> HookContext<'a, D> {
    pub(crate) fn new(
        instance: InstanceId,
        el: D::Node,
        dom: &'a mut D,
        channel: &'a mut dyn PushEvent,
        timers: &'a mut dyn Timers<TimerToken>,
    ) -> Self {
        Self {
            instance,
            el,
            dom,
            channel,
            timers,
        }
    }

    /// The instance being called.
    pub fn instance(&self) -> InstanceId {
        self.instance
    }

    /// The element the instance is bound to.
    pub fn el(&self) -> D::Node {
        self.el
    }

    /// Read access to the element tree.
    pub fn dom(&self) -> &D {
        &*self.dom
    }

    /// Write access to the element tree.
    pub fn dom_mut(&mut self) -> &mut D {
        &mut *self.dom
    }

    /// Current host time.
    pub fn now(&self) -> Timestamp {
        self.timers.now()
    }

    /// Notify the server.
    pub fn push_event(&mut self, event: &str, payload: Option<Value>) {
        tracing::trace!(instance = self.instance.0, event, "push_event");
        self.channel.push_event(event, payload);
    }

    /// Timers scoped to this instance: tokens are stamped with the instance id.
    pub fn timers(&mut self) -> ScopedTimers<'_> {
        ScopedTimers {
            instance: self.instance,
            inner: &mut *self.timers,
        }
    }
}

/// A view of the host's timers that schedules on behalf of one instance.
pub struct ScopedTimers<'a> {
    instance: InstanceId,
    inner: &'a mut dyn Timers<TimerToken>,
}

impl core::fmt::Debug for ScopedTimers<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ScopedTimers")
            .field("instance", &self.instance)
            .finish_non_exhaustive()
    }
}

impl Timers<TimerSlot> for ScopedTimers<'_> {
    fn now(&self) -> Timestamp {
        self.inner.now()
    }

    fn schedule(&mut self, delay: Duration, slot: TimerSlot) -> TimerId {
        self.inner.schedule(
            delay,
            TimerToken {
                instance: self.instance,
                slot,
            },
        )
    }

    fn cancel(&mut self, id: TimerId) -> bool {
        self.inner.cancel(id)
    }
}
