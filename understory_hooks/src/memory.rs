// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! In-memory host: an element tree, a recording channel, and a page harness.
//!
//! These types back the crate's tests and demos, and are a reasonable starting point for
//! headless hosts that only need geometry, classes, and form values.

use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::time::Duration;

use kurbo::Rect;
use serde_json::Value;
use understory_timing::{Timers, Timestamp, VirtualTimers};

use crate::channel::PushEvent;
use crate::config::HooksConfig;
use crate::dom::{Dom, DomEvent};
use crate::error::HookError;
use crate::hook::{InstanceId, TimerToken};
use crate::host::{Env, HookHost};
use crate::registry::HookRegistry;

/// Key of a node in a [`MemoryDom`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(u32);

/// One element: optional document id, classes, form value, and layout bounds.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MemoryNode {
    id: Option<String>,
    classes: Vec<String>,
    value: String,
    bounds: Option<Rect>,
}

impl MemoryNode {
    /// An element with no id, classes, value, or layout.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the document id.
    pub fn with_id(mut self, id: &str) -> Self {
        self.id = Some(id.to_string());
        self
    }

    /// Add a class.
    pub fn with_class(mut self, class: &str) -> Self {
        if !self.has_class(class) {
            self.classes.push(class.to_string());
        }
        self
    }

    /// Set the form value.
    pub fn with_value(mut self, value: &str) -> Self {
        self.value = value.to_string();
        self
    }

    /// Lay the element out at `bounds`.
    pub fn with_bounds(mut self, bounds: Rect) -> Self {
        self.bounds = Some(bounds);
        self
    }

    /// Document id, if any.
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// Current form value.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Whether the element carries `class`.
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    /// Classes in insertion order.
    pub fn classes(&self) -> impl Iterator<Item = &str> + '_ {
        self.classes.iter().map(String::as_str)
    }

    /// Layout bounds, or `None` if not laid out.
    pub fn bounds(&self) -> Option<Rect> {
        self.bounds
    }
}

/// A flat element store implementing [`Dom`].
///
/// Removed slots are never reused, so a stale [`NodeId`] simply stops resolving.
#[derive(Clone, Debug, Default)]
pub struct MemoryDom {
    nodes: Vec<Option<MemoryNode>>,
    viewport: Option<Rect>,
}

impl MemoryDom {
    /// An empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `node` and return its key.
    pub fn insert(&mut self, node: MemoryNode) -> NodeId {
        let id = NodeId(u32::try_from(self.nodes.len()).unwrap_or(u32::MAX));
        self.nodes.push(Some(node));
        id
    }

    /// Remove a node, returning it.
    pub fn remove(&mut self, id: NodeId) -> Option<MemoryNode> {
        self.nodes.get_mut(id.0 as usize)?.take()
    }

    /// Look up a live node.
    pub fn get(&self, id: NodeId) -> Option<&MemoryNode> {
        self.nodes.get(id.0 as usize)?.as_ref()
    }

    /// Look up a live node mutably.
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut MemoryNode> {
        self.nodes.get_mut(id.0 as usize)?.as_mut()
    }

    /// Move a node, or take it out of layout with `None`. Returns `false` if the node is gone.
    pub fn set_bounds(&mut self, id: NodeId, bounds: Option<Rect>) -> bool {
        match self.get_mut(id) {
            Some(node) => {
                node.bounds = bounds;
                true
            }
            None => false,
        }
    }

    /// Set the viewport reported to hooks that mount from now on.
    pub fn set_viewport(&mut self, viewport: Option<Rect>) {
        self.viewport = viewport;
    }

    /// Overwrite a node's form value. Returns `false` if the node is gone.
    pub fn set_value(&mut self, id: NodeId, value: &str) -> bool {
        match self.get_mut(id) {
            Some(node) => {
                node.value = value.to_string();
                true
            }
            None => false,
        }
    }
}

impl Dom for MemoryDom {
    type Node = NodeId;

    fn element_by_id(&self, id: &str) -> Option<NodeId> {
        self.nodes.iter().enumerate().find_map(|(i, n)| {
            n.as_ref()
                .filter(|n| n.id() == Some(id))
                .and_then(|_| u32::try_from(i).ok().map(NodeId))
        })
    }

    fn viewport(&self) -> Option<Rect> {
        self.viewport
    }

    fn bounding_rect(&self, node: NodeId) -> Option<Rect> {
        self.get(node)?.bounds
    }

    fn remove_class(&mut self, node: NodeId, class: &str) -> bool {
        let Some(n) = self.get_mut(node) else {
            return false;
        };
        let before = n.classes.len();
        n.classes.retain(|c| c != class);
        before != n.classes.len()
    }

    fn clear_value(&mut self, node: NodeId) {
        if let Some(n) = self.get_mut(node) {
            n.value.clear();
        }
    }
}

/// One notification captured by a [`RecordingChannel`].
#[derive(Clone, Debug, PartialEq)]
pub struct SentEvent {
    /// Event name.
    pub event: String,
    /// Payload, if any.
    pub payload: Option<Value>,
    /// Channel clock when the event was pushed.
    pub at: Timestamp,
}

/// A [`PushEvent`] sink that records everything, stamped with a host-driven clock.
#[derive(Clone, Debug, Default)]
pub struct RecordingChannel {
    now: Timestamp,
    sent: Vec<SentEvent>,
}

impl RecordingChannel {
    /// Set the time stamped onto subsequent events.
    pub fn set_now(&mut self, now: Timestamp) {
        self.now = now;
    }

    /// Everything pushed so far, in order.
    pub fn sent(&self) -> &[SentEvent] {
        &self.sent
    }

    /// Event names in push order.
    pub fn names(&self) -> Vec<&str> {
        self.sent.iter().map(|s| s.event.as_str()).collect()
    }

    /// How many times `event` was pushed.
    pub fn count(&self, event: &str) -> usize {
        self.sent.iter().filter(|s| s.event == event).count()
    }

    /// Forget everything recorded.
    pub fn clear(&mut self) {
        self.sent.clear();
    }
}

impl PushEvent for RecordingChannel {
    fn push_event(&mut self, event: &str, payload: Option<Value>) {
        self.sent.push(SentEvent {
            event: event.to_string(),
            payload,
            at: self.now,
        });
    }
}

/// A whole simulated page: element tree, channel, virtual clock, and hook host.
///
/// Events are delivered at the current virtual time; [`advance_to`](Self::advance_to) moves the
/// clock and fires every timer that comes due on the way, in deadline order.
#[derive(Debug)]
pub struct Page {
    dom: MemoryDom,
    channel: RecordingChannel,
    timers: VirtualTimers<TimerToken>,
    host: HookHost<MemoryDom>,
}

impl Page {
    /// A page whose host runs the standard hooks configured from `config`.
    pub fn new(config: &HooksConfig) -> Result<Self, HookError> {
        Ok(Self::with_registry(HookRegistry::standard(config)?))
    }

    /// A page whose host runs the hooks in `registry`.
    pub fn with_registry(registry: HookRegistry<MemoryDom>) -> Self {
        Self {
            dom: MemoryDom::new(),
            channel: RecordingChannel::default(),
            timers: VirtualTimers::new(),
            host: HookHost::new(registry),
        }
    }

    /// The element tree.
    pub fn dom(&self) -> &MemoryDom {
        &self.dom
    }

    /// The element tree, mutably (to add nodes or move them).
    pub fn dom_mut(&mut self) -> &mut MemoryDom {
        &mut self.dom
    }

    /// Everything hooks pushed to the server.
    pub fn channel(&self) -> &RecordingChannel {
        &self.channel
    }

    /// The hook host.
    pub fn host(&self) -> &HookHost<MemoryDom> {
        &self.host
    }

    /// The virtual timers.
    pub fn timers(&self) -> &VirtualTimers<TimerToken> {
        &self.timers
    }

    /// Current virtual time.
    pub fn now(&self) -> Timestamp {
        self.timers.now()
    }

    /// Mount the hook registered as `name` on `el`.
    pub fn mount(&mut self, name: &str, el: NodeId) -> Result<InstanceId, HookError> {
        self.with_env(|host, env| host.mount(name, el, env))
    }

    /// Re-render the element behind `id`.
    pub fn update(&mut self, id: InstanceId) -> Result<(), HookError> {
        self.with_env(|host, env| host.update(id, env))
    }

    /// Remove the element behind `id`.
    pub fn destroy(&mut self, id: InstanceId) -> Result<(), HookError> {
        self.with_env(|host, env| host.destroy(id, env))
    }

    /// Deliver `event` to `id` at the current time.
    pub fn dispatch(&mut self, id: InstanceId, event: &DomEvent) -> Result<(), HookError> {
        self.with_env(|host, env| host.dispatch(id, event, env))
    }

    /// A key release on `id`'s element.
    pub fn keyup(&mut self, id: InstanceId) -> Result<(), HookError> {
        self.dispatch(id, &DomEvent::KeyUp)
    }

    /// A value change on `id`'s element.
    pub fn input(&mut self, id: InstanceId) -> Result<(), HookError> {
        self.dispatch(id, &DomEvent::Input)
    }

    /// Move the viewport and tell every hook.
    ///
    /// Hooks mounted later see this viewport through [`Dom::viewport`].
    pub fn scroll_to(&mut self, viewport: Rect) {
        self.dom.set_viewport(Some(viewport));
        self.with_env(|host, env| host.broadcast(&DomEvent::Viewport(viewport), env));
    }

    /// Advance the clock to `until`, firing due timers. Returns how many expiries were delivered.
    pub fn advance_to(&mut self, until: Timestamp) -> usize {
        let mut fired = 0;
        while let Some(expired) = self.timers.pop_expired(until) {
            let Self {
                dom,
                channel,
                timers,
                host,
            } = self;
            channel.set_now(expired.deadline);
            let mut env = Env::new(dom, channel, timers);
            if host.fire_timer(expired.id, expired.token, &mut env) {
                fired += 1;
            }
        }
        self.timers.advance_to(until);
        self.channel.set_now(self.timers.now());
        fired
    }

    /// Advance the clock by `delta`, firing due timers.
    pub fn advance_by(&mut self, delta: Duration) -> usize {
        let until = self.timers.now().saturating_add(delta);
        self.advance_to(until)
    }

    fn with_env<R>(
        &mut self,
        f: impl FnOnce(&mut HookHost<MemoryDom>, &mut Env<'_, MemoryDom>) -> R,
    ) -> R {
        let Self {
            dom,
            channel,
            timers,
            host,
        } = self;
        channel.set_now(timers.now());
        let mut env = Env::new(dom, channel, timers);
        f(host, &mut env)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::{END_TYPING, LOAD_MORE, START_TYPING};

    #[test]
    fn element_lookup_skips_removed_nodes() {
        let mut dom = MemoryDom::new();
        let a = dom.insert(MemoryNode::new().with_id("x"));
        assert_eq!(dom.element_by_id("x"), Some(a));
        assert!(dom.remove(a).is_some());
        assert_eq!(dom.element_by_id("x"), None);
        assert_eq!(dom.bounding_rect(a), None);
        assert!(!dom.remove_class(a, "skeleton"));
        let b = dom.insert(MemoryNode::new().with_id("x"));
        assert_ne!(a, b);
        assert_eq!(dom.element_by_id("x"), Some(b));
    }

    #[test]
    fn remove_class_reports_change() {
        let mut dom = MemoryDom::new();
        let a = dom.insert(MemoryNode::new().with_class("skeleton"));
        assert!(dom.remove_class(a, "skeleton"));
        assert!(!dom.remove_class(a, "skeleton"));
        assert_eq!(dom.get(a).unwrap().classes().count(), 0);
    }

    #[test]
    fn page_stamps_events_with_virtual_time() {
        let mut page = Page::new(&HooksConfig::default()).unwrap();
        let field = page.dom_mut().insert(MemoryNode::new());
        let id = page.mount("MessageInput", field).unwrap();
        page.advance_to(Timestamp::from_millis(250));
        page.keyup(id).unwrap();
        assert_eq!(page.advance_by(Duration::from_millis(5000)), 2);
        let stamps: Vec<_> = page
            .channel()
            .sent()
            .iter()
            .map(|s| (s.event.as_str(), s.at.as_millis()))
            .collect();
        assert_eq!(stamps, [(START_TYPING, 250), (END_TYPING, 1250)]);
        assert_eq!(page.now(), Timestamp::from_millis(5250));
    }

    #[test]
    fn page_broadcasts_viewport_to_every_sentinel() {
        let mut page = Page::new(&HooksConfig::default()).unwrap();
        let top = page
            .dom_mut()
            .insert(MemoryNode::new().with_bounds(Rect::new(0.0, 500.0, 400.0, 510.0)));
        let bottom = page
            .dom_mut()
            .insert(MemoryNode::new().with_bounds(Rect::new(0.0, 5000.0, 400.0, 5010.0)));
        page.mount("InfiniteScroll", top).unwrap();
        page.mount("InfiniteScroll", bottom).unwrap();
        page.scroll_to(Rect::new(0.0, 0.0, 400.0, 1000.0));
        assert_eq!(page.channel().count(LOAD_MORE), 1);
        page.scroll_to(Rect::new(0.0, 4500.0, 400.0, 5500.0));
        assert_eq!(page.channel().count(LOAD_MORE), 2);
    }

    #[test]
    fn page_remembers_last_viewport() {
        let mut page = Page::new(&HooksConfig::default()).unwrap();
        assert_eq!(page.dom().viewport(), None);
        let v = Rect::new(0.0, 300.0, 400.0, 1300.0);
        page.scroll_to(v);
        assert_eq!(page.dom().viewport(), Some(v));
    }
}
