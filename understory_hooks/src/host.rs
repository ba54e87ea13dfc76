// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Hook instance lifecycle and dispatch.

use alloc::boxed::Box;
use alloc::collections::BTreeMap;
use alloc::string::{String, ToString};
use alloc::vec::Vec;

use understory_timing::{TimerId, Timers};

use crate::channel::PushEvent;
use crate::dom::{Dom, DomEvent};
use crate::error::HookError;
use crate::hook::{Capabilities, Hook, HookContext, InstanceId, TimerToken};
use crate::registry::HookRegistry;

/// The host services a lifecycle call needs: element tree, server channel, timers.
pub struct Env<'a, D: Dom> {
    /// Element tree.
    pub dom: &'a mut D,
    /// Outbound server channel.
    pub channel: &'a mut dyn PushEvent,
    /// Host timers, keyed by [`TimerToken`].
    pub timers: &'a mut dyn Timers<TimerToken>,
}

impl<D: Dom> core::fmt::Debug for Env<'_, D> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Env")
            .field("now", &self.timers.now())
            .finish_non_exhaustive()
    }
}

impl<'a, D: Dom> Env<'a, D> {
    /// Bundle the host services.
    pub fn new(
        dom: &'a mut D,
        channel: &'a mut dyn PushEvent,
        timers: &'a mut dyn Timers<TimerToken>,
    ) -> Self {
        Self {
            dom,
            channel,
            timers,
        }
    }

    fn context(&mut self, instance: InstanceId, el: D::Node) -> HookContext<'_, D> {
        HookContext::new(
            instance,
            el,
            &mut *self.dom,
            &mut *self.channel,
            &mut *self.timers,
        )
    }
}

struct Mounted<D: Dom> {
    name: String,
    el: D::Node,
    capabilities: Capabilities,
    hook: Box<dyn Hook<D>>,
}

/// Owns mounted hook instances and routes calls to them.
///
/// ## Usage
///
/// - [`mount`](Self::mount) when an element carrying a hook name enters the tree.
/// - [`update`](Self::update) after the element is re-rendered.
/// - [`dispatch`](Self::dispatch) or [`broadcast`](Self::broadcast) DOM events.
/// - [`fire_timer`](Self::fire_timer) for every expiry of a timer scheduled through
///   [`Env::timers`].
/// - [`destroy`](Self::destroy) when the element leaves.
///
/// Only callbacks named in the definition's [`Capabilities`] are delivered.
pub struct HookHost<D: Dom> {
    registry: HookRegistry<D>,
    instances: BTreeMap<InstanceId, Mounted<D>>,
    next_id: u64,
}

impl<D: Dom> core::fmt::Debug for HookHost<D> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let mut map = f.debug_map();
        for (id, m) in &self.instances {
            map.entry(&id.0, &(m.name.as_str(), m.el));
        }
        map.finish()
    }
}

impl<D: Dom> HookHost<D> {
    /// Create a host with no mounted instances.
    pub fn new(registry: HookRegistry<D>) -> Self {
        Self {
            registry,
            instances: BTreeMap::new(),
            next_id: 1,
        }
    }

    /// The registry instances are created from.
    pub fn registry(&self) -> &HookRegistry<D> {
        &self.registry
    }

    /// Instantiate the hook registered as `name`, bind it to `el`, and run `mounted`.
    ///
    /// If `mounted` fails, the half-built instance is given its `destroyed` callback (when it
    /// declares one) so it can release whatever it acquired, then discarded; the error is
    /// returned.
    pub fn mount(
        &mut self,
        name: &str,
        el: D::Node,
        env: &mut Env<'_, D>,
    ) -> Result<InstanceId, HookError> {
        let definition = self.registry.get(name)?;
        let capabilities = definition.capabilities();
        let mut hook = definition.instantiate();
        let id = InstanceId(self.next_id);
        self.next_id += 1;
        if capabilities.contains(Capabilities::MOUNTED) {
            if let Err(err) = hook.mounted(&mut env.context(id, el)) {
                if capabilities.contains(Capabilities::DESTROYED) {
                    hook.destroyed(&mut env.context(id, el));
                }
                tracing::warn!(instance = id.0, hook = name, %err, "hook failed to mount");
                return Err(err);
            }
        }
        tracing::debug!(instance = id.0, hook = name, ?el, "mounted hook");
        self.instances.insert(
            id,
            Mounted {
                name: name.to_string(),
                el,
                capabilities,
                hook,
            },
        );
        Ok(id)
    }

    /// Tell `id` its element was re-rendered.
    pub fn update(&mut self, id: InstanceId, env: &mut Env<'_, D>) -> Result<(), HookError> {
        let m = self.get_mut(id)?;
        if m.capabilities.contains(Capabilities::UPDATED) {
            m.hook.updated(&mut env.context(id, m.el));
        }
        Ok(())
    }

    /// Run `destroyed` on `id` and drop it.
    ///
    /// Destroying an instance twice is an [`UnknownInstance`](HookError::UnknownInstance) error;
    /// the first call already released everything.
    pub fn destroy(&mut self, id: InstanceId, env: &mut Env<'_, D>) -> Result<(), HookError> {
        let mut m = self
            .instances
            .remove(&id)
            .ok_or(HookError::UnknownInstance(id))?;
        if m.capabilities.contains(Capabilities::DESTROYED) {
            m.hook.destroyed(&mut env.context(id, m.el));
        }
        tracing::debug!(instance = id.0, hook = m.name.as_str(), "destroyed hook");
        Ok(())
    }

    /// Destroy every instance in mount order.
    pub fn destroy_all(&mut self, env: &mut Env<'_, D>) {
        let ids: Vec<InstanceId> = self.instances.keys().copied().collect();
        for id in ids {
            // Ids were just collected, so every destroy succeeds.
            let _ = self.destroy(id, env);
        }
    }

    /// Deliver `event` to `id`.
    pub fn dispatch(
        &mut self,
        id: InstanceId,
        event: &DomEvent,
        env: &mut Env<'_, D>,
    ) -> Result<(), HookError> {
        let m = self.get_mut(id)?;
        if m.capabilities.contains(Capabilities::EVENTS) {
            m.hook.handle_event(event, &mut env.context(id, m.el));
        }
        Ok(())
    }

    /// Deliver `event` to every instance that takes events, in mount order.
    pub fn broadcast(&mut self, event: &DomEvent, env: &mut Env<'_, D>) {
        for (&id, m) in &mut self.instances {
            if m.capabilities.contains(Capabilities::EVENTS) {
                m.hook.handle_event(event, &mut env.context(id, m.el));
            }
        }
    }

    /// Route a timer expiry to the instance named in `token`.
    ///
    /// Returns `false` if that instance is gone; the expiry is dropped.
    pub fn fire_timer(&mut self, id: TimerId, token: TimerToken, env: &mut Env<'_, D>) -> bool {
        let Some(m) = self.instances.get_mut(&token.instance) else {
            tracing::warn!(
                instance = token.instance.0,
                timer = id.into_raw(),
                "dropping expiry for unmounted hook"
            );
            return false;
        };
        if m.capabilities.contains(Capabilities::TIMERS) {
            let mut cx = env.context(token.instance, m.el);
            m.hook.timer_fired(id, token.slot, &mut cx);
        }
        true
    }

    /// Whether `id` is mounted.
    pub fn is_mounted(&self, id: InstanceId) -> bool {
        self.instances.contains_key(&id)
    }

    /// Registered name of the hook behind `id`.
    pub fn hook_name(&self, id: InstanceId) -> Option<&str> {
        self.instances.get(&id).map(|m| m.name.as_str())
    }

    /// Element `id` is bound to.
    pub fn element(&self, id: InstanceId) -> Option<D::Node> {
        self.instances.get(&id).map(|m| m.el)
    }

    /// Number of mounted instances.
    pub fn len(&self) -> usize {
        self.instances.len()
    }

    /// Whether nothing is mounted.
    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    fn get_mut(&mut self, id: InstanceId) -> Result<&mut Mounted<D>, HookError> {
        self.instances
            .get_mut(&id)
            .ok_or(HookError::UnknownInstance(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HooksConfig;
    use crate::hook::TimerSlot;
    use crate::memory::{MemoryDom, MemoryNode, RecordingChannel};
    use crate::registry::HookDefinition;
    use alloc::rc::Rc;
    use alloc::vec;
    use core::cell::RefCell;
    use core::time::Duration;
    use understory_timing::{Timestamp, VirtualTimers};

    type Log = Rc<RefCell<Vec<&'static str>>>;

    struct Counting {
        log: Log,
    }

    impl Hook<MemoryDom> for Counting {
        fn mounted(&mut self, cx: &mut HookContext<'_, MemoryDom>) -> Result<(), HookError> {
            self.log.borrow_mut().push("mounted");
            cx.timers().schedule(Duration::from_millis(10), TimerSlot(0));
            Ok(())
        }
        fn updated(&mut self, _: &mut HookContext<'_, MemoryDom>) {
            self.log.borrow_mut().push("updated");
        }
        fn destroyed(&mut self, _: &mut HookContext<'_, MemoryDom>) {
            self.log.borrow_mut().push("destroyed");
        }
        fn handle_event(&mut self, _: &DomEvent, _: &mut HookContext<'_, MemoryDom>) {
            self.log.borrow_mut().push("event");
        }
        fn timer_fired(&mut self, _: TimerId, _: TimerSlot, _: &mut HookContext<'_, MemoryDom>) {
            self.log.borrow_mut().push("timer");
        }
    }

    /// Schedules a timer, then fails; `destroyed` cancels what was scheduled.
    struct FailsToMount {
        pending: Option<TimerId>,
        log: Log,
    }

    impl Hook<MemoryDom> for FailsToMount {
        fn mounted(&mut self, cx: &mut HookContext<'_, MemoryDom>) -> Result<(), HookError> {
            self.pending = Some(cx.timers().schedule(Duration::from_millis(10), TimerSlot(0)));
            Err(HookError::UnknownHook("FailsToMount".into()))
        }
        fn destroyed(&mut self, cx: &mut HookContext<'_, MemoryDom>) {
            if let Some(id) = self.pending.take() {
                cx.timers().cancel(id);
            }
            self.log.borrow_mut().push("destroyed");
        }
    }

    fn failing_host(capabilities: Capabilities) -> (HookHost<MemoryDom>, Log) {
        let log = Log::default();
        let shared = log.clone();
        let mut registry = HookRegistry::new();
        registry.register(
            "FailsToMount",
            HookDefinition::new(capabilities, move || {
                Box::new(FailsToMount {
                    pending: None,
                    log: shared.clone(),
                })
            }),
        );
        (HookHost::new(registry), log)
    }

    fn counting_host(capabilities: Capabilities) -> (HookHost<MemoryDom>, Log) {
        let log = Log::default();
        let shared = log.clone();
        let mut registry = HookRegistry::new();
        registry.register(
            "Counting",
            HookDefinition::new(capabilities, move || {
                Box::new(Counting {
                    log: shared.clone(),
                })
            }),
        );
        (HookHost::new(registry), log)
    }

    #[test]
    fn lifecycle_respects_capabilities() {
        let mut dom = MemoryDom::new();
        let el = dom.insert(MemoryNode::new());
        let mut channel = RecordingChannel::default();
        let mut timers: VirtualTimers<TimerToken> = VirtualTimers::new();
        let mut env = Env::new(&mut dom, &mut channel, &mut timers);

        let (mut host, log) = counting_host(Capabilities::MOUNTED | Capabilities::DESTROYED);
        let id = host.mount("Counting", el, &mut env).unwrap();
        host.update(id, &mut env).unwrap();
        host.dispatch(id, &DomEvent::KeyUp, &mut env).unwrap();
        host.destroy(id, &mut env).unwrap();
        assert_eq!(*log.borrow(), vec!["mounted", "destroyed"]);
    }

    #[test]
    fn expiries_route_to_owner_and_drop_after_destroy() {
        let mut dom = MemoryDom::new();
        let a = dom.insert(MemoryNode::new());
        let b = dom.insert(MemoryNode::new());
        let mut channel = RecordingChannel::default();
        let mut timers: VirtualTimers<TimerToken> = VirtualTimers::new();
        let (mut host, log) = counting_host(Capabilities::all());

        let (first, second) = {
            let mut env = Env::new(&mut dom, &mut channel, &mut timers);
            let first = host.mount("Counting", a, &mut env).unwrap();
            let second = host.mount("Counting", b, &mut env).unwrap();
            host.destroy(first, &mut env).unwrap();
            (first, second)
        };
        assert_ne!(first, second);

        let mut routed = Vec::new();
        while let Some(e) = timers.pop_expired(Timestamp::from_millis(10)) {
            let mut env = Env::new(&mut dom, &mut channel, &mut timers);
            routed.push((e.token.instance, host.fire_timer(e.id, e.token, &mut env)));
        }
        assert_eq!(routed, [(first, false), (second, true)]);
        assert_eq!(*log.borrow(), vec!["mounted", "mounted", "destroyed", "timer"]);
    }

    #[test]
    fn second_destroy_reports_unknown_instance() {
        let mut dom = MemoryDom::new();
        let el = dom.insert(MemoryNode::new());
        let mut channel = RecordingChannel::default();
        let mut timers: VirtualTimers<TimerToken> = VirtualTimers::new();
        let mut env = Env::new(&mut dom, &mut channel, &mut timers);

        let registry = HookRegistry::standard(&HooksConfig::default()).unwrap();
        let mut host = HookHost::new(registry);
        let id = host.mount("InfiniteScroll", el, &mut env).unwrap();
        assert_eq!(host.hook_name(id), Some("InfiniteScroll"));
        host.destroy(id, &mut env).unwrap();
        assert_eq!(
            host.destroy(id, &mut env),
            Err(HookError::UnknownInstance(id))
        );
        assert!(host.is_empty());
    }

    #[test]
    fn failed_mount_runs_destroyed_and_leaves_no_timers() {
        let mut dom = MemoryDom::new();
        let el = dom.insert(MemoryNode::new());
        let mut channel = RecordingChannel::default();
        let mut timers: VirtualTimers<TimerToken> = VirtualTimers::new();
        let (mut host, log) = failing_host(Capabilities::MOUNTED | Capabilities::DESTROYED);
        {
            let mut env = Env::new(&mut dom, &mut channel, &mut timers);
            assert_eq!(
                host.mount("FailsToMount", el, &mut env),
                Err(HookError::UnknownHook("FailsToMount".into()))
            );
        }
        assert!(host.is_empty());
        assert_eq!(timers.pending(), 0);
        assert_eq!(*log.borrow(), vec!["destroyed"]);
    }

    #[test]
    fn failed_mount_without_destroyed_capability_skips_cleanup() {
        let mut dom = MemoryDom::new();
        let el = dom.insert(MemoryNode::new());
        let mut channel = RecordingChannel::default();
        let mut timers: VirtualTimers<TimerToken> = VirtualTimers::new();
        let (mut host, log) = failing_host(Capabilities::MOUNTED);
        let mut env = Env::new(&mut dom, &mut channel, &mut timers);
        assert!(host.mount("FailsToMount", el, &mut env).is_err());
        assert!(host.is_empty());
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn unknown_hook_name_mounts_nothing() {
        let mut dom = MemoryDom::new();
        let el = dom.insert(MemoryNode::new());
        let mut channel = RecordingChannel::default();
        let mut timers: VirtualTimers<TimerToken> = VirtualTimers::new();
        let mut env = Env::new(&mut dom, &mut channel, &mut timers);

        let mut host: HookHost<MemoryDom> = HookHost::new(HookRegistry::new());
        assert_eq!(
            host.mount("Missing", el, &mut env),
            Err(HookError::UnknownHook("Missing".into()))
        );
        assert_eq!(host.len(), 0);
    }
}
