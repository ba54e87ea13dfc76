// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Visibility-triggered pagination.
//!
//! The hook is bound to a sentinel element placed after the last item of a list.
//! While mounted it owns one [`IntersectionObserver`] watching the sentinel. Each
//! [`DomEvent::Viewport`] is measured, and when the first reported entry is intersecting the hook
//! pushes [`LOAD_MORE`] with an empty object payload.
//!
//! The sentinel is also measured once at mount against [`Dom::viewport`], so a sentinel that is
//! already visible when the hook attaches loads the next page without waiting for a scroll.
//!
//! Because the observer only reports changes, a sentinel that stays in view across many scroll
//! events triggers once; it has to leave the (margin-expanded) viewport and come back to trigger
//! again.

use alloc::string::String;

use kurbo::Rect;
use serde_json::json;
use understory_visibility::{IntersectionEntry, IntersectionObserver, ObserverOptions};

use crate::channel::LOAD_MORE;
use crate::config::InfiniteScrollConfig;
use crate::dom::{Dom, DomEvent};
use crate::error::HookError;
use crate::hook::{Hook, HookContext};

/// Pushes `load-more` whenever the bound sentinel scrolls into view.
pub struct InfiniteScroll<D: Dom> {
    options: ObserverOptions,
    skeleton_id: Option<String>,
    skeleton_class: String,
    skeleton: Option<D::Node>,
    observer: Option<IntersectionObserver<D::Node>>,
}

impl<D: Dom> core::fmt::Debug for InfiniteScroll<D> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("InfiniteScroll")
            .field("options", &self.options)
            .field("skeleton", &self.skeleton)
            .field("observing", &self.observer.is_some())
            .finish_non_exhaustive()
    }
}

impl<D: Dom> Clone for InfiniteScroll<D> {
    fn clone(&self) -> Self {
        Self {
            options: self.options.clone(),
            skeleton_id: self.skeleton_id.clone(),
            skeleton_class: self.skeleton_class.clone(),
            skeleton: self.skeleton,
            observer: self.observer.clone(),
        }
    }
}

impl<D: Dom> InfiniteScroll<D> {
    /// Build an unmounted hook, validating the root margin and threshold.
    pub fn new(config: &InfiniteScrollConfig) -> Result<Self, HookError> {
        Ok(Self {
            options: ObserverOptions::parse(&config.root_margin, config.threshold)?,
            skeleton_id: config.skeleton_id.clone(),
            skeleton_class: config.skeleton_class.clone(),
            skeleton: None,
            observer: None,
        })
    }

    /// Whether a visibility subscription is active.
    pub fn is_observing(&self) -> bool {
        self.observer.is_some()
    }

    /// The skeleton element found at mount time, if any.
    pub fn skeleton(&self) -> Option<D::Node> {
        self.skeleton
    }

    fn on_viewport(&mut self, viewport: Rect, cx: &mut HookContext<'_, D>) {
        let Some(observer) = self.observer.as_mut() else {
            return;
        };
        let dom = cx.dom();
        let entries = observer.update(viewport, &|node: &D::Node| dom.bounding_rect(*node));
        self.on_entries(&entries, cx);
    }

    // The sentinel is the only observed target, so only the first entry matters.
    fn on_entries(&self, entries: &[IntersectionEntry<D::Node>], cx: &mut HookContext<'_, D>) {
        let Some(first) = entries.first() else {
            return;
        };
        tracing::trace!(
            instance = cx.instance().get(),
            ratio = first.intersection_ratio,
            intersecting = first.is_intersecting,
            "sentinel visibility changed"
        );
        if first.is_intersecting {
            cx.push_event(LOAD_MORE, Some(json!({})));
        }
    }
}

impl<D: Dom> Hook<D> for InfiniteScroll<D> {
    fn mounted(&mut self, cx: &mut HookContext<'_, D>) -> Result<(), HookError> {
        self.skeleton = self
            .skeleton_id
            .as_deref()
            .and_then(|id| cx.dom().element_by_id(id));
        let mut observer = IntersectionObserver::new(self.options.clone());
        observer.observe(cx.el());
        // Replacing drops any previous subscription, keeping at most one alive.
        self.observer = Some(observer);
        tracing::debug!(
            instance = cx.instance().get(),
            skeleton = self.skeleton.is_some(),
            "infinite scroll observing sentinel"
        );
        if let Some(viewport) = cx.dom().viewport() {
            self.on_viewport(viewport, cx);
        }
        Ok(())
    }

    fn updated(&mut self, cx: &mut HookContext<'_, D>) {
        if let Some(skeleton) = self.skeleton {
            cx.dom_mut().remove_class(skeleton, &self.skeleton_class);
        }
    }

    fn destroyed(&mut self, cx: &mut HookContext<'_, D>) {
        match self.observer.take() {
            Some(mut observer) => {
                observer.disconnect();
                tracing::debug!(
                    instance = cx.instance().get(),
                    "infinite scroll released observer"
                );
            }
            None => {
                tracing::trace!(
                    instance = cx.instance().get(),
                    "infinite scroll already released"
                );
            }
        }
    }

    fn handle_event(&mut self, event: &DomEvent, cx: &mut HookContext<'_, D>) {
        if let DomEvent::Viewport(viewport) = event {
            self.on_viewport(*viewport, cx);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hook::{InstanceId, TimerToken};
    use crate::memory::{MemoryDom, MemoryNode, NodeId, RecordingChannel};
    use alloc::vec::Vec;
    use understory_timing::VirtualTimers;

    struct Fixture {
        dom: MemoryDom,
        channel: RecordingChannel,
        timers: VirtualTimers<TimerToken>,
        sentinel: NodeId,
    }

    impl Fixture {
        fn new() -> Self {
            let mut dom = MemoryDom::new();
            let sentinel =
                dom.insert(MemoryNode::new().with_bounds(Rect::new(0.0, 2000.0, 400.0, 2010.0)));
            Self {
                dom,
                channel: RecordingChannel::default(),
                timers: VirtualTimers::new(),
                sentinel,
            }
        }

        fn with<R>(&mut self, f: impl FnOnce(&mut HookContext<'_, MemoryDom>) -> R) -> R {
            let mut cx = HookContext::new(
                InstanceId(1),
                self.sentinel,
                &mut self.dom,
                &mut self.channel,
                &mut self.timers,
            );
            f(&mut cx)
        }
    }

    fn in_view() -> DomEvent {
        DomEvent::Viewport(Rect::new(0.0, 1500.0, 400.0, 2500.0))
    }

    fn out_of_view() -> DomEvent {
        DomEvent::Viewport(Rect::new(0.0, 0.0, 400.0, 1000.0))
    }

    fn hook() -> InfiniteScroll<MemoryDom> {
        InfiniteScroll::new(&InfiniteScrollConfig::default()).unwrap()
    }

    #[test]
    fn one_load_more_per_rising_edge() {
        let mut fx = Fixture::new();
        let mut h = hook();
        fx.with(|cx| h.mounted(cx)).unwrap();
        for ev in [out_of_view(), in_view(), in_view(), out_of_view(), in_view()] {
            fx.with(|cx| h.handle_event(&ev, cx));
        }
        assert_eq!(fx.channel.count(LOAD_MORE), 2);
        let payloads: Vec<_> = fx.channel.sent().iter().map(|s| s.payload.clone()).collect();
        assert!(payloads.iter().all(|p| *p == Some(json!({}))));
    }

    #[test]
    fn visible_at_mount_loads_once() {
        let mut fx = Fixture::new();
        fx.dom.set_viewport(Some(Rect::new(0.0, 1500.0, 400.0, 2500.0)));
        let mut h = hook();
        fx.with(|cx| h.mounted(cx)).unwrap();
        assert_eq!(fx.channel.count(LOAD_MORE), 1);
        // Still in view: no new edge.
        fx.with(|cx| h.handle_event(&in_view(), cx));
        assert_eq!(fx.channel.count(LOAD_MORE), 1);
        fx.with(|cx| h.handle_event(&out_of_view(), cx));
        fx.with(|cx| h.handle_event(&in_view(), cx));
        assert_eq!(fx.channel.count(LOAD_MORE), 2);
    }

    #[test]
    fn hidden_at_mount_waits_for_scroll() {
        let mut fx = Fixture::new();
        fx.dom.set_viewport(Some(Rect::new(0.0, 0.0, 400.0, 1000.0)));
        let mut h = hook();
        fx.with(|cx| h.mounted(cx)).unwrap();
        assert!(fx.channel.sent().is_empty());
        fx.with(|cx| h.handle_event(&in_view(), cx));
        assert_eq!(fx.channel.count(LOAD_MORE), 1);
    }

    #[test]
    fn unmounted_hook_ignores_viewport() {
        let mut fx = Fixture::new();
        let mut h = hook();
        fx.with(|cx| h.handle_event(&in_view(), cx));
        assert!(fx.channel.sent().is_empty());
    }

    #[test]
    fn double_destroy_is_a_no_op() {
        let mut fx = Fixture::new();
        let mut h = hook();
        fx.with(|cx| h.mounted(cx)).unwrap();
        assert!(h.is_observing());
        fx.with(|cx| h.destroyed(cx));
        assert!(!h.is_observing());
        fx.with(|cx| h.destroyed(cx));
        assert!(!h.is_observing());
        fx.with(|cx| h.handle_event(&in_view(), cx));
        assert!(fx.channel.sent().is_empty());
    }

    #[test]
    fn removed_sentinel_stays_silent() {
        let mut fx = Fixture::new();
        let mut h = hook();
        fx.with(|cx| h.mounted(cx)).unwrap();
        fx.dom.set_bounds(fx.sentinel, None);
        fx.with(|cx| h.handle_event(&in_view(), cx));
        assert!(fx.channel.sent().is_empty());
    }

    #[test]
    fn update_clears_skeleton_class() {
        let mut fx = Fixture::new();
        let skeleton = fx.dom.insert(
            MemoryNode::new()
                .with_id("feed-skeleton")
                .with_class("skeleton")
                .with_class("row"),
        );
        let config = InfiniteScrollConfig {
            skeleton_id: Some("feed-skeleton".into()),
            ..Default::default()
        };
        let mut h: InfiniteScroll<MemoryDom> = InfiniteScroll::new(&config).unwrap();
        fx.with(|cx| h.mounted(cx)).unwrap();
        assert_eq!(h.skeleton(), Some(skeleton));
        fx.with(|cx| h.updated(cx));
        let node = fx.dom.get(skeleton).unwrap();
        assert!(!node.has_class("skeleton"));
        assert!(node.has_class("row"));
    }

    #[test]
    fn missing_skeleton_is_ignored() {
        let mut fx = Fixture::new();
        let config = InfiniteScrollConfig {
            skeleton_id: Some("absent".into()),
            ..Default::default()
        };
        let mut h: InfiniteScroll<MemoryDom> = InfiniteScroll::new(&config).unwrap();
        fx.with(|cx| h.mounted(cx)).unwrap();
        assert_eq!(h.skeleton(), None);
        fx.with(|cx| h.updated(cx));
        assert!(fx.channel.sent().is_empty());
    }
}
