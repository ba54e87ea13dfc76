// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_hooks --heading-base-level=0

//! Understory Hooks: element lifecycle hooks for server-rendered UI.
//!
//! ## Overview
//!
//! A hook is a small state machine bound to one element of a server-rendered page.
//! The host framework mounts it when the element enters the live tree, tells it when the
//! element's content is re-rendered, and destroys it when the element leaves.
//! Between those points the host feeds it DOM events and timer expiries.
//! Hooks talk back to the server through a single fire-and-forget primitive,
//! [`PushEvent::push_event`].
//!
//! Three hooks ship with the crate:
//!
//! - [`InfiniteScroll`](hooks::InfiniteScroll): pushes `load-more` each time a sentinel element
//!   scrolls into view, using the edge-triggered observer from [`understory_visibility`].
//! - [`MessageInput`](hooks::MessageInput): turns raw keystrokes into a `start_typing` /
//!   `end_typing` protocol using a [`Throttle`](understory_timing::Throttle) for the start signal
//!   and a [`Debounce`](understory_timing::Debounce) for the stop signal.
//! - [`InputCleanUp`](hooks::InputCleanUp): clears an input's value whenever it is re-rendered.
//!
//! ## Layering
//!
//! - [`Dom`] abstracts the host's element tree (lookup by id, geometry, classes, values).
//! - [`PushEvent`] abstracts the server channel.
//! - [`Timers`](understory_timing::Timers) abstracts the host's timeout facility. Every timer a
//!   hook schedules carries a [`TimerToken`] naming the owning instance, so expiries always come
//!   back to the hook that scheduled them.
//! - [`HookRegistry`] maps hook names to definitions. It is built once, explicitly, and handed to
//!   a [`HookHost`], which owns the mounted instances and dispatches lifecycle calls, events, and
//!   timer expiries to them.
//!
//! ## Minimal example
//!
//! ```
//! use kurbo::Rect;
//! use understory_hooks::memory::{MemoryNode, Page};
//! use understory_hooks::{HooksConfig, LOAD_MORE};
//!
//! let mut page = Page::new(&HooksConfig::default()).unwrap();
//! let sentinel = page
//!     .dom_mut()
//!     .insert(MemoryNode::new().with_bounds(Rect::new(0.0, 2000.0, 400.0, 2010.0)));
//! page.mount("InfiniteScroll", sentinel).unwrap();
//!
//! page.scroll_to(Rect::new(0.0, 0.0, 400.0, 1000.0));
//! page.scroll_to(Rect::new(0.0, 1200.0, 400.0, 2200.0));
//! page.scroll_to(Rect::new(0.0, 1300.0, 400.0, 2300.0));
//!
//! assert_eq!(page.channel().count(LOAD_MORE), 1);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod channel;
mod config;
mod dom;
mod error;
mod hook;
pub mod hooks;
mod host;
pub mod memory;
mod registry;

pub use channel::{END_TYPING, LOAD_MORE, PushEvent, START_TYPING};
pub use config::{HooksConfig, InfiniteScrollConfig, MessageInputConfig};
pub use dom::{Dom, DomEvent};
pub use error::HookError;
pub use hook::{Capabilities, Hook, HookContext, InstanceId, ScopedTimers, TimerSlot, TimerToken};
pub use host::{Env, HookHost};
pub use registry::{HookDefinition, HookRegistry};
