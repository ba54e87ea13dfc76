// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use serde_json::Value;

/// Pushed by [`InfiniteScroll`](crate::hooks::InfiniteScroll) when its sentinel scrolls into view.
pub const LOAD_MORE: &str = "load-more";
/// Pushed by [`MessageInput`](crate::hooks::MessageInput) when a typing session opens
/// (and once per throttle window while it stays open, with keep-alive enabled).
pub const START_TYPING: &str = "start_typing";
/// Pushed by [`MessageInput`](crate::hooks::MessageInput) when input goes quiet.
pub const END_TYPING: &str = "end_typing";

/// The outbound server channel.
///
/// Delivery is fire-and-forget: hooks never observe a result and never retry.
pub trait PushEvent {
    /// Notify the server of `event` with an optional JSON payload.
    fn push_event(&mut self, event: &str, payload: Option<Value>);
}

impl<F: FnMut(&str, Option<Value>)> PushEvent for F {
    fn push_event(&mut self, event: &str, payload: Option<Value>) {
        self(event, payload);
    }
}
