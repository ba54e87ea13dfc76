// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Serde-backed configuration for the standard hooks.
//!
//! Every field has a default, so partial documents are fine:
//!
//! ```
//! use understory_hooks::HooksConfig;
//!
//! let config: HooksConfig = serde_json::from_str(
//!     r#"{
//!         "infiniteScroll": { "rootMargin": "200px" },
//!         "messageInput": { "typingWindowMs": 500 }
//!     }"#,
//! )
//! .unwrap();
//! assert_eq!(config.infinite_scroll.root_margin, "200px");
//! assert_eq!(config.infinite_scroll.threshold, 0.1);
//! assert_eq!(config.message_input.debounce_window().as_millis(), 500);
//! ```

use alloc::string::String;
use core::time::Duration;

use serde::{Deserialize, Serialize};

/// Configuration for every standard hook.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HooksConfig {
    /// Options for [`InfiniteScroll`](crate::hooks::InfiniteScroll).
    pub infinite_scroll: InfiniteScrollConfig,
    /// Options for [`MessageInput`](crate::hooks::MessageInput).
    pub message_input: MessageInputConfig,
}

/// Options for [`InfiniteScroll`](crate::hooks::InfiniteScroll).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct InfiniteScrollConfig {
    /// CSS margin shorthand applied to the viewport before measuring.
    pub root_margin: String,
    /// Minimum visible fraction of the sentinel that counts as in view.
    #[serde(alias = "visibilityThreshold")]
    pub threshold: f64,
    /// Document id of the element carrying the loading skeleton, if any.
    pub skeleton_id: Option<String>,
    /// Class removed from the skeleton element after each re-render.
    pub skeleton_class: String,
}

impl Default for InfiniteScrollConfig {
    fn default() -> Self {
        Self {
            root_margin: "100px".into(),
            threshold: 0.1,
            skeleton_id: None,
            skeleton_class: "skeleton".into(),
        }
    }
}

/// Options for [`MessageInput`](crate::hooks::MessageInput).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MessageInputConfig {
    /// Shared window for both timers; overrides `throttle_ms` and `debounce_ms` when set.
    pub typing_window_ms: Option<u64>,
    /// Minimum spacing of `start_typing` notifications.
    pub throttle_ms: u64,
    /// Quiet period after the last keystroke before `end_typing`.
    pub debounce_ms: u64,
    /// Repeat `start_typing` once per throttle window while typing continues.
    pub keep_alive: bool,
}

impl Default for MessageInputConfig {
    fn default() -> Self {
        Self {
            typing_window_ms: None,
            throttle_ms: 1000,
            debounce_ms: 1000,
            keep_alive: true,
        }
    }
}

impl MessageInputConfig {
    /// Use `ms` for both the throttle and the debounce window.
    pub fn with_typing_window(mut self, ms: u64) -> Self {
        self.typing_window_ms = Some(ms);
        self
    }

    /// Effective throttle window.
    pub fn throttle_window(&self) -> Duration {
        Duration::from_millis(self.typing_window_ms.unwrap_or(self.throttle_ms))
    }

    /// Effective debounce window.
    pub fn debounce_window(&self) -> Duration {
        Duration::from_millis(self.typing_window_ms.unwrap_or(self.debounce_ms))
    }
}
