// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The standard hooks.
//!
//! Each hook is usable on its own through the [`Hook`](crate::Hook) trait; the
//! [`HookRegistry::standard`](crate::HookRegistry::standard) set wires all three with their
//! capabilities.

mod infinite_scroll;
mod input_clean_up;
mod message_input;

pub use infinite_scroll::InfiniteScroll;
pub use input_clean_up::InputCleanUp;
pub use message_input::{MessageInput, TypingState};
