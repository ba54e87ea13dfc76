// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_timing --heading-base-level=0

//! Understory Timing: deterministic, `no_std` rate limiting for UI event streams.
//!
//! ## Overview
//!
//! This crate provides two small state machines, [`Throttle`] and [`Debounce`], and the timer
//! abstraction they are driven through.
//! Neither primitive owns a clock or a thread.
//! Instead, each one asks a [`Timers`] implementation to schedule a wake-up and is told about the
//! wake-up later through `expire`, on the same control thread as every other callback.
//!
//! - [`Throttle`] passes the first call of a window (the leading edge) and rejects the rest
//!   until its window timer expires.
//! - [`Debounce`] keeps at most one pending timer; every call cancels the previous timer and
//!   schedules a new one, so only the trailing edge of a burst survives.
//!
//! ## Timers
//!
//! [`Timers`] is the seam to the host's event loop.
//! A browser-like host maps it onto its own timeout facility.
//! Tests and headless hosts use [`VirtualTimers`], a deterministic queue that only moves when
//! told to, so every schedule is reproducible to the millisecond.
//!
//! Each scheduled timer carries a caller-chosen token.
//! Callers that multiplex many owners over one queue put the owner's identity in the token and
//! route the expiry back to that owner; the primitives themselves only compare [`TimerId`]s.
//!
//! ## Minimal example
//!
//! ```
//! use core::time::Duration;
//! use understory_timing::{Debounce, Throttle, Timestamp, VirtualTimers};
//!
//! let window = Duration::from_millis(1000);
//! let mut timers = VirtualTimers::new();
//! let mut throttle = Throttle::new(window).unwrap();
//! let mut debounce = Debounce::new(window).unwrap();
//!
//! // Three keystrokes in quick succession: one leading edge.
//! let mut leading = 0;
//! for t in [0, 200, 400] {
//!     while let Some(expired) = timers.pop_expired(Timestamp::from_millis(t)) {
//!         throttle.expire(expired.id);
//!         debounce.expire(expired.id);
//!     }
//!     timers.advance_to(Timestamp::from_millis(t));
//!     if throttle.try_acquire(&mut timers, "throttle") {
//!         leading += 1;
//!     }
//!     debounce.schedule(&mut timers, "debounce");
//! }
//! assert_eq!(leading, 1);
//!
//! // The trailing edge lands one window after the last keystroke.
//! let mut trailing = None;
//! while let Some(expired) = timers.pop_expired(Timestamp::from_millis(5000)) {
//!     throttle.expire(expired.id);
//!     if debounce.expire(expired.id) {
//!         trailing = Some(expired.deadline);
//!     }
//! }
//! assert_eq!(trailing, Some(Timestamp::from_millis(1400)));
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod clock;
mod debounce;
mod error;
mod throttle;
mod virtual_timers;

pub use clock::{TimerId, Timers, Timestamp};
pub use debounce::Debounce;
pub use error::TimingError;
pub use throttle::Throttle;
pub use virtual_timers::{Expired, VirtualTimers};
