// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_visibility --heading-base-level=0

//! Understory Visibility: an edge-triggered intersection observer over Kurbo rectangles.
//!
//! ## Overview
//!
//! This crate answers "did this element just scroll into view?" without a browser.
//! An [`IntersectionObserver`] tracks a set of target keys.
//! Each time the host reports a new viewport (scroll, resize, or relayout), the observer asks a
//! [`BoundsLookup`] for every target's world-space bounds, measures how much of each target lies
//! inside the viewport, and reports an [`IntersectionEntry`] only for targets whose state changed.
//!
//! ## Edge triggering
//!
//! A target is reported:
//! - the first time it is measured after [`observe`](IntersectionObserver::observe), whatever
//!   its state;
//! - afterwards, only when its intersecting state flips or its visible fraction crosses a
//!   threshold.
//!
//! A target that stays visible across many updates produces no further entries, so consumers can
//! treat each `is_intersecting` entry as a rising edge.
//!
//! ## Root margin and thresholds
//!
//! [`RootMargin`] grows (or, with negative lengths, shrinks) the viewport before measuring, using
//! the CSS shorthand (`"100px"`, `"10px 20%"`, `"0 0 200px 0"`). Percentages are relative to the
//! viewport's width for left/right and its height for top/bottom.
//!
//! [`Thresholds`] lists visible fractions in `[0, 1]`. A target counts as intersecting when it
//! touches the expanded viewport and its visible fraction reaches the smallest threshold.
//! Zero-area targets (for example an empty sentinel row) count as fully visible while they touch
//! the expanded viewport.
//!
//! ## Minimal example
//!
//! ```
//! use kurbo::Rect;
//! use understory_visibility::{BoundsLookup, IntersectionObserver, ObserverOptions};
//!
//! struct Sentinel(Rect);
//! impl BoundsLookup<u32> for Sentinel {
//!     fn bounds_of(&self, _key: &u32) -> Option<Rect> {
//!         Some(self.0)
//!     }
//! }
//!
//! let options = ObserverOptions::parse("100px", 0.1).unwrap();
//! let mut observer = IntersectionObserver::new(options);
//! observer.observe(7);
//!
//! let sentinel = Sentinel(Rect::new(0.0, 1050.0, 400.0, 1060.0));
//!
//! // Viewport ends at 1000; with a 100px margin the sentinel is already in range.
//! let entries = observer.update(Rect::new(0.0, 0.0, 400.0, 1000.0), &sentinel);
//! assert!(entries[0].is_intersecting);
//!
//! // Scrolling a little further changes nothing, so nothing is reported.
//! assert!(observer.update(Rect::new(0.0, 20.0, 400.0, 1020.0), &sentinel).is_empty());
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod error;
mod margin;
mod observer;
mod options;

pub use error::VisibilityError;
pub use margin::{MarginLength, RootMargin};
pub use observer::{BoundsLookup, IntersectionEntry, IntersectionObserver, measure};
pub use options::{ObserverOptions, Thresholds};
