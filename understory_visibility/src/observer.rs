// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The observer: per-target state and change detection.

use alloc::vec::Vec;

use kurbo::Rect;

use crate::options::{ObserverOptions, Thresholds};

/// Look up a target's current world-space bounds.
///
/// Return `None` for targets that are no longer in the tree; they produce no entries until
/// they come back.
pub trait BoundsLookup<K> {
    /// Bounds of `key`, if it is laid out.
    fn bounds_of(&self, key: &K) -> Option<Rect>;
}

impl<K, F: Fn(&K) -> Option<Rect>> BoundsLookup<K> for F {
    fn bounds_of(&self, key: &K) -> Option<Rect> {
        self(key)
    }
}

/// A reported visibility change.
#[derive(Clone, Debug, PartialEq)]
pub struct IntersectionEntry<K> {
    /// The observed target.
    pub target: K,
    /// Target bounds at measurement time.
    pub bounding_rect: Rect,
    /// Part of the target inside the expanded root (zero-sized when outside).
    pub intersection_rect: Rect,
    /// The root after applying the root margin.
    pub root_bounds: Rect,
    /// Visible fraction of the target in `[0, 1]`.
    pub intersection_ratio: f64,
    /// Whether the target touches the root and reaches the smallest threshold.
    pub is_intersecting: bool,
}

/// Measure `target` against an already expanded `root`.
///
/// Contact along an edge counts as touching. A zero-area target that touches the root has a
/// ratio of `1.0`.
pub fn measure<K>(
    key: K,
    target: Rect,
    root: Rect,
    thresholds: &Thresholds,
) -> IntersectionEntry<K> {
    let target = target.abs();
    let touches = target.x0 <= root.x1
        && root.x0 <= target.x1
        && target.y0 <= root.y1
        && root.y0 <= target.y1;
    let intersection = if touches {
        target.intersect(root)
    } else {
        Rect::from_origin_size(target.origin(), (0.0, 0.0))
    };
    let area = target.area();
    let ratio = if !touches {
        0.0
    } else if area > 0.0 {
        (intersection.area() / area).clamp(0.0, 1.0)
    } else {
        1.0
    };
    IntersectionEntry {
        target: key,
        bounding_rect: target,
        intersection_rect: intersection,
        root_bounds: root,
        intersection_ratio: ratio,
        is_intersecting: touches && ratio >= thresholds.min(),
    }
}

/// Coarse state used for change detection.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Band {
    Outside,
    Inside(usize),
}

#[derive(Clone, Debug)]
struct Observed<K> {
    key: K,
    // `None` until the first measurement is reported.
    last: Option<Band>,
}

/// Edge-triggered intersection observer.
///
/// ## Usage
///
/// - [`observe`](Self::observe) the keys you care about.
/// - Call [`update`](Self::update) whenever the viewport or layout changes; deliver the returned
///   entries to your callback in order.
/// - [`unobserve`](Self::unobserve) or [`disconnect`](Self::disconnect) to stop. Dropping the
///   observer has the same effect.
#[derive(Clone, Debug)]
pub struct IntersectionObserver<K> {
    options: ObserverOptions,
    targets: Vec<Observed<K>>,
}

impl<K: Copy + Eq> IntersectionObserver<K> {
    /// Create an observer with no targets.
    pub fn new(options: ObserverOptions) -> Self {
        Self {
            options,
            targets: Vec::new(),
        }
    }

    /// The options this observer was created with.
    pub fn options(&self) -> &ObserverOptions {
        &self.options
    }

    /// Start observing `key`. Returns `false` if it was already observed.
    ///
    /// The next [`update`](Self::update) always reports the target's initial state.
    pub fn observe(&mut self, key: K) -> bool {
        if self.is_observing(&key) {
            return false;
        }
        self.targets.push(Observed { key, last: None });
        true
    }

    /// Stop observing `key`. Returns `false` if it was not observed.
    pub fn unobserve(&mut self, key: &K) -> bool {
        let before = self.targets.len();
        self.targets.retain(|t| t.key != *key);
        before != self.targets.len()
    }

    /// Stop observing every target.
    pub fn disconnect(&mut self) {
        tracing::trace!(targets = self.targets.len(), "observer disconnected");
        self.targets.clear();
    }

    /// Whether `key` is observed.
    pub fn is_observing(&self, key: &K) -> bool {
        self.targets.iter().any(|t| t.key == *key)
    }

    /// Observed keys in observation order.
    pub fn targets(&self) -> impl Iterator<Item = K> + '_ {
        self.targets.iter().map(|t| t.key)
    }

    /// Measure every target against `viewport` and return the entries whose state changed.
    ///
    /// Entries come back in observation order. Targets without bounds are skipped and keep
    /// their previous state.
    pub fn update<L: BoundsLookup<K> + ?Sized>(
        &mut self,
        viewport: Rect,
        lookup: &L,
    ) -> Vec<IntersectionEntry<K>> {
        let root = self.options.root_margin.expand(viewport);
        let thresholds = &self.options.thresholds;
        let mut out = Vec::new();
        for target in &mut self.targets {
            let Some(bounds) = lookup.bounds_of(&target.key) else {
                continue;
            };
            let entry = measure(target.key, bounds, root, thresholds);
            let band = if entry.is_intersecting {
                Band::Inside(thresholds.band(entry.intersection_ratio))
            } else {
                Band::Outside
            };
            if target.last == Some(band) {
                continue;
            }
            tracing::trace!(
                ratio = entry.intersection_ratio,
                intersecting = entry.is_intersecting,
                "intersection changed"
            );
            target.last = Some(band);
            out.push(entry);
        }
        out
    }
}
