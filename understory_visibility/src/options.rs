// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Observer configuration.

use alloc::vec;
use alloc::vec::Vec;

use crate::error::VisibilityError;
use crate::margin::RootMargin;

/// Sorted, de-duplicated visible fractions in `[0, 1]`.
///
/// Never empty; the default is a single `0.0` (any contact counts).
#[derive(Clone, Debug, PartialEq)]
pub struct Thresholds(Vec<f64>);

impl Thresholds {
    /// Build from any list of fractions. An empty list yields the default.
    pub fn new(values: impl IntoIterator<Item = f64>) -> Result<Self, VisibilityError> {
        let mut values: Vec<f64> = values.into_iter().collect();
        if let Some(bad) = values.iter().find(|v| !(0.0..=1.0).contains(*v)) {
            return Err(VisibilityError::InvalidThreshold(*bad));
        }
        if values.is_empty() {
            return Ok(Self::default());
        }
        values.sort_by(f64::total_cmp);
        values.dedup();
        Ok(Self(values))
    }

    /// A single threshold.
    pub fn single(value: f64) -> Result<Self, VisibilityError> {
        Self::new([value])
    }

    /// The smallest fraction that counts as intersecting.
    pub fn min(&self) -> f64 {
        self.0[0]
    }

    /// All thresholds in ascending order.
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    /// Number of thresholds at or below `ratio`.
    pub(crate) fn band(&self, ratio: f64) -> usize {
        self.0.partition_point(|t| *t <= ratio)
    }
}

impl Default for Thresholds {
    fn default() -> Self {
        Self(vec![0.0])
    }
}

/// Options fixed for the lifetime of an [`IntersectionObserver`](crate::IntersectionObserver).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ObserverOptions {
    /// Growth applied to the viewport before measuring.
    pub root_margin: RootMargin,
    /// Visible fractions whose crossing produces an entry.
    pub thresholds: Thresholds,
}

impl ObserverOptions {
    /// Parse a CSS root margin and a single threshold.
    pub fn parse(root_margin: &str, threshold: f64) -> Result<Self, VisibilityError> {
        Ok(Self {
            root_margin: root_margin.parse()?,
            thresholds: Thresholds::single(threshold)?,
        })
    }
}
