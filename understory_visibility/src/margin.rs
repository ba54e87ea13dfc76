// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! CSS-style root margins.

use alloc::string::ToString;
use core::fmt;
use core::str::FromStr;

use kurbo::Rect;

use crate::error::VisibilityError;

/// One side of a [`RootMargin`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum MarginLength {
    /// Absolute length in pixels.
    Px(f64),
    /// Percentage of the root's width (left/right) or height (top/bottom).
    Percent(f64),
}

impl MarginLength {
    fn resolve(self, extent: f64) -> f64 {
        match self {
            Self::Px(v) => v,
            Self::Percent(p) => extent * p / 100.0,
        }
    }
}

impl Default for MarginLength {
    fn default() -> Self {
        Self::Px(0.0)
    }
}

impl fmt::Display for MarginLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Px(v) => write!(f, "{v}px"),
            Self::Percent(p) => write!(f, "{p}%"),
        }
    }
}

/// Amount to grow the root rectangle by on each side before measuring intersections.
///
/// Parses the CSS `margin` shorthand with one to four values:
/// `"a"` applies to every side, `"a b"` is vertical/horizontal, `"a b c"` is
/// top/horizontal/bottom, and `"a b c d"` is top/right/bottom/left.
/// Each value is `<n>px`, `<n>%`, or a bare `0`. Negative values shrink the root.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct RootMargin {
    /// Growth above the root.
    pub top: MarginLength,
    /// Growth to the right of the root.
    pub right: MarginLength,
    /// Growth below the root.
    pub bottom: MarginLength,
    /// Growth to the left of the root.
    pub left: MarginLength,
}

impl RootMargin {
    /// The same length on every side.
    pub const fn uniform(len: MarginLength) -> Self {
        Self {
            top: len,
            right: len,
            bottom: len,
            left: len,
        }
    }

    /// Apply the margin to `root`.
    ///
    /// Shrinking past zero size collapses the rectangle onto its center line instead of
    /// producing an inverted rectangle.
    pub fn expand(&self, root: Rect) -> Rect {
        let root = root.abs();
        let w = root.width();
        let h = root.height();
        let mut x0 = root.x0 - self.left.resolve(w);
        let mut x1 = root.x1 + self.right.resolve(w);
        let mut y0 = root.y0 - self.top.resolve(h);
        let mut y1 = root.y1 + self.bottom.resolve(h);
        if x1 < x0 {
            let mid = (x0 + x1) * 0.5;
            x0 = mid;
            x1 = mid;
        }
        if y1 < y0 {
            let mid = (y0 + y1) * 0.5;
            y0 = mid;
            y1 = mid;
        }
        Rect::new(x0, y0, x1, y1)
    }
}

impl fmt::Display for RootMargin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} {}", self.top, self.right, self.bottom, self.left)
    }
}

impl FromStr for RootMargin {
    type Err = VisibilityError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let invalid = |reason| VisibilityError::InvalidRootMargin {
            input: input.to_string(),
            reason,
        };

        let mut values = [MarginLength::default(); 4];
        let mut count = 0;
        for token in input.split_ascii_whitespace() {
            if count == values.len() {
                return Err(invalid("more than four values"));
            }
            values[count] = parse_length(token).ok_or_else(|| invalid("expected <n>px or <n>%"))?;
            count += 1;
        }

        let [a, b, c, d] = values;
        Ok(match count {
            0 => return Err(invalid("empty")),
            1 => Self::uniform(a),
            2 => Self {
                top: a,
                right: b,
                bottom: a,
                left: b,
            },
            3 => Self {
                top: a,
                right: b,
                bottom: c,
                left: b,
            },
            _ => Self {
                top: a,
                right: b,
                bottom: c,
                left: d,
            },
        })
    }
}

fn parse_length(token: &str) -> Option<MarginLength> {
    let finite = |s: &str| s.parse::<f64>().ok().filter(|v| v.is_finite());
    if let Some(num) = token.strip_suffix("px") {
        finite(num).map(MarginLength::Px)
    } else if let Some(num) = token.strip_suffix('%') {
        finite(num).map(MarginLength::Percent)
    } else {
        // Only zero may be unitless.
        finite(token)
            .filter(|v| *v == 0.0)
            .map(|_| MarginLength::Px(0.0))
    }
}
