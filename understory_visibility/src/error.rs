// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::string::String;

use thiserror::Error;

/// Errors raised while building observer options.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum VisibilityError {
    /// The root margin is not valid CSS margin shorthand.
    #[error("invalid root margin {input:?}: {reason}")]
    InvalidRootMargin {
        /// The rejected input.
        input: String,
        /// What was wrong with it.
        reason: &'static str,
    },
    /// A threshold is outside `[0, 1]` or not a number.
    #[error("threshold {0} is outside [0, 1]")]
    InvalidThreshold(f64),
}
