// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use thiserror::Error;

/// Errors raised when constructing rate-limiting primitives.
#[derive(Copy, Clone, Debug, Error, PartialEq, Eq)]
pub enum TimingError {
    /// A window shorter than one millisecond was supplied.
    #[error("{what} window must be at least one millisecond")]
    ZeroWindow {
        /// Which primitive rejected the window.
        what: &'static str,
    },
}
