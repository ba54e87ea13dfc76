// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::string::String;

use thiserror::Error;
use understory_timing::TimingError;
use understory_visibility::VisibilityError;

use crate::hook::InstanceId;

/// Errors surfaced by the registry and the host.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum HookError {
    /// No definition is registered under this name.
    #[error("no hook registered under {0:?}")]
    UnknownHook(String),
    /// The instance was never mounted or has been destroyed.
    #[error("no mounted hook instance {0:?}")]
    UnknownInstance(InstanceId),
    /// Invalid visibility configuration.
    #[error(transparent)]
    Visibility(#[from] VisibilityError),
    /// Invalid timing configuration.
    #[error(transparent)]
    Timing(#[from] TimingError),
}
