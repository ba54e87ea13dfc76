// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::marker::PhantomData;

use crate::dom::Dom;
use crate::hook::{Hook, HookContext};

/// Clears the bound input's value every time the element is re-rendered.
///
/// Typical use is a message composer: after the server accepts a message and re-renders the
/// form, the draft text is dropped.
pub struct InputCleanUp<D> {
    _dom: PhantomData<fn() -> D>,
}

impl<D> core::fmt::Debug for InputCleanUp<D> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("InputCleanUp").finish()
    }
}

impl<D> Clone for InputCleanUp<D> {
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl<D> Default for InputCleanUp<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D> InputCleanUp<D> {
    /// Create the hook.
    pub fn new() -> Self {
        Self { _dom: PhantomData }
    }
}

impl<D: Dom> Hook<D> for InputCleanUp<D> {
    fn updated(&mut self, cx: &mut HookContext<'_, D>) {
        let el = cx.el();
        cx.dom_mut().clear_value(el);
    }
}
