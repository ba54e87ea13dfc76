// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Hook definitions keyed by name.
//!
//! ## Usage
//!
//! Build a registry once at startup, either from [`HookRegistry::standard`] or by registering
//! definitions one by one, and move it into a [`HookHost`](crate::HookHost).
//! There is no global registry; two hosts can run different hook sets side by side.

use alloc::boxed::Box;
use alloc::collections::BTreeMap;
use alloc::string::{String, ToString};

use crate::config::HooksConfig;
use crate::dom::Dom;
use crate::error::HookError;
use crate::hook::{Capabilities, Hook};
use crate::hooks::{InfiniteScroll, InputCleanUp, MessageInput};

type Factory<D> = Box<dyn Fn() -> Box<dyn Hook<D>>>;

/// How to build one kind of hook, and which callbacks it takes.
pub struct HookDefinition<D: Dom> {
    capabilities: Capabilities,
    factory: Factory<D>,
}

impl<D: Dom> core::fmt::Debug for HookDefinition<D> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("HookDefinition")
            .field("capabilities", &self.capabilities)
            .finish_non_exhaustive()
    }
}

impl<D: Dom> HookDefinition<D> {
    /// Define a hook from a capability set and a factory producing fresh instances.
    pub fn new(
        capabilities: Capabilities,
        factory: impl Fn() -> Box<dyn Hook<D>> + 'static,
    ) -> Self {
        Self {
            capabilities,
            factory: Box::new(factory),
        }
    }

    /// Callbacks instances of this hook receive.
    pub fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    pub(crate) fn instantiate(&self) -> Box<dyn Hook<D>> {
        (self.factory)()
    }
}

/// Explicit name → definition map.
pub struct HookRegistry<D: Dom> {
    definitions: BTreeMap<String, HookDefinition<D>>,
}

impl<D: Dom> core::fmt::Debug for HookRegistry<D> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_map().entries(self.definitions.iter()).finish()
    }
}

impl<D: Dom> Default for HookRegistry<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D: Dom> HookRegistry<D> {
    /// Name of the pagination hook in [`standard`](Self::standard).
    pub const INFINITE_SCROLL: &'static str = "InfiniteScroll";
    /// Name of the typing-signal hook in [`standard`](Self::standard).
    pub const MESSAGE_INPUT: &'static str = "MessageInput";
    /// Name of the input-reset hook in [`standard`](Self::standard).
    pub const INPUT_CLEAN_UP: &'static str = "InputCleanUp";

    /// An empty registry.
    pub fn new() -> Self {
        Self {
            definitions: BTreeMap::new(),
        }
    }

    /// The three standard hooks, configured from `config`.
    ///
    /// Configuration is validated here, so mounting a standard hook never fails on options.
    pub fn standard(config: &HooksConfig) -> Result<Self, HookError> {
        let mut registry = Self::new();

        let scroll = InfiniteScroll::<D>::new(&config.infinite_scroll)?;
        registry.register(
            Self::INFINITE_SCROLL,
            HookDefinition::new(
                Capabilities::MOUNTED
                    | Capabilities::UPDATED
                    | Capabilities::DESTROYED
                    | Capabilities::EVENTS,
                move || Box::new(scroll.clone()),
            ),
        );

        let input = MessageInput::<D>::new(&config.message_input)?;
        registry.register(
            Self::MESSAGE_INPUT,
            HookDefinition::new(
                Capabilities::MOUNTED
                    | Capabilities::DESTROYED
                    | Capabilities::EVENTS
                    | Capabilities::TIMERS,
                move || Box::new(input.clone()),
            ),
        );

        registry.register(
            Self::INPUT_CLEAN_UP,
            HookDefinition::new(Capabilities::UPDATED, || {
                Box::new(InputCleanUp::<D>::new())
            }),
        );

        Ok(registry)
    }

    /// Register `definition` under `name`, returning the definition it replaced.
    pub fn register(
        &mut self,
        name: &str,
        definition: HookDefinition<D>,
    ) -> Option<HookDefinition<D>> {
        self.definitions.insert(name.to_string(), definition)
    }

    /// Look up a definition.
    pub fn get(&self, name: &str) -> Result<&HookDefinition<D>, HookError> {
        self.definitions
            .get(name)
            .ok_or_else(|| HookError::UnknownHook(name.to_string()))
    }

    /// Whether `name` is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.definitions.contains_key(name)
    }

    /// Registered names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.definitions.keys().map(String::as_str)
    }
}
