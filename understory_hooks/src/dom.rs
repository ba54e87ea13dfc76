// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The host element tree as seen by hooks.

use core::fmt::Debug;

use kurbo::Rect;

/// The host's element tree.
///
/// Hooks hold node keys, never nodes; every access goes through this trait so the host stays the
/// owner of its elements.
pub trait Dom: 'static {
    /// Copyable key of an element.
    type Node: Copy + Eq + Debug;

    /// Find an element by its stable document id.
    fn element_by_id(&self, id: &str) -> Option<Self::Node>;

    /// The current viewport in world space, or `None` before the host has laid out a page.
    ///
    /// Hooks that measure geometry read this once when mounted; later changes arrive as
    /// [`DomEvent::Viewport`].
    fn viewport(&self) -> Option<Rect>;

    /// World-space bounds of `node`, or `None` if it is not laid out (e.g. removed).
    fn bounding_rect(&self, node: Self::Node) -> Option<Rect>;

    /// Remove `class` from `node`. Returns `false` if the node is gone or lacked the class.
    fn remove_class(&mut self, node: Self::Node, class: &str) -> bool;

    /// Reset a form control's value to the empty string.
    fn clear_value(&mut self, node: Self::Node);
}

/// Raw events the host delivers to hooks.
#[derive(Clone, Debug, PartialEq)]
pub enum DomEvent {
    /// A key was released over the element.
    KeyUp,
    /// The element's value changed.
    Input,
    /// The viewport moved or the layout changed; carries the new viewport in world space.
    Viewport(Rect),
}

impl DomEvent {
    /// Whether this event reflects a user edit of a text control.
    pub fn is_edit(&self) -> bool {
        matches!(self, Self::KeyUp | Self::Input)
    }
}
