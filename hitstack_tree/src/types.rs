// Copyright 2025 the Hitstack Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for the area tree: area identifiers, handler flags, and interest masks.

/// Identifier for an area in one frame's [`AreaTree`](crate::AreaTree).
///
/// Area ids are arena indices in recording order. They are only meaningful for
/// the tree that produced them; the next frame reuses the same numbers for
/// whatever areas it records.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct AreaId(pub(crate) u32);

impl AreaId {
    pub(crate) const fn new(idx: usize) -> Self {
        #[allow(
            clippy::cast_possible_truncation,
            reason = "AreaId uses 32-bit indices by design."
        )]
        Self(idx as u32)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }

    /// Position of the area's push in the recorded log, counting areas only.
    pub const fn index(self) -> usize {
        self.idx()
    }
}

bitflags::bitflags! {
    /// Flags declared with a handler attachment.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct HandlerFlags: u8 {
        /// The handler claims exclusive access to the pointers whose matching
        /// set it belongs to.
        const GRAB        = 0b0000_0001;
        /// The handler stops propagation to handlers later in traversal order
        /// for events it is interested in.
        const TERMINATING = 0b0000_0010;
    }
}

bitflags::bitflags! {
    /// Pointer event kinds a handler is interested in.
    ///
    /// Attachments default to [`PointerKinds::all`]. A handler never receives
    /// a kind outside its mask, except cancellation which is always delivered.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct PointerKinds: u8 {
        /// A button went down.
        const PRESS   = 0b0000_0001;
        /// A button went up.
        const RELEASE = 0b0000_0010;
        /// The pointer moved.
        const MOVE    = 0b0000_0100;
        /// Scroll wheel or trackpad scroll.
        const SCROLL  = 0b0000_1000;
        /// The pointer entered the handler's hit area.
        const ENTER   = 0b0001_0000;
        /// The pointer left the handler's hit area.
        const LEAVE   = 0b0010_0000;
        /// The interaction was cancelled.
        const CANCEL  = 0b0100_0000;
    }
}

impl Default for PointerKinds {
    fn default() -> Self {
        Self::all()
    }
}

/// Visitor outcome controlling a hit-test walk.
///
/// Returned from the closure given to
/// [`AreaTree::visit_point`](crate::AreaTree::visit_point).
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Outcome {
    /// Keep walking.
    Continue,
    /// Abort the walk; no later attachment is visited.
    Stop,
}
