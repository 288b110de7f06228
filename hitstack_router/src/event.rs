// Copyright 2025 the Hitstack Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pointer events in and handler deliveries out.

use hitstack_tree::PointerKinds;
use kurbo::{Affine, Point, Vec2};

/// Pointer identifier, unique per [`Source`].
pub type PointerId = u64;

/// Kind of device behind a pointer.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub enum Source {
    /// A mouse-controlled cursor.
    #[default]
    Mouse,
    /// A finger.
    Touch,
    /// A stylus.
    Pen,
}

/// Identity of one physical pointer: the router keeps one state machine per key.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct PointerKey {
    /// Device class.
    pub source: Source,
    /// Pointer id within the device class.
    pub id: PointerId,
}

bitflags::bitflags! {
    /// Pressed buttons.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Buttons: u8 {
        /// Left mouse button, or the contact of a finger or stylus.
        const PRIMARY   = 0b0000_0001;
        /// Right mouse button.
        const SECONDARY = 0b0000_0010;
        /// Middle mouse button.
        const TERTIARY  = 0b0000_0100;
        /// Back button.
        const BACK      = 0b0000_1000;
        /// Forward button.
        const FORWARD   = 0b0001_0000;
    }
}

/// What happened to the pointer.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum PointerKind {
    /// Buttons went down.
    Press,
    /// Buttons went up.
    Release,
    /// The pointer moved.
    Move,
    /// Scroll by [`PointerEvent::scroll`].
    Scroll,
    /// The interaction was cancelled. Physical cancels end every interaction
    /// of the pointer; synthesized cancels tell one handler it lost.
    Cancel,
    /// Synthesized: the pointer entered the handler's area. As input, treated
    /// like [`PointerKind::Move`].
    Enter,
    /// Synthesized: the pointer left the handler's area. As input, the
    /// pointer left the surface and every hovered handler is left.
    Leave,
}

impl PointerKind {
    /// The interest bit matching this kind.
    pub fn mask(self) -> PointerKinds {
        match self {
            Self::Press => PointerKinds::PRESS,
            Self::Release => PointerKinds::RELEASE,
            Self::Move => PointerKinds::MOVE,
            Self::Scroll => PointerKinds::SCROLL,
            Self::Cancel => PointerKinds::CANCEL,
            Self::Enter => PointerKinds::ENTER,
            Self::Leave => PointerKinds::LEAVE,
        }
    }
}

/// A physical pointer event, or its per-handler copy in a [`Delivery`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerEvent {
    /// Device class.
    pub source: Source,
    /// Pointer id within the device class.
    pub pointer: PointerId,
    /// What happened.
    pub kind: PointerKind,
    /// Position; root space on input, handler-local space on delivery.
    pub position: Point,
    /// For [`PointerKind::Press`] and [`PointerKind::Release`], the buttons
    /// that changed. Otherwise the buttons held.
    pub buttons: Buttons,
    /// Scroll amount for [`PointerKind::Scroll`].
    pub scroll: Vec2,
    /// Monotonically increasing time or sequence marker.
    pub time: u64,
}

impl PointerEvent {
    /// An event from mouse pointer 0 with no buttons, no scroll, at time 0.
    pub fn new(kind: PointerKind, position: impl Into<Point>) -> Self {
        Self {
            source: Source::Mouse,
            pointer: 0,
            kind,
            position: position.into(),
            buttons: Buttons::empty(),
            scroll: Vec2::ZERO,
            time: 0,
        }
    }

    /// Primary button press.
    pub fn press(position: impl Into<Point>) -> Self {
        Self::new(PointerKind::Press, position).with_buttons(Buttons::PRIMARY)
    }

    /// Primary button release.
    pub fn release(position: impl Into<Point>) -> Self {
        Self::new(PointerKind::Release, position).with_buttons(Buttons::PRIMARY)
    }

    /// Pointer motion.
    pub fn moved(position: impl Into<Point>) -> Self {
        Self::new(PointerKind::Move, position)
    }

    /// Scroll by `delta`.
    pub fn scrolled(position: impl Into<Point>, delta: impl Into<Vec2>) -> Self {
        let mut e = Self::new(PointerKind::Scroll, position);
        e.scroll = delta.into();
        e
    }

    /// Physical cancellation.
    pub fn cancel() -> Self {
        Self::new(PointerKind::Cancel, Point::ZERO)
    }

    /// Replace the device class and pointer id.
    pub fn with_pointer(mut self, source: Source, pointer: PointerId) -> Self {
        self.source = source;
        self.pointer = pointer;
        self
    }

    /// Replace the buttons.
    pub fn with_buttons(mut self, buttons: Buttons) -> Self {
        self.buttons = buttons;
        self
    }

    /// Replace the time marker.
    pub fn at(mut self, time: u64) -> Self {
        self.time = time;
        self
    }

    /// The pointer this event belongs to.
    pub fn key(&self) -> PointerKey {
        PointerKey {
            source: self.source,
            id: self.pointer,
        }
    }

    /// Copy of the event with a different kind, for synthesized deliveries.
    pub(crate) fn with_kind(mut self, kind: PointerKind) -> Self {
        self.kind = kind;
        self
    }

    /// Copy of the event in the local space of a handler whose local → root
    /// transform is `transform`. Scroll deltas only take the linear part.
    pub(crate) fn localized(mut self, transform: Affine) -> Self {
        let to_local = transform.inverse();
        self.position = to_local * self.position;
        self.scroll = to_local * self.scroll.to_point() - to_local * Point::ZERO;
        self
    }
}

/// Whether a handler has a pointer to itself.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum Priority {
    /// Other handlers may receive the same pointer's events.
    #[default]
    Shared,
    /// The handler holds the pointer's grab: nobody else receives its events.
    Grabbed,
}

/// One event addressed to one handler.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Delivery<K> {
    /// Recipient.
    pub tag: K,
    /// The event, in the recipient's local space.
    pub event: PointerEvent,
    /// The recipient's priority for the event's pointer.
    pub priority: Priority,
}
