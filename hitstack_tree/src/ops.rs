// Copyright 2025 the Hitstack Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The per-frame operation log.
//!
//! Application code records one [`OpLog`] per frame. Areas, transforms and
//! stop scopes are opened and closed with matching push/pop records; handlers
//! are attached at the point in the log where they should live in the tree.
//!
//! ```
//! use hitstack_tree::{AreaTree, OpLog};
//! use kurbo::{Point, Rect};
//!
//! let mut ops = OpLog::new();
//! ops.push_area(Rect::new(0.0, 0.0, 100.0, 100.0));
//! ops.attach("button");
//! ops.pop_area();
//!
//! let tree = AreaTree::build(ops.ops()).unwrap();
//! assert_eq!(tree.hit_test(Point::new(50.0, 50.0)), vec!["button"]);
//! assert!(tree.hit_test(Point::new(150.0, 50.0)).is_empty());
//! ```
//!
//! The log itself does not check nesting; [`AreaTree::build`](crate::AreaTree::build)
//! rejects unbalanced logs.

use alloc::vec::Vec;

use kurbo::Affine;

use crate::shape::AreaShape;
use crate::types::{HandlerFlags, PointerKinds};

/// A handler declaration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Attach<K> {
    /// Opaque handler identity.
    pub tag: K,
    /// Grab and termination flags.
    pub flags: HandlerFlags,
    /// Event kinds the handler wants.
    pub kinds: PointerKinds,
}

impl<K> Attach<K> {
    /// A plain handler: no flags, interested in every kind.
    pub fn new(tag: K) -> Self {
        Self {
            tag,
            flags: HandlerFlags::empty(),
            kinds: PointerKinds::all(),
        }
    }

    /// Replace the flags.
    pub fn with_flags(mut self, flags: HandlerFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Replace the interest mask.
    pub fn with_kinds(mut self, kinds: PointerKinds) -> Self {
        self.kinds = kinds;
        self
    }
}

/// A single recorded operation.
#[derive(Clone, Debug, PartialEq)]
pub enum Op<K> {
    /// Open a hit area. Everything until the matching [`Op::PopArea`] is a child.
    PushArea(AreaShape),
    /// Close the innermost open area.
    PopArea,
    /// Prepend a transform to every following op until the matching [`Op::PopTransform`].
    PushTransform(Affine),
    /// Restore the transform in effect before the innermost push.
    PopTransform,
    /// Open a stop scope: every handler attached inside it is terminating.
    PushStop,
    /// Close the innermost stop scope.
    PopStop,
    /// Attach a handler at this position.
    Attach(Attach<K>),
}

/// An ordered, replayable list of [`Op`]s for one frame.
#[derive(Clone, Debug, PartialEq)]
pub struct OpLog<K> {
    ops: Vec<Op<K>>,
}

impl<K> Default for OpLog<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K> OpLog<K> {
    /// Create an empty log.
    pub fn new() -> Self {
        Self { ops: Vec::new() }
    }

    /// Forget every recorded op, keeping the allocation for the next frame.
    pub fn reset(&mut self) {
        self.ops.clear();
    }

    /// The recorded ops, in order.
    pub fn ops(&self) -> &[Op<K>] {
        &self.ops
    }

    /// Number of recorded ops.
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    /// Returns true if nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Append a raw op.
    pub fn push(&mut self, op: Op<K>) {
        self.ops.push(op);
    }

    /// Open a hit area. Shapes other than rectangles and ellipses are reduced
    /// to their bounding box by the [`AreaShape`] conversion.
    pub fn push_area(&mut self, shape: impl Into<AreaShape>) {
        self.ops.push(Op::PushArea(shape.into()));
    }

    /// Close the innermost area.
    pub fn pop_area(&mut self) {
        self.ops.push(Op::PopArea);
    }

    /// Open a transform scope.
    pub fn push_transform(&mut self, transform: Affine) {
        self.ops.push(Op::PushTransform(transform));
    }

    /// Close the innermost transform scope.
    pub fn pop_transform(&mut self) {
        self.ops.push(Op::PopTransform);
    }

    /// Open a stop scope, making every handler attached inside it terminating.
    ///
    /// Useful to keep events from third-party handlers from propagating
    /// further without knowing their exact areas.
    pub fn push_stop(&mut self) {
        self.ops.push(Op::PushStop);
    }

    /// Close the innermost stop scope.
    pub fn pop_stop(&mut self) {
        self.ops.push(Op::PopStop);
    }

    /// Attach a plain handler here.
    pub fn attach(&mut self, tag: K) {
        self.ops.push(Op::Attach(Attach::new(tag)));
    }

    /// Attach a handler with explicit flags and interest.
    pub fn attach_with(&mut self, attach: Attach<K>) {
        self.ops.push(Op::Attach(attach));
    }
}

impl<K> From<Vec<Op<K>>> for OpLog<K> {
    fn from(ops: Vec<Op<K>>) -> Self {
        Self { ops }
    }
}

impl<K> Extend<Op<K>> for OpLog<K> {
    fn extend<I: IntoIterator<Item = Op<K>>>(&mut self, iter: I) {
        self.ops.extend(iter);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Rect;

    #[test]
    fn records_in_order() {
        let mut ops = OpLog::new();
        ops.push_area(Rect::new(0.0, 0.0, 1.0, 1.0));
        ops.push_stop();
        ops.attach(1_u32);
        ops.attach_with(Attach::new(2).with_flags(HandlerFlags::GRAB));
        ops.pop_stop();
        ops.pop_area();
        assert_eq!(ops.len(), 6);
        assert_eq!(ops.ops()[1], Op::PushStop);
        assert_eq!(
            ops.ops()[3],
            Op::Attach(Attach {
                tag: 2,
                flags: HandlerFlags::GRAB,
                kinds: PointerKinds::all(),
            })
        );
    }

    #[test]
    fn reset_clears() {
        let mut ops: OpLog<u32> = OpLog::new();
        ops.push_transform(Affine::translate((1.0, 2.0)));
        ops.pop_transform();
        assert!(!ops.is_empty());
        ops.reset();
        assert!(ops.is_empty());
    }
}
