// Copyright 2025 the Hitstack Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core tree implementation: log replay, structure, and hit-test queries.

use alloc::vec::Vec;
use core::hash::Hash;

use hashbrown::HashSet;
use kurbo::{Affine, Point, Rect};
use smallvec::SmallVec;

use crate::error::{OpsError, ScopeKind};
use crate::ops::Op;
use crate::shape::AreaShape;
use crate::types::{AreaId, HandlerFlags, Outcome, PointerKinds};

/// Root→area path of area ids, outermost first.
pub type AreaPath = SmallVec<[AreaId; 8]>;

/// Something recorded inside an area (or at the root), in log order.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Child {
    Area(AreaId),
    Handler(usize),
}

#[derive(Clone, Debug)]
struct AreaNode {
    parent: Option<AreaId>,
    shape: AreaShape,
    /// Local → root.
    transform: Affine,
    /// Root → local.
    to_local: Affine,
    children: Vec<Child>,
}

/// A handler attachment recorded in one frame.
#[derive(Clone, Debug)]
pub struct Attachment<K> {
    /// Handler identity.
    pub tag: K,
    /// Declared flags. Attachments inside a stop scope always carry
    /// [`HandlerFlags::TERMINATING`].
    pub flags: HandlerFlags,
    /// Event kinds the handler wants.
    pub kinds: PointerKinds,
    /// Local → root transform in effect at the attachment.
    pub transform: Affine,
    /// Areas enclosing the attachment, outermost first. Empty at the root.
    pub path: AreaPath,
}

impl<K> Attachment<K> {
    /// Innermost enclosing area, or `None` for handlers attached at the root.
    pub fn area(&self) -> Option<AreaId> {
        self.path.last().copied()
    }

    /// Returns true if this attachment stops propagation for events of `kind`.
    pub fn terminates(&self, kind: PointerKinds) -> bool {
        self.flags.contains(HandlerFlags::TERMINATING) && self.kinds.intersects(kind)
    }
}

/// Hit-area tree for one frame.
///
/// Built by replaying an operation log with [`AreaTree::build`]. Areas form
/// an implicit tree: the children of an area are every area and handler
/// recorded between its push and the matching pop. The tree root has no
/// geometry, so handlers recorded outside every area match any point.
///
/// The tree is never mutated after it is built; a new frame builds a new tree.
///
/// ## Example
///
/// ```rust
/// use hitstack_tree::{AreaTree, OpLog};
/// use kurbo::{Point, Rect};
///
/// let mut ops = OpLog::new();
/// let area = Rect::new(0.0, 0.0, 100.0, 100.0);
/// ops.push_area(area);
/// ops.attach("&h1");
/// ops.attach("h1");
/// ops.push_area(area);
/// ops.attach("h2");
/// ops.pop_area();
/// ops.push_area(area);
/// ops.attach("h3");
/// ops.attach("h4");
/// ops.pop_area();
/// ops.pop_area();
///
/// let tree = AreaTree::build(ops.ops()).unwrap();
/// // Last recorded is matched first.
/// assert_eq!(
///     tree.hit_test(Point::new(50.0, 50.0)),
///     vec!["h4", "h3", "h2", "h1", "&h1"],
/// );
/// ```
#[derive(Clone)]
pub struct AreaTree<K> {
    areas: Vec<AreaNode>,
    attachments: Vec<Attachment<K>>,
    roots: Vec<Child>,
}

impl<K> core::fmt::Debug for AreaTree<K> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("AreaTree")
            .field("areas", &self.areas.len())
            .field("attachments", &self.attachments.len())
            .field("roots", &self.roots.len())
            .finish_non_exhaustive()
    }
}

impl<K> Default for AreaTree<K> {
    fn default() -> Self {
        Self::new()
    }
}

/// An open push during replay.
#[derive(Clone, Copy, Debug)]
enum Scope {
    Area { index: usize },
    Transform { index: usize, saved: Affine },
    Stop { index: usize },
}

impl Scope {
    fn kind(self) -> ScopeKind {
        match self {
            Self::Area { .. } => ScopeKind::Area,
            Self::Transform { .. } => ScopeKind::Transform,
            Self::Stop { .. } => ScopeKind::Stop,
        }
    }

    fn index(self) -> usize {
        match self {
            Self::Area { index } | Self::Transform { index, .. } | Self::Stop { index } => index,
        }
    }
}

fn close(scopes: &mut Vec<Scope>, index: usize, kind: ScopeKind) -> Result<Scope, OpsError> {
    let Some(open) = scopes.pop() else {
        return Err(OpsError::UnmatchedPop { index, kind });
    };
    if open.kind() != kind {
        return Err(OpsError::MismatchedPop {
            index,
            found: kind,
            open: open.kind(),
        });
    }
    Ok(open)
}

impl<K> AreaTree<K> {
    /// An empty tree: no areas, no handlers.
    pub fn new() -> Self {
        Self {
            areas: Vec::new(),
            attachments: Vec::new(),
            roots: Vec::new(),
        }
    }

    /// Number of areas recorded.
    pub fn area_count(&self) -> usize {
        self.areas.len()
    }

    /// All attachments, in log order.
    pub fn attachments(&self) -> &[Attachment<K>] {
        &self.attachments
    }

    /// Parent of an area, or `None` for top-level areas and unknown ids.
    pub fn parent_of(&self, id: AreaId) -> Option<AreaId> {
        self.areas.get(id.idx()).and_then(|a| a.parent)
    }

    /// Local geometry of an area.
    pub fn shape(&self, id: AreaId) -> Option<&AreaShape> {
        self.areas.get(id.idx()).map(|a| &a.shape)
    }

    /// Local → root transform of an area.
    pub fn transform(&self, id: AreaId) -> Option<Affine> {
        self.areas.get(id.idx()).map(|a| a.transform)
    }

    /// Root-space bounding box of an area's effective region (its own bounds
    /// clipped by every ancestor). Loose under rotation.
    pub fn world_bounds(&self, id: AreaId) -> Option<Rect> {
        let area = self.areas.get(id.idx())?;
        let own = area.transform.transform_rect_bbox(area.shape.bounds());
        Some(match area.parent {
            Some(parent) => own.intersect(self.world_bounds(parent)?),
            None => own,
        })
    }

    /// Returns true if `point` (root space) lies in the effective region of
    /// `id`: inside the area and inside every ancestor.
    pub fn contains(&self, id: AreaId, point: Point) -> bool {
        let mut current = Some(id);
        while let Some(id) = current {
            let Some(area) = self.areas.get(id.idx()) else {
                return false;
            };
            if !area.shape.contains(area.to_local * point) {
                return false;
            }
            current = area.parent;
        }
        true
    }

    /// Walk the attachments whose effective region contains `point`, in
    /// traversal order, until `visitor` returns [`Outcome::Stop`].
    ///
    /// Traversal is depth first, rightmost first: everything recorded inside a
    /// node (areas and handlers alike) is visited in reverse log order, so
    /// whatever was recorded last is matched first. An area whose geometry
    /// does not contain the point is skipped along with its whole subtree.
    ///
    /// Returns the attachment that stopped the walk, if any.
    pub fn visit_point(
        &self,
        point: Point,
        mut visitor: impl FnMut(&Attachment<K>) -> Outcome,
    ) -> Option<&Attachment<K>> {
        // Children are pushed in log order, so popping yields the last one first.
        let mut stack: Vec<Child> = Vec::with_capacity(self.roots.len());
        stack.extend_from_slice(&self.roots);
        while let Some(child) = stack.pop() {
            match child {
                Child::Handler(h) => {
                    let attachment = &self.attachments[h];
                    if visitor(attachment) == Outcome::Stop {
                        return Some(attachment);
                    }
                }
                Child::Area(id) => {
                    let area = &self.areas[id.idx()];
                    if area.shape.contains(area.to_local * point) {
                        stack.extend_from_slice(&area.children);
                    }
                }
            }
        }
        None
    }
}

impl<K: Copy + Eq> AreaTree<K> {
    /// Replay an operation log into a tree.
    ///
    /// Fails if the log is not well nested: a pop with nothing open, a pop
    /// of a different kind than the innermost open push, or pushes left open
    /// at the end. The log is never repaired.
    pub fn build(ops: &[Op<K>]) -> Result<Self, OpsError> {
        let mut tree = Self::new();
        let mut scopes: Vec<Scope> = Vec::new();
        let mut path = AreaPath::new();
        let mut transform = Affine::IDENTITY;
        let mut stops = 0_usize;

        for (index, op) in ops.iter().enumerate() {
            match op {
                Op::PushArea(shape) => {
                    let id = AreaId::new(tree.areas.len());
                    let parent = path.last().copied();
                    tree.areas.push(AreaNode {
                        parent,
                        shape: *shape,
                        transform,
                        to_local: transform.inverse(),
                        children: Vec::new(),
                    });
                    tree.children_mut(parent).push(Child::Area(id));
                    path.push(id);
                    scopes.push(Scope::Area { index });
                }
                Op::PopArea => {
                    close(&mut scopes, index, ScopeKind::Area)?;
                    path.pop();
                }
                Op::PushTransform(t) => {
                    scopes.push(Scope::Transform {
                        index,
                        saved: transform,
                    });
                    transform *= *t;
                }
                Op::PopTransform => {
                    if let Scope::Transform { saved, .. } =
                        close(&mut scopes, index, ScopeKind::Transform)?
                    {
                        transform = saved;
                    }
                }
                Op::PushStop => {
                    scopes.push(Scope::Stop { index });
                    stops += 1;
                }
                Op::PopStop => {
                    close(&mut scopes, index, ScopeKind::Stop)?;
                    stops -= 1;
                }
                Op::Attach(attach) => {
                    let mut flags = attach.flags;
                    if stops > 0 {
                        flags |= HandlerFlags::TERMINATING;
                    }
                    let h = tree.attachments.len();
                    tree.attachments.push(Attachment {
                        tag: attach.tag,
                        flags,
                        kinds: attach.kinds,
                        transform,
                        path: path.clone(),
                    });
                    tree.children_mut(path.last().copied())
                        .push(Child::Handler(h));
                }
            }
        }

        if let Some(open) = scopes.last() {
            return Err(OpsError::Unclosed {
                index: open.index(),
                kind: open.kind(),
                count: scopes.len(),
            });
        }

        tracing::trace!(
            areas = tree.areas.len(),
            attachments = tree.attachments.len(),
            "area tree built"
        );
        Ok(tree)
    }

    fn children_mut(&mut self, area: Option<AreaId>) -> &mut Vec<Child> {
        match area {
            Some(id) => &mut self.areas[id.idx()].children,
            None => &mut self.roots,
        }
    }
}

impl<K: Copy + Eq + Hash> AreaTree<K> {
    /// Ordered handler tags whose effective region contains `point`.
    ///
    /// Tags are reported once, at their foremost position. No termination or
    /// grab filtering is applied; see [`AreaTree::visit_point`] for a walk
    /// that can stop early.
    pub fn hit_test(&self, point: Point) -> Vec<K> {
        let mut out: Vec<K> = Vec::new();
        let mut seen = HashSet::new();
        self.visit_point(point, |a| {
            if seen.insert(a.tag) {
                out.push(a.tag);
            }
            Outcome::Continue
        });
        out
    }
}
