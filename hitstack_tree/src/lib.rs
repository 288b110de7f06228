// Copyright 2025 the Hitstack Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Hitstack Tree: hit areas and handler attachments rebuilt from a per-frame operation log.
//!
//! Immediate-mode interfaces do not keep widget objects around between frames.
//! Instead, every frame records an [`OpLog`] describing where input handlers
//! live: nested hit areas (pushed and popped like clips), optional transforms,
//! and handler attachments identified by opaque tags. This crate replays that
//! log into an [`AreaTree`] and answers hit-test queries against it.
//!
//! - Represents nested hit areas in an arena, each attachment keeping its
//!   root→area path.
//! - Hit tests depth first, rightmost first, pruning areas that do not contain
//!   the point.
//! - Indexes the frame's handlers by tag in a [`HandlerRegistry`] so pointer
//!   state can check presence without a hit test.
//!
//! ## Hit areas
//!
//! The effective region of an area is the intersection of its own geometry
//! with the geometry of every enclosing area. Rectangles and ellipses are
//! tested exactly; any other [`kurbo::Shape`] is approximated by its bounding
//! box (see [`AreaShape`]).
//!
//! ## Matching order
//!
//! Areas form an implicit tree with handlers as leaves. The children of an
//! area are every area and handler recorded between its push and the matching
//! pop. Matching walks the tree depth first, visiting the children of a node
//! in reverse log order:
//!
//! ```text
//!        root
//!         |
//!   &h1, h1, child1, child2
//!              |        |
//!              h2     h3, h4
//! ```
//!
//! yields `h4, h3, h2, h1, &h1` for a point inside every area.
//!
//! ## Not an event router
//!
//! This crate does not track pointers, grabs or presses. See `hitstack_router`
//! for the disambiguation protocol built on top of it.
//!
//! ## API overview
//!
//! - [`OpLog`] / [`Op`]: the recorded frame description.
//! - [`AreaTree::build`] → [`AreaTree`], or [`OpsError`] for unbalanced logs.
//! - [`AreaTree::hit_test`] and [`AreaTree::visit_point`].
//! - [`HandlerRegistry::from_tree`] → [`HandlerRegistry`].
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod error;
mod ops;
mod registry;
mod shape;
mod tree;
mod types;

pub use error::{OpsError, ScopeKind};
pub use ops::{Attach, Op, OpLog};
pub use registry::{HandlerEntry, HandlerRegistry};
pub use shape::AreaShape;
pub use tree::{AreaPath, AreaTree, Attachment};
pub use types::{AreaId, HandlerFlags, Outcome, PointerKinds};
