// Copyright 2025 the Hitstack Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Hitstack Router: pointer disambiguation for immediate-mode interfaces.
//!
//! ## Overview
//!
//! Handlers in an immediate-mode interface exist only as tags recorded into a
//! frame's [`OpLog`](hitstack_tree::OpLog). Several of them can sit under the
//! same point: a button inside a scrollable list inside a pannable canvas.
//! This crate decides which of them receive each pointer event, and keeps that
//! decision stable while frames are re-recorded underneath.
//!
//! ## Protocol
//!
//! - A press freezes the handlers under the pointer into a *matching set*, in
//!   hit-test order, stopping after the first terminating handler.
//! - While pressed, every event of that pointer goes to the matching set, no
//!   matter where the pointer moves.
//! - Each [`Router::frame`] re-checks presence: members that were not recorded
//!   receive one Cancel and are dropped.
//! - A member that re-declares itself with
//!   [`HandlerFlags::GRAB`](hitstack_tree::HandlerFlags::GRAB) takes the
//!   pointer. The foremost claimant wins, the other members receive Cancel,
//!   and the holder receives every press, and everything while pressed, at
//!   [`Priority::Grabbed`] until it stops being recorded. Events of a pointer
//!   with no button down are hit tested as usual.
//!
//! Gesture recognition stays in the handlers. A list that sees a press turn
//! into a drag claims the grab; the row under the finger gets Cancel and
//! never reports a click.
//!
//! ## Hover
//!
//! Enter and Leave are synthesized per handler when the set of eligible
//! handlers under the pointer changes. See [`hover`].
//!
//! ## Coordinates
//!
//! Events arrive in root space and are delivered in each handler's local
//! space, using the transform in effect at its first attachment.
//!
//! ## Workflow
//!
//! 1) Record a frame into an [`OpLog`](hitstack_tree::OpLog).
//! 2) [`Router::frame`] installs it and returns the Cancels it causes.
//! 3) [`Router::queue`] routes the physical events received since.
//! 4) Handlers read their events with [`Deliveries::for_tag`].
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod dispatcher;
pub mod event;
pub mod hover;
pub mod pointer;
pub mod router;

pub use dispatcher::Deliveries;
pub use event::{
    Buttons, Delivery, PointerEvent, PointerId, PointerKey, PointerKind, Priority, Source,
};
pub use pointer::{PointerState, PressState};
pub use router::Router;
