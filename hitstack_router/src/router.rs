// Copyright 2025 the Hitstack Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Router: frames in, pointer events in, deliveries out.
//!
//! ## Minimal example
//!
//! ```
//! use hitstack_router::{PointerEvent, PointerKind, Priority, Router};
//! use hitstack_tree::{Attach, HandlerFlags, OpLog};
//! use kurbo::Rect;
//!
//! const LIST: u32 = 1;
//! const ROW: u32 = 2;
//!
//! let record = |list_flags: HandlerFlags| {
//!     let mut ops = OpLog::new();
//!     ops.push_area(Rect::new(0.0, 0.0, 100.0, 300.0));
//!     ops.attach_with(Attach::new(LIST).with_flags(list_flags));
//!     ops.push_area(Rect::new(0.0, 0.0, 100.0, 20.0));
//!     ops.attach(ROW);
//!     ops.pop_area();
//!     ops.pop_area();
//!     ops
//! };
//!
//! let mut router: Router<u32> = Router::new();
//! router.frame(&record(HandlerFlags::empty())).unwrap();
//!
//! // Both the row and the list see the press, row first.
//! let d = router.dispatch(PointerEvent::press((10.0, 10.0)));
//! assert!(d.for_tag(ROW).any(|e| e.kind == PointerKind::Press));
//! assert!(d.for_tag(LIST).any(|e| e.kind == PointerKind::Press));
//!
//! // The list recognizes a drag and claims the pointer in the next frame.
//! router.dispatch(PointerEvent::moved((10.0, 40.0)));
//! let d = router.frame(&record(HandlerFlags::GRAB)).unwrap();
//! assert_eq!(d.cancelled(ROW), 1);
//!
//! let d = router.dispatch(PointerEvent::moved((10.0, 80.0)));
//! assert!(d.iter().all(|d| d.tag == LIST && d.priority == Priority::Grabbed));
//! ```

use alloc::collections::BTreeMap;
use core::fmt::Debug;
use core::hash::Hash;

use hashbrown::HashSet;
use hitstack_tree::{AreaTree, HandlerRegistry, OpLog, OpsError, Outcome, PointerKinds};
use kurbo::Point;
use smallvec::SmallVec;

use crate::dispatcher::Deliveries;
use crate::event::{Buttons, Delivery, PointerEvent, PointerKey, PointerKind, Priority, Source};
use crate::hover::HoverEvent;
use crate::pointer::{PointerState, PressState};

type Hits<K> = SmallVec<[K; 8]>;

/// Pointer router for an immediate-mode interface.
///
/// Owns the current frame (tree and registry) and one [`PointerState`] per
/// pointer. Call [`Router::frame`] once per recorded frame and
/// [`Router::queue`] with the physical events received since.
#[derive(Clone, Debug)]
pub struct Router<K> {
    tree: AreaTree<K>,
    registry: HandlerRegistry<K>,
    pointers: BTreeMap<PointerKey, PointerState<K>>,
}

impl<K> Default for Router<K> {
    fn default() -> Self {
        Self {
            tree: AreaTree::default(),
            registry: HandlerRegistry::default(),
            pointers: BTreeMap::new(),
        }
    }
}

impl<K: Copy + Eq + Hash + Debug> Router<K> {
    /// A router with an empty frame and no pointers.
    pub fn new() -> Self {
        Self::default()
    }

    /// The current frame's tree.
    pub fn tree(&self) -> &AreaTree<K> {
        &self.tree
    }

    /// The current frame's handlers.
    pub fn registry(&self) -> &HandlerRegistry<K> {
        &self.registry
    }

    /// State of one pointer. Pointers that carry nothing are not stored.
    pub fn pointer(&self, key: PointerKey) -> Option<&PointerState<K>> {
        self.pointers.get(&key)
    }

    /// Every tracked pointer, in key order.
    pub fn pointers(&self) -> impl Iterator<Item = (&PointerKey, &PointerState<K>)> + '_ {
        self.pointers.iter()
    }

    /// Install a newly recorded frame.
    ///
    /// For every pointer, members absent from the new frame receive one
    /// Cancel and are dropped (the grab too, if its holder is absent). Then
    /// grabs are resolved: where no grab is held and members now claim one,
    /// the foremost claimant becomes the holder and every other member
    /// receives Cancel.
    ///
    /// A log that is not well nested is rejected and the previous frame stays
    /// in place.
    pub fn frame(&mut self, log: &OpLog<K>) -> Result<Deliveries<K>, OpsError> {
        let tree = AreaTree::build(log.ops())?;
        let registry = HandlerRegistry::from_tree(&tree);
        let mut out = Deliveries::new();

        for (key, state) in self.pointers.iter_mut() {
            let holder = state.grab();
            let cancel = cancel_event(*key, state);
            for tag in state.retain_present(&registry) {
                tracing::debug!(?tag, pointer = key.id, "handler left the frame; cancelled");
                // Gone from the new frame, so localize with the last one it was in.
                out.push(Delivery {
                    tag,
                    event: cancel.localized(self.registry.transform(&tag)),
                    priority: if holder == Some(tag) {
                        Priority::Grabbed
                    } else {
                        Priority::Shared
                    },
                });
            }
            for tag in state.resolve_grab(&registry) {
                out.push(Delivery {
                    tag,
                    event: cancel.localized(registry.transform(&tag)),
                    priority: Priority::Shared,
                });
            }
        }
        self.pointers.retain(|_, s| !s.is_trivial());

        tracing::trace!(
            handlers = registry.len(),
            pointers = self.pointers.len(),
            deliveries = out.len(),
            "frame installed"
        );
        self.tree = tree;
        self.registry = registry;
        Ok(out)
    }

    /// Route physical events in arrival order.
    pub fn queue(&mut self, events: impl IntoIterator<Item = PointerEvent>) -> Deliveries<K> {
        let mut out = Deliveries::new();
        for event in events {
            out.append(self.dispatch(event));
        }
        out
    }

    /// Route one physical event.
    pub fn dispatch(&mut self, event: PointerEvent) -> Deliveries<K> {
        let key = event.key();
        let Self {
            tree,
            registry,
            pointers,
        } = self;
        let state = pointers.entry(key).or_default();
        let cx = Cx {
            tree,
            registry,
            out: Deliveries::new(),
        };
        let out = cx.route(state, event);
        if state.is_trivial() {
            pointers.remove(&key);
        }
        out
    }
}

/// Borrowed frame plus the deliveries of one physical event.
struct Cx<'a, K> {
    tree: &'a AreaTree<K>,
    registry: &'a HandlerRegistry<K>,
    out: Deliveries<K>,
}

impl<K: Copy + Eq + Hash + Debug> Cx<'_, K> {
    fn route(mut self, state: &mut PointerState<K>, event: PointerEvent) -> Deliveries<K> {
        if event.kind != PointerKind::Cancel {
            state.track(event.position, event.time);
        }
        match event.kind {
            PointerKind::Press => {
                let buttons = if event.buttons.is_empty() {
                    Buttons::PRIMARY
                } else {
                    event.buttons
                };
                let event = event.with_buttons(buttons);
                if state.press_state() == PressState::Idle {
                    let candidates = self.candidates(state, event.position);
                    tracing::trace!(?candidates, pointer = event.pointer, "press");
                    state.press(buttons, &candidates);
                } else {
                    state.press_more(buttons);
                }
                self.hover(state, &event);
                let members: Hits<K> = state.matching().into();
                self.deliver_all(state, &members, event);
            }
            PointerKind::Release => {
                self.hover(state, &event);
                let recipients = self.recipients(state, &event);
                self.deliver_all(state, &recipients, event);
                let ended = state.release(event.buttons);
                if ended && event.source != Source::Mouse {
                    // A lifted finger or pen is no longer over anything.
                    let left = state.hover_mut().update(&[]);
                    self.transitions(state, left, event);
                }
            }
            PointerKind::Move | PointerKind::Scroll | PointerKind::Enter => {
                let event = if event.kind == PointerKind::Enter {
                    event.with_kind(PointerKind::Move)
                } else {
                    event
                };
                self.hover(state, &event);
                let recipients = self.recipients(state, &event);
                self.deliver_all(state, &recipients, event);
            }
            PointerKind::Leave => {
                let left = state.hover_mut().update(&[]);
                self.transitions(state, left, event);
            }
            PointerKind::Cancel => {
                let event = PointerEvent {
                    position: state.position(),
                    ..event
                };
                let members = state.cancel();
                tracing::debug!(
                    members = members.len(),
                    pointer = event.pointer,
                    "pointer cancelled"
                );
                self.deliver_all(state, &members, event);
            }
        }
        self.out
    }

    /// Handlers a press at `point` reaches: the grab holder alone if there is
    /// one, otherwise the fresh hits for a press.
    fn candidates(&self, state: &PointerState<K>, point: Point) -> Hits<K> {
        match state.grab() {
            Some(holder) => core::iter::once(holder).collect(),
            None => self.hits(point, PointerKinds::PRESS),
        }
    }

    /// Hit test up to and including the first attachment that terminates
    /// for `kind`.
    fn hits(&self, point: Point, kind: PointerKinds) -> Hits<K> {
        let mut hits = Hits::new();
        let mut seen = HashSet::new();
        self.tree.visit_point(point, |a| {
            if seen.insert(a.tag) {
                hits.push(a.tag);
            }
            if a.terminates(kind) {
                Outcome::Stop
            } else {
                Outcome::Continue
            }
        });
        hits
    }

    /// Recipients of a non-press event.
    fn recipients(&self, state: &PointerState<K>, event: &PointerEvent) -> Hits<K> {
        match state.press_state() {
            PressState::Pressed => state.matching().into(),
            PressState::Abandoned => Hits::new(),
            PressState::Idle => self.hits(event.position, event.kind.mask()),
        }
    }

    /// Update hover from the handlers under the pointer that could receive
    /// its events, and deliver the transitions.
    fn hover(&mut self, state: &mut PointerState<K>, event: &PointerEvent) {
        let mut hits = self.hits(event.position, event.kind.mask());
        if state.press_state() != PressState::Idle {
            hits.retain(|k| state.matching().contains(k));
        }
        let transitions = state.hover_mut().update(&hits);
        self.transitions(state, transitions, *event);
    }

    fn transitions(
        &mut self,
        state: &PointerState<K>,
        transitions: impl IntoIterator<Item = HoverEvent<K>>,
        event: PointerEvent,
    ) {
        for t in transitions {
            let (tag, kind) = match t {
                HoverEvent::Enter(tag) => (tag, PointerKind::Enter),
                HoverEvent::Leave(tag) => (tag, PointerKind::Leave),
            };
            self.deliver(state, tag, event.with_kind(kind));
        }
    }

    fn deliver_all(&mut self, state: &PointerState<K>, tags: &[K], event: PointerEvent) {
        for &tag in tags {
            self.deliver(state, tag, event);
        }
    }

    fn deliver(&mut self, state: &PointerState<K>, tag: K, event: PointerEvent) {
        if event.kind != PointerKind::Cancel && !self.registry.wants(&tag, event.kind.mask()) {
            return;
        }
        self.out.push(Delivery {
            tag,
            event: event.localized(self.registry.transform(&tag)),
            priority: state.priority_of(&tag),
        });
    }
}

fn cancel_event<K>(key: PointerKey, state: &PointerState<K>) -> PointerEvent
where
    K: Copy + Eq + Hash,
{
    PointerEvent::new(PointerKind::Cancel, state.position())
        .with_pointer(key.source, key.id)
        .with_buttons(state.buttons())
        .at(state.time())
}
