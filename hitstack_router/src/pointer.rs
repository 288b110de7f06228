// Copyright 2025 the Hitstack Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-pointer state: buttons, matching set, grab and hover.
//!
//! A pointer is **Idle** until a press freezes its candidates into a
//! *matching set*. While **Pressed**, events go to that set regardless of
//! where the pointer is, as long as the members keep appearing in new frames.
//! Releasing the last button clears the set.
//!
//! The grab is independent of the press cycle. Once a member wins it, every
//! later press goes to the holder alone, and so does everything while
//! pressed, until the holder disappears from a frame. Events of an Idle
//! pointer are still hit tested.
//!
//! Frame-time maintenance is split in two steps that the router runs in
//! order: [`PointerState::retain_present`] evicts members absent from the new
//! frame, then [`PointerState::resolve_grab`] lets the foremost claimant win.

use core::hash::Hash;

use hitstack_tree::HandlerRegistry;
use kurbo::Point;
use smallvec::SmallVec;

use crate::event::{Buttons, Priority};
use crate::hover::HoverState;

/// Handlers removed from a pointer in one step, in matching-set order.
pub type Evicted<K> = SmallVec<[K; 4]>;

/// Press cycle of a pointer.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum PressState {
    /// No button down.
    Idle,
    /// Buttons down and a non-empty matching set.
    Pressed,
    /// Buttons down, but every member is gone. Nothing is delivered until the
    /// last button is released.
    Abandoned,
}

/// State kept for one physical pointer across frames.
#[derive(Clone, Debug, PartialEq)]
pub struct PointerState<K> {
    buttons: Buttons,
    matching: SmallVec<[K; 4]>,
    grab: Option<K>,
    hover: HoverState<K>,
    position: Point,
    time: u64,
}

impl<K> Default for PointerState<K> {
    fn default() -> Self {
        Self {
            buttons: Buttons::empty(),
            matching: SmallVec::new(),
            grab: None,
            hover: HoverState::default(),
            position: Point::ZERO,
            time: 0,
        }
    }
}

impl<K: Copy + Eq + Hash> PointerState<K> {
    /// A fresh Idle pointer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current press cycle.
    pub fn press_state(&self) -> PressState {
        if self.buttons.is_empty() {
            PressState::Idle
        } else if self.matching.is_empty() {
            PressState::Abandoned
        } else {
            PressState::Pressed
        }
    }

    /// Buttons held down.
    pub fn buttons(&self) -> Buttons {
        self.buttons
    }

    /// Frozen recipients of a pressed pointer, foremost first.
    pub fn matching(&self) -> &[K] {
        &self.matching
    }

    /// Holder of the pointer's grab.
    pub fn grab(&self) -> Option<K> {
        self.grab
    }

    /// Handlers under the pointer.
    pub fn hovered(&self) -> &[K] {
        self.hover.current()
    }

    /// Last known root-space position.
    pub fn position(&self) -> Point {
        self.position
    }

    /// Time marker of the last event.
    pub fn time(&self) -> u64 {
        self.time
    }

    /// Priority of `tag` for this pointer.
    pub fn priority_of(&self, tag: &K) -> Priority {
        if self.grab.as_ref() == Some(tag) {
            Priority::Grabbed
        } else {
            Priority::Shared
        }
    }

    /// Returns true if the state carries nothing worth keeping.
    pub fn is_trivial(&self) -> bool {
        self.buttons.is_empty() && self.grab.is_none() && self.hover.is_empty()
    }

    pub(crate) fn hover_mut(&mut self) -> &mut HoverState<K> {
        &mut self.hover
    }

    pub(crate) fn track(&mut self, position: Point, time: u64) {
        self.position = position;
        self.time = time;
    }

    /// Start a press cycle: hold `buttons` and freeze `candidates`.
    pub(crate) fn press(&mut self, buttons: Buttons, candidates: &[K]) {
        debug_assert!(self.buttons.is_empty(), "press while already pressed");
        self.buttons = buttons;
        self.matching.clear();
        self.matching.extend_from_slice(candidates);
    }

    /// Add buttons to a press cycle in progress.
    pub(crate) fn press_more(&mut self, buttons: Buttons) {
        self.buttons |= buttons;
    }

    /// Lift `buttons`, or every button if empty. Ends the press cycle when
    /// nothing remains down; returns true in that case.
    pub(crate) fn release(&mut self, buttons: Buttons) -> bool {
        if buttons.is_empty() {
            self.buttons = Buttons::empty();
        } else {
            self.buttons.remove(buttons);
        }
        if self.buttons.is_empty() {
            self.matching.clear();
            true
        } else {
            false
        }
    }

    /// End the press cycle at once and forget hover. Returns the members
    /// that were matching. The grab is kept.
    pub(crate) fn cancel(&mut self) -> Evicted<K> {
        self.buttons = Buttons::empty();
        self.hover.clear();
        core::mem::take(&mut self.matching)
    }

    /// Drop every member absent from `registry`, and the grab if its holder
    /// is absent. Hovered handlers that vanished are forgotten silently.
    ///
    /// Returns the evicted members in matching-set order.
    pub fn retain_present(&mut self, registry: &HandlerRegistry<K>) -> Evicted<K> {
        let mut evicted = Evicted::new();
        self.matching.retain(|k| {
            let present = registry.contains(k);
            if !present {
                evicted.push(*k);
            }
            present
        });
        if let Some(holder) = self.grab
            && !registry.contains(&holder)
        {
            tracing::debug!("grab released: holder left the frame");
            self.grab = None;
        }
        self.hover.retain(|k| registry.contains(k));
        evicted
    }

    /// Award the grab to the foremost member that claims it in `registry`,
    /// if no grab is held. Every other member loses and is removed, from
    /// hover too.
    ///
    /// Returns the losers in matching-set order.
    pub fn resolve_grab(&mut self, registry: &HandlerRegistry<K>) -> Evicted<K> {
        if self.grab.is_some() {
            return Evicted::new();
        }
        let Some(winner) = self.matching.iter().copied().find(|k| registry.claims_grab(k)) else {
            return Evicted::new();
        };
        tracing::debug!(losers = self.matching.len() - 1, "grab won");
        self.grab = Some(winner);
        let losers: Evicted<K> = self.matching.iter().copied().filter(|k| *k != winner).collect();
        self.matching.clear();
        self.matching.push(winner);
        self.hover.retain(|k| !losers.contains(k));
        losers
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hitstack_tree::{Attach, AreaTree, HandlerFlags, OpLog};
    use kurbo::Rect;

    fn registry(tags: &[(u32, HandlerFlags)]) -> HandlerRegistry<u32> {
        let mut ops = OpLog::new();
        ops.push_area(Rect::new(0.0, 0.0, 10.0, 10.0));
        for (t, f) in tags {
            ops.attach_with(Attach::new(*t).with_flags(*f));
        }
        ops.pop_area();
        HandlerRegistry::from_tree(&AreaTree::build(ops.ops()).unwrap())
    }

    #[test]
    fn press_cycle_states() {
        let mut p: PointerState<u32> = PointerState::new();
        assert_eq!(p.press_state(), PressState::Idle);
        assert!(p.is_trivial());

        p.press(Buttons::PRIMARY, &[2, 1]);
        assert_eq!(p.press_state(), PressState::Pressed);
        assert_eq!(p.matching(), &[2, 1]);

        p.press_more(Buttons::SECONDARY);
        assert!(!p.release(Buttons::PRIMARY));
        assert_eq!(p.buttons(), Buttons::SECONDARY);
        assert_eq!(p.matching(), &[2, 1]);

        assert!(p.release(Buttons::SECONDARY));
        assert_eq!(p.press_state(), PressState::Idle);
        assert!(p.matching().is_empty());
    }

    #[test]
    fn empty_release_lifts_everything() {
        let mut p: PointerState<u32> = PointerState::new();
        p.press(Buttons::PRIMARY | Buttons::TERTIARY, &[1]);
        assert!(p.release(Buttons::empty()));
        assert!(p.buttons().is_empty());
    }

    #[test]
    fn press_on_nothing_is_abandoned() {
        let mut p: PointerState<u32> = PointerState::new();
        p.press(Buttons::PRIMARY, &[]);
        assert_eq!(p.press_state(), PressState::Abandoned);
    }

    #[test]
    fn absent_members_are_evicted_in_order() {
        let mut p: PointerState<u32> = PointerState::new();
        p.press(Buttons::PRIMARY, &[4, 3, 2, 1]);
        let reg = registry(&[(3, HandlerFlags::empty()), (1, HandlerFlags::empty())]);
        assert_eq!(p.retain_present(&reg).as_slice(), &[4, 2]);
        assert_eq!(p.matching(), &[3, 1]);
        // Nothing left to evict the second time.
        assert!(p.retain_present(&reg).is_empty());
    }

    #[test]
    fn foremost_claimant_wins() {
        let mut p: PointerState<u32> = PointerState::new();
        p.press(Buttons::PRIMARY, &[1, 2, 3]);
        let reg = registry(&[
            (1, HandlerFlags::empty()),
            (2, HandlerFlags::GRAB),
            (3, HandlerFlags::GRAB),
        ]);
        assert_eq!(p.resolve_grab(&reg).as_slice(), &[1, 3]);
        assert_eq!(p.grab(), Some(2));
        assert_eq!(p.matching(), &[2]);
        assert_eq!(p.priority_of(&2), Priority::Grabbed);
        assert_eq!(p.priority_of(&1), Priority::Shared);
    }

    #[test]
    fn no_claim_no_change() {
        let mut p: PointerState<u32> = PointerState::new();
        p.press(Buttons::PRIMARY, &[1, 2]);
        let reg = registry(&[(1, HandlerFlags::empty()), (2, HandlerFlags::empty())]);
        assert!(p.resolve_grab(&reg).is_empty());
        assert_eq!(p.grab(), None);
        assert_eq!(p.matching(), &[1, 2]);
    }

    #[test]
    fn grab_survives_release_and_cancel_but_not_absence() {
        let mut p: PointerState<u32> = PointerState::new();
        p.press(Buttons::PRIMARY, &[1]);
        let reg = registry(&[(1, HandlerFlags::GRAB)]);
        p.resolve_grab(&reg);
        p.release(Buttons::PRIMARY);
        assert_eq!(p.grab(), Some(1));
        p.press(Buttons::PRIMARY, &[1]);
        assert_eq!(p.cancel().as_slice(), &[1]);
        assert_eq!(p.grab(), Some(1));
        assert!(!p.is_trivial());

        p.retain_present(&registry(&[]));
        assert_eq!(p.grab(), None);
        assert!(p.is_trivial());
    }

    #[test]
    fn held_grab_is_not_contested() {
        let mut p: PointerState<u32> = PointerState::new();
        p.press(Buttons::PRIMARY, &[1]);
        let reg = registry(&[(1, HandlerFlags::GRAB), (2, HandlerFlags::GRAB)]);
        p.resolve_grab(&reg);
        p.release(Buttons::PRIMARY);
        // A later cycle whose set somehow holds another claimant keeps the holder.
        p.press(Buttons::PRIMARY, &[2, 1]);
        assert!(p.resolve_grab(&reg).is_empty());
        assert_eq!(p.grab(), Some(1));
        assert_eq!(p.matching(), &[2, 1]);
    }

    #[test]
    fn vanished_hover_is_forgotten() {
        let mut p: PointerState<u32> = PointerState::new();
        p.hover_mut().update(&[1, 2]);
        p.retain_present(&registry(&[(2, HandlerFlags::empty())]));
        assert_eq!(p.hovered(), &[2]);
    }
}
