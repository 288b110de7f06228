// Copyright 2025 the Hitstack Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Hover tracking: Enter/Leave transitions between hit sets.
//!
//! Hit areas may overlap without nesting, so hover is a set rather than a
//! path. Feed the handlers currently under the pointer, in hit order, to
//! [`HoverState::update`]; it returns the handlers that were left (in the
//! order they were hovered) followed by the ones newly entered (in hit order).
//!
//! ```
//! use hitstack_router::hover::{HoverEvent, HoverState};
//!
//! let mut hover: HoverState<u32> = HoverState::new();
//! assert_eq!(hover.update(&[2, 1]), vec![HoverEvent::Enter(2), HoverEvent::Enter(1)]);
//! assert_eq!(hover.update(&[3, 1]), vec![HoverEvent::Leave(2), HoverEvent::Enter(3)]);
//! assert_eq!(hover.current(), &[3, 1]);
//! ```

use alloc::vec::Vec;
use smallvec::SmallVec;

/// A hover transition for one handler.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HoverEvent<K> {
    /// The pointer is now over the handler.
    Enter(K),
    /// The pointer is no longer over the handler.
    Leave(K),
}

/// The set of handlers under one pointer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HoverState<K> {
    current: SmallVec<[K; 4]>,
}

impl<K> Default for HoverState<K> {
    fn default() -> Self {
        Self {
            current: SmallVec::new(),
        }
    }
}

impl<K: Copy + Eq> HoverState<K> {
    /// Nothing hovered.
    pub fn new() -> Self {
        Self::default()
    }

    /// Currently hovered handlers, in the order of the last update.
    pub fn current(&self) -> &[K] {
        &self.current
    }

    /// Returns true if nothing is hovered.
    pub fn is_empty(&self) -> bool {
        self.current.is_empty()
    }

    /// Replace the hovered set with `hits` and report the transitions.
    pub fn update(&mut self, hits: &[K]) -> Vec<HoverEvent<K>> {
        let mut out = Vec::new();
        for &k in &self.current {
            if !hits.contains(&k) {
                out.push(HoverEvent::Leave(k));
            }
        }
        for &k in hits {
            if !self.current.contains(&k) {
                out.push(HoverEvent::Enter(k));
            }
        }
        self.current.clear();
        self.current.extend_from_slice(hits);
        out
    }

    /// Forget everything without reporting transitions.
    pub fn clear(&mut self) {
        self.current.clear();
    }

    /// Keep only the handlers for which `keep` returns true, without
    /// reporting transitions.
    pub fn retain(&mut self, mut keep: impl FnMut(&K) -> bool) {
        self.current.retain(|k| keep(k));
    }
}
