// Copyright 2025 the Hitstack Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Handler registry: per-frame presence and declarations by tag.
//!
//! Pointer state outlives frames, but handler attachments do not. The router
//! keeps handler tags, and asks the current frame's [`HandlerRegistry`] whether
//! a tag still appears, whether it now claims a grab, and how to localize
//! events for it. Presence is independent of position: a pressed pointer's
//! handler stays eligible wherever the pointer goes, as long as it is
//! recorded somewhere in the frame.

use core::hash::Hash;

use hashbrown::HashMap;
use kurbo::Affine;

use crate::tree::{AreaPath, AreaTree};
use crate::types::{AreaId, HandlerFlags, PointerKinds};

/// What one frame declares about a handler tag.
#[derive(Clone, Debug, PartialEq)]
pub struct HandlerEntry {
    /// Union of the flags of every attachment of the tag.
    pub flags: HandlerFlags,
    /// Union of the interest masks of every attachment of the tag.
    pub kinds: PointerKinds,
    /// Local → root transform of the first attachment in log order.
    pub transform: Affine,
    /// Area path of the first attachment in log order.
    pub path: AreaPath,
    /// Number of attachments sharing the tag.
    pub attachments: usize,
}

/// Tag → [`HandlerEntry`] map for one frame.
#[derive(Clone, Debug)]
pub struct HandlerRegistry<K> {
    entries: HashMap<K, HandlerEntry>,
}

impl<K> Default for HandlerRegistry<K> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }
}

impl<K: Copy + Eq + Hash> HandlerRegistry<K> {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect every attachment of `tree` by tag.
    pub fn from_tree(tree: &AreaTree<K>) -> Self {
        let mut entries: HashMap<K, HandlerEntry> = HashMap::new();
        for a in tree.attachments() {
            entries
                .entry(a.tag)
                .and_modify(|e| {
                    e.flags |= a.flags;
                    e.kinds |= a.kinds;
                    e.attachments += 1;
                })
                .or_insert_with(|| HandlerEntry {
                    flags: a.flags,
                    kinds: a.kinds,
                    transform: a.transform,
                    path: a.path.clone(),
                    attachments: 1,
                });
        }
        Self { entries }
    }

    /// Returns true if the tag appears in the frame.
    pub fn contains(&self, tag: &K) -> bool {
        self.entries.contains_key(tag)
    }

    /// The frame's declarations for a tag.
    pub fn get(&self, tag: &K) -> Option<&HandlerEntry> {
        self.entries.get(tag)
    }

    /// Merged flags of the tag, or empty if absent.
    pub fn flags(&self, tag: &K) -> HandlerFlags {
        self.entries.get(tag).map_or(HandlerFlags::empty(), |e| e.flags)
    }

    /// Merged interest of the tag, or empty if absent.
    pub fn kinds(&self, tag: &K) -> PointerKinds {
        self.entries.get(tag).map_or(PointerKinds::empty(), |e| e.kinds)
    }

    /// Area path of the tag's first attachment.
    pub fn path(&self, tag: &K) -> Option<&[AreaId]> {
        self.entries.get(tag).map(|e| e.path.as_slice())
    }

    /// Returns true if any attachment of the tag sets [`HandlerFlags::GRAB`].
    pub fn claims_grab(&self, tag: &K) -> bool {
        self.entries
            .get(tag)
            .is_some_and(|e| e.flags.contains(HandlerFlags::GRAB))
    }

    /// Returns true if the tag is present and interested in `kind`.
    pub fn wants(&self, tag: &K, kind: PointerKinds) -> bool {
        self.entries.get(tag).is_some_and(|e| e.kinds.intersects(kind))
    }

    /// Local → root transform for the tag, or identity if absent.
    pub fn transform(&self, tag: &K) -> Affine {
        self.entries
            .get(tag)
            .map_or(Affine::IDENTITY, |e| e.transform)
    }

    /// Number of distinct tags.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no handler was recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate the tags, in no particular order.
    pub fn tags(&self) -> impl Iterator<Item = &K> + '_ {
        self.entries.keys()
    }
}
