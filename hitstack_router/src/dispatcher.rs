// Copyright 2025 the Hitstack Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Ordered delivery lists produced by the router.
//!
//! The router never calls into handlers. It returns [`Deliveries`]: every
//! event addressed to every handler, in the order they should be observed.
//! Applications either walk the list once, or ask each handler for its own
//! events with [`Deliveries::for_tag`] the way an immediate-mode widget reads
//! its input while it is being recorded.

use alloc::vec::Vec;

use crate::event::{Delivery, PointerEvent, PointerKind};

/// Events produced by [`Router::frame`](crate::Router::frame) or
/// [`Router::queue`](crate::Router::queue), in delivery order.
#[derive(Clone, Debug, PartialEq)]
pub struct Deliveries<K> {
    list: Vec<Delivery<K>>,
}

impl<K> Default for Deliveries<K> {
    fn default() -> Self {
        Self { list: Vec::new() }
    }
}

impl<K: Copy + PartialEq> Deliveries<K> {
    /// No deliveries.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of deliveries.
    pub fn len(&self) -> usize {
        self.list.len()
    }

    /// Returns true if nothing was delivered.
    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    /// Iterate all deliveries in order.
    pub fn iter(&self) -> core::slice::Iter<'_, Delivery<K>> {
        self.list.iter()
    }

    /// Events addressed to `tag`, in order.
    pub fn for_tag(&self, tag: K) -> impl Iterator<Item = &PointerEvent> + '_ {
        self.list
            .iter()
            .filter(move |d| d.tag == tag)
            .map(|d| &d.event)
    }

    /// Number of [`PointerKind::Cancel`] deliveries addressed to `tag`.
    pub fn cancelled(&self, tag: K) -> usize {
        self.for_tag(tag)
            .filter(|e| e.kind == PointerKind::Cancel)
            .count()
    }

    /// The underlying list.
    pub fn as_slice(&self) -> &[Delivery<K>] {
        &self.list
    }

    /// Take the underlying list.
    pub fn into_vec(self) -> Vec<Delivery<K>> {
        self.list
    }

    pub(crate) fn push(&mut self, delivery: Delivery<K>) {
        self.list.push(delivery);
    }

    /// Move every delivery of `other` to the end of `self`.
    pub fn append(&mut self, other: Self) {
        self.list.extend(other.list);
    }
}

impl<K> IntoIterator for Deliveries<K> {
    type Item = Delivery<K>;
    type IntoIter = alloc::vec::IntoIter<Delivery<K>>;

    fn into_iter(self) -> Self::IntoIter {
        self.list.into_iter()
    }
}

impl<'a, K> IntoIterator for &'a Deliveries<K> {
    type Item = &'a Delivery<K>;
    type IntoIter = core::slice::Iter<'a, Delivery<K>>;

    fn into_iter(self) -> Self::IntoIter {
        self.list.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::Priority;
    use alloc::vec;

    fn deliver(tag: u32, event: PointerEvent) -> Delivery<u32> {
        Delivery {
            tag,
            event,
            priority: Priority::Shared,
        }
    }

    #[test]
    fn for_tag_keeps_order() {
        let mut d = Deliveries::new();
        d.push(deliver(1, PointerEvent::press((0.0, 0.0))));
        d.push(deliver(2, PointerEvent::press((0.0, 0.0))));
        d.push(deliver(1, PointerEvent::moved((1.0, 0.0))));
        d.push(deliver(1, PointerEvent::cancel()));

        let kinds: Vec<_> = d.for_tag(1).map(|e| e.kind).collect();
        assert_eq!(
            kinds,
            vec![PointerKind::Press, PointerKind::Move, PointerKind::Cancel]
        );
        assert_eq!(d.cancelled(1), 1);
        assert_eq!(d.cancelled(2), 0);
        assert_eq!(d.for_tag(3).count(), 0);
        assert_eq!(d.len(), 4);
    }

    #[test]
    fn append_concatenates() {
        let mut a = Deliveries::new();
        a.push(deliver(1, PointerEvent::press((0.0, 0.0))));
        let mut b = Deliveries::new();
        b.push(deliver(2, PointerEvent::release((0.0, 0.0))));
        a.append(b);
        let tags: Vec<u32> = a.into_iter().map(|d| d.tag).collect();
        assert_eq!(tags, vec![1, 2]);
    }
}
