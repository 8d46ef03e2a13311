// Copyright 2025 the VESS Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! In-order iterators.

use alloc::vec::Vec;
use core::fmt;
use core::iter::FusedIterator;

use smallvec::SmallVec;

use crate::node::{NodeArena, NodeId, Side};

/// Spine stack deep enough for any tree of up to about 2^16 entries without
/// spilling to the heap.
type Spine = SmallVec<[NodeId; 32]>;

/// Iterator over `(&K, &V)` in ascending key order.
///
/// Created by [`TreeMap::iter`](crate::TreeMap::iter).
pub struct Iter<'a, K, V> {
    nodes: &'a NodeArena<K, V>,
    front: Spine,
    back: Spine,
    remaining: usize,
}

impl<'a, K, V> Iter<'a, K, V> {
    pub(crate) fn new(nodes: &'a NodeArena<K, V>, root: Option<NodeId>, len: usize) -> Self {
        let mut iter = Self {
            nodes,
            front: Spine::new(),
            back: Spine::new(),
            remaining: len,
        };
        iter.descend(root, Side::Left);
        iter.descend(root, Side::Right);
        iter
    }

    /// Pushes `from` and its chain of `side` children onto that end's stack.
    fn descend(&mut self, mut from: Option<NodeId>, side: Side) {
        let stack = match side {
            Side::Left => &mut self.front,
            Side::Right => &mut self.back,
        };
        while let Some(id) = from {
            stack.push(id);
            from = self.nodes.get(id).child(side);
        }
    }

    fn step(&mut self, side: Side) -> Option<(&'a K, &'a V)> {
        if self.remaining == 0 {
            return None;
        }
        let stack = match side {
            Side::Left => &mut self.front,
            Side::Right => &mut self.back,
        };
        let id = stack.pop()?;
        self.remaining -= 1;
        let nodes = self.nodes;
        let node = nodes.get(id);
        self.descend(node.child(side.flip()), side);
        Some((&node.key, &node.value))
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        self.step(Side::Left)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> DoubleEndedIterator for Iter<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.step(Side::Right)
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

impl<K, V> FusedIterator for Iter<'_, K, V> {}

impl<K, V> Clone for Iter<'_, K, V> {
    fn clone(&self) -> Self {
        Self {
            nodes: self.nodes,
            front: self.front.clone(),
            back: self.back.clone(),
            remaining: self.remaining,
        }
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for Iter<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

/// Iterator over keys in ascending order.
///
/// Created by [`TreeMap::keys`](crate::TreeMap::keys).
pub struct Keys<'a, K, V>(pub(crate) Iter<'a, K, V>);

impl<K, V> Clone for Keys<'_, K, V> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<'a, K, V> Iterator for Keys<'a, K, V> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next().map(|(key, _)| key)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for Keys<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.0.next_back().map(|(key, _)| key)
    }
}

impl<K, V> ExactSizeIterator for Keys<'_, K, V> {}

impl<K, V> FusedIterator for Keys<'_, K, V> {}

impl<K: fmt::Debug, V> fmt::Debug for Keys<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

/// Iterator over values in ascending key order.
///
/// Created by [`TreeMap::values`](crate::TreeMap::values).
pub struct Values<'a, K, V>(pub(crate) Iter<'a, K, V>);

impl<K, V> Clone for Values<'_, K, V> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<'a, K, V> Iterator for Values<'a, K, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next().map(|(_, value)| value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for Values<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.0.next_back().map(|(_, value)| value)
    }
}

impl<K, V> ExactSizeIterator for Values<'_, K, V> {}

impl<K, V> FusedIterator for Values<'_, K, V> {}

impl<K, V: fmt::Debug> fmt::Debug for Values<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

/// Owning iterator over `(K, V)` in ascending key order.
///
/// Created by [`TreeMap`](crate::TreeMap)'s `IntoIterator` implementation.
/// Entries are unlinked up front, so dropping the iterator early is cheap.
pub struct IntoIter<K, V> {
    entries: alloc::vec::IntoIter<(K, V)>,
}

impl<K, V> IntoIter<K, V> {
    pub(crate) fn new(mut nodes: NodeArena<K, V>, root: Option<NodeId>, len: usize) -> Self {
        let mut order = Vec::with_capacity(len);
        let mut spine = Spine::new();
        let mut cursor = root;
        loop {
            while let Some(id) = cursor {
                spine.push(id);
                cursor = nodes.get(id).left;
            }
            let Some(id) = spine.pop() else { break };
            order.push(id);
            cursor = nodes.get(id).right;
        }
        let entries: Vec<(K, V)> = order
            .into_iter()
            .map(|id| {
                let node = nodes.release(id);
                (node.key, node.value)
            })
            .collect();
        Self {
            entries: entries.into_iter(),
        }
    }
}

impl<K, V> Iterator for IntoIter<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        self.entries.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.entries.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for IntoIter<K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.entries.next_back()
    }
}

impl<K, V> ExactSizeIterator for IntoIter<K, V> {}

impl<K, V> FusedIterator for IntoIter<K, V> {}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for IntoIter<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.entries.as_slice()).finish()
    }
}
