// Copyright 2025 the VESS Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Rotations and the red-black repair passes run after linking or unlinking a
//! node.
//!
//! None of this needs the comparator: by the time these run, the position of
//! every key is already decided.

use crate::map::TreeMap;
use crate::node::{Color, NodeId, Side};
use crate::trace::{InsertCase, RebalanceTrace, RemoveCase};

impl<K, V, C> TreeMap<K, V, C> {
    #[inline]
    fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id).parent
    }

    #[inline]
    fn child(&self, id: NodeId, side: Side) -> Option<NodeId> {
        self.nodes.get(id).child(side)
    }

    /// Absent children are black leaves.
    #[inline]
    fn is_red(&self, id: Option<NodeId>) -> bool {
        id.is_some_and(|id| self.nodes.get(id).is_red())
    }

    #[inline]
    fn paint(&mut self, id: NodeId, color: Color) {
        self.nodes.get_mut(id).color = color;
    }

    /// Which side of `parent` holds `child`.
    fn side_of(&self, parent: NodeId, child: NodeId) -> Side {
        if self.child(parent, Side::Left) == Some(child) {
            Side::Left
        } else {
            debug_assert_eq!(
                self.child(parent, Side::Right),
                Some(child),
                "node is not a child of its recorded parent"
            );
            Side::Right
        }
    }

    /// Points whatever referenced `old` (its parent's child slot, or the
    /// root) at `new` instead. Does not touch `new`'s parent link.
    fn replace_child(&mut self, parent: Option<NodeId>, old: NodeId, new: Option<NodeId>) {
        match parent {
            Some(parent) => {
                let side = self.side_of(parent, old);
                *self.nodes.get_mut(parent).child_mut(side) = new;
            }
            None => self.root = new,
        }
    }

    pub(crate) fn paint_root_black(&mut self) {
        if let Some(root) = self.root {
            self.paint(root, Color::Black);
        }
    }

    /// Rotates `id` down towards `direction`; its child on the opposite side
    /// takes its place.
    ///
    /// # Panics
    ///
    /// Panics if that child does not exist.
    fn rotate<T>(&mut self, id: NodeId, direction: Side, trace: &mut T)
    where
        T: RebalanceTrace + ?Sized,
    {
        let up_side = direction.flip();
        let Some(pivot) = self.child(id, up_side) else {
            panic!("cannot rotate {direction:?}: node has no {up_side:?} child to promote");
        };
        trace.rotate(direction);

        let parent = self.parent(id);
        let inner = self.child(pivot, direction);

        *self.nodes.get_mut(id).child_mut(up_side) = inner;
        if let Some(inner) = inner {
            self.nodes.get_mut(inner).parent = Some(id);
        }

        self.replace_child(parent, id, Some(pivot));
        self.nodes.get_mut(pivot).parent = parent;

        *self.nodes.get_mut(pivot).child_mut(direction) = Some(id);
        self.nodes.get_mut(id).parent = Some(pivot);
    }

    /// Restores the red-black rules after linking the red node `id`.
    pub(crate) fn insert_fixup<T>(&mut self, mut id: NodeId, trace: &mut T)
    where
        T: RebalanceTrace + ?Sized,
    {
        loop {
            let Some(mut parent) = self.parent(id) else {
                trace.insert_case(InsertCase::Root);
                self.paint(id, Color::Black);
                return;
            };
            if !self.is_red(Some(parent)) {
                trace.insert_case(InsertCase::BlackParent);
                return;
            }

            let Some(grandparent) = self.parent(parent) else {
                panic!("red node without a parent: the root must be black");
            };
            let parent_side = self.side_of(grandparent, parent);
            let uncle = self.child(grandparent, parent_side.flip());

            if self.is_red(uncle) {
                trace.insert_case(InsertCase::RedUncle);
                self.paint(parent, Color::Black);
                if let Some(uncle) = uncle {
                    self.paint(uncle, Color::Black);
                }
                self.paint(grandparent, Color::Red);
                id = grandparent;
                continue;
            }

            if self.side_of(parent, id) != parent_side {
                trace.insert_case(InsertCase::InnerChild);
                self.rotate(parent, parent_side, trace);
                // The old parent is now the outer grandchild.
                (id, parent) = (parent, id);
            }
            trace.insert_case(InsertCase::OuterChild);
            self.paint(parent, Color::Black);
            self.paint(grandparent, Color::Red);
            self.rotate(grandparent, parent_side.flip(), trace);
            return;
        }
    }

    /// Unlinks node `id`, rebalances, and returns its entry.
    pub(crate) fn remove_node<T>(&mut self, id: NodeId, trace: &mut T) -> (K, V)
    where
        T: RebalanceTrace + ?Sized,
    {
        // A node with two children trades entries with its in-order successor,
        // which has no left child, and that node is unlinked instead.
        let target = match (self.child(id, Side::Left), self.child(id, Side::Right)) {
            (Some(_), Some(right)) => {
                let successor = self.extreme(right, Side::Left);
                let (node, next) = self.nodes.pair_mut(id, successor);
                core::mem::swap(&mut node.key, &mut next.key);
                core::mem::swap(&mut node.value, &mut next.value);
                successor
            }
            _ => id,
        };

        let node = self.nodes.get(target);
        let child = node.left.or(node.right);
        let parent = node.parent;
        let removed_black = node.color == Color::Black;
        let side = parent.map(|parent| self.side_of(parent, target));

        if let Some(child) = child {
            self.nodes.get_mut(child).parent = parent;
        }
        self.replace_child(parent, target, child);

        if removed_black {
            self.remove_fixup(child, parent.zip(side), trace);
        }
        self.paint_root_black();

        let node = self.nodes.release(target);
        self.len -= 1;
        (node.key, node.value)
    }

    /// Repairs a missing black node on the path through `slot`.
    ///
    /// `slot` is the node now standing where a black node was removed (possibly
    /// an absent leaf), located as the `side` child of `parent`.
    fn remove_fixup<T>(
        &mut self,
        mut slot: Option<NodeId>,
        mut at: Option<(NodeId, Side)>,
        trace: &mut T,
    ) where
        T: RebalanceTrace + ?Sized,
    {
        loop {
            if let Some(id) = slot
                && self.is_red(slot)
            {
                trace.remove_case(RemoveCase::RedReplacement);
                self.paint(id, Color::Black);
                return;
            }
            // The deficit reached the root, where it shortens every path alike.
            let Some((parent, side)) = at else {
                return;
            };

            let mut sibling = self.sibling_of_deficit(parent, side);
            if self.is_red(Some(sibling)) {
                trace.remove_case(RemoveCase::RedSibling);
                self.paint(sibling, Color::Black);
                self.paint(parent, Color::Red);
                self.rotate(parent, side, trace);
                sibling = self.sibling_of_deficit(parent, side);
            }

            let near = self.child(sibling, side);
            let far = self.child(sibling, side.flip());
            if !self.is_red(near) && !self.is_red(far) {
                trace.remove_case(RemoveCase::BlackNephews);
                self.paint(sibling, Color::Red);
                slot = Some(parent);
                at = self
                    .parent(parent)
                    .map(|grandparent| (grandparent, self.side_of(grandparent, parent)));
                continue;
            }

            if !self.is_red(far) {
                trace.remove_case(RemoveCase::NearNephew);
                if let Some(near) = near {
                    self.paint(near, Color::Black);
                }
                self.paint(sibling, Color::Red);
                self.rotate(sibling, side.flip(), trace);
                sibling = self.sibling_of_deficit(parent, side);
            }

            trace.remove_case(RemoveCase::FarNephew);
            let parent_color = self.nodes.get(parent).color;
            self.paint(sibling, parent_color);
            self.paint(parent, Color::Black);
            if let Some(far) = self.child(sibling, side.flip()) {
                self.paint(far, Color::Black);
            }
            self.rotate(parent, side, trace);
            return;
        }
    }

    /// The sibling of a black-height deficit always exists: before the removal
    /// its side carried at least one black node.
    fn sibling_of_deficit(&self, parent: NodeId, side: Side) -> NodeId {
        match self.child(parent, side.flip()) {
            Some(sibling) => sibling,
            None => panic!("black-height deficit at {side:?} child without a sibling"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    fn sample() -> TreeMap<u32, ()> {
        let mut map = TreeMap::new();
        for key in [2, 1, 3] {
            map.insert(key, ());
        }
        map
    }

    fn root_key(map: &TreeMap<u32, ()>) -> u32 {
        map.nodes.get(map.root.unwrap()).key
    }

    #[test]
    fn rotations_preserve_order_and_links() {
        let mut map = sample();
        let root = map.root.unwrap();
        map.rotate(root, Side::Left, &mut ());
        assert_eq!(root_key(&map), 3);
        assert_eq!(map.parent(root).map(|p| map.nodes.get(p).key), Some(3));
        assert_eq!(map.keys().copied().collect::<Vec<_>>(), [1, 2, 3]);

        let top = map.root.unwrap();
        map.rotate(top, Side::Right, &mut ());
        assert_eq!(root_key(&map), 2);
        assert_eq!(map.parent(root), None);
        map.validate().unwrap();
    }

    #[test]
    #[should_panic(expected = "cannot rotate")]
    fn rotating_a_leaf_panics() {
        let mut map = sample();
        let leaf = map.extreme(map.root.unwrap(), Side::Left);
        map.rotate(leaf, Side::Left, &mut ());
    }

    #[test]
    #[should_panic(expected = "red node without a parent")]
    fn insert_fixup_rejects_a_red_root() {
        let mut map = TreeMap::new();
        map.insert(2_u32, ());
        map.insert(1, ());
        let root = map.root.unwrap();
        map.paint(root, Color::Red);
        let child = map.extreme(root, Side::Left);
        map.insert_fixup(child, &mut ());
    }

    #[test]
    #[should_panic(expected = "without a sibling")]
    fn deficit_without_a_sibling_panics() {
        let mut map = TreeMap::new();
        map.insert(2_u32, ());
        map.insert(1, ());
        let root = map.root.unwrap();
        let _ = map.sibling_of_deficit(root, Side::Left);
    }
}
