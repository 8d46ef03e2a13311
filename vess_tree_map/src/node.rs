// Copyright 2025 the VESS Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Node storage: colors, slot ids, and the slot arena that owns every node.

use alloc::vec::Vec;
use core::fmt;

/// Node color used for red-black balancing.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub(crate) enum Color {
    /// Red nodes never have red children.
    Red,
    /// Black nodes count towards the black height.
    Black,
}

/// Which child slot of a node.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Side {
    /// The left child (smaller keys).
    Left,
    /// The right child (greater keys).
    Right,
}

impl Side {
    /// The opposite side.
    #[inline]
    #[must_use]
    pub const fn flip(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }
}

/// Index of an occupied slot in a [`NodeArena`].
///
/// Ids are only handed out by [`NodeArena::alloc`] and stay valid until the
/// slot is released. A released slot may be reused by a later allocation.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub(crate) struct NodeId(u32);

impl NodeId {
    #[inline]
    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }
}

pub(crate) struct Node<K, V> {
    pub(crate) key: K,
    pub(crate) value: V,
    pub(crate) color: Color,
    pub(crate) parent: Option<NodeId>,
    pub(crate) left: Option<NodeId>,
    pub(crate) right: Option<NodeId>,
}

impl<K, V> Node<K, V> {
    #[inline]
    pub(crate) fn child(&self, side: Side) -> Option<NodeId> {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    #[inline]
    pub(crate) fn child_mut(&mut self, side: Side) -> &mut Option<NodeId> {
        match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        }
    }

    #[inline]
    pub(crate) fn is_red(&self) -> bool {
        self.color == Color::Red
    }
}

impl<K: Clone, V: Clone> Clone for Node<K, V> {
    fn clone(&self) -> Self {
        Self {
            key: self.key.clone(),
            value: self.value.clone(),
            color: self.color,
            parent: self.parent,
            left: self.left,
            right: self.right,
        }
    }
}

#[derive(Clone)]
enum Slot<K, V> {
    Occupied(Node<K, V>),
    Vacant { next_free: Option<NodeId> },
}

/// Slot arena owning all nodes of one map.
///
/// Freed slots form an intrusive free list and are reused before the backing
/// vector grows.
#[derive(Clone)]
pub(crate) struct NodeArena<K, V> {
    slots: Vec<Slot<K, V>>,
    free_head: Option<NodeId>,
}

impl<K, V> NodeArena<K, V> {
    pub(crate) const fn new() -> Self {
        Self {
            slots: Vec::new(),
            free_head: None,
        }
    }

    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free_head: None,
        }
    }

    pub(crate) fn capacity(&self) -> usize {
        self.slots.capacity()
    }

    /// Stores a new red, unlinked node and returns its id.
    pub(crate) fn alloc(&mut self, key: K, value: V) -> NodeId {
        let node = Node {
            key,
            value,
            color: Color::Red,
            parent: None,
            left: None,
            right: None,
        };
        if let Some(id) = self.free_head {
            let slot = &mut self.slots[id.idx()];
            let Slot::Vacant { next_free } = *slot else {
                panic!("free list points at an occupied slot {id:?}");
            };
            self.free_head = next_free;
            *slot = Slot::Occupied(node);
            id
        } else {
            let id = NodeId(
                u32::try_from(self.slots.len()).expect("too many nodes for a u32 slot index"),
            );
            self.slots.push(Slot::Occupied(node));
            id
        }
    }

    /// Releases a slot and hands back the node it held.
    pub(crate) fn release(&mut self, id: NodeId) -> Node<K, V> {
        let slot = core::mem::replace(
            &mut self.slots[id.idx()],
            Slot::Vacant {
                next_free: self.free_head,
            },
        );
        match slot {
            Slot::Occupied(node) => {
                self.free_head = Some(id);
                node
            }
            Slot::Vacant { .. } => panic!("released a vacant slot {id:?}"),
        }
    }

    #[inline]
    pub(crate) fn get(&self, id: NodeId) -> &Node<K, V> {
        match &self.slots[id.idx()] {
            Slot::Occupied(node) => node,
            Slot::Vacant { .. } => panic!("dangling node id {id:?}"),
        }
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, id: NodeId) -> &mut Node<K, V> {
        match &mut self.slots[id.idx()] {
            Slot::Occupied(node) => node,
            Slot::Vacant { .. } => panic!("dangling node id {id:?}"),
        }
    }

    /// Mutable access to two distinct nodes at once.
    pub(crate) fn pair_mut(&mut self, a: NodeId, b: NodeId) -> (&mut Node<K, V>, &mut Node<K, V>) {
        assert_ne!(a, b, "pair_mut needs two distinct nodes");
        let (lo, hi, swapped) = if a.idx() < b.idx() {
            (a, b, false)
        } else {
            (b, a, true)
        };
        let (head, tail) = self.slots.split_at_mut(hi.idx());
        let (Slot::Occupied(lo_node), Slot::Occupied(hi_node)) = (&mut head[lo.idx()], &mut tail[0])
        else {
            panic!("dangling node id in pair {a:?}, {b:?}");
        };
        if swapped {
            (hi_node, lo_node)
        } else {
            (lo_node, hi_node)
        }
    }

    /// Drops every node and forgets the free list, keeping the allocation.
    pub(crate) fn clear(&mut self) {
        self.slots.clear();
        self.free_head = None;
    }

    pub(crate) fn shrink_to_fit(&mut self) {
        // Trailing vacant slots cannot be trimmed without renumbering, so only
        // an empty arena gives its memory back.
        if self.slots.iter().all(|slot| matches!(slot, Slot::Vacant { .. })) {
            self.clear();
        }
        self.slots.shrink_to_fit();
    }

    /// Number of occupied slots.
    pub(crate) fn occupied(&self) -> usize {
        self.slots
            .iter()
            .filter(|slot| matches!(slot, Slot::Occupied(_)))
            .count()
    }
}

impl<K, V> fmt::Debug for NodeArena<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeArena")
            .field("total_slots", &self.slots.len())
            .field("occupied", &self.occupied())
            .finish_non_exhaustive()
    }
}
