// Copyright 2025 the VESS Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The ordered map and its public operations.

use core::borrow::Borrow;
use core::cmp::Ordering;
use core::fmt;

use smallvec::{SmallVec, smallvec};

use crate::compare::{Comparator, NaturalOrder};
use crate::error::DuplicateKey;
use crate::iter::{IntoIter, Iter, Keys, Values};
use crate::node::{Color, NodeArena, NodeId, Side};
use crate::trace::RebalanceTrace;

/// An ordered map backed by a red-black tree.
///
/// Keys are unique under the map's [`Comparator`] `C` (by default
/// [`NaturalOrder`], which uses [`Ord`]). Insert, remove, and lookup take
/// O(log n) comparisons whatever order keys arrive in.
///
/// Unlike `BTreeMap::insert`, [`insert`](Self::insert) never replaces: a key
/// that is already present is rejected and the existing entry kept. Use
/// [`update`](Self::update) to overwrite a value.
///
/// Lookups and removals accept any borrowed form `Q` of the key, so a
/// `TreeMap<String, _>` can be queried with a `&str`. The comparator must
/// order `Q` exactly as it orders the owned keys.
///
/// # Type Parameters
///
/// - `K`: key type. Keys cannot be mutated while stored.
/// - `V`: value type. To keep value ownership with the caller, store a
///   reference or handle (for example `&'a T` or a copyable id); the map
///   never frees what such values refer to.
/// - `C`: the [`Comparator`] deciding key order and key equality.
///
/// # Example
///
/// ```
/// use vess_tree_map::TreeMap;
///
/// let mut map = TreeMap::new();
/// for key in [10, 20, 5, 15, 3] {
///     assert!(map.insert(key, key * 100));
/// }
/// assert!(!map.insert(10, 0), "duplicate keys are rejected");
///
/// assert_eq!(map.get(&15), Some(&1500));
/// assert!(map.remove(&10));
/// assert_eq!(map.keys().copied().collect::<Vec<_>>(), [3, 5, 15, 20]);
/// ```
#[derive(Clone)]
pub struct TreeMap<K, V, C = NaturalOrder> {
    pub(crate) nodes: NodeArena<K, V>,
    pub(crate) root: Option<NodeId>,
    pub(crate) len: usize,
    comparator: C,
}

/// Where a key sits relative to the current tree.
enum Probe {
    /// The key is stored in this node.
    Found(NodeId),
    /// The key is absent and would be linked as `side` child of `parent`
    /// (`None` for an empty tree).
    Vacant(Option<(NodeId, Side)>),
}

impl<K, V> TreeMap<K, V, NaturalOrder> {
    /// Creates an empty map ordered by [`Ord`].
    #[must_use]
    pub const fn new() -> Self {
        Self::with_comparator(NaturalOrder)
    }

    /// Creates an empty map with room for `capacity` entries before the node
    /// storage reallocates.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_comparator(capacity, NaturalOrder)
    }
}

impl<K, V, C> TreeMap<K, V, C> {
    /// Creates an empty map ordered by `comparator`.
    #[must_use]
    pub const fn with_comparator(comparator: C) -> Self {
        Self {
            nodes: NodeArena::new(),
            root: None,
            len: 0,
            comparator,
        }
    }

    /// Creates an empty map ordered by `comparator` with room for `capacity`
    /// entries.
    #[must_use]
    pub fn with_capacity_and_comparator(capacity: usize, comparator: C) -> Self {
        Self {
            nodes: NodeArena::with_capacity(capacity),
            root: None,
            len: 0,
            comparator,
        }
    }

    /// The comparator ordering this map.
    #[must_use]
    pub fn comparator(&self) -> &C {
        &self.comparator
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the map holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of entries the node storage holds without reallocating.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.nodes.capacity()
    }

    /// Gives unused node storage back to the allocator where possible.
    pub fn shrink_to_fit(&mut self) {
        self.nodes.shrink_to_fit();
    }

    /// Removes every entry.
    ///
    /// Keys and values are dropped; no rebalancing takes place.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.root = None;
        self.len = 0;
    }

    /// Entry with the smallest key.
    #[must_use]
    pub fn first_key_value(&self) -> Option<(&K, &V)> {
        let node = self.nodes.get(self.extreme(self.root?, Side::Left));
        Some((&node.key, &node.value))
    }

    /// Entry with the greatest key.
    #[must_use]
    pub fn last_key_value(&self) -> Option<(&K, &V)> {
        let node = self.nodes.get(self.extreme(self.root?, Side::Right));
        Some((&node.key, &node.value))
    }

    /// Removes and returns the entry with the smallest key.
    pub fn pop_first(&mut self) -> Option<(K, V)> {
        let id = self.extreme(self.root?, Side::Left);
        Some(self.remove_node(id, &mut ()))
    }

    /// Removes and returns the entry with the greatest key.
    pub fn pop_last(&mut self) -> Option<(K, V)> {
        let id = self.extreme(self.root?, Side::Right);
        Some(self.remove_node(id, &mut ()))
    }

    /// Iterates entries in ascending key order.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter::new(&self.nodes, self.root, self.len)
    }

    /// Iterates keys in ascending order.
    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys(self.iter())
    }

    /// Iterates values in ascending key order.
    pub fn values(&self) -> Values<'_, K, V> {
        Values(self.iter())
    }

    /// Number of nodes on the longest root-to-leaf path (0 when empty).
    ///
    /// A red-black tree with `n` entries is never taller than
    /// `2 * log2(n + 1)`.
    #[must_use]
    pub fn height(&self) -> usize {
        let Some(root) = self.root else {
            return 0;
        };
        let mut deepest = 0;
        let mut stack: SmallVec<[(NodeId, usize); 32]> = smallvec![(root, 1)];
        while let Some((id, depth)) = stack.pop() {
            deepest = deepest.max(depth);
            let node = self.nodes.get(id);
            stack.extend(
                [node.left, node.right]
                    .into_iter()
                    .flatten()
                    .map(|child| (child, depth + 1)),
            );
        }
        deepest
    }

    /// Number of black nodes on the path from the root to the leftmost leaf.
    ///
    /// In a valid tree every root-to-leaf path has this many black nodes.
    #[must_use]
    pub fn black_height(&self) -> usize {
        let mut count = 0;
        let mut cursor = self.root;
        while let Some(id) = cursor {
            let node = self.nodes.get(id);
            if node.color == Color::Black {
                count += 1;
            }
            cursor = node.left;
        }
        count
    }

    /// Follows `side` links from `id` to the end.
    pub(crate) fn extreme(&self, mut id: NodeId, side: Side) -> NodeId {
        while let Some(next) = self.nodes.get(id).child(side) {
            id = next;
        }
        id
    }
}

impl<K, V, C: Comparator<K>> TreeMap<K, V, C> {
    fn probe<Q>(&self, key: &Q) -> Probe
    where
        K: Borrow<Q>,
        C: Comparator<Q>,
        Q: ?Sized,
    {
        let mut cursor = self.root;
        let mut slot = None;
        while let Some(id) = cursor {
            let node = self.nodes.get(id);
            let side = match self.comparator.compare(key, node.key.borrow()) {
                Ordering::Equal => return Probe::Found(id),
                Ordering::Less => Side::Left,
                Ordering::Greater => Side::Right,
            };
            slot = Some((id, side));
            cursor = node.child(side);
        }
        Probe::Vacant(slot)
    }

    fn find<Q>(&self, key: &Q) -> Option<NodeId>
    where
        K: Borrow<Q>,
        C: Comparator<Q>,
        Q: ?Sized,
    {
        match self.probe(key) {
            Probe::Found(id) => Some(id),
            Probe::Vacant(_) => None,
        }
    }

    /// Inserts `key` with `value` if the key is absent.
    ///
    /// Returns `false` and leaves the map unchanged if the key is already
    /// present; the rejected key and value are dropped. See
    /// [`try_insert`](Self::try_insert) to get them back.
    pub fn insert(&mut self, key: K, value: V) -> bool {
        self.insert_with_trace(key, value, &mut ())
    }

    /// [`insert`](Self::insert), reporting rebalancing steps to `trace`.
    pub fn insert_with_trace<T>(&mut self, key: K, value: V, trace: &mut T) -> bool
    where
        T: RebalanceTrace + ?Sized,
    {
        self.insert_node(key, value, trace).is_ok()
    }

    /// Inserts `key` with `value` if the key is absent, returning a mutable
    /// reference to the stored value.
    ///
    /// # Errors
    ///
    /// Returns [`DuplicateKey`] holding the rejected pair if the key is
    /// already present. The map is unchanged in that case.
    ///
    /// ```
    /// use vess_tree_map::TreeMap;
    ///
    /// let mut map = TreeMap::new();
    /// *map.try_insert("geode", 1).unwrap() += 1;
    ///
    /// let err = map.try_insert("geode", 10).unwrap_err();
    /// assert_eq!(err.value, 10);
    /// assert_eq!(map.get(&"geode"), Some(&2));
    /// ```
    pub fn try_insert(&mut self, key: K, value: V) -> Result<&mut V, DuplicateKey<K, V>> {
        let id = self.insert_node(key, value, &mut ())?;
        Ok(&mut self.nodes.get_mut(id).value)
    }

    fn insert_node<T>(
        &mut self,
        key: K,
        value: V,
        trace: &mut T,
    ) -> Result<NodeId, DuplicateKey<K, V>>
    where
        T: RebalanceTrace + ?Sized,
    {
        let slot = match self.probe(&key) {
            Probe::Found(_) => return Err(DuplicateKey { key, value }),
            Probe::Vacant(slot) => slot,
        };
        let id = self.nodes.alloc(key, value);
        match slot {
            Some((parent, side)) => {
                self.nodes.get_mut(id).parent = Some(parent);
                *self.nodes.get_mut(parent).child_mut(side) = Some(id);
            }
            None => self.root = Some(id),
        }
        self.len += 1;
        self.insert_fixup(id, trace);
        self.paint_root_black();
        Ok(id)
    }

    /// Removes `key` and its value.
    ///
    /// Returns `false` and leaves the map unchanged if the key is absent.
    pub fn remove<Q>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        C: Comparator<Q>,
        Q: ?Sized,
    {
        self.remove_entry(key).is_some()
    }

    /// [`remove`](Self::remove), reporting rebalancing steps to `trace`.
    pub fn remove_with_trace<Q, T>(&mut self, key: &Q, trace: &mut T) -> bool
    where
        K: Borrow<Q>,
        C: Comparator<Q>,
        Q: ?Sized,
        T: RebalanceTrace + ?Sized,
    {
        match self.find(key) {
            Some(id) => {
                self.remove_node(id, trace);
                true
            }
            None => false,
        }
    }

    /// Removes `key` and returns the stored key and value.
    pub fn remove_entry<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        C: Comparator<Q>,
        Q: ?Sized,
    {
        let id = self.find(key)?;
        Some(self.remove_node(id, &mut ()))
    }

    /// The value stored under `key`.
    #[must_use]
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        C: Comparator<Q>,
        Q: ?Sized,
    {
        self.find(key).map(|id| &self.nodes.get(id).value)
    }

    /// The stored key equal to `key`, with its value.
    ///
    /// With a comparator coarser than equality (say, case-insensitive) the
    /// stored key can differ from the probe.
    #[must_use]
    pub fn get_key_value<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        C: Comparator<Q>,
        Q: ?Sized,
    {
        let node = self.nodes.get(self.find(key)?);
        Some((&node.key, &node.value))
    }

    /// Mutable access to the value stored under `key`.
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        C: Comparator<Q>,
        Q: ?Sized,
    {
        let id = self.find(key)?;
        Some(&mut self.nodes.get_mut(id).value)
    }

    /// Returns `true` if `key` is present.
    #[must_use]
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        C: Comparator<Q>,
        Q: ?Sized,
    {
        self.find(key).is_some()
    }

    /// Overwrites the value stored under `key`.
    ///
    /// Returns `false` if the key is absent, in which case `value` is dropped.
    /// Never changes the shape or coloring of the tree.
    pub fn update<Q>(&mut self, key: &Q, value: V) -> bool
    where
        K: Borrow<Q>,
        C: Comparator<Q>,
        Q: ?Sized,
    {
        match self.get_mut(key) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }
}

impl<K, V> Default for TreeMap<K, V, NaturalOrder> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: fmt::Debug, V: fmt::Debug, C> fmt::Debug for TreeMap<K, V, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K: PartialEq, V: PartialEq, C> PartialEq for TreeMap<K, V, C> {
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.iter().eq(other.iter())
    }
}

impl<K: Eq, V: Eq, C> Eq for TreeMap<K, V, C> {}

impl<K, V, C: Comparator<K> + Default> FromIterator<(K, V)> for TreeMap<K, V, C> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::with_comparator(C::default());
        map.extend(iter);
        map
    }
}

/// Entries whose key is already present are skipped, as with
/// [`TreeMap::insert`].
impl<K, V, C: Comparator<K>> Extend<(K, V)> for TreeMap<K, V, C> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl<'a, K, V, C> IntoIterator for &'a TreeMap<K, V, C> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K, V, C> IntoIterator for TreeMap<K, V, C> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter::new(self.nodes, self.root, self.len)
    }
}
