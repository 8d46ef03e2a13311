// Copyright 2025 the VESS Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error types.

use core::fmt;

/// Error returned by [`TreeMap::try_insert`](crate::TreeMap::try_insert) when
/// the key is already present.
///
/// The rejected key and value are handed back untouched; the existing entry is
/// left as it was.
#[derive(Clone, PartialEq, Eq)]
pub struct DuplicateKey<K, V> {
    /// The key that was already present.
    pub key: K,
    /// The value that was not inserted.
    pub value: V,
}

impl<K, V> DuplicateKey<K, V> {
    /// Splits the error back into the rejected pair.
    #[must_use]
    pub fn into_inner(self) -> (K, V) {
        (self.key, self.value)
    }
}

impl<K: fmt::Debug, V> fmt::Debug for DuplicateKey<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DuplicateKey")
            .field("key", &self.key)
            .finish_non_exhaustive()
    }
}

impl<K: fmt::Debug, V> fmt::Display for DuplicateKey<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "key {:?} is already present", self.key)
    }
}

impl<K: fmt::Debug, V> core::error::Error for DuplicateKey<K, V> {}

/// A broken red-black or bookkeeping invariant, as found by
/// [`TreeMap::validate`](crate::TreeMap::validate).
///
/// These never occur through the public API; they indicate a bug in the map.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum InvariantViolation {
    /// The root node is red.
    RedRoot,
    /// The root node has a parent link.
    RootHasParent,
    /// A red node has a red child. `depth` is the child's depth (root is 0).
    RedRedEdge {
        /// Depth of the offending child.
        depth: usize,
    },
    /// Two paths from the same node reach leaves through different numbers
    /// of black nodes.
    BlackHeightMismatch {
        /// Black height of the left subtree.
        left: usize,
        /// Black height of the right subtree.
        right: usize,
    },
    /// In-order traversal produced a key not strictly greater than its predecessor.
    OutOfOrder {
        /// Position of the offending key in ascending order.
        position: usize,
    },
    /// A child's parent link does not point back at its parent.
    BrokenParentLink {
        /// Depth of the child with the bad link.
        depth: usize,
    },
    /// The stored length disagrees with the number of reachable nodes.
    LengthMismatch {
        /// Length recorded by the map.
        recorded: usize,
        /// Nodes actually reachable from the root.
        reachable: usize,
    },
}

impl fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::RedRoot => f.write_str("root node is red"),
            Self::RootHasParent => f.write_str("root node has a parent link"),
            Self::RedRedEdge { depth } => {
                write!(f, "red node at depth {depth} has a red parent")
            }
            Self::BlackHeightMismatch { left, right } => write!(
                f,
                "black heights differ between subtrees ({left} on the left, {right} on the right)"
            ),
            Self::OutOfOrder { position } => {
                write!(f, "key at in-order position {position} is not greater than its predecessor")
            }
            Self::BrokenParentLink { depth } => {
                write!(f, "node at depth {depth} does not link back to its parent")
            }
            Self::LengthMismatch {
                recorded,
                reachable,
            } => write!(
                f,
                "map records {recorded} entries but {reachable} nodes are reachable"
            ),
        }
    }
}

impl core::error::Error for InvariantViolation {}
