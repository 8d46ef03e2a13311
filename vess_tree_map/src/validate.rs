// Copyright 2025 the VESS Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Full structural check of a map.

use core::cmp::Ordering;

use crate::compare::Comparator;
use crate::error::InvariantViolation;
use crate::map::TreeMap;
use crate::node::{Color, NodeId};

impl<K, V, C: Comparator<K>> TreeMap<K, V, C> {
    /// Checks every red-black and bookkeeping invariant in O(n).
    ///
    /// On success returns the tree's black height. This is a diagnostic: the
    /// public operations keep the invariants, so a failure here is a bug in
    /// the map (or a comparator that is not a consistent total order).
    ///
    /// # Errors
    ///
    /// Returns the first [`InvariantViolation`] found.
    ///
    /// ```
    /// use vess_tree_map::TreeMap;
    ///
    /// let map: TreeMap<_, _> = (0..100).map(|k| (k, ())).collect();
    /// let black_height = map.validate().unwrap();
    /// assert_eq!(black_height, map.black_height());
    /// ```
    pub fn validate(&self) -> Result<usize, InvariantViolation> {
        let Some(root) = self.root else {
            return if self.len == 0 {
                Ok(0)
            } else {
                Err(InvariantViolation::LengthMismatch {
                    recorded: self.len,
                    reachable: 0,
                })
            };
        };
        let root_node = self.nodes.get(root);
        if root_node.parent.is_some() {
            return Err(InvariantViolation::RootHasParent);
        }
        if root_node.color == Color::Red {
            return Err(InvariantViolation::RedRoot);
        }

        let mut reachable = 0;
        let black_height = self.check_subtree(root, 0, &mut reachable)?;
        if reachable != self.len {
            return Err(InvariantViolation::LengthMismatch {
                recorded: self.len,
                reachable,
            });
        }

        // In-order walk over the links, independent of the length counter.
        let mut previous: Option<&K> = None;
        for (position, key) in self.in_order_keys().enumerate() {
            if let Some(previous) = previous
                && self.comparator().compare(previous, key) != Ordering::Less
            {
                return Err(InvariantViolation::OutOfOrder { position });
            }
            previous = Some(key);
        }

        Ok(black_height)
    }

    /// Checks colors and parent links below `id`; returns the black height of
    /// the subtree, counting `id` itself.
    fn check_subtree(
        &self,
        id: NodeId,
        depth: usize,
        reachable: &mut usize,
    ) -> Result<usize, InvariantViolation> {
        *reachable += 1;
        let node = self.nodes.get(id);
        let mut heights = [0; 2];
        for (height, child) in heights.iter_mut().zip([node.left, node.right]) {
            let Some(child) = child else { continue };
            let child_node = self.nodes.get(child);
            if child_node.parent != Some(id) {
                return Err(InvariantViolation::BrokenParentLink { depth: depth + 1 });
            }
            if node.is_red() && child_node.is_red() {
                return Err(InvariantViolation::RedRedEdge { depth: depth + 1 });
            }
            *height = self.check_subtree(child, depth + 1, reachable)?;
        }
        let [left, right] = heights;
        if left != right {
            return Err(InvariantViolation::BlackHeightMismatch { left, right });
        }
        Ok(left + usize::from(node.color == Color::Black))
    }

    /// Keys reached by following child links, not by trusting `len`.
    fn in_order_keys(&self) -> impl Iterator<Item = &K> + '_ {
        let mut stack: alloc::vec::Vec<NodeId> = alloc::vec::Vec::new();
        let mut cursor = self.root;
        core::iter::from_fn(move || {
            while let Some(id) = cursor {
                stack.push(id);
                cursor = self.nodes.get(id).left;
            }
            let id = stack.pop()?;
            let node = self.nodes.get(id);
            cursor = node.right;
            Some(&node.key)
        })
    }
}
