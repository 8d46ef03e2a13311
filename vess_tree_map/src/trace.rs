// Copyright 2025 the VESS Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Observability hooks for rebalancing.
//!
//! The map keeps no record of how it rebalanced. When that matters (tests
//! that must hit a specific fixup case, profiling pathological key streams,
//! or just watching the tree work) pass a [`RebalanceTrace`] sink to
//! [`TreeMap::insert_with_trace`](crate::TreeMap::insert_with_trace) or
//! [`TreeMap::remove_with_trace`](crate::TreeMap::remove_with_trace).
//!
//! `()` is the no-op sink used by the plain operations. [`FixupStats`] counts
//! events. With the `tracing` feature, `TracingSink` forwards every event to
//! the `tracing` crate.

use crate::node::Side;

/// Insert-fixup step taken for a freshly linked red node.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum InsertCase {
    /// The node reached the root and was painted black.
    Root,
    /// The parent is black; nothing to repair.
    BlackParent,
    /// Parent and uncle were red: both painted black, grandparent red, and
    /// the repair moves up to the grandparent.
    RedUncle,
    /// The node was an inner grandchild and was first rotated into the outer
    /// position.
    InnerChild,
    /// Outer grandchild with a black uncle: one rotation at the grandparent
    /// resolves the violation.
    OuterChild,
}

/// Delete-fixup step taken while repairing a black-height deficit.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum RemoveCase {
    /// The replacement node was red and was painted black.
    RedReplacement,
    /// The sibling was red: rotated so that the sibling becomes black.
    RedSibling,
    /// The sibling and both its children were black: the sibling was painted
    /// red and the deficit moved up to the parent.
    BlackNephews,
    /// Only the near nephew was red: rotated at the sibling so that the far
    /// nephew is red.
    NearNephew,
    /// The far nephew was red: one rotation at the parent resolves the deficit.
    FarNephew,
}

/// A sink for rebalancing events.
///
/// All methods default to doing nothing, so sinks only implement what they
/// care about.
pub trait RebalanceTrace {
    /// Called once for every insert-fixup step.
    fn insert_case(&mut self, case: InsertCase) {
        let _ = case;
    }

    /// Called once for every delete-fixup step.
    fn remove_case(&mut self, case: RemoveCase) {
        let _ = case;
    }

    /// Called for every rotation. `direction` is the side the rotated node
    /// moves down to: [`Side::Left`] is a left rotation.
    fn rotate(&mut self, direction: Side) {
        let _ = direction;
    }
}

/// The no-op sink.
impl RebalanceTrace for () {}

impl<T: RebalanceTrace + ?Sized> RebalanceTrace for &mut T {
    fn insert_case(&mut self, case: InsertCase) {
        (**self).insert_case(case);
    }

    fn remove_case(&mut self, case: RemoveCase) {
        (**self).remove_case(case);
    }

    fn rotate(&mut self, direction: Side) {
        (**self).rotate(direction);
    }
}

const INSERT_CASES: usize = 5;
const REMOVE_CASES: usize = 5;

/// Counts rebalancing events.
///
/// ```
/// use vess_tree_map::{FixupStats, InsertCase, TreeMap};
///
/// let mut map = TreeMap::new();
/// let mut stats = FixupStats::new();
/// for key in 1..=3 {
///     map.insert_with_trace(key, (), &mut stats);
/// }
/// // Ascending keys: the third insert needs a single rotation.
/// assert_eq!(stats.insert_count(InsertCase::OuterChild), 1);
/// assert_eq!(stats.rotations(), 1);
/// ```
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct FixupStats {
    insert: [usize; INSERT_CASES],
    remove: [usize; REMOVE_CASES],
    left_rotations: usize,
    right_rotations: usize,
}

impl FixupStats {
    /// Creates a recorder with all counters at zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// How often `case` occurred during inserts.
    #[must_use]
    pub fn insert_count(&self, case: InsertCase) -> usize {
        self.insert[insert_slot(case)]
    }

    /// How often `case` occurred during removals.
    #[must_use]
    pub fn remove_count(&self, case: RemoveCase) -> usize {
        self.remove[remove_slot(case)]
    }

    /// Rotations in the given direction.
    #[must_use]
    pub fn rotations_towards(&self, direction: Side) -> usize {
        match direction {
            Side::Left => self.left_rotations,
            Side::Right => self.right_rotations,
        }
    }

    /// Total rotations in either direction.
    #[must_use]
    pub fn rotations(&self) -> usize {
        self.left_rotations + self.right_rotations
    }

    /// Resets every counter to zero.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

impl RebalanceTrace for FixupStats {
    fn insert_case(&mut self, case: InsertCase) {
        self.insert[insert_slot(case)] += 1;
    }

    fn remove_case(&mut self, case: RemoveCase) {
        self.remove[remove_slot(case)] += 1;
    }

    fn rotate(&mut self, direction: Side) {
        match direction {
            Side::Left => self.left_rotations += 1,
            Side::Right => self.right_rotations += 1,
        }
    }
}

fn insert_slot(case: InsertCase) -> usize {
    match case {
        InsertCase::Root => 0,
        InsertCase::BlackParent => 1,
        InsertCase::RedUncle => 2,
        InsertCase::InnerChild => 3,
        InsertCase::OuterChild => 4,
    }
}

fn remove_slot(case: RemoveCase) -> usize {
    match case {
        RemoveCase::RedReplacement => 0,
        RemoveCase::RedSibling => 1,
        RemoveCase::BlackNephews => 2,
        RemoveCase::NearNephew => 3,
        RemoveCase::FarNephew => 4,
    }
}

/// Forwards rebalancing events to [`tracing`] at `TRACE` level.
#[cfg(feature = "tracing")]
#[derive(Copy, Clone, Debug, Default)]
pub struct TracingSink;

#[cfg(feature = "tracing")]
impl RebalanceTrace for TracingSink {
    fn insert_case(&mut self, case: InsertCase) {
        tracing::trace!(?case, "insert fixup");
    }

    fn remove_case(&mut self, case: RemoveCase) {
        tracing::trace!(?case, "remove fixup");
    }

    fn rotate(&mut self, direction: Side) {
        tracing::trace!(?direction, "rotation");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TreeMap;

    #[test]
    fn stats_count_each_event() {
        let mut stats = FixupStats::new();
        stats.insert_case(InsertCase::RedUncle);
        stats.insert_case(InsertCase::RedUncle);
        stats.remove_case(RemoveCase::FarNephew);
        stats.rotate(Side::Left);

        assert_eq!(stats.insert_count(InsertCase::RedUncle), 2);
        assert_eq!(stats.insert_count(InsertCase::Root), 0);
        assert_eq!(stats.remove_count(RemoveCase::FarNephew), 1);
        assert_eq!(stats.rotations_towards(Side::Left), 1);
        assert_eq!(stats.rotations_towards(Side::Right), 0);

        stats.clear();
        assert_eq!(stats, FixupStats::default());
    }

    #[test]
    fn mutable_references_forward_events() {
        fn feed<T: RebalanceTrace>(mut sink: T) {
            sink.rotate(Side::Right);
        }

        let mut stats = FixupStats::new();
        feed(&mut stats);
        assert_eq!(stats.rotations(), 1);
    }

    #[test]
    fn stats_see_insert_and_remove_fixups() {
        let mut map = TreeMap::new();
        let mut stats = FixupStats::new();
        for key in 1..=4_u32 {
            map.insert_with_trace(key, (), &mut stats);
        }
        // 1 is a black leaf whose sibling 3 has a red far child, 4.
        assert!(map.remove_with_trace(&1, &mut stats));
        assert_eq!(stats.insert_count(InsertCase::RedUncle), 1);
        assert_eq!(stats.remove_count(RemoveCase::FarNephew), 1);
        assert_eq!(stats.rotations_towards(Side::Left), 2);
    }

    #[cfg(feature = "tracing")]
    mod tracing_sink {
        extern crate std;

        use std::string::String;
        use std::sync::{Arc, Mutex};
        use std::vec::Vec;

        use core::fmt;

        use tracing::field::{Field, Visit};
        use tracing::span::{Attributes, Id, Record};
        use tracing::{Event, Metadata, Subscriber};

        use crate::TreeMap;
        use crate::trace::TracingSink;

        /// Collects the message of every event.
        struct Messages(Arc<Mutex<Vec<String>>>);

        struct MessageField(Option<String>);

        impl Visit for MessageField {
            fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
                if field.name() == "message" {
                    self.0 = Some(std::format!("{value:?}"));
                }
            }
        }

        impl Subscriber for Messages {
            fn enabled(&self, _: &Metadata<'_>) -> bool {
                true
            }

            fn new_span(&self, _: &Attributes<'_>) -> Id {
                Id::from_u64(1)
            }

            fn record(&self, _: &Id, _: &Record<'_>) {}

            fn record_follows_from(&self, _: &Id, _: &Id) {}

            fn event(&self, event: &Event<'_>) {
                let mut message = MessageField(None);
                event.record(&mut message);
                if let Some(message) = message.0 {
                    self.0.lock().unwrap().push(message);
                }
            }

            fn enter(&self, _: &Id) {}

            fn exit(&self, _: &Id) {}
        }

        #[test]
        fn forwards_every_event() {
            let log = Arc::new(Mutex::new(Vec::new()));
            tracing::subscriber::with_default(Messages(Arc::clone(&log)), || {
                let mut map = TreeMap::new();
                for key in 1..=4_u32 {
                    map.insert_with_trace(key, (), &mut TracingSink);
                }
                assert!(map.remove_with_trace(&1, &mut TracingSink));
            });

            let log = log.lock().unwrap();
            let count = |text: &str| log.iter().filter(|m| m.as_str() == text).count();
            // Four inserts: root, black parent, outer child, red uncle + root.
            assert_eq!(count("insert fixup"), 5);
            assert_eq!(count("remove fixup"), 1);
            assert_eq!(count("rotation"), 2);
        }
    }
}
