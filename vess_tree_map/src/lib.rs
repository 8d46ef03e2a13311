// Copyright 2025 the VESS Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! VESS Tree Map: a red-black ordered map with pluggable key ordering.
//!
//! The toolkit uses this map to associate its own objects with the handles a
//! rendering backend hands out for them (a geometry node and its display-list
//! id, a texture and its GPU name). It is also a general ordered map:
//!
//! - **Unique keys**: [`TreeMap::insert`] rejects a key that is already
//!   present and keeps the first entry. [`TreeMap::update`] overwrites.
//! - **Balanced**: insert, remove, and lookup take O(log n) comparisons
//!   regardless of the order keys arrive in.
//! - **Pluggable ordering** ([`Comparator`]): [`NaturalOrder`] (the default,
//!   via [`Ord`]), [`IdentityOrder`] and [`Identity`] (by address), closures
//!   via [`FnOrder`], and [`ReverseOrder`].
//! - **Caller-owned values**: the map drops what it stores and nothing more.
//!   Store references or copyable handles to keep ownership elsewhere.
//! - **Observable rebalancing** ([`RebalanceTrace`]): opt-in sinks see every
//!   fixup case and rotation, for tests and profiling.
//!
//! ## Quick Start
//!
//! ```rust
//! use vess_tree_map::TreeMap;
//!
//! let mut map = TreeMap::new();
//! for key in [10, 20, 5, 15, 3] {
//!     map.insert(key, ());
//! }
//! assert_eq!(map.len(), 5);
//! assert_eq!(map.keys().copied().collect::<Vec<_>>(), [3, 5, 10, 15, 20]);
//!
//! // Removing a node with two children.
//! assert!(map.remove(&10));
//! assert!(!map.remove(&99));
//! assert_eq!(map.keys().copied().collect::<Vec<_>>(), [3, 5, 15, 20]);
//! ```
//!
//! ## Object-to-handle maps
//!
//! Keys compared by address associate distinct objects with values even when
//! the objects compare equal by content:
//!
//! ```rust
//! use vess_tree_map::{Identity, TreeMap};
//!
//! #[derive(PartialEq)]
//! struct Geometry {
//!     vertices: Vec<[f32; 3]>,
//! }
//!
//! let a = Geometry { vertices: vec![[0.0; 3]] };
//! let b = Geometry { vertices: vec![[0.0; 3]] };
//!
//! let mut handles = TreeMap::new();
//! assert!(handles.insert(Identity(&a), 7_u32));
//! assert!(handles.insert(Identity(&b), 8_u32));
//! assert_eq!(handles.get(&Identity(&a)), Some(&7));
//!
//! // The map never owned the geometry.
//! drop(handles);
//! assert!(a == b);
//! ```
//!
//! ## Checking invariants
//!
//! [`TreeMap::validate`] walks the whole tree and reports the first broken
//! red-black or bookkeeping rule as an [`InvariantViolation`]. The public
//! operations maintain every rule; `validate` exists for tests and for
//! diagnosing comparators that are not a consistent total order.
//!
//! ## `no_std` Support
//!
//! This crate is `no_std` and uses `alloc`. It does not depend on `std`.
//!
//! ## Features
//!
//! - `tracing`: adds `TracingSink`, a [`RebalanceTrace`] that forwards every
//!   rebalancing event to the [`tracing`](https://docs.rs/tracing) crate at
//!   `TRACE` level.

#![no_std]

extern crate alloc;

mod compare;
mod error;
mod iter;
mod map;
mod node;
mod rebalance;
pub mod trace;
mod validate;

pub use compare::{Comparator, FnOrder, Identity, IdentityOrder, NaturalOrder, ReverseOrder};
pub use error::{DuplicateKey, InvariantViolation};
pub use iter::{IntoIter, Iter, Keys, Values};
pub use map::TreeMap;
pub use node::Side;
#[cfg(feature = "tracing")]
pub use trace::TracingSink;
pub use trace::{FixupStats, InsertCase, RebalanceTrace, RemoveCase};
