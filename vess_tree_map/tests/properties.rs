// Copyright 2025 the VESS Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Property tests for `TreeMap`.
//!
//! Random operation sequences run against both the map and a `BTreeMap`
//! model; after every step the map must validate and agree with the model.

use std::collections::BTreeMap;

use proptest::prelude::*;
use vess_tree_map::TreeMap;

#[derive(Clone, Debug)]
enum Op {
    Insert(u16, u32),
    Remove(u16),
    Update(u16, u32),
}

fn op() -> impl Strategy<Value = Op> {
    // A small key space makes duplicates and misses common.
    prop_oneof![
        3 => (0..256_u16, any::<u32>()).prop_map(|(k, v)| Op::Insert(k, v)),
        2 => (0..256_u16).prop_map(Op::Remove),
        1 => (0..256_u16, any::<u32>()).prop_map(|(k, v)| Op::Update(k, v)),
    ]
}

/// Upper bound on the height of a red-black tree with `len` entries.
fn height_bound(len: usize) -> usize {
    2 * (usize::BITS - (len + 1).leading_zeros()) as usize
}

proptest! {
    #[test]
    fn agrees_with_model(ops in prop::collection::vec(op(), 0..400)) {
        let mut map = TreeMap::new();
        let mut model = BTreeMap::new();

        for op in ops {
            match op {
                Op::Insert(key, value) => {
                    let fresh = !model.contains_key(&key);
                    if fresh {
                        model.insert(key, value);
                    }
                    prop_assert_eq!(map.insert(key, value), fresh);
                }
                Op::Remove(key) => {
                    prop_assert_eq!(map.remove(&key), model.remove(&key).is_some());
                }
                Op::Update(key, value) => {
                    let present = match model.get_mut(&key) {
                        Some(slot) => {
                            *slot = value;
                            true
                        }
                        None => false,
                    };
                    prop_assert_eq!(map.update(&key, value), present);
                }
            }
            prop_assert!(map.validate().is_ok(), "{:?}", map.validate());
            prop_assert_eq!(map.len(), model.len());
        }

        prop_assert!(map.iter().eq(model.iter()));
        prop_assert!(map.height() <= height_bound(map.len()));
    }

    #[test]
    fn in_order_keys_strictly_increase(keys in prop::collection::vec(any::<i32>(), 0..300)) {
        let map: TreeMap<i32, ()> = keys.iter().map(|&key| (key, ())).collect();
        let sorted: Vec<i32> = map.keys().copied().collect();
        prop_assert!(sorted.windows(2).all(|pair| pair[0] < pair[1]));
        prop_assert_eq!(map.len(), sorted.len());
        prop_assert_eq!(map.iter().rev().count(), map.len());
    }

    #[test]
    fn inserted_keys_are_found(keys in prop::collection::hash_set(any::<u32>(), 1..200)) {
        let mut map = TreeMap::new();
        for &key in &keys {
            prop_assert!(map.insert(key, key.wrapping_mul(7)));
        }
        for &key in &keys {
            prop_assert_eq!(map.get(&key), Some(&key.wrapping_mul(7)));
        }
    }

    #[test]
    fn second_remove_fails(keys in prop::collection::vec(0..64_u8, 1..100), victim in 0..64_u8) {
        let mut map: TreeMap<u8, ()> = keys.iter().map(|&key| (key, ())).collect();
        let present = map.contains_key(&victim);
        prop_assert_eq!(map.remove(&victim), present);
        prop_assert!(!map.remove(&victim));
        prop_assert!(!map.contains_key(&victim));
        prop_assert!(map.validate().is_ok());
    }

    #[test]
    fn update_keeps_shape(keys in prop::collection::vec(any::<u16>(), 1..200), value in any::<u64>()) {
        let mut map: TreeMap<u16, u64> = keys.iter().map(|&key| (key, 0)).collect();
        let before: Vec<u16> = map.keys().copied().collect();
        let (height, black_height) = (map.height(), map.black_height());

        for key in &keys {
            prop_assert!(map.update(key, value));
        }

        prop_assert!(map.keys().copied().eq(before));
        prop_assert_eq!(map.height(), height);
        prop_assert_eq!(map.black_height(), black_height);
        prop_assert!(map.values().all(|&stored| stored == value));
    }
}
