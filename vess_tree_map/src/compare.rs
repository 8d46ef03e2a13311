// Copyright 2025 the VESS Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Key ordering strategies.
//!
//! A [`TreeMap`](crate::TreeMap) never compares keys directly; it asks its
//! [`Comparator`]. The comparator must describe a consistent total order for
//! as long as the keys live in the map.

use core::cmp::Ordering;
use core::fmt;
use core::hash::{Hash, Hasher};

/// A total order over keys of type `K`.
///
/// Implementations must be consistent: `compare(a, b)` may not change for the
/// same pair of keys while both are stored, and it must be antisymmetric and
/// transitive. Keys that compare [`Ordering::Equal`] are the same key.
pub trait Comparator<K: ?Sized> {
    /// Orders `a` relative to `b`.
    fn compare(&self, a: &K, b: &K) -> Ordering;
}

/// Orders keys by their [`Ord`] implementation. This is the default.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub struct NaturalOrder;

impl<K: Ord + ?Sized> Comparator<K> for NaturalOrder {
    #[inline]
    fn compare(&self, a: &K, b: &K) -> Ordering {
        a.cmp(b)
    }
}

/// Orders reference keys by the address they point at.
///
/// Two keys are the same key exactly when they start at the same address.
/// The resulting order is stable for as long as the referenced objects do not
/// move, which the borrow guarantees. It carries no meaning beyond identity.
///
/// Only the address is compared, never pointer metadata: a slice and its own
/// prefix are the same key, and so are distinct zero-sized objects that happen
/// to share an address. Key by objects with a size of their own.
///
/// ```
/// use vess_tree_map::{IdentityOrder, TreeMap};
///
/// let a = String::from("same");
/// let b = String::from("same");
///
/// let mut map = TreeMap::with_comparator(IdentityOrder);
/// assert!(map.insert(&a, 1));
/// // Equal contents, different object: a distinct key.
/// assert!(map.insert(&b, 2));
/// assert_eq!(map.get(&&a), Some(&1));
/// assert_eq!(map.get(&&b), Some(&2));
/// ```
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub struct IdentityOrder;

impl<T: ?Sized> Comparator<&T> for IdentityOrder {
    #[inline]
    fn compare(&self, a: &&T, b: &&T) -> Ordering {
        address(*a).cmp(&address(*b))
    }
}

/// Orders keys with a closure.
///
/// ```
/// use vess_tree_map::{FnOrder, TreeMap};
///
/// // Case-insensitive names.
/// let mut map = TreeMap::with_comparator(FnOrder(|a: &&str, b: &&str| {
///     a.to_ascii_lowercase().cmp(&b.to_ascii_lowercase())
/// }));
/// assert!(map.insert("Scene", 1));
/// assert!(!map.insert("scene", 2));
/// ```
#[derive(Copy, Clone, Default)]
pub struct FnOrder<F>(pub F);

impl<K: ?Sized, F> Comparator<K> for FnOrder<F>
where
    F: Fn(&K, &K) -> Ordering,
{
    #[inline]
    fn compare(&self, a: &K, b: &K) -> Ordering {
        (self.0)(a, b)
    }
}

impl<F> fmt::Debug for FnOrder<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("FnOrder").finish_non_exhaustive()
    }
}

/// Reverses another comparator.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub struct ReverseOrder<C>(pub C);

impl<K: ?Sized, C: Comparator<K>> Comparator<K> for ReverseOrder<C> {
    #[inline]
    fn compare(&self, a: &K, b: &K) -> Ordering {
        self.0.compare(b, a)
    }
}

/// A borrowed key whose identity is its address.
///
/// Use this to key a map by object identity while keeping the default
/// [`NaturalOrder`] comparator. The map only stores the reference; the
/// referenced object stays owned by the caller.
///
/// Equality is address equality, as with [`IdentityOrder`]: `Identity(&v[..])`
/// and `Identity(&v[..1])` compare equal, and two zero-sized values may too.
///
/// ```
/// use vess_tree_map::{Identity, TreeMap};
///
/// struct Geode(u8);
/// let (g0, g1) = (Geode(0), Geode(0));
///
/// let mut native = TreeMap::new();
/// native.insert(Identity(&g0), 0x10_u64);
/// native.insert(Identity(&g1), 0x20_u64);
/// assert_eq!(native.get(&Identity(&g1)), Some(&0x20));
/// ```
pub struct Identity<'a, T: ?Sized>(pub &'a T);

impl<'a, T: ?Sized> Identity<'a, T> {
    /// The referenced object.
    #[inline]
    #[must_use]
    pub fn get(&self) -> &'a T {
        self.0
    }
}

impl<T: ?Sized> Copy for Identity<'_, T> {}

impl<T: ?Sized> Clone for Identity<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: ?Sized> PartialEq for Identity<'_, T> {
    fn eq(&self, other: &Self) -> bool {
        address(self.0) == address(other.0)
    }
}

impl<T: ?Sized> Eq for Identity<'_, T> {}

impl<T: ?Sized> PartialOrd for Identity<'_, T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T: ?Sized> Ord for Identity<'_, T> {
    fn cmp(&self, other: &Self) -> Ordering {
        address(self.0).cmp(&address(other.0))
    }
}

impl<T: ?Sized> Hash for Identity<'_, T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        address(self.0).hash(state);
    }
}

impl<T: ?Sized> fmt::Debug for Identity<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Identity({:p})", address(self.0))
    }
}

/// Thin address of a possibly unsized referent; metadata is ignored.
#[inline]
fn address<T: ?Sized>(r: &T) -> *const () {
    core::ptr::from_ref(r).cast::<()>()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn natural_order_uses_ord() {
        assert_eq!(NaturalOrder.compare(&1, &2), Ordering::Less);
        assert_eq!(NaturalOrder.compare("b", "a"), Ordering::Greater);
    }

    #[test]
    fn reverse_flips_the_inner_order() {
        let rev = ReverseOrder(NaturalOrder);
        assert_eq!(rev.compare(&1, &2), Ordering::Greater);
        assert_eq!(rev.compare(&2, &2), Ordering::Equal);
    }

    #[test]
    fn identity_ignores_contents() {
        let a = [1_u8, 2];
        let b = [1_u8, 2];
        assert_eq!(IdentityOrder.compare(&&a, &&a), Ordering::Equal);
        assert_ne!(IdentityOrder.compare(&&a, &&b), Ordering::Equal);
        assert_ne!(Identity(&a), Identity(&b));
        assert_eq!(Identity(&a), Identity(&a));
    }

    #[test]
    fn identity_of_unsized_slices_uses_the_data_pointer() {
        let data = [1_u8, 2, 3];
        let whole: &[u8] = &data;
        let prefix: &[u8] = &data[..1];
        // Same start address, different length metadata: still the same object start.
        assert_eq!(Identity(whole), Identity(prefix));

        let mut map = crate::TreeMap::new();
        assert!(map.insert(Identity(whole), "whole"));
        assert!(!map.insert(Identity(prefix), "prefix"));
        assert!(map.insert(Identity(&data[1..]), "tail"));
        assert_eq!(map.get(&Identity(prefix)), Some(&"whole"));
    }

    #[test]
    fn fn_order_delegates() {
        let by_len = FnOrder(|a: &&str, b: &&str| a.len().cmp(&b.len()));
        assert_eq!(by_len.compare(&"ab", &"c"), Ordering::Greater);
    }
}
