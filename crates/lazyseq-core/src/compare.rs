//! Key comparers for the join family.
//!
//! `KeyEq` is the equality role (loop join). `KeyOrd` adds the ordering role
//! (merge join); its equality is derived from `Ordering::Equal`, so one
//! comparer always serves both roles consistently. `KeyHash` adds hashing
//! (hash join); keys the comparer calls equal must hash alike.

use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

pub trait KeyEq<K: ?Sized> {
    fn key_eq(&self, a: &K, b: &K) -> bool;
}

pub trait KeyOrd<K: ?Sized>: KeyEq<K> {
    fn key_cmp(&self, a: &K, b: &K) -> Ordering;
}

pub trait KeyHash<K: ?Sized>: KeyEq<K> {
    fn key_hash<H: Hasher>(&self, key: &K, state: &mut H);
}

/// The key type's own `PartialEq` / `Ord`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Natural;

impl<K: PartialEq + ?Sized> KeyEq<K> for Natural {
    fn key_eq(&self, a: &K, b: &K) -> bool {
        a == b
    }
}

impl<K: Ord + ?Sized> KeyOrd<K> for Natural {
    fn key_cmp(&self, a: &K, b: &K) -> Ordering {
        a.cmp(b)
    }
}

impl<K: Hash + Eq + ?Sized> KeyHash<K> for Natural {
    fn key_hash<H: Hasher>(&self, key: &K, state: &mut H) {
        key.hash(state);
    }
}

/// Equality from a closure. Equality role only.
#[derive(Debug, Clone, Copy)]
pub struct EqBy<F>(pub F);

impl<K: ?Sized, F> KeyEq<K> for EqBy<F>
where
    F: Fn(&K, &K) -> bool,
{
    fn key_eq(&self, a: &K, b: &K) -> bool {
        (self.0)(a, b)
    }
}

/// Ordering from a closure. Serves both roles.
#[derive(Debug, Clone, Copy)]
pub struct OrdBy<F>(pub F);

impl<K: ?Sized, F> KeyEq<K> for OrdBy<F>
where
    F: Fn(&K, &K) -> Ordering,
{
    fn key_eq(&self, a: &K, b: &K) -> bool {
        (self.0)(a, b) == Ordering::Equal
    }
}

impl<K: ?Sized, F> KeyOrd<K> for OrdBy<F>
where
    F: Fn(&K, &K) -> Ordering,
{
    fn key_cmp(&self, a: &K, b: &K) -> Ordering {
        (self.0)(a, b)
    }
}

/// Compare keys through a normalising projection, e.g. lowercasing.
/// Serves all three roles, so it works with every join strategy.
#[derive(Debug, Clone, Copy)]
pub struct KeyBy<F>(pub F);

impl<K: ?Sized, F, N> KeyEq<K> for KeyBy<F>
where
    F: Fn(&K) -> N,
    N: PartialEq,
{
    fn key_eq(&self, a: &K, b: &K) -> bool {
        (self.0)(a) == (self.0)(b)
    }
}

impl<K: ?Sized, F, N> KeyOrd<K> for KeyBy<F>
where
    F: Fn(&K) -> N,
    N: Ord,
{
    fn key_cmp(&self, a: &K, b: &K) -> Ordering {
        (self.0)(a).cmp(&(self.0)(b))
    }
}

impl<K: ?Sized, F, N> KeyHash<K> for KeyBy<F>
where
    F: Fn(&K) -> N,
    N: Hash + PartialEq,
{
    fn key_hash<H: Hasher>(&self, key: &K, state: &mut H) {
        (self.0)(key).hash(state);
    }
}

impl<K: ?Sized, C: KeyEq<K> + ?Sized> KeyEq<K> for &C {
    fn key_eq(&self, a: &K, b: &K) -> bool {
        (**self).key_eq(a, b)
    }
}

impl<K: ?Sized, C: KeyOrd<K> + ?Sized> KeyOrd<K> for &C {
    fn key_cmp(&self, a: &K, b: &K) -> Ordering {
        (**self).key_cmp(a, b)
    }
}

impl<K: ?Sized, C: KeyHash<K> + ?Sized> KeyHash<K> for &C {
    fn key_hash<H: Hasher>(&self, key: &K, state: &mut H) {
        (**self).key_hash(key, state);
    }
}
