//! Hash join.
//!
//! The right input is grouped by key into an insertion-ordered multimap on
//! the first `next()`. Keys are hashed and compared through the comparer,
//! not the key type's own `Hash + Eq`. Left rows are then probed in order.
//! Once the left input is exhausted, right groups whose key was never probed
//! successfully are emitted right-only (if requested), in first-seen key order.

use std::collections::VecDeque;
use std::hash::{BuildHasher, Hasher};

use indexmap::map::raw_entry_v1::{RawEntryApiV1, RawEntryMut};
use indexmap::IndexMap;
use lazyseq_core::compare::KeyHash;
use lazyseq_core::join::JoinOperation;

use super::{Emit, JoinSelectors, KeyFn};
use crate::traits::OpError;

struct Group<R> {
    rows: Vec<R>,
    used: bool,
}

pub struct HashJoin<'a, LI: Iterator, RI: Iterator, K, O, C> {
    left: LI,
    /// Taken (and grouped into `groups`) on the first advance.
    right: Option<RI>,
    groups: IndexMap<K, Group<RI::Item>>,
    capacity_hint: usize,
    left_key: KeyFn<'a, LI::Item, K>,
    right_key: KeyFn<'a, RI::Item, K>,
    emit: Emit<'a, LI::Item, RI::Item, O>,
    comparer: C,
    operation: JoinOperation,
    left_done: bool,
    /// Next group to inspect for right-only output.
    tail: usize,
    pending: VecDeque<O>,
}

/// Hash join; O(n+m) expected. `comparer` supplies key hashing and
/// equality (`Natural` for the key's own `Hash + Eq`). Output follows left
/// order, then unmatched right groups.
pub fn hash_join<'a, L, R, K, O, C>(
    left: L,
    right: R,
    operation: JoinOperation,
    selectors: JoinSelectors<'a, L::Item, R::Item, K, O>,
    comparer: C,
) -> Result<HashJoin<'a, L::IntoIter, R::IntoIter, K, O, C>, OpError>
where
    L: IntoIterator,
    R: IntoIterator,
    C: KeyHash<K>,
{
    HashJoin::with_capacity(left.into_iter(), right.into_iter(), operation, selectors, comparer, 0)
}

impl<'a, LI, RI, K, O, C> HashJoin<'a, LI, RI, K, O, C>
where
    LI: Iterator,
    RI: Iterator,
    C: KeyHash<K>,
{
    /// Validated constructor; `capacity` pre-sizes the right-side multimap.
    pub fn with_capacity(
        left: LI,
        right: RI,
        operation: JoinOperation,
        selectors: JoinSelectors<'a, LI::Item, RI::Item, K, O>,
        comparer: C,
        capacity: usize,
    ) -> Result<Self, OpError> {
        selectors.validate(operation)?;
        Ok(Self::unchecked(left, right, operation, selectors, comparer, capacity))
    }

    /// Constructor for callers that supply the selectors `operation` needs.
    pub(crate) fn unchecked(
        left: LI,
        right: RI,
        operation: JoinOperation,
        selectors: JoinSelectors<'a, LI::Item, RI::Item, K, O>,
        comparer: C,
        capacity: usize,
    ) -> Self {
        let (left_key, right_key, emit) = selectors.into_parts();
        Self {
            left,
            right: Some(right),
            groups: IndexMap::new(),
            capacity_hint: capacity,
            left_key,
            right_key,
            emit,
            comparer,
            operation,
            left_done: false,
            tail: 0,
            pending: VecDeque::new(),
        }
    }

    fn hash(&self, key: &K) -> u64 {
        let mut state = self.groups.hasher().build_hasher();
        self.comparer.key_hash(key, &mut state);
        state.finish()
    }

    fn build(&mut self, right: RI) {
        self.groups.reserve(self.capacity_hint);
        for r in right {
            let key = (self.right_key)(&r);
            let hash = self.hash(&key);
            let comparer = &self.comparer;
            match self
                .groups
                .raw_entry_mut_v1()
                .from_hash(hash, |k| comparer.key_eq(k, &key))
            {
                RawEntryMut::Occupied(entry) => entry.into_mut().rows.push(r),
                RawEntryMut::Vacant(entry) => {
                    entry.insert_hashed_nocheck(
                        hash,
                        key,
                        Group {
                            rows: vec![r],
                            used: false,
                        },
                    );
                }
            }
        }
        #[cfg(feature = "tracing")]
        tracing::trace!(keys = self.groups.len(), "hash join grouped right input");
    }

    fn probe(&mut self, l: LI::Item) {
        let key = (self.left_key)(&l);
        let hash = self.hash(&key);
        let comparer = &self.comparer;
        match self
            .groups
            .raw_entry_mut_v1()
            .from_hash(hash, |k| comparer.key_eq(k, &key))
        {
            RawEntryMut::Occupied(entry) => {
                let group = entry.into_mut();
                group.used = true;
                for r in &group.rows {
                    self.pending.push_back((self.emit.both)(&l, r));
                }
            }
            RawEntryMut::Vacant(_) => {
                if self.operation.includes_left() {
                    if let Some(left_only) = self.emit.left_only.as_mut() {
                        self.pending.push_back(left_only(&l));
                    }
                }
            }
        }
    }

    /// Queue the rows of the next unused right group.
    fn drain_unused(&mut self) {
        let Some(right_only) = self.emit.right_only.as_mut() else {
            self.tail = self.groups.len();
            return;
        };
        while let Some((_, group)) = self.groups.get_index(self.tail) {
            self.tail += 1;
            if !group.used {
                self.pending.extend(group.rows.iter().map(|r| right_only(r)));
                if !self.pending.is_empty() {
                    return;
                }
            }
        }
    }
}

impl<'a, LI, RI, K, O, C> Iterator for HashJoin<'a, LI, RI, K, O, C>
where
    LI: Iterator,
    RI: Iterator,
    C: KeyHash<K>,
{
    type Item = O;

    fn next(&mut self) -> Option<O> {
        loop {
            if let Some(out) = self.pending.pop_front() {
                return Some(out);
            }

            if let Some(right) = self.right.take() {
                self.build(right);
            }

            if !self.left_done {
                match self.left.next() {
                    Some(l) => self.probe(l),
                    None => self.left_done = true,
                }
                continue;
            }

            if !self.operation.includes_right() || self.tail >= self.groups.len() {
                return None;
            }
            self.drain_unused();
        }
    }
}
