//! Convenience joins over the hash strategy, keyed by the key's own
//! `Hash + Eq`.
//!
//! These take the selectors each kind needs as plain arguments, so they
//! cannot fail validation and return the iterator directly.

use std::hash::Hash;

use lazyseq_core::compare::Natural;
use lazyseq_core::join::JoinOperation;

use super::{HashJoin, JoinSelectors};

pub fn inner_join<'a, L, R, K, O>(
    left: L,
    right: R,
    left_key: impl Fn(&L::Item) -> K + 'a,
    right_key: impl Fn(&R::Item) -> K + 'a,
    both: impl FnMut(&L::Item, &R::Item) -> O + 'a,
) -> HashJoin<'a, L::IntoIter, R::IntoIter, K, O, Natural>
where
    L: IntoIterator,
    R: IntoIterator,
    K: Hash + Eq,
{
    let selectors = JoinSelectors::new(left_key, right_key, both);
    HashJoin::unchecked(left.into_iter(), right.into_iter(), JoinOperation::Inner, selectors, Natural, 0)
}

/// Every left row: matched pairs through `both`, unmatched through `left_only`.
pub fn left_join<'a, L, R, K, O>(
    left: L,
    right: R,
    left_key: impl Fn(&L::Item) -> K + 'a,
    right_key: impl Fn(&R::Item) -> K + 'a,
    left_only: impl FnMut(&L::Item) -> O + 'a,
    both: impl FnMut(&L::Item, &R::Item) -> O + 'a,
) -> HashJoin<'a, L::IntoIter, R::IntoIter, K, O, Natural>
where
    L: IntoIterator,
    R: IntoIterator,
    K: Hash + Eq,
{
    let selectors = JoinSelectors::new(left_key, right_key, both).left_only(left_only);
    HashJoin::unchecked(left.into_iter(), right.into_iter(), JoinOperation::LeftOuter, selectors, Natural, 0)
}

/// Every right row: matched pairs through `both`, unmatched through
/// `right_only` after all matches.
pub fn right_join<'a, L, R, K, O>(
    left: L,
    right: R,
    left_key: impl Fn(&L::Item) -> K + 'a,
    right_key: impl Fn(&R::Item) -> K + 'a,
    right_only: impl FnMut(&R::Item) -> O + 'a,
    both: impl FnMut(&L::Item, &R::Item) -> O + 'a,
) -> HashJoin<'a, L::IntoIter, R::IntoIter, K, O, Natural>
where
    L: IntoIterator,
    R: IntoIterator,
    K: Hash + Eq,
{
    let selectors = JoinSelectors::new(left_key, right_key, both).right_only(right_only);
    HashJoin::unchecked(left.into_iter(), right.into_iter(), JoinOperation::RightOuter, selectors, Natural, 0)
}

pub fn full_join<'a, L, R, K, O>(
    left: L,
    right: R,
    left_key: impl Fn(&L::Item) -> K + 'a,
    right_key: impl Fn(&R::Item) -> K + 'a,
    left_only: impl FnMut(&L::Item) -> O + 'a,
    right_only: impl FnMut(&R::Item) -> O + 'a,
    both: impl FnMut(&L::Item, &R::Item) -> O + 'a,
) -> HashJoin<'a, L::IntoIter, R::IntoIter, K, O, Natural>
where
    L: IntoIterator,
    R: IntoIterator,
    K: Hash + Eq,
{
    let selectors = JoinSelectors::new(left_key, right_key, both)
        .left_only(left_only)
        .right_only(right_only);
    HashJoin::unchecked(left.into_iter(), right.into_iter(), JoinOperation::FullOuter, selectors, Natural, 0)
}
