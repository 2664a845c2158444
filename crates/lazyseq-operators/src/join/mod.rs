//! Join family: nested-loop, hash and sort-merge joins behind one contract.
//!
//! All three take the same `JoinSelectors` and `JoinOperation` and are
//! validated the same way, before any input is touched:
//! - a left-only selector is required iff the operation includes the left side;
//! - a right-only selector is required iff it includes the right side.
//!
//! They differ in preconditions and output order, documented on
//! `loop_join`, `hash_join` and `merge_join`. `join` dispatches on a
//! `JoinStrategy` and therefore carries the union of their bounds.

mod hash;
mod loop_join;
mod merge;
mod outer;

use lazyseq_core::compare::{KeyHash, KeyOrd};
use lazyseq_core::config::{JoinConfig, SeqConfig};
use lazyseq_core::join::{JoinOperation, JoinStrategy};
use serde::{Deserialize, Serialize};

use crate::traits::{OpError, Side};

pub use hash::{hash_join, HashJoin};
pub use loop_join::{loop_join, LoopJoin};
pub use merge::{merge_join, MergeJoin};
pub use outer::{full_join, inner_join, left_join, right_join};

type KeyFn<'a, T, K> = Box<dyn Fn(&T) -> K + 'a>;
type OneSidedFn<'a, T, O> = Box<dyn FnMut(&T) -> O + 'a>;
type BothFn<'a, L, R, O> = Box<dyn FnMut(&L, &R) -> O + 'a>;

/// Key selectors and result projections for a join.
///
/// Key selectors run once per element. Result selectors borrow their inputs;
/// `both` runs once per matching pair.
pub struct JoinSelectors<'a, L, R, K, O> {
    left_key: KeyFn<'a, L, K>,
    right_key: KeyFn<'a, R, K>,
    emit: Emit<'a, L, R, O>,
}

/// Result projections without the key selectors.
pub(crate) struct Emit<'a, L, R, O> {
    pub left_only: Option<OneSidedFn<'a, L, O>>,
    pub right_only: Option<OneSidedFn<'a, R, O>>,
    pub both: BothFn<'a, L, R, O>,
}

impl<'a, L, R, K, O> JoinSelectors<'a, L, R, K, O> {
    pub fn new(
        left_key: impl Fn(&L) -> K + 'a,
        right_key: impl Fn(&R) -> K + 'a,
        both: impl FnMut(&L, &R) -> O + 'a,
    ) -> Self {
        Self {
            left_key: Box::new(left_key),
            right_key: Box::new(right_key),
            emit: Emit {
                left_only: None,
                right_only: None,
                both: Box::new(both),
            },
        }
    }

    /// Projection for left rows without a match.
    pub fn left_only(mut self, f: impl FnMut(&L) -> O + 'a) -> Self {
        self.emit.left_only = Some(Box::new(f));
        self
    }

    /// Projection for right rows without a match.
    pub fn right_only(mut self, f: impl FnMut(&R) -> O + 'a) -> Self {
        self.emit.right_only = Some(Box::new(f));
        self
    }

    fn validate(&self, operation: JoinOperation) -> Result<(), OpError> {
        if operation.includes_left() && self.emit.left_only.is_none() {
            return Err(OpError::MissingSelector {
                side: Side::Left,
                operation,
            });
        }
        if operation.includes_right() && self.emit.right_only.is_none() {
            return Err(OpError::MissingSelector {
                side: Side::Right,
                operation,
            });
        }
        Ok(())
    }

    fn into_parts(self) -> (KeyFn<'a, L, K>, KeyFn<'a, R, K>, Emit<'a, L, R, O>) {
        (self.left_key, self.right_key, self.emit)
    }
}

/// Strategy, operation and sizing for `join_with`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinOptions {
    pub strategy: JoinStrategy,
    pub operation: JoinOperation,
    /// Initial capacity of the hash join's right-side multimap.
    pub hash_capacity_hint: usize,
}

impl JoinOptions {
    /// Options with the hash capacity hint from the process-wide config.
    pub fn new(strategy: JoinStrategy, operation: JoinOperation) -> Self {
        Self {
            strategy,
            operation,
            hash_capacity_hint: SeqConfig::global().join.hash_capacity_hint,
        }
    }

    /// All three values from a config section.
    pub fn from_config(cfg: &JoinConfig) -> Self {
        Self {
            strategy: cfg.default_strategy,
            operation: cfg.default_operation,
            hash_capacity_hint: cfg.hash_capacity_hint,
        }
    }

    /// Parse strategy and operation names (`"merge"`, `"full"`, ...).
    /// An unknown name fails with an error naming it.
    pub fn parse(strategy: &str, operation: &str) -> Result<Self, OpError> {
        Ok(Self::new(strategy.parse()?, operation.parse()?))
    }
}

impl Default for JoinOptions {
    fn default() -> Self {
        Self::from_config(&SeqConfig::global().join)
    }
}

/// A join whose algorithm was chosen at runtime.
pub enum Join<'a, LI: Iterator, RI: Iterator, K, O, C> {
    Loop(LoopJoin<'a, LI, RI, K, O, C>),
    Hash(HashJoin<'a, LI, RI, K, O, C>),
    Merge(MergeJoin<'a, LI, RI, K, O, C>),
}

impl<'a, LI, RI, K, O, C> Join<'a, LI, RI, K, O, C>
where
    LI: Iterator,
    RI: Iterator,
{
    pub fn strategy(&self) -> JoinStrategy {
        match self {
            Join::Loop(_) => JoinStrategy::Loop,
            Join::Hash(_) => JoinStrategy::Hash,
            Join::Merge(_) => JoinStrategy::Merge,
        }
    }
}

impl<'a, LI, RI, K, O, C> Iterator for Join<'a, LI, RI, K, O, C>
where
    LI: Iterator,
    RI: Iterator,
    C: KeyOrd<K> + KeyHash<K>,
{
    type Item = O;

    fn next(&mut self) -> Option<O> {
        match self {
            Join::Loop(j) => j.next(),
            Join::Hash(j) => j.next(),
            Join::Merge(j) => j.next(),
        }
    }
}

/// Join `left` and `right` with the given strategy and operation.
///
/// `comparer` decides key equality for every strategy: `Loop` uses its
/// equality, `Merge` its ordering, `Hash` its hashing and equality. Use
/// `Natural` for the key's own traits or `KeyBy` for a normalised key. See
/// the per-strategy functions for preconditions.
pub fn join<'a, L, R, K, O, C>(
    left: L,
    right: R,
    strategy: JoinStrategy,
    operation: JoinOperation,
    selectors: JoinSelectors<'a, L::Item, R::Item, K, O>,
    comparer: C,
) -> Result<Join<'a, L::IntoIter, R::IntoIter, K, O, C>, OpError>
where
    L: IntoIterator,
    R: IntoIterator,
    C: KeyOrd<K> + KeyHash<K> + Clone,
{
    join_with(left, right, JoinOptions::new(strategy, operation), selectors, comparer)
}

/// `join` driven by a `JoinOptions` value.
pub fn join_with<'a, L, R, K, O, C>(
    left: L,
    right: R,
    options: JoinOptions,
    selectors: JoinSelectors<'a, L::Item, R::Item, K, O>,
    comparer: C,
) -> Result<Join<'a, L::IntoIter, R::IntoIter, K, O, C>, OpError>
where
    L: IntoIterator,
    R: IntoIterator,
    C: KeyOrd<K> + KeyHash<K> + Clone,
{
    #[cfg(feature = "tracing")]
    tracing::debug!(strategy = %options.strategy, operation = %options.operation, "join planned");

    let operation = options.operation;
    Ok(match options.strategy {
        JoinStrategy::Loop => Join::Loop(loop_join(left, right, operation, selectors, comparer)?),
        JoinStrategy::Hash => Join::Hash(HashJoin::with_capacity(
            left.into_iter(),
            right.into_iter(),
            operation,
            selectors,
            comparer,
            options.hash_capacity_hint,
        )?),
        JoinStrategy::Merge => Join::Merge(merge_join(left, right, operation, selectors, comparer)?),
    })
}
