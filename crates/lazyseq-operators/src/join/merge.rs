//! Sort-merge join.
//!
//! Precondition: both inputs are sorted by key under the comparer. This is
//! not checked; unsorted input silently produces wrong results.
//!
//! Each side is walked as runs of equal keys (`GroupAdjacent`). Runs are
//! merged by key: the lower key is emitted one-sided (if requested) and
//! advanced, equal keys emit the left-major cross product of both runs and
//! advance both. When one side ends, the other side's tail is drained.

use std::cmp::Ordering;
use std::collections::VecDeque;

use lazyseq_core::compare::KeyOrd;
use lazyseq_core::join::JoinOperation;

use super::{Emit, JoinSelectors, KeyFn};
use crate::group_adjacent::GroupAdjacent;
use crate::traits::OpError;

type Runs<'a, I, K, C> = GroupAdjacent<I, KeyFn<'a, <I as Iterator>::Item, K>, K, C>;

pub struct MergeJoin<'a, LI: Iterator, RI: Iterator, K, O, C> {
    left: Runs<'a, LI, K, C>,
    right: Runs<'a, RI, K, C>,
    /// Current run of each side; `None` after `started` means exhausted.
    left_run: Option<(K, Vec<LI::Item>)>,
    right_run: Option<(K, Vec<RI::Item>)>,
    started: bool,
    emit: Emit<'a, LI::Item, RI::Item, O>,
    comparer: C,
    operation: JoinOperation,
    pending: VecDeque<O>,
}

/// Sort-merge join. O(n+m) on sorted input; output follows key order.
///
/// `comparer` must implement ordering and equality consistently; it is
/// cloned once per input side for run detection.
pub fn merge_join<'a, L, R, K, O, C>(
    left: L,
    right: R,
    operation: JoinOperation,
    selectors: JoinSelectors<'a, L::Item, R::Item, K, O>,
    comparer: C,
) -> Result<MergeJoin<'a, L::IntoIter, R::IntoIter, K, O, C>, OpError>
where
    L: IntoIterator,
    R: IntoIterator,
    C: KeyOrd<K> + Clone,
{
    selectors.validate(operation)?;
    let (left_key, right_key, emit) = selectors.into_parts();
    Ok(MergeJoin {
        left: GroupAdjacent::new(left.into_iter(), left_key, comparer.clone()),
        right: GroupAdjacent::new(right.into_iter(), right_key, comparer.clone()),
        left_run: None,
        right_run: None,
        started: false,
        emit,
        comparer,
        operation,
        pending: VecDeque::new(),
    })
}

impl<'a, LI, RI, K, O, C> MergeJoin<'a, LI, RI, K, O, C>
where
    LI: Iterator,
    RI: Iterator,
    C: KeyOrd<K>,
{
    fn emit_left(&mut self, rows: &[LI::Item]) {
        if !self.operation.includes_left() {
            return;
        }
        if let Some(left_only) = self.emit.left_only.as_mut() {
            self.pending.extend(rows.iter().map(|l| left_only(l)));
        }
    }

    fn emit_right(&mut self, rows: &[RI::Item]) {
        if !self.operation.includes_right() {
            return;
        }
        if let Some(right_only) = self.emit.right_only.as_mut() {
            self.pending.extend(rows.iter().map(|r| right_only(r)));
        }
    }

    fn emit_both(&mut self, lefts: &[LI::Item], rights: &[RI::Item]) {
        for l in lefts {
            for r in rights {
                self.pending.push_back((self.emit.both)(l, r));
            }
        }
    }
}

impl<'a, LI, RI, K, O, C> Iterator for MergeJoin<'a, LI, RI, K, O, C>
where
    LI: Iterator,
    RI: Iterator,
    C: KeyOrd<K>,
{
    type Item = O;

    fn next(&mut self) -> Option<O> {
        if !self.started {
            self.started = true;
            self.left_run = self.left.next();
            self.right_run = self.right.next();
        }

        loop {
            if let Some(out) = self.pending.pop_front() {
                return Some(out);
            }

            match (self.left_run.take(), self.right_run.take()) {
                (None, None) => return None,
                (Some((_, lefts)), None) => {
                    self.emit_left(&lefts);
                    self.left_run = self.left.next();
                }
                (None, Some((_, rights))) => {
                    self.emit_right(&rights);
                    self.right_run = self.right.next();
                }
                (Some((lk, lefts)), Some((rk, rights))) => {
                    match self.comparer.key_cmp(&lk, &rk) {
                        Ordering::Less => {
                            self.emit_left(&lefts);
                            self.left_run = self.left.next();
                            self.right_run = Some((rk, rights));
                        }
                        Ordering::Greater => {
                            self.emit_right(&rights);
                            self.right_run = self.right.next();
                            self.left_run = Some((lk, lefts));
                        }
                        Ordering::Equal => {
                            self.emit_both(&lefts, &rights);
                            self.left_run = self.left.next();
                            self.right_run = self.right.next();
                        }
                    }
                }
            }
        }
    }
}
