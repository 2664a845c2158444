//! Nested-loop join.
//!
//! The right input is collected (with its keys) on the first `next()`. Each
//! left row is then compared against every right row with the equality
//! comparer. Output follows left order, then right order within a left row.
//!
//! Right-only rows are never produced, even for `RightOuter`/`FullOuter`:
//! the loop keeps no record of which right rows matched. Use `Hash` or
//! `Merge` when unmatched right rows are needed.

use std::collections::VecDeque;

use lazyseq_core::compare::KeyEq;
use lazyseq_core::join::JoinOperation;

use super::{Emit, JoinSelectors, KeyFn};
use crate::traits::OpError;

pub struct LoopJoin<'a, LI: Iterator, RI: Iterator, K, O, C> {
    left: LI,
    /// Taken (and collected into `rows`) on the first advance.
    right: Option<RI>,
    rows: Vec<(K, RI::Item)>,
    left_key: KeyFn<'a, LI::Item, K>,
    right_key: KeyFn<'a, RI::Item, K>,
    emit: Emit<'a, LI::Item, RI::Item, O>,
    comparer: C,
    operation: JoinOperation,
    /// Set once `left` returns `None`; it is not polled again.
    left_done: bool,
    pending: VecDeque<O>,
}

/// Nested-loop join. Works with any equality comparer; O(n*m).
pub fn loop_join<'a, L, R, K, O, C>(
    left: L,
    right: R,
    operation: JoinOperation,
    selectors: JoinSelectors<'a, L::Item, R::Item, K, O>,
    comparer: C,
) -> Result<LoopJoin<'a, L::IntoIter, R::IntoIter, K, O, C>, OpError>
where
    L: IntoIterator,
    R: IntoIterator,
    C: KeyEq<K>,
{
    selectors.validate(operation)?;
    let (left_key, right_key, emit) = selectors.into_parts();
    Ok(LoopJoin {
        left: left.into_iter(),
        right: Some(right.into_iter()),
        rows: Vec::new(),
        left_key,
        right_key,
        emit,
        comparer,
        operation,
        left_done: false,
        pending: VecDeque::new(),
    })
}

impl<'a, LI, RI, K, O, C> Iterator for LoopJoin<'a, LI, RI, K, O, C>
where
    LI: Iterator,
    RI: Iterator,
    C: KeyEq<K>,
{
    type Item = O;

    fn next(&mut self) -> Option<O> {
        loop {
            if let Some(out) = self.pending.pop_front() {
                return Some(out);
            }

            if let Some(right) = self.right.take() {
                let right_key = &self.right_key;
                self.rows = right.map(|r| (right_key(&r), r)).collect();
                #[cfg(feature = "tracing")]
                tracing::trace!(rows = self.rows.len(), "loop join materialized right input");
            }

            if self.left_done {
                return None;
            }
            let Some(l) = self.left.next() else {
                self.left_done = true;
                return None;
            };
            let key = (self.left_key)(&l);
            let mut matched = false;
            for (rk, r) in &self.rows {
                if self.comparer.key_eq(&key, rk) {
                    matched = true;
                    self.pending.push_back((self.emit.both)(&l, r));
                }
            }
            if !matched && self.operation.includes_left() {
                if let Some(left_only) = self.emit.left_only.as_mut() {
                    self.pending.push_back(left_only(&l));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lazyseq_core::compare::Natural;

    /// Alternates between `Some` and `None`, restarting after each `None`.
    struct Flicker(i32);

    impl Iterator for Flicker {
        type Item = i32;

        fn next(&mut self) -> Option<i32> {
            self.0 += 1;
            if self.0 % 2 == 0 {
                None
            } else {
                Some(self.0)
            }
        }
    }

    #[test]
    fn test_stays_finished_on_unfused_left() {
        let selectors = JoinSelectors::new(|l: &i32| *l, |r: &i32| *r, |l: &i32, r: &i32| (*l, *r));
        let mut j = loop_join(Flicker(0), vec![1, 3], JoinOperation::Inner, selectors, Natural).unwrap();
        assert_eq!(j.next(), Some((1, 1)));
        assert_eq!(j.next(), None);
        assert_eq!(j.next(), None);
    }
}
