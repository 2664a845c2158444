//! Adjacent grouping: runs of consecutive elements with equal keys.
//!
//! Unlike a hash grouping, a key that reappears after a different key
//! starts a new run. The merge join relies on this to walk sorted inputs
//! one key at a time.

use lazyseq_core::compare::{KeyEq, Natural};

/// Lazy iterator of `(key, run)` pairs. Pulls one whole run per `next()`,
/// plus the first element of the following run.
pub struct GroupAdjacent<I: Iterator, F, K, C> {
    iter: I,
    key_fn: F,
    comparer: C,
    /// First element of the next run, already keyed.
    pending: Option<(K, I::Item)>,
    done: bool,
}

impl<I, F, K, C> GroupAdjacent<I, F, K, C>
where
    I: Iterator,
    F: FnMut(&I::Item) -> K,
    C: KeyEq<K>,
{
    pub fn new(iter: I, key_fn: F, comparer: C) -> Self {
        Self {
            iter,
            key_fn,
            comparer,
            pending: None,
            done: false,
        }
    }

    fn pull(&mut self) -> Option<(K, I::Item)> {
        if self.done {
            return None;
        }
        match self.iter.next() {
            Some(item) => Some(((self.key_fn)(&item), item)),
            None => {
                self.done = true;
                None
            }
        }
    }
}

impl<I, F, K, C> Iterator for GroupAdjacent<I, F, K, C>
where
    I: Iterator,
    F: FnMut(&I::Item) -> K,
    C: KeyEq<K>,
{
    type Item = (K, Vec<I::Item>);

    fn next(&mut self) -> Option<Self::Item> {
        let (key, first) = match self.pending.take() {
            Some(p) => p,
            None => self.pull()?,
        };
        let mut run = vec![first];
        while let Some((k, item)) = self.pull() {
            if self.comparer.key_eq(&key, &k) {
                run.push(item);
            } else {
                self.pending = Some((k, item));
                break;
            }
        }
        Some((key, run))
    }
}

/// Group consecutive elements by `key_fn` using the key's own equality.
pub fn group_adjacent<I, F, K>(iter: I, key_fn: F) -> GroupAdjacent<I::IntoIter, F, K, Natural>
where
    I: IntoIterator,
    F: FnMut(&I::Item) -> K,
    K: PartialEq,
{
    GroupAdjacent::new(iter.into_iter(), key_fn, Natural)
}

/// Group consecutive elements by `key_fn` under `comparer`.
pub fn group_adjacent_by<I, F, K, C>(iter: I, key_fn: F, comparer: C) -> GroupAdjacent<I::IntoIter, F, K, C>
where
    I: IntoIterator,
    F: FnMut(&I::Item) -> K,
    C: KeyEq<K>,
{
    GroupAdjacent::new(iter.into_iter(), key_fn, comparer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lazyseq_core::compare::EqBy;

    #[test]
    fn test_runs_split_on_key_change() {
        let groups: Vec<_> = group_adjacent(vec![1, 1, 2, 2, 2, 1, 3], |x: &i32| *x).collect();
        assert_eq!(
            groups,
            vec![
                (1, vec![1, 1]),
                (2, vec![2, 2, 2]),
                (1, vec![1]),
                (3, vec![3]),
            ]
        );
    }

    #[test]
    fn test_empty_and_custom_comparer() {
        assert_eq!(group_adjacent(Vec::<u8>::new(), |x: &u8| *x).count(), 0);

        let words = vec!["Apple", "avocado", "Banana", "blueberry", "cherry"];
        let firsts = group_adjacent_by(
            words,
            |w: &&str| w.chars().next().unwrap_or(' '),
            EqBy(|a: &char, b: &char| a.eq_ignore_ascii_case(b)),
        )
        .map(|(_, run)| run.len())
        .collect::<Vec<_>>();
        assert_eq!(firsts, vec![2, 2, 1]);
    }
}
