//! The lazy-sequence contract shared by every buffer and operator.
//!
//! A `Sequence` hands out fresh cursors on demand. Opening a cursor may fail,
//! and so may every advance; both report the sequence's own error type. The
//! error must be `Clone` so that buffers can replay one failure to many
//! consumers. Releasing a cursor is `Drop`.

use std::convert::Infallible;
use std::fmt;

/// A re-iterable producer of `Item`s.
///
/// Each call to `cursor` may return a different cursor (and may re-run side
/// effects of the producer). Cursors are plain iterators of `Result`s.
pub trait Sequence {
    type Item;
    type Error: Clone;
    type Cursor: Iterator<Item = Result<Self::Item, Self::Error>>;

    /// Obtain a fresh cursor positioned before the first element.
    fn cursor(&self) -> Result<Self::Cursor, Self::Error>;
}

type OkFn<T> = fn(T) -> Result<T, Infallible>;

/// Infallible sequence over any cloneable `IntoIterator` (vectors, ranges,
/// cloneable iterator chains).
#[derive(Debug, Clone)]
pub struct Repeatable<S>(S);

impl<S> Repeatable<S> {
    pub fn new(source: S) -> Self {
        Self(source)
    }

    pub fn into_inner(self) -> S {
        self.0
    }
}

impl<S> Sequence for Repeatable<S>
where
    S: Clone + IntoIterator,
{
    type Item = S::Item;
    type Error = Infallible;
    type Cursor = std::iter::Map<S::IntoIter, OkFn<S::Item>>;

    fn cursor(&self) -> Result<Self::Cursor, Infallible> {
        Ok(self.0.clone().into_iter().map(Ok as OkFn<S::Item>))
    }
}

/// Sequence backed by a cursor factory. Used for fallible or side-effecting
/// producers: the factory runs once per `cursor` call.
#[derive(Clone)]
pub struct FromFn<F>(F);

impl<F> fmt::Debug for FromFn<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FromFn").finish_non_exhaustive()
    }
}

impl<F, I, T, E> Sequence for FromFn<F>
where
    F: Fn() -> Result<I, E>,
    I: IntoIterator<Item = Result<T, E>>,
    E: Clone,
{
    type Item = T;
    type Error = E;
    type Cursor = I::IntoIter;

    fn cursor(&self) -> Result<I::IntoIter, E> {
        (self.0)().map(IntoIterator::into_iter)
    }
}

/// Wrap a cloneable collection or iterator as an infallible `Sequence`.
pub fn repeatable<S>(source: S) -> Repeatable<S>
where
    S: Clone + IntoIterator,
{
    Repeatable(source)
}

/// Wrap a cursor factory as a `Sequence`.
pub fn from_fn<F, I, T, E>(factory: F) -> FromFn<F>
where
    F: Fn() -> Result<I, E>,
    I: IntoIterator<Item = Result<T, E>>,
    E: Clone,
{
    FromFn(factory)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_repeatable_yields_fresh_cursors() {
        let seq = repeatable(vec![1, 2, 3]);
        let a: Vec<_> = seq.cursor().unwrap().map(|r| r.unwrap()).collect();
        let b: Vec<_> = seq.cursor().unwrap().map(|r| r.unwrap()).collect();
        assert_eq!(a, vec![1, 2, 3]);
        assert_eq!(a, b);
    }

    #[test]
    fn test_repeatable_new_and_into_inner() {
        let seq = Repeatable::new(1..4);
        assert_eq!(seq.cursor().unwrap().count(), 3);
        // Cursors clone the source; the wrapped range is untouched.
        assert_eq!(seq.into_inner(), 1..4);
    }

    #[test]
    fn test_from_fn_runs_factory_per_cursor() {
        let opened = Cell::new(0);
        let seq = from_fn(|| {
            opened.set(opened.get() + 1);
            Ok::<_, String>(vec![Ok(1), Err("boom".to_string())])
        });

        let mut cur = seq.cursor().unwrap();
        assert_eq!(cur.next(), Some(Ok(1)));
        assert_eq!(cur.next(), Some(Err("boom".to_string())));
        let _ = seq.cursor().unwrap();
        assert_eq!(opened.get(), 2);
    }

    #[test]
    fn test_from_fn_open_failure() {
        let seq = from_fn(|| Err::<Vec<Result<u8, String>>, _>("closed".to_string()));
        assert_eq!(seq.cursor().err(), Some("closed".to_string()));
    }
}
