//! Share: competing consumers over one cursor.
//!
//! Every cursor obtained from a `SharedBuffer` pulls from the same underlying
//! cursor. Whichever cursor advances next receives the next unseen element;
//! nothing is retained after delivery. Across all cursors the source is
//! observed exactly once, in order.

use std::fmt;
use std::sync::Arc;

use lazyseq_core::sequence::Sequence;
use parking_lot::Mutex;

use crate::error::BufferError;
use crate::traits::Buffer;
use crate::upstream::{Lifecycle, Upstream};

struct ShareState<S: Sequence> {
    upstream: Upstream<S>,
    life: Lifecycle,
}

/// Buffer handing each element to exactly one of its cursors.
///
/// Dropping the buffer disposes it; cursors still alive afterwards fail with
/// `BufferError::Disposed`.
pub struct SharedBuffer<S: Sequence> {
    inner: Arc<Mutex<ShareState<S>>>,
}

/// Wrap `source` so several consumers can drain it cooperatively.
pub fn share<S: Sequence>(source: S) -> SharedBuffer<S> {
    SharedBuffer {
        inner: Arc::new(Mutex::new(ShareState {
            upstream: Upstream::new(source),
            life: Lifecycle::default(),
        })),
    }
}

impl<S: Sequence> SharedBuffer<S> {
    /// Attach a consumer. Opens the source on first use; an open failure is
    /// cached and returned to every caller until `reset()`.
    pub fn cursor(&self) -> Result<ShareCursor<S>, BufferError<S::Error>> {
        let mut state = self.inner.lock();
        if state.life.disposed {
            return Err(BufferError::Disposed);
        }
        state.upstream.ensure_open()?;
        Ok(ShareCursor {
            inner: Arc::clone(&self.inner),
            version: state.life.version,
        })
    }
}

impl<S: Sequence> Buffer for SharedBuffer<S> {
    type Item = S::Item;
    type Error = S::Error;
    type Cursor = ShareCursor<S>;

    fn cursor(&self) -> Result<ShareCursor<S>, BufferError<S::Error>> {
        SharedBuffer::cursor(self)
    }

    fn reset(&self) {
        let mut state = self.inner.lock();
        if state.life.disposed {
            return;
        }
        state.upstream.reset();
        state.life.bump();
        #[cfg(feature = "tracing")]
        tracing::trace!(version = state.life.version, "share buffer reset");
    }

    /// Always zero; delivered elements are not retained.
    fn count(&self) -> usize {
        0
    }

    fn dispose(&self) {
        let mut state = self.inner.lock();
        if !state.life.disposed {
            state.life.disposed = true;
            state.upstream.release();
            #[cfg(feature = "tracing")]
            tracing::trace!("share buffer disposed");
        }
    }

    fn is_disposed(&self) -> bool {
        self.inner.lock().life.disposed
    }
}

impl<S: Sequence> Sequence for SharedBuffer<S> {
    type Item = S::Item;
    type Error = BufferError<S::Error>;
    type Cursor = ShareCursor<S>;

    fn cursor(&self) -> Result<ShareCursor<S>, BufferError<S::Error>> {
        SharedBuffer::cursor(self)
    }
}

impl<S: Sequence> Drop for SharedBuffer<S> {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl<S: Sequence> fmt::Debug for SharedBuffer<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.inner.lock();
        f.debug_struct("SharedBuffer")
            .field("version", &state.life.version)
            .field("disposed", &state.life.disposed)
            .field("exhausted", &state.upstream.is_exhausted())
            .finish()
    }
}

/// One consumer of a `SharedBuffer`.
pub struct ShareCursor<S: Sequence> {
    inner: Arc<Mutex<ShareState<S>>>,
    version: u64,
}

impl<S: Sequence> Iterator for ShareCursor<S> {
    type Item = Result<S::Item, BufferError<S::Error>>;

    fn next(&mut self) -> Option<Self::Item> {
        // The guard is released before the element reaches the caller.
        let mut state = self.inner.lock();
        if let Err(e) = state.life.check(self.version) {
            return Some(Err(e));
        }
        state.upstream.pull()
    }
}

impl<S: Sequence> fmt::Debug for ShareCursor<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShareCursor")
            .field("version", &self.version)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lazyseq_core::sequence::repeatable;

    #[test]
    fn test_two_cursors_split_the_source() {
        let buf = share(repeatable(1..=6));
        let mut a = buf.cursor().unwrap();
        let mut b = buf.cursor().unwrap();

        assert_eq!(a.next(), Some(Ok(1)));
        assert_eq!(b.next(), Some(Ok(2)));
        assert_eq!(b.next(), Some(Ok(3)));
        assert_eq!(a.next(), Some(Ok(4)));
        let rest: Vec<_> = a.map(|r| r.unwrap()).collect();
        assert_eq!(rest, vec![5, 6]);
        assert_eq!(b.next(), None);
    }

    #[test]
    fn test_count_is_zero() {
        let buf = share(repeatable(vec![1, 2]));
        let mut c = buf.cursor().unwrap();
        c.next();
        assert_eq!(buf.count(), 0);
    }
}
