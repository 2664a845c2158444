//! Publish: fan-out over one cursor.
//!
//! Each cursor owns a queue. A cursor that lags behind drains its queue; the
//! cursor that is furthest ahead drives the underlying cursor and copies the
//! new element into every other live queue. A cursor sees every element
//! produced after it attached, in source order, independent of the others.

use std::collections::{BTreeMap, VecDeque};
use std::fmt;
use std::sync::Arc;

use lazyseq_core::config::BufferConfig;
use lazyseq_core::sequence::Sequence;
use parking_lot::Mutex;

use crate::error::BufferError;
use crate::tracking::PeakTracker;
use crate::traits::Buffer;
use crate::upstream::{Lifecycle, Upstream};

struct PublishState<S: Sequence> {
    upstream: Upstream<S>,
    life: Lifecycle,
    /// Per-consumer backlog, keyed by cursor id.
    queues: BTreeMap<u64, VecDeque<S::Item>>,
    next_id: u64,
    peak: PeakTracker,
}

impl<S: Sequence> PublishState<S> {
    fn backlog(&self) -> usize {
        self.queues.values().map(VecDeque::len).max().unwrap_or(0)
    }
}

/// Buffer delivering every element to every attached cursor.
///
/// `S::Item` is cloned once per lagging consumer.
pub struct PublishedBuffer<S: Sequence> {
    inner: Arc<Mutex<PublishState<S>>>,
}

/// Wrap `source` for multicast consumption.
pub fn publish<S: Sequence>(source: S) -> PublishedBuffer<S>
where
    S::Item: Clone,
{
    publish_with_config(source, &BufferConfig::default())
}

/// Like `publish`, with a backlog warning threshold taken from `cfg`.
pub fn publish_with_config<S: Sequence>(source: S, cfg: &BufferConfig) -> PublishedBuffer<S>
where
    S::Item: Clone,
{
    PublishedBuffer {
        inner: Arc::new(Mutex::new(PublishState {
            upstream: Upstream::new(source),
            life: Lifecycle::default(),
            queues: BTreeMap::new(),
            next_id: 0,
            peak: PeakTracker::new(cfg.backlog_warn_threshold),
        })),
    }
}

impl<S: Sequence> PublishedBuffer<S>
where
    S::Item: Clone,
{
    /// Attach a consumer with an empty queue.
    ///
    /// The source is not touched here. If the source already failed before
    /// producing anything, that failure is returned right away; a mid-stream
    /// failure is reported by the cursor's first advance instead.
    pub fn cursor(&self) -> Result<PublishCursor<S>, BufferError<S::Error>> {
        let mut state = self.inner.lock();
        if state.life.disposed {
            return Err(BufferError::Disposed);
        }
        if let Some(e) = state.upstream.failed_at_start() {
            return Err(e);
        }
        let id = state.next_id;
        state.next_id += 1;
        state.queues.insert(id, VecDeque::new());
        Ok(PublishCursor {
            inner: Arc::clone(&self.inner),
            id,
            version: state.life.version,
        })
    }

    /// Highest backlog observed since creation or the last reset.
    pub fn peak_backlog(&self) -> usize {
        self.inner.lock().peak.peak()
    }

    /// How often the backlog crossed `backlog_warn_threshold`. Each crossing
    /// also emits a warning when the `tracing` feature is on.
    pub fn threshold_crossings(&self) -> usize {
        self.inner.lock().peak.crossings()
    }

    /// Number of live consumers.
    pub fn consumers(&self) -> usize {
        self.inner.lock().queues.len()
    }
}

impl<S: Sequence> Buffer for PublishedBuffer<S>
where
    S::Item: Clone,
{
    type Item = S::Item;
    type Error = S::Error;
    type Cursor = PublishCursor<S>;

    fn cursor(&self) -> Result<PublishCursor<S>, BufferError<S::Error>> {
        PublishedBuffer::cursor(self)
    }

    fn reset(&self) {
        let mut state = self.inner.lock();
        if state.life.disposed {
            return;
        }
        state.upstream.reset();
        // Stale cursors can never read again; drop their backlog now.
        state.queues.clear();
        state.peak.clear();
        state.life.bump();
        #[cfg(feature = "tracing")]
        tracing::trace!(version = state.life.version, "publish buffer reset");
    }

    /// Maximum backlog across live consumers.
    fn count(&self) -> usize {
        self.inner.lock().backlog()
    }

    fn dispose(&self) {
        let mut state = self.inner.lock();
        if !state.life.disposed {
            state.life.disposed = true;
            state.upstream.release();
            state.queues.clear();
            #[cfg(feature = "tracing")]
            tracing::trace!("publish buffer disposed");
        }
    }

    fn is_disposed(&self) -> bool {
        self.inner.lock().life.disposed
    }
}

impl<S: Sequence> Sequence for PublishedBuffer<S>
where
    S::Item: Clone,
{
    type Item = S::Item;
    type Error = BufferError<S::Error>;
    type Cursor = PublishCursor<S>;

    fn cursor(&self) -> Result<PublishCursor<S>, BufferError<S::Error>> {
        PublishedBuffer::cursor(self)
    }
}

impl<S: Sequence> Drop for PublishedBuffer<S> {
    fn drop(&mut self) {
        let mut state = self.inner.lock();
        state.life.disposed = true;
        state.upstream.release();
        state.queues.clear();
    }
}

impl<S: Sequence> fmt::Debug for PublishedBuffer<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.inner.lock();
        f.debug_struct("PublishedBuffer")
            .field("version", &state.life.version)
            .field("disposed", &state.life.disposed)
            .field("consumers", &state.queues.len())
            .field("backlog", &state.backlog())
            .finish()
    }
}

/// One consumer of a `PublishedBuffer`. Dropping it unregisters its queue.
pub struct PublishCursor<S: Sequence> {
    inner: Arc<Mutex<PublishState<S>>>,
    id: u64,
    version: u64,
}

impl<S: Sequence> Iterator for PublishCursor<S>
where
    S::Item: Clone,
{
    type Item = Result<S::Item, BufferError<S::Error>>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut guard = self.inner.lock();
        let state = &mut *guard;
        if let Err(e) = state.life.check(self.version) {
            return Some(Err(e));
        }

        if let Some(item) = state.queues.get_mut(&self.id).and_then(VecDeque::pop_front) {
            return Some(Ok(item));
        }

        // This consumer is caught up: drive the source and fan out.
        let item = match state.upstream.pull()? {
            Ok(item) => item,
            Err(e) => return Some(Err(e)),
        };
        for (id, queue) in state.queues.iter_mut() {
            if *id != self.id {
                queue.push_back(item.clone());
            }
        }
        let backlog = state.backlog();
        state.peak.record(backlog, "publish");
        Some(Ok(item))
    }
}

impl<S: Sequence> Drop for PublishCursor<S> {
    fn drop(&mut self) {
        self.inner.lock().queues.remove(&self.id);
    }
}

impl<S: Sequence> fmt::Debug for PublishCursor<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PublishCursor")
            .field("id", &self.id)
            .field("version", &self.version)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lazyseq_core::sequence::repeatable;

    #[test]
    fn test_lagging_cursor_reads_from_queue() {
        let buf = publish(repeatable(vec!['a', 'b', 'c']));
        let mut fast = buf.cursor().unwrap();
        let mut slow = buf.cursor().unwrap();

        assert_eq!(fast.next(), Some(Ok('a')));
        assert_eq!(fast.next(), Some(Ok('b')));
        assert_eq!(buf.count(), 2);
        assert_eq!(slow.next(), Some(Ok('a')));
        assert_eq!(buf.count(), 1);
        assert_eq!(buf.peak_backlog(), 2);
    }

    #[test]
    fn test_drop_cursor_unregisters_queue() {
        let buf = publish(repeatable(0..10));
        let mut lead = buf.cursor().unwrap();
        let idle = buf.cursor().unwrap();
        for _ in 0..5 {
            lead.next();
        }
        assert_eq!(buf.count(), 5);
        assert_eq!(buf.consumers(), 2);
        drop(idle);
        assert_eq!(buf.count(), 0);
        assert_eq!(buf.consumers(), 1);
    }
}
