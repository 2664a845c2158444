//! Memoize: replay over one cursor.
//!
//! Every cursor starts at the first element. Elements already pulled from
//! the source are served from a cache; a cursor that reaches the end of the
//! cache pulls the next element and appends it. Each source element is
//! computed once regardless of the number of consumers.

use std::fmt;
use std::sync::Arc;

use lazyseq_core::config::BufferConfig;
use lazyseq_core::sequence::Sequence;
use parking_lot::Mutex;

use crate::error::BufferError;
use crate::tracking::PeakTracker;
use crate::traits::Buffer;
use crate::upstream::{Lifecycle, Upstream};

struct MemoState<S: Sequence> {
    upstream: Upstream<S>,
    life: Lifecycle,
    cache: Vec<S::Item>,
    peak: PeakTracker,
}

/// Buffer caching every element for replay to all cursors.
pub struct MemoizedBuffer<S: Sequence> {
    inner: Arc<Mutex<MemoState<S>>>,
}

pub fn memoize<S: Sequence>(source: S) -> MemoizedBuffer<S>
where
    S::Item: Clone,
{
    memoize_with_config(source, &BufferConfig::default())
}

pub fn memoize_with_config<S: Sequence>(source: S, cfg: &BufferConfig) -> MemoizedBuffer<S>
where
    S::Item: Clone,
{
    MemoizedBuffer {
        inner: Arc::new(Mutex::new(MemoState {
            upstream: Upstream::new(source),
            life: Lifecycle::default(),
            cache: Vec::new(),
            peak: PeakTracker::new(cfg.backlog_warn_threshold),
        })),
    }
}

impl<S: Sequence> MemoizedBuffer<S>
where
    S::Item: Clone,
{
    /// Attach a consumer positioned at the first element. Fails right away
    /// only if the source failed before producing anything.
    pub fn cursor(&self) -> Result<MemoizeCursor<S>, BufferError<S::Error>> {
        let state = self.inner.lock();
        if state.life.disposed {
            return Err(BufferError::Disposed);
        }
        if let Some(e) = state.upstream.failed_at_start() {
            return Err(e);
        }
        Ok(MemoizeCursor {
            inner: Arc::clone(&self.inner),
            index: 0,
            version: state.life.version,
        })
    }

    /// How often the cache crossed `backlog_warn_threshold`.
    pub fn threshold_crossings(&self) -> usize {
        self.inner.lock().peak.crossings()
    }
}

impl<S: Sequence> Buffer for MemoizedBuffer<S>
where
    S::Item: Clone,
{
    type Item = S::Item;
    type Error = S::Error;
    type Cursor = MemoizeCursor<S>;

    fn cursor(&self) -> Result<MemoizeCursor<S>, BufferError<S::Error>> {
        MemoizedBuffer::cursor(self)
    }

    fn reset(&self) {
        let mut state = self.inner.lock();
        if state.life.disposed {
            return;
        }
        state.upstream.reset();
        state.cache.clear();
        state.peak.clear();
        state.life.bump();
        #[cfg(feature = "tracing")]
        tracing::trace!(version = state.life.version, "memoize buffer reset");
    }

    /// Number of cached elements.
    fn count(&self) -> usize {
        self.inner.lock().cache.len()
    }

    fn dispose(&self) {
        let mut state = self.inner.lock();
        if !state.life.disposed {
            state.life.disposed = true;
            state.upstream.release();
            state.cache = Vec::new();
            #[cfg(feature = "tracing")]
            tracing::trace!("memoize buffer disposed");
        }
    }

    fn is_disposed(&self) -> bool {
        self.inner.lock().life.disposed
    }
}

impl<S: Sequence> Sequence for MemoizedBuffer<S>
where
    S::Item: Clone,
{
    type Item = S::Item;
    type Error = BufferError<S::Error>;
    type Cursor = MemoizeCursor<S>;

    fn cursor(&self) -> Result<MemoizeCursor<S>, BufferError<S::Error>> {
        MemoizedBuffer::cursor(self)
    }
}

impl<S: Sequence> Drop for MemoizedBuffer<S> {
    fn drop(&mut self) {
        let mut state = self.inner.lock();
        state.life.disposed = true;
        state.upstream.release();
        state.cache = Vec::new();
    }
}

impl<S: Sequence> fmt::Debug for MemoizedBuffer<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.inner.lock();
        f.debug_struct("MemoizedBuffer")
            .field("version", &state.life.version)
            .field("disposed", &state.life.disposed)
            .field("cached", &state.cache.len())
            .finish()
    }
}

/// One consumer of a `MemoizedBuffer`.
pub struct MemoizeCursor<S: Sequence> {
    inner: Arc<Mutex<MemoState<S>>>,
    index: usize,
    version: u64,
}

impl<S: Sequence> Iterator for MemoizeCursor<S>
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

        if let Some(item) = state.cache.get(self.index) {
            self.index += 1;
            return Some(Ok(item.clone()));
        }

        let item = match state.upstream.pull()? {
            Ok(item) => item,
            Err(e) => return Some(Err(e)),
        };
        state.cache.push(item.clone());
        state.peak.record(state.cache.len(), "memoize");
        self.index += 1;
        Some(Ok(item))
    }
}

impl<S: Sequence> fmt::Debug for MemoizeCursor<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoizeCursor")
            .field("index", &self.index)
            .field("version", &self.version)
            .finish_non_exhaustive()
    }
}
