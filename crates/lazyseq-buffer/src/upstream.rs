//! Lifecycle and source-cursor bookkeeping shared by all buffers.
//!
//! Only ever touched while the owning buffer's lock is held.

use lazyseq_core::sequence::Sequence;

use crate::error::BufferError;

/// Disposed flag plus the reset epoch.
#[derive(Debug, Default)]
pub(crate) struct Lifecycle {
    pub disposed: bool,
    pub version: u64,
}

impl Lifecycle {
    /// Validate a cursor captured at `version` against the current state.
    pub fn check<E>(&self, version: u64) -> Result<(), BufferError<E>> {
        if self.disposed {
            return Err(BufferError::Disposed);
        }
        if self.version != version {
            return Err(BufferError::Modified {
                expected: version,
                found: self.version,
            });
        }
        Ok(())
    }

    pub fn bump(&mut self) {
        self.version = self.version.wrapping_add(1);
    }
}

/// The single underlying cursor and its terminal state.
pub(crate) struct Upstream<S: Sequence> {
    source: Option<S>,
    cursor: Option<S::Cursor>,
    error: Option<S::Error>,
    exhausted: bool,
    produced: usize,
}

impl<S: Sequence> Upstream<S> {
    pub fn new(source: S) -> Self {
        Self {
            source: Some(source),
            cursor: None,
            error: None,
            exhausted: false,
            produced: 0,
        }
    }

    pub fn cached_error(&self) -> Option<BufferError<S::Error>> {
        self.error.clone().map(BufferError::Source)
    }

    /// The cached error, only if it struck before any element was produced.
    pub fn failed_at_start(&self) -> Option<BufferError<S::Error>> {
        if self.produced == 0 {
            self.cached_error()
        } else {
            None
        }
    }

    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    /// Open the source cursor if nothing is open yet. A failure is cached.
    pub fn ensure_open(&mut self) -> Result<(), BufferError<S::Error>> {
        if let Some(e) = self.cached_error() {
            return Err(e);
        }
        if self.cursor.is_some() || self.exhausted {
            return Ok(());
        }
        let source = self.source.as_ref().ok_or(BufferError::Disposed)?;
        match source.cursor() {
            Ok(cursor) => {
                #[cfg(feature = "tracing")]
                tracing::trace!("buffer opened source cursor");
                self.cursor = Some(cursor);
                Ok(())
            }
            Err(e) => {
                #[cfg(feature = "tracing")]
                tracing::debug!("buffer source failed to open; caching error");
                self.error = Some(e.clone());
                Err(BufferError::Source(e))
            }
        }
    }

    /// Advance the underlying cursor by one element.
    ///
    /// `None` means the source is exhausted (for every consumer).
    pub fn pull(&mut self) -> Option<Result<S::Item, BufferError<S::Error>>> {
        if self.exhausted {
            return None;
        }
        if let Err(e) = self.ensure_open() {
            return Some(Err(e));
        }
        let cursor = self.cursor.as_mut()?;
        match cursor.next() {
            Some(Ok(item)) => {
                self.produced += 1;
                Some(Ok(item))
            }
            Some(Err(e)) => {
                #[cfg(feature = "tracing")]
                tracing::debug!(produced = self.produced, "buffer source failed; caching error");
                self.error = Some(e.clone());
                Some(Err(BufferError::Source(e)))
            }
            None => {
                #[cfg(feature = "tracing")]
                tracing::trace!(produced = self.produced, "buffer source exhausted");
                self.exhausted = true;
                self.cursor = None;
                None
            }
        }
    }

    /// Drop the open cursor and forget terminal state; the source is kept.
    pub fn reset(&mut self) {
        self.cursor = None;
        self.error = None;
        self.exhausted = false;
        self.produced = 0;
    }

    /// Drop the open cursor and the source itself.
    pub fn release(&mut self) {
        self.reset();
        self.source = None;
    }
}
