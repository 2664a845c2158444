//! Common surface of the three buffers.

use crate::error::BufferError;

/// A disposable, resettable, multiply-iterable view over one sequence.
///
/// Invariants:
/// - After `dispose()`, `cursor()` fails and every existing cursor fails
///   with `BufferError::Disposed` on its next advance.
/// - After `reset()`, every existing cursor fails with
///   `BufferError::Modified`; new cursors start a fresh pass.
pub trait Buffer {
    type Item;
    type Error;
    type Cursor: Iterator<Item = Result<Self::Item, BufferError<Self::Error>>>;

    /// Attach a new consumer.
    fn cursor(&self) -> Result<Self::Cursor, BufferError<Self::Error>>;

    /// Drop the underlying cursor and cached state and start a new epoch.
    fn reset(&self);

    /// Elements currently retained by the buffer (meaning varies per buffer).
    fn count(&self) -> usize;

    /// Make the buffer permanently unusable and release the source.
    fn dispose(&self);

    fn is_disposed(&self) -> bool;
}
