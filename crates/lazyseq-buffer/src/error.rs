use thiserror::Error;

/// Result type local to lazyseq-buffer.
pub type Result<T, E> = std::result::Result<T, BufferError<E>>;

/// Errors surfaced by buffer cursors.
///
/// `E` is the wrapped sequence's error. It is cloned, so every consumer sees
/// the identical failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BufferError<E> {
    #[error("source sequence failed: {0}")]
    Source(E),

    #[error("buffer has been disposed")]
    Disposed,

    #[error("buffer was reset during iteration (cursor epoch {expected}, buffer epoch {found})")]
    Modified { expected: u64, found: u64 },
}

impl<E> BufferError<E> {
    /// The upstream error, if this is one.
    pub fn into_source(self) -> Option<E> {
        match self {
            BufferError::Source(e) => Some(e),
            _ => None,
        }
    }

    pub fn is_source(&self) -> bool {
        matches!(self, BufferError::Source(_))
    }
}
