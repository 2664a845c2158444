#![forbid(unsafe_code)]
//! lazyseq-buffer: many cursors over one underlying sequence cursor.
//!
//! Three buffers are provided, all behind the `Buffer` trait:
//! - `share`: competing consumers. Each element goes to exactly one cursor.
//! - `publish`: fan-out. Each cursor sees every element produced after it
//!   attached, through its own queue.
//! - `memoize`: replay. Each cursor sees the whole sequence; elements are
//!   computed once and cached.
//!
//! Every buffer keeps its mutable state in one record behind one lock, opens
//! the source lazily, and caches the first upstream error so that every
//! consumer observes the same failure until `reset()`. Calling back into the
//! same buffer from inside the source's iterator is not supported.

pub mod error;
pub mod memoize;
pub mod publish;
pub mod share;
pub mod tracking;
pub mod traits;

mod upstream;

pub use error::BufferError;
pub use memoize::{memoize, memoize_with_config, MemoizeCursor, MemoizedBuffer};
pub use publish::{publish, publish_with_config, PublishCursor, PublishedBuffer};
pub use share::{share, ShareCursor, SharedBuffer};
pub use tracking::PeakTracker;
pub use traits::Buffer;
