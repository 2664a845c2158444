#![forbid(unsafe_code)]
//! lazyseq-core: shared contracts for the lazyseq operator crates.
//!
//! Contents:
//! - `Sequence`: a re-iterable, possibly fallible lazy sequence.
//! - Join classification (`JoinOperation`, `JoinStrategy`) and key comparers.
//! - Serializable configuration (`SeqConfig`) with env overrides.
//!
//! No locking, no buffering and no operator logic lives here; the buffer and
//! operator crates build on these types.

pub mod compare;
pub mod config;
pub mod error;
pub mod join;
pub mod prelude;
pub mod sequence;

pub use error::{Error, Result};
