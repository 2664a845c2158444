//! lazyseq: shared buffers over lazy sequences and a family of join operators.
//!
//! The workspace crates are re-exported here under short names.

pub use lazyseq_buffer as buffer;
pub use lazyseq_core as seq;
pub use lazyseq_operators as operators;

pub use lazyseq_core::prelude;
