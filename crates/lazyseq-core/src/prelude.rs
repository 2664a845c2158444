//! Convenient re-exports for downstream crates.

pub use crate::compare::{EqBy, KeyBy, KeyEq, KeyHash, KeyOrd, Natural, OrdBy};
pub use crate::config::{BufferConfig, JoinConfig, SeqConfig};
pub use crate::error::{Error, Result};
pub use crate::join::{JoinOperation, JoinStrategy};
pub use crate::sequence::{from_fn, repeatable, FromFn, Repeatable, Sequence};
