//! Operator error type and shared vocabulary.

use std::fmt;

use lazyseq_core::join::JoinOperation;
use thiserror::Error;

/// Side of a two-input operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Left => f.write_str("left"),
            Side::Right => f.write_str("right"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OpError {
    #[error("{operation} join requires a {side}-only result selector")]
    MissingSelector {
        side: Side,
        operation: JoinOperation,
    },

    #[error(transparent)]
    Core(#[from] lazyseq_core::Error),
}
