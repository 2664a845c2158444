//! Join classification shared by the join operators and the config layer.
//!
//! `JoinOperation` says which unmatched rows must be emitted; it behaves as a
//! two-bit flag set (left = 0b01, right = 0b10). `JoinStrategy` picks the
//! algorithm. Both are closed enums: the operator crate dispatches on them
//! with an exhaustive `match`.

use std::fmt;
use std::ops::BitOr;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Which unmatched rows a join emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JoinOperation {
    #[default]
    Inner,
    LeftOuter,
    RightOuter,
    FullOuter,
}

impl JoinOperation {
    const LEFT: u8 = 0b01;
    const RIGHT: u8 = 0b10;

    pub const fn bits(self) -> u8 {
        match self {
            JoinOperation::Inner => 0,
            JoinOperation::LeftOuter => Self::LEFT,
            JoinOperation::RightOuter => Self::RIGHT,
            JoinOperation::FullOuter => Self::LEFT | Self::RIGHT,
        }
    }

    pub fn from_bits(bits: u8) -> Result<Self> {
        match bits {
            0 => Ok(JoinOperation::Inner),
            Self::LEFT => Ok(JoinOperation::LeftOuter),
            Self::RIGHT => Ok(JoinOperation::RightOuter),
            3 => Ok(JoinOperation::FullOuter),
            other => Err(Error::InvalidOperation(other.to_string())),
        }
    }

    /// True if unmatched left rows must be emitted.
    pub const fn includes_left(self) -> bool {
        self.bits() & Self::LEFT != 0
    }

    /// True if unmatched right rows must be emitted.
    pub const fn includes_right(self) -> bool {
        self.bits() & Self::RIGHT != 0
    }
}

impl BitOr for JoinOperation {
    type Output = JoinOperation;

    fn bitor(self, rhs: Self) -> Self::Output {
        // Both operands are valid flag sets, so the union is too.
        match self.bits() | rhs.bits() {
            0 => JoinOperation::Inner,
            Self::LEFT => JoinOperation::LeftOuter,
            Self::RIGHT => JoinOperation::RightOuter,
            _ => JoinOperation::FullOuter,
        }
    }
}

impl fmt::Display for JoinOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            JoinOperation::Inner => "inner",
            JoinOperation::LeftOuter => "left_outer",
            JoinOperation::RightOuter => "right_outer",
            JoinOperation::FullOuter => "full_outer",
        };
        f.write_str(s)
    }
}

impl FromStr for JoinOperation {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "inner" => Ok(JoinOperation::Inner),
            "left" | "left_outer" => Ok(JoinOperation::LeftOuter),
            "right" | "right_outer" => Ok(JoinOperation::RightOuter),
            "full" | "full_outer" => Ok(JoinOperation::FullOuter),
            _ => Err(Error::InvalidOperation(s.to_string())),
        }
    }
}

/// Join algorithm.
///
/// - `Loop`: nested iteration, O(n*m). Preserves left order. Any equality
///   comparer. Never emits right-only rows.
/// - `Hash`: right side grouped into a hash multimap, O(n+m) expected.
///   Preserves left order. Keys must be `Hash + Eq`.
/// - `Merge`: single forward pass over same-key runs, O(n+m). Both inputs
///   must already be sorted by key under the comparer; output follows key
///   order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JoinStrategy {
    Loop,
    #[default]
    Hash,
    Merge,
}

impl fmt::Display for JoinStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            JoinStrategy::Loop => "loop",
            JoinStrategy::Hash => "hash",
            JoinStrategy::Merge => "merge",
        };
        f.write_str(s)
    }
}

impl FromStr for JoinStrategy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "loop" => Ok(JoinStrategy::Loop),
            "hash" => Ok(JoinStrategy::Hash),
            "merge" => Ok(JoinStrategy::Merge),
            _ => Err(Error::InvalidStrategy(s.to_string())),
        }
    }
}

impl TryFrom<u8> for JoinStrategy {
    type Error = Error;

    fn try_from(v: u8) -> Result<Self> {
        match v {
            0 => Ok(JoinStrategy::Loop),
            1 => Ok(JoinStrategy::Hash),
            2 => Ok(JoinStrategy::Merge),
            other => Err(Error::InvalidStrategy(other.to_string())),
        }
    }
}
