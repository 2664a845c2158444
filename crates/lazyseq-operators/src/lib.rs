#![forbid(unsafe_code)]
//! lazyseq-operators: join family and the grouping it is built on.
//!
//! Design intent:
//! - Operators are plain lazy iterators; nothing runs until the first `next()`.
//! - Argument validation happens eagerly, when the operator is constructed.
//! - Strategy selection is a closed enum matched exhaustively (`join::Join`);
//!   each strategy keeps its own preconditions documented on its constructor.

pub mod group_adjacent;
pub mod join;
pub mod traits;

pub use group_adjacent::{group_adjacent, group_adjacent_by, GroupAdjacent};
pub use join::{
    full_join, hash_join, inner_join, join, join_with, left_join, loop_join, merge_join,
    right_join, Join, JoinOptions, JoinSelectors,
};
pub use traits::{OpError, Side};
