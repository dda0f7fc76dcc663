//! A mutable sequence of integers backed by a splay tree keyed by implicit
//! rank.
//!
//! Besides point insertion and removal, every contiguous range supports sum,
//! minimum and maximum queries, overwriting, adding a constant, reversal, and
//! stepping to the lexicographically next or previous permutation. Each
//! range operation isolates its range as a standalone subtree, touches only
//! that subtree's root, and splices it back, so all of them run in amortized
//! `O(log n)`.

mod error;
mod node;
mod ops;
mod permutation;
mod tree;

pub use error::{Error, Result};
pub use tree::SplaySequence;
