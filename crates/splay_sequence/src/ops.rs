use std::ops::{Bound, RangeBounds};

use crate::error::{Error, Result};
use crate::node::{Id, Tag};
use crate::permutation::Direction;
use crate::tree::SplaySequence;

impl SplaySequence {
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            free: Vec::new(),
            stack: Vec::new(),
            root: Id::NIL,
            clock: 0,
        }
    }

    pub fn from_slice(values: &[i64]) -> Self {
        let mut seq = Self::new();
        seq.nodes.reserve(values.len());
        seq.root = seq.build(values);
        log::debug!("built sequence of {} elements", values.len());
        seq
    }

    /// `len` copies of `value`.
    pub fn with_value(len: usize, value: i64) -> Self {
        Self::from_slice(&vec![value; len])
    }

    pub fn len(&self) -> usize {
        self.sz(self.root)
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_nil()
    }

    fn check_index(&self, index: usize, len: usize) -> Result<()> {
        if index < len {
            Ok(())
        } else {
            Err(Error::IndexOutOfRange { index, len })
        }
    }

    fn normalize_range<R: RangeBounds<usize>>(range: R, len: usize) -> Result<(usize, usize)> {
        let start = match range.start_bound() {
            Bound::Included(&start) => start,
            Bound::Excluded(&start) => start.saturating_add(1),
            Bound::Unbounded => 0,
        };
        let end = match range.end_bound() {
            Bound::Included(&end) => end.saturating_add(1),
            Bound::Excluded(&end) => end,
            Bound::Unbounded => len,
        };

        if start >= end || end > len {
            return Err(Error::Range { start, end, len });
        }

        Ok((start, end))
    }

    /// Validates `range`, then runs `f` on the isolated subtree holding it.
    fn with_range<R, T>(&mut self, range: R, f: impl FnOnce(&mut Self, Id) -> (Id, T)) -> Result<T>
    where
        R: RangeBounds<usize>,
    {
        let (start, end) = Self::normalize_range(range, self.len())?;
        let (root, out) = self.with_range_in(self.root, start, end, f);
        self.root = root;
        Ok(out)
    }

    pub fn get(&mut self, index: usize) -> Result<i64> {
        self.check_index(index, self.len())?;
        let x = self.find_by_rank(self.root, index);
        self.splay(x);
        self.root = x;
        Ok(self.node(x).value)
    }

    /// Inserts `value` so that it ends up at `index`; `index == len` appends.
    pub fn insert(&mut self, index: usize, value: i64) -> Result<()> {
        let len = self.len();
        if index > len {
            return Err(Error::IndexOutOfRange { index, len });
        }
        let (left, right) = self.split(self.root, index);
        let x = self.alloc(value);
        self.node_mut(x).ch = [left, right];
        self.pull(x);
        self.root = x;
        Ok(())
    }

    pub fn remove(&mut self, index: usize) -> Result<i64> {
        self.check_index(index, self.len())?;
        let (before, target, after) = self.extract(self.root, index, index + 1);
        self.push(target);
        let value = self.node(target).value;
        self.release(target);
        self.root = self.merge(before, after);
        Ok(value)
    }

    pub fn push_back(&mut self, value: i64) {
        let x = self.alloc(value);
        self.root = self.merge(self.root, x);
    }

    pub fn sum<R: RangeBounds<usize>>(&mut self, range: R) -> Result<i64> {
        self.with_range(range, |this, mid| (mid, this.node(mid).sum))
    }

    pub fn min<R: RangeBounds<usize>>(&mut self, range: R) -> Result<i64> {
        self.with_range(range, |this, mid| (mid, this.node(mid).min))
    }

    pub fn max<R: RangeBounds<usize>>(&mut self, range: R) -> Result<i64> {
        self.with_range(range, |this, mid| (mid, this.node(mid).max))
    }

    /// Overwrites every element in `range` with `value`.
    pub fn assign<R: RangeBounds<usize>>(&mut self, range: R, value: i64) -> Result<()> {
        self.with_range(range, |this, mid| {
            let time = this.tick();
            this.node_mut(mid).assign = Some(Tag { time, value });
            (mid, ())
        })
    }

    /// Adds `delta` to every element in `range`.
    pub fn add<R: RangeBounds<usize>>(&mut self, range: R, delta: i64) -> Result<()> {
        self.with_range(range, |this, mid| {
            let time = this.tick();
            this.node_mut(mid).add = Some(Tag { time, value: delta });
            (mid, ())
        })
    }

    pub fn reverse<R: RangeBounds<usize>>(&mut self, range: R) -> Result<()> {
        self.with_range(range, |this, mid| {
            this.node_mut(mid).rev ^= true;
            (mid, ())
        })
    }

    /// Rearranges `range` into its lexicographically next permutation. The
    /// largest arrangement wraps around to the smallest.
    pub fn next_permutation<R: RangeBounds<usize>>(&mut self, range: R) -> Result<()> {
        self.with_range(range, |this, mid| (this.permute(mid, Direction::Next), ()))
    }

    /// Rearranges `range` into its lexicographically previous permutation.
    /// The smallest arrangement wraps around to the largest.
    pub fn prev_permutation<R: RangeBounds<usize>>(&mut self, range: R) -> Result<()> {
        self.with_range(range, |this, mid| (this.permute(mid, Direction::Prev), ()))
    }

    pub fn to_vec(&mut self) -> Vec<i64> {
        self.collect(self.root)
    }
}

impl Default for SplaySequence {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Vec<i64>> for SplaySequence {
    fn from(values: Vec<i64>) -> Self {
        Self::from_slice(&values)
    }
}

impl FromIterator<i64> for SplaySequence {
    fn from_iter<I: IntoIterator<Item = i64>>(iter: I) -> Self {
        let values: Vec<i64> = iter.into_iter().collect();
        Self::from_slice(&values)
    }
}

impl Extend<i64> for SplaySequence {
    fn extend<I: IntoIterator<Item = i64>>(&mut self, iter: I) {
        let values: Vec<i64> = iter.into_iter().collect();
        let tail = self.build(&values);
        self.root = self.merge(self.root, tail);
    }
}
