use crate::node::{Id, Monotone};
use crate::tree::SplaySequence;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Direction {
    Next,
    Prev,
}

impl Direction {
    /// The suffix shape that has no further permutation in this direction.
    fn run(self) -> Monotone {
        match self {
            Direction::Next => Monotone::NonIncreasing,
            Direction::Prev => Monotone::NonDecreasing,
        }
    }

    /// Whether `value` may replace `pivot`.
    fn beats(self, value: i64, pivot: i64) -> bool {
        match self {
            Direction::Next => value > pivot,
            Direction::Prev => value < pivot,
        }
    }
}

impl SplaySequence {
    /// Permutes the standalone tree at `root` in place and returns its new
    /// root.
    pub(crate) fn permute(&mut self, root: Id, direction: Direction) -> Id {
        let len = self.sz(root);
        let run = self.monotone_suffix(root, direction.run());
        if run >= len {
            log::trace!("{direction:?} permutation of {len} elements wraps around");
            return self.wrap(root);
        }

        let pivot = len - run - 1;
        let x = self.find_by_rank(root, pivot);
        self.splay(x);
        let pivot_value = self.node(x).value;

        let (root, target) = self.with_range_in(x, pivot + 1, len, |this, suffix| {
            (suffix, this.closest(suffix, pivot_value, direction))
        });
        let Some(target) = target else {
            return self.wrap(root);
        };
        let target = self.rank_of(target);
        log::trace!("{direction:?} permutation: pivot {pivot}, swap with {target}");

        let root = self.swap(root, pivot, target);
        let (root, ()) = self.with_range_in(root, pivot + 1, len, |this, suffix| {
            this.node_mut(suffix).rev ^= true;
            (suffix, ())
        });
        root
    }

    fn wrap(&mut self, root: Id) -> Id {
        self.node_mut(root).rev ^= true;
        root
    }

    /// Length of the longest suffix of the tree at `root` that forms a `run`
    /// sequence. Whole subtrees already tagged `run` are counted without
    /// being entered.
    pub(crate) fn monotone_suffix(&mut self, root: Id, run: Monotone) -> usize {
        let mut count = 0;
        let mut x = root;
        while !x.is_nil() {
            self.push(x);
            if self.node(x).monotone.satisfies(run) {
                return count + self.sz(x);
            }

            let [l, r] = self.node(x).ch;
            let value = self.node(x).value;
            if !r.is_nil() {
                self.push(r);
                if !self.node(r).monotone.satisfies(run) {
                    x = r;
                    continue;
                }
                count += self.sz(r);
                if !run.ordered(value, self.node(r).first) {
                    return count;
                }
            }

            count += 1;
            if l.is_nil() {
                break;
            }
            self.push(l);
            if !run.ordered(self.node(l).last, value) {
                break;
            }
            x = l;
        }
        count
    }

    /// Rightmost node of a `direction.run()` tree whose value beats `pivot`,
    /// which is also the one with the closest such value.
    fn closest(&mut self, root: Id, pivot: i64, direction: Direction) -> Option<Id> {
        let mut best = None;
        let mut x = root;
        while !x.is_nil() {
            self.push(x);
            let node = self.node(x);
            if direction.beats(node.value, pivot) {
                best = Some(x);
                x = node.ch[1];
            } else {
                x = node.ch[0];
            }
        }
        best
    }

    /// Exchanges the elements at positions `i < j`.
    fn swap(&mut self, root: Id, i: usize, j: usize) -> Id {
        debug_assert!(i < j);
        let (before, first, rest) = self.extract(root, i, i + 1);
        let (between, second, after) = self.extract(rest, j - i - 1, j - i);
        let head = self.merge(before, second);
        let head = self.merge(head, between);
        let head = self.merge(head, first);
        self.merge(head, after)
    }
}
