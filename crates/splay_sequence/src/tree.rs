use crate::node::{Id, Monotone, Node, id};

/// A sequence of `i64` stored in a splay tree keyed by implicit rank.
///
/// Nodes live in an arena and refer to each other by index; a node's parent
/// link is only used to walk upwards while splaying or computing a rank.
/// Every query takes `&mut self` because reading restructures the tree.
#[derive(Clone)]
pub struct SplaySequence {
    pub(crate) nodes: Vec<Node>,
    pub(crate) free: Vec<Id>,
    pub(crate) stack: Vec<Id>,
    pub(crate) root: Id,
    pub(crate) clock: u64,
}

impl SplaySequence {
    #[inline(always)]
    pub(crate) fn node(&self, x: Id) -> &Node {
        debug_assert!(!x.is_nil());
        &self.nodes[x.idx()]
    }

    #[inline(always)]
    pub(crate) fn node_mut(&mut self, x: Id) -> &mut Node {
        debug_assert!(!x.is_nil());
        &mut self.nodes[x.idx()]
    }

    #[inline(always)]
    pub(crate) fn sz(&self, x: Id) -> usize {
        if x.is_nil() { 0 } else { self.node(x).size as usize }
    }

    pub(crate) fn alloc(&mut self, value: i64) -> Id {
        match self.free.pop() {
            Some(x) => {
                *self.node_mut(x) = Node::new(value);
                x
            }
            None => {
                let x = id(self.nodes.len());
                self.nodes.push(Node::new(value));
                x
            }
        }
    }

    pub(crate) fn release(&mut self, x: Id) {
        debug_assert!(self.node(x).p.is_nil());
        self.free.push(x);
    }

    pub(crate) fn tick(&mut self) -> u64 {
        self.clock += 1;
        self.clock
    }

    /// Applies `x`'s own pending reverse, assign and add (in that order) and
    /// hands them down to its children.
    pub(crate) fn push(&mut self, x: Id) {
        if x.is_nil() {
            return;
        }

        if self.node(x).rev {
            let nx = self.node_mut(x);
            nx.apply_reverse();
            nx.rev = false;
            for c in nx.ch {
                if !c.is_nil() {
                    self.node_mut(c).rev ^= true;
                }
            }
        }

        let (assign, add) = {
            let nx = self.node(x);
            (nx.assign, nx.add)
        };
        if let Some(assign) = assign {
            let nx = self.node_mut(x);
            let tag = assign.absorb(add);
            nx.assign = None;
            nx.add = None;
            nx.apply_assign(tag.value);
            for c in nx.ch {
                if !c.is_nil() {
                    self.node_mut(c).assign = Some(tag);
                }
            }
        } else if let Some(tag) = add {
            let nx = self.node_mut(x);
            nx.add = None;
            nx.apply_add(tag.value);
            for c in nx.ch {
                if !c.is_nil() {
                    self.node_mut(c).compose_add(tag);
                }
            }
        }
    }

    /// Recomputes `x`'s aggregates from its (freshly pushed) children.
    pub(crate) fn pull(&mut self, x: Id) {
        if x.is_nil() {
            return;
        }
        let [l, r] = self.node(x).ch;
        for c in [l, r] {
            if !c.is_nil() {
                self.push(c);
                self.node_mut(c).p = x;
            }
        }

        let left = (!l.is_nil()).then(|| *self.node(l));
        let right = (!r.is_nil()).then(|| *self.node(r));
        let nx = self.node_mut(x);
        let value = nx.value;

        nx.size = 1;
        nx.sum = value;
        nx.min = value;
        nx.max = value;
        nx.first = value;
        nx.last = value;
        if let Some(l) = &left {
            nx.size += l.size;
            nx.sum += l.sum;
            nx.min = nx.min.min(l.min);
            nx.max = nx.max.max(l.max);
            nx.first = l.first;
        }
        if let Some(r) = &right {
            nx.size += r.size;
            nx.sum += r.sum;
            nx.min = nx.min.min(r.min);
            nx.max = nx.max.max(r.max);
            nx.last = r.last;
        }
        nx.monotone = Monotone::combine(
            left.map(|n| n.extent()),
            value,
            right.map(|n| n.extent()),
        );
    }

    fn rotate(&mut self, x: Id) {
        let p = self.node(x).p;
        let g = self.node(p).p;
        self.push(p);
        self.push(x);

        let dir = usize::from(self.node(p).ch[1] == x);
        let b = self.node(x).ch[dir ^ 1];

        if !g.is_nil() {
            if self.node(g).ch[0] == p {
                self.node_mut(g).ch[0] = x;
            } else {
                self.node_mut(g).ch[1] = x;
            }
        }
        self.node_mut(x).p = g;

        self.node_mut(x).ch[dir ^ 1] = p;
        self.node_mut(p).p = x;

        self.node_mut(p).ch[dir] = b;
        if !b.is_nil() {
            self.node_mut(b).p = p;
        }

        self.pull(p);
        self.pull(x);
    }

    /// Pushes every node on the path from the root down to `x`.
    fn push_path(&mut self, x: Id) {
        self.stack.clear();
        let mut y = x;
        self.stack.push(y);
        while !self.node(y).p.is_nil() {
            y = self.node(y).p;
            self.stack.push(y);
        }
        while let Some(v) = self.stack.pop() {
            self.push(v);
        }
    }

    pub(crate) fn splay(&mut self, x: Id) {
        self.push_path(x);

        // `rotate` pulls only `p` and `x`; the old grandparent is pulled by
        // the rotation that lifts `x` past it.
        while !self.node(x).p.is_nil() {
            let p = self.node(x).p;
            let g = self.node(p).p;
            if !g.is_nil() {
                let zigzig = (self.node(g).ch[0] == p) == (self.node(p).ch[0] == x);
                if zigzig {
                    self.rotate(p);
                } else {
                    self.rotate(x);
                }
            }
            self.rotate(x);
        }
    }

    /// Node at 0-based `index` inside the tree rooted at `root`.
    pub(crate) fn find_by_rank(&mut self, root: Id, mut index: usize) -> Id {
        debug_assert!(index < self.sz(root));
        let mut x = root;
        loop {
            self.push(x);
            let [l, r] = self.node(x).ch;
            let left_size = self.sz(l);
            if index < left_size {
                x = l;
            } else if index == left_size {
                return x;
            } else {
                index -= left_size + 1;
                x = r;
            }
        }
    }

    /// 0-based position of `x` within its tree, derived from subtree sizes
    /// along the path to the root.
    pub(crate) fn rank_of(&mut self, x: Id) -> usize {
        self.push_path(x);
        let mut rank = self.sz(self.node(x).ch[0]);
        let mut child = x;
        let mut parent = self.node(x).p;
        while !parent.is_nil() {
            let [l, r] = self.node(parent).ch;
            if r == child {
                rank += self.sz(l) + 1;
            }
            child = parent;
            parent = self.node(parent).p;
        }
        rank
    }

    fn detach(&mut self, x: Id, side: usize) -> Id {
        let c = self.node(x).ch[side];
        self.node_mut(x).ch[side] = Id::NIL;
        if !c.is_nil() {
            self.node_mut(c).p = Id::NIL;
            self.push(c);
        }
        self.pull(x);
        c
    }

    /// Splits off the first `left_count` elements.
    pub(crate) fn split(&mut self, root: Id, left_count: usize) -> (Id, Id) {
        if root.is_nil() {
            return (Id::NIL, Id::NIL);
        }
        if left_count == 0 {
            return (Id::NIL, root);
        }
        if left_count >= self.sz(root) {
            return (root, Id::NIL);
        }

        let x = self.find_by_rank(root, left_count);
        self.splay(x);
        let left = self.detach(x, 0);
        (left, x)
    }

    pub(crate) fn merge(&mut self, left: Id, right: Id) -> Id {
        if left.is_nil() {
            return right;
        }
        if right.is_nil() {
            return left;
        }

        let last = self.sz(left) - 1;
        let x = self.find_by_rank(left, last);
        self.splay(x);
        self.push(right);
        self.node_mut(x).ch[1] = right;
        self.pull(x);
        x
    }

    /// Isolates `start..end` as `(before, middle, after)`.
    pub(crate) fn extract(&mut self, root: Id, start: usize, end: usize) -> (Id, Id, Id) {
        let (before, rest) = self.split(root, start);
        let (middle, after) = self.split(rest, end - start);
        (before, middle, after)
    }

    pub(crate) fn reattach(&mut self, before: Id, middle: Id, after: Id) -> Id {
        let head = self.merge(before, middle);
        self.merge(head, after)
    }

    /// Extracts `start..end` of the tree at `root`, hands the pushed middle
    /// root to `f`, and reattaches whatever middle root `f` returns.
    pub(crate) fn with_range_in<T>(
        &mut self,
        root: Id,
        start: usize,
        end: usize,
        f: impl FnOnce(&mut Self, Id) -> (Id, T),
    ) -> (Id, T) {
        debug_assert!(start < end && end <= self.sz(root));
        let (before, middle, after) = self.extract(root, start, end);
        self.push(middle);
        let (middle, out) = f(self, middle);
        (self.reattach(before, middle, after), out)
    }

    /// Builds a perfectly balanced tree over `values`.
    pub(crate) fn build(&mut self, values: &[i64]) -> Id {
        if values.is_empty() {
            return Id::NIL;
        }
        let mid = values.len() / 2;
        let x = self.alloc(values[mid]);
        let l = self.build(&values[..mid]);
        let r = self.build(&values[mid + 1..]);
        self.node_mut(x).ch = [l, r];
        self.pull(x);
        x
    }

    /// In-order values of the tree at `root`.
    pub(crate) fn collect(&mut self, root: Id) -> Vec<i64> {
        let mut out = Vec::with_capacity(self.sz(root));
        let mut stack = Vec::new();
        let mut x = root;
        loop {
            while !x.is_nil() {
                self.push(x);
                stack.push(x);
                x = self.node(x).ch[0];
            }
            let Some(y) = stack.pop() else {
                break;
            };
            out.push(self.node(y).value);
            x = self.node(y).ch[1];
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use crate::SplaySequence;
    use crate::node::{Id, Monotone};

    impl SplaySequence {
        /// Checks every stored aggregate against a fresh recomputation.
        pub(crate) fn check_invariants(&mut self) {
            let root = self.root;
            if root.is_nil() {
                return;
            }
            assert!(self.node(root).p.is_nil());
            self.check_subtree(root);
        }

        fn check_subtree(&mut self, x: Id) -> Vec<i64> {
            self.push(x);
            let [l, r] = self.node(x).ch;
            let mut values = Vec::new();
            if !l.is_nil() {
                assert_eq!(self.node(l).p, x);
                values.extend(self.check_subtree(l));
            }
            values.push(self.node(x).value);
            if !r.is_nil() {
                assert_eq!(self.node(r).p, x);
                values.extend(self.check_subtree(r));
            }

            let n = self.node(x);
            assert_eq!(n.size as usize, values.len());
            assert_eq!(n.sum, values.iter().sum::<i64>());
            assert_eq!(Some(&n.min), values.iter().min());
            assert_eq!(Some(&n.max), values.iter().max());
            assert_eq!(Some(&n.first), values.first());
            assert_eq!(Some(&n.last), values.last());
            let expected = if values.windows(2).all(|w| w[0] == w[1]) {
                Monotone::Constant
            } else if values.windows(2).all(|w| w[0] <= w[1]) {
                Monotone::NonDecreasing
            } else if values.windows(2).all(|w| w[0] >= w[1]) {
                Monotone::NonIncreasing
            } else {
                Monotone::None
            };
            assert_eq!(n.monotone, expected, "subtree {values:?}");
            values
        }
    }

    #[test]
    fn split_and_merge_preserve_order() {
        let mut seq = SplaySequence::from_slice(&[1, 2, 3, 4, 5]);
        let root = seq.root;
        let (left, right) = seq.split(root, 2);
        assert_eq!(seq.collect(left), vec![1, 2]);
        assert_eq!(seq.collect(right), vec![3, 4, 5]);
        seq.root = seq.merge(right, left);
        assert_eq!(seq.to_vec(), vec![3, 4, 5, 1, 2]);
        seq.check_invariants();
    }

    #[test]
    fn split_edges() {
        let mut seq = SplaySequence::from_slice(&[7, 8, 9]);
        let root = seq.root;
        assert_eq!(seq.split(root, 0), (Id::NIL, root));
        assert_eq!(seq.split(root, 3), (root, Id::NIL));
        assert_eq!(seq.split(Id::NIL, 1), (Id::NIL, Id::NIL));
    }

    #[test]
    fn extract_isolates_middle() {
        let mut seq = SplaySequence::from_slice(&[0, 1, 2, 3, 4, 5, 6]);
        let root = seq.root;
        let (before, middle, after) = seq.extract(root, 2, 5);
        assert_eq!(seq.collect(middle), vec![2, 3, 4]);
        seq.push(middle);
        assert_eq!(seq.node(middle).sum, 9);
        seq.root = seq.reattach(before, middle, after);
        assert_eq!(seq.to_vec(), (0..7).collect::<Vec<_>>());
        seq.check_invariants();
    }

    #[test]
    fn rank_of_follows_parent_links() {
        let mut seq = SplaySequence::from_slice(&[10, 20, 30, 40, 50, 60]);
        seq.reverse(1..5).unwrap();
        let root = seq.root;
        for index in 0..6 {
            let x = seq.find_by_rank(root, index);
            assert_eq!(seq.rank_of(x), index);
        }
    }

    #[test]
    fn splay_moves_node_to_root() {
        let mut seq = SplaySequence::from_slice(&(0..100).collect::<Vec<_>>());
        let root = seq.root;
        let x = seq.find_by_rank(root, 37);
        seq.splay(x);
        seq.root = x;
        assert!(seq.node(x).p.is_nil());
        assert_eq!(seq.sz(seq.node(x).ch[0]), 37);
        seq.check_invariants();
    }

    #[test]
    fn removed_slots_are_reused() {
        let mut seq = SplaySequence::from_slice(&[1, 2, 3]);
        seq.remove(1).unwrap();
        seq.insert(0, 9).unwrap();
        assert_eq!(seq.nodes.len(), 3);
        assert_eq!(seq.to_vec(), vec![9, 1, 3]);
    }
}
