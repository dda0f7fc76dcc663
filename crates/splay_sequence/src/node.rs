#[repr(transparent)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Id(u32);

impl Id {
    pub(crate) const NIL: Self = Self(u32::MAX);

    #[inline(always)]
    pub(crate) fn is_nil(self) -> bool {
        self.0 == u32::MAX
    }

    #[inline(always)]
    pub(crate) fn idx(self) -> usize {
        self.0 as usize
    }
}

#[inline(always)]
pub(crate) fn id(v: usize) -> Id {
    debug_assert!(v < u32::MAX as usize);
    Id(v as u32)
}

/// Ordering guarantee of a subtree's in-order sequence.
///
/// `Constant` satisfies both directions; `None` promises nothing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Monotone {
    Constant,
    NonDecreasing,
    NonIncreasing,
    None,
}

impl Monotone {
    pub(crate) fn reversed(self) -> Self {
        match self {
            Monotone::NonDecreasing => Monotone::NonIncreasing,
            Monotone::NonIncreasing => Monotone::NonDecreasing,
            other => other,
        }
    }

    /// Whether a subtree tagged `self` is entirely a `run` sequence.
    pub(crate) fn satisfies(self, run: Monotone) -> bool {
        match run {
            Monotone::None => true,
            Monotone::Constant => self == Monotone::Constant,
            _ => self == Monotone::Constant || self == run,
        }
    }

    /// Whether `before` followed by `after` keeps a `self` run going.
    pub(crate) fn ordered(self, before: i64, after: i64) -> bool {
        match self {
            Monotone::Constant => before == after,
            Monotone::NonDecreasing => before <= after,
            Monotone::NonIncreasing => before >= after,
            Monotone::None => true,
        }
    }

    pub(crate) fn combine(left: Option<Extent>, value: i64, right: Option<Extent>) -> Self {
        let all = |run: Monotone| {
            left.is_none_or(|e| e.monotone.satisfies(run))
                && right.is_none_or(|e| e.monotone.satisfies(run))
        };

        if all(Monotone::Constant)
            && left.is_none_or(|e| e.min == value)
            && right.is_none_or(|e| e.min == value)
        {
            return Monotone::Constant;
        }
        if all(Monotone::NonDecreasing)
            && left.is_none_or(|e| e.max <= value)
            && right.is_none_or(|e| e.min >= value)
        {
            return Monotone::NonDecreasing;
        }
        if all(Monotone::NonIncreasing)
            && left.is_none_or(|e| e.min >= value)
            && right.is_none_or(|e| e.max <= value)
        {
            return Monotone::NonIncreasing;
        }
        Monotone::None
    }
}

/// The part of a child's summary that decides its parent's monotonicity.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Extent {
    pub(crate) monotone: Monotone,
    pub(crate) min: i64,
    pub(crate) max: i64,
}

/// A pending assign or add, stamped with the owning sequence's clock.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Tag {
    pub(crate) time: u64,
    pub(crate) value: i64,
}

impl Tag {
    /// Folds an add into a pending assign: "assign x at t1, add d at t2 > t1"
    /// is "assign x + d at t2". Older adds are overwritten by the assign.
    pub(crate) fn absorb(self, add: Option<Tag>) -> Tag {
        match add {
            Some(add) if add.time > self.time => Tag {
                time: add.time,
                value: self.value + add.value,
            },
            _ => self,
        }
    }

    /// Stacks a newer add on top of this one.
    pub(crate) fn then(self, newer: Tag) -> Tag {
        Tag {
            time: newer.time,
            value: self.value + newer.value,
        }
    }
}

/// Aggregates describe the subtree *before* this node's own pending tags;
/// they become exact once the node is pushed.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Node {
    pub(crate) ch: [Id; 2],
    pub(crate) p: Id,

    pub(crate) value: i64,
    pub(crate) size: u32,
    pub(crate) sum: i64,
    pub(crate) min: i64,
    pub(crate) max: i64,
    pub(crate) first: i64,
    pub(crate) last: i64,
    pub(crate) monotone: Monotone,

    pub(crate) rev: bool,
    pub(crate) assign: Option<Tag>,
    pub(crate) add: Option<Tag>,
}

impl Node {
    pub(crate) fn new(value: i64) -> Self {
        Self {
            ch: [Id::NIL, Id::NIL],
            p: Id::NIL,
            value,
            size: 1,
            sum: value,
            min: value,
            max: value,
            first: value,
            last: value,
            monotone: Monotone::Constant,
            rev: false,
            assign: None,
            add: None,
        }
    }

    pub(crate) fn extent(&self) -> Extent {
        Extent {
            monotone: self.monotone,
            min: self.min,
            max: self.max,
        }
    }

    pub(crate) fn apply_reverse(&mut self) {
        self.ch.swap(0, 1);
        std::mem::swap(&mut self.first, &mut self.last);
        self.monotone = self.monotone.reversed();
    }

    pub(crate) fn apply_assign(&mut self, value: i64) {
        self.value = value;
        self.sum = value * i64::from(self.size);
        self.min = value;
        self.max = value;
        self.first = value;
        self.last = value;
        self.monotone = Monotone::Constant;
    }

    pub(crate) fn apply_add(&mut self, delta: i64) {
        self.value += delta;
        self.sum += delta * i64::from(self.size);
        self.min += delta;
        self.max += delta;
        self.first += delta;
        self.last += delta;
    }

    /// Hands an add down from the parent, merging it into whatever is
    /// already pending here.
    pub(crate) fn compose_add(&mut self, tag: Tag) {
        if let Some(assign) = self.assign.as_mut() {
            *assign = assign.then(tag);
        } else {
            self.add = Some(match self.add {
                Some(old) => old.then(tag),
                None => tag,
            });
        }
    }
}
