/// A contiguous block of interior rows assigned to one child.
///
/// `start` is 1-based (interior rows run `1..=height`); the block
/// covers rows `start..start + len`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RowRange {
    pub start: usize,
    pub len: usize,
}

impl RowRange {
    /// Last row of the block, inclusive.
    pub fn end(&self) -> usize {
        self.start + self.len - 1
    }
}

/// Split `height` interior rows across up to `children` workers.
///
/// The returned ranges are ordered, pairwise disjoint, and cover
/// exactly `[1, height]`. With `step = max(1, height / children)`, the
/// first `min(children - 1, height)` workers each get `step` rows and
/// the next worker gets everything left over — which may be more than
/// `step`. When there are more children than rows, each of the first
/// `height` children gets a single row and the rest get nothing; the
/// returned list is then shorter than `children`, and callers must not
/// wait on children without a range.
///
/// Both the scatter and the gather side recompute this function from
/// the same inputs, which is what keeps their offsets in agreement
/// without negotiation.
pub fn plan_rows(height: usize, children: usize) -> Vec<RowRange> {
    if children == 0 || height == 0 {
        return Vec::new();
    }

    let step = (height / children).max(1);
    let assignable = (children - 1).min(height);

    let mut ranges = Vec::with_capacity(assignable + 1);
    for i in 0..assignable {
        ranges.push(RowRange {
            start: 1 + i * step,
            len: step,
        });
    }

    // Everything was handed out one row per child; extra children idle.
    if assignable == height {
        return ranges;
    }

    ranges.push(RowRange {
        start: 1 + assignable * step,
        len: height - assignable * step,
    });
    ranges
}
