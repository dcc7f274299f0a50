use crate::error::{RangeTreeError, Result};

#[inline(always)]
pub(crate) fn floor_log2_nonzero(x: usize) -> u32 {
    debug_assert!(x > 0);
    usize::BITS - 1 - x.leading_zeros()
}

/// Smallest `h` with `2^h >= n`, but at least 1.
#[inline(always)]
pub(crate) fn tree_height(n: usize) -> usize {
    debug_assert!(n > 0);
    if n <= 2 {
        1
    } else {
        floor_log2_nonzero(n - 1) as usize + 1
    }
}

/// Translates external positions into raw offsets.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Bounds {
    base: isize,
    last: isize,
    len: usize,
}

impl Bounds {
    /// Fails unless every position in `[base, base + len - 1]` is representable.
    pub(crate) fn new(base: isize, len: usize) -> Result<Self> {
        debug_assert!(len > 0);
        let last = base
            .checked_add_unsigned(len - 1)
            .ok_or(RangeTreeError::BaseIndexOverflow {
                base_index: base,
                len,
            })?;
        Ok(Self { base, last, len })
    }

    pub(crate) fn base(&self) -> isize {
        self.base
    }

    pub(crate) fn len(&self) -> usize {
        self.len
    }

    fn first(&self) -> isize {
        self.base
    }

    fn last(&self) -> isize {
        self.last
    }

    fn raw(&self, position: isize) -> Option<usize> {
        let offset = position.checked_sub(self.base)?;
        let offset = usize::try_from(offset).ok()?;
        (offset < self.len).then_some(offset)
    }

    pub(crate) fn index(&self, index: isize) -> Result<usize> {
        self.raw(index).ok_or(RangeTreeError::IndexOutOfRange {
            index,
            first: self.first(),
            last: self.last(),
        })
    }

    pub(crate) fn range(&self, left: isize, right: isize) -> Result<(usize, usize)> {
        let invalid = || RangeTreeError::InvalidRange {
            left,
            right,
            first: self.first(),
            last: self.last(),
        };
        if left > right {
            return Err(invalid());
        }
        let l = self.raw(left).ok_or_else(invalid)?;
        let r = self.raw(right).ok_or_else(invalid)?;
        Ok((l, r))
    }

    pub(crate) fn full(&self) -> (usize, usize) {
        (0, self.len - 1)
    }
}
