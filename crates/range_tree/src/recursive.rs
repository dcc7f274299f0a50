use std::fmt;

use tracing::{debug, trace};

use crate::RangeFold;
use crate::combine::Combine;
use crate::error::{RangeTreeError, Result};
use crate::util::{Bounds, tree_height};

/// Folds two optional slots, skipping absent operands.
#[inline(always)]
fn combine_slots<C: Combine>(
    left: Option<&C::Value>,
    right: Option<&C::Value>,
) -> Option<C::Value> {
    match (left, right) {
        (Some(a), Some(b)) => Some(C::combine(a, b)),
        (Some(a), None) => Some(a.clone()),
        (None, Some(b)) => Some(b.clone()),
        (None, None) => None,
    }
}

/// Binary tree over a heap-indexed arena.
///
/// The root lives at slot 0 and the children of slot `k` at `2k + 1` and `2k + 2`.
/// `[lower, upper]` is split at `lower + (upper - lower) / 2`, so for lengths that are
/// not powers of two some arena slots stay empty.
pub struct RecursiveTree<C: Combine> {
    values: Vec<C::Value>,
    nodes: Vec<Option<C::Value>>,
    // Heap slot of the leaf holding each raw position, in leaf-visitation order.
    leaves: Vec<usize>,
    bounds: Bounds,
    height: usize,
}

impl<C: Combine> RecursiveTree<C> {
    pub fn try_from_iter<I>(iter: I) -> Result<Self>
    where
        I: IntoIterator<Item = C::Value>,
    {
        Self::try_from_iter_with_base(iter, 0)
    }

    pub fn try_from_iter_with_base<I>(iter: I, base_index: isize) -> Result<Self>
    where
        I: IntoIterator<Item = C::Value>,
    {
        Self::build(iter.into_iter().collect(), base_index)
    }

    pub(crate) fn build(values: Vec<C::Value>, base_index: isize) -> Result<Self> {
        let n = values.len();
        if n == 0 {
            return Err(RangeTreeError::EmptyInput);
        }

        let bounds = Bounds::new(base_index, n)?;
        let height = tree_height(n);
        let slots = 2 * n.next_power_of_two() - 1;
        let mut tree = Self {
            values,
            nodes: vec![None; slots],
            leaves: Vec::with_capacity(n),
            bounds,
            height,
        };
        tree.construct(0, n - 1, 0);
        debug_assert_eq!(tree.leaves.len(), n);

        debug!(len = n, height, slots, base_index, "built recursive range tree");
        Ok(tree)
    }

    fn construct(&mut self, lower: usize, upper: usize, node: usize) {
        if lower == upper {
            self.nodes[node] = Some(self.values[lower].clone());
            self.leaves.push(node);
            return;
        }

        let mid = lower + (upper - lower) / 2;
        self.construct(lower, mid, 2 * node + 1);
        self.construct(mid + 1, upper, 2 * node + 2);
        self.pull(node);
    }

    #[inline(always)]
    fn pull(&mut self, node: usize) {
        self.nodes[node] = combine_slots::<C>(
            self.nodes[2 * node + 1].as_ref(),
            self.nodes[2 * node + 2].as_ref(),
        );
    }

    /// `None` means the node's range `[lower, upper]` does not meet `[l, r]`.
    fn fold(
        &self,
        l: usize,
        r: usize,
        lower: usize,
        upper: usize,
        node: usize,
    ) -> Option<C::Value> {
        if l <= lower && upper <= r {
            return self.nodes[node].clone();
        }
        if upper < l || r < lower {
            return None;
        }

        let mid = lower + (upper - lower) / 2;
        let left = self.fold(l, r, lower, mid, 2 * node + 1);
        let right = self.fold(l, r, mid + 1, upper, 2 * node + 2);
        match (left, right) {
            (Some(a), Some(b)) => Some(C::combine(&a, &b)),
            (a, None) => a,
            (None, b) => b,
        }
    }

    /// Levels spanned by the arena, root level included.
    pub fn levels(&self) -> usize {
        arena_levels(self.nodes.len())
    }

    /// Arena slots in heap order.
    pub fn nodes(
        &self,
    ) -> impl DoubleEndedIterator<Item = Option<&C::Value>> + ExactSizeIterator {
        self.nodes.iter().map(Option::as_ref)
    }

    /// Heap slot of the leaf holding external position `index`.
    pub fn leaf_slot(&self, index: isize) -> Result<usize> {
        let raw = self.bounds.index(index)?;
        Ok(self.leaves[raw])
    }
}

fn arena_levels(slots: usize) -> usize {
    (slots + 1).trailing_zeros() as usize
}

impl<C: Combine> RangeFold for RecursiveTree<C> {
    type Value = C::Value;
    /// One vector per heap level, root first; empty slots are `None`.
    type Snapshot = Vec<Vec<Option<C::Value>>>;

    fn with_base(values: &[C::Value], base_index: isize) -> Result<Self> {
        Self::build(values.to_vec(), base_index)
    }

    fn len(&self) -> usize {
        self.bounds.len()
    }

    fn height(&self) -> usize {
        self.height
    }

    fn base_index(&self) -> isize {
        self.bounds.base()
    }

    fn get(&self, index: isize) -> Result<&C::Value> {
        let raw = self.bounds.index(index)?;
        Ok(&self.values[raw])
    }

    fn query(&self, left: isize, right: isize) -> Result<C::Value> {
        let (l, r) = self.bounds.range(left, right)?;
        trace!(l, r, "recursive fold");
        let (lower, upper) = self.bounds.full();
        match self.fold(l, r, lower, upper, 0) {
            Some(value) => Ok(value),
            None => unreachable!("range [{l}, {r}] lies inside the tree but met no leaf"),
        }
    }

    fn query_all(&self) -> C::Value {
        match &self.nodes[0] {
            Some(root) => root.clone(),
            None => self.values[0].clone(),
        }
    }

    fn update(&mut self, index: isize, value: C::Value) -> Result<()> {
        let raw = self.bounds.index(index)?;
        let mut node = self.leaves[raw];
        trace!(index, raw, node, "recursive update");

        self.nodes[node] = Some(value.clone());
        self.values[raw] = value;
        while node > 0 {
            node = (node - 1) / 2;
            self.pull(node);
        }
        Ok(())
    }

    fn snapshot(&self) -> Self::Snapshot {
        let mut levels = Vec::with_capacity(self.levels());
        let mut start = 0;
        let mut width = 1;
        while start < self.nodes.len() {
            levels.push(self.nodes[start..start + width].to_vec());
            start += width;
            width *= 2;
        }
        levels
    }
}

impl<C: Combine> Clone for RecursiveTree<C> {
    fn clone(&self) -> Self {
        Self {
            values: self.values.clone(),
            nodes: self.nodes.clone(),
            leaves: self.leaves.clone(),
            bounds: self.bounds,
            height: self.height,
        }
    }
}

impl<C> fmt::Debug for RecursiveTree<C>
where
    C: Combine,
    C::Value: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecursiveTree")
            .field("values", &self.values)
            .field("nodes", &self.nodes)
            .field("leaves", &self.leaves)
            .field("base_index", &self.bounds.base())
            .field("height", &self.height)
            .finish()
    }
}

impl<C> fmt::Display for RecursiveTree<C>
where
    C: Combine,
    C::Value: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, slot) in self.nodes.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            match slot {
                Some(value) => write!(f, "{value}")?,
                None => f.write_str("_")?,
            }
        }
        f.write_str("]")
    }
}

impl<C: Combine> From<&RecursiveTree<C>> for Vec<Option<C::Value>> {
    fn from(tree: &RecursiveTree<C>) -> Self {
        tree.nodes.clone()
    }
}
