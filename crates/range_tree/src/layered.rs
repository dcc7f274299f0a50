use std::fmt;

use tracing::{debug, trace};

use crate::RangeFold;
use crate::combine::Combine;
use crate::error::{RangeTreeError, Result};
use crate::util::{Bounds, tree_height};

/// Pairwise-combined layers, walked iteratively.
///
/// `layers[0]` holds the raw elements and `layers[k + 1][i]` covers
/// `layers[k][2i]` and `layers[k][2i + 1]`. The unpaired last cell of an odd-length
/// layer is carried upward unchanged. The topmost layer has at most two cells.
pub struct LayeredTree<C: Combine> {
    layers: Vec<Vec<C::Value>>,
    bounds: Bounds,
}

impl<C: Combine> LayeredTree<C> {
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
        let mut layers = Vec::with_capacity(height);
        layers.push(values);
        while layers.len() < height {
            let below = &layers[layers.len() - 1];
            let mut layer = Vec::with_capacity(below.len().div_ceil(2));
            for pair in below.chunks(2) {
                match pair {
                    [a, b] => layer.push(C::combine(a, b)),
                    [carry] => layer.push(carry.clone()),
                    _ => unreachable!(),
                }
            }
            layers.push(layer);
        }
        debug_assert!(layers[height - 1].len() <= 2);

        debug!(len = n, height, base_index, "built layered range tree");
        Ok(Self {
            layers,
            bounds,
        })
    }

    fn fold(&self, mut l: usize, mut r: usize) -> C::Value {
        let raw = &self.layers[0];
        if l == r {
            return raw[l].clone();
        }

        let mut left = raw[l].clone();
        let mut right = raw[r].clone();
        let mut level = 0;
        while l >> 1 != r >> 1 {
            let layer = &self.layers[level];
            if l & 1 == 0 {
                left = C::combine(&left, &layer[l + 1]);
            }
            if r & 1 == 1 {
                right = C::combine(&layer[r - 1], &right);
            }
            l >>= 1;
            r >>= 1;
            level += 1;
        }
        trace!(level, "layered fold met at shared parent");
        C::combine(&left, &right)
    }

    /// Layers from the root down to the raw elements.
    pub fn layers(
        &self,
    ) -> impl DoubleEndedIterator<Item = &[C::Value]> + ExactSizeIterator {
        self.layers.iter().rev().map(Vec::as_slice)
    }
}

impl<C: Combine> RangeFold for LayeredTree<C> {
    type Value = C::Value;
    /// Layers root first; the last entry is the raw sequence.
    type Snapshot = Vec<Vec<C::Value>>;

    fn with_base(values: &[C::Value], base_index: isize) -> Result<Self> {
        Self::build(values.to_vec(), base_index)
    }

    fn len(&self) -> usize {
        self.bounds.len()
    }

    fn height(&self) -> usize {
        self.layers.len()
    }

    fn base_index(&self) -> isize {
        self.bounds.base()
    }

    fn get(&self, index: isize) -> Result<&C::Value> {
        let raw = self.bounds.index(index)?;
        Ok(&self.layers[0][raw])
    }

    fn query(&self, left: isize, right: isize) -> Result<C::Value> {
        let (l, r) = self.bounds.range(left, right)?;
        Ok(self.fold(l, r))
    }

    fn query_all(&self) -> C::Value {
        let (l, r) = self.bounds.full();
        self.fold(l, r)
    }

    fn update(&mut self, index: isize, value: C::Value) -> Result<()> {
        let mut pos = self.bounds.index(index)?;
        trace!(index, raw = pos, "layered update");

        self.layers[0][pos] = value;
        for level in 1..self.layers.len() {
            let (lower, upper) = self.layers.split_at_mut(level);
            let below = &lower[level - 1];
            let parent = pos >> 1;
            upper[0][parent] = if (pos ^ 1) < below.len() {
                C::combine(&below[parent << 1], &below[(parent << 1) | 1])
            } else {
                below[pos].clone()
            };
            pos = parent;
        }
        Ok(())
    }

    fn snapshot(&self) -> Self::Snapshot {
        self.layers.iter().rev().cloned().collect()
    }
}

impl<C: Combine> Clone for LayeredTree<C> {
    fn clone(&self) -> Self {
        Self {
            layers: self.layers.clone(),
            bounds: self.bounds,
        }
    }
}

impl<C> fmt::Debug for LayeredTree<C>
where
    C: Combine,
    C::Value: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LayeredTree")
            .field("layers", &self.layers)
            .field("base_index", &self.bounds.base())
            .finish()
    }
}

impl<C> fmt::Display for LayeredTree<C>
where
    C: Combine,
    C::Value: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (depth, layer) in self.layers().enumerate() {
            if depth > 0 {
                f.write_str("\n")?;
            }
            f.write_str("[")?;
            for (i, value) in layer.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{value}")?;
            }
            f.write_str("]")?;
        }
        Ok(())
    }
}

impl<C: Combine> From<&LayeredTree<C>> for Vec<C::Value> {
    /// Flattens the layers root first.
    fn from(tree: &LayeredTree<C>) -> Self {
        tree.layers().flatten().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combine::{Concat, Sum};

    fn assert_carry_invariant(tree: &LayeredTree<Sum<i64>>) {
        for level in 1..tree.layers.len() {
            let below = &tree.layers[level - 1];
            let above = &tree.layers[level];
            assert_eq!(above.len(), below.len().div_ceil(2));
            for (i, cell) in above.iter().enumerate() {
                let expected = match below.get(2 * i + 1) {
                    Some(right) => below[2 * i] + right,
                    None => below[2 * i],
                };
                assert_eq!(*cell, expected, "level={level} i={i}");
            }
        }
    }

    #[test]
    fn odd_layers_carry_their_last_cell() {
        let tree = LayeredTree::<Sum<i64>>::new(&[2, 4, 1, 5, 3]).unwrap();
        assert_eq!(tree.height(), 3);
        assert_eq!(
            tree.snapshot(),
            vec![vec![12, 3], vec![6, 6, 3], vec![2, 4, 1, 5, 3]]
        );
        assert_carry_invariant(&tree);
        assert_eq!(tree.to_string(), "[12, 3]\n[6, 6, 3]\n[2, 4, 1, 5, 3]");
    }

    #[test]
    fn updating_carry_cell_copies_upward() {
        let mut tree = LayeredTree::<Sum<i64>>::new(&[2, 4, 1, 5, 3]).unwrap();
        tree.update(4, 30).unwrap();
        assert_eq!(
            tree.snapshot(),
            vec![vec![12, 30], vec![6, 6, 30], vec![2, 4, 1, 5, 30]]
        );
        assert_carry_invariant(&tree);

        tree.update(2, 10).unwrap();
        assert_carry_invariant(&tree);
        assert_eq!(tree.query(1, 3), Ok(19));
        assert_eq!(tree.query_all(), 51);
    }

    #[test]
    fn two_elements_form_a_single_layer() {
        let values = ["p".to_string(), "q".to_string()];
        let mut tree = LayeredTree::<Concat>::with_base(&values, -1).unwrap();
        assert_eq!(tree.height(), 1);
        assert_eq!(tree.query(-1, 0).unwrap(), "pq");
        tree.update(0, "r".into()).unwrap();
        assert_eq!(tree.query_all(), "pr");
        assert_eq!(Vec::from(&tree), vec!["p".to_string(), "r".to_string()]);
    }

    #[test]
    fn carry_invariant_survives_many_updates() {
        for n in 1..=33 {
            let values: Vec<i64> = (0..n as i64).collect();
            let mut tree = LayeredTree::<Sum<i64>>::new(&values).unwrap();
            assert_eq!(tree.layers().next().map(<[i64]>::len), Some(n.min(2)));
            for i in 0..n as isize {
                tree.update(i, 100 * i as i64 + 7).unwrap();
                assert_carry_invariant(&tree);
            }
        }
    }
}
