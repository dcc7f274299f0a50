use std::fmt;

use crate::RangeFold;
use crate::combine::Combine;
use crate::config::{Strategy, TreeConfig};
use crate::error::Result;
use crate::layered::LayeredTree;
use crate::recursive::RecursiveTree;

/// A range tree whose layout is chosen at runtime.
pub enum RangeTree<C: Combine> {
    Recursive(RecursiveTree<C>),
    Layered(LayeredTree<C>),
}

/// Internal storage of a [`RangeTree`], as produced by [`RangeFold::snapshot`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Snapshot<T> {
    /// Heap levels, root first; empty arena slots are `None`.
    Nodes(Vec<Vec<Option<T>>>),
    /// Layers, root first; the last layer is the raw sequence.
    Layers(Vec<Vec<T>>),
}

macro_rules! dispatch {
    ($tree:expr, $inner:ident => $body:expr) => {
        match $tree {
            RangeTree::Recursive($inner) => $body,
            RangeTree::Layered($inner) => $body,
        }
    };
}

impl<C: Combine> RangeTree<C> {
    pub(crate) fn from_config(values: Vec<C::Value>, config: &TreeConfig) -> Result<Self> {
        let base = config.base_index;
        Ok(match config.strategy {
            Strategy::Recursive => Self::Recursive(RecursiveTree::build(values, base)?),
            Strategy::Layered => Self::Layered(LayeredTree::build(values, base)?),
        })
    }

    pub fn strategy(&self) -> Strategy {
        match self {
            Self::Recursive(_) => Strategy::Recursive,
            Self::Layered(_) => Strategy::Layered,
        }
    }
}

impl<C: Combine> RangeFold for RangeTree<C> {
    type Value = C::Value;
    type Snapshot = Snapshot<C::Value>;

    fn with_base(values: &[C::Value], base_index: isize) -> Result<Self> {
        TreeConfig::new().base_index(base_index).build(values)
    }

    fn len(&self) -> usize {
        dispatch!(self, tree => tree.len())
    }

    fn height(&self) -> usize {
        dispatch!(self, tree => tree.height())
    }

    fn base_index(&self) -> isize {
        dispatch!(self, tree => tree.base_index())
    }

    fn get(&self, index: isize) -> Result<&C::Value> {
        dispatch!(self, tree => tree.get(index))
    }

    fn query(&self, left: isize, right: isize) -> Result<C::Value> {
        dispatch!(self, tree => tree.query(left, right))
    }

    fn query_all(&self) -> C::Value {
        dispatch!(self, tree => tree.query_all())
    }

    fn update(&mut self, index: isize, value: C::Value) -> Result<()> {
        dispatch!(self, tree => tree.update(index, value))
    }

    fn snapshot(&self) -> Snapshot<C::Value> {
        match self {
            Self::Recursive(tree) => Snapshot::Nodes(tree.snapshot()),
            Self::Layered(tree) => Snapshot::Layers(tree.snapshot()),
        }
    }
}

impl<C: Combine> Clone for RangeTree<C> {
    fn clone(&self) -> Self {
        match self {
            Self::Recursive(tree) => Self::Recursive(tree.clone()),
            Self::Layered(tree) => Self::Layered(tree.clone()),
        }
    }
}

impl<C> fmt::Debug for RangeTree<C>
where
    C: Combine,
    C::Value: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        dispatch!(self, tree => fmt::Debug::fmt(tree, f))
    }
}

impl<C> fmt::Display for RangeTree<C>
where
    C: Combine,
    C::Value: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        dispatch!(self, tree => fmt::Display::fmt(tree, f))
    }
}

impl<C: Combine> From<RecursiveTree<C>> for RangeTree<C> {
    fn from(tree: RecursiveTree<C>) -> Self {
        Self::Recursive(tree)
    }
}

impl<C: Combine> From<LayeredTree<C>> for RangeTree<C> {
    fn from(tree: LayeredTree<C>) -> Self {
        Self::Layered(tree)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combine::{Max, Sum};

    #[test]
    fn default_strategy_is_recursive() {
        let tree = RangeTree::<Sum<i64>>::new(&[1, 2, 3]).unwrap();
        assert_eq!(tree.strategy(), Strategy::Recursive);
        assert_eq!(
            tree.snapshot(),
            Snapshot::Nodes(vec![
                vec![Some(6)],
                vec![Some(3), Some(3)],
                vec![Some(1), Some(2), None, None],
            ])
        );
    }

    #[test]
    fn layered_snapshot_through_selector() {
        let tree = TreeConfig::new()
            .strategy(Strategy::Layered)
            .build::<Max<i32>>(&[4, -1, 9])
            .unwrap();
        assert_eq!(tree.strategy(), Strategy::Layered);
        assert_eq!(
            tree.snapshot(),
            Snapshot::Layers(vec![vec![4, 9], vec![4, -1, 9]])
        );
        assert_eq!(tree.to_string(), "[4, 9]\n[4, -1, 9]");
    }

    #[test]
    fn wraps_concrete_trees() {
        let mut tree = RangeTree::from(LayeredTree::<Sum<i64>>::new(&[5, 5]).unwrap());
        tree.update(1, 7).unwrap();
        assert_eq!(tree.query_all(), 12);
        assert_eq!(tree.height(), 1);
    }
}
