mod combine;
mod config;
mod error;
mod layered;
mod recursive;
mod tree;
mod util;

pub use combine::{Combine, Concat, Max, Min, Sum};
pub use config::{ParseStrategyError, Strategy, TreeConfig};
pub use error::{RangeTreeError, Result};
pub use layered::LayeredTree;
pub use recursive::RecursiveTree;
pub use tree::{RangeTree, Snapshot};

/// Point-update, range-fold interface shared by every tree layout.
///
/// - Positions are external: raw offset `p` is addressed as `base_index() + p`.
/// - Query ranges are inclusive: `[left, right]`.
/// - Folds run left to right and never call `combine` on absent operands, so the
///   combining policy needs associativity but neither commutativity nor an identity.
/// - The sequence length is fixed at construction and must be non-zero.
pub trait RangeFold: Sized {
    type Value: Clone;
    type Snapshot;

    /// Copies `values` into a new tree whose first position is `base_index`.
    fn with_base(values: &[Self::Value], base_index: isize) -> Result<Self>;

    fn new(values: &[Self::Value]) -> Result<Self> {
        Self::with_base(values, 0)
    }

    fn len(&self) -> usize;

    #[inline(always)]
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Smallest `h >= 1` with `2^h >= len()`.
    fn height(&self) -> usize;

    fn base_index(&self) -> isize;

    fn get(&self, index: isize) -> Result<&Self::Value>;

    fn query(&self, left: isize, right: isize) -> Result<Self::Value>;

    /// Fold of the whole sequence.
    fn query_all(&self) -> Self::Value;

    fn update(&mut self, index: isize, value: Self::Value) -> Result<()>;

    /// Owned copy of the internal storage, for inspection and comparison.
    fn snapshot(&self) -> Self::Snapshot;
}
