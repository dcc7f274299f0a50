use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::combine::Combine;
use crate::error::Result;
use crate::tree::RangeTree;

/// Storage layout backing a [`RangeTree`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// Heap-indexed arena built by recursive halving.
    #[default]
    Recursive,
    /// One array per level, walked bottom-up.
    Layered,
}

impl Strategy {
    pub const ALL: [Strategy; 2] = [Strategy::Recursive, Strategy::Layered];

    pub fn name(self) -> &'static str {
        match self {
            Self::Recursive => "recursive",
            Self::Layered => "layered",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("unknown strategy {0:?} (expected \"recursive\" or \"layered\")")]
pub struct ParseStrategyError(String);

impl FromStr for Strategy {
    type Err = ParseStrategyError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|strategy| strategy.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseStrategyError(s.to_owned()))
    }
}

/// Construction parameters for [`RangeTree`].
///
/// ```
/// use range_tree::{RangeFold, Strategy, Sum, TreeConfig};
///
/// let tree = TreeConfig::new()
///     .base_index(1)
///     .strategy(Strategy::Layered)
///     .build::<Sum<i64>>(&[3, 1, 4, 1, 5])
///     .unwrap();
/// assert_eq!(tree.query(2, 4), Ok(6));
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TreeConfig {
    pub base_index: isize,
    pub strategy: Strategy,
}

impl TreeConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn base_index(mut self, base_index: isize) -> Self {
        self.base_index = base_index;
        self
    }

    pub fn strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn build<C: Combine>(&self, values: &[C::Value]) -> Result<RangeTree<C>> {
        RangeTree::from_config(values.to_vec(), self)
    }

    pub fn build_from_iter<C, I>(&self, iter: I) -> Result<RangeTree<C>>
    where
        C: Combine,
        I: IntoIterator<Item = C::Value>,
    {
        RangeTree::from_config(iter.into_iter().collect(), self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strategy_round_trips_through_text() {
        for strategy in Strategy::ALL {
            assert_eq!(strategy.to_string().parse::<Strategy>(), Ok(strategy));
        }
        assert_eq!(" Layered ".parse::<Strategy>(), Ok(Strategy::Layered));
        assert_eq!(
            "fenwick".parse::<Strategy>(),
            Err(ParseStrategyError("fenwick".to_owned()))
        );
    }

    #[test]
    fn defaults_match_zero_based_recursive_tree() {
        let config = TreeConfig::new();
        assert_eq!(config.base_index, 0);
        assert_eq!(config.strategy, Strategy::Recursive);
        assert_eq!(
            TreeConfig::new().base_index(-4).strategy(Strategy::Layered),
            TreeConfig {
                base_index: -4,
                strategy: Strategy::Layered
            }
        );
    }
}
