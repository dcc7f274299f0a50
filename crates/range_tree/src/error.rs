use thiserror::Error;

/// Errors reported by range tree construction, queries and updates.
///
/// Positions are external: they already include the tree's base index.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum RangeTreeError {
    /// Construction was attempted on an empty sequence.
    #[error("cannot build a range tree from an empty sequence")]
    EmptyInput,

    /// The last element's position `base_index + len - 1` does not fit in an `isize`.
    #[error("base index {base_index} cannot address {len} elements")]
    BaseIndexOverflow { base_index: isize, len: usize },

    /// Query range is reversed or reaches outside `[first, last]`.
    #[error("invalid range [{left}, {right}] (valid positions are {first}..={last})")]
    InvalidRange {
        left: isize,
        right: isize,
        first: isize,
        last: isize,
    },

    /// Element access or update outside `[first, last]`.
    #[error("index {index} out of range (valid positions are {first}..={last})")]
    IndexOutOfRange {
        index: isize,
        first: isize,
        last: isize,
    },
}

pub type Result<T, E = RangeTreeError> = std::result::Result<T, E>;
