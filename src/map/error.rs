//! Structural invariant violations.
//!
//! None of the container operations fail. These errors are only produced by
//! the `check_invariants` diagnostics of [`OrderedMap`](super::OrderedMap)
//! and `SparseGrid`, which walk the whole structure and report the first
//! broken invariant they find.

/// A broken structural invariant.
///
/// Node positions are zero-based indices in in-order (ascending key) order.
///
/// # Examples
///
/// ```rust
/// use sparse_raster::map::InvariantViolation;
///
/// let error = InvariantViolation::Unbalanced {
///     position: 3,
///     balance_factor: 2,
/// };
/// assert_eq!(
///     format!("{error}"),
///     "node at position 3 is unbalanced (balance factor 2)"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvariantViolation {
    /// A key is not strictly greater than its in-order predecessor.
    OutOfOrder {
        /// In-order position of the offending node.
        position: usize,
    },
    /// A node's balance factor is outside `-1..=1`.
    Unbalanced {
        /// In-order position of the offending node.
        position: usize,
        /// Height of the left subtree minus height of the right subtree.
        balance_factor: i32,
    },
    /// A node's cached height disagrees with its children.
    StaleHeight {
        /// In-order position of the offending node.
        position: usize,
        /// Height stored in the node.
        cached: i32,
        /// Height recomputed from the children.
        actual: i32,
    },
    /// A node's parent handle does not point at the node that links to it.
    BrokenParentLink {
        /// In-order position of the offending node.
        position: usize,
    },
    /// The recorded entry count disagrees with the number of reachable entries.
    LengthMismatch {
        /// Count recorded by the container.
        expected: usize,
        /// Count found by walking the structure.
        actual: usize,
    },
    /// A grid column exists but holds no cells.
    EmptyColumn {
        /// The x-coordinate of the empty column.
        x: i32,
    },
}

impl std::fmt::Display for InvariantViolation {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OutOfOrder { position } => {
                write!(formatter, "node at position {position} is out of order")
            }
            Self::Unbalanced {
                position,
                balance_factor,
            } => write!(
                formatter,
                "node at position {position} is unbalanced (balance factor {balance_factor})"
            ),
            Self::StaleHeight {
                position,
                cached,
                actual,
            } => write!(
                formatter,
                "node at position {position} caches height {cached} but has height {actual}"
            ),
            Self::BrokenParentLink { position } => {
                write!(formatter, "node at position {position} has a broken parent link")
            }
            Self::LengthMismatch { expected, actual } => write!(
                formatter,
                "recorded length {expected} but found {actual} entries"
            ),
            Self::EmptyColumn { x } => write!(formatter, "column x={x} is empty"),
        }
    }
}

impl std::error::Error for InvariantViolation {}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(InvariantViolation::OutOfOrder { position: 0 }, "node at position 0 is out of order")]
    #[case(
        InvariantViolation::StaleHeight { position: 1, cached: 0, actual: 2 },
        "node at position 1 caches height 0 but has height 2"
    )]
    #[case(
        InvariantViolation::BrokenParentLink { position: 4 },
        "node at position 4 has a broken parent link"
    )]
    #[case(
        InvariantViolation::LengthMismatch { expected: 3, actual: 2 },
        "recorded length 3 but found 2 entries"
    )]
    #[case(InvariantViolation::EmptyColumn { x: -7 }, "column x=-7 is empty")]
    fn test_display(#[case] error: InvariantViolation, #[case] expected: &str) {
        assert_eq!(error.to_string(), expected);
    }

    #[rstest]
    fn test_is_std_error() {
        let error: Box<dyn std::error::Error> =
            Box::new(InvariantViolation::OutOfOrder { position: 2 });
        assert!(error.source().is_none());
    }
}
