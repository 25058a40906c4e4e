//! Error types for Chebyshev fitting.

use thiserror::Error;

/// Errors that can occur while building a [`super::ChebyshevFit`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("Insignificant Chebyshev fit interval: |x2 - x1| vanishes at working precision")]
    InsignificantInterval,

    #[error("Function returned {actual} components at node {node}, expected {expected}")]
    ComponentCountMismatch {
        node: usize,
        expected: usize,
        actual: usize,
    },

    #[error("Chebyshev series set has no components")]
    EmptySeries,

    #[error(
        "Invalid Chebyshev series for component {component}: {length} coefficients (need at least 2, all components equal)"
    )]
    InvalidSeriesLength { component: usize, length: usize },
}
