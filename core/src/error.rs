//! Core error types.

use thiserror::Error;

use crate::transform::MatrixMode;

/// Errors raised by core data structures.
///
/// These indicate caller bugs (reading past a buffer, unbalanced push/pop,
/// degenerate transforms) and are always returned rather than recovered.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// A buffer read past its logical length.
    #[error("index {index} out of range for buffer of length {len}")]
    OutOfRange { index: usize, len: usize },
    /// A pop would have removed the identity sentinel.
    #[error("cannot pop the {mode:?} matrix stack below its identity sentinel")]
    StackUnderflow { mode: MatrixMode },
    /// The model-view matrix has no inverse.
    #[error("model-view matrix is singular, normal matrix is undefined")]
    SingularMatrix,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CoreError::OutOfRange { index: 9, len: 3 };
        assert_eq!(
            err.to_string(),
            "index 9 out of range for buffer of length 3"
        );

        let err = CoreError::StackUnderflow {
            mode: MatrixMode::Projection,
        };
        assert!(err.to_string().contains("Projection"));
    }
}
