//! Error types for `linsys-core`.

/// All errors returned by `linsys-core`.
#[derive(Debug, thiserror::Error)]
pub enum LinsysError {
    /// Operand shapes do not match the required layout.
    #[error("dimension mismatch: expected {expected:?}, got {got:?}")]
    DimensionMismatch {
        expected: Vec<usize>,
        got: Vec<usize>,
    },

    /// A routine that needs a square matrix received a rectangular one.
    #[error("matrix must be square, got {rows}x{cols}")]
    NotSquare { rows: usize, cols: usize },

    /// The product of a shape does not match the data length.
    #[error("invalid shape {shape:?}: {reason}")]
    InvalidShape {
        shape: Vec<usize>,
        reason: &'static str,
    },

    /// A multi-dimensional index is out of bounds.
    #[error("index {index:?} out of bounds for shape {shape:?}")]
    IndexOutOfBounds {
        index: Vec<usize>,
        shape: Vec<usize>,
    },

    /// Substitution reached an exactly zero pivot.
    #[error("singular matrix")]
    SingularMatrix,

    /// The operation is not supported for the given input.
    #[error("invalid argument: {reason}")]
    InvalidArgument { reason: &'static str },

    /// A report sink rejected a write.
    #[error("failed to write report")]
    Io(#[from] std::io::Error),
}

/// Convenience alias used throughout `linsys-core`.
pub type Result<T> = std::result::Result<T, LinsysError>;
