//! Error types for the tempest-array crate.

/// Error type for all fallible operations in the tempest-array crate.
///
/// Alignment failures between two operands (size or coordinate mismatch on a
/// shared dimension) are reported eagerly; no partial result is produced.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ArrayError {
    /// Returned when the number of dimension names differs from the data rank.
    #[error("{dims} dimension name(s) given for data of rank {ndim}")]
    DimensionCountMismatch {
        /// Number of dimension names provided.
        dims: usize,
        /// Rank of the data.
        ndim: usize,
    },

    /// Returned when a dimension name appears more than once.
    #[error("duplicate dimension '{dim}'")]
    DuplicateDimension {
        /// The repeated dimension name.
        dim: String,
    },

    /// Returned when a named dimension does not exist on the array.
    #[error("unknown dimension '{dim}'")]
    UnknownDimension {
        /// The missing dimension name.
        dim: String,
    },

    /// Returned when two operands disagree on the length of a shared dimension.
    #[error("dimension '{dim}' has length {left} on the left operand but {right} on the right")]
    SizeMismatch {
        /// The shared dimension name.
        dim: String,
        /// Length on the left operand.
        left: usize,
        /// Length on the right operand.
        right: usize,
    },

    /// Returned when two operands carry different coordinates for a shared dimension.
    #[error("coordinates of dimension '{dim}' do not match")]
    CoordinateMismatch {
        /// The shared dimension name.
        dim: String,
    },

    /// Returned when a coordinate's length differs from its dimension's length.
    #[error("coordinate for dimension '{dim}' has length {got}, expected {expected}")]
    CoordinateLength {
        /// The dimension the coordinate was attached to.
        dim: String,
        /// Length of the dimension.
        expected: usize,
        /// Length of the coordinate.
        got: usize,
    },

    /// Returned when an operand has a dimension the broadcast target lacks.
    #[error("dimension '{dim}' cannot be broadcast onto the target dimensions")]
    NotBroadcastable {
        /// The dimension with no counterpart in the target.
        dim: String,
    },

    /// Returned when a validity mask carries a dimension absent from its data.
    #[error("mask dimension '{dim}' is not a dimension of the masked data")]
    MaskNotBroadcastable {
        /// The offending mask dimension.
        dim: String,
    },

    /// Returned when arrays passed to a stack do not share the same dimensions.
    #[error("cannot stack along '{dim}': arrays have differing dimensions")]
    StackMismatch {
        /// The new dimension being stacked along.
        dim: String,
    },

    /// Returned when a stack is requested over zero arrays.
    #[error("cannot stack an empty list of arrays")]
    EmptyStack,

    /// Returned when the underlying ndarray operation rejects a shape.
    #[error("shape error: {reason}")]
    Shape {
        /// Description from the array backend.
        reason: String,
    },
}

impl From<ndarray::ShapeError> for ArrayError {
    fn from(err: ndarray::ShapeError) -> Self {
        Self::Shape {
            reason: err.to_string(),
        }
    }
}
