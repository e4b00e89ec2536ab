use thiserror::Error;

use crate::{allocator::MatAllocatorError, mat_type::Depth};

/// Error type for [`crate::Mat`] construction, access and conversion.
#[derive(Error, Debug, PartialEq)]
pub enum MatError {
    /// A mat was requested over a zero-length byte buffer.
    ///
    /// Wrapping caller bytes never silently falls back to an empty allocation.
    #[error("empty byte array")]
    EmptyInput,

    /// The operation needs continuous storage but the mat has row padding.
    ///
    /// This is the case for regions narrower than their parent. Copy the mat
    /// with [`crate::Mat::clone`] or use [`crate::Mat::to_bytes`] instead.
    #[error("operation requires a continuous Mat")]
    NotContinuous,

    /// An element accessor was used with a depth that does not match the mat type.
    #[error("Type mismatch: accessor expects {expected:?} but the mat depth is {actual:?}")]
    TypeMismatch {
        /// Depth expected by the accessor
        expected: Depth,
        /// Depth of the mat
        actual: Depth,
    },

    /// Index exceeds the mat or collection bounds.
    #[error("Index {index} out of bounds for dimension of size {size}")]
    IndexOutOfBounds {
        /// The invalid index that was attempted
        index: usize,
        /// The size of the dimension being indexed
        size: usize,
    },

    /// Buffer length does not match the requested shape and type.
    #[error("Shape mismatch: expected {expected} bytes for shape, but got {actual} bytes in data")]
    InvalidShape {
        /// Expected number of bytes based on shape and type
        expected: usize,
        /// Actual number of bytes supplied
        actual: usize,
    },

    /// A raw type code that does not name a depth/channel combination.
    #[error("Invalid mat type code {0}")]
    InvalidMatType(i32),

    /// The region rectangle is empty or does not fit inside the parent mat.
    #[error("Region ({x}, {y}, {width}x{height}) is outside of a {cols}x{rows} mat")]
    RegionOutOfBounds {
        /// Region origin column
        x: i32,
        /// Region origin row
        y: i32,
        /// Region width
        width: i32,
        /// Region height
        height: i32,
        /// Parent columns
        cols: usize,
        /// Parent rows
        rows: usize,
    },

    /// The byte size of a shape does not fit in `usize`.
    #[error("Shape {0:?} overflows the addressable size")]
    ShapeOverflow(Vec<usize>),

    /// A length or extent does not fit the native library's `int`.
    #[error("Length {0} exceeds the native int range")]
    LengthOverflow(usize),

    /// Operation not supported for this mat configuration.
    #[error("Unsupported operation: {operation} - {reason}")]
    UnsupportedOperation {
        /// Name of the operation that failed
        operation: String,
        /// Reason why the operation is not supported
        reason: String,
    },

    /// Underlying storage allocation failed.
    #[error("Storage error: {0}")]
    StorageError(#[from] MatAllocatorError),
}

impl MatError {
    /// Creates an IndexOutOfBounds error.
    pub fn index_out_of_bounds(index: usize, size: usize) -> Self {
        Self::IndexOutOfBounds { index, size }
    }

    /// Creates an UnsupportedOperation error with context.
    pub fn unsupported_operation(operation: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::UnsupportedOperation {
            operation: operation.into(),
            reason: reason.into(),
        }
    }
}
