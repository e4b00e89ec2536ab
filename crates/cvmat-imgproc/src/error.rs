use cvmat_core::MatError;

/// An error type for the image processing and calibration operations.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ImgprocError {
    /// Error coming from an input or output mat.
    #[error(transparent)]
    MatError(#[from] MatError),

    /// Text passed to a text operation contains an interior NUL byte.
    #[error("Text contains a NUL byte at position {0}")]
    InvalidText(usize),

    /// The native library reported a failure.
    #[error("Backend failed in {operation}: {message}")]
    Backend {
        /// Name of the operation that failed
        operation: String,
        /// Message reported by the backend
        message: String,
    },
}

impl ImgprocError {
    /// Creates a Backend error with context.
    pub fn backend(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Backend {
            operation: operation.into(),
            message: message.into(),
        }
    }
}

impl From<std::ffi::NulError> for ImgprocError {
    fn from(err: std::ffi::NulError) -> Self {
        Self::InvalidText(err.nul_position())
    }
}
