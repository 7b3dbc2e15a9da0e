//! Error types for simdblur operations.
//!
//! Every failure is a programmer error detected at the call boundary
//! (bad sigma, mismatched buffers, allocation failure), so the blur entry
//! points return these instead of writing partial output.

use std::fmt;
use std::io;

/// Errors that can occur while building buffers and kernels or running a blur.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlurError {
    /// A numeric parameter is outside its valid domain.
    InvalidParameter {
        /// Name of the offending parameter.
        parameter: &'static str,
        /// Human-readable error message.
        message: String,
    },
    /// Input and output buffers do not have the same dimensions.
    DimensionMismatch {
        /// `(width, height)` of the input buffer.
        input: (usize, usize),
        /// `(width, height)` of the output buffer.
        output: (usize, usize),
    },
    /// Memory allocation failed.
    AllocationError {
        /// The size that was requested to be allocated.
        requested_size: usize,
        /// The alignment that was requested.
        requested_alignment: usize,
        /// Human-readable error message.
        message: String,
    },
    /// Invalid layout parameters were provided.
    LayoutError {
        /// The size parameter that caused the error.
        size: usize,
        /// The alignment parameter that caused the error.
        alignment: usize,
        /// Human-readable error message.
        message: String,
    },
    /// Writing an image to disk failed.
    Io {
        /// Kind reported by the operating system.
        kind: io::ErrorKind,
        /// Human-readable error message.
        message: String,
    },
}

impl fmt::Display for BlurError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlurError::InvalidParameter { parameter, message } => {
                write!(f, "Invalid parameter `{parameter}`: {message}")
            }
            BlurError::DimensionMismatch { input, output } => write!(
                f,
                "Dimension mismatch: input is {}x{} but output is {}x{}",
                input.0, input.1, output.0, output.1
            ),
            BlurError::AllocationError {
                requested_size,
                requested_alignment,
                message,
            } => write!(
                f,
                "Memory allocation failed: {message} (requested {requested_size} bytes with {requested_alignment} byte alignment)"
            ),
            BlurError::LayoutError {
                size,
                alignment,
                message,
            } => write!(
                f,
                "Invalid memory layout: {message} (size: {size}, alignment: {alignment})"
            ),
            BlurError::Io { kind, message } => write!(f, "I/O error ({kind:?}): {message}"),
        }
    }
}

impl std::error::Error for BlurError {}

impl From<io::Error> for BlurError {
    fn from(error: io::Error) -> Self {
        BlurError::Io {
            kind: error.kind(),
            message: error.to_string(),
        }
    }
}

/// Result type alias for simdblur operations.
pub type Result<T> = std::result::Result<T, BlurError>;

/// Creates an invalid parameter error.
pub fn invalid_parameter(parameter: &'static str, message: impl Into<String>) -> BlurError {
    BlurError::InvalidParameter {
        parameter,
        message: message.into(),
    }
}

/// Creates a dimension mismatch error from `(width, height)` pairs.
pub fn dimension_mismatch(input: (usize, usize), output: (usize, usize)) -> BlurError {
    BlurError::DimensionMismatch { input, output }
}

/// Creates an allocation error.
pub fn allocation_error(size: usize, alignment: usize, message: impl Into<String>) -> BlurError {
    BlurError::AllocationError {
        requested_size: size,
        requested_alignment: alignment,
        message: message.into(),
    }
}

/// Creates a layout error.
pub fn layout_error(size: usize, alignment: usize, message: impl Into<String>) -> BlurError {
    BlurError::LayoutError {
        size,
        alignment,
        message: message.into(),
    }
}
