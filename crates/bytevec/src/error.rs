//! Container error types.
//!
//! All errors are recoverable: an operation that returns `Err` leaves the
//! vector exactly as it was before the call.

use std::error::Error;
use std::fmt;

/// Errors that can occur during vector operations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum VecError {
    /// A minimum capacity of zero was requested.
    ZeroCapacity,
    /// An element size of zero was requested.
    ZeroElementSize,
    /// The requested alignment is zero or not a power of two.
    InvalidAlignment {
        /// The rejected alignment.
        align: usize,
    },
    /// The size of a caller-supplied item differs from the vector's
    /// element size.
    ElementSizeMismatch {
        /// The vector's element size.
        expected: usize,
        /// The size the caller supplied.
        actual: usize,
    },
    /// An element index is outside the valid range for the operation.
    IndexOutOfBounds {
        /// The rejected index.
        index: usize,
        /// The element count at the time of the call.
        count: usize,
    },
    /// A caller-supplied pointer was null.
    NullPointer,
    /// The operation requires at least one element.
    Empty,
    /// Element-count or byte-count arithmetic would overflow.
    CapacityOverflow {
        /// Element capacity that was being computed.
        capacity: usize,
        /// Element size in bytes.
        element_size: usize,
    },
    /// The allocator could not satisfy a request.
    AllocationFailed {
        /// Number of bytes requested.
        bytes: usize,
    },
}

impl fmt::Display for VecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroCapacity => write!(f, "minimum capacity must be non-zero"),
            Self::ZeroElementSize => write!(f, "element size must be non-zero"),
            Self::InvalidAlignment { align } => {
                write!(f, "alignment {align} is not a non-zero power of two")
            }
            Self::ElementSizeMismatch { expected, actual } => {
                write!(
                    f,
                    "element size mismatch: vector holds {expected}-byte elements, got {actual} bytes"
                )
            }
            Self::IndexOutOfBounds { index, count } => {
                write!(f, "index {index} out of bounds for {count} elements")
            }
            Self::NullPointer => write!(f, "null pointer"),
            Self::Empty => write!(f, "vector is empty"),
            Self::CapacityOverflow {
                capacity,
                element_size,
            } => {
                write!(
                    f,
                    "capacity overflow: {capacity} elements of {element_size} bytes"
                )
            }
            Self::AllocationFailed { bytes } => {
                write!(f, "allocation of {bytes} bytes failed")
            }
        }
    }
}

impl Error for VecError {}
