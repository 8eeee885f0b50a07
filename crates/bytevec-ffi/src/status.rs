//! C-compatible status codes and the per-thread last-status slot.
//!
//! Most entry points return a bool, an index sentinel or a null pointer,
//! none of which can say *why* a call failed. Each entry point therefore
//! records a [`ByteVecStatus`] for the calling thread before returning,
//! and `bytevec_last_status` reads it back.

use std::cell::Cell;

use bytevec::VecError;

/// C-compatible status code.
///
/// `Ok` = 0, all errors are negative. Values are ABI-stable.
#[repr(i32)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ByteVecStatus {
    /// Success.
    Ok = 0,
    /// Handle is null, invalid or was already destroyed.
    InvalidHandle = -1,
    /// A pointer or callback is null, or a constructor argument is zero.
    InvalidArgument = -2,
    /// Item size differs from the vector's element size.
    SizeMismatch = -3,
    /// Index outside the valid range for the operation.
    IndexOutOfBounds = -4,
    /// Operation requires a non-empty vector.
    Empty = -5,
    /// Element-count or byte-count arithmetic would overflow.
    Overflow = -6,
    /// The allocator could not satisfy a request.
    AllocationFailed = -7,
    /// Internal error (e.g. poisoned mutex after a prior panic).
    InternalError = -20,
    /// A Rust panic was caught at the FFI boundary.
    Panicked = -128,
}

impl From<&VecError> for ByteVecStatus {
    fn from(e: &VecError) -> Self {
        match e {
            VecError::ZeroCapacity
            | VecError::ZeroElementSize
            | VecError::InvalidAlignment { .. }
            | VecError::NullPointer => ByteVecStatus::InvalidArgument,
            VecError::ElementSizeMismatch { .. } => ByteVecStatus::SizeMismatch,
            VecError::IndexOutOfBounds { .. } => ByteVecStatus::IndexOutOfBounds,
            VecError::Empty => ByteVecStatus::Empty,
            VecError::CapacityOverflow { .. } => ByteVecStatus::Overflow,
            VecError::AllocationFailed { .. } => ByteVecStatus::AllocationFailed,
        }
    }
}

thread_local! {
    static LAST_STATUS: Cell<ByteVecStatus> = const { Cell::new(ByteVecStatus::Ok) };
}

/// Record the outcome of the current call for this thread.
pub(crate) fn record(status: ByteVecStatus) {
    LAST_STATUS.with(|s| s.set(status));
}

/// Record `result`'s error, if any, and convert it to an `Option`.
pub(crate) fn report<T>(result: Result<T, VecError>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            record(ByteVecStatus::from(&e));
            None
        }
    }
}

/// Status of the most recent `bytevec_*` call made on this thread.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn bytevec_last_status() -> i32 {
    LAST_STATUS.with(|s| s.get()) as i32
}
