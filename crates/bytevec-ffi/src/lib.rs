//! C FFI bindings for the bytevec container.
//!
//! Vectors are owned by a process-wide handle table and addressed from C by
//! opaque `u64` handles, with `0` as the null handle. Every entry point
//! catches panics at the boundary and records a [`ByteVecStatus`] for the
//! calling thread, readable through [`bytevec_last_status`].
//!
//! Element pointers handed to C (by `bytevec_get` and to callbacks) are
//! weak references: they are valid until the next mutating call on the
//! same vector. Callbacks must not call back into this API for the vector
//! they were invoked on.
//!
//! The C header is generated into `include/bytevec.h` by the build script.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_code)]

/// Run `$body` with panics caught; a panic records
/// [`ByteVecStatus::Panicked`] and yields `$fallback`.
macro_rules! ffi_guard {
    ($fallback:expr, $body:block) => {
        match std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| $body)) {
            Ok(value) => value,
            Err(_) => {
                $crate::status::record($crate::status::ByteVecStatus::Panicked);
                $fallback
            }
        }
    };
}

/// Lock `$mutex`, or record [`ByteVecStatus::InternalError`] and return
/// `$fallback` from the enclosing function if it is poisoned.
macro_rules! ffi_lock {
    ($mutex:expr, $fallback:expr) => {
        match $mutex.lock() {
            Ok(guard) => guard,
            Err(_) => {
                $crate::status::record($crate::status::ByteVecStatus::InternalError);
                return $fallback;
            }
        }
    };
}

pub mod handle;
pub mod status;
pub mod vector;

pub use handle::NULL_HANDLE;
pub use status::{bytevec_last_status, ByteVecStatus};
pub use vector::*;
