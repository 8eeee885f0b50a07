//! Growable contiguous storage for fixed-size elements.
//!
//! [`ByteVec`] stores elements whose size is a runtime parameter, fixed at
//! construction. Elements live back to back in a single owned allocation,
//! giving O(1) amortised append, O(1) random access and O(n) insertion and
//! removal in the middle. [`TypedVec`] layers a compile-time element type
//! over the same storage engine.
//!
//! # Architecture
//!
//! ```text
//! TypedVec<T>            (typed facade, T: Copy)
//! └── ByteVec            (count, element size, scratch cell)
//!     ├── search         (position / position_by / contains)
//!     ├── mutate         (append / insert / remove / remove_all)
//!     ├── ops            (equality, sort, apply)
//!     ├── growth         (overflow-checked doubling)
//!     ├── index          (element index <-> byte offset)
//!     └── RawBlock       (owned, aligned, zero-initialised bytes)
//! ```
//!
//! # Reference invalidation
//!
//! Every mutating method takes `&mut self`, so references returned by
//! [`ByteVec::get`] cannot be held across a mutation. Raw pointers obtained
//! from [`ByteVec::as_ptr`] are weak: growth, insertion, removal, sorting
//! and drop may move or overwrite the bytes behind them.
//!
//! The `*_from_ptr` mutators accept a source pointer that may point into
//! the vector itself. The source element is copied into a per-vector
//! scratch cell before any shift or reallocation, so the value written is
//! always the value the pointer denoted at call time.
//!
//! # Unsafe code
//!
//! Unsafe code is confined to `raw` (allocation and byte moves), the
//! pointer-taking mutators in `mutate`, and the slice casts in `typed`.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_code)]

#[macro_use]
mod logging;

pub mod config;
pub mod error;
mod growth;
mod index;
pub mod mutate;
pub mod ops;
mod raw;
pub mod search;
pub mod typed;
pub mod vector;

// Public re-exports for the primary API surface.
pub use config::{CapacityRounding, VecConfig};
pub use error::VecError;
pub use typed::TypedVec;
pub use vector::ByteVec;
