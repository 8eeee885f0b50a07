//! Conversion between element indices and byte offsets.
//!
//! An external index counts elements as callers see them; an internal
//! offset is the position of an element's first byte in the buffer.
//!
//! ```text
//! [a][a][b][b][c][c][ ][ ]
//!  0     1     2     3     external
//!  0  1  2  3  4  5  6  7  internal
//! ```
//!
//! Callers only convert indices already bounded by the capacity, whose
//! byte size was overflow-checked when the buffer was sized.

/// Byte offset of the element at `index`.
#[inline]
pub(crate) fn to_internal(index: usize, element_size: usize) -> usize {
    index * element_size
}

/// Element index of the element starting at byte `offset`.
#[inline]
pub(crate) fn to_external(offset: usize, element_size: usize) -> usize {
    offset / element_size
}
