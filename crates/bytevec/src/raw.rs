//! Owned, aligned, zero-initialised byte storage.
//!
//! [`RawBlock`] is the only place the crate talks to the global allocator.
//! Every byte of the block is initialised (zeroed on allocation and on
//! growth), so any in-bounds range can be viewed as a byte slice and all
//! further manipulation goes through safe slice operations.

#![allow(unsafe_code)]

use std::alloc::{alloc_zeroed, dealloc, realloc, Layout};
use std::ops::Range;
use std::ptr::NonNull;

use crate::error::VecError;

/// An exclusively owned heap block of `capacity_bytes` bytes.
pub(crate) struct RawBlock {
    ptr: NonNull<u8>,
    capacity_bytes: usize,
    align: usize,
}

// SAFETY: the block is uniquely owned and has no interior mutability; it
// is as thread-safe as a `Box<[u8]>`.
unsafe impl Send for RawBlock {}
// SAFETY: shared access only hands out `&[u8]`.
unsafe impl Sync for RawBlock {}

fn layout(bytes: usize, align: usize) -> Result<Layout, VecError> {
    Layout::from_size_align(bytes, align).map_err(|_| VecError::CapacityOverflow {
        capacity: bytes,
        element_size: 1,
    })
}

impl RawBlock {
    /// Allocate a zeroed block of `bytes` bytes aligned to `align`.
    ///
    /// `bytes` must be non-zero and `align` a power of two; the vector
    /// validates both before calling.
    pub(crate) fn allocate(bytes: usize, align: usize) -> Result<Self, VecError> {
        debug_assert!(bytes > 0, "zero-sized block");
        let layout = layout(bytes, align)?;
        // SAFETY: layout has a non-zero size.
        let ptr = unsafe { alloc_zeroed(layout) };
        let ptr = NonNull::new(ptr).ok_or(VecError::AllocationFailed { bytes })?;
        Ok(Self {
            ptr,
            capacity_bytes: bytes,
            align,
        })
    }

    /// Grow the block in place or by relocation to `new_bytes` bytes.
    ///
    /// Existing contents are preserved and the new tail is zeroed. On
    /// failure the block is untouched. Pointers into the old block are
    /// invalid after success.
    pub(crate) fn grow(&mut self, new_bytes: usize) -> Result<(), VecError> {
        debug_assert!(new_bytes > self.capacity_bytes, "grow must enlarge");
        // Validates that new_bytes rounded up to align fits in isize.
        layout(new_bytes, self.align)?;
        let old_layout = layout(self.capacity_bytes, self.align)?;
        // SAFETY: ptr was allocated with old_layout by this allocator and
        // new_bytes is non-zero and forms a valid layout with align.
        let ptr = unsafe { realloc(self.ptr.as_ptr(), old_layout, new_bytes) };
        let ptr = NonNull::new(ptr).ok_or(VecError::AllocationFailed { bytes: new_bytes })?;
        let old_bytes = self.capacity_bytes;
        self.ptr = ptr;
        self.capacity_bytes = new_bytes;
        self.bytes_mut(old_bytes..new_bytes).fill(0);
        Ok(())
    }

    /// Size of the block in bytes.
    #[inline]
    pub(crate) fn capacity_bytes(&self) -> usize {
        self.capacity_bytes
    }

    /// Alignment of the block in bytes.
    #[inline]
    pub(crate) fn align(&self) -> usize {
        self.align
    }

    /// Pointer to the first byte. Valid until the next growth or drop.
    #[inline]
    pub(crate) fn as_ptr(&self) -> *const u8 {
        self.ptr.as_ptr()
    }

    /// Mutable pointer to the first byte. Valid until the next growth or drop.
    #[inline]
    pub(crate) fn as_mut_ptr(&mut self) -> *mut u8 {
        self.ptr.as_ptr()
    }

    /// View the whole block.
    #[inline]
    pub(crate) fn as_slice(&self) -> &[u8] {
        // SAFETY: ptr is valid for capacity_bytes initialised bytes and the
        // returned borrow is tied to &self.
        unsafe { std::slice::from_raw_parts(self.ptr.as_ptr(), self.capacity_bytes) }
    }

    /// View the whole block mutably.
    #[inline]
    pub(crate) fn as_mut_slice(&mut self) -> &mut [u8] {
        // SAFETY: as above, and &mut self guarantees exclusivity.
        unsafe { std::slice::from_raw_parts_mut(self.ptr.as_ptr(), self.capacity_bytes) }
    }

    /// View a byte range. Panics if the range exceeds the block.
    #[inline]
    pub(crate) fn bytes(&self, range: Range<usize>) -> &[u8] {
        &self.as_slice()[range]
    }

    /// View a byte range mutably. Panics if the range exceeds the block.
    #[inline]
    pub(crate) fn bytes_mut(&mut self, range: Range<usize>) -> &mut [u8] {
        &mut self.as_mut_slice()[range]
    }

    /// Swap two non-overlapping runs of `len` bytes starting at `a` and `b`.
    pub(crate) fn swap_runs(&mut self, a: usize, b: usize, len: usize) {
        if a == b {
            return;
        }
        let (lo, hi) = if a < b { (a, b) } else { (b, a) };
        debug_assert!(lo + len <= hi, "overlapping swap");
        let (head, tail) = self.as_mut_slice().split_at_mut(hi);
        head[lo..lo + len].swap_with_slice(&mut tail[..len]);
    }
}

impl Drop for RawBlock {
    fn drop(&mut self) {
        // The layout was valid at allocation or last growth.
        if let Ok(layout) = layout(self.capacity_bytes, self.align) {
            // SAFETY: ptr was allocated by this allocator with this layout.
            unsafe { dealloc(self.ptr.as_ptr(), layout) };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocation_is_zeroed_and_aligned() {
        let block = RawBlock::allocate(64, 16).unwrap();
        assert_eq!(block.capacity_bytes(), 64);
        assert_eq!(block.as_ptr() as usize % 16, 0);
        assert!(block.as_slice().iter().all(|&b| b == 0));
    }

    #[test]
    fn grow_preserves_contents_and_zeroes_tail() {
        let mut block = RawBlock::allocate(4, 8).unwrap();
        block.as_mut_slice().copy_from_slice(&[1, 2, 3, 4]);
        block.grow(12).unwrap();
        assert_eq!(block.capacity_bytes(), 12);
        assert_eq!(block.as_slice(), &[1, 2, 3, 4, 0, 0, 0, 0, 0, 0, 0, 0]);
        assert_eq!(block.as_ptr() as usize % 8, 0);
    }

    #[test]
    fn swap_runs_exchanges_bytes() {
        let mut block = RawBlock::allocate(6, 1).unwrap();
        block.as_mut_slice().copy_from_slice(&[1, 2, 3, 4, 5, 6]);
        block.swap_runs(4, 0, 2);
        assert_eq!(block.as_slice(), &[5, 6, 3, 4, 1, 2]);
        block.swap_runs(2, 2, 2);
        assert_eq!(block.as_slice(), &[5, 6, 3, 4, 1, 2]);
    }

    #[test]
    fn oversized_layout_is_overflow() {
        assert!(matches!(
            RawBlock::allocate(isize::MAX as usize, 16),
            Err(VecError::CapacityOverflow { .. })
        ));
    }

    #[test]
    fn unsatisfiable_allocation_reports_failure() {
        // A valid layout no allocator can back.
        let bytes = isize::MAX as usize - 15;
        assert_eq!(
            RawBlock::allocate(bytes, 16).err(),
            Some(VecError::AllocationFailed { bytes })
        );
    }
}
