//! Mutators: append, insert, remove and bulk removal.
//!
//! Every mutator either succeeds or leaves the vector untouched. All of
//! them may shift elements, and `append`/`insert` may relocate the buffer,
//! so raw pointers previously obtained from the vector must be treated as
//! invalid afterwards.
//!
//! # Aliasing
//!
//! The slice-taking mutators cannot be handed a view of the vector they
//! mutate; the borrow checker rejects it. Callers that hold a raw pointer,
//! possibly into the same vector, use the `*_from_ptr` variants. Those copy
//! the source element into the vector's scratch cell before any shift or
//! reallocation happens and write from there, so the value stored is the
//! one the pointer denoted when the call began:
//!
//! ```text
//! [9][8][7][6][5]   insert_from_ptr(1, &v[0])
//!  └─ staged: 9
//! [9][ ][8][7][6][5]  gap opened (buffer may have moved)
//! [9][9][8][7][6][5]  staged value written
//! ```

#![allow(unsafe_code)]

use std::ptr;

use crate::error::VecError;
use crate::index::{to_external, to_internal};
use crate::vector::ByteVec;

impl ByteVec {
    /// Append `item` after the last element, growing if the vector is full.
    ///
    /// Fails if `item.len()` differs from the element size, if the count
    /// would overflow, or if growth fails. Raw element pointers obtained
    /// before the call are invalid after it.
    pub fn append(&mut self, item: &[u8]) -> Result<(), VecError> {
        self.check_item_size(item.len())?;
        let index = self.count;
        let slot = self.open_slot(index)?;
        // SAFETY: slot is valid for element_size bytes and item, borrowed
        // apart from &mut self, cannot overlap it.
        unsafe { ptr::copy_nonoverlapping(item.as_ptr(), slot, item.len()) };
        Ok(())
    }

    /// Insert `item` at `index`, shifting `[index, len())` one slot right.
    ///
    /// `index == len()` appends. Fails if `index > len()`, if the sizes
    /// differ, if the count would overflow, or if growth fails. Raw element
    /// pointers obtained before the call are invalid after it.
    pub fn insert(&mut self, index: usize, item: &[u8]) -> Result<(), VecError> {
        self.check_item_size(item.len())?;
        let slot = self.open_slot(index)?;
        // SAFETY: as in append.
        unsafe { ptr::copy_nonoverlapping(item.as_ptr(), slot, item.len()) };
        Ok(())
    }

    /// Open a gap at `index`, count it as occupied and return a pointer to
    /// it for the caller to fill.
    ///
    /// The slot is `element_size` bytes, aligned like the element at
    /// `index`, and holds stale bytes until written. The pointer is valid
    /// until the next call that takes `&self` or `&mut self`.
    pub(crate) fn open_slot(&mut self, index: usize) -> Result<*mut u8, VecError> {
        if index > self.count {
            return Err(VecError::IndexOutOfBounds {
                index,
                count: self.count,
            });
        }
        let new_count = self.reserve_one()?;
        let size = self.element_size;
        let start = to_internal(index, size);
        let end = self.len_bytes();
        self.block
            .as_mut_slice()
            .copy_within(start..end, start + size);
        self.count = new_count;
        // SAFETY: start + size <= len_bytes() <= capacity_bytes().
        Ok(unsafe { self.as_mut_ptr().add(start) })
    }

    /// Remove the element at `index`, closing the gap.
    ///
    /// The vacated trailing slot is zeroed. Returns the index of the
    /// element that now occupies the removed slot, which equals `len()`
    /// when the last element was removed. Raw pointers to elements at or
    /// after `index` no longer denote the same values.
    pub fn remove(&mut self, index: usize) -> Result<usize, VecError> {
        if index >= self.count {
            return Err(VecError::IndexOutOfBounds {
                index,
                count: self.count,
            });
        }
        let size = self.element_size;
        let start = to_internal(index, size);
        let end = self.len_bytes();
        self.block
            .as_mut_slice()
            .copy_within(start + size..end, start);
        self.block.bytes_mut(end - size..end).fill(0);
        self.count -= 1;
        Ok(index)
    }

    /// Remove every element whose bytes equal `item`.
    ///
    /// Returns the number of elements removed. Fails only on a size
    /// mismatch. See [`search`](crate::search) for when byte equality is
    /// not appropriate. Survivors may move, so raw element pointers are
    /// invalid after the call.
    pub fn remove_all(&mut self, item: &[u8]) -> Result<usize, VecError> {
        self.check_item_size(item.len())?;
        Ok(self.remove_all_by(|element| element == item))
    }

    /// Remove every element satisfying `predicate`, preserving the order of
    /// the survivors.
    ///
    /// Single pass erase-remove: survivors are swapped down to a write
    /// cursor, removed elements collect behind it, and the tail is then
    /// truncated and zeroed. At most one swap per survivor. Raw element
    /// pointers are invalid after the call.
    pub fn remove_all_by<F>(&mut self, mut predicate: F) -> usize
    where
        F: FnMut(&[u8]) -> bool,
    {
        let size = self.element_size;
        // SAFETY: remove_all_where hands out pointers to live elements.
        self.remove_all_where(|element| {
            predicate(unsafe { std::slice::from_raw_parts(element, size) })
        })
    }

    /// [`remove_all_by`](Self::remove_all_by) with the predicate given a
    /// pointer to the element instead of a byte view.
    ///
    /// The pointer is valid for `element_size` bytes until the predicate
    /// returns. When the predicate sees element `i`, no element at or after
    /// `i` has moved yet.
    pub(crate) fn remove_all_where<F>(&mut self, mut predicate: F) -> usize
    where
        F: FnMut(*const u8) -> bool,
    {
        let size = self.element_size;
        let end = self.len_bytes();
        let mut kept_end = 0;

        for offset in (0..end).step_by(size) {
            // SAFETY: offset + size <= len_bytes() <= capacity_bytes().
            let element = unsafe { self.block.as_ptr().add(offset) };
            if predicate(element) {
                continue;
            }
            if offset > kept_end {
                self.block.swap_runs(offset, kept_end, size);
            }
            kept_end += size;
        }

        let kept = to_external(kept_end, size);
        let removed = self.count - kept;
        self.block.bytes_mut(kept_end..end).fill(0);
        self.count = kept;
        removed
    }

    /// Append the `item_size` bytes at `item`.
    ///
    /// Raw element pointers, `item` included, are invalid after the call.
    ///
    /// # Safety
    ///
    /// `item` must be null or valid for reads of `item_size` bytes. It may
    /// point into this vector's own buffer.
    pub unsafe fn append_from_ptr(
        &mut self,
        item: *const u8,
        item_size: usize,
    ) -> Result<(), VecError> {
        // SAFETY: forwarded caller contract.
        unsafe { self.with_staged(item, item_size, |v, staged| v.append(staged)) }
    }

    /// Insert the `item_size` bytes at `item` at position `index`.
    ///
    /// The value written is the one `item` denoted at the time of the call,
    /// even when `item` points at an element this call shifts or relocates.
    /// Raw element pointers, `item` included, are invalid after the call.
    ///
    /// # Safety
    ///
    /// `item` must be null or valid for reads of `item_size` bytes. It may
    /// point into this vector's own buffer.
    pub unsafe fn insert_from_ptr(
        &mut self,
        index: usize,
        item: *const u8,
        item_size: usize,
    ) -> Result<(), VecError> {
        // SAFETY: forwarded caller contract.
        unsafe { self.with_staged(item, item_size, |v, staged| v.insert(index, staged)) }
    }

    /// Remove every element equal to the `item_size` bytes at `item`.
    ///
    /// The match target is captured before compaction starts, so a target
    /// inside the vector keeps matching its original value while the
    /// elements around it are swapped. Raw element pointers are invalid
    /// after the call.
    ///
    /// # Safety
    ///
    /// `item` must be null or valid for reads of `item_size` bytes. It may
    /// point into this vector's own buffer.
    pub unsafe fn remove_all_from_ptr(
        &mut self,
        item: *const u8,
        item_size: usize,
    ) -> Result<usize, VecError> {
        // SAFETY: forwarded caller contract.
        unsafe { self.with_staged(item, item_size, |v, staged| v.remove_all(staged)) }
    }

    /// Copy the source element into the scratch cell and run `op` on it.
    ///
    /// # Safety
    ///
    /// `item` must be null or valid for reads of `item_size` bytes.
    unsafe fn with_staged<R, F>(
        &mut self,
        item: *const u8,
        item_size: usize,
        op: F,
    ) -> Result<R, VecError>
    where
        F: FnOnce(&mut Self, &[u8]) -> Result<R, VecError>,
    {
        self.check_item_size(item_size)?;
        if item.is_null() {
            return Err(VecError::NullPointer);
        }
        let mut staged = std::mem::take(&mut self.scratch);
        debug_assert_eq!(staged.len(), item_size);
        // SAFETY: item is readable for item_size bytes per the caller;
        // staged is a separate allocation of exactly item_size bytes, so
        // the ranges cannot overlap even if item points into the buffer.
        unsafe { ptr::copy_nonoverlapping(item, staged.as_mut_ptr(), item_size) };
        let result = op(self, &staged);
        self.scratch = staged;
        result
    }
}
