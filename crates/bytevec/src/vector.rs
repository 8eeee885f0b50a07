//! The [`ByteVec`] container: storage, bookkeeping and element access.
//!
//! Search, mutation and whole-container operations live in
//! [`search`](crate::search), [`mutate`](crate::mutate) and
//! [`ops`](crate::ops) as further `impl ByteVec` blocks.

use std::fmt;

use crate::config::VecConfig;
use crate::error::VecError;
use crate::growth;
use crate::index::to_internal;
use crate::raw::RawBlock;

/// A growable vector of fixed-size elements whose size is chosen at
/// runtime.
///
/// The occupied region `[0, len_bytes())` is always contiguous. Bytes past
/// it are slack: they are never compared or handed out, and bytes vacated
/// by a removal are zeroed.
///
/// # Invariants
///
/// - `len() <= capacity()`
/// - `capacity_bytes() == capacity() * element_size()` without overflow
/// - `element_size()` never changes
pub struct ByteVec {
    pub(crate) block: RawBlock,
    pub(crate) element_size: usize,
    pub(crate) capacity: usize,
    pub(crate) count: usize,
    /// One element of staging space for the pointer-taking mutators.
    pub(crate) scratch: Vec<u8>,
}

impl ByteVec {
    /// Create a vector able to hold at least `min_capacity` elements of
    /// `element_size` bytes each before growing.
    ///
    /// Fails without allocating if either argument is zero or the byte size
    /// overflows.
    pub fn new(min_capacity: usize, element_size: usize) -> Result<Self, VecError> {
        Self::with_config(VecConfig::new(min_capacity, element_size))
    }

    /// Create a vector from a full [`VecConfig`].
    pub fn with_config(config: VecConfig) -> Result<Self, VecError> {
        config.validate()?;
        let capacity = growth::initial_capacity(&config)?;
        let bytes = growth::byte_size(capacity, config.element_size)?;
        let block = match RawBlock::allocate(bytes, config.align) {
            Ok(block) => block,
            Err(e) => {
                debug!("rejected vector of {capacity} x {} bytes: {e}", config.element_size);
                return Err(e);
            }
        };

        let mut scratch = Vec::new();
        scratch
            .try_reserve_exact(config.element_size)
            .map_err(|_| VecError::AllocationFailed {
                bytes: config.element_size,
            })?;
        scratch.resize(config.element_size, 0);

        Ok(Self {
            block,
            element_size: config.element_size,
            capacity,
            count: 0,
            scratch,
        })
    }

    /// Number of elements the vector can hold without growing.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Allocated size in bytes; always `capacity() * element_size()`.
    #[inline]
    pub fn capacity_bytes(&self) -> usize {
        self.block.capacity_bytes()
    }

    /// Number of elements stored.
    #[inline]
    pub fn len(&self) -> usize {
        self.count
    }

    /// Occupied size in bytes; always `len() * element_size()`.
    #[inline]
    pub fn len_bytes(&self) -> usize {
        to_internal(self.count, self.element_size)
    }

    /// Whether the vector holds no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Size of one element in bytes.
    #[inline]
    pub fn element_size(&self) -> usize {
        self.element_size
    }

    /// Alignment of the element buffer in bytes.
    #[inline]
    pub fn align(&self) -> usize {
        self.block.align()
    }

    /// The element at `index`, or `None` if `index >= len()`.
    pub fn get(&self, index: usize) -> Option<&[u8]> {
        (index < self.count).then(|| self.element(index))
    }

    /// The element at `index` mutably, or `None` if `index >= len()`.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut [u8]> {
        (index < self.count).then(|| self.element_mut(index))
    }

    /// The occupied region. Slack is never included.
    pub fn as_bytes(&self) -> &[u8] {
        self.block.bytes(0..self.len_bytes())
    }

    /// The occupied region mutably.
    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        let end = self.len_bytes();
        self.block.bytes_mut(0..end)
    }

    /// Pointer to the first element's first byte.
    ///
    /// The pointer is a weak reference: it is valid until the next
    /// mutating call, which may relocate or shift the buffer.
    pub fn as_ptr(&self) -> *const u8 {
        self.block.as_ptr()
    }

    /// Mutable pointer to the first element's first byte.
    #[inline]
    pub(crate) fn as_mut_ptr(&mut self) -> *mut u8 {
        self.block.as_mut_ptr()
    }

    /// Iterate over the elements in index order.
    pub fn iter(&self) -> std::slice::ChunksExact<'_, u8> {
        self.as_bytes().chunks_exact(self.element_size)
    }

    /// Iterate mutably over the elements in index order.
    pub fn iter_mut(&mut self) -> std::slice::ChunksExactMut<'_, u8> {
        let size = self.element_size;
        self.as_bytes_mut().chunks_exact_mut(size)
    }

    // ── internal helpers ────────────────────────────────────────

    /// Element at `index`; `index` must be below capacity.
    #[inline]
    pub(crate) fn element(&self, index: usize) -> &[u8] {
        let start = to_internal(index, self.element_size);
        self.block.bytes(start..start + self.element_size)
    }

    /// Element at `index` mutably; `index` must be below capacity.
    #[inline]
    pub(crate) fn element_mut(&mut self, index: usize) -> &mut [u8] {
        let start = to_internal(index, self.element_size);
        let end = start + self.element_size;
        self.block.bytes_mut(start..end)
    }

    pub(crate) fn check_item_size(&self, item_size: usize) -> Result<(), VecError> {
        if item_size != self.element_size {
            return Err(VecError::ElementSizeMismatch {
                expected: self.element_size,
                actual: item_size,
            });
        }
        Ok(())
    }

    /// Make room for one more element, growing if the vector is full.
    ///
    /// Returns the new element count. On error nothing has changed.
    pub(crate) fn reserve_one(&mut self) -> Result<usize, VecError> {
        let new_count = growth::count_after_push(self.count, self.element_size)?;
        if self.count == self.capacity {
            self.grow()?;
        }
        debug_assert!(self.count < self.capacity);
        Ok(new_count)
    }

    /// One growth step. Invalidates every pointer into the buffer.
    fn grow(&mut self) -> Result<(), VecError> {
        let new_capacity = growth::grown_capacity(self.capacity, self.element_size)?;
        let new_bytes = growth::byte_size(new_capacity, self.element_size)?;
        if let Err(e) = self.block.grow(new_bytes) {
            debug!("growth to {new_capacity} elements refused: {e}");
            return Err(e);
        }
        trace!(
            "grew vector from {} to {new_capacity} elements ({new_bytes} bytes)",
            self.capacity
        );
        self.capacity = new_capacity;
        Ok(())
    }
}

impl fmt::Debug for ByteVec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ByteVec")
            .field("element_size", &self.element_size)
            .field("count", &self.count)
            .field("capacity", &self.capacity)
            .field("bytes", &self.as_bytes())
            .finish()
    }
}
