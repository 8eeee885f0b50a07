//! Whole-container operations: equality, sorting and visiting.

use std::cmp::Ordering;
use std::mem::size_of;
use std::ops::ControlFlow;

use crate::error::VecError;
use crate::index::to_internal;
use crate::vector::ByteVec;

impl ByteVec {
    /// Compare two vectors element by element with `eq`.
    ///
    /// Vectors with different element sizes or counts are never equal. Two
    /// empty vectors are equal when their element sizes match. Only the
    /// occupied regions are compared; capacity and slack are ignored.
    pub fn eq_by<F>(&self, other: &ByteVec, mut eq: F) -> bool
    where
        F: FnMut(&[u8], &[u8]) -> bool,
    {
        if self.element_size != other.element_size || self.count != other.count {
            return false;
        }
        self.iter().zip(other.iter()).all(|(a, b)| eq(a, b))
    }

    /// Sort the elements with `compare`.
    ///
    /// The sort is not stable: elements that compare equal may end up in
    /// any relative order. Elements are moved in place; the only extra
    /// memory is one index per element, reserved up front. Fails with
    /// [`VecError::Empty`] on an empty vector and with
    /// [`VecError::AllocationFailed`] if the index buffer cannot be
    /// reserved. The vector is unchanged on failure and if `compare`
    /// panics.
    pub fn sort_by<F>(&mut self, mut compare: F) -> Result<(), VecError>
    where
        F: FnMut(&[u8], &[u8]) -> Ordering,
    {
        if self.is_empty() {
            return Err(VecError::Empty);
        }
        let mut order = index_buffer(self.count)?;
        order.sort_unstable_by(|&a, &b| compare(self.element(a), self.element(b)));
        self.permute(&mut order);
        Ok(())
    }

    /// Move element `order[i]` into slot `i` for every `i`.
    ///
    /// Each cycle of the permutation is walked once: its first element is
    /// parked in the scratch cell, the rest shift along the cycle, and the
    /// parked element fills the last hole. `order` is left as the identity.
    fn permute(&mut self, order: &mut [usize]) {
        let size = self.element_size;
        let mut parked = std::mem::take(&mut self.scratch);
        for start in 0..order.len() {
            if order[start] == start {
                continue;
            }
            parked.copy_from_slice(self.element(start));
            let mut hole = start;
            loop {
                let next = order[hole];
                order[hole] = hole;
                if next == start {
                    self.element_mut(hole).copy_from_slice(&parked);
                    break;
                }
                let from = to_internal(next, size);
                self.block
                    .as_mut_slice()
                    .copy_within(from..from + size, to_internal(hole, size));
                hole = next;
            }
        }
        self.scratch = parked;
    }

    /// Call `visitor` on each element in index order.
    ///
    /// Iteration stops at the first `Break`, which is returned as
    /// `Ok(ControlFlow::Break(_))`; `Ok(ControlFlow::Continue(()))` means
    /// every element was visited. State is carried by the closure's
    /// captures. Fails with [`VecError::Empty`] on an empty vector.
    pub fn apply<B, F>(&mut self, mut visitor: F) -> Result<ControlFlow<B>, VecError>
    where
        F: FnMut(&mut [u8]) -> ControlFlow<B>,
    {
        if self.is_empty() {
            return Err(VecError::Empty);
        }
        for element in self.iter_mut() {
            if let ControlFlow::Break(code) = visitor(element) {
                return Ok(ControlFlow::Break(code));
            }
        }
        Ok(ControlFlow::Continue(()))
    }
}

/// `[0, count)` in a buffer reserved without aborting on failure.
fn index_buffer(count: usize) -> Result<Vec<usize>, VecError> {
    let mut order = Vec::new();
    order
        .try_reserve_exact(count)
        .map_err(|_| VecError::AllocationFailed {
            bytes: count.saturating_mul(size_of::<usize>()),
        })?;
    order.extend(0..count);
    Ok(order)
}

impl PartialEq for ByteVec {
    /// Byte equality over the occupied regions.
    fn eq(&self, other: &Self) -> bool {
        self.element_size == other.element_size && self.as_bytes() == other.as_bytes()
    }
}

impl Eq for ByteVec {}
