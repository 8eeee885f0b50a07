//! Compile-time typed facade over [`ByteVec`].
//!
//! [`TypedVec<T>`] fixes the element size to `size_of::<T>()` and the
//! buffer alignment to `align_of::<T>()`, so the runtime size check that
//! guards the byte API can never fail. Search and removal by value use
//! `PartialEq` instead of byte equality, which is correct for padded
//! structs and floating point.
//!
//! Values are written as `T`, so padding bytes inside a slot are
//! uninitialised. The wrapped [`ByteVec`] is therefore never handed out:
//! only its geometry is, and every read goes through `T` or moves bytes
//! without interpreting them.

#![allow(unsafe_code)]

use std::cmp::Ordering;
use std::fmt;
use std::marker::PhantomData;
use std::mem::{align_of, size_of};
use std::ops::ControlFlow;

use crate::config::VecConfig;
use crate::error::VecError;
use crate::vector::ByteVec;

/// A growable vector of `T` values stored in a [`ByteVec`].
pub struct TypedVec<T: Copy> {
    inner: ByteVec,
    _marker: PhantomData<T>,
}

impl<T: Copy> TypedVec<T> {
    /// Create a vector able to hold at least `min_capacity` values before
    /// growing. Fails for zero-sized `T` or a zero capacity.
    pub fn new(min_capacity: usize) -> Result<Self, VecError> {
        let config = VecConfig::new(min_capacity, size_of::<T>()).with_align(align_of::<T>());
        Ok(Self {
            inner: ByteVec::with_config(config)?,
            _marker: PhantomData,
        })
    }

    /// Create a vector holding a copy of `values`.
    pub fn from_slice(values: &[T]) -> Result<Self, VecError> {
        let mut v = Self::new(values.len().max(1))?;
        for value in values {
            v.push(*value)?;
        }
        Ok(v)
    }

    /// Number of values stored.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Whether the vector is empty.
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Number of values the vector can hold without growing.
    pub fn capacity(&self) -> usize {
        self.inner.capacity()
    }

    /// Size of one value in bytes; always `size_of::<T>()`.
    pub fn element_size(&self) -> usize {
        self.inner.element_size()
    }

    /// Alignment of the value buffer in bytes; at least `align_of::<T>()`.
    pub fn align(&self) -> usize {
        self.inner.align()
    }

    /// Pointer to the first value.
    ///
    /// Valid until the next mutating call, which may relocate or shift the
    /// buffer.
    pub fn as_ptr(&self) -> *const T {
        self.inner.as_ptr().cast::<T>()
    }

    /// The stored values as a slice.
    pub fn as_slice(&self) -> &[T] {
        // SAFETY: the buffer is aligned for T and its first len() elements
        // were each written from a valid T.
        unsafe { std::slice::from_raw_parts(self.inner.as_ptr().cast::<T>(), self.inner.len()) }
    }

    /// The stored values as a mutable slice.
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        let len = self.inner.len();
        // SAFETY: as in as_slice, with exclusivity from &mut self.
        unsafe { std::slice::from_raw_parts_mut(self.inner.as_mut_ptr().cast::<T>(), len) }
    }

    /// The value at `index`.
    pub fn get(&self, index: usize) -> Option<&T> {
        self.as_slice().get(index)
    }

    /// The value at `index` mutably.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.as_mut_slice().get_mut(index)
    }

    /// Append `value`.
    pub fn push(&mut self, value: T) -> Result<(), VecError> {
        self.insert(self.len(), value)
    }

    /// Insert `value` at `index`, shifting later values right.
    ///
    /// `value` is taken by copy, so inserting a value read from this
    /// vector always inserts the value as it was when read.
    pub fn insert(&mut self, index: usize, value: T) -> Result<(), VecError> {
        let slot = self.inner.open_slot(index)?.cast::<T>();
        debug_assert!(slot.is_aligned());
        // SAFETY: the slot is size_of::<T>() bytes at an offset that is a
        // multiple of size_of::<T>() in a buffer aligned for T.
        unsafe { slot.write(value) };
        Ok(())
    }

    /// Remove the value at `index`, returning the index of its successor.
    pub fn remove(&mut self, index: usize) -> Result<usize, VecError> {
        self.inner.remove(index)
    }

    /// Index of the first value satisfying `predicate`.
    pub fn position_by<F>(&self, predicate: F) -> Option<usize>
    where
        F: FnMut(&T) -> bool,
    {
        self.as_slice().iter().position(predicate)
    }

    /// Remove every value satisfying `predicate`.
    pub fn remove_all_by<F>(&mut self, mut predicate: F) -> usize
    where
        F: FnMut(&T) -> bool,
    {
        // SAFETY: remove_all_where hands out pointers to live elements of
        // a TypedVec<T>, which are aligned and written from a valid T.
        self.inner
            .remove_all_where(|e| predicate(unsafe { &*e.cast::<T>() }))
    }

    /// Sort with `compare`. Not stable. Fails on an empty vector.
    pub fn sort_by<F>(&mut self, compare: F) -> Result<(), VecError>
    where
        F: FnMut(&T, &T) -> Ordering,
    {
        if self.is_empty() {
            return Err(VecError::Empty);
        }
        self.as_mut_slice().sort_unstable_by(compare);
        Ok(())
    }

    /// Visit each value in order, stopping at the first `Break`.
    /// Fails on an empty vector.
    pub fn apply<B, F>(&mut self, mut visitor: F) -> Result<ControlFlow<B>, VecError>
    where
        F: FnMut(&mut T) -> ControlFlow<B>,
    {
        if self.is_empty() {
            return Err(VecError::Empty);
        }
        for value in self.as_mut_slice() {
            if let ControlFlow::Break(code) = visitor(value) {
                return Ok(ControlFlow::Break(code));
            }
        }
        Ok(ControlFlow::Continue(()))
    }
}

impl<T: Copy + PartialEq> TypedVec<T> {
    /// Index of the first value equal to `value`.
    pub fn position(&self, value: &T) -> Option<usize> {
        self.position_by(|v| v == value)
    }

    /// Whether any value equals `value`.
    pub fn contains(&self, value: &T) -> bool {
        self.position(value).is_some()
    }

    /// Remove every value equal to `value`.
    pub fn remove_all(&mut self, value: &T) -> usize {
        let target = *value;
        self.remove_all_by(|v| *v == target)
    }
}

impl<T: Copy + PartialEq> PartialEq for TypedVec<T> {
    fn eq(&self, other: &Self) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: Copy + fmt::Debug> fmt::Debug for TypedVec<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.as_slice()).finish()
    }
}
