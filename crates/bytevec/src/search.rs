//! Linear search by byte equality or by predicate.
//!
//! Byte equality is only meaningful for element types whose equal values
//! always have equal bytes. Structs with padding and floating point values
//! (`0.0 == -0.0`, `NaN != NaN`) must be searched with a predicate.

use crate::vector::ByteVec;

impl ByteVec {
    /// Index of the first element whose bytes equal `item`.
    ///
    /// Returns `None` when nothing matches or when `item.len()` differs
    /// from the element size.
    pub fn position(&self, item: &[u8]) -> Option<usize> {
        if item.len() != self.element_size {
            return None;
        }
        self.position_by(|element| element == item)
    }

    /// Index of the first element satisfying `predicate`.
    pub fn position_by<F>(&self, mut predicate: F) -> Option<usize>
    where
        F: FnMut(&[u8]) -> bool,
    {
        self.iter().position(|element| predicate(element))
    }

    /// Whether any element's bytes equal `item`.
    pub fn contains(&self, item: &[u8]) -> bool {
        self.position(item).is_some()
    }

    /// Whether any element satisfies `predicate`.
    pub fn contains_by<F>(&self, predicate: F) -> bool
    where
        F: FnMut(&[u8]) -> bool,
    {
        self.position_by(predicate).is_some()
    }
}
