//! Growth policy: overflow-checked capacity arithmetic.
//!
//! Pure functions only. The vector asks for a new capacity when
//! `count == capacity` and one more element must be admitted; the answer
//! is `max(2 * capacity, 1)` elements, or an overflow error if either the
//! element count or the byte count cannot be represented.

use crate::config::{CapacityRounding, VecConfig};
use crate::error::VecError;

/// Factor by which a full vector's capacity is multiplied.
pub(crate) const GROWTH_FACTOR: usize = 2;

/// Largest byte size any single allocation may have.
const MAX_BYTES: usize = isize::MAX as usize;

/// Capacity in elements for a freshly constructed vector.
pub(crate) fn initial_capacity(config: &VecConfig) -> Result<usize, VecError> {
    match config.rounding {
        CapacityRounding::Exact => Ok(config.min_capacity),
        CapacityRounding::PowerOfTwo => config.min_capacity.checked_next_power_of_two().ok_or(
            VecError::CapacityOverflow {
                capacity: config.min_capacity,
                element_size: config.element_size,
            },
        ),
    }
}

/// Byte size of `capacity` elements of `element_size` bytes.
///
/// Fails when the product overflows `usize` or exceeds `isize::MAX`, the
/// largest size the allocator accepts.
pub(crate) fn byte_size(capacity: usize, element_size: usize) -> Result<usize, VecError> {
    capacity
        .checked_mul(element_size)
        .filter(|&bytes| bytes <= MAX_BYTES)
        .ok_or(VecError::CapacityOverflow {
            capacity,
            element_size,
        })
}

/// Capacity after one growth step from `capacity`.
pub(crate) fn grown_capacity(capacity: usize, element_size: usize) -> Result<usize, VecError> {
    capacity
        .checked_mul(GROWTH_FACTOR)
        .map(|grown| grown.max(1))
        .ok_or(VecError::CapacityOverflow {
            capacity,
            element_size,
        })
}

/// Element count after admitting one more element.
pub(crate) fn count_after_push(count: usize, element_size: usize) -> Result<usize, VecError> {
    count.checked_add(1).ok_or(VecError::CapacityOverflow {
        capacity: count,
        element_size,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn doubling() {
        assert_eq!(grown_capacity(4, 8), Ok(8));
        assert_eq!(grown_capacity(1, 8), Ok(2));
    }

    #[test]
    fn zero_capacity_grows_to_one() {
        assert_eq!(grown_capacity(0, 8), Ok(1));
    }

    #[test]
    fn doubling_overflow_rejected() {
        let capacity = usize::MAX / 2 + 1;
        assert_eq!(
            grown_capacity(capacity, 1),
            Err(VecError::CapacityOverflow {
                capacity,
                element_size: 1
            })
        );
    }

    #[test]
    fn byte_size_overflow_rejected() {
        assert!(byte_size(usize::MAX / 2 + 1, 2).is_err());
        assert!(byte_size(2, usize::MAX).is_err());
        assert_eq!(byte_size(3, 4), Ok(12));
    }

    #[test]
    fn byte_size_above_isize_max_rejected() {
        // Representable in usize but larger than any allocation may be.
        assert!(byte_size(1, MAX_BYTES + 1).is_err());
        assert_eq!(byte_size(1, MAX_BYTES), Ok(MAX_BYTES));
    }

    #[test]
    fn count_overflow_rejected() {
        assert_eq!(count_after_push(3, 4), Ok(4));
        assert!(count_after_push(usize::MAX, 4).is_err());
    }

    #[test]
    fn initial_capacity_rounding() {
        let exact = VecConfig::new(5, 4);
        assert_eq!(initial_capacity(&exact), Ok(5));

        let rounded = VecConfig::new(5, 4).with_rounding(CapacityRounding::PowerOfTwo);
        assert_eq!(initial_capacity(&rounded), Ok(8));

        let already = VecConfig::new(16, 4).with_rounding(CapacityRounding::PowerOfTwo);
        assert_eq!(initial_capacity(&already), Ok(16));
    }

    #[test]
    fn initial_capacity_rounding_overflow() {
        let config = VecConfig::new(usize::MAX, 1).with_rounding(CapacityRounding::PowerOfTwo);
        assert!(initial_capacity(&config).is_err());
    }
}
