//! Vector configuration parameters.

use crate::error::VecError;

/// How the initial capacity request is turned into an allocation size.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CapacityRounding {
    /// Allocate exactly `min_capacity` elements.
    #[default]
    Exact,
    /// Round `min_capacity` up to the next power of two.
    PowerOfTwo,
}

/// Configuration for a [`ByteVec`](crate::ByteVec).
///
/// Validated at construction; the element size and alignment are
/// immutable for the lifetime of the vector.
#[derive(Clone, Debug)]
pub struct VecConfig {
    /// Number of elements the vector can hold before its first growth.
    ///
    /// Must be non-zero. The actual capacity may be larger depending on
    /// [`rounding`](Self::rounding).
    pub min_capacity: usize,

    /// Size of one element in bytes. Must be non-zero.
    pub element_size: usize,

    /// Alignment of the element buffer in bytes.
    ///
    /// Default: 16, the guarantee a C `malloc` gives, so that pointers
    /// handed across the FFI boundary can be cast to any scalar type.
    /// Must be a power of two.
    pub align: usize,

    /// Initial capacity rounding. Default: [`CapacityRounding::Exact`].
    pub rounding: CapacityRounding,
}

impl VecConfig {
    /// Default buffer alignment in bytes.
    pub const DEFAULT_ALIGN: usize = 16;

    /// Create a config for the given capacity hint and element size.
    ///
    /// Uses default values for all other parameters.
    pub fn new(min_capacity: usize, element_size: usize) -> Self {
        Self {
            min_capacity,
            element_size,
            align: Self::DEFAULT_ALIGN,
            rounding: CapacityRounding::Exact,
        }
    }

    /// Set the buffer alignment.
    pub fn with_align(mut self, align: usize) -> Self {
        self.align = align;
        self
    }

    /// Set the initial capacity rounding.
    pub fn with_rounding(mut self, rounding: CapacityRounding) -> Self {
        self.rounding = rounding;
        self
    }

    /// Check the argument constraints. Overflow of the total byte size is
    /// checked separately when the storage is sized.
    pub fn validate(&self) -> Result<(), VecError> {
        if self.min_capacity == 0 {
            return Err(VecError::ZeroCapacity);
        }
        if self.element_size == 0 {
            return Err(VecError::ZeroElementSize);
        }
        if !self.align.is_power_of_two() {
            return Err(VecError::InvalidAlignment { align: self.align });
        }
        Ok(())
    }
}
