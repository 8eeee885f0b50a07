//! Test fixtures for bytevec development.
//!
//! Builders that fill a [`ByteVec`] from typed values and readers that
//! decode its occupied region back, so tests can state expectations as
//! plain `Vec<u32>` / `Vec<Point>` values.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

use bytevec::ByteVec;

/// Element size of `u32` fixtures.
pub const U32_SIZE: usize = std::mem::size_of::<u32>();

/// Build a vector of `u32` values with the given initial capacity.
pub fn u32_vec(capacity: usize, values: &[u32]) -> ByteVec {
    let mut v = ByteVec::new(capacity, U32_SIZE).expect("fixture capacity must be non-zero");
    for value in values {
        v.append(&value.to_ne_bytes()).expect("fixture append");
    }
    v
}

/// Decode one `u32` element.
pub fn decode_u32(element: &[u8]) -> u32 {
    let mut buf = [0u8; U32_SIZE];
    buf.copy_from_slice(element);
    u32::from_ne_bytes(buf)
}

/// Decode every element of a `u32` vector.
pub fn u32_values(v: &ByteVec) -> Vec<u32> {
    v.iter().map(decode_u32).collect()
}

/// A padding-free two-field element used where a multi-word element
/// size matters.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const SIZE: usize = 8;

    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn to_bytes(self) -> [u8; Self::SIZE] {
        let mut out = [0u8; Self::SIZE];
        out[..4].copy_from_slice(&self.x.to_ne_bytes());
        out[4..].copy_from_slice(&self.y.to_ne_bytes());
        out
    }

    pub fn from_bytes(bytes: &[u8]) -> Self {
        let mut x = [0u8; 4];
        let mut y = [0u8; 4];
        x.copy_from_slice(&bytes[..4]);
        y.copy_from_slice(&bytes[4..8]);
        Self {
            x: i32::from_ne_bytes(x),
            y: i32::from_ne_bytes(y),
        }
    }
}

/// Build a vector of points with the given initial capacity.
pub fn point_vec(capacity: usize, points: &[Point]) -> ByteVec {
    let mut v = ByteVec::new(capacity, Point::SIZE).expect("fixture capacity must be non-zero");
    for p in points {
        v.append(&p.to_bytes()).expect("fixture append");
    }
    v
}

/// Decode every element of a point vector.
pub fn points(v: &ByteVec) -> Vec<Point> {
    v.iter().map(Point::from_bytes).collect()
}
