//! Benchmark workloads for the bytevec container.
//!
//! Element payloads are derived from their index so every workload is
//! deterministic and comparable against a `Vec<[u8; N]>` baseline:
//!
//! - [`payload`]: the bytes of element `i`
//! - [`filled`]: a vector of `count` such elements
//! - [`ELEMENT_SIZES`]: the element sizes each benchmark sweeps

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use bytevec::ByteVec;

/// Element sizes swept by the benchmarks: a word, a cache-line fraction
/// and a size with no power-of-two alignment.
pub const ELEMENT_SIZES: [usize; 3] = [8, 32, 24];

/// Bytes of element `i` for the given element size.
///
/// The low bytes carry `i` so byte-equality searches hit exactly once.
pub fn payload(i: u64, element_size: usize) -> Vec<u8> {
    let mut bytes = vec![0xA5; element_size];
    let index = i.to_le_bytes();
    let n = index.len().min(element_size);
    bytes[..n].copy_from_slice(&index[..n]);
    bytes
}

/// A vector holding elements `0..count`, built with a small starting
/// capacity so it has grown several times.
pub fn filled(count: u64, element_size: usize) -> ByteVec {
    let mut v = ByteVec::new(4, element_size).expect("non-zero geometry");
    for i in 0..count {
        v.append(&payload(i, element_size)).expect("append");
    }
    v
}
