//! Vector lifecycle, search, mutation and whole-vector operations.
//!
//! Uses per-vector `Arc<Mutex<ByteVec>>` so the global `VECTORS` table lock
//! is only held briefly (for handle lookup). Different vectors can be used
//! from different threads concurrently; calls on the same vector serialise.
//!
//! Failure is reported through the return shapes below and, for the cause,
//! through `bytevec_last_status`:
//!
//! | Return type | On null/stale handle or failure |
//! |---|---|
//! | size getters | `0` |
//! | search index | the element count (`0` for a bad handle) |
//! | `bool` | `false` |
//! | element pointer | null |
//! | `bytevec_apply` | `1` |

use std::ffi::c_void;
use std::ops::ControlFlow;
use std::ptr;
use std::sync::{Arc, Mutex};

use bytevec::ByteVec;

use crate::handle::{HandleTable, NULL_HANDLE};
use crate::status::{record, report, ByteVecStatus};

/// Element predicate: returns `true` for a match.
///
/// `element` is valid for `element_size` bytes for the duration of the call.
pub type ByteVecPredicate = unsafe extern "C" fn(element: *const u8, element_size: usize) -> bool;

/// Element comparator with `memcmp` conventions: negative, zero or
/// positive as `a` orders before, equal to or after `b`.
pub type ByteVecComparator =
    unsafe extern "C" fn(a: *const u8, b: *const u8, element_size: usize) -> i32;

/// Element visitor: return `0` to continue, anything else to stop.
///
/// `element` may be written through for the duration of the call.
pub type ByteVecVisitor =
    unsafe extern "C" fn(element: *mut u8, element_size: usize, state: *mut c_void) -> i32;

/// Result of `bytevec_apply` when it could not run.
pub const BYTEVEC_APPLY_FAILED: i32 = 1;

type VecArc = Arc<Mutex<ByteVec>>;

static VECTORS: Mutex<HandleTable<VecArc>> = Mutex::new(HandleTable::new());

/// Clone the Arc for a vector handle, briefly locking the global table.
fn get_vector(handle: u64) -> Result<VecArc, ByteVecStatus> {
    lookup(&VECTORS, handle)
}

/// `InvalidHandle` if the handle is null or stale, `InternalError` if the
/// table mutex is poisoned.
fn lookup(table: &Mutex<HandleTable<VecArc>>, handle: u64) -> Result<VecArc, ByteVecStatus> {
    let table = table.lock().map_err(|_| ByteVecStatus::InternalError)?;
    table.get(handle).cloned().ok_or(ByteVecStatus::InvalidHandle)
}

/// Run `f` on the vector behind `handle`, or record why it could not.
///
/// The status is set to `Ok` before `f` runs; `f` records any failure.
fn with_vector<R>(handle: u64, fallback: R, f: impl FnOnce(&mut ByteVec) -> R) -> R {
    let arc = match get_vector(handle) {
        Ok(arc) => arc,
        Err(status) => {
            record(status);
            return fallback;
        }
    };
    let mut v = ffi_lock!(arc, fallback);
    record(ByteVecStatus::Ok);
    f(&mut v)
}

/// View a caller-supplied item as an element-sized slice.
///
/// # Safety
///
/// `item` must be null or valid for reads of `item_size` bytes for `'a`.
#[allow(unsafe_code)]
unsafe fn item_slice<'a>(v: &ByteVec, item: *const u8, item_size: usize) -> Option<&'a [u8]> {
    if item.is_null() {
        record(ByteVecStatus::InvalidArgument);
        return None;
    }
    if item_size != v.element_size() {
        record(ByteVecStatus::SizeMismatch);
        return None;
    }
    // SAFETY: non-null and readable for item_size bytes per the contract.
    Some(unsafe { std::slice::from_raw_parts(item, item_size) })
}

#[allow(unsafe_code)]
fn equal(a: &ByteVec, b: &ByteVec, compare: Option<ByteVecComparator>) -> bool {
    match compare {
        None => a == b,
        Some(compare) => {
            let size = a.element_size();
            // SAFETY: both slices are live elements of element_size bytes.
            a.eq_by(b, |x, y| unsafe { compare(x.as_ptr(), y.as_ptr(), size) } == 0)
        }
    }
}

// ── lifecycle ───────────────────────────────────────────────────

/// Create a vector for at least `min_capacity` elements of `element_size`
/// bytes. Returns the handle, or `0` on failure.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn bytevec_new(min_capacity: usize, element_size: usize) -> u64 {
    ffi_guard!(NULL_HANDLE, {
        let Some(v) = report(ByteVec::new(min_capacity, element_size)) else {
            return NULL_HANDLE;
        };
        let inserted = ffi_lock!(VECTORS, NULL_HANDLE).insert(Arc::new(Mutex::new(v)));
        match inserted {
            Some(handle) => {
                record(ByteVecStatus::Ok);
                handle
            }
            None => {
                record(ByteVecStatus::AllocationFailed);
                NULL_HANDLE
            }
        }
    })
}

/// Destroy the vector behind `*handle` and reset `*handle` to `0`.
///
/// A no-op when `handle` is null or `*handle` is null or already destroyed.
/// Element pointers obtained from the vector become invalid.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn bytevec_destroy(handle: *mut u64) {
    ffi_guard!((), {
        record(ByteVecStatus::Ok);
        if handle.is_null() {
            return;
        }
        // SAFETY: handle is non-null and points to a u64 per caller contract.
        let h = unsafe { *handle };
        let removed = ffi_lock!(VECTORS, ()).remove(h);
        // SAFETY: as above.
        unsafe { *handle = NULL_HANDLE };
        // The last Arc may be held by a concurrent call; it frees the
        // vector when that call returns.
        drop(removed);
    })
}

// ── geometry ────────────────────────────────────────────────────

/// Number of elements the vector can hold without growing.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn bytevec_capacity(handle: u64) -> usize {
    ffi_guard!(0, { with_vector(handle, 0, |v| v.capacity()) })
}

/// Allocated size in bytes.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn bytevec_capacity_bytes(handle: u64) -> usize {
    ffi_guard!(0, { with_vector(handle, 0, |v| v.capacity_bytes()) })
}

/// Number of elements stored.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn bytevec_count(handle: u64) -> usize {
    ffi_guard!(0, { with_vector(handle, 0, |v| v.len()) })
}

/// Occupied size in bytes.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn bytevec_count_bytes(handle: u64) -> usize {
    ffi_guard!(0, { with_vector(handle, 0, |v| v.len_bytes()) })
}

/// Size of one element in bytes.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn bytevec_element_size(handle: u64) -> usize {
    ffi_guard!(0, { with_vector(handle, 0, |v| v.element_size()) })
}

// ── comparison ──────────────────────────────────────────────────

/// Whether two vectors hold equal elements.
///
/// `compare` decides element equality (zero means equal); byte equality
/// is used when it is null. Only occupied regions are compared. Passing
/// the same handle twice compares the vector with itself.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn bytevec_equal(a: u64, b: u64, compare: Option<ByteVecComparator>) -> bool {
    ffi_guard!(false, {
        let (va, vb) = match (get_vector(a), get_vector(b)) {
            (Ok(va), Ok(vb)) => (va, vb),
            (Err(status), _) | (_, Err(status)) => {
                record(status);
                return false;
            }
        };
        if Arc::ptr_eq(&va, &vb) {
            let v = ffi_lock!(va, false);
            record(ByteVecStatus::Ok);
            return equal(&v, &v, compare);
        }
        // Lock in address order so equal(a, b) racing equal(b, a) cannot deadlock.
        let a_first = Arc::as_ptr(&va) < Arc::as_ptr(&vb);
        let (first, second) = if a_first { (&va, &vb) } else { (&vb, &va) };
        let g1 = ffi_lock!(first, false);
        let g2 = ffi_lock!(second, false);
        let (ga, gb) = if a_first { (&*g1, &*g2) } else { (&*g2, &*g1) };
        record(ByteVecStatus::Ok);
        equal(ga, gb, compare)
    })
}

// ── search ──────────────────────────────────────────────────────

/// Index of the first element whose bytes equal the `item_size` bytes at
/// `item`; the element count if there is none, `item` is null or the
/// sizes differ.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn bytevec_where(handle: u64, item: *const u8, item_size: usize) -> usize {
    ffi_guard!(0, {
        with_vector(handle, 0, |v| {
            let count = v.len();
            // SAFETY: item is null or readable for item_size bytes per caller contract.
            match unsafe { item_slice(v, item, item_size) } {
                Some(item) => v.position(item).unwrap_or(count),
                None => count,
            }
        })
    })
}

/// Index of the first element satisfying `predicate`; the element count
/// if there is none or `predicate` is null.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn bytevec_where_if(handle: u64, predicate: Option<ByteVecPredicate>) -> usize {
    ffi_guard!(0, {
        with_vector(handle, 0, |v| {
            let count = v.len();
            let Some(predicate) = predicate else {
                record(ByteVecStatus::InvalidArgument);
                return count;
            };
            let size = v.element_size();
            // SAFETY: each slice is a live element of element_size bytes.
            v.position_by(|e| unsafe { predicate(e.as_ptr(), size) })
                .unwrap_or(count)
        })
    })
}

/// Whether any element's bytes equal the `item_size` bytes at `item`.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn bytevec_has(handle: u64, item: *const u8, item_size: usize) -> bool {
    ffi_guard!(false, {
        with_vector(handle, false, |v| {
            // SAFETY: item is null or readable for item_size bytes per caller contract.
            let item = unsafe { item_slice(v, item, item_size) };
            item.is_some_and(|item| v.contains(item))
        })
    })
}

/// Whether any element satisfies `predicate`.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn bytevec_has_if(handle: u64, predicate: Option<ByteVecPredicate>) -> bool {
    ffi_guard!(false, {
        with_vector(handle, false, |v| {
            let Some(predicate) = predicate else {
                record(ByteVecStatus::InvalidArgument);
                return false;
            };
            let size = v.element_size();
            // SAFETY: each slice is a live element of element_size bytes.
            v.contains_by(|e| unsafe { predicate(e.as_ptr(), size) })
        })
    })
}

/// Pointer to the element at `index`, or null if `index` is out of range.
///
/// The pointer may be written through. It is valid until the next
/// mutating call on this vector.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn bytevec_get(handle: u64, index: usize) -> *mut u8 {
    ffi_guard!(ptr::null_mut(), {
        with_vector(handle, ptr::null_mut(), |v| match v.get_mut(index) {
            Some(element) => element.as_mut_ptr(),
            None => {
                record(ByteVecStatus::IndexOutOfBounds);
                ptr::null_mut()
            }
        })
    })
}

// ── mutation ────────────────────────────────────────────────────

/// Append the `item_size` bytes at `item`, growing if needed.
///
/// `item` may point into this vector. Returns `false`, leaving the vector
/// unchanged, on a null item, a size mismatch, overflow or allocation
/// failure.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn bytevec_append(handle: u64, item: *const u8, item_size: usize) -> bool {
    ffi_guard!(false, {
        with_vector(handle, false, |v| {
            // SAFETY: item is null or readable for item_size bytes per caller contract.
            report(unsafe { v.append_from_ptr(item, item_size) }).is_some()
        })
    })
}

/// Insert the `item_size` bytes at `item` at position `index`
/// (`index == count` appends).
///
/// `item` may point into this vector; the value inserted is the one it
/// denoted before the call. Returns `false`, leaving the vector unchanged,
/// if `index > count` or as for `bytevec_append`.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn bytevec_insert(
    handle: u64,
    index: usize,
    item: *const u8,
    item_size: usize,
) -> bool {
    ffi_guard!(false, {
        with_vector(handle, false, |v| {
            // SAFETY: item is null or readable for item_size bytes per caller contract.
            report(unsafe { v.insert_from_ptr(index, item, item_size) }).is_some()
        })
    })
}

/// Remove the element at `index`.
///
/// Returns the index of the element that now occupies the slot (equal to
/// the new count when the last element was removed), or the unchanged
/// count if `index` is out of range.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn bytevec_remove(handle: u64, index: usize) -> usize {
    ffi_guard!(0, {
        with_vector(handle, 0, |v| report(v.remove(index)).unwrap_or(v.len()))
    })
}

/// Remove every element whose bytes equal the `item_size` bytes at `item`.
///
/// `item` may point into this vector. Returns the number removed; `0` on
/// a null item or size mismatch.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn bytevec_remove_all(handle: u64, item: *const u8, item_size: usize) -> usize {
    ffi_guard!(0, {
        with_vector(handle, 0, |v| {
            // SAFETY: item is null or readable for item_size bytes per caller contract.
            report(unsafe { v.remove_all_from_ptr(item, item_size) }).unwrap_or(0)
        })
    })
}

/// Remove every element satisfying `predicate`, keeping survivor order.
/// Returns the number removed; `0` if `predicate` is null.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn bytevec_remove_all_if(handle: u64, predicate: Option<ByteVecPredicate>) -> usize {
    ffi_guard!(0, {
        with_vector(handle, 0, |v| {
            let Some(predicate) = predicate else {
                record(ByteVecStatus::InvalidArgument);
                return 0;
            };
            let size = v.element_size();
            // SAFETY: each slice is a live element of element_size bytes.
            v.remove_all_by(|e| unsafe { predicate(e.as_ptr(), size) })
        })
    })
}

// ── whole-vector operations ─────────────────────────────────────

/// Sort the elements with `compare`. Not stable.
///
/// Returns `false` if `compare` is null or the vector is empty.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn bytevec_sort(handle: u64, compare: Option<ByteVecComparator>) -> bool {
    ffi_guard!(false, {
        with_vector(handle, false, |v| {
            let Some(compare) = compare else {
                record(ByteVecStatus::InvalidArgument);
                return false;
            };
            let size = v.element_size();
            // SAFETY: both slices are live elements of element_size bytes.
            let sorted = v.sort_by(|a, b| unsafe { compare(a.as_ptr(), b.as_ptr(), size) }.cmp(&0));
            report(sorted).is_some()
        })
    })
}

/// Call `visitor` on each element in index order, passing `state` through.
///
/// Returns `0` once every element was visited, or the first non-zero
/// visitor result. Returns [`BYTEVEC_APPLY_FAILED`] if `visitor` is null
/// or the vector is empty; check `bytevec_last_status` to tell that apart
/// from a visitor returning the same value.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn bytevec_apply(
    handle: u64,
    visitor: Option<ByteVecVisitor>,
    state: *mut c_void,
) -> i32 {
    ffi_guard!(BYTEVEC_APPLY_FAILED, {
        with_vector(handle, BYTEVEC_APPLY_FAILED, |v| {
            let Some(visitor) = visitor else {
                record(ByteVecStatus::InvalidArgument);
                return BYTEVEC_APPLY_FAILED;
            };
            let size = v.element_size();
            let flow = v.apply(|e| {
                // SAFETY: e is a live, exclusively borrowed element; state
                // is passed through untouched.
                match unsafe { visitor(e.as_mut_ptr(), size, state) } {
                    0 => ControlFlow::Continue(()),
                    code => ControlFlow::Break(code),
                }
            });
            match report(flow) {
                Some(ControlFlow::Continue(())) => 0,
                Some(ControlFlow::Break(code)) => code,
                None => BYTEVEC_APPLY_FAILED,
            }
        })
    })
}

#[cfg(test)]
#[allow(unsafe_code)]
mod tests {
    use super::*;
    use crate::status::bytevec_last_status;
    use bytevec_test_utils::Point;
    use proptest::prelude::*;

    const U32: usize = 4;

    fn new_u32(capacity: usize) -> u64 {
        let h = bytevec_new(capacity, U32);
        assert_ne!(h, NULL_HANDLE);
        h
    }

    fn push(h: u64, x: u32) -> bool {
        let bytes = x.to_ne_bytes();
        bytevec_append(h, bytes.as_ptr(), U32)
    }

    fn from_values(capacity: usize, values: &[u32]) -> u64 {
        let h = new_u32(capacity);
        for &x in values {
            assert!(push(h, x));
        }
        h
    }

    #[test]
    fn poisoned_table_is_internal_error() {
        let table = Mutex::new(HandleTable::new());
        let vec = ByteVec::new(1, U32).unwrap();
        let handle = table
            .lock()
            .unwrap()
            .insert(Arc::new(Mutex::new(vec)))
            .unwrap();
        assert!(lookup(&table, handle).is_ok());
        assert_eq!(lookup(&table, handle + 1).err(), Some(ByteVecStatus::InvalidHandle));

        std::thread::scope(|s| {
            s.spawn(|| {
                let _guard = table.lock().unwrap();
                panic!("poison the table");
            })
            .join()
            .unwrap_err();
        });
        assert!(table.is_poisoned());
        assert_eq!(lookup(&table, handle).err(), Some(ByteVecStatus::InternalError));
    }

    fn values(h: u64) -> Vec<u32> {
        (0..bytevec_count(h))
            .map(|i| {
                let p = bytevec_get(h, i);
                assert!(!p.is_null());
                // SAFETY: p addresses a live 4-byte element.
                unsafe { p.cast::<u32>().read_unaligned() }
            })
            .collect()
    }

    fn destroy(mut h: u64) {
        bytevec_destroy(&mut h);
        assert_eq!(h, NULL_HANDLE);
    }

    fn status() -> ByteVecStatus {
        match bytevec_last_status() {
            0 => ByteVecStatus::Ok,
            -1 => ByteVecStatus::InvalidHandle,
            -2 => ByteVecStatus::InvalidArgument,
            -3 => ByteVecStatus::SizeMismatch,
            -4 => ByteVecStatus::IndexOutOfBounds,
            -5 => ByteVecStatus::Empty,
            -6 => ByteVecStatus::Overflow,
            -7 => ByteVecStatus::AllocationFailed,
            -20 => ByteVecStatus::InternalError,
            other => panic!("unexpected status {other}"),
        }
    }

    unsafe extern "C" fn read_u32(p: *const u8) -> u32 {
        // SAFETY: callers pass 4-byte elements.
        unsafe { p.cast::<u32>().read_unaligned() }
    }

    unsafe extern "C" fn is_even(e: *const u8, _size: usize) -> bool {
        // SAFETY: element of a u32 vector.
        let x = unsafe { read_u32(e) };
        x % 2 == 0
    }

    unsafe extern "C" fn cmp_u32(a: *const u8, b: *const u8, _size: usize) -> i32 {
        // SAFETY: elements of a u32 vector.
        let (a, b) = unsafe { (read_u32(a), read_u32(b)) };
        a.cmp(&b) as i32
    }

    unsafe extern "C" fn cmp_parity(a: *const u8, b: *const u8, _size: usize) -> i32 {
        // SAFETY: elements of a u32 vector.
        let (a, b) = unsafe { (read_u32(a), read_u32(b)) };
        ((a % 2) as i32) - ((b % 2) as i32)
    }

    unsafe extern "C" fn sum_until_over_ten(e: *mut u8, _size: usize, state: *mut c_void) -> i32 {
        // SAFETY: e is a u32 element, state points at a u32 accumulator.
        unsafe {
            let total = &mut *state.cast::<u32>();
            *total += read_u32(e);
            if *total > 10 {
                7
            } else {
                0
            }
        }
    }

    unsafe extern "C" fn double(e: *mut u8, _size: usize, _state: *mut c_void) -> i32 {
        // SAFETY: e is a writable u32 element.
        unsafe {
            let x = read_u32(e);
            e.cast::<u32>().write_unaligned(x * 2);
        }
        0
    }

    #[test]
    fn lifecycle_and_geometry() {
        let h = new_u32(3);
        assert_eq!(status(), ByteVecStatus::Ok);
        assert_eq!(bytevec_capacity(h), 3);
        assert_eq!(bytevec_capacity_bytes(h), 12);
        assert_eq!(bytevec_element_size(h), U32);
        assert_eq!(bytevec_count(h), 0);
        for x in 0..4 {
            assert!(push(h, x));
        }
        assert_eq!(bytevec_count(h), 4);
        assert_eq!(bytevec_count_bytes(h), 16);
        assert_eq!(bytevec_capacity(h), 6);
        destroy(h);
    }

    #[test]
    fn new_rejects_bad_arguments() {
        assert_eq!(bytevec_new(0, 4), NULL_HANDLE);
        assert_eq!(status(), ByteVecStatus::InvalidArgument);
        assert_eq!(bytevec_new(4, 0), NULL_HANDLE);
        assert_eq!(status(), ByteVecStatus::InvalidArgument);
        assert_eq!(bytevec_new(usize::MAX, 8), NULL_HANDLE);
        assert_eq!(status(), ByteVecStatus::Overflow);
    }

    #[test]
    fn destroy_is_idempotent() {
        let h = new_u32(2);
        let mut copy = h;
        bytevec_destroy(&mut copy);
        assert_eq!(copy, NULL_HANDLE);
        // The original value is now stale; destroying it again is a no-op.
        let mut stale = h;
        bytevec_destroy(&mut stale);
        assert_eq!(stale, NULL_HANDLE);
        assert_eq!(status(), ByteVecStatus::Ok);
        bytevec_destroy(ptr::null_mut());
        assert_eq!(status(), ByteVecStatus::Ok);
    }

    #[test]
    fn stale_and_null_handles_behave_as_empty() {
        let h = from_values(2, &[1, 2]);
        destroy(h);
        for handle in [h, NULL_HANDLE] {
            assert_eq!(bytevec_capacity(handle), 0);
            assert_eq!(status(), ByteVecStatus::InvalidHandle);
            assert_eq!(bytevec_count(handle), 0);
            assert_eq!(bytevec_element_size(handle), 0);
            assert!(bytevec_get(handle, 0).is_null());
            assert!(!push(handle, 1));
            assert_eq!(bytevec_where_if(handle, Some(is_even)), 0);
            assert_eq!(bytevec_remove(handle, 0), 0);
            assert!(!bytevec_sort(handle, Some(cmp_u32)));
            assert_eq!(
                bytevec_apply(handle, Some(double), ptr::null_mut()),
                BYTEVEC_APPLY_FAILED
            );
            assert!(!bytevec_equal(handle, handle, None));
            assert_eq!(status(), ByteVecStatus::InvalidHandle);
        }
    }

    #[test]
    fn get_is_bounded_by_count() {
        let h = from_values(8, &[5]);
        assert!(!bytevec_get(h, 0).is_null());
        assert!(bytevec_get(h, 1).is_null());
        assert_eq!(status(), ByteVecStatus::IndexOutOfBounds);
        destroy(h);
    }

    #[test]
    fn append_rejects_bad_items() {
        let h = new_u32(2);
        assert!(!bytevec_append(h, ptr::null(), U32));
        assert_eq!(status(), ByteVecStatus::InvalidArgument);
        let wide = 1u64.to_ne_bytes();
        assert!(!bytevec_append(h, wide.as_ptr(), wide.len()));
        assert_eq!(status(), ByteVecStatus::SizeMismatch);
        assert_eq!(bytevec_count(h), 0);
        destroy(h);
    }

    #[test]
    fn insert_own_element_when_full() {
        let h = from_values(5, &[9, 8, 7, 6, 5]);
        let first = bytevec_get(h, 0);
        assert!(bytevec_insert(h, 1, first, U32));
        assert_eq!(values(h), vec![9, 9, 8, 7, 6, 5]);
        assert_eq!(bytevec_capacity(h), 10);
        destroy(h);
    }

    #[test]
    fn insert_own_element_every_position() {
        for source in 0..4 {
            for target in 0..=4 {
                let h = from_values(4, &[10, 11, 12, 13]);
                let item = bytevec_get(h, source);
                assert!(bytevec_insert(h, target, item, U32));
                let mut expected = vec![10, 11, 12, 13];
                expected.insert(target, expected[source]);
                assert_eq!(values(h), expected, "source={source} target={target}");
                destroy(h);
            }
        }
    }

    #[test]
    fn insert_out_of_range_changes_nothing() {
        let h = from_values(2, &[1]);
        let x = 2u32.to_ne_bytes();
        assert!(!bytevec_insert(h, 2, x.as_ptr(), U32));
        assert_eq!(status(), ByteVecStatus::IndexOutOfBounds);
        assert_eq!(values(h), vec![1]);
        destroy(h);
    }

    #[test]
    fn where_and_has() {
        let h = from_values(4, &[3, 4, 5, 4]);
        let four = 4u32.to_ne_bytes();
        let nine = 9u32.to_ne_bytes();
        assert_eq!(bytevec_where(h, four.as_ptr(), U32), 1);
        assert!(bytevec_has(h, four.as_ptr(), U32));
        assert_eq!(bytevec_where(h, nine.as_ptr(), U32), 4);
        assert!(!bytevec_has(h, nine.as_ptr(), U32));
        assert_eq!(status(), ByteVecStatus::Ok);

        assert_eq!(bytevec_where(h, ptr::null(), U32), 4);
        assert_eq!(status(), ByteVecStatus::InvalidArgument);
        assert_eq!(bytevec_where(h, four.as_ptr(), 2), 4);
        assert_eq!(status(), ByteVecStatus::SizeMismatch);

        assert_eq!(bytevec_where_if(h, Some(is_even)), 1);
        assert!(bytevec_has_if(h, Some(is_even)));
        assert_eq!(bytevec_where_if(h, None), 4);
        assert_eq!(status(), ByteVecStatus::InvalidArgument);
        assert!(!bytevec_has_if(h, None));
        destroy(h);
    }

    #[test]
    fn remove_returns_successor_or_count() {
        let h = from_values(4, &[1, 2, 3]);
        assert_eq!(bytevec_remove(h, 0), 0);
        assert_eq!(values(h), vec![2, 3]);
        assert_eq!(bytevec_remove(h, 1), 1);
        assert_eq!(bytevec_count(h), 1);
        assert_eq!(bytevec_remove(h, 5), 1);
        assert_eq!(status(), ByteVecStatus::IndexOutOfBounds);
        destroy(h);
    }

    #[test]
    fn remove_all_by_value_and_predicate() {
        let h = from_values(8, &[2, 1, 2, 3, 2, 4]);
        let target = bytevec_get(h, 2);
        assert_eq!(bytevec_remove_all(h, target, U32), 3);
        assert_eq!(values(h), vec![1, 3, 4]);
        assert_eq!(bytevec_remove_all_if(h, Some(is_even)), 1);
        assert_eq!(values(h), vec![1, 3]);
        assert_eq!(bytevec_remove_all_if(h, None), 0);
        assert_eq!(status(), ByteVecStatus::InvalidArgument);
        assert_eq!(bytevec_remove_all(h, ptr::null(), U32), 0);
        destroy(h);
    }

    #[test]
    fn sort_with_comparator() {
        let h = from_values(4, &[5, 1, 4, 2]);
        assert!(bytevec_sort(h, Some(cmp_u32)));
        assert_eq!(values(h), vec![1, 2, 4, 5]);
        assert!(!bytevec_sort(h, None));
        assert_eq!(status(), ByteVecStatus::InvalidArgument);
        destroy(h);

        let empty = new_u32(1);
        assert!(!bytevec_sort(empty, Some(cmp_u32)));
        assert_eq!(status(), ByteVecStatus::Empty);
        destroy(empty);
    }

    #[test]
    fn apply_visits_and_stops() {
        let h = from_values(4, &[1, 2, 3]);
        assert_eq!(bytevec_apply(h, Some(double), ptr::null_mut()), 0);
        assert_eq!(values(h), vec![2, 4, 6]);

        let mut total = 0u32;
        let state = (&mut total as *mut u32).cast::<c_void>();
        assert_eq!(bytevec_apply(h, Some(sum_until_over_ten), state), 7);
        assert_eq!(total, 12);
        destroy(h);
    }

    #[test]
    fn apply_fails_when_it_cannot_run() {
        let empty = new_u32(2);
        assert_eq!(
            bytevec_apply(empty, Some(double), ptr::null_mut()),
            BYTEVEC_APPLY_FAILED
        );
        assert_eq!(status(), ByteVecStatus::Empty);
        assert!(push(empty, 1));
        assert_eq!(bytevec_apply(empty, None, ptr::null_mut()), BYTEVEC_APPLY_FAILED);
        assert_eq!(status(), ByteVecStatus::InvalidArgument);
        destroy(empty);
    }

    #[test]
    fn equal_compares_occupied_regions() {
        let a = from_values(2, &[1, 2, 3]);
        let b = from_values(32, &[1, 2, 3]);
        let c = from_values(4, &[3, 4, 5]);
        assert!(bytevec_equal(a, b, None));
        assert!(!bytevec_equal(a, c, None));
        assert!(bytevec_equal(a, c, Some(cmp_parity)));
        assert!(bytevec_equal(a, a, None));
        assert!(bytevec_equal(c, c, Some(cmp_u32)));
        for h in [a, b, c] {
            destroy(h);
        }
    }

    #[test]
    fn equal_on_empty_vectors_checks_element_size() {
        let a = bytevec_new(1, 4);
        let b = bytevec_new(8, 4);
        let c = bytevec_new(1, 2);
        assert!(bytevec_equal(a, b, None));
        assert!(!bytevec_equal(a, c, None));
        for h in [a, b, c] {
            destroy(h);
        }
    }

    #[test]
    fn concurrent_cross_equality_does_not_deadlock() {
        let a = from_values(4, &[1, 2]);
        let b = from_values(4, &[1, 2]);
        let threads: Vec<_> = (0..4)
            .map(|i| {
                std::thread::spawn(move || {
                    for _ in 0..200 {
                        let equal = if i % 2 == 0 {
                            bytevec_equal(a, b, None)
                        } else {
                            bytevec_equal(b, a, None)
                        };
                        assert!(equal);
                    }
                })
            })
            .collect();
        for t in threads {
            t.join().unwrap();
        }
        destroy(a);
        destroy(b);
    }

    #[test]
    fn multiword_elements_round_trip() {
        let pts = [Point::new(1, 2), Point::new(-3, 4)];
        let h = bytevec_new(1, Point::SIZE);
        for p in pts {
            let bytes = p.to_bytes();
            assert!(bytevec_append(h, bytes.as_ptr(), Point::SIZE));
        }
        let second = bytevec_get(h, 1);
        assert!(bytevec_insert(h, 0, second, Point::SIZE));
        let read: Vec<Point> = (0..bytevec_count(h))
            .map(|i| {
                // SAFETY: each element is Point::SIZE live bytes.
                let bytes = unsafe { std::slice::from_raw_parts(bytevec_get(h, i), Point::SIZE) };
                Point::from_bytes(bytes)
            })
            .collect();
        assert_eq!(read, vec![pts[1], pts[0], pts[1]]);
        let target = pts[1].to_bytes();
        assert_eq!(bytevec_where(h, target.as_ptr(), Point::SIZE), 0);
        destroy(h);
    }

    proptest! {
        #[test]
        fn append_and_remove_track_model(
            appends in proptest::collection::vec(any::<u32>(), 1..40),
            removals in proptest::collection::vec(0usize..40, 0..20),
        ) {
            let h = from_values(1, &appends);
            let mut model = appends.clone();
            for index in removals {
                let next = bytevec_remove(h, index);
                if index < model.len() {
                    model.remove(index);
                    prop_assert_eq!(next, index);
                } else {
                    prop_assert_eq!(next, model.len());
                }
            }
            prop_assert_eq!(values(h), model);
            destroy(h);
        }
    }
}
