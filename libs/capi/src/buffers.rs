//! Raw-pointer helpers shared by the exported functions.

use std::ptr;
use std::slice;

/// Borrows `len` elements at `data`. A zero length needs no pointer; a null
/// pointer with a non-zero length yields `None`.
///
/// # Safety
///
/// If `data` is non-null it must point to `len` initialized elements that
/// stay valid and unaliased by writers for `'a`.
pub(crate) unsafe fn borrow<'a, T>(data: *const T, len: usize) -> Option<&'a [T]> {
    if len == 0 {
        Some(&[])
    } else if data.is_null() {
        None
    } else {
        Some(slice::from_raw_parts(data, len))
    }
}

/// Mutable counterpart of [`borrow`].
///
/// # Safety
///
/// If `data` is non-null it must point to `len` writable elements that no
/// one else accesses for `'a`.
pub(crate) unsafe fn borrow_mut<'a, T>(data: *mut T, len: usize) -> Option<&'a mut [T]> {
    if len == 0 {
        Some(&mut [])
    } else if data.is_null() {
        None
    } else {
        Some(slice::from_raw_parts_mut(data, len))
    }
}

/// Leaks `buffer` to the caller. Empty buffers become null.
pub(crate) fn into_raw<T>(buffer: Vec<T>) -> *mut T {
    if buffer.is_empty() {
        ptr::null_mut()
    } else {
        Box::into_raw(buffer.into_boxed_slice()).cast::<T>()
    }
}

/// Reclaims a buffer produced by [`into_raw`].
///
/// # Safety
///
/// `data` must be null or come from [`into_raw`] with exactly `len`
/// elements, and must not be used afterwards.
pub(crate) unsafe fn release<T>(data: *mut T, len: usize) {
    if !data.is_null() {
        drop(Box::from_raw(ptr::slice_from_raw_parts_mut(data, len)));
    }
}

/// Writes `value` through `out` unless it is null.
///
/// # Safety
///
/// `out` must be null or valid for a write.
pub(crate) unsafe fn write_out<T>(out: *mut T, value: T) {
    if !out.is_null() {
        out.write(value);
    }
}
